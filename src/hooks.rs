//! Custom hooks for text input and for driving selection runs.

use crate::notify::notify_error;
use crate::utils::{area_from_size, input_value};
use gloo_render::{request_animation_frame, AnimationFrame};
use gloo_timers::callback::{Interval, Timeout};
use log::debug;
use spin_picker::animation::{AnimationConfig, AnimationStyle, Area, Phase};
use spin_picker::clock::SystemClock;
use spin_picker::session::{RunState, SelectionSession, SessionView, StartOutcome};
use spin_picker::SelectionSettings;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::HtmlElement;
use yew::prelude::*;

/// State and callbacks for a free-text input.
#[derive(Clone, PartialEq)]
pub struct TextField {
    pub text: String,
    pub on_input: Callback<InputEvent>,
    pub clear: Callback<()>,
}

#[hook]
pub fn use_text_field() -> TextField {
    let text = use_state(String::new);

    let on_input = {
        let text = text.clone();
        Callback::from(move |e: InputEvent| text.set(input_value(&e)))
    };

    let clear = {
        let text = text.clone();
        Callback::from(move |_| text.set(String::new()))
    };

    TextField {
        text: (*text).clone(),
        on_input,
        clear,
    }
}

/// Pending host callbacks for the current run. Dropping a handle cancels it.
#[derive(Default)]
struct Schedule {
    frame: Option<AnimationFrame>,
    interval: Option<Interval>,
    reveal: Option<Timeout>,
}

impl Schedule {
    fn cancel(&mut self) {
        self.frame = None;
        self.interval = None;
        self.reveal = None;
    }
}

/// Connects a [`SelectionSession`] to browser timers.
///
/// Every scheduled callback carries the run id it was created for and does
/// nothing once the session has moved on to another run.
struct SelectionDriver {
    session: RefCell<SelectionSession<SystemClock>>,
    schedule: RefCell<Schedule>,
    redraw: Callback<()>,
}

impl SelectionDriver {
    fn new(settings: SelectionSettings, style: AnimationStyle, redraw: Callback<()>) -> Self {
        let session = SelectionSession::new(
            settings,
            AnimationConfig::for_style(style),
            SystemClock::new(),
        );
        Self {
            session: RefCell::new(session),
            schedule: RefCell::new(Schedule::default()),
            redraw,
        }
    }

    fn view(&self) -> SessionView {
        self.session.borrow().view()
    }

    fn style(&self) -> AnimationStyle {
        self.session.borrow().config().style
    }

    fn start(self: &Rc<Self>, area: Area) {
        // The pending callbacks belong to the live run; leave them alone.
        if self.session.borrow().is_running() {
            debug!("Start ignored: run {} still active", self.session.borrow().run());
            return;
        }
        self.schedule.borrow_mut().cancel();
        let (outcome, style, step_ms) = {
            let mut session = self.session.borrow_mut();
            session.set_area(area);
            let outcome = session.start(&mut rand::rng());
            let config = session.config();
            (outcome, config.style, config.step_ms())
        };

        match outcome {
            Err(err) => notify_error(&err),
            Ok(StartOutcome::Ignored) => {}
            Ok(StartOutcome::Immediate(event)) => {
                debug!("Run {} revealed without animation", event.run);
            }
            Ok(StartOutcome::Animating { run }) => match style {
                AnimationStyle::Physics => self.request_frame(run),
                AnimationStyle::Cycling => {
                    let driver = Rc::clone(self);
                    let interval = Interval::new(step_ms.max(1.0) as u32, move || {
                        driver.advance(run);
                    });
                    self.schedule.borrow_mut().interval = Some(interval);
                }
            },
        }
        self.redraw.emit(());
    }

    fn request_frame(self: &Rc<Self>, run: u64) {
        let driver = Rc::clone(self);
        let handle = request_animation_frame(move |_| driver.on_frame(run));
        self.schedule.borrow_mut().frame = Some(handle);
    }

    fn on_frame(self: &Rc<Self>, run: u64) {
        self.schedule.borrow_mut().frame.take();
        self.advance(run);
        let keep_going = {
            let session = self.session.borrow();
            session.run() == run && *session.state() == RunState::Running
        };
        if keep_going {
            self.request_frame(run);
        }
    }

    /// Step the animation; once it settles, hand the reveal to a timeout.
    fn advance(self: &Rc<Self>, run: u64) {
        let delay_ms = {
            let mut session = self.session.borrow_mut();
            if session.run() != run || *session.state() != RunState::Running {
                return;
            }
            if let Some(event) = session.tick(&mut rand::rng()) {
                debug!("Run {} revealed {} on tick", event.run, event.participant.name);
            }
            match session.state() {
                RunState::Settling { .. } => Some(session.reveal_delay_ms()),
                _ => None,
            }
        };

        if let Some(delay_ms) = delay_ms {
            let driver = Rc::clone(self);
            let timeout = Timeout::new(delay_ms.max(0.0) as u32, move || driver.finish(run));
            self.schedule.borrow_mut().reveal = Some(timeout);
        }
        self.redraw.emit(());
    }

    fn finish(&self, run: u64) {
        let event = {
            let mut session = self.session.borrow_mut();
            if session.run() != run {
                return;
            }
            session.complete_reveal()
        };
        self.schedule.borrow_mut().cancel();
        if let Some(event) = event {
            debug!("Run {} revealed {}", event.run, event.participant.name);
        }
        self.redraw.emit(());
    }

    fn reset(&self) {
        self.schedule.borrow_mut().cancel();
        self.session.borrow_mut().reset();
        self.redraw.emit(());
    }

    fn set_style(&self, style: AnimationStyle) {
        let changed = {
            let mut session = self.session.borrow_mut();
            let area = session.config().area;
            session.config().style != style
                && session.set_config(AnimationConfig::for_style(style).with_area(area))
        };
        if changed {
            self.redraw.emit(());
        }
    }

    /// Break the callback cycles on unmount.
    fn shutdown(&self) {
        self.schedule.borrow_mut().cancel();
    }
}

/// Everything the selection screen renders and triggers.
#[derive(Clone)]
pub struct SelectionControls {
    pub view: SessionView,
    pub style: AnimationStyle,
    pub start: Callback<()>,
    pub reset: Callback<()>,
    pub set_style: Callback<AnimationStyle>,
}

impl SelectionControls {
    pub fn is_settled(&self) -> bool {
        self.view.phase == Some(Phase::Settled)
    }
}

/// Run selections for `settings`, animating inside the element behind
/// `area_ref`.
#[hook]
pub fn use_selection_driver(
    settings: SelectionSettings,
    area_ref: NodeRef,
    initial_style: AnimationStyle,
) -> SelectionControls {
    let force_update = use_force_update();
    let driver = {
        let redraw = Callback::from(move |_| force_update.force_update());
        use_memo((), move |_| SelectionDriver::new(settings, initial_style, redraw))
    };

    {
        let driver = Rc::clone(&driver);
        use_effect_with((), move |_| move || driver.shutdown());
    }

    let start = {
        let driver = Rc::clone(&driver);
        Callback::from(move |_| {
            let area = area_ref
                .cast::<HtmlElement>()
                .map(|el| area_from_size(el.offset_width(), el.offset_height()))
                .unwrap_or_default();
            driver.start(area);
        })
    };

    let reset = {
        let driver = Rc::clone(&driver);
        Callback::from(move |_| driver.reset())
    };

    let set_style = {
        let driver = Rc::clone(&driver);
        Callback::from(move |style| driver.set_style(style))
    };

    SelectionControls {
        view: driver.view(),
        style: driver.style(),
        start,
        reset,
        set_style,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spin_picker::Participant;
    use std::cell::Cell;

    fn trio() -> Vec<Participant> {
        vec![
            Participant::new(1, "Alice", None),
            Participant::new(2, "Bob", None),
            Participant::new(3, "Cara", None),
        ]
    }

    #[test]
    fn start_during_a_run_keeps_the_run_alive() {
        let redraws = Rc::new(Cell::new(0));
        let redraw = {
            let redraws = Rc::clone(&redraws);
            Callback::from(move |_| redraws.set(redraws.get() + 1))
        };
        let driver = Rc::new(SelectionDriver::new(
            SelectionSettings::random(trio()),
            AnimationStyle::Physics,
            redraw,
        ));
        driver.session.borrow_mut().start(&mut rand::rng()).unwrap();
        let run = driver.session.borrow().run();

        driver.start(Area::default());

        let session = driver.session.borrow();
        assert_eq!(session.run(), run);
        assert_eq!(*session.state(), RunState::Running);
        assert_eq!(redraws.get(), 0);
    }
}
