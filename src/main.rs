//! Spin Picker web app: roster editing, selection setup and the animated
//! pick, one screen per URL hash.

use gloo_events::EventListener;
use log::{info, warn};
use spin_picker::clock::timestamp_ms;
use spin_picker::roster::Roster;
use spin_picker::settings::{
    load_roster, load_settings, save_roster, save_settings, SetupDraft,
};
use spin_picker::{ParticipantId, SelectionMode, SelectionSettings};
use yew::prelude::*;

mod components;
mod config;
mod hooks;
mod notify;
mod storage;
mod utils;

use components::{
    AnimatedItem, ModeCard, PreselectPicker, ResultPanel, RosterList, StyleToggle,
};
use config::*;
use hooks::{use_selection_driver, use_text_field};
use notify::notify_error;
use storage::BrowserStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Roster,
    Setup,
    Select,
}

impl Screen {
    /// Unknown and empty hashes land on the roster.
    fn from_hash(hash: &str) -> Self {
        match hash {
            ROUTE_SETUP => Screen::Setup,
            ROUTE_SELECT => Screen::Select,
            _ => Screen::Roster,
        }
    }

    fn hash(self) -> &'static str {
        match self {
            Screen::Roster => ROUTE_ROSTER,
            Screen::Setup => ROUTE_SETUP,
            Screen::Select => ROUTE_SELECT,
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn current_hash() -> String {
    gloo_utils::window().location().hash().unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
fn current_hash() -> String {
    String::new()
}

#[cfg(target_arch = "wasm32")]
fn set_hash(hash: &str) {
    if let Err(e) = gloo_utils::window().location().set_hash(hash) {
        warn!("Could not update location hash: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn set_hash(_hash: &str) {}

/// Follow Back/Forward and hand-edited URLs. Dropping the listener detaches it.
#[cfg(target_arch = "wasm32")]
fn listen_hash_changes(on_change: impl Fn(Screen) + 'static) -> Option<EventListener> {
    let listener = EventListener::new(&gloo_utils::window(), "hashchange", move |_| {
        on_change(Screen::from_hash(&current_hash()));
    });
    Some(listener)
}

#[cfg(not(target_arch = "wasm32"))]
fn listen_hash_changes(_on_change: impl Fn(Screen) + 'static) -> Option<EventListener> {
    None
}

/// Stored roster, else the team photo seed.
fn load_initial_roster() -> Roster {
    match load_roster(&BrowserStore) {
        Some(participants) => {
            info!("Loaded {} stored participants", participants.len());
            Roster::from_participants(participants)
        }
        None => seed_roster(),
    }
}

fn seed_roster() -> Roster {
    match Roster::seeded() {
        Ok(roster) => {
            info!("Seeded {} participants from team photos", roster.len());
            roster
        }
        Err(e) => {
            warn!("Team photo manifest unusable: {}", e);
            Roster::new()
        }
    }
}

fn persist_roster(roster: &Roster) {
    if let Err(e) = save_roster(&BrowserStore, roster.participants()) {
        notify_error(&e);
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Roster screen

#[derive(Properties, PartialEq)]
struct ScreenProps {
    navigate: Callback<Screen>,
}

#[function_component(RosterScreen)]
fn roster_screen(props: &ScreenProps) -> Html {
    let roster = use_state(load_initial_roster);
    let name = use_text_field();
    let image_url = use_text_field();

    let add = {
        let roster = roster.clone();
        let name = name.clone();
        let image_url = image_url.clone();
        Callback::from(move |_: ()| {
            let mut next = (*roster).clone();
            if let Err(e) = next.add(&name.text, &image_url.text, timestamp_ms()) {
                notify_error(&e);
                return;
            }
            persist_roster(&next);
            roster.set(next);
            name.clear.emit(());
            image_url.clear.emit(());
        })
    };

    let on_remove = {
        let roster = roster.clone();
        Callback::from(move |id: ParticipantId| {
            let mut next = (*roster).clone();
            if next.remove(id).is_some() {
                persist_roster(&next);
                roster.set(next);
            }
        })
    };

    let on_reload = {
        let roster = roster.clone();
        Callback::from(move |_: MouseEvent| {
            let seeded = seed_roster();
            persist_roster(&seeded);
            roster.set(seeded);
        })
    };

    let on_enter = {
        let add = add.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                add.emit(());
            }
        })
    };

    let on_continue = {
        let navigate = props.navigate.clone();
        Callback::from(move |_: MouseEvent| navigate.emit(Screen::Setup))
    };

    html! {
        <div class="container">
            <h1>{ "Participants" }</h1>
            <div class="add-form">
                <input type="text"
                    placeholder="Name"
                    value={name.text.clone()}
                    oninput={name.on_input.clone()}
                    onkeypress={on_enter.clone()}
                />
                <input type="text"
                    placeholder="Image URL (optional)"
                    value={image_url.text.clone()}
                    oninput={image_url.on_input.clone()}
                    onkeypress={on_enter}
                />
                <button class="btn" onclick={add.reform(|_: MouseEvent| ())}>{ "Add" }</button>
            </div>
            <div class="roster-header">
                <span class="participant-count">
                    { format!("{} participants", roster.len()) }
                </span>
                <button class="btn secondary" onclick={on_reload}>{ "Reload team photos" }</button>
            </div>
            <RosterList participants={roster.participants().to_vec()} {on_remove} />
            <div class="controls">
                <button class="btn" onclick={on_continue}>{ "Continue to Setup" }</button>
            </div>
        </div>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Setup screen

#[function_component(SetupScreen)]
fn setup_screen(props: &ScreenProps) -> Html {
    let participants = use_memo((), |_| load_initial_roster().into_participants());
    let draft = {
        let participants = participants.clone();
        use_state(move || {
            let mut draft = SetupDraft::default();
            if let Some(previous) = load_settings(&BrowserStore) {
                draft.select_mode(previous.mode);
                draft.preselect(previous.preselected_participant_id);
            }
            draft.retain_known(&participants);
            draft
        })
    };

    let on_mode = {
        let draft = draft.clone();
        Callback::from(move |mode: SelectionMode| {
            let mut next = (*draft).clone();
            next.select_mode(mode);
            draft.set(next);
        })
    };

    let on_preselect = {
        let draft = draft.clone();
        Callback::from(move |id: Option<ParticipantId>| {
            let mut next = (*draft).clone();
            next.preselect(id);
            draft.set(next);
        })
    };

    let on_continue = {
        let draft = draft.clone();
        let participants = participants.clone();
        let navigate = props.navigate.clone();
        Callback::from(move |_: MouseEvent| {
            let saved = draft
                .finish(&participants)
                .and_then(|settings| save_settings(&BrowserStore, &settings));
            match saved {
                Ok(()) => navigate.emit(Screen::Select),
                Err(e) => notify_error(&e),
            }
        })
    };

    let on_back = {
        let navigate = props.navigate.clone();
        Callback::from(move |_: MouseEvent| navigate.emit(Screen::Roster))
    };

    let rigged = draft.mode == Some(SelectionMode::Rigged);

    html! {
        <div class="container">
            <h1>{ "Selection Setup" }</h1>
            <p class="subtitle">{ format!("{} participants", participants.len()) }</p>
            <div class="mode-options">
                { [SelectionMode::Random, SelectionMode::Rigged].into_iter().map(|mode| html! {
                    <ModeCard {mode}
                        selected={draft.mode == Some(mode)}
                        on_select={on_mode.clone()} />
                }).collect::<Html>() }
            </div>
            if rigged {
                <PreselectPicker participants={(*participants).clone()}
                    selected={draft.preselected}
                    on_change={on_preselect} />
            }
            <div class="controls">
                <button class="btn secondary" onclick={on_back}>{ "Back" }</button>
                <button class="btn" disabled={!draft.can_continue()} onclick={on_continue}>
                    { "Continue" }
                </button>
            </div>
        </div>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Selection screen

#[function_component(SelectionScreen)]
fn selection_screen(props: &ScreenProps) -> Html {
    let settings = use_memo((), |_| load_settings(&BrowserStore));

    {
        let missing = settings.is_none();
        let navigate = props.navigate.clone();
        use_effect_with(missing, move |missing| {
            if *missing {
                info!("No selection settings stored, back to setup");
                navigate.emit(Screen::Setup);
            }
        });
    }

    match &*settings {
        Some(settings) => html! {
            <SelectionStage settings={settings.clone()} navigate={props.navigate.clone()} />
        },
        None => Html::default(),
    }
}

#[derive(Properties, PartialEq)]
struct SelectionStageProps {
    settings: SelectionSettings,
    navigate: Callback<Screen>,
}

#[function_component(SelectionStage)]
fn selection_stage(props: &SelectionStageProps) -> Html {
    let area_ref = use_node_ref();
    let controls = use_selection_driver(
        props.settings.clone(),
        area_ref.clone(),
        DEFAULT_ANIMATION_STYLE,
    );
    let view = &controls.view;

    let on_start = controls.start.reform(|_: MouseEvent| ());
    let on_reset = controls.reset.reform(|_: MouseEvent| ());
    let on_back = {
        let reset = controls.reset.clone();
        let navigate = props.navigate.clone();
        Callback::from(move |_: MouseEvent| {
            reset.emit(());
            navigate.emit(Screen::Setup);
        })
    };

    let placeholder = if props.settings.participants.is_empty() {
        EMPTY_ROSTER_MESSAGE
    } else {
        "Press start to pick someone"
    };

    html! {
        <div class="container">
            <h1>{ "Random Selector" }</h1>
            <p class="subtitle">{ props.settings.mode.to_string() }</p>
            <StyleToggle style={controls.style}
                disabled={view.running}
                on_change={controls.set_style.clone()} />
            <div class={classes!("animation-area", controls.is_settled().then_some("settled"))}
                ref={area_ref}>
                if view.items.is_empty() && view.revealed.is_none() {
                    <p class="area-hint">{ placeholder }</p>
                }
                { view.items.iter().filter_map(|item| {
                    let participant = props.settings.participants.iter().find(|p| p.id == item.id);
                    participant.map(|p| html! {
                        <AnimatedItem key={item.id.to_string()}
                            participant={p.clone()}
                            item={item.clone()}
                            phase={view.phase}
                            progress={view.progress} />
                    })
                }).collect::<Html>() }
            </div>
            if let Some(winner) = &view.revealed {
                <ResultPanel participant={winner.clone()} />
            }
            <div class="controls">
                <button class="btn secondary" onclick={on_back}>{ "Back to Setup" }</button>
                <button class="btn" disabled={!view.can_start} onclick={on_start}>
                    { if view.running { "Selecting..." } else { "Start Selection" } }
                </button>
                <button class="btn secondary"
                    disabled={!view.running && view.revealed.is_none()}
                    onclick={on_reset}>
                    { "Reset" }
                </button>
            </div>
        </div>
    }
}

// ──────────────────────────────────────────────────────────────────────────────

#[function_component]
fn App() -> Html {
    let screen = use_state_eq(|| Screen::from_hash(&current_hash()));

    {
        let screen = screen.clone();
        use_effect_with((), move |_| {
            let listener = listen_hash_changes(move |next| screen.set(next));
            move || drop(listener)
        });
    }

    let navigate = {
        let screen = screen.clone();
        Callback::from(move |next: Screen| {
            set_hash(next.hash());
            screen.set(next);
        })
    };

    match *screen {
        Screen::Roster => html! { <RosterScreen {navigate} /> },
        Screen::Setup => html! { <SetupScreen {navigate} /> },
        Screen::Select => html! { <SelectionScreen {navigate} /> },
    }
}

/// Entry point: installs the panic hook and mounts the app.
fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
