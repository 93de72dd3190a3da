//! Lifecycle of selection runs on the selection screen.
//!
//! ```text
//!  Idle ──start──▶ Running ──settled──▶ Settling ──delay──▶ Revealed
//!   ▲                 │                    │                  │
//!   └────reset────────┴────────────────────┴──────────────────┘
//! ```
//!
//! The session is independent of any rendering layer. Time comes from an
//! injected [`Clock`] and randomness from the `Rng` handed to each call, so
//! every transition can be driven deterministically.
//!
//! A run reveals exactly once: only the `Settling → Revealed` transition
//! produces a [`RevealEvent`], and `reset` leaves `Settling` without one.
//! Every start and reset bumps [`SelectionSession::run`], which lets a host
//! scheduler tell a stale callback from a live one.

use crate::animation::{AnimationConfig, Area, Choreography, FrameOutcome, ItemState, Phase};
use crate::clock::Clock;
use crate::{Participant, PickerError, SelectionSettings};
use log::{debug, info};
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub enum RunState {
    Idle,
    Running,
    Settling { reveal_at: f64 },
    Revealed(Participant),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevealEvent {
    pub run: u64,
    pub participant: Participant,
    /// False when the run short-circuited without animating.
    pub animated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StartOutcome {
    /// Nothing to do: empty roster or a run already in progress.
    Ignored,
    Animating { run: u64 },
    /// A single participant is revealed straight away.
    Immediate(RevealEvent),
}

/// What a renderer needs to draw the selection screen.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub run: u64,
    pub running: bool,
    pub can_start: bool,
    pub phase: Option<Phase>,
    pub progress: f64,
    pub items: Vec<ItemState>,
    pub revealed: Option<Participant>,
}

pub struct SelectionSession<C: Clock> {
    settings: SelectionSettings,
    config: AnimationConfig,
    clock: C,
    state: RunState,
    choreography: Option<Choreography>,
    winner: Option<Participant>,
    run: u64,
    reveals: u64,
}

impl<C: Clock> SelectionSession<C> {
    pub fn new(settings: SelectionSettings, config: AnimationConfig, clock: C) -> Self {
        Self {
            settings,
            config,
            clock,
            state: RunState::Idle,
            choreography: None,
            winner: None,
            run: 0,
            reveals: 0,
        }
    }

    pub fn settings(&self) -> &SelectionSettings {
        &self.settings
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Identifier of the current run; changes on every start and reset.
    pub fn run(&self) -> u64 {
        self.run
    }

    /// Total reveal events fired over the session's lifetime.
    pub fn reveal_count(&self) -> u64 {
        self.reveals
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, RunState::Running | RunState::Settling { .. })
    }

    pub fn can_start(&self) -> bool {
        !self.settings.participants.is_empty() && !self.is_running()
    }

    pub fn items(&self) -> &[ItemState] {
        self.choreography
            .as_ref()
            .map(|c| c.items())
            .unwrap_or(&[])
    }

    pub fn phase(&self) -> Option<Phase> {
        self.choreography.as_ref().map(|c| c.phase())
    }

    pub fn revealed(&self) -> Option<&Participant> {
        match &self.state {
            RunState::Revealed(p) => Some(p),
            _ => None,
        }
    }

    pub fn reveal_delay_ms(&self) -> f64 {
        self.config.reveal_delay_ms
    }

    /// Swap the animation settings; refused while a run is active.
    pub fn set_config(&mut self, config: AnimationConfig) -> bool {
        if self.is_running() {
            return false;
        }
        self.config = config;
        true
    }

    pub fn set_area(&mut self, area: Area) -> bool {
        if self.is_running() {
            return false;
        }
        self.config.area = area;
        true
    }

    /// Begin a run.
    ///
    /// # Errors
    /// User-input errors from the outcome selector (missing or unknown
    /// preset participant) and invalid animation settings. The session is
    /// left unchanged on error.
    pub fn start<R: Rng>(&mut self, rng: &mut R) -> Result<StartOutcome, PickerError> {
        if self.is_running() {
            debug!("Start ignored: run {} still active", self.run);
            return Ok(StartOutcome::Ignored);
        }
        if self.settings.participants.is_empty() {
            debug!("Start ignored: no participants");
            return Ok(StartOutcome::Ignored);
        }

        let winner = self.settings.pick(rng)?.clone();

        if self.settings.participants.len() == 1 {
            self.run += 1;
            self.choreography = None;
            info!("Only {} is eligible, revealing without animation", winner.name);
            return Ok(StartOutcome::Immediate(self.reveal(winner, false)));
        }

        let ids: Vec<_> = self.settings.participants.iter().map(|p| p.id).collect();
        let now = self.clock.now_ms();
        let choreography = Choreography::new(&self.config, &ids, winner.id, now, rng)?;

        self.run += 1;
        info!(
            "Run {} started: {} participants, {} mode, {:?} style",
            self.run,
            ids.len(),
            self.settings.mode,
            choreography.style()
        );
        self.choreography = Some(choreography);
        self.winner = Some(winner);
        self.state = RunState::Running;
        Ok(StartOutcome::Animating { run: self.run })
    }

    /// Advance the animation to the clock's current time.
    ///
    /// Returns the reveal if the post-animation delay has elapsed.
    pub fn tick<R: Rng>(&mut self, rng: &mut R) -> Option<RevealEvent> {
        let now = self.clock.now_ms();
        match self.state {
            RunState::Running => {
                let outcome = self.choreography.as_mut()?.tick(now, rng);
                if outcome == FrameOutcome::Settled {
                    let reveal_at = now + self.config.reveal_delay_ms;
                    debug!("Run {} settled, reveal at {:.0}ms", self.run, reveal_at);
                    self.state = RunState::Settling { reveal_at };
                }
                None
            }
            RunState::Settling { reveal_at } if now >= reveal_at => self.complete_reveal(),
            _ => None,
        }
    }

    /// Reveal a settled run now, regardless of the clock.
    ///
    /// Used when a host timer owns the reveal delay. Returns `None` unless
    /// the session is settling, so a run can never reveal twice.
    pub fn complete_reveal(&mut self) -> Option<RevealEvent> {
        if !matches!(self.state, RunState::Settling { .. }) {
            return None;
        }
        let winner = self.winner.take()?;
        Some(self.reveal(winner, true))
    }

    /// Abandon any run and go back to idle without revealing.
    pub fn reset(&mut self) {
        if self.is_running() {
            info!("Run {} cancelled", self.run);
        }
        self.run += 1;
        self.state = RunState::Idle;
        self.choreography = None;
        self.winner = None;
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            run: self.run,
            running: self.is_running(),
            can_start: self.can_start(),
            phase: self.phase(),
            progress: self.choreography.as_ref().map_or(0.0, |c| c.progress()),
            items: self.items().to_vec(),
            revealed: self.revealed().cloned(),
        }
    }

    fn reveal(&mut self, winner: Participant, animated: bool) -> RevealEvent {
        info!("Run {} reveals {}", self.run, winner.name);
        self.choreography = None;
        self.reveals += 1;
        self.state = RunState::Revealed(winner.clone());
        RevealEvent {
            run: self.run,
            participant: winner,
            animated,
        }
    }
}
