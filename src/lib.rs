use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use wasm_bindgen::prelude::*;

pub mod animation;
pub mod clock;
pub mod easing;
pub mod roster;
pub mod session;
pub mod settings;

pub use settings::SelectionSettings;

/// Default animation parameters
pub mod defaults {
    // Physics choreography
    pub const PHYSICS_DURATION_MS: f64 = 5000.0;
    pub const PHYSICS_REVEAL_DELAY_MS: f64 = 800.0;
    pub const CANDIDATE_SWITCH_MS: f64 = 800.0;
    pub const DECOY_CHANCE: f64 = 0.5;

    // Phase boundaries as fractions of the total duration
    pub const CHAOS_END: f64 = 0.4;
    pub const SPOTLIGHT_END: f64 = 0.8;

    // Item box and motion constants
    pub const ITEM_WIDTH: f64 = 150.0;
    pub const ITEM_HEIGHT: f64 = 100.0;
    pub const INITIAL_VELOCITY: f64 = 2.0;
    pub const VELOCITY_JITTER: f64 = 0.25;
    pub const MAX_VELOCITY: f64 = 8.0;
    pub const BOUNCE: f64 = 0.8;
    pub const DAMPING: f64 = 0.95;
    pub const SPOTLIGHT_PULL: f64 = 0.05;
    pub const SPOTLIGHT_WOBBLE: f64 = 50.0;
    pub const CENTER_PULL: f64 = 0.15;
    pub const FADE_FLOOR: f64 = 0.2;
    pub const WINNER_SCALE: f64 = 1.2;

    // Cycling (interval) choreography
    pub const CYCLING_ITERATIONS: u32 = 50;
    pub const CYCLING_DURATION_MS: f64 = 2000.0;
    pub const CYCLING_REVEAL_DELAY_MS: f64 = 500.0;
    pub const CYCLING_HIGHLIGHT_FROM: f64 = 0.7;
    pub const CYCLING_HIGHLIGHT_CHANCE: f64 = 0.7;
    pub const CYCLING_DIM_OPACITY: f64 = 0.3;

    // Fallback animation area when the host element has no layout yet
    pub const AREA_WIDTH: f64 = 800.0;
    pub const AREA_HEIGHT: f64 = 500.0;
}

/// Participant ids are either photo positions (1-based) or millisecond timestamps.
pub type ParticipantId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Participant {
    pub fn new(id: ParticipantId, name: impl Into<String>, image_url: Option<String>) -> Self {
        Self {
            id,
            name: name.into(),
            image_url,
        }
    }

    /// Uppercased first character of the name, shown when there is no usable photo.
    pub fn monogram(&self) -> String {
        monogram(&self.name)
    }
}

pub fn monogram(name: &str) -> String {
    name.trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    Random,
    Rigged,
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMode::Random => write!(f, "Random Selection Mode"),
            SelectionMode::Rigged => write!(f, "Preset Selection Mode"),
        }
    }
}

// User-facing failures; none of these are fatal to the page.
#[derive(Debug, Clone, PartialEq)]
pub enum PickerError {
    EmptyName,
    MissingPreselection,
    UnknownParticipant(ParticipantId),
    EmptyRoster,
    Storage(String),
    Serialization(String),
    Manifest(String),
    InvalidAnimation(String),
    IdsExhausted,
}

impl fmt::Display for PickerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickerError::EmptyName => write!(f, "Please enter a name"),
            PickerError::MissingPreselection => {
                write!(f, "Please select a participant for preset selection")
            }
            PickerError::UnknownParticipant(id) => write!(
                f,
                "The preset participant (id {}) is no longer in the roster",
                id
            ),
            PickerError::EmptyRoster => write!(f, "Add at least one participant first"),
            PickerError::IdsExhausted => write!(f, "No participant ids left, remove someone first"),
            PickerError::Storage(msg) => write!(f, "Browser storage error: {}", msg),
            PickerError::Serialization(msg) => write!(f, "Could not read saved data: {}", msg),
            PickerError::Manifest(msg) => write!(f, "Invalid photo listing: {}", msg),
            PickerError::InvalidAnimation(msg) => {
                write!(f, "Invalid animation configuration: {}", msg)
            }
        }
    }
}

impl std::error::Error for PickerError {}

impl From<serde_json::Error> for PickerError {
    fn from(e: serde_json::Error) -> Self {
        PickerError::Serialization(e.to_string())
    }
}

impl From<csv::Error> for PickerError {
    fn from(e: csv::Error) -> Self {
        PickerError::Manifest(e.to_string())
    }
}

impl From<rand::distr::uniform::Error> for PickerError {
    fn from(e: rand::distr::uniform::Error) -> Self {
        PickerError::InvalidAnimation(e.to_string())
    }
}

/// Picks the outcome of a run.
///
/// * `Random` draws `floor(u * N)` for a uniform `u` in `[0, 1)`, so every
///   participant has probability `1/N`.
/// * `Rigged` returns the participant whose id matches `preselected`.
///
/// # Errors
/// * `EmptyRoster` when there is nobody to pick from (random mode)
/// * `MissingPreselection` when rigged mode has no stored target
/// * `UnknownParticipant` when the stored target is not in `participants`
pub fn select_participant<'a, R: Rng>(
    mode: SelectionMode,
    preselected: Option<ParticipantId>,
    participants: &'a [Participant],
    rng: &mut R,
) -> Result<&'a Participant, PickerError> {
    match mode {
        SelectionMode::Random => {
            if participants.is_empty() {
                return Err(PickerError::EmptyRoster);
            }
            let n = participants.len();
            let u: f64 = rng.random();
            // u < 1.0, the min() only guards float rounding
            let index = ((u * n as f64).floor() as usize).min(n - 1);
            debug!("Random draw {:.4} -> index {}/{}", u, index, n);
            Ok(&participants[index])
        }
        SelectionMode::Rigged => {
            let id = preselected.ok_or(PickerError::MissingPreselection)?;
            let chosen = participants
                .iter()
                .find(|p| p.id == id)
                .ok_or(PickerError::UnknownParticipant(id))?;
            debug!("Preset outcome: {} (id {})", chosen.name, chosen.id);
            Ok(chosen)
        }
    }
}

/// JavaScript entry point for picking a participant from a settings object.
///
/// Accepts the same shape that is persisted under `randomizerSettings`
/// (`{mode, preselectedParticipantId, participants}`) and returns either
/// the chosen participant or an error message string.
#[wasm_bindgen]
pub fn pick_participant(settings_js: JsValue) -> JsValue {
    let settings: SelectionSettings = match serde_wasm_bindgen::from_value(settings_js) {
        Ok(s) => s,
        Err(e) => {
            return serde_wasm_bindgen::to_value(&format!("Failed to deserialize settings: {}", e))
                .unwrap_or(JsValue::NULL);
        }
    };

    let mut rng = rand::rng();
    match settings.pick(&mut rng) {
        Ok(participant) => {
            info!("Picked {} via JS export", participant.name);
            serde_wasm_bindgen::to_value(participant).unwrap_or(JsValue::NULL)
        }
        Err(e) => serde_wasm_bindgen::to_value(&format!("Selection failed: {}", e))
            .unwrap_or(JsValue::NULL),
    }
}
