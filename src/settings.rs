//! Selection settings, the setup draft that produces them, and the
//! key-value blob they are persisted in.

use crate::{select_participant, Participant, ParticipantId, PickerError, SelectionMode};
use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;

/// Storage key for the blob handed from setup to the selection screen.
pub const SETTINGS_KEY: &str = "randomizerSettings";
/// Storage key for the roster.
pub const PARTICIPANTS_KEY: &str = "participants";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionSettings {
    pub mode: SelectionMode,
    #[serde(default)]
    pub preselected_participant_id: Option<ParticipantId>,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

impl SelectionSettings {
    pub fn random(participants: Vec<Participant>) -> Self {
        Self {
            mode: SelectionMode::Random,
            preselected_participant_id: None,
            participants,
        }
    }

    pub fn rigged(participants: Vec<Participant>, preselected: ParticipantId) -> Self {
        Self {
            mode: SelectionMode::Rigged,
            preselected_participant_id: Some(preselected),
            participants,
        }
    }

    /// Rigged settings must name a participant from their own snapshot.
    pub fn validate(&self) -> Result<(), PickerError> {
        if self.mode == SelectionMode::Rigged {
            let id = self
                .preselected_participant_id
                .ok_or(PickerError::MissingPreselection)?;
            if !self.participants.iter().any(|p| p.id == id) {
                return Err(PickerError::UnknownParticipant(id));
            }
        }
        Ok(())
    }

    pub fn pick<R: Rng>(&self, rng: &mut R) -> Result<&Participant, PickerError> {
        select_participant(
            self.mode,
            self.preselected_participant_id,
            &self.participants,
            rng,
        )
    }

    pub fn to_json(&self) -> Result<String, PickerError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PickerError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// In-progress choices on the setup screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetupDraft {
    pub mode: Option<SelectionMode>,
    pub preselected: Option<ParticipantId>,
}

impl SetupDraft {
    /// Switching away from rigged drops any chosen target.
    pub fn select_mode(&mut self, mode: SelectionMode) {
        self.mode = Some(mode);
        if mode != SelectionMode::Rigged {
            self.preselected = None;
        }
    }

    pub fn preselect(&mut self, id: Option<ParticipantId>) {
        self.preselected = id;
    }

    /// Forget the target if it is no longer in the roster.
    pub fn retain_known(&mut self, participants: &[Participant]) {
        if let Some(id) = self.preselected {
            if !participants.iter().any(|p| p.id == id) {
                debug!("Preselected id {} left the roster, clearing", id);
                self.preselected = None;
            }
        }
    }

    /// Whether the continue action is enabled.
    pub fn can_continue(&self) -> bool {
        match self.mode {
            Some(SelectionMode::Rigged) => self.preselected.is_some(),
            Some(SelectionMode::Random) => true,
            None => false,
        }
    }

    /// Snapshot the roster into validated settings.
    pub fn finish(&self, participants: &[Participant]) -> Result<SelectionSettings, PickerError> {
        let settings = match self.mode {
            Some(SelectionMode::Rigged) => SelectionSettings::rigged(
                participants.to_vec(),
                self.preselected.ok_or(PickerError::MissingPreselection)?,
            ),
            Some(SelectionMode::Random) | None => SelectionSettings::random(participants.to_vec()),
        };
        settings.validate()?;
        Ok(settings)
    }
}

/// A string key-value store in the shape of `window.localStorage`.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, PickerError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), PickerError>;
    fn remove_item(&self, key: &str) -> Result<(), PickerError>;
}

/// Store backed by a plain map; last write wins.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, PickerError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), PickerError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), PickerError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Validate and write the settings blob.
pub fn save_settings<S: KeyValueStore + ?Sized>(
    store: &S,
    settings: &SelectionSettings,
) -> Result<(), PickerError> {
    settings.validate()?;
    store.set_item(SETTINGS_KEY, &settings.to_json()?)
}

/// Read the settings blob.
///
/// A missing record and a record that no longer parses are both `None`;
/// the caller sends the user back to setup in either case.
pub fn load_settings<S: KeyValueStore + ?Sized>(store: &S) -> Option<SelectionSettings> {
    let raw = match store.get_item(SETTINGS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!("Could not read {}: {}", SETTINGS_KEY, e);
            return None;
        }
    };
    match SelectionSettings::from_json(&raw) {
        Ok(settings) => Some(settings),
        Err(e) => {
            warn!("Ignoring unreadable {}: {}", SETTINGS_KEY, e);
            None
        }
    }
}

pub fn save_roster<S: KeyValueStore + ?Sized>(
    store: &S,
    participants: &[Participant],
) -> Result<(), PickerError> {
    let json = serde_json::to_string(participants)?;
    store.set_item(PARTICIPANTS_KEY, &json)
}

/// Stored roster, or `None` when nothing usable was saved.
pub fn load_roster<S: KeyValueStore + ?Sized>(store: &S) -> Option<Vec<Participant>> {
    let raw = store.get_item(PARTICIPANTS_KEY).ok().flatten()?;
    match serde_json::from_str(&raw) {
        Ok(participants) => Some(participants),
        Err(e) => {
            warn!("Ignoring unreadable {}: {}", PARTICIPANTS_KEY, e);
            None
        }
    }
}
