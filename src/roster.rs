//! Participant roster: add/remove, id allocation and the team-photo seed.

use crate::{Participant, ParticipantId, PickerError};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;

/// Folder (relative to the page) that holds the team photos.
pub const PHOTO_FOLDER: &str = "TeamPictures";

/// The fixed listing of the photo folder, one `filename` per row.
const PHOTO_MANIFEST: &str = include_str!("../assets/team_pictures.csv");

// Last `.ext` segment that does not cross a path separator
static EXTENSION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.[^/.]+$").unwrap());

/// Strip the file extension: `"De'Andre.jpeg"` → `"De'Andre"`.
pub fn name_from_filename(filename: &str) -> String {
    EXTENSION_REGEX.replace(filename, "").into_owned()
}

/// Parse a photo manifest into participants.
///
/// Ids are assigned by position (1-based) over the rows that name a file;
/// blank rows are skipped.
pub fn read_photo_manifest(csv_content: &str, folder: &str) -> Result<Vec<Participant>, PickerError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_content.as_bytes());

    let mut participants = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let filename = match record.get(0) {
            Some(f) if !f.is_empty() => f,
            _ => {
                debug!("Skipping blank manifest row {}", line + 2);
                continue;
            }
        };

        let id = participants.len() as ParticipantId + 1;
        participants.push(Participant {
            id,
            name: name_from_filename(filename),
            image_url: Some(format!("{}/{}", folder, filename)),
        });
    }

    Ok(participants)
}

/// Participants for every photo in the team folder.
pub fn team_photo_participants() -> Result<Vec<Participant>, PickerError> {
    let participants = read_photo_manifest(PHOTO_MANIFEST, PHOTO_FOLDER)?;
    info!("Seeded {} participants from {}", participants.len(), PHOTO_FOLDER);
    Ok(participants)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_participants(participants: Vec<Participant>) -> Self {
        Self { participants }
    }

    /// Roster populated from the team-photo folder.
    pub fn seeded() -> Result<Self, PickerError> {
        team_photo_participants().map(Self::from_participants)
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn into_participants(self) -> Vec<Participant> {
        self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        self.get(id).is_some()
    }

    /// Next free id for a participant created at `stamp_ms`.
    ///
    /// Timestamps are used as ids; two adds within the same millisecond
    /// (or a clock behind the seeded ids) fall back to `max + 1`.
    ///
    /// # Errors
    /// `IdsExhausted` when the largest id is already `u64::MAX`.
    pub fn next_id(&self, stamp_ms: u64) -> Result<ParticipantId, PickerError> {
        match self.participants.iter().map(|p| p.id).max() {
            Some(max) if stamp_ms <= max => max.checked_add(1).ok_or(PickerError::IdsExhausted),
            _ => Ok(stamp_ms),
        }
    }

    /// Add a participant from raw form input.
    ///
    /// Both fields are trimmed; a blank image URL means "no photo".
    pub fn add(
        &mut self,
        name: &str,
        image_url: &str,
        stamp_ms: u64,
    ) -> Result<&Participant, PickerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PickerError::EmptyName);
        }
        let image_url = image_url.trim();
        let participant = Participant {
            id: self.next_id(stamp_ms)?,
            name: name.to_string(),
            image_url: (!image_url.is_empty()).then(|| image_url.to_string()),
        };
        debug!("Adding participant {} (id {})", participant.name, participant.id);
        self.participants.push(participant);
        Ok(&self.participants[self.participants.len() - 1])
    }

    /// Remove by id, returning the removed participant if it was present.
    pub fn remove(&mut self, id: ParticipantId) -> Option<Participant> {
        let pos = self.participants.iter().position(|p| p.id == id)?;
        let removed = self.participants.remove(pos);
        debug!("Removed participant {} (id {})", removed.name, removed.id);
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_only_the_last_extension() {
        assert_eq!(name_from_filename("Branden.jpeg"), "Branden");
        assert_eq!(name_from_filename("De'Andre.jpeg"), "De'Andre");
        assert_eq!(name_from_filename("Nicole.JPG"), "Nicole");
        assert_eq!(name_from_filename("archive.tar.gz"), "archive.tar");
        assert_eq!(name_from_filename("NoExtension"), "NoExtension");
    }

    #[test]
    fn team_photos_seed_in_listing_order() {
        let seeded = team_photo_participants().unwrap();
        assert_eq!(seeded.len(), 24);
        for (i, p) in seeded.iter().enumerate() {
            assert_eq!(p.id, i as u64 + 1);
        }
        assert_eq!(seeded[0].name, "Branden");
        assert_eq!(seeded[0].image_url.as_deref(), Some("TeamPictures/Branden.jpeg"));
        assert_eq!(seeded[3].name, "De'Andre");
        assert_eq!(seeded[12].name, "Nicole");
        assert_eq!(seeded[23].name, "Zeb");
    }

    #[test]
    fn manifest_skips_blank_rows() {
        let csv = "filename\nA.png\n\n  \nB.jpg\n";
        let parsed = read_photo_manifest(csv, "pics").unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].id, 2);
        assert_eq!(parsed[1].image_url.as_deref(), Some("pics/B.jpg"));
    }

    #[test]
    fn add_trims_and_validates() {
        let mut roster = Roster::new();
        assert_eq!(roster.add("   ", "", 1_000), Err(PickerError::EmptyName));
        assert!(roster.is_empty());

        let p = roster.add("  Alice ", "  ", 1_000).unwrap().clone();
        assert_eq!(p.name, "Alice");
        assert_eq!(p.image_url, None);
        assert_eq!(p.id, 1_000);

        let q = roster.add("Bob", "http://x/b.png", 2_000).unwrap();
        assert_eq!(q.image_url.as_deref(), Some("http://x/b.png"));
    }

    #[test]
    fn ids_stay_unique_within_one_millisecond() {
        let mut roster = Roster::new();
        let a = roster.add("A", "", 5_000).unwrap().id;
        let b = roster.add("B", "", 5_000).unwrap().id;
        let c = roster.add("C", "", 4_000).unwrap().id;
        assert_eq!(a, 5_000);
        assert_eq!(b, 5_001);
        assert_eq!(c, 5_002);
    }

    #[test]
    fn id_overflow_is_an_error() {
        let mut roster = Roster::from_participants(vec![Participant::new(u64::MAX, "Last", None)]);
        assert_eq!(roster.next_id(5), Err(PickerError::IdsExhausted));
        assert_eq!(roster.add("Next", "", 5).map(|p| p.id), Err(PickerError::IdsExhausted));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn remove_by_id() {
        let mut roster = Roster::seeded().unwrap();
        let before = roster.len();
        let removed = roster.remove(4).unwrap();
        assert_eq!(removed.name, "De'Andre");
        assert_eq!(roster.len(), before - 1);
        assert!(!roster.contains(4));
        assert_eq!(roster.remove(4), None);
    }
}
