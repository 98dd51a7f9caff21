pub mod blob;
pub mod draft;
pub mod errors;


use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::core::samples::sample_notes;
use crate::core::{Note, NoteColor};
pub use blob::{BlobStore, FileBlobStore, MemoryBlobStore};
pub use errors::{BlobError, CorruptionCause, StoreError};

pub const DEFAULT_STORAGE_KEY: &str = "notees_data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    #[default]
    All,
    FavoritesOnly,
}

/// Display order for listings. The stored order is always newest-created first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Insertion,
    #[default]
    NewestFirst,
}

/// What `load` does when nothing has been stored yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedPolicy {
    #[default]
    Empty,
    Samples,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Created(Uuid),
    Updated { id: Uuid, date_refreshed: bool },
    Discarded,
}

/// Owns the note collection and writes all of it back on every change.
pub struct NoteStore<S: BlobStore> {
    storage: S,
    key: String,
    seed: SeedPolicy,
    default_color: NoteColor,
    notes: Vec<Note>,
    active_draft: Option<Uuid>,
}

impl<S: BlobStore> NoteStore<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            seed: SeedPolicy::default(),
            default_color: NoteColor::default(),
            notes: Vec::new(),
            active_draft: None,
        }
    }

    pub fn with_seed(mut self, seed: SeedPolicy) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_default_color(mut self, color: NoteColor) -> Self {
        self.default_color = color;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn active_draft(&self) -> Option<Uuid> {
        self.active_draft
    }

    /// Read the stored collection. Corrupt or unreadable data leaves the
    /// store empty and is reported as `StorageCorrupt`; nothing is written back.
    pub fn load(&mut self) -> Result<&[Note], StoreError> {
        self.active_draft = None;
        let blob = match self.storage.get(&self.key) {
            Ok(blob) => blob,
            Err(e) => {
                log::error!("Failed to read notes under {:?}: {}", self.key, e);
                self.notes.clear();
                return Err(self.corrupt(CorruptionCause::Unreadable(e)));
            }
        };

        match blob {
            Some(text) => match serde_json::from_str::<Vec<Note>>(&text) {
                Ok(notes) => {
                    self.notes = dedup_ids(notes);
                    log::info!("Loaded {} notes from {:?}", self.notes.len(), self.key);
                }
                Err(e) => {
                    log::warn!("Stored notes under {:?} are malformed: {}", self.key, e);
                    self.notes.clear();
                    return Err(self.corrupt(CorruptionCause::Malformed(e)));
                }
            },
            None => match self.seed {
                SeedPolicy::Empty => self.notes.clear(),
                SeedPolicy::Samples => {
                    self.notes = sample_notes(Utc::now());
                    log::info!("Seeding {} sample notes", self.notes.len());
                    self.persist()?;
                }
            },
        }

        Ok(&self.notes)
    }

    pub fn find(&self, id: Uuid) -> Result<&Note, StoreError> {
        self.notes
            .iter()
            .find(|n| n.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    /// Start a new note. Nothing is stored until the draft is committed.
    pub fn create_draft(&mut self, is_checklist: bool) -> Note {
        let draft = Note::new(is_checklist, self.default_color);
        self.active_draft = Some(draft.id);
        draft
    }

    /// Open a stored note for editing.
    pub fn edit_draft(&mut self, id: Uuid) -> Result<Note, StoreError> {
        let draft = self.find(id)?.clone();
        self.active_draft = Some(id);
        Ok(draft)
    }

    pub fn discard_draft(&mut self) {
        self.active_draft = None;
    }

    /// Merge a draft into the collection and write it out.
    ///
    /// Empty drafts are dropped without touching storage, including when a
    /// note with the same id is already stored. Otherwise blank checklist
    /// items are removed, an existing note is replaced in place and a new
    /// one goes to the front. The date moves to now for new notes and for
    /// edits to the title, body or mode.
    pub fn commit_draft(&mut self, mut draft: Note) -> Result<CommitOutcome, StoreError> {
        self.active_draft = None;

        if draft.is_empty() {
            log::debug!("Discarding empty draft {}", draft.id);
            return Ok(CommitOutcome::Discarded);
        }

        draft.drop_blank_items();
        let id = draft.id;
        let outcome = match self.position(id) {
            Some(idx) => {
                let previous = &self.notes[idx];
                let date_refreshed = previous.differs_in_content(&draft);
                draft.date = if date_refreshed { Utc::now() } else { previous.date };
                self.notes[idx] = draft;
                CommitOutcome::Updated { id, date_refreshed }
            }
            None => {
                draft.date = Utc::now();
                self.notes.insert(0, draft);
                CommitOutcome::Created(id)
            }
        };

        log::debug!("Committed note {}: {:?}", id, outcome);
        self.persist()?;
        Ok(outcome)
    }

    /// Remove a note. Unknown ids are ignored and nothing is written.
    pub fn delete_note(&mut self, id: Uuid) -> Result<&[Note], StoreError> {
        if let Some(idx) = self.position(id) {
            self.notes.remove(idx);
            if self.active_draft == Some(id) {
                self.active_draft = None;
            }
            log::debug!("Deleted note {}", id);
            self.persist()?;
        }
        Ok(&self.notes)
    }

    pub fn toggle_favorite(&mut self, id: Uuid) -> Result<&Note, StoreError> {
        let idx = self.position(id).ok_or(StoreError::NotFound(id))?;
        self.notes[idx].favorite = !self.notes[idx].favorite;
        self.persist()?;
        Ok(&self.notes[idx])
    }

    /// Recolor a stored note. The date is left alone.
    pub fn set_color(&mut self, id: Uuid, color: NoteColor) -> Result<&Note, StoreError> {
        let idx = self.position(id).ok_or(StoreError::NotFound(id))?;
        self.notes[idx].color = color;
        self.persist()?;
        Ok(&self.notes[idx])
    }

    /// Notes whose title, content or checklist text contains `query`,
    /// ignoring case, in stored order.
    pub fn search(&self, query: &str, scope: SearchScope) -> Vec<&Note> {
        let needle = query.to_lowercase();
        self.notes
            .iter()
            .filter(|n| scope == SearchScope::All || n.favorite)
            .filter(|n| n.matches(&needle))
            .collect()
    }

    pub fn listing(&self, query: &str, scope: SearchScope, order: SortOrder) -> Vec<&Note> {
        let mut notes = self.search(query, scope);
        if order == SortOrder::NewestFirst {
            notes.sort_by(|a, b| b.date.cmp(&a.date));
        }
        notes
    }

    /// Write the whole collection. A failed write keeps the in-memory state.
    pub fn persist(&mut self) -> Result<(), StoreError> {
        let result = serde_json::to_string_pretty(&self.notes)
            .map_err(BlobError::Encode)
            .and_then(|json| self.storage.set(&self.key, &json));
        if let Err(e) = result {
            log::error!("Failed to save notes under {:?}: {}", self.key, e);
            return Err(StoreError::StorageWriteFailed {
                key: self.key.clone(),
                source: e,
            });
        }
        Ok(())
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.notes.iter().position(|n| n.id == id)
    }

    fn corrupt(&self, source: CorruptionCause) -> StoreError {
        StoreError::StorageCorrupt {
            key: self.key.clone(),
            source,
        }
    }
}

fn dedup_ids(notes: Vec<Note>) -> Vec<Note> {
    let mut seen = HashSet::new();
    let before = notes.len();
    let mut notes: Vec<Note> = notes.into_iter().filter(|n| seen.insert(n.id)).collect();
    if notes.len() != before {
        log::warn!("Dropped {} notes with duplicate ids", before - notes.len());
    }
    for note in &mut notes {
        reassign_duplicate_items(note);
    }
    notes
}

/// Items sharing an id with an earlier item in the same note get a fresh id.
fn reassign_duplicate_items(note: &mut Note) {
    let note_id = note.id;
    let Some(items) = note.items_mut() else {
        return;
    };
    let mut seen = HashSet::new();
    let mut reassigned = 0;
    for item in items.iter_mut() {
        if !seen.insert(item.id) {
            item.id = Uuid::new_v4();
            seen.insert(item.id);
            reassigned += 1;
        }
    }
    if reassigned > 0 {
        log::warn!(
            "Gave {} checklist items in note {} fresh ids",
            reassigned,
            note_id
        );
    }
}
