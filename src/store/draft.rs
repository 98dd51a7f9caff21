//! Pure edits on a draft note. Each takes the draft by value and hands back
//! the updated one; nothing here touches the stored collection.

use uuid::Uuid;

use super::errors::StoreError;
use crate::core::{ChecklistItem, Note, NoteField};

pub fn update_field(draft: Note, field: NoteField) -> Note {
    draft.with_field(field)
}

pub fn toggle_item(mut draft: Note, item_id: Uuid) -> Result<Note, StoreError> {
    let note = draft.id;
    let item = draft
        .item_mut(item_id)
        .ok_or(StoreError::ItemNotFound { note, item: item_id })?;
    item.checked = !item.checked;
    Ok(draft)
}

pub fn set_item_text(
    mut draft: Note,
    item_id: Uuid,
    text: impl Into<String>,
) -> Result<Note, StoreError> {
    let note = draft.id;
    let item = draft
        .item_mut(item_id)
        .ok_or(StoreError::ItemNotFound { note, item: item_id })?;
    item.text = text.into();
    Ok(draft)
}

/// Append an empty item. A text draft is switched to checklist mode first.
pub fn add_item(draft: Note) -> Note {
    let mut draft = draft.with_field(NoteField::Checklist(true));
    if let Some(items) = draft.items_mut() {
        items.push(ChecklistItem::new(""));
    }
    draft
}

pub fn remove_item(mut draft: Note, item_id: Uuid) -> Note {
    if let Some(items) = draft.items_mut() {
        items.retain(|i| i.id != item_id);
    }
    draft
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NoteColor;

    #[test]
    fn toggle_flips_only_the_target() {
        let draft = add_item(Note::new(true, NoteColor::Blue));
        let first = draft.items()[0].id;
        let draft = toggle_item(draft, first).unwrap();
        assert!(draft.items()[0].checked);
        assert!(!draft.items()[1].checked);
        let draft = toggle_item(draft, first).unwrap();
        assert!(!draft.items()[0].checked);
    }

    #[test]
    fn unknown_item_is_not_found() {
        let draft = Note::new(true, NoteColor::Blue);
        let id = draft.id;
        let missing = Uuid::new_v4();
        match toggle_item(draft.clone(), missing) {
            Err(StoreError::ItemNotFound { note, item }) => {
                assert_eq!(note, id);
                assert_eq!(item, missing);
            }
            other => panic!("expected ItemNotFound, got {:?}", other),
        }
        assert!(set_item_text(draft, missing, "x").is_err());
    }

    #[test]
    fn text_draft_has_no_items_to_edit() {
        let draft = Note::new(false, NoteColor::Blue);
        let err = toggle_item(draft, Uuid::new_v4()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn set_text_and_add() {
        let draft = Note::new(true, NoteColor::Blue);
        let first = draft.items()[0].id;
        let draft = set_item_text(draft, first, "Milk").unwrap();
        let draft = add_item(draft);
        assert_eq!(draft.items().len(), 2);
        assert_eq!(draft.items()[0].text, "Milk");
        assert_eq!(draft.items()[1].text, "");
        assert!(!draft.items()[1].checked);
        assert_ne!(draft.items()[0].id, draft.items()[1].id);
    }

    #[test]
    fn add_to_text_draft_switches_mode() {
        let draft = update_field(Note::new(false, NoteColor::Blue), NoteField::Content("Milk".into()));
        let draft = add_item(draft);
        assert!(draft.is_checklist());
        assert_eq!(draft.items().len(), 2);
        assert_eq!(draft.items()[0].text, "Milk");
    }

    #[test]
    fn remove_is_idempotent() {
        let draft = add_item(Note::new(true, NoteColor::Blue));
        let first = draft.items()[0].id;
        let draft = remove_item(draft, first);
        assert_eq!(draft.items().len(), 1);
        let draft = remove_item(draft, first);
        assert_eq!(draft.items().len(), 1);
        let draft = remove_item(draft, Uuid::new_v4());
        assert_eq!(draft.items().len(), 1);
    }
}
