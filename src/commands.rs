use chrono::Local;
use std::io::{BufRead, Write};
use uuid::Uuid;

use notees::core::note::relative_date;
use notees::core::{Note, NoteField};
use notees::store::{
    BlobStore, CommitOutcome, NoteStore, SearchScope, SortOrder, StoreError, draft,
};

use crate::cli::Command;

const SHORT_ID_LEN: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("no note matches {0:?}")]
    UnknownId(String),

    #[error("{0:?} matches more than one note")]
    AmbiguousId(String),

    #[error("note has no item {index} (it has {count})")]
    NoSuchItem { index: usize, count: usize },
}

fn short_id(id: Uuid) -> String {
    id.simple().to_string()[..SHORT_ID_LEN].to_string()
}

/// Accept a full id or any unique prefix of its hyphen-free form. Either
/// way the note must be in the store.
fn resolve<S: BlobStore>(store: &NoteStore<S>, raw: &str) -> Result<Uuid, CommandError> {
    if let Ok(id) = Uuid::parse_str(raw) {
        return store
            .find(id)
            .map(|note| note.id)
            .map_err(|_| CommandError::UnknownId(raw.to_string()));
    }
    let prefix = raw.replace('-', "").to_lowercase();
    if prefix.is_empty() {
        return Err(CommandError::UnknownId(raw.to_string()));
    }
    let mut matches = store
        .notes()
        .iter()
        .filter(|n| n.id.simple().to_string().starts_with(&prefix));
    match (matches.next(), matches.next()) {
        (Some(note), None) => Ok(note.id),
        (None, _) => Err(CommandError::UnknownId(raw.to_string())),
        (Some(_), Some(_)) => Err(CommandError::AmbiguousId(raw.to_string())),
    }
}

fn display_title(note: &Note) -> &str {
    if note.title.trim().is_empty() {
        "(untitled)"
    } else {
        note.title.as_str()
    }
}

fn summary_line(note: &Note) -> String {
    let star = if note.favorite { "★ " } else { "" };
    let title = display_title(note);
    let mut line = format!("{}  {}{}  [{}]", short_id(note.id), star, title, note.color);
    if note.is_checklist() {
        let done = note.items().iter().filter(|i| i.checked).count();
        line.push_str(&format!(" ({}/{} done)", done, note.items().len()));
    }
    let when = relative_date(&note.date.with_timezone(&Local), &Local::now());
    line.push_str(&format!("  {}", when));
    line
}

fn print_listing<S: BlobStore>(
    store: &NoteStore<S>,
    query: &str,
    scope: SearchScope,
    order: SortOrder,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let notes = store.listing(query, scope, order);
    if notes.is_empty() {
        let message = if query.is_empty() { "No notes yet" } else { "No notes found" };
        writeln!(out, "{}", message)?;
    }
    for note in notes {
        writeln!(out, "{}", summary_line(note))?;
    }
    Ok(())
}

fn confirm_delete(
    note: &Note,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<bool, CommandError> {
    write!(out, "Delete \"{}\"? [y/N] ", display_title(note))?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn report_commit(outcome: CommitOutcome, out: &mut impl Write) -> Result<(), CommandError> {
    match outcome {
        CommitOutcome::Created(id) => writeln!(out, "Created {}", short_id(id))?,
        CommitOutcome::Updated { date_refreshed: true, .. } => writeln!(out, "Note saved")?,
        CommitOutcome::Updated { .. } => writeln!(out, "No changes")?,
        CommitOutcome::Discarded => writeln!(out, "Empty note discarded")?,
    }
    Ok(())
}

/// Load the collection. Corrupt data and a failed seed write are reported
/// on `err` and the caller carries on with what is in memory.
pub fn load_store<S: BlobStore>(
    store: &mut NoteStore<S>,
    err: &mut impl Write,
) -> Result<(), CommandError> {
    match store.load() {
        Ok(_) => {}
        Err(e @ StoreError::StorageCorrupt { .. }) => {
            writeln!(err, "notees: {}; starting with no notes", e)?;
        }
        Err(e @ StoreError::StorageWriteFailed { .. }) => {
            writeln!(err, "notees: {}; notes are kept in memory only", e)?;
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

pub fn run<S: BlobStore>(
    store: &mut NoteStore<S>,
    command: &Command,
    order: SortOrder,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    match command {
        Command::List { query } => {
            print_listing(store, &query.join(" "), SearchScope::All, order, out)?
        }
        Command::Favorites { query } => {
            let query = query.join(" ");
            print_listing(store, &query, SearchScope::FavoritesOnly, order, out)?
        }
        Command::New { title, content } => {
            let note = store.create_draft(false);
            let note = draft::update_field(note, NoteField::Title(title.clone()));
            let note = draft::update_field(note, NoteField::Content(content.join(" ")));
            let outcome = store.commit_draft(note)?;
            report_commit(outcome, out)?;
        }
        Command::Checklist { title, items } => {
            let mut note = store.create_draft(true);
            note = draft::update_field(note, NoteField::Title(title.clone()));
            for (i, text) in items.iter().enumerate() {
                if i > 0 {
                    note = draft::add_item(note);
                }
                let last = note.items().last().map(|item| item.id);
                if let Some(item) = last {
                    note = draft::set_item_text(note, item, text.clone())?;
                }
            }
            let outcome = store.commit_draft(note)?;
            report_commit(outcome, out)?;
        }
        Command::Show { id } => {
            let id = resolve(store, id)?;
            let note = store.find(id)?;
            writeln!(out, "{}", note.share_text())?;
        }
        Command::Star { id } => {
            let id = resolve(store, id)?;
            let note = store.toggle_favorite(id)?;
            let message = if note.favorite {
                "Added to favorites"
            } else {
                "Removed from favorites"
            };
            writeln!(out, "{}", message)?;
        }
        Command::Color { id, color } => {
            let id = resolve(store, id)?;
            store.set_color(id, *color)?;
            writeln!(out, "Color set to {}", color)?;
        }
        Command::Check { id, index } => {
            let id = resolve(store, id)?;
            let note = store.edit_draft(id)?;
            let count = note.items().len();
            let Some(item) = note.items().get(index.get() - 1).map(|item| item.id) else {
                store.discard_draft();
                return Err(CommandError::NoSuchItem {
                    index: index.get(),
                    count,
                });
            };
            let note = draft::toggle_item(note, item)?;
            let outcome = store.commit_draft(note)?;
            report_commit(outcome, out)?;
        }
        Command::Remove { id, yes } => {
            let id = resolve(store, id)?;
            if !*yes && !confirm_delete(store.find(id)?, input, out)? {
                writeln!(out, "Kept note")?;
                return Ok(());
            }
            store.delete_note(id)?;
            writeln!(out, "Note deleted")?;
        }
    }
    Ok(())
}
