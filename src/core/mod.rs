pub mod checklist;
pub mod color;
pub mod note;
pub mod samples;

pub use checklist::ChecklistItem;
pub use color::NoteColor;
pub use note::{Note, NoteBody, NoteField};
