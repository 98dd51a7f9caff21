use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::checklist::ChecklistItem;
use super::color::NoteColor;
use super::note::Note;

fn on_day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

fn tinted(mut note: Note, color: NoteColor, date: DateTime<Utc>) -> Note {
    note.color = color;
    note.date = date;
    note
}

/// Starter notes written on first run when seeding is enabled.
pub fn sample_notes(now: DateTime<Utc>) -> Vec<Note> {
    let grocery = Note::checklist(
        "Grocery List",
        vec![
            ChecklistItem::checked("Oat milk"),
            ChecklistItem::new("Avocados"),
            ChecklistItem::new("Coffee beans"),
        ],
    );
    let mut inspiration = Note::text(
        "Inspiration",
        "\"The details are not the details. They make the design.\"",
    );
    inspiration.favorite = true;

    vec![
        tinted(
            Note::text(
                "Q3 Planning",
                "Discussion about the roadmap for next quarter. Focus on user retention and UI polish.",
            ),
            NoteColor::Blue,
            now - Duration::hours(2),
        ),
        tinted(grocery, NoteColor::Green, now - Duration::hours(24)),
        tinted(
            Note::text("Side Project", "A marketplace for digital plants and virtual habitats."),
            NoteColor::Purple,
            on_day(2024, 10, 12),
        ),
        tinted(
            Note::text("Upper Body", "Bench Press 3x10, Pull Ups 4x8, Shoulder Press 3x12."),
            NoteColor::Orange,
            on_day(2024, 10, 14),
        ),
        tinted(inspiration, NoteColor::Pink, on_day(2024, 9, 28)),
        tinted(
            Note::text("Read Later", "Atomic Habits, Dune, Zero to One."),
            NoteColor::Teal,
            on_day(2024, 9, 15),
        ),
    ]
}
