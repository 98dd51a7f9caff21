use chrono::{DateTime, TimeZone, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::LazyLock;
use uuid::Uuid;

use super::checklist::{self, ChecklistItem};
use super::color::NoteColor;

static EMPHASIS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\*\*[^*\n]+\*\*|__[^_\n]+__|<(?:b|strong|i|em)>").unwrap()
});

/// What a note holds: free text or a checklist, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteBody {
    Text { content: String },
    Checklist { items: Vec<ChecklistItem> },
}

impl NoteBody {
    fn is_blank(&self) -> bool {
        match self {
            Self::Text { content } => content.trim().is_empty(),
            Self::Checklist { items } => items.iter().all(ChecklistItem::is_blank),
        }
    }

    /// Whether two bodies differ in anything a user would call an edit.
    fn same_content(&self, other: &NoteBody) -> bool {
        match (self, other) {
            (Self::Text { content: a }, Self::Text { content: b }) => a == b,
            (Self::Checklist { items: a }, Self::Checklist { items: b }) => {
                checklist::same_entries(a, b)
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "NoteRecord", into = "NoteRecord")]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub body: NoteBody,
    pub color: NoteColor,
    pub favorite: bool,
    pub date: DateTime<Utc>,
}

/// A single field edit applied to a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteField {
    Title(String),
    /// Ignored in checklist mode.
    Content(String),
    Color(NoteColor),
    Favorite(bool),
    Checklist(bool),
}

impl Note {
    pub fn new(is_checklist: bool, color: NoteColor) -> Self {
        let body = if is_checklist {
            NoteBody::Checklist {
                items: vec![ChecklistItem::new("")],
            }
        } else {
            NoteBody::Text {
                content: String::new(),
            }
        };
        Self {
            id: Uuid::new_v4(),
            title: String::new(),
            body,
            color,
            favorite: false,
            date: Utc::now(),
        }
    }

    pub fn text(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: NoteBody::Text {
                content: content.into(),
            },
            ..Self::new(false, NoteColor::default())
        }
    }

    pub fn checklist(title: impl Into<String>, items: Vec<ChecklistItem>) -> Self {
        Self {
            title: title.into(),
            body: NoteBody::Checklist { items },
            ..Self::new(true, NoteColor::default())
        }
    }

    pub fn is_checklist(&self) -> bool {
        matches!(self.body, NoteBody::Checklist { .. })
    }

    /// The text content, `None` for checklists.
    pub fn content(&self) -> Option<&str> {
        match &self.body {
            NoteBody::Text { content } => Some(content),
            NoteBody::Checklist { .. } => None,
        }
    }

    /// Checklist items; empty for text notes.
    pub fn items(&self) -> &[ChecklistItem] {
        match &self.body {
            NoteBody::Checklist { items } => items,
            NoteBody::Text { .. } => &[],
        }
    }

    pub fn items_mut(&mut self) -> Option<&mut Vec<ChecklistItem>> {
        match &mut self.body {
            NoteBody::Checklist { items } => Some(items),
            NoteBody::Text { .. } => None,
        }
    }

    pub fn item_mut(&mut self, item_id: Uuid) -> Option<&mut ChecklistItem> {
        self.items_mut()?.iter_mut().find(|i| i.id == item_id)
    }

    /// No title, no content and no non-blank checklist item.
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && self.body.is_blank()
    }

    /// True when title, body or mode differ. Color and favorite do not count.
    pub fn differs_in_content(&self, other: &Note) -> bool {
        self.title != other.title || !self.body.same_content(&other.body)
    }

    pub fn drop_blank_items(&mut self) {
        if let Some(items) = self.items_mut() {
            items.retain(|i| !i.is_blank());
        }
    }

    pub fn with_field(mut self, field: NoteField) -> Self {
        match field {
            NoteField::Title(title) => self.title = title,
            NoteField::Content(text) => {
                if let NoteBody::Text { content } = &mut self.body {
                    *content = text;
                }
            }
            NoteField::Color(color) => self.color = color,
            NoteField::Favorite(favorite) => self.favorite = favorite,
            NoteField::Checklist(on) => self.set_checklist_mode(on),
        }
        self
    }

    fn set_checklist_mode(&mut self, on: bool) {
        match (&self.body, on) {
            (NoteBody::Text { content }, true) => {
                let mut items = checklist::text_to_items(content);
                if items.is_empty() {
                    items.push(ChecklistItem::new(""));
                }
                self.body = NoteBody::Checklist { items };
            }
            (NoteBody::Checklist { items }, false) => {
                let kept: Vec<ChecklistItem> =
                    items.iter().filter(|i| !i.is_blank()).cloned().collect();
                self.body = NoteBody::Text {
                    content: checklist::items_to_text(&kept),
                };
            }
            _ => {}
        }
    }

    /// Case-insensitive match against title, content and item text.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        if self.title.to_lowercase().contains(needle) {
            return true;
        }
        match &self.body {
            NoteBody::Text { content } => content.to_lowercase().contains(needle),
            NoteBody::Checklist { items } => items
                .iter()
                .any(|i| i.text.to_lowercase().contains(needle)),
        }
    }

    /// Plain-text rendering for sharing or copying.
    pub fn share_text(&self) -> String {
        let body = match &self.body {
            NoteBody::Text { content } => content.clone(),
            NoteBody::Checklist { items } => checklist::items_to_text(items),
        };
        format!("{}\n\n{}", self.title, body)
    }

    pub fn has_inline_emphasis(&self) -> bool {
        match &self.body {
            NoteBody::Text { content } => EMPHASIS_RE.is_match(content),
            NoteBody::Checklist { items } => items.iter().any(|i| EMPHASIS_RE.is_match(&i.text)),
        }
    }
}

/// Short human label for how long ago `date` was, relative to `now`.
pub fn relative_date<Tz: TimeZone>(date: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    let elapsed = now.clone() - date.clone();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if hours < 1 {
        "Just now".to_string()
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else if days == 1 {
        "Yesterday".to_string()
    } else if days < 7 {
        date.format("%A").to_string()
    } else {
        date.format("%b %-d").to_string()
    }
}

/// Persisted shape of a note.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteRecord {
    id: Uuid,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    color: NoteColor,
    #[serde(default)]
    favorite: bool,
    #[serde(default)]
    is_checklist: bool,
    #[serde(default)]
    checklist_items: Vec<ChecklistItem>,
    date: DateTime<Utc>,
}

impl From<NoteRecord> for Note {
    fn from(r: NoteRecord) -> Self {
        let body = if r.is_checklist {
            NoteBody::Checklist {
                items: r.checklist_items,
            }
        } else {
            NoteBody::Text { content: r.content }
        };
        Self {
            id: r.id,
            title: r.title,
            body,
            color: r.color,
            favorite: r.favorite,
            date: r.date,
        }
    }
}

impl From<Note> for NoteRecord {
    fn from(n: Note) -> Self {
        let (is_checklist, content, checklist_items) = match n.body {
            NoteBody::Text { content } => (false, content, Vec::new()),
            NoteBody::Checklist { items } => (true, String::new(), items),
        };
        Self {
            id: n.id,
            title: n.title,
            content,
            color: n.color,
            favorite: n.favorite,
            is_checklist,
            checklist_items,
            date: n.date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn new_checklist_has_one_empty_item() {
        let note = Note::new(true, NoteColor::Green);
        assert!(note.is_checklist());
        assert_eq!(note.items().len(), 1);
        assert_eq!(note.items()[0].text, "");
        assert!(!note.items()[0].checked);
        assert!(note.is_empty());
        assert_eq!(note.color, NoteColor::Green);
        assert!(!note.favorite);
    }

    #[test]
    fn emptiness_ignores_whitespace() {
        assert!(Note::text("  ", "\n\t").is_empty());
        assert!(!Note::text("Groceries", "").is_empty());
        assert!(!Note::text("", "milk").is_empty());
        let list = Note::checklist("", vec![ChecklistItem::new(""), ChecklistItem::new(" ")]);
        assert!(list.is_empty());
        let list = Note::checklist("", vec![ChecklistItem::new(""), ChecklistItem::new("Eggs")]);
        assert!(!list.is_empty());
    }

    #[test]
    fn content_edit_ignored_in_checklist_mode() {
        let note = Note::new(true, NoteColor::Blue).with_field(NoteField::Content("x".into()));
        assert_eq!(note.content(), None);
        assert_eq!(note.items().len(), 1);
    }

    #[test]
    fn switching_to_checklist_splits_lines() {
        let note = Note::text("Gym", "☑ Bench press\nPull ups\n\n")
            .with_field(NoteField::Checklist(true));
        let items = note.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].text, "Bench press");
        assert!(items[0].checked);
        assert_eq!(items[1].text, "Pull ups");
    }

    #[test]
    fn switching_empty_text_to_checklist_gives_one_item() {
        let note = Note::text("", "").with_field(NoteField::Checklist(true));
        assert_eq!(note.items().len(), 1);
        assert!(note.is_empty());
    }

    #[test]
    fn switching_to_text_renders_marks_and_drops_blanks() {
        let note = Note::checklist(
            "Shop",
            vec![
                ChecklistItem::new("Milk"),
                ChecklistItem::new(""),
                ChecklistItem::checked("Eggs"),
            ],
        )
        .with_field(NoteField::Checklist(false));
        assert_eq!(note.content(), Some("☐ Milk\n☑ Eggs"));
        assert!(!note.is_checklist());
    }

    #[test]
    fn color_and_favorite_are_not_content_changes() {
        let note = Note::text("A", "b");
        let recolored = note
            .clone()
            .with_field(NoteField::Color(NoteColor::Pink))
            .with_field(NoteField::Favorite(true));
        assert!(!note.differs_in_content(&recolored));
        let retitled = note.clone().with_field(NoteField::Title("B".into()));
        assert!(note.differs_in_content(&retitled));
        let remoded = note.clone().with_field(NoteField::Checklist(true));
        assert!(note.differs_in_content(&remoded));
    }

    #[test]
    fn matches_is_case_insensitive() {
        let note = Note::text("Q3 Planning", "Focus on user RETENTION");
        assert!(note.matches("planning"));
        assert!(note.matches("retention"));
        assert!(note.matches(""));
        assert!(!note.matches("budget"));

        let list = Note::checklist("Groceries", vec![ChecklistItem::new("Oat Milk")]);
        assert!(list.matches("oat"));
        assert!(!list.matches("eggs"));
    }

    #[test]
    fn share_text_joins_title_and_body() {
        let note = Note::text("Read Later", "Dune");
        assert_eq!(note.share_text(), "Read Later\n\nDune");
        let list = Note::checklist("Shop", vec![ChecklistItem::checked("Milk")]);
        assert_eq!(list.share_text(), "Shop\n\n☑ Milk");
    }

    #[test]
    fn detects_inline_emphasis() {
        assert!(Note::text("", "this is **bold**").has_inline_emphasis());
        assert!(Note::text("", "<STRONG>loud</STRONG>").has_inline_emphasis());
        assert!(Note::text("", "__under__").has_inline_emphasis());
        assert!(!Note::text("", "2 * 3 * 4").has_inline_emphasis());
        assert!(!Note::text("**not content**", "plain").has_inline_emphasis());
        let list = Note::checklist("", vec![ChecklistItem::new("<em>soon</em>")]);
        assert!(list.has_inline_emphasis());
    }

    #[test]
    fn relative_dates() {
        let now = at("2024-10-20T12:00:00Z");
        assert_eq!(relative_date(&(now - Duration::minutes(20)), &now), "Just now");
        assert_eq!(relative_date(&(now - Duration::hours(5)), &now), "5h ago");
        assert_eq!(relative_date(&(now - Duration::hours(30)), &now), "Yesterday");
        assert_eq!(relative_date(&at("2024-10-17T09:00:00Z"), &now), "Thursday");
        assert_eq!(relative_date(&at("2024-10-12T00:00:00Z"), &now), "Oct 12");
    }

    #[test]
    fn record_layout() {
        let mut note = Note::checklist("Shop", vec![ChecklistItem::new("Milk")]);
        note.date = at("2024-10-12T00:00:00Z");
        note.color = NoteColor::Teal;
        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["isChecklist"], true);
        assert_eq!(value["content"], "");
        assert_eq!(value["color"], "teal");
        assert_eq!(value["checklistItems"][0]["text"], "Milk");
        assert_eq!(value["date"], "2024-10-12T00:00:00Z");
    }

    #[test]
    fn record_decodes_with_missing_optional_fields() {
        let id = Uuid::new_v4();
        let json = format!(
            r#"{{"id":"{}","title":"Side Project","date":"2024-10-12T00:00:00.000Z"}}"#,
            id
        );
        let note: Note = serde_json::from_str(&json).unwrap();
        assert_eq!(note.id, id);
        assert_eq!(note.content(), Some(""));
        assert_eq!(note.color, NoteColor::Blue);
        assert!(!note.favorite);
        assert_eq!(note.date, at("2024-10-12T00:00:00Z"));
    }

    #[test]
    fn record_with_unknown_color_is_rejected() {
        let json = format!(
            r#"{{"id":"{}","color":"magenta","date":"2024-10-12T00:00:00Z"}}"#,
            Uuid::new_v4()
        );
        assert!(serde_json::from_str::<Note>(&json).is_err());
    }
}
