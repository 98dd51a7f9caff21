use serde::{Deserialize, Serialize};
use uuid::Uuid;

const CHECKED_MARK: char = '☑';
const UNCHECKED_MARK: char = '☐';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: Uuid,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub checked: bool,
}

impl ChecklistItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            checked: false,
        }
    }

    pub fn checked(text: impl Into<String>) -> Self {
        Self {
            checked: true,
            ..Self::new(text)
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Render as a single `☑ text` / `☐ text` line.
    pub fn to_line(&self) -> String {
        let mark = if self.checked { CHECKED_MARK } else { UNCHECKED_MARK };
        format!("{} {}", mark, self.text)
    }
}

/// Render items one per line, checked state as a leading mark.
pub fn items_to_text(items: &[ChecklistItem]) -> String {
    items
        .iter()
        .map(ChecklistItem::to_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split text into items, one per non-empty line.
/// A leading `☑` marks the item checked; leading marks are stripped.
pub fn text_to_items(text: &str) -> Vec<ChecklistItem> {
    text.lines()
        .filter_map(|line| {
            let checked = line.starts_with(CHECKED_MARK);
            let stripped = line
                .strip_prefix(CHECKED_MARK)
                .or_else(|| line.strip_prefix(UNCHECKED_MARK))
                .map(str::trim_start)
                .unwrap_or(line);
            if stripped.trim().is_empty() {
                return None;
            }
            let mut item = ChecklistItem::new(stripped);
            item.checked = checked;
            Some(item)
        })
        .collect()
}

/// Text and checked state, ignoring ids.
pub fn same_entries(a: &[ChecklistItem], b: &[ChecklistItem]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| x.text == y.text && x.checked == y.checked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_render_with_marks() {
        let items = vec![ChecklistItem::new("Milk"), ChecklistItem::checked("Eggs")];
        assert_eq!(items_to_text(&items), "☐ Milk\n☑ Eggs");
    }

    #[test]
    fn text_parses_marks_and_skips_blank_lines() {
        let items = text_to_items("☑ Oat milk\n\n☐  Avocados\nCoffee beans\n☐");
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].text, "Oat milk");
        assert!(items[0].checked);
        assert_eq!(items[1].text, "Avocados");
        assert!(!items[1].checked);
        assert_eq!(items[2].text, "Coffee beans");
        assert!(!items[2].checked);
    }

    #[test]
    fn text_roundtrip_keeps_entries() {
        let items = vec![
            ChecklistItem::checked("Bench press"),
            ChecklistItem::new("Pull ups"),
        ];
        let parsed = text_to_items(&items_to_text(&items));
        assert!(same_entries(&items, &parsed));
        assert_ne!(items[0].id, parsed[0].id);
    }

    #[test]
    fn same_entries_compares_text_and_state() {
        let a = vec![ChecklistItem::new("Milk")];
        let mut b = a.clone();
        b[0].id = Uuid::new_v4();
        assert!(same_entries(&a, &b));
        b[0].checked = true;
        assert!(!same_entries(&a, &b));
        assert!(!same_entries(&a, &[]));
    }

    #[test]
    fn blank_means_whitespace_only() {
        assert!(ChecklistItem::new("  ").is_blank());
        assert!(!ChecklistItem::new(" x ").is_blank());
    }

    #[test]
    fn deserializes_without_text_or_checked() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"id":"{}"}}"#, id);
        let item: ChecklistItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item.id, id);
        assert_eq!(item.text, "");
        assert!(!item.checked);
    }
}
