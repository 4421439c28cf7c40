use crate::domain::model::{NormalizedNote, Note, UNTITLED};

/// Titles at least this long are moved into the body as well.
pub const TITLE_OVERFLOW_THRESHOLD: usize = 250;
/// Characters kept from an overflowing title. One more than the threshold;
/// existing exports depend on it.
pub const TITLE_TRUNCATED_LENGTH: usize = 251;

const TITLE_LINE_BREAK: &str = "   ";
const BODY_LINE_BREAK: &str = "<br/>";

pub fn normalize(note: Note) -> NormalizedNote {
    let Note {
        title, text, labels, ..
    } = note;

    let untitled = title.is_empty();
    let mut title = title
        .into_iter()
        .next()
        .unwrap_or_else(|| UNTITLED.to_string());

    title = title
        .replace('\n', TITLE_LINE_BREAK)
        .replace('\r', TITLE_LINE_BREAK);
    let title_len = title.chars().count();
    title = title.replace('&', "_");

    let mut text = text;
    let title_truncated = title_len >= TITLE_OVERFLOW_THRESHOLD;
    if title_truncated {
        text = format!("{}{}", title, text);
        title = title.chars().take(TITLE_TRUNCATED_LENGTH).collect();
    }

    let text = text
        .replace('\n', BODY_LINE_BREAK)
        .replace('\r', BODY_LINE_BREAK)
        .replace('&', "_");

    NormalizedNote {
        title,
        text,
        labels,
        untitled,
        title_truncated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(title: &[&str], text: &str) -> Note {
        Note {
            title: title.iter().map(|s| s.to_string()).collect(),
            text: text.to_string(),
            labels: vec![],
            archived: false,
        }
    }

    #[test]
    fn test_first_fragment_is_title() {
        let normalized = normalize(note(&["Grocery List", "ignored"], "milk\nbread"));

        assert_eq!(normalized.title, "Grocery List");
        assert_eq!(normalized.text, "milk<br/>bread");
        assert!(!normalized.untitled);
        assert!(!normalized.title_truncated);
    }

    #[test]
    fn test_missing_title_falls_back() {
        let normalized = normalize(note(&[], "body"));

        assert_eq!(normalized.title, "No title");
        assert!(normalized.untitled);
    }

    #[test]
    fn test_title_line_breaks_become_three_spaces() {
        let normalized = normalize(note(&["a\r\nb\nc"], ""));
        assert_eq!(normalized.title, "a      b   c");
    }

    #[test]
    fn test_ampersands_neutralized() {
        let normalized = normalize(note(&["Tom & Jerry"], "salt & pepper\r\n"));

        assert_eq!(normalized.title, "Tom _ Jerry");
        assert_eq!(normalized.text, "salt _ pepper<br/><br/>");
    }

    #[test]
    fn test_short_title_untouched() {
        let title = "x".repeat(249);
        let normalized = normalize(note(&[&title], "body"));

        assert_eq!(normalized.title, title);
        assert_eq!(normalized.text, "body");
        assert!(!normalized.title_truncated);
    }

    #[test]
    fn test_title_at_threshold_overflows() {
        let title = "y".repeat(250);
        let normalized = normalize(note(&[&title], "body"));

        // 250 個字元小於截斷長度 251，標題保持完整
        assert_eq!(normalized.title, title);
        assert_eq!(normalized.text, format!("{}body", title));
        assert!(normalized.title_truncated);
    }

    #[test]
    fn test_long_title_truncated_and_prepended() {
        let title: String = (0..260).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let normalized = normalize(note(&[&title], "original body"));

        assert_eq!(normalized.title.chars().count(), 251);
        assert_eq!(normalized.title, title[..251]);
        assert_eq!(normalized.text, format!("{}original body", title));
    }

    #[test]
    fn test_length_measured_after_line_break_expansion() {
        // 84 個換行展開為 252 個空白
        let title = "\n".repeat(84);
        let normalized = normalize(note(&[&title], ""));

        assert!(normalized.title_truncated);
        assert_eq!(normalized.title, " ".repeat(251));
        assert_eq!(normalized.text, " ".repeat(252));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let title = "ü".repeat(200);
        let normalized = normalize(note(&[&title], ""));
        assert!(!normalized.title_truncated);
    }

    #[test]
    fn test_labels_preserved() {
        let mut source = note(&["t"], "");
        source.labels = vec!["b".to_string(), "a".to_string(), "Archive".to_string()];

        let normalized = normalize(source);
        assert_eq!(normalized.labels, vec!["b", "a", "Archive"]);
    }
}
