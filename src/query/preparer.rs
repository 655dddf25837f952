//! Prepare raw user text before it is sent for prediction

/// Characters removed from every query
pub const PUNCTUATION: &str = r#"!()-[]{};:'"\,<>./?@#$%^&*_~"#;

/// A query ready to be sent to the prediction service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedQuery {
    /// Input with a single trailing newline removed
    pub original: String,
    /// `original` with punctuation removed; this is what gets predicted
    pub text: String,
}

/// Result of preparing a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prepared {
    /// Nothing left to predict
    Empty,
    Query(PreparedQuery),
}

pub struct QueryPreparer;

impl QueryPreparer {
    pub fn prepare(raw: &str) -> Prepared {
        if raw.is_empty() {
            return Prepared::Empty;
        }

        let original = raw.strip_suffix('\n').unwrap_or(raw).to_string();
        let text: String = original
            .chars()
            .filter(|c| !is_punctuation(*c))
            .collect();

        if text.is_empty() {
            return Prepared::Empty;
        }

        Prepared::Query(PreparedQuery { original, text })
    }
}

fn is_punctuation(c: char) -> bool {
    // Only ASCII punctuation is listed, and it has no case
    c.is_ascii() && PUNCTUATION.contains(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(raw: &str) -> String {
        match QueryPreparer::prepare(raw) {
            Prepared::Query(q) => q.text,
            Prepared::Empty => panic!("unexpected empty for {:?}", raw),
        }
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(text_of("go to the next page"), "go to the next page");
    }

    #[test]
    fn test_strips_one_trailing_newline() {
        match QueryPreparer::prepare("read question 2\n\n") {
            Prepared::Query(q) => {
                assert_eq!(q.original, "read question 2\n");
                assert_eq!(q.text, "read question 2\n");
            }
            Prepared::Empty => panic!("expected a query"),
        }
    }

    #[test]
    fn test_punctuation_removed_case_kept() {
        assert_eq!(text_of("What's on Page 3?"), "Whats on Page 3");
        assert_eq!(text_of(r#"a\b "c" (d) [e] {f} <g> ~h_i"#), "ab c d e f g hi");
    }

    #[test]
    fn test_non_listed_symbols_kept() {
        assert_eq!(text_of("2 + 2 = 4 | ok"), "2 + 2 = 4 | ok");
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(QueryPreparer::prepare(""), Prepared::Empty);
        assert_eq!(QueryPreparer::prepare("\n"), Prepared::Empty);
        assert_eq!(QueryPreparer::prepare("?!."), Prepared::Empty);
    }

    #[test]
    fn test_original_keeps_punctuation() {
        match QueryPreparer::prepare("next, please!") {
            Prepared::Query(q) => assert_eq!(q.original, "next, please!"),
            Prepared::Empty => panic!("expected a query"),
        }
    }
}
