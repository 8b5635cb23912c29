use std::borrow::Cow;

pub const COMMENT_MARKER: &str = ";;";
pub const START_MARKERS: [&str; 2] = ["::BEGIN", "::START"];
pub const END_MARKER: &str = "::END";

/// Strips carriage returns, truncates at the first `;;` and trims both ends.
/// An empty result means the line holds nothing to execute.
pub fn normalize(raw: &str) -> Cow<'_, str> {
    fn cut(line: &str) -> &str {
        let line = match line.find(COMMENT_MARKER) {
            Some(pos) => &line[..pos],
            None => line,
        };
        line.trim()
    }

    if raw.contains('\r') {
        Cow::Owned(cut(&raw.replace('\r', "")).to_string())
    } else {
        Cow::Borrowed(cut(raw))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LineKind<'a> {
    Start { name: Option<&'a str> },
    End,
    Body(&'a str),
}

// Start markers match by prefix, the end marker by full comparison.
pub fn classify(line: &str) -> LineKind<'_> {
    if START_MARKERS.iter().any(|marker| line.starts_with(marker)) {
        let name = line.split_whitespace().nth(1);
        return LineKind::Start { name };
    }

    if line == END_MARKER {
        return LineKind::End;
    }

    LineKind::Body(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_inline_comments() {
        assert_eq!(normalize("Deci 65 ;; capital a"), "Deci 65");
    }

    #[test]
    fn pure_comment_line_is_empty() {
        assert_eq!(normalize("  ;; nothing to run here"), "");
    }

    #[test]
    fn strips_carriage_returns() {
        assert_eq!(normalize("Deci 65\r"), "Deci 65");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(normalize("   ::END\t "), "::END");
    }

    #[test]
    fn classifies_start_with_name() {
        assert_eq!(
            classify("::BEGIN greeter"),
            LineKind::Start {
                name: Some("greeter")
            }
        );
    }

    #[test]
    fn classifies_start_without_name() {
        assert_eq!(classify("::START"), LineKind::Start { name: None });
    }

    #[test]
    fn start_marker_matches_by_prefix() {
        assert_eq!(classify("::BEGINNING"), LineKind::Start { name: None });
    }

    #[test]
    fn end_marker_matches_exactly() {
        assert_eq!(classify("::END"), LineKind::End);
        assert_eq!(classify("::END trailing"), LineKind::Body("::END trailing"));
    }

    #[test]
    fn anything_else_is_body() {
        assert_eq!(classify("Hexa 41"), LineKind::Body("Hexa 41"));
    }
}
