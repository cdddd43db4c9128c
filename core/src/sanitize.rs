//! HTML escaping shared by the server (before prompting) and the client
//! (before rendering a transcript entry).

/// Escape the five markup-significant characters `& < > ' "`.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

/// Inverse of [`escape_html`]. Only the five entities it produces are decoded.
pub fn unescape_html(input: &str) -> String {
    const ENTITIES: [(&str, char); 5] = [
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&#39;", '\''),
        ("&quot;", '"'),
    ];

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    'outer: while let Some(ch) = rest.chars().next() {
        if ch == '&' {
            for (entity, decoded) in ENTITIES {
                if let Some(tail) = rest.strip_prefix(entity) {
                    out.push(decoded);
                    rest = tail;
                    continue 'outer;
                }
            }
        }
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    out
}

/// User text after server-side sanitization: escaped, then trimmed.
///
/// This exact form is embedded in the prompt and is the echo pattern the
/// output filter strips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedInput(String);

impl SanitizedInput {
    pub fn new(raw: &str) -> Self {
        Self(escape_html(raw).trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_replaces_all_markup_characters() {
        let escaped = escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#);
        assert_eq!(
            escaped,
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        for raw in ['<', '>', '\'', '"'] {
            assert!(!escaped.contains(raw), "raw {raw} survived escaping");
        }
    }

    #[test]
    fn escape_leaves_no_bare_ampersand() {
        let escaped = escape_html("a & b && c");
        let bare = escaped
            .match_indices('&')
            .filter(|(idx, _)| !escaped[*idx..].starts_with("&amp;"))
            .count();
        assert_eq!(bare, 0);
    }

    #[test]
    fn unescape_recovers_original() {
        for original in [
            "",
            "plain text",
            r#"<script>alert("x")</script>"#,
            "it's & it isn't",
            "&amp; already escaped",
            "emoji 🚀 & <ü>",
        ] {
            assert_eq!(unescape_html(&escape_html(original)), original);
        }
    }

    #[test]
    fn unescape_ignores_unknown_entities() {
        assert_eq!(unescape_html("&nbsp;&lt;"), "&nbsp;<");
    }

    #[test]
    fn sanitized_input_escapes_then_trims() {
        let input = SanitizedInput::new("   <b>hi</b>\n");
        assert_eq!(input.as_str(), "&lt;b&gt;hi&lt;/b&gt;");
        assert!(SanitizedInput::new(" \t ").is_empty());
    }

    mod properties {
        use proptest::prelude::*;

        use crate::sanitize::{escape_html, unescape_html};

        proptest! {
            #[test]
            fn escaped_text_has_no_raw_markup(text in any::<String>()) {
                let escaped = escape_html(&text);
                for raw in ['<', '>', '\'', '"'] {
                    prop_assert!(!escaped.contains(raw));
                }
                // Every '&' left over starts one of the produced entities.
                for (idx, _) in escaped.match_indices('&') {
                    let rest = &escaped[idx..];
                    prop_assert!(
                        ["&amp;", "&lt;", "&gt;", "&#39;", "&quot;"]
                            .iter()
                            .any(|entity| rest.starts_with(entity))
                    );
                }
            }

            #[test]
            fn unescape_inverts_escape(text in any::<String>()) {
                prop_assert_eq!(unescape_html(&escape_html(&text)), text);
            }

            #[test]
            fn markup_heavy_text_round_trips(text in "[&<>'\"a#;0-9 ]{0,32}") {
                prop_assert_eq!(unescape_html(&escape_html(&text)), text);
            }
        }
    }
}
