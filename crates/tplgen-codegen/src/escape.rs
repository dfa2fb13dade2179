/// Serialize raw template text into the body of a quoted string literal.
///
/// Backslashes are doubled, occurrences of `quote` are backslash-escaped,
/// and every line break (`\r\n` or `\n`) is rewritten according to the
/// line-break policy:
///
/// - `raw`: the literal is split across physical source lines. Each break
///   becomes an escaped `\n` token, a closing quote, a ` +` continuation,
///   a physical newline, `indent`, and a reopening quote, so the generated
///   source stays readable while still denoting a single string value.
/// - non-`raw`: each break becomes a bare escaped `\n` token on one line.
///
/// The result is valid between two `quote` delimiters. Empty input is
/// valid and returned as-is.
pub fn escape(source: &str, quote: char, raw: bool, indent: &str) -> String {
    let escaped = source
        .replace('\\', "\\\\")
        .replace(quote, &format!("\\{quote}"));

    let line = if raw {
        format!("\\n{quote} +\n{indent}{quote}")
    } else {
        "\\n".to_string()
    };

    escaped.replace("\r\n", "\n").replace('\n', &line)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn no_line_breaks_is_mode_independent() {
        let text = "<p>hi</p>";
        assert_eq!(escape(text, '"', true, "    "), "<p>hi</p>");
        assert_eq!(escape(text, '"', false, "    "), "<p>hi</p>");
    }

    #[test]
    fn escapes_backslashes_then_quotes() {
        assert_eq!(escape(r"a\b", '\'', false, ""), r"a\\b");
        assert_eq!(escape("it's", '\'', false, ""), r"it\'s");
        // A backslash before a quote escapes both independently
        assert_eq!(escape(r"\'", '\'', false, ""), r"\\\'");
    }

    #[test]
    fn other_quote_char_is_untouched() {
        assert_eq!(escape("say \"hi\"", '\'', false, ""), "say \"hi\"");
        assert_eq!(escape("say \"hi\"", '"', false, ""), "say \\\"hi\\\"");
    }

    #[test]
    fn non_raw_has_no_physical_newlines() {
        let out = escape("<p>\nyo\n</p>", '"', false, "  ");
        assert!(!out.contains('\n'));
        assert_eq!(out, "<p>\\nyo\\n</p>");
    }

    #[test]
    fn raw_splits_literal_across_lines() {
        let out = escape("<p>\nyo</p>", '"', true, "        ");
        assert_eq!(out, "<p>\\n\" +\n        \"yo</p>");
        // One physical line per template line
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn crlf_counts_as_one_break() {
        let out = escape("a\r\nb", '\'', true, "");
        assert_eq!(out, "a\\n' +\n'b");
        assert_eq!(escape("a\r\nb", '\'', false, ""), "a\\nb");
    }

    #[test]
    fn empty_input_is_valid() {
        assert_eq!(escape("", '\'', true, "    "), "");
    }
}
