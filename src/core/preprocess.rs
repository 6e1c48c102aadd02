//! Document preprocessing
//!
//! Turns the comment-tolerant policy format into strict JSON:
//! - Lines whose first character is `#` are dropped whole
//! - Trailing commas before `]` or `}` are removed (optional)
//!
//! Comments are whole-line only. A `#` after leading whitespace is not a
//! comment and is left for the JSON decoder to reject.

const JSON_WHITESPACE: [char; 4] = [' ', '\t', '\n', '\r'];

/// Remove comment lines, keeping every other line byte-for-byte.
///
/// # Examples
/// ```
/// use path_acl::preprocess::strip_comments;
///
/// assert_eq!(strip_comments("# users\n[]\n"), "[]\n");
/// assert_eq!(strip_comments("# only\n# comments"), "");
/// ```
pub fn strip_comments(text: &str) -> String {
    text.split('\n')
        .filter(|line| !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remove commas that directly follow the last value of an array or object.
///
/// A comma is dropped only when the next significant character closes a
/// container and the previous one ends a value, so `[,]` and `{"a": 1,,}`
/// stay invalid. Commas inside JSON strings are never touched.
pub fn strip_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    // last non-whitespace character kept outside a string
    let mut last = None;

    for (i, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
                last = Some('"');
            }
            out.push(c);
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let rest = text[i + 1..].trim_start_matches(JSON_WHITESPACE);
                let closes = rest.starts_with([']', '}']);
                if !(closes && last.is_some_and(ends_value)) {
                    out.push(c);
                    last = Some(c);
                }
            }
            _ => {
                if !JSON_WHITESPACE.contains(&c) {
                    last = Some(c);
                }
                out.push(c);
            }
        }
    }

    out
}

/// Whether `c` can be the final character of a JSON value.
///
/// `e` ends `true`/`false` (and never a number), `l` ends `null`.
fn ends_value(c: char) -> bool {
    matches!(c, '"' | ']' | '}' | 'e' | 'l') || c.is_ascii_digit()
}

/// Full preprocessing pipeline applied before JSON decoding.
pub fn preprocess(text: &str, allow_trailing_commas: bool) -> String {
    let stripped = strip_comments(text);
    if allow_trailing_commas {
        strip_trailing_commas(&stripped)
    } else {
        stripped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_lines_removed() {
        let doc = "# header\n[\n# inline comment line\n{\"email\": \"a@b.c\"}\n]";
        assert_eq!(strip_comments(doc), "[\n{\"email\": \"a@b.c\"}\n]");
    }

    #[test]
    fn test_whole_line_dropped_including_tail() {
        assert_eq!(strip_comments("#{\"email\": \"a@b\"}\n[]"), "[]");
    }

    #[test]
    fn test_indented_hash_is_not_a_comment() {
        let doc = "[\n  # not a comment\n]";
        assert_eq!(strip_comments(doc), doc);
    }

    #[test]
    fn test_hash_inside_values_kept() {
        let doc = "[{\"email\": \"a#1@b.c\", \"path_restriction_reg\": \"/#anchor\"}]";
        assert_eq!(strip_comments(doc), doc);
    }

    #[test]
    fn test_all_comments_yield_empty() {
        assert_eq!(strip_comments("# a\n# b\n#"), "");
        assert_eq!(strip_comments("# a\n# b\n"), "");
    }

    #[test]
    fn test_crlf_lines() {
        assert_eq!(strip_comments("# c\r\n[]\r\n"), "[]\r\n");
    }

    #[test]
    fn test_trailing_comma_in_array() {
        assert_eq!(strip_trailing_commas("[1, 2, ]"), "[1, 2 ]");
        assert_eq!(
            strip_trailing_commas("[{\"email\": \"a@b\"},\n]"),
            "[{\"email\": \"a@b\"}\n]"
        );
    }

    #[test]
    fn test_trailing_comma_in_object() {
        assert_eq!(
            strip_trailing_commas("{\"email\": \"a@b\",\n}"),
            "{\"email\": \"a@b\"\n}"
        );
    }

    #[test]
    fn test_commas_inside_strings_untouched() {
        let doc = r#"[{"email": "a@b", "note": ",]", "esc": "\",}"}]"#;
        assert_eq!(strip_trailing_commas(doc), doc);
    }

    #[test]
    fn test_double_comma_not_forgiven() {
        assert_eq!(strip_trailing_commas("[1,,]"), "[1,,]");
        assert!(serde_json::from_str::<serde_json::Value>(&strip_trailing_commas("[1,,]")).is_err());
    }

    #[test]
    fn test_comma_without_preceding_value_kept() {
        for doc in ["[,]", "[ , ]", "{,}", "[\n,\n]", "[{\"email\": \"a@b\"}, [,]]"] {
            assert_eq!(strip_trailing_commas(doc), doc);
        }
        assert_eq!(strip_trailing_commas("{\"a\": ,}"), "{\"a\": ,}");
    }

    #[test]
    fn test_comma_after_literals_forgiven() {
        assert_eq!(strip_trailing_commas("[true, false, null,]"), "[true, false, null]");
        assert_eq!(strip_trailing_commas("[1.5e3, -2,]"), "[1.5e3, -2]");
        assert_eq!(strip_trailing_commas("[[1], {},\n]"), "[[1], {}\n]");
        assert_eq!(strip_trailing_commas("[\"x\" , ]"), "[\"x\"  ]");
    }

    #[test]
    fn test_preprocess_strict_mode_keeps_commas() {
        assert_eq!(preprocess("# c\n[1,]", false), "[1,]");
        assert_eq!(preprocess("# c\n[1,]", true), "[1]");
    }
}
