//! Shared utility functions.

use std::borrow::Cow;

/// Produce a short single-line preview of `s` for log output.
///
/// Newlines are collapsed to spaces and the result is truncated to at most
/// `max_bytes` without splitting a UTF-8 character boundary. Truncation is
/// marked with a trailing ellipsis.
pub fn preview(s: &str, max_bytes: usize) -> Cow<'_, str> {
    let needs_flatten = s.contains(['\n', '\r']);

    if !needs_flatten && s.len() <= max_bytes {
        return Cow::Borrowed(s);
    }

    let flat: Cow<'_, str> = if needs_flatten {
        Cow::Owned(
            s.split_whitespace().collect::<Vec<_>>().join(" "),
        )
    } else {
        Cow::Borrowed(s)
    };

    if flat.len() <= max_bytes {
        return Cow::Owned(flat.into_owned());
    }

    let mut end = max_bytes;
    while end > 0 && !flat.is_char_boundary(end) {
        end -= 1;
    }
    Cow::Owned(format!("{}…", &flat[..end]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_short_string_is_borrowed() {
        assert_eq!(preview("hello", 10), "hello");
    }

    #[test]
    fn preview_truncates_with_ellipsis() {
        assert_eq!(preview("hello world", 5), "hello…");
    }

    #[test]
    fn preview_flattens_newlines() {
        assert_eq!(preview("a\nb\r\nc", 20), "a b c");
    }

    #[test]
    fn preview_respects_multibyte_boundary() {
        // 'の' is 3 bytes; cutting at byte 4 must back up to the boundary
        let s = "あのね";
        assert_eq!(preview(s, 4), "あ…");
        assert_eq!(preview(s, 6), "あの…");
    }

    #[test]
    fn preview_empty() {
        assert_eq!(preview("", 10), "");
    }
}
