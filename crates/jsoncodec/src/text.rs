//! String finalization and escaping shared by parser and generator.

use alloc::{string::String, vec::Vec};

use bstr::ByteSlice;

/// Materializes accumulated string bytes.
///
/// With `validate` set, ill-formed UTF-8 is an error (`None`); otherwise
/// ill-formed sequences are replaced with U+FFFD.
pub(crate) fn finalize_string(bytes: &[u8], validate: bool) -> Option<String> {
    match bytes.to_str() {
        Ok(s) => Some(s.into()),
        Err(_) if validate => None,
        Err(_) => Some(bytes.to_str_lossy().into_owned()),
    }
}

/// Appends `s` to `out` as a quoted JSON string, escaping `"`, `\`, control
/// characters, and (when `escape_solidus` is set) `/`.
pub(crate) fn push_quoted(out: &mut Vec<u8>, s: &str, escape_solidus: bool) {
    out.push(b'"');
    for chunk in s.split_inclusive(needs_escape(escape_solidus)) {
        match chunk.as_bytes().last() {
            Some(last) if needs_escape(escape_solidus)(char::from(*last)) => {
                out.extend_from_slice(&chunk.as_bytes()[..chunk.len() - 1]);
                push_escape(out, *last);
            }
            _ => out.extend_from_slice(chunk.as_bytes()),
        }
    }
    out.push(b'"');
}

/// [`push_quoted`] for a formatter, used by the `Display` impl of
/// [`crate::Value`]. Never escapes the solidus, matching default generator
/// options.
pub(crate) fn fmt_quoted(f: &mut core::fmt::Formatter<'_>, s: &str) -> core::fmt::Result {
    f.write_str("\"")?;
    for chunk in s.split_inclusive(needs_escape(false)) {
        match chunk.chars().next_back() {
            Some(last) if needs_escape(false)(last) => {
                f.write_str(&chunk[..chunk.len() - last.len_utf8()])?;
                fmt_escape(f, last as u8)?;
            }
            _ => f.write_str(chunk)?,
        }
    }
    f.write_str("\"")
}

fn needs_escape(escape_solidus: bool) -> impl Fn(char) -> bool {
    move |c| c < '\u{20}' || c == '"' || c == '\\' || (escape_solidus && c == '/')
}

fn fmt_escape(f: &mut core::fmt::Formatter<'_>, b: u8) -> core::fmt::Result {
    match b {
        b'"' => f.write_str("\\\""),
        b'\\' => f.write_str("\\\\"),
        0x08 => f.write_str("\\b"),
        0x0C => f.write_str("\\f"),
        b'\n' => f.write_str("\\n"),
        b'\r' => f.write_str("\\r"),
        b'\t' => f.write_str("\\t"),
        _ => write!(f, "\\u{b:04x}"),
    }
}

fn push_escape(out: &mut Vec<u8>, b: u8) {
    match b {
        b'"' => out.extend_from_slice(b"\\\""),
        b'\\' => out.extend_from_slice(b"\\\\"),
        b'/' => out.extend_from_slice(b"\\/"),
        0x08 => out.extend_from_slice(b"\\b"),
        0x0C => out.extend_from_slice(b"\\f"),
        b'\n' => out.extend_from_slice(b"\\n"),
        b'\r' => out.extend_from_slice(b"\\r"),
        b'\t' => out.extend_from_slice(b"\\t"),
        _ => {
            const HEX: &[u8; 16] = b"0123456789abcdef";
            out.extend_from_slice(b"\\u00");
            out.push(HEX[usize::from(b >> 4)]);
            out.push(HEX[usize::from(b & 0x0F)]);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{finalize_string, push_quoted};

    fn quoted(s: &str, solidus: bool) -> Vec<u8> {
        let mut out = Vec::new();
        push_quoted(&mut out, s, solidus);
        out
    }

    #[test]
    fn plain_strings_pass_through() {
        assert_eq!(quoted("hello", false), b"\"hello\"");
        assert_eq!(quoted("héllo🙂", false), "\"héllo🙂\"".as_bytes());
    }

    #[test]
    fn specials_are_escaped() {
        assert_eq!(quoted("a\"b", false), b"\"a\\\"b\"");
        assert_eq!(quoted("a\\b", false), b"\"a\\\\b\"");
        assert_eq!(quoted("a\nb\tc", false), b"\"a\\nb\\tc\"");
        assert_eq!(quoted("\u{08}\u{0C}\r", false), b"\"\\b\\f\\r\"");
        assert_eq!(quoted("\u{01}", false), b"\"\\u0001\"");
    }

    #[test]
    fn solidus_escaped_only_on_request() {
        assert_eq!(quoted("a/b", false), b"\"a/b\"");
        assert_eq!(quoted("a/b", true), b"\"a\\/b\"");
    }

    #[test]
    fn finalize_validates_or_replaces() {
        assert_eq!(finalize_string(b"ok", true).as_deref(), Some("ok"));
        assert_eq!(finalize_string(b"\xFFok", true), None);
        assert_eq!(
            finalize_string(b"\xFFok", false).as_deref(),
            Some("\u{FFFD}ok")
        );
    }
}
