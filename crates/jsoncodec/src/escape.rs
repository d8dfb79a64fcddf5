//! Accumulates `\uXXXX` escape digits, including surrogate pairs.
//!
//! The buffer takes four ASCII hex digits and yields either a complete
//! scalar, or a request for the low half of a surrogate pair, in which case
//! the lexer must see `\uXXXX` again before the next four digits arrive.

use alloc::{
    format,
    string::{String, ToString},
};

/// Outcome of feeding one hex digit.
pub(crate) enum EscapeStep {
    /// Fewer than four digits accumulated so far.
    NeedMore,
    /// Four digits formed a high surrogate; a `\uXXXX` low half must follow.
    NeedLowSurrogate,
    /// A complete Unicode scalar value.
    Scalar(char),
}

#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    digits: [u8; 4],
    len: u8,
    pending_high: Option<u16>,
}

impl UnicodeEscapeBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Clears accumulated digits and any pending surrogate half.
    pub(crate) fn reset(&mut self) {
        self.len = 0;
        self.pending_high = None;
    }

    /// True if a high surrogate is waiting for its low half.
    pub(crate) fn awaiting_low_surrogate(&self) -> bool {
        self.pending_high.is_some()
    }

    /// Feeds one escape digit. Errors carry a human-readable detail for
    /// `InvalidEscape`.
    pub(crate) fn feed(&mut self, b: u8) -> Result<EscapeStep, String> {
        if !b.is_ascii_hexdigit() {
            return Err(format!("'{}' is not a hex digit", b as char));
        }
        self.digits[self.len as usize] = b;
        self.len += 1;
        if self.len < 4 {
            return Ok(EscapeStep::NeedMore);
        }
        self.len = 0;

        // Four ASCII hex digits always fit u16.
        let hex = core::str::from_utf8(&self.digits).unwrap_or_default();
        let code = u16::from_str_radix(hex, 16).map_err(|e| e.to_string())?;

        match self.pending_high.take() {
            Some(high) => {
                if !(0xDC00..=0xDFFF).contains(&code) {
                    return Err(format!(
                        "expected low surrogate after \\u{high:04X}, found \\u{code:04X}"
                    ));
                }
                let combined =
                    0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(code) - 0xDC00);
                char::from_u32(combined)
                    .map(EscapeStep::Scalar)
                    .ok_or_else(|| format!("invalid scalar value U+{combined:X}"))
            }
            None => {
                if (0xD800..=0xDBFF).contains(&code) {
                    self.pending_high = Some(code);
                    return Ok(EscapeStep::NeedLowSurrogate);
                }
                if (0xDC00..=0xDFFF).contains(&code) {
                    return Err(format!("unpaired low surrogate \\u{code:04X}"));
                }
                // Any other u16 is a valid scalar.
                char::from_u32(u32::from(code))
                    .map(EscapeStep::Scalar)
                    .ok_or_else(|| format!("invalid scalar value U+{code:X}"))
            }
        }
    }
}
