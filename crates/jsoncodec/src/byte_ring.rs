//! Byte ring buffering unread parser input.
//!
//! `feed` chunks are appended at the tail; the lexer peeks and consumes one
//! byte at a time from the head. The ring never rewinds, supporting pure
//! forward streaming, and `copy_while` gives the lexer a bulk path for runs
//! of string or digit bytes.

use alloc::{collections::VecDeque, vec::Vec};

#[derive(Debug, Default)]
pub(crate) struct ByteRing {
    data: VecDeque<u8>,
}

impl ByteRing {
    pub(crate) fn new() -> Self {
        Self {
            data: VecDeque::new(),
        }
    }

    pub(crate) fn push(&mut self, bytes: &[u8]) {
        self.data.reserve(bytes.len());
        self.data.extend(bytes);
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.data.front().copied()
    }

    pub(crate) fn next(&mut self) -> Option<u8> {
        self.data.pop_front()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Discards everything currently buffered, returning the number of bytes
    /// dropped.
    pub(crate) fn drain_all(&mut self) -> usize {
        let n = self.data.len();
        self.data.clear();
        n
    }

    /// Copies consecutive head bytes matching `pred` into `dst` and consumes
    /// them, returning the count copied. Stops at the first non-matching byte
    /// or when the ring drains.
    pub(crate) fn copy_while<F: Fn(u8) -> bool>(&mut self, dst: &mut Vec<u8>, pred: F) -> usize {
        let mut copied = 0;
        loop {
            let (front, back) = self.data.as_slices();
            let slice = if front.is_empty() { back } else { front };
            if slice.is_empty() {
                return copied;
            }
            let run = slice.iter().take_while(|b| pred(**b)).count();
            if run == 0 {
                return copied;
            }
            dst.extend_from_slice(&slice[..run]);
            self.data.drain(..run);
            copied += run;
        }
    }
}
