//! Incremental matcher for the `true`, `false`, and `null` literals.

/// Which literal completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Literal {
    Null,
    True,
    False,
}

/// What happened after feeding one more byte into the matcher.
pub(crate) enum Step {
    /// Byte matched, literal not finished yet.
    NeedMore,
    /// Byte matched and completed the literal.
    Done(Literal),
    /// Byte did not match the expected one.
    Reject,
}

/// `None` when no literal is in flight; `Some((remaining, literal))` while
/// matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LiteralMatcher(Option<(&'static [u8], Literal)>);

impl LiteralMatcher {
    pub(crate) fn none() -> Self {
        LiteralMatcher(None)
    }

    /// Starts matching after the first byte (`n`, `t`, or `f`).
    pub(crate) fn new(first: u8) -> Self {
        match first {
            b'n' => LiteralMatcher(Some((b"ull", Literal::Null))),
            b't' => LiteralMatcher(Some((b"rue", Literal::True))),
            b'f' => LiteralMatcher(Some((b"alse", Literal::False))),
            _ => LiteralMatcher::none(),
        }
    }

    /// Feeds the next input byte and reports how to proceed.
    pub(crate) fn step(&mut self, b: u8) -> Step {
        let Some((bytes, literal)) = self.0 else {
            return Step::Reject;
        };

        match bytes.split_first() {
            Some((expected, rest)) if *expected == b => {
                if rest.is_empty() {
                    self.0 = None;
                    Step::Done(literal)
                } else {
                    self.0 = Some((rest, literal));
                    Step::NeedMore
                }
            }
            _ => Step::Reject,
        }
    }
}
