//! Input for the record parser
//!
//! Partial input, so a message cut short reports `Incomplete` instead of a parse error.

use winnow::{Bytes, Partial, stream::Stream as _};

pub type Stream<'i> = Partial<&'i Bytes>;

pub fn new(bytes: &[u8]) -> Stream<'_> {
    Partial::new(Bytes::new(bytes))
}

/// Bytes left to parse
pub fn remaining(input: &Stream<'_>) -> usize {
    input.eof_offset()
}
