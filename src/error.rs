use crate::dispatch::Backend;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("expected {expected} lanes, got {found}")]
    LaneCount { expected: usize, found: usize },

    #[error("lane {lane} has {found} bytes, lane 0 has {expected}")]
    LaneLength { lane: usize, expected: usize, found: usize },

    #[error("lane length {0} is not a multiple of 4")]
    PartialWord(usize),

    #[error("output buffer too short: need {needed} bytes, got {found}")]
    OutputTooShort { needed: usize, found: usize },

    #[error("packed update at byte offset {ptr}, not on a word boundary")]
    PackedOffset { ptr: usize },

    #[error("at most 7 extra bits can be closed, got {}", .0)]
    ExtraBits(u32),

    #[error("backend {} is not supported on this cpu", .0)]
    Unsupported(Backend),

    #[error("vector type {} is not available on this cpu", .0)]
    Unavailable(&'static str),
}

pub type Result<T> = core::result::Result<T, Error>;
