//! x86_64 backends. Each type wraps one native register.

mod avx2;
mod avx512;
mod sse;

pub use avx2::V256;
pub use avx512::V512;
pub use sse::V128;
