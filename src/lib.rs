#![no_std]
#![warn(clippy::std_instead_of_alloc, clippy::std_instead_of_core)]

//! Multi-lane Shabal-256/512 over a width-agnostic vector layer.
//!
//! - [`simd`]: lane-packed 32-bit word operations, with portable, SSE4.1,
//!   AVX2, AVX-512 and NEON backends.
//! - [`shabal`]: single-lane Shabal, the reference.
//! - [`shabal_simd`]: 4, 8 or 16 Shabal computations in one state.
//! - [`dispatch`]: runtime backend selection and batch hashing.

#[allow(unused_imports)]
#[macro_use]
extern crate alloc;

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

pub mod error;

mod internal;

pub mod simd;

#[macro_use]
pub mod shabal;

pub mod shabal_simd;
pub mod dispatch;
pub mod traits;

pub use dispatch::{Backend, Dispatcher};
pub use error::{Error, Result};
pub use shabal::{Shabal192, Shabal224, Shabal256, Shabal384, Shabal512};
pub use shabal_simd::{
    Shabal256x4, Shabal256x8, Shabal256x16, Shabal512x4, Shabal512x8, Shabal512x16, ShabalX,
};
pub use traits::Hash;
