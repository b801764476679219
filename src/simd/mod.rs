//! Width-agnostic vector operations over lane-packed 32-bit words.
//!
//! A [`Vector`] holds one 32-bit word for each of `LANES` independent hash
//! computations. All operations are elementwise, except the shuffle family
//! which permutes words within each 128-bit group.
//!
//! Backends:
//! - [`Lanes<N>`](portable::Lanes), a portable reference for 4, 8 or 16 lanes.
//! - `amd64::{V128, V256, V512}` for SSE4.1, AVX2 and AVX-512 on x86_64.
//! - `aarch64::V128` for NEON.
//!
//! The constructors are `unsafe`: a backend value may only be created on a
//! cpu for which [`Vector::available`] returns true. Once a value exists the
//! elementwise ops are safe. The state types in [`crate::shabal_simd`] check
//! availability once, in `new`.
//!
//! The ops are `#[inline(always)]` wrappers around intrinsics, which only
//! inline inside a function compiled with the backend's target features.
//! Hot loops therefore run as a [`Kernel`] through [`Vector::dispatch`].

use core::fmt;

use crate::error::{Error, Result};

pub use crate::internal::{Aligned16, Aligned32, Aligned64};

pub mod portable;
pub use portable::Lanes;

#[cfg(target_arch = "x86_64")]
pub mod amd64;

#[cfg(target_arch = "aarch64")]
pub mod aarch64;

pub const BLOCK_BYTES: usize = 64;
/// Number of 32-bit words in one block.
pub const BLOCK_WORDS: usize = BLOCK_BYTES / 4;

/// Work run with a backend's target features enabled. `run` and everything
/// it calls should be `#[inline(always)]` so the vector ops end up in the
/// feature context.
pub trait Kernel<V: Vector> {
    type Output;

    fn run(self) -> Self::Output;
}

pub trait Vector: Copy + fmt::Debug + Send + Sync + 'static {
    const LANES: usize;
    const NAME: &'static str;

    /// Scalar view of one vector, aligned to the vector width.
    type Words: Copy + Default + AsRef<[u32]> + AsMut<[u32]>;

    /// Whether the running cpu supports this backend.
    fn available() -> bool;

    /// Run `k` inside a function compiled for this backend.
    ///
    /// # Safety
    ///
    /// [`Self::available`] must be true.
    unsafe fn dispatch<K: Kernel<Self>>(k: K) -> K::Output;

    /// # Safety
    ///
    /// [`Self::available`] must be true, as for every constructor.
    unsafe fn zero() -> Self;
    /// # Safety
    ///
    /// [`Self::available`] must be true.
    unsafe fn splat(x: u32) -> Self;
    /// # Safety
    ///
    /// [`Self::available`] must be true.
    unsafe fn load(src: &Self::Words) -> Self;
    fn store(self, dst: &mut Self::Words);

    fn add32(self, b: Self) -> Self;
    fn sub32(self, b: Self) -> Self;
    fn mullo32(self, b: Self) -> Self;

    fn and(self, b: Self) -> Self;
    fn or(self, b: Self) -> Self;
    fn xor(self, b: Self) -> Self;
    /// `!self & b`
    fn andnot(self, b: Self) -> Self;

    fn shl32<const N: i32>(self) -> Self;
    fn shr32<const N: i32>(self) -> Self;
    fn rol32<const N: i32>(self) -> Self;
    fn ror32<const N: i32>(self) -> Self;

    /// All ones where equal.
    fn cmpeq32(self, b: Self) -> Self;
    /// All ones where `self > b` as signed words.
    fn cmpgt32(self, b: Self) -> Self;

    /// `[a1, a2, a3, a0]` in each 128-bit group.
    fn shuflr32(self) -> Self;
    /// `[a3, a0, a1, a2]` in each 128-bit group.
    fn shufll32(self) -> Self;
    /// `[a3, a2, a1, a0]` in each 128-bit group.
    fn rev32(self) -> Self;
    /// `[a2, a3, a0, a1]` in each 128-bit group.
    fn swap64(self) -> Self;
    /// `[a1, a0, a3, a2]` in each 128-bit group.
    fn swap64_32(self) -> Self;

    /// Reverse the bytes of every word.
    fn bswap32(self) -> Self;

    #[inline(always)]
    fn to_words(self) -> Self::Words {
        let mut w = Self::Words::default();
        self.store(&mut w);
        w
    }

    /// # Safety
    ///
    /// [`Self::available`] must be true.
    #[inline(always)]
    unsafe fn from_fn(f: impl FnMut(usize) -> u32) -> Self {
        let mut w = Self::Words::default();
        let mut f = f;
        for (i, x) in w.as_mut().iter_mut().enumerate() {
            *x = f(i);
        }
        unsafe { Self::load(&w) }
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> u32 {
        self.to_words().as_ref()[lane]
    }

    // Safety for the defaults below: `self` exists, so the backend is
    // available.

    #[inline(always)]
    fn not(self) -> Self {
        self.xor(unsafe { Self::splat(u32::MAX) })
    }

    #[inline(always)]
    fn nor(self, b: Self) -> Self {
        self.or(b).not()
    }

    #[inline(always)]
    fn xnor(self, b: Self) -> Self {
        self.xor(b).not()
    }

    #[inline(always)]
    fn negate32(self) -> Self {
        unsafe { Self::zero() }.sub32(self)
    }

    #[inline(always)]
    fn cmplt32(self, b: Self) -> Self {
        b.cmpgt32(self)
    }

    #[inline(always)]
    fn add4_32(self, b: Self, c: Self, d: Self) -> Self {
        self.add32(b).add32(c.add32(d))
    }

    #[inline(always)]
    fn xor3(self, b: Self, c: Self) -> Self {
        self.xor(b.xor(c))
    }

    #[inline(always)]
    fn xor4(self, b: Self, c: Self, d: Self) -> Self {
        self.xor(b).xor(c.xor(d))
    }

    #[inline(always)]
    fn and3(self, b: Self, c: Self) -> Self {
        self.and(b.and(c))
    }

    #[inline(always)]
    fn or3(self, b: Self, c: Self) -> Self {
        self.or(b.or(c))
    }

    /// `self ^ (b & c)`
    #[inline(always)]
    fn xorand(self, b: Self, c: Self) -> Self {
        self.xor(b.and(c))
    }

    /// `self & (b ^ c)`
    #[inline(always)]
    fn andxor(self, b: Self, c: Self) -> Self {
        self.and(b.xor(c))
    }

    /// `self ^ (b | c)`
    #[inline(always)]
    fn xoror(self, b: Self, c: Self) -> Self {
        self.xor(b.or(c))
    }

    /// `self ^ (!b & c)`
    #[inline(always)]
    fn xorandnot(self, b: Self, c: Self) -> Self {
        self.xor(b.andnot(c))
    }

    /// `self | (b & c)`
    #[inline(always)]
    fn orand(self, b: Self, c: Self) -> Self {
        self.or(b.and(c))
    }

    #[inline(always)]
    fn block_bswap32(block: &mut [Self; BLOCK_WORDS]) {
        for v in block.iter_mut() {
            *v = v.bswap32();
        }
    }

    /// Gather one 64-byte block from each lane: word `w` of lane `l` is the
    /// little endian word at `lanes[l][4w..4w + 4]`. Panics if fewer than
    /// `LANES` blocks are given.
    ///
    /// # Safety
    ///
    /// [`Self::available`] must be true.
    #[inline(always)]
    unsafe fn load_block(lanes: &[&[u8; BLOCK_BYTES]]) -> [Self; BLOCK_WORDS] {
        debug_assert_eq!(lanes.len(), Self::LANES);
        core::array::from_fn(|w| unsafe {
            Self::from_fn(|l| {
                let b = &lanes[l][4 * w..4 * w + 4];
                u32::from_le_bytes([b[0], b[1], b[2], b[3]])
            })
        })
    }
}

/// AES single rounds on every 128-bit group, with Intel `aesenc` semantics.
/// A group holds the AES state bytes in little endian word order.
///
/// The rounds need cpu support beyond the base backend, so each one is
/// `unsafe` and requires [`AesRound::aes_available`].
pub trait AesRound: Vector {
    fn aes_available() -> bool;

    /// `MixColumns(SubBytes(ShiftRows(self))) ^ key`
    ///
    /// # Safety
    ///
    /// [`Self::aes_available`] must be true, for all four rounds.
    unsafe fn aesenc(self, key: Self) -> Self;
    /// `SubBytes(ShiftRows(self)) ^ key`
    unsafe fn aesenclast(self, key: Self) -> Self;
    /// `InvMixColumns(InvSubBytes(InvShiftRows(self))) ^ key`
    unsafe fn aesdec(self, key: Self) -> Self;
    /// `InvSubBytes(InvShiftRows(self)) ^ key`
    unsafe fn aesdeclast(self, key: Self) -> Self;
}

pub(crate) fn check_lanes<V: Vector>(lanes: &[&[u8]]) -> Result<usize> {
    if lanes.len() != V::LANES {
        return Err(Error::LaneCount { expected: V::LANES, found: lanes.len() });
    }
    let len = lanes[0].len();
    for (i, lane) in lanes.iter().enumerate().skip(1) {
        if lane.len() != len {
            return Err(Error::LaneLength { lane: i, expected: len, found: lane.len() });
        }
    }
    Ok(len)
}

/// Pack `LANES` equal-length byte streams into lane-packed words: word `i` of
/// `out` holds the i-th little endian word of every lane. Returns the number
/// of words written.
pub fn interleave<V: Vector>(lanes: &[&[u8]], out: &mut [V]) -> Result<usize> {
    let len = check_lanes::<V>(lanes)?;
    if len % 4 != 0 {
        return Err(Error::PartialWord(len));
    }
    let n = len / 4;
    if out.len() < n {
        return Err(Error::OutputTooShort { needed: n * 4 * V::LANES, found: out.len() * 4 * V::LANES });
    }
    for (i, v) in out[..n].iter_mut().enumerate() {
        // Safety: `out` holds values of `V`, so the backend is available.
        *v = unsafe {
            V::from_fn(|l| {
                let b = &lanes[l][4 * i..4 * i + 4];
                u32::from_le_bytes([b[0], b[1], b[2], b[3]])
            })
        };
    }
    Ok(n)
}

/// Inverse of [`interleave`]: lane `l` gets `words.len() * 4` bytes written
/// contiguously at `out[l * words.len() * 4..]`.
pub fn deinterleave<V: Vector>(words: &[V], out: &mut [u8]) -> Result<()> {
    let lane_bytes = words.len() * 4;
    let needed = lane_bytes * V::LANES;
    if out.len() < needed {
        return Err(Error::OutputTooShort { needed, found: out.len() });
    }
    for (i, v) in words.iter().enumerate() {
        let w = v.to_words();
        for (l, x) in w.as_ref().iter().enumerate() {
            let at = l * lane_bytes + 4 * i;
            out[at..at + 4].copy_from_slice(&x.to_le_bytes());
        }
    }
    Ok(())
}
