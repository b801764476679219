//! Multi-lane Shabal: one state drives `V::LANES` independent hashes in
//! lockstep, one 32-bit word per lane in every vector.
//!
//! All lanes must be fed the same number of bytes. Lane `l` of the digest is
//! written to `out[l * DIGEST_SIZE..(l + 1) * DIGEST_SIZE]`.

mod compress;

use compress::{Absorb, Finish, Flush};

use crate::error::{Error, Result};
use crate::shabal::{Counter, initial_state, pad_byte};
use crate::simd::{BLOCK_BYTES, BLOCK_WORDS, Lanes, Vector, check_lanes, deinterleave};

/// `V::LANES` parallel Shabal computations with a `DIGEST_SIZE`-byte output.
///
/// The IV is broadcast lazily: `init` only resets the fill pointer and the
/// counter, the registers are loaded on the first compression or close.
///
/// A state only exists on a cpu where `V::available()` holds, which `new`
/// checks. Compression runs as a kernel through `V::dispatch`, inside the
/// backend's target features.
#[repr(C, align(64))]
#[derive(Debug, Clone, Copy)]
pub struct ShabalX<V: Vector, const DIGEST_SIZE: usize> {
    buf: [V; BLOCK_WORDS],
    a: [V; 12],
    b: [V; 16],
    c: [V; 16],
    w: Counter,
    ptr: usize,
    state_loaded: bool,
}

pub type Shabal256xN<V> = ShabalX<V, 32>;
pub type Shabal512xN<V> = ShabalX<V, 64>;

#[cfg(target_arch = "x86_64")]
mod native {
    pub(super) use crate::simd::amd64::{V128 as X4, V256 as X8, V512 as X16};
}

#[cfg(target_arch = "aarch64")]
mod native {
    pub(super) use crate::simd::aarch64::V128 as X4;
    pub(super) type X8 = crate::simd::Lanes<8>;
    pub(super) type X16 = crate::simd::Lanes<16>;
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
mod native {
    pub(super) type X4 = crate::simd::Lanes<4>;
    pub(super) type X8 = crate::simd::Lanes<8>;
    pub(super) type X16 = crate::simd::Lanes<16>;
}

pub type Shabal256x4 = ShabalX<native::X4, 32>;
pub type Shabal256x8 = ShabalX<native::X8, 32>;
pub type Shabal256x16 = ShabalX<native::X16, 32>;
pub type Shabal512x4 = ShabalX<native::X4, 64>;
pub type Shabal512x8 = ShabalX<native::X8, 64>;
pub type Shabal512x16 = ShabalX<native::X16, 64>;

pub type Shabal256x4p = ShabalX<Lanes<4>, 32>;
pub type Shabal256x8p = ShabalX<Lanes<8>, 32>;
pub type Shabal256x16p = ShabalX<Lanes<16>, 32>;
pub type Shabal512x4p = ShabalX<Lanes<4>, 64>;
pub type Shabal512x8p = ShabalX<Lanes<8>, 64>;
pub type Shabal512x16p = ShabalX<Lanes<16>, 64>;

impl<V: Vector, const DIGEST_SIZE: usize> ShabalX<V, DIGEST_SIZE> {
    const LANE_WORDS: usize = DIGEST_SIZE / 4;

    /// A fresh state, or `Error::Unavailable` if the cpu lacks the backend.
    pub fn new() -> Result<Self> {
        if !V::available() {
            return Err(Error::Unavailable(V::NAME));
        }
        // Safety: checked above.
        let zero = unsafe { V::zero() };
        Ok(ShabalX {
            buf: [zero; BLOCK_WORDS],
            a: [zero; 12],
            b: [zero; 16],
            c: [zero; 16],
            w: Counter::new(),
            ptr: 0,
            state_loaded: false,
        })
    }

    pub const fn lanes() -> usize {
        V::LANES
    }

    pub fn init(&mut self) -> &mut Self {
        self.ptr = 0;
        self.w = Counter::new();
        self.state_loaded = false;
        self
    }

    #[inline(always)]
    fn splat(&self, x: u32) -> V {
        // Safety: `self` exists, so `new` saw `V::available()`.
        unsafe { V::splat(x) }
    }

    #[inline(always)]
    fn load_state(&mut self) {
        if self.state_loaded {
            return;
        }
        let iv = const { initial_state(DIGEST_SIZE) };
        self.a = iv.a.map(|v| self.splat(v));
        self.b = iv.b.map(|v| self.splat(v));
        self.c = iv.c.map(|v| self.splat(v));
        self.state_loaded = true;
    }

    // copy lanes[l][from..from + n] to byte ptr of every lane's buffer.
    fn fill(&mut self, lanes: &[&[u8]], from: usize, n: usize) {
        let (start, end) = (self.ptr, self.ptr + n);
        for i in start / 4..end.div_ceil(4) {
            let mut words = self.buf[i].to_words();
            for (x, lane) in words.as_mut().iter_mut().zip(lanes) {
                let mut bytes = x.to_le_bytes();
                for (k, b) in bytes.iter_mut().enumerate() {
                    let p = 4 * i + k;
                    if (start..end).contains(&p) {
                        *b = lane[from + p - start];
                    }
                }
                *x = u32::from_le_bytes(bytes);
            }
            // Safety: as in `splat`.
            self.buf[i] = unsafe { V::load(&words) };
        }
        self.ptr = end;
    }

    #[inline]
    fn flush_full(&mut self) {
        if self.ptr == BLOCK_BYTES {
            // Safety: as in `splat`.
            unsafe { V::dispatch(Flush(self)) };
            self.ptr = 0;
        }
    }

    /// Append one equal-length slice to every lane. Full blocks are gathered
    /// straight from the input, without passing through the buffer.
    pub fn update(&mut self, lanes: &[&[u8]]) -> Result<()> {
        let len = check_lanes::<V>(lanes)?;
        if len == 0 {
            return Ok(());
        }

        let mut off = 0;
        if self.ptr > 0 {
            off = len.min(BLOCK_BYTES - self.ptr);
            self.fill(lanes, 0, off);
            self.flush_full();
        }

        let blocks = (len - off) / BLOCK_BYTES;
        if blocks > 0 {
            // Safety: as in `splat`.
            unsafe { V::dispatch(Absorb { state: self, lanes, off, blocks }) };
            off += blocks * BLOCK_BYTES;
        }

        if off < len {
            self.fill(lanes, off, len - off);
        }
        Ok(())
    }

    /// Append lane-packed words, as produced by [`crate::simd::interleave`].
    /// The buffered length must be a whole number of words.
    pub fn update_packed(&mut self, words: &[V]) -> Result<()> {
        if self.ptr % 4 != 0 {
            return Err(Error::PackedOffset { ptr: self.ptr });
        }
        let mut words = words;
        while !words.is_empty() {
            let at = self.ptr / 4;
            let n = words.len().min(BLOCK_WORDS - at);
            self.buf[at..at + n].copy_from_slice(&words[..n]);
            self.ptr += 4 * n;
            words = &words[n..];
            self.flush_full();
        }
        Ok(())
    }

    /// Number of full blocks compressed since `init`.
    pub fn block_count(&self) -> u64 {
        self.w.get()
    }

    #[cfg(test)]
    pub(crate) fn set_block_count(&mut self, n: u64) {
        self.w.set(n);
    }

    fn finalize(&mut self, pad: u8) {
        // Safety: as in `splat`.
        unsafe { V::dispatch(Finish { state: self, pad }) };
    }

    fn digest_words(&self) -> &[V] {
        &self.b[BLOCK_WORDS - Self::LANE_WORDS..]
    }

    fn check_out(&self, found: usize) -> Result<()> {
        let needed = V::LANES * DIGEST_SIZE;
        if found < needed {
            return Err(Error::OutputTooShort { needed, found });
        }
        Ok(())
    }

    /// Pad, finalize and write every lane's digest into `out`, which must
    /// hold at least `LANES * DIGEST_SIZE` bytes. The state is re-initialised
    /// afterwards.
    pub fn close(&mut self, out: &mut [u8]) -> Result<()> {
        self.addbits_and_close(0, 0, out)
    }

    /// As [`close`](Self::close), with the top `n` bits of `ub` (`n` in
    /// 0..=7) appended to every lane before the pad bit.
    pub fn addbits_and_close(&mut self, ub: u32, n: u32, out: &mut [u8]) -> Result<()> {
        let pad = pad_byte(ub, n)?;
        self.check_out(out.len())?;
        self.finalize(pad);
        deinterleave(self.digest_words(), out)?;
        self.init();
        Ok(())
    }

    fn check_packed_out(&self, found: usize) -> Result<()> {
        if found < Self::LANE_WORDS {
            return Err(Error::OutputTooShort {
                needed: V::LANES * DIGEST_SIZE,
                found: 4 * V::LANES * found,
            });
        }
        Ok(())
    }

    /// As [`close`](Self::close), leaving the digest lane-packed: `out[i]`
    /// holds digest word `i` of every lane.
    pub fn close_packed(&mut self, out: &mut [V]) -> Result<()> {
        self.addbits_and_close_packed(0, 0, out)
    }

    pub fn addbits_and_close_packed(&mut self, ub: u32, n: u32, out: &mut [V]) -> Result<()> {
        let pad = pad_byte(ub, n)?;
        self.check_packed_out(out.len())?;
        self.finalize(pad);
        out[..Self::LANE_WORDS].copy_from_slice(self.digest_words());
        self.init();
        Ok(())
    }
}
