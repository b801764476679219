//! Single-lane Shabal, the reference for the multi-lane state in
//! [`crate::shabal_simd`].

mod generic;

pub(crate) use generic::State;
use generic::{close_block, compress_block, compress_generic, decode, derive_iv};

use core::fmt;

use crate::error::{Error, Result};

pub const BLOCK_SIZE: usize = 64;

pub(crate) const IV256: State = State {
    a: [
        0x52F84552, 0xE54B7999, 0x2D8EE3EC, 0xB9645191, 0xE0078B86, 0xBB7C44C9,
        0xD2B5C1CA, 0xB0D2EB8C, 0x14CE5A45, 0x22AF50DC, 0xEFFDBC6B, 0xEB21B74A,
    ],
    b: [
        0xB555C6EE, 0x3E710596, 0xA72A652F, 0x9301515F, 0xDA28C1FA, 0x696FD868, 0x9CB6BF72, 0x0AFE4002,
        0xA6E03615, 0x5138C1D4, 0xBE216306, 0xB38B8890, 0x3EA8B96B, 0x3299ACE4, 0x30924DD4, 0x55CB34A5,
    ],
    c: [
        0xB405F031, 0xC4233EBA, 0xB3733979, 0xC0DD9D55, 0xC51C28AE, 0xA327B8E1, 0x56C56167, 0xED614433,
        0x88B59D60, 0x60E2CEBA, 0x758B4B8B, 0x83E82A7F, 0xBC968828, 0xE6E00BF7, 0xBA839E55, 0x9B491C60,
    ],
};

pub(crate) const IV512: State = State {
    a: [
        0x20728DFD, 0x46C0BD53, 0xE782B699, 0x55304632, 0x71B4EF90, 0x0EA9E82C,
        0xDBB930F1, 0xFAD06B8B, 0xBE0CAE40, 0x8BD14410, 0x76D2ADAC, 0x28ACAB7F,
    ],
    b: [
        0xC1099CB7, 0x07B385F3, 0xE7442C26, 0xCC8AD640, 0xEB6F56C7, 0x1EA81AA9, 0x73B9D314, 0x1DE85D08,
        0x48910A5A, 0x893B22DB, 0xC5A0DF44, 0xBBC4324E, 0x72D2F240, 0x75941D99, 0x6D8BDE82, 0xA1A7502B,
    ],
    c: [
        0xD9BF68D1, 0x58BAD750, 0x56028CB2, 0x8134F359, 0xB5D469D8, 0x941A8CC2, 0x418B2A6E, 0x04052780,
        0x7F07D787, 0x5194358F, 0x3C60D665, 0xBE97D79A, 0x950C3434, 0xAED9A06D, 0x2537DC8D, 0x7CDB5969,
    ],
};

/// Initial A, B, C for a digest of `digest_size` bytes. Shabal-256 and
/// Shabal-512 use the published tables, the other sizes derive theirs at
/// compile time.
pub(crate) const fn initial_state(digest_size: usize) -> State {
    assert!(
        matches!(digest_size, 24 | 28 | 32 | 48 | 64),
        "Shabal digest size must be 24, 28, 32, 48 or 64 bytes"
    );
    match digest_size {
        32 => IV256,
        64 => IV512,
        n => derive_iv(8 * n as u32),
    }
}

/// The pad byte for a message ending in `n` extra bits, the top `n` bits of
/// `ub`: those bits, then a single one bit, then zeros.
#[inline]
pub(crate) fn pad_byte(ub: u32, n: u32) -> Result<u8> {
    if n > 7 {
        return Err(Error::ExtraBits(n));
    }
    let z = 0x80u32 >> n;
    Ok(((ub & z.wrapping_neg()) | z) as u8)
}

/// 64-bit count of compressed blocks, kept as (low, high) words.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counter(pub u32, pub u32);

impl Counter {
    pub const fn new() -> Self {
        Self(0, 0)
    }

    #[inline(always)]
    pub fn incr(&mut self) {
        self.0 = self.0.wrapping_add(1);
        if self.0 == 0 {
            self.1 = self.1.wrapping_add(1);
        }
    }

    /// The block number mixed into `A[0]`, `A[1]`: one past the count, so the
    /// first block is numbered 1. Wraps at 2^64.
    #[inline(always)]
    pub fn w(&self) -> (u32, u32) {
        let low = self.0.wrapping_add(1);
        let high = if low == 0 { self.1.wrapping_add(1) } else { self.1 };
        (low, high)
    }

    pub fn get(&self) -> u64 {
        ((self.1 as u64) << 32) | self.0 as u64
    }

    pub fn set(&mut self, n: u64) {
        self.0 = n as u32;
        self.1 = (n >> 32) as u32;
    }
}

pub type Shabal192 = Digest<24>;
pub type Shabal224 = Digest<28>;
pub type Shabal256 = Digest<32>;
pub type Shabal384 = Digest<48>;
pub type Shabal512 = Digest<64>;

/// Shabal with a `DIGEST_SIZE`-byte output.
#[derive(Debug, Clone, Copy)]
pub struct Digest<const DIGEST_SIZE: usize> {
    s: State,
    x: [u8; BLOCK_SIZE],
    nx: usize,
    w: Counter,
}

impl<const DIGEST_SIZE: usize> fmt::Display for Digest<DIGEST_SIZE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.s.b.iter().enumerate() {
            write!(f, "0x{:08x}", b)?;
            f.write_str(if i % 4 == 3 { "\n" } else { " " })?;
        }
        Ok(())
    }
}

impl<const DIGEST_SIZE: usize> Default for Digest<DIGEST_SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const DIGEST_SIZE: usize> Digest<DIGEST_SIZE> {
    const IV: State = initial_state(DIGEST_SIZE);

    pub fn new() -> Self {
        Digest {
            s: Self::IV,
            x: [0; BLOCK_SIZE],
            nx: 0,
            w: Counter::new(),
        }
    }

    pub fn reset(&mut self) -> &Self {
        self.s = Self::IV;
        self.x = [0; BLOCK_SIZE];
        self.nx = 0;
        self.w = Counter::new();
        self
    }

    pub fn write(&mut self, p: &[u8]) -> &Self {
        let mut p = p;
        if self.nx > 0 {
            let copy_len = p.len().min(BLOCK_SIZE - self.nx);
            self.x[self.nx..self.nx + copy_len].copy_from_slice(&p[..copy_len]);
            self.nx += copy_len;

            if self.nx == BLOCK_SIZE {
                compress_block(&mut self.s, self.w.w(), &decode(&self.x));
                self.w.incr();
                self.nx = 0;
            }
            p = &p[copy_len..];
        }
        if p.len() >= BLOCK_SIZE {
            p = compress_generic(&mut self.s, &mut self.w, p);
        }
        if !p.is_empty() {
            self.x[..p.len()].copy_from_slice(p);
            self.nx = p.len();
        }
        self
    }

    /// Number of full blocks compressed so far.
    pub fn block_count(&self) -> u64 {
        self.w.get()
    }

    // the counter is 64 bits; tests jump it to the 32-bit carry.
    #[cfg(test)]
    pub(crate) fn set_block_count(&mut self, n: u64) {
        self.w.set(n);
    }

    fn finish(&self, last: u8, output: &mut [u8]) {
        let mut buf = [0u8; BLOCK_SIZE];
        buf[..self.nx].copy_from_slice(&self.x[..self.nx]);
        buf[self.nx] = last;

        // work on a copy, sum does not change the internal states.
        let mut s = self.s;
        close_block(&mut s, self.w.w(), &decode(&buf));

        let words = &s.b[16 - DIGEST_SIZE / 4..];
        for (o, w) in output[..DIGEST_SIZE].chunks_exact_mut(4).zip(words) {
            o.copy_from_slice(&w.to_le_bytes());
        }
    }

    // sum not change the internal states.
    pub fn sum_into(&self, output: &mut [u8]) -> Result<()> {
        self.sum_bits_into(0, 0, output)
    }

    pub fn sum(&self) -> [u8; DIGEST_SIZE] {
        let mut result = [0; DIGEST_SIZE];
        self.finish(0x80, &mut result);
        result
    }

    /// Digest of the written bytes followed by the top `n` bits of `ub`,
    /// `n` in 0..=7.
    pub fn sum_bits_into(&self, ub: u32, n: u32, output: &mut [u8]) -> Result<()> {
        let last = pad_byte(ub, n)?;
        if output.len() < DIGEST_SIZE {
            return Err(Error::OutputTooShort { needed: DIGEST_SIZE, found: output.len() });
        }
        self.finish(last, output);
        Ok(())
    }

    pub fn sum_bits(&self, ub: u32, n: u32) -> Result<[u8; DIGEST_SIZE]> {
        let mut result = [0; DIGEST_SIZE];
        self.sum_bits_into(ub, n, &mut result)?;
        Ok(result)
    }
}

#[macro_export]
macro_rules! shabal256 {
    ($($x:expr),+ $(,)?) => {{
        let mut h = $crate::shabal::Shabal256::new();
        $(
            h.write($x);
        )*
        h.sum()
    }};
}

#[macro_export]
macro_rules! shabal512 {
    ($($x:expr),+ $(,)?) => {{
        let mut h = $crate::shabal::Shabal512::new();
        $(
            h.write($x);
        )*
        h.sum()
    }};
}

#[cfg(test)]
pub(crate) mod test_data;

#[cfg(test)]
mod tests {
    use super::test_data::*;
    use super::*;
    use hex::FromHex;
    use hex_literal::hex;
    use std::vec::Vec;

    #[test]
    fn test_iv_derivation() {
        assert_eq!(derive_iv(256), IV256);
        assert_eq!(derive_iv(512), IV512);
    }

    #[test]
    fn test_shabal256_vectors() {
        for (msg, expect) in SHABAL256_VECTORS {
            let expect = <[u8; 32]>::from_hex(expect).unwrap();
            assert_eq!(shabal256!(msg), expect, "msg len {}", msg.len());
        }
    }

    #[test]
    fn test_shabal512_vectors() {
        for (msg, expect) in SHABAL512_VECTORS {
            let expect = <[u8; 64]>::from_hex(expect).unwrap();
            assert_eq!(shabal512!(msg), expect, "msg len {}", msg.len());
        }
    }

    #[test]
    fn test_other_sizes() {
        assert_eq!(Shabal192::new().sum(), hex!("e10dc32232f98b039dbbcfa41269b9cdf67a73c841214c81"));
        assert_eq!(
            Shabal224::new().sum(),
            hex!("562b4fdbe1706247552927f814b66a3d74b465a090af23e277bf8029")
        );
        let mut h = Shabal384::new();
        h.write(b"abc");
        assert_eq!(
            h.sum(),
            hex!("66613058865271722c0295774aa77258a5082bebbb5a02f9d6aee9ad303fc71cbf19e2f599ddfde88cf0bf30a028e530")
        );
    }

    #[test]
    fn test_long_message() {
        let msg: Vec<u8> = (0..1000).map(|i| (i % 251) as u8).collect();
        assert_eq!(shabal256!(&msg), hex!("599d42fba1cf6c350256759cf63ce734d2cdf1499997d9d384193c2ec2595ea4"));
        assert_eq!(
            shabal512!(&msg),
            hex!(
                "63c93dcd692f9de6583e6ba2b43b61832132d340921ffff00031e30408b59b75"
                "4f2b4e223e5310196c3a00503720a34eae5e0252938a7d732a1680f3bb9d1624"
            )
        );
    }

    #[test]
    fn test_split_writes() {
        let msg: Vec<u8> = (0..300).map(|i| i as u8).collect();
        let expect = shabal256!(&msg);
        for split in [0, 1, 63, 64, 65, 127, 128, 299, 300] {
            assert_eq!(shabal256!(&msg[..split], &msg[split..]), expect, "split at {split}");
        }
        let mut h = Shabal256::new();
        for b in &msg {
            h.write(core::slice::from_ref(b));
        }
        assert_eq!(h.sum(), expect);
    }

    #[test]
    fn test_sum_is_non_destructive() {
        let mut h = Shabal512::new();
        h.write(b"abc");
        let first = h.sum();
        assert_eq!(h.sum(), first);
        h.write(b"def");
        assert_eq!(h.sum(), shabal512!(b"abcdef"));
        h.reset();
        assert_eq!(h.sum(), shabal512!(b""));
    }

    #[test]
    fn test_extra_bits() {
        let mut h = Shabal256::new();
        assert_eq!(h.sum_bits(0x80, 1).unwrap(), hex!("ac33f652f66eeba85547af61e51087a5468a64b9e11c44ba0563ea15a712abda"));
        h.write(b"abc");
        let three = hex!("501f43495e5168444e16e7433cf4125b36a48e0fc3aa20a35f87a4f2ff6e5387");
        assert_eq!(h.sum_bits(0xa0, 3).unwrap(), three);
        // bits below the top n are ignored.
        assert_eq!(h.sum_bits(0xbf, 3).unwrap(), three);
        assert_eq!(h.sum_bits(0x55, 0).unwrap(), h.sum());
        assert_eq!(h.sum_bits(0, 8), Err(Error::ExtraBits(8)));

        let mut h = Shabal512::new();
        h.write(&[0u8; 63]);
        assert_eq!(
            h.sum_bits(0xfe, 7).unwrap(),
            hex!(
                "f88f60b14e24d9e6793ae0ff9bc7d5a98c43318eca3cf2aff42fe3090a37a9c9"
                "2555ee440e9793a2afbf70f50c16977c0c7fd4056d20ec1be0ed52312a033f47"
            )
        );
        let mut short = [0u8; 32];
        assert_eq!(h.sum_bits_into(0, 1, &mut short), Err(Error::OutputTooShort { needed: 64, found: 32 }));
    }

    #[test]
    fn test_sum_into() {
        let mut h = Shabal256::new();
        h.write(b"abc");
        let mut short = [0u8; 31];
        assert_eq!(h.sum_into(&mut short), Err(Error::OutputTooShort { needed: 32, found: 31 }));
        assert_eq!(short, [0u8; 31]);

        let mut out = [0xffu8; 40];
        h.sum_into(&mut out).unwrap();
        assert_eq!(out[..32], h.sum());
        assert_eq!(out[32..], [0xffu8; 8]);
    }

    #[test]
    fn test_block_count() {
        let mut h = Shabal256::new();
        h.write(&[0u8; 64]);
        assert_eq!(h.block_count(), 1);
        h.write(&[0u8; 100]);
        assert_eq!(h.block_count(), 2);
        h.write(&[0u8; 28]);
        assert_eq!(h.block_count(), 3);
    }

    #[test]
    fn test_counter_carry() {
        let mut w = Counter::new();
        w.set(0xffff_fffe);
        assert_eq!(w.w(), (0xffff_ffff, 0));
        w.incr();
        assert_eq!(w.w(), (0, 1));
        w.incr();
        assert_eq!((w.0, w.1), (0, 1));
        assert_eq!(w.get(), 1 << 32);

        w.set(u64::MAX);
        assert_eq!(w.w(), (0, 0));
        w.incr();
        assert_eq!(w.get(), 0);
    }

    #[test]
    fn test_counter_changes_digest() {
        let mut a = Shabal256::new();
        let mut b = Shabal256::new();
        b.set_block_count(0xffff_ffff);
        a.write(&[7u8; 64]);
        b.write(&[7u8; 64]);
        assert_eq!(b.block_count(), 1 << 32);
        assert_ne!(a.sum(), b.sum());
    }

    // cargo test --release --lib -- shabal::tests::test_bench --exact --show-output
    #[test]
    fn test_bench() {
        use std::time::*;
        const TOTAL_BYTES: usize = 1024 * 1024;
        const COUNT: usize = 10;
        let msg = vec![0u8; TOTAL_BYTES];

        let start = Instant::now();
        for _ in 0..COUNT {
            shabal256!(msg.as_slice());
        }
        let d = (Instant::now() - start).as_micros() as f64 / 1000000.0;
        println!("{:.2} MB/s", TOTAL_BYTES as f64 * COUNT as f64 / 1024.0 / 1024.0 / d);
    }
}
