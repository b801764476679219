use core::arch::x86_64::*;
use core::mem::transmute;

use crate::internal::cpuid::x86_64::*;
use crate::simd::{Aligned32, AesRound, BLOCK_BYTES, BLOCK_WORDS, Kernel, Vector};

/// 8 lanes in one ymm register. Needs AVX2.
#[derive(Debug, Clone, Copy)]
#[repr(transparent)]
pub struct V256(__m256i);

const FLIP32: __m256i = unsafe {
    transmute([
        0x0405060700010203u64,
        0x0C0D0E0F08090A0B,
        0x0405060700010203,
        0x0C0D0E0F08090A0B,
    ])
};

macro_rules! transpose8 {
    ($r: expr) => {{
        let r = $r;
        let t0 = _mm256_unpacklo_epi32(r[0], r[1]);
        let t1 = _mm256_unpackhi_epi32(r[0], r[1]);
        let t2 = _mm256_unpacklo_epi32(r[2], r[3]);
        let t3 = _mm256_unpackhi_epi32(r[2], r[3]);
        let t4 = _mm256_unpacklo_epi32(r[4], r[5]);
        let t5 = _mm256_unpackhi_epi32(r[4], r[5]);
        let t6 = _mm256_unpacklo_epi32(r[6], r[7]);
        let t7 = _mm256_unpackhi_epi32(r[6], r[7]);
        let tt0 = _mm256_unpacklo_epi64(t0, t2);
        let tt1 = _mm256_unpackhi_epi64(t0, t2);
        let tt2 = _mm256_unpacklo_epi64(t1, t3);
        let tt3 = _mm256_unpackhi_epi64(t1, t3);
        let tt4 = _mm256_unpacklo_epi64(t4, t6);
        let tt5 = _mm256_unpackhi_epi64(t4, t6);
        let tt6 = _mm256_unpacklo_epi64(t5, t7);
        let tt7 = _mm256_unpackhi_epi64(t5, t7);
        [
            _mm256_permute2x128_si256::<0x20>(tt0, tt4),
            _mm256_permute2x128_si256::<0x20>(tt1, tt5),
            _mm256_permute2x128_si256::<0x20>(tt2, tt6),
            _mm256_permute2x128_si256::<0x20>(tt3, tt7),
            _mm256_permute2x128_si256::<0x31>(tt0, tt4),
            _mm256_permute2x128_si256::<0x31>(tt1, tt5),
            _mm256_permute2x128_si256::<0x31>(tt2, tt6),
            _mm256_permute2x128_si256::<0x31>(tt3, tt7),
        ]
    }};
}

impl Vector for V256 {
    const LANES: usize = 8;
    const NAME: &'static str = "avx2";

    type Words = Aligned32<u32, 8>;

    #[inline]
    fn available() -> bool {
        support_avx2() && support_avx()
    }

    #[inline(always)]
    unsafe fn dispatch<K: Kernel<Self>>(k: K) -> K::Output {
        unsafe { unsafe_run(k) }
    }

    #[inline(always)]
    unsafe fn zero() -> Self {
        unsafe { Self(_mm256_setzero_si256()) }
    }

    #[inline(always)]
    unsafe fn splat(x: u32) -> Self {
        unsafe { Self(_mm256_set1_epi32(x as i32)) }
    }

    #[inline(always)]
    unsafe fn load(src: &Self::Words) -> Self {
        unsafe { Self(transmute::<[u32; 8], __m256i>(src.0)) }
    }

    #[inline(always)]
    fn store(self, dst: &mut Self::Words) {
        dst.0 = unsafe { transmute::<__m256i, [u32; 8]>(self.0) };
    }

    #[inline(always)]
    fn add32(self, b: Self) -> Self {
        unsafe { Self(_mm256_add_epi32(self.0, b.0)) }
    }

    #[inline(always)]
    fn sub32(self, b: Self) -> Self {
        unsafe { Self(_mm256_sub_epi32(self.0, b.0)) }
    }

    #[inline(always)]
    fn mullo32(self, b: Self) -> Self {
        unsafe { Self(_mm256_mullo_epi32(self.0, b.0)) }
    }

    #[inline(always)]
    fn and(self, b: Self) -> Self {
        unsafe { Self(_mm256_and_si256(self.0, b.0)) }
    }

    #[inline(always)]
    fn or(self, b: Self) -> Self {
        unsafe { Self(_mm256_or_si256(self.0, b.0)) }
    }

    #[inline(always)]
    fn xor(self, b: Self) -> Self {
        unsafe { Self(_mm256_xor_si256(self.0, b.0)) }
    }

    #[inline(always)]
    fn andnot(self, b: Self) -> Self {
        unsafe { Self(_mm256_andnot_si256(self.0, b.0)) }
    }

    #[inline(always)]
    fn shl32<const N: i32>(self) -> Self {
        const { assert!(N >= 0 && N < 32) };
        unsafe { Self(_mm256_slli_epi32::<N>(self.0)) }
    }

    #[inline(always)]
    fn shr32<const N: i32>(self) -> Self {
        const { assert!(N >= 0 && N < 32) };
        unsafe { Self(_mm256_srli_epi32::<N>(self.0)) }
    }

    #[inline(always)]
    fn rol32<const N: i32>(self) -> Self {
        const { assert!(N > 0 && N < 32) };
        unsafe {
            Self(_mm256_or_si256(
                _mm256_slli_epi32::<N>(self.0),
                _mm256_srl_epi32(self.0, _mm_cvtsi32_si128(32 - N)),
            ))
        }
    }

    #[inline(always)]
    fn ror32<const N: i32>(self) -> Self {
        const { assert!(N > 0 && N < 32) };
        unsafe {
            Self(_mm256_or_si256(
                _mm256_srli_epi32::<N>(self.0),
                _mm256_sll_epi32(self.0, _mm_cvtsi32_si128(32 - N)),
            ))
        }
    }

    #[inline(always)]
    fn cmpeq32(self, b: Self) -> Self {
        unsafe { Self(_mm256_cmpeq_epi32(self.0, b.0)) }
    }

    #[inline(always)]
    fn cmpgt32(self, b: Self) -> Self {
        unsafe { Self(_mm256_cmpgt_epi32(self.0, b.0)) }
    }

    #[inline(always)]
    fn shuflr32(self) -> Self {
        unsafe { Self(_mm256_shuffle_epi32::<0x39>(self.0)) }
    }

    #[inline(always)]
    fn shufll32(self) -> Self {
        unsafe { Self(_mm256_shuffle_epi32::<0x93>(self.0)) }
    }

    #[inline(always)]
    fn rev32(self) -> Self {
        unsafe { Self(_mm256_shuffle_epi32::<0x1b>(self.0)) }
    }

    #[inline(always)]
    fn swap64(self) -> Self {
        unsafe { Self(_mm256_shuffle_epi32::<0x4e>(self.0)) }
    }

    #[inline(always)]
    fn swap64_32(self) -> Self {
        unsafe { Self(_mm256_shuffle_epi32::<0xb1>(self.0)) }
    }

    #[inline(always)]
    fn bswap32(self) -> Self {
        unsafe { Self(_mm256_shuffle_epi8(self.0, FLIP32)) }
    }

    #[inline(always)]
    unsafe fn load_block(lanes: &[&[u8; BLOCK_BYTES]]) -> [Self; BLOCK_WORDS] {
        let mut lo = [unsafe { _mm256_setzero_si256() }; 8];
        let mut hi = lo;
        for (l, m) in lanes[..8].iter().enumerate() {
            unsafe {
                lo[l] = _mm256_loadu_si256(m.as_ptr() as *const __m256i);
                hi[l] = _mm256_loadu_si256(m.as_ptr().add(32) as *const __m256i);
            }
        }
        let mut w = [unsafe { Self::zero() }; BLOCK_WORDS];
        unsafe {
            let lo = transpose8!(lo);
            let hi = transpose8!(hi);
            for i in 0..8 {
                w[i] = Self(lo[i]);
                w[8 + i] = Self(hi[i]);
            }
        }
        w
    }
}

#[target_feature(enable = "avx", enable = "avx2")]
unsafe fn unsafe_run<K: Kernel<V256>>(k: K) -> K::Output {
    k.run()
}

impl AesRound for V256 {
    #[inline]
    fn aes_available() -> bool {
        support_vaes() && Self::available()
    }

    #[inline(always)]
    unsafe fn aesenc(self, key: Self) -> Self {
        unsafe { Self(_mm256_aesenc_epi128(self.0, key.0)) }
    }

    #[inline(always)]
    unsafe fn aesenclast(self, key: Self) -> Self {
        unsafe { Self(_mm256_aesenclast_epi128(self.0, key.0)) }
    }

    #[inline(always)]
    unsafe fn aesdec(self, key: Self) -> Self {
        unsafe { Self(_mm256_aesdec_epi128(self.0, key.0)) }
    }

    #[inline(always)]
    unsafe fn aesdeclast(self, key: Self) -> Self {
        unsafe { Self(_mm256_aesdeclast_epi128(self.0, key.0)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::check;

    #[test]
    fn test_v256_ops() {
        if !V256::available() {
            return;
        }
        check::all::<V256>();
    }

    #[test]
    fn test_v256_aes() {
        if !V256::aes_available() {
            return;
        }
        check::aes::<V256>();
    }
}
