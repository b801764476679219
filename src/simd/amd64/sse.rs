use core::arch::x86_64::*;
use core::mem::transmute;

use crate::internal::cpuid::x86_64::*;
use crate::simd::{Aligned16, AesRound, BLOCK_BYTES, BLOCK_WORDS, Kernel, Vector};

/// 4 lanes in one xmm register. Needs SSE4.1 and SSSE3.
#[derive(Debug, Clone, Copy)]
#[repr(transparent)]
pub struct V128(__m128i);

// reverse the bytes of each 32-bit word.
const FLIP32: __m128i = unsafe { transmute([0x0405060700010203u64, 0x0C0D0E0F08090A0B]) };

macro_rules! transpose4 {
    ($r0: expr, $r1: expr, $r2: expr, $r3: expr) => {{
        let t0 = _mm_unpacklo_epi32($r0, $r1);
        let t1 = _mm_unpackhi_epi32($r0, $r1);
        let t2 = _mm_unpacklo_epi32($r2, $r3);
        let t3 = _mm_unpackhi_epi32($r2, $r3);
        [
            _mm_unpacklo_epi64(t0, t2),
            _mm_unpackhi_epi64(t0, t2),
            _mm_unpacklo_epi64(t1, t3),
            _mm_unpackhi_epi64(t1, t3),
        ]
    }};
}

impl Vector for V128 {
    const LANES: usize = 4;
    const NAME: &'static str = "sse4.1";

    type Words = Aligned16<u32, 4>;

    #[inline]
    fn available() -> bool {
        support_sse41() && support_ssse3()
    }

    #[inline(always)]
    unsafe fn dispatch<K: Kernel<Self>>(k: K) -> K::Output {
        unsafe { unsafe_run(k) }
    }

    #[inline(always)]
    unsafe fn zero() -> Self {
        unsafe { Self(_mm_setzero_si128()) }
    }

    #[inline(always)]
    unsafe fn splat(x: u32) -> Self {
        unsafe { Self(_mm_set1_epi32(x as i32)) }
    }

    #[inline(always)]
    unsafe fn load(src: &Self::Words) -> Self {
        unsafe { Self(transmute::<[u32; 4], __m128i>(src.0)) }
    }

    #[inline(always)]
    fn store(self, dst: &mut Self::Words) {
        dst.0 = unsafe { transmute::<__m128i, [u32; 4]>(self.0) };
    }

    #[inline(always)]
    fn add32(self, b: Self) -> Self {
        unsafe { Self(_mm_add_epi32(self.0, b.0)) }
    }

    #[inline(always)]
    fn sub32(self, b: Self) -> Self {
        unsafe { Self(_mm_sub_epi32(self.0, b.0)) }
    }

    #[inline(always)]
    fn mullo32(self, b: Self) -> Self {
        unsafe { Self(_mm_mullo_epi32(self.0, b.0)) }
    }

    #[inline(always)]
    fn and(self, b: Self) -> Self {
        unsafe { Self(_mm_and_si128(self.0, b.0)) }
    }

    #[inline(always)]
    fn or(self, b: Self) -> Self {
        unsafe { Self(_mm_or_si128(self.0, b.0)) }
    }

    #[inline(always)]
    fn xor(self, b: Self) -> Self {
        unsafe { Self(_mm_xor_si128(self.0, b.0)) }
    }

    #[inline(always)]
    fn andnot(self, b: Self) -> Self {
        unsafe { Self(_mm_andnot_si128(self.0, b.0)) }
    }

    #[inline(always)]
    fn shl32<const N: i32>(self) -> Self {
        const { assert!(N >= 0 && N < 32) };
        unsafe { Self(_mm_slli_epi32::<N>(self.0)) }
    }

    #[inline(always)]
    fn shr32<const N: i32>(self) -> Self {
        const { assert!(N >= 0 && N < 32) };
        unsafe { Self(_mm_srli_epi32::<N>(self.0)) }
    }

    #[inline(always)]
    fn rol32<const N: i32>(self) -> Self {
        const { assert!(N > 0 && N < 32) };
        unsafe { Self(_mm_or_si128(_mm_slli_epi32::<N>(self.0), _mm_srl_epi32(self.0, _mm_cvtsi32_si128(32 - N)))) }
    }

    #[inline(always)]
    fn ror32<const N: i32>(self) -> Self {
        const { assert!(N > 0 && N < 32) };
        unsafe { Self(_mm_or_si128(_mm_srli_epi32::<N>(self.0), _mm_sll_epi32(self.0, _mm_cvtsi32_si128(32 - N)))) }
    }

    #[inline(always)]
    fn cmpeq32(self, b: Self) -> Self {
        unsafe { Self(_mm_cmpeq_epi32(self.0, b.0)) }
    }

    #[inline(always)]
    fn cmpgt32(self, b: Self) -> Self {
        unsafe { Self(_mm_cmpgt_epi32(self.0, b.0)) }
    }

    #[inline(always)]
    fn shuflr32(self) -> Self {
        unsafe { Self(_mm_shuffle_epi32::<0x39>(self.0)) }
    }

    #[inline(always)]
    fn shufll32(self) -> Self {
        unsafe { Self(_mm_shuffle_epi32::<0x93>(self.0)) }
    }

    #[inline(always)]
    fn rev32(self) -> Self {
        unsafe { Self(_mm_shuffle_epi32::<0x1b>(self.0)) }
    }

    #[inline(always)]
    fn swap64(self) -> Self {
        unsafe { Self(_mm_shuffle_epi32::<0x4e>(self.0)) }
    }

    #[inline(always)]
    fn swap64_32(self) -> Self {
        unsafe { Self(_mm_shuffle_epi32::<0xb1>(self.0)) }
    }

    #[inline(always)]
    fn bswap32(self) -> Self {
        unsafe { Self(_mm_shuffle_epi8(self.0, FLIP32)) }
    }

    // four 4x4 transposes, one per 16-byte column of the lanes.
    #[inline(always)]
    unsafe fn load_block(lanes: &[&[u8; BLOCK_BYTES]]) -> [Self; BLOCK_WORDS] {
        let (m0, m1, m2, m3) = (lanes[0], lanes[1], lanes[2], lanes[3]);
        let mut w = [unsafe { Self::zero() }; BLOCK_WORDS];
        unsafe {
            for q in 0..4 {
                let r0 = _mm_loadu_si128(m0.as_ptr().add(16 * q) as *const __m128i);
                let r1 = _mm_loadu_si128(m1.as_ptr().add(16 * q) as *const __m128i);
                let r2 = _mm_loadu_si128(m2.as_ptr().add(16 * q) as *const __m128i);
                let r3 = _mm_loadu_si128(m3.as_ptr().add(16 * q) as *const __m128i);
                let t = transpose4!(r0, r1, r2, r3);
                for (i, x) in t.into_iter().enumerate() {
                    w[4 * q + i] = Self(x);
                }
            }
        }
        w
    }
}

// Every kernel on this backend enters here, so the ops inline with the
// features enabled.
#[target_feature(enable = "sse4.1", enable = "ssse3")]
unsafe fn unsafe_run<K: Kernel<V128>>(k: K) -> K::Output {
    k.run()
}

impl AesRound for V128 {
    #[inline]
    fn aes_available() -> bool {
        support_aes() && Self::available()
    }

    #[inline(always)]
    unsafe fn aesenc(self, key: Self) -> Self {
        unsafe { Self(_mm_aesenc_si128(self.0, key.0)) }
    }

    #[inline(always)]
    unsafe fn aesenclast(self, key: Self) -> Self {
        unsafe { Self(_mm_aesenclast_si128(self.0, key.0)) }
    }

    #[inline(always)]
    unsafe fn aesdec(self, key: Self) -> Self {
        unsafe { Self(_mm_aesdec_si128(self.0, key.0)) }
    }

    #[inline(always)]
    unsafe fn aesdeclast(self, key: Self) -> Self {
        unsafe { Self(_mm_aesdeclast_si128(self.0, key.0)) }
    }
}
