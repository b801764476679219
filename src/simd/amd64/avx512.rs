use core::arch::x86_64::*;
use core::mem::transmute;

use crate::internal::cpuid::x86_64::*;
use crate::simd::{Aligned64, AesRound, BLOCK_BYTES, BLOCK_WORDS, Kernel, Vector};

/// 16 lanes in one zmm register. Needs AVX-512F and AVX-512BW.
///
/// The fused bitwise ops are single `vpternlogd` instructions; the immediate
/// is the truth table over (a, b, c) = (0xf0, 0xcc, 0xaa).
#[derive(Debug, Clone, Copy)]
#[repr(transparent)]
pub struct V512(__m512i);

const FLIP32: __m512i = unsafe {
    transmute([
        0x0405060700010203u64,
        0x0C0D0E0F08090A0B,
        0x0405060700010203,
        0x0C0D0E0F08090A0B,
        0x0405060700010203,
        0x0C0D0E0F08090A0B,
        0x0405060700010203,
        0x0C0D0E0F08090A0B,
    ])
};

macro_rules! ternlog {
    ($imm: literal, $a: expr, $b: expr, $c: expr) => {
        unsafe { V512(_mm512_ternarylogic_epi32::<$imm>($a.0, $b.0, $c.0)) }
    };
}

// 16x16 transpose of 32-bit words.
macro_rules! transpose16 {
    ($r: expr) => {{
        let r = $r;
        let mut t = r;
        for k in 0..8 {
            t[2 * k] = _mm512_unpacklo_epi32(r[2 * k], r[2 * k + 1]);
            t[2 * k + 1] = _mm512_unpackhi_epi32(r[2 * k], r[2 * k + 1]);
        }
        let mut u = t;
        for k in 0..4 {
            u[4 * k] = _mm512_unpacklo_epi64(t[4 * k], t[4 * k + 2]);
            u[4 * k + 1] = _mm512_unpackhi_epi64(t[4 * k], t[4 * k + 2]);
            u[4 * k + 2] = _mm512_unpacklo_epi64(t[4 * k + 1], t[4 * k + 3]);
            u[4 * k + 3] = _mm512_unpackhi_epi64(t[4 * k + 1], t[4 * k + 3]);
        }
        // interleave 128-bit groups: rows 0-3 with 4-7, 8-11 with 12-15.
        for j in 0..4 {
            t[j] = _mm512_shuffle_i32x4::<0x88>(u[j], u[4 + j]);
            t[4 + j] = _mm512_shuffle_i32x4::<0xdd>(u[j], u[4 + j]);
            t[8 + j] = _mm512_shuffle_i32x4::<0x88>(u[8 + j], u[12 + j]);
            t[12 + j] = _mm512_shuffle_i32x4::<0xdd>(u[8 + j], u[12 + j]);
        }
        for j in 0..8 {
            u[j] = _mm512_shuffle_i32x4::<0x88>(t[j], t[8 + j]);
            u[8 + j] = _mm512_shuffle_i32x4::<0xdd>(t[j], t[8 + j]);
        }
        u
    }};
}

impl Vector for V512 {
    const LANES: usize = 16;
    const NAME: &'static str = "avx512";

    type Words = Aligned64<u32, 16>;

    #[inline]
    fn available() -> bool {
        support_avx512f() && support_avx512bw()
    }

    #[inline(always)]
    unsafe fn dispatch<K: Kernel<Self>>(k: K) -> K::Output {
        unsafe { unsafe_run(k) }
    }

    #[inline(always)]
    unsafe fn zero() -> Self {
        unsafe { Self(_mm512_setzero_si512()) }
    }

    #[inline(always)]
    unsafe fn splat(x: u32) -> Self {
        unsafe { Self(_mm512_set1_epi32(x as i32)) }
    }

    #[inline(always)]
    unsafe fn load(src: &Self::Words) -> Self {
        unsafe { Self(transmute::<[u32; 16], __m512i>(src.0)) }
    }

    #[inline(always)]
    fn store(self, dst: &mut Self::Words) {
        dst.0 = unsafe { transmute::<__m512i, [u32; 16]>(self.0) };
    }

    #[inline(always)]
    fn add32(self, b: Self) -> Self {
        unsafe { Self(_mm512_add_epi32(self.0, b.0)) }
    }

    #[inline(always)]
    fn sub32(self, b: Self) -> Self {
        unsafe { Self(_mm512_sub_epi32(self.0, b.0)) }
    }

    #[inline(always)]
    fn mullo32(self, b: Self) -> Self {
        unsafe { Self(_mm512_mullo_epi32(self.0, b.0)) }
    }

    #[inline(always)]
    fn and(self, b: Self) -> Self {
        unsafe { Self(_mm512_and_si512(self.0, b.0)) }
    }

    #[inline(always)]
    fn or(self, b: Self) -> Self {
        unsafe { Self(_mm512_or_si512(self.0, b.0)) }
    }

    #[inline(always)]
    fn xor(self, b: Self) -> Self {
        unsafe { Self(_mm512_xor_si512(self.0, b.0)) }
    }

    #[inline(always)]
    fn andnot(self, b: Self) -> Self {
        unsafe { Self(_mm512_andnot_si512(self.0, b.0)) }
    }

    #[inline(always)]
    fn shl32<const N: i32>(self) -> Self {
        const { assert!(N >= 0 && N < 32) };
        unsafe { Self(_mm512_sll_epi32(self.0, _mm_cvtsi32_si128(N))) }
    }

    #[inline(always)]
    fn shr32<const N: i32>(self) -> Self {
        const { assert!(N >= 0 && N < 32) };
        unsafe { Self(_mm512_srl_epi32(self.0, _mm_cvtsi32_si128(N))) }
    }

    #[inline(always)]
    fn rol32<const N: i32>(self) -> Self {
        const { assert!(N > 0 && N < 32) };
        unsafe { Self(_mm512_rol_epi32::<N>(self.0)) }
    }

    #[inline(always)]
    fn ror32<const N: i32>(self) -> Self {
        const { assert!(N > 0 && N < 32) };
        unsafe { Self(_mm512_ror_epi32::<N>(self.0)) }
    }

    #[inline(always)]
    fn cmpeq32(self, b: Self) -> Self {
        unsafe { Self(_mm512_maskz_mov_epi32(_mm512_cmpeq_epi32_mask(self.0, b.0), _mm512_set1_epi32(-1))) }
    }

    #[inline(always)]
    fn cmpgt32(self, b: Self) -> Self {
        unsafe { Self(_mm512_maskz_mov_epi32(_mm512_cmpgt_epi32_mask(self.0, b.0), _mm512_set1_epi32(-1))) }
    }

    #[inline(always)]
    fn shuflr32(self) -> Self {
        unsafe { Self(_mm512_shuffle_epi32::<0x39>(self.0)) }
    }

    #[inline(always)]
    fn shufll32(self) -> Self {
        unsafe { Self(_mm512_shuffle_epi32::<0x93>(self.0)) }
    }

    #[inline(always)]
    fn rev32(self) -> Self {
        unsafe { Self(_mm512_shuffle_epi32::<0x1b>(self.0)) }
    }

    #[inline(always)]
    fn swap64(self) -> Self {
        unsafe { Self(_mm512_shuffle_epi32::<0x4e>(self.0)) }
    }

    #[inline(always)]
    fn swap64_32(self) -> Self {
        unsafe { Self(_mm512_shuffle_epi32::<0xb1>(self.0)) }
    }

    #[inline(always)]
    fn bswap32(self) -> Self {
        unsafe { Self(_mm512_shuffle_epi8(self.0, FLIP32)) }
    }

    #[inline(always)]
    fn not(self) -> Self {
        ternlog!(0x0f, self, self, self)
    }

    #[inline(always)]
    fn nor(self, b: Self) -> Self {
        ternlog!(0x03, self, b, b)
    }

    #[inline(always)]
    fn xnor(self, b: Self) -> Self {
        ternlog!(0xc3, self, b, b)
    }

    #[inline(always)]
    fn xor3(self, b: Self, c: Self) -> Self {
        ternlog!(0x96, self, b, c)
    }

    #[inline(always)]
    fn xor4(self, b: Self, c: Self, d: Self) -> Self {
        ternlog!(0x96, self, b, c).xor(d)
    }

    #[inline(always)]
    fn and3(self, b: Self, c: Self) -> Self {
        ternlog!(0x80, self, b, c)
    }

    #[inline(always)]
    fn or3(self, b: Self, c: Self) -> Self {
        ternlog!(0xfe, self, b, c)
    }

    #[inline(always)]
    fn xorand(self, b: Self, c: Self) -> Self {
        ternlog!(0x78, self, b, c)
    }

    #[inline(always)]
    fn andxor(self, b: Self, c: Self) -> Self {
        ternlog!(0x60, self, b, c)
    }

    #[inline(always)]
    fn xoror(self, b: Self, c: Self) -> Self {
        ternlog!(0x1e, self, b, c)
    }

    #[inline(always)]
    fn xorandnot(self, b: Self, c: Self) -> Self {
        ternlog!(0xd2, self, b, c)
    }

    #[inline(always)]
    fn orand(self, b: Self, c: Self) -> Self {
        ternlog!(0xf8, self, b, c)
    }

    #[inline(always)]
    unsafe fn load_block(lanes: &[&[u8; BLOCK_BYTES]]) -> [Self; BLOCK_WORDS] {
        let mut r = [unsafe { _mm512_setzero_si512() }; 16];
        for (l, m) in lanes[..16].iter().enumerate() {
            r[l] = unsafe { core::ptr::read_unaligned(m.as_ptr() as *const __m512i) };
        }
        let mut w = [unsafe { Self::zero() }; BLOCK_WORDS];
        unsafe {
            for (x, y) in w.iter_mut().zip(transpose16!(r)) {
                *x = Self(y);
            }
        }
        w
    }
}

// kernels run here, with AVX-512 enabled.
#[target_feature(enable = "avx512f", enable = "avx512bw")]
unsafe fn unsafe_run<K: Kernel<V512>>(k: K) -> K::Output {
    k.run()
}

impl AesRound for V512 {
    #[inline]
    fn aes_available() -> bool {
        support_vaes() && Self::available()
    }

    #[inline(always)]
    unsafe fn aesenc(self, key: Self) -> Self {
        unsafe { Self(_mm512_aesenc_epi128(self.0, key.0)) }
    }

    #[inline(always)]
    unsafe fn aesenclast(self, key: Self) -> Self {
        unsafe { Self(_mm512_aesenclast_epi128(self.0, key.0)) }
    }

    #[inline(always)]
    unsafe fn aesdec(self, key: Self) -> Self {
        unsafe { Self(_mm512_aesdec_epi128(self.0, key.0)) }
    }

    #[inline(always)]
    unsafe fn aesdeclast(self, key: Self) -> Self {
        unsafe { Self(_mm512_aesdeclast_epi128(self.0, key.0)) }
    }
}
