use core::arch::aarch64::*;

use crate::internal::cpuid::aarch64::*;
use crate::simd::{Aligned16, AesRound, BLOCK_BYTES, BLOCK_WORDS, Kernel, Vector};

/// 4 lanes in one NEON q register.
#[derive(Debug, Clone, Copy)]
#[repr(transparent)]
pub struct V128(uint32x4_t);

impl Vector for V128 {
    const LANES: usize = 4;
    const NAME: &'static str = "neon";

    type Words = Aligned16<u32, 4>;

    #[inline]
    fn available() -> bool {
        support_neon()
    }

    #[inline(always)]
    unsafe fn dispatch<K: Kernel<Self>>(k: K) -> K::Output {
        unsafe { unsafe_run(k) }
    }

    #[inline(always)]
    unsafe fn zero() -> Self {
        unsafe { Self(vdupq_n_u32(0)) }
    }

    #[inline(always)]
    unsafe fn splat(x: u32) -> Self {
        unsafe { Self(vdupq_n_u32(x)) }
    }

    #[inline(always)]
    unsafe fn load(src: &Self::Words) -> Self {
        unsafe { Self(vld1q_u32(src.0.as_ptr())) }
    }

    #[inline(always)]
    fn store(self, dst: &mut Self::Words) {
        unsafe { vst1q_u32(dst.0.as_mut_ptr(), self.0) }
    }

    #[inline(always)]
    fn add32(self, b: Self) -> Self {
        unsafe { Self(vaddq_u32(self.0, b.0)) }
    }

    #[inline(always)]
    fn sub32(self, b: Self) -> Self {
        unsafe { Self(vsubq_u32(self.0, b.0)) }
    }

    #[inline(always)]
    fn mullo32(self, b: Self) -> Self {
        unsafe { Self(vmulq_u32(self.0, b.0)) }
    }

    #[inline(always)]
    fn and(self, b: Self) -> Self {
        unsafe { Self(vandq_u32(self.0, b.0)) }
    }

    #[inline(always)]
    fn or(self, b: Self) -> Self {
        unsafe { Self(vorrq_u32(self.0, b.0)) }
    }

    #[inline(always)]
    fn xor(self, b: Self) -> Self {
        unsafe { Self(veorq_u32(self.0, b.0)) }
    }

    // vbic(x, y) = x & !y
    #[inline(always)]
    fn andnot(self, b: Self) -> Self {
        unsafe { Self(vbicq_u32(b.0, self.0)) }
    }

    #[inline(always)]
    fn not(self) -> Self {
        unsafe { Self(vmvnq_u32(self.0)) }
    }

    // vshlq shifts right for negative counts.
    #[inline(always)]
    fn shl32<const N: i32>(self) -> Self {
        const { assert!(N >= 0 && N < 32) };
        unsafe { Self(vshlq_u32(self.0, vdupq_n_s32(N))) }
    }

    #[inline(always)]
    fn shr32<const N: i32>(self) -> Self {
        const { assert!(N >= 0 && N < 32) };
        unsafe { Self(vshlq_u32(self.0, vdupq_n_s32(-N))) }
    }

    #[inline(always)]
    fn rol32<const N: i32>(self) -> Self {
        const { assert!(N > 0 && N < 32) };
        unsafe { Self(vorrq_u32(vshlq_u32(self.0, vdupq_n_s32(N)), vshlq_u32(self.0, vdupq_n_s32(N - 32)))) }
    }

    #[inline(always)]
    fn ror32<const N: i32>(self) -> Self {
        const { assert!(N > 0 && N < 32) };
        unsafe { Self(vorrq_u32(vshlq_u32(self.0, vdupq_n_s32(-N)), vshlq_u32(self.0, vdupq_n_s32(32 - N)))) }
    }

    #[inline(always)]
    fn cmpeq32(self, b: Self) -> Self {
        unsafe { Self(vceqq_u32(self.0, b.0)) }
    }

    #[inline(always)]
    fn cmpgt32(self, b: Self) -> Self {
        unsafe { Self(vcgtq_s32(vreinterpretq_s32_u32(self.0), vreinterpretq_s32_u32(b.0))) }
    }

    #[inline(always)]
    fn shuflr32(self) -> Self {
        unsafe { Self(vextq_u32::<1>(self.0, self.0)) }
    }

    #[inline(always)]
    fn shufll32(self) -> Self {
        unsafe { Self(vextq_u32::<3>(self.0, self.0)) }
    }

    #[inline(always)]
    fn rev32(self) -> Self {
        unsafe {
            let t = vrev64q_u32(self.0);
            Self(vextq_u32::<2>(t, t))
        }
    }

    #[inline(always)]
    fn swap64(self) -> Self {
        unsafe { Self(vextq_u32::<2>(self.0, self.0)) }
    }

    #[inline(always)]
    fn swap64_32(self) -> Self {
        unsafe { Self(vrev64q_u32(self.0)) }
    }

    #[inline(always)]
    fn bswap32(self) -> Self {
        unsafe { Self(vreinterpretq_u32_u8(vrev32q_u8(vreinterpretq_u8_u32(self.0)))) }
    }

    #[inline(always)]
    unsafe fn load_block(lanes: &[&[u8; BLOCK_BYTES]]) -> [Self; BLOCK_WORDS] {
        let (m0, m1, m2, m3) = (lanes[0], lanes[1], lanes[2], lanes[3]);
        let mut w = [unsafe { Self::zero() }; BLOCK_WORDS];
        unsafe {
            for q in 0..4 {
                let r0 = vreinterpretq_u32_u8(vld1q_u8(m0.as_ptr().add(16 * q)));
                let r1 = vreinterpretq_u32_u8(vld1q_u8(m1.as_ptr().add(16 * q)));
                let r2 = vreinterpretq_u32_u8(vld1q_u8(m2.as_ptr().add(16 * q)));
                let r3 = vreinterpretq_u32_u8(vld1q_u8(m3.as_ptr().add(16 * q)));
                let t0 = vtrnq_u32(r0, r1);
                let t1 = vtrnq_u32(r2, r3);
                w[4 * q] = Self(vcombine_u32(vget_low_u32(t0.0), vget_low_u32(t1.0)));
                w[4 * q + 1] = Self(vcombine_u32(vget_low_u32(t0.1), vget_low_u32(t1.1)));
                w[4 * q + 2] = Self(vcombine_u32(vget_high_u32(t0.0), vget_high_u32(t1.0)));
                w[4 * q + 3] = Self(vcombine_u32(vget_high_u32(t0.1), vget_high_u32(t1.1)));
            }
        }
        w
    }
}

#[target_feature(enable = "neon")]
unsafe fn unsafe_run<K: Kernel<V128>>(k: K) -> K::Output {
    k.run()
}

// vaese/vaesd xor the key before the round, so use a zero key and xor after.
impl AesRound for V128 {
    #[inline]
    fn aes_available() -> bool {
        support_aes()
    }

    #[inline(always)]
    unsafe fn aesenc(self, key: Self) -> Self {
        unsafe {
            let s = vaesmcq_u8(vaeseq_u8(vreinterpretq_u8_u32(self.0), vdupq_n_u8(0)));
            Self(veorq_u32(vreinterpretq_u32_u8(s), key.0))
        }
    }

    #[inline(always)]
    unsafe fn aesenclast(self, key: Self) -> Self {
        unsafe {
            let s = vaeseq_u8(vreinterpretq_u8_u32(self.0), vdupq_n_u8(0));
            Self(veorq_u32(vreinterpretq_u32_u8(s), key.0))
        }
    }

    #[inline(always)]
    unsafe fn aesdec(self, key: Self) -> Self {
        unsafe {
            let s = vaesimcq_u8(vaesdq_u8(vreinterpretq_u8_u32(self.0), vdupq_n_u8(0)));
            Self(veorq_u32(vreinterpretq_u32_u8(s), key.0))
        }
    }

    #[inline(always)]
    unsafe fn aesdeclast(self, key: Self) -> Self {
        unsafe {
            let s = vaesdq_u8(vreinterpretq_u8_u32(self.0), vdupq_n_u8(0));
            Self(veorq_u32(vreinterpretq_u32_u8(s), key.0))
        }
    }
}
