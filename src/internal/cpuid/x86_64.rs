#[cfg(not(feature = "std"))]
pub use x86_64_no_std::*;

#[cfg(feature = "std")]
pub use x86_64_std::*;

#[cfg(feature = "std")]
mod x86_64_std {
    #[inline]
    pub fn support_ssse3() -> bool {
        is_x86_feature_detected!("ssse3")
    }

    #[inline]
    pub fn support_sse41() -> bool {
        is_x86_feature_detected!("sse4.1")
    }

    #[inline]
    pub fn support_aes() -> bool {
        is_x86_feature_detected!("aes")
    }

    #[inline]
    pub fn support_avx() -> bool {
        is_x86_feature_detected!("avx")
    }

    #[inline]
    pub fn support_avx2() -> bool {
        is_x86_feature_detected!("avx2")
    }

    #[inline]
    pub fn support_avx512f() -> bool {
        is_x86_feature_detected!("avx512f")
    }

    #[inline]
    pub fn support_avx512bw() -> bool {
        is_x86_feature_detected!("avx512bw")
    }

    #[inline]
    pub fn support_vaes() -> bool {
        is_x86_feature_detected!("vaes")
    }
}

#[cfg(any(not(feature = "std"), test))]
#[allow(dead_code)]
mod x86_64_no_std {
    use core::arch::asm;

    #[inline]
    pub fn cpuid(leaf: u32, sub_leaf: u32) -> (u32, u32, u32, u32) {
        let mut a;
        let mut b;
        let mut c;
        let mut d;
        unsafe {
            asm!(
                "push rbx",
                "cpuid",
                "mov {0:e}, ebx",
                "pop rbx",
                out(reg) b,
                out("edx")  d,
                inout("eax") leaf => a,
                inout("ecx") sub_leaf => c,
            );
        }
        (a, b, c, d)
    }

    // XCR0, the register states the OS saves on context switch.
    #[inline]
    fn xcr0() -> u32 {
        let (_, _, ecx, _) = cpuid(1, 0);
        // OSXSAVE
        if ecx & (1 << 27) == 0 {
            return 0;
        }
        let eax: u32;
        unsafe {
            asm!(
                "xgetbv",
                in("ecx") 0,
                out("eax") eax,
                out("edx") _,
            );
        }
        eax
    }

    #[inline]
    fn os_saves_ymm() -> bool {
        xcr0() & 0x6 == 0x6
    }

    #[inline]
    fn os_saves_zmm() -> bool {
        xcr0() & 0xe6 == 0xe6
    }

    #[inline]
    pub fn support_ssse3() -> bool {
        let (_, _, ecx, _) = cpuid(1, 0);
        (ecx & (1 << 9)) != 0
    }

    #[inline]
    pub fn support_sse41() -> bool {
        let (_, _, ecx, _) = cpuid(1, 0);
        (ecx & (1 << 19)) != 0
    }

    #[inline]
    pub fn support_aes() -> bool {
        let (_, _, ecx, _) = cpuid(1, 0);
        (ecx & (1 << 25)) != 0
    }

    #[inline]
    pub fn support_avx() -> bool {
        let (_, _, ecx, _) = cpuid(1, 0);
        (ecx & (1 << 28)) != 0 && os_saves_ymm()
    }

    #[inline]
    pub fn support_avx2() -> bool {
        let (_, ebx, _, _) = cpuid(7, 0);
        (ebx & (1 << 5)) != 0 && support_avx()
    }

    #[inline]
    pub fn support_avx512f() -> bool {
        let (_, ebx, _, _) = cpuid(7, 0);
        (ebx & (1 << 16)) != 0 && os_saves_zmm()
    }

    #[inline]
    pub fn support_avx512bw() -> bool {
        let (_, ebx, _, _) = cpuid(7, 0);
        (ebx & (1 << 30)) != 0 && os_saves_zmm()
    }

    #[inline]
    pub fn support_vaes() -> bool {
        let (_, _, ecx, _) = cpuid(7, 0);
        (ecx & (1 << 9)) != 0 && os_saves_ymm()
    }
}
