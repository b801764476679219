#[cfg(not(feature = "std"))]
pub use aarch64_no_std::*;

#[cfg(feature = "std")]
pub use aarch64_std::*;

#[cfg(feature = "std")]
mod aarch64_std {
    #[inline]
    pub fn support_neon() -> bool {
        std::arch::is_aarch64_feature_detected!("neon")
    }

    #[inline]
    pub fn support_aes() -> bool {
        std::arch::is_aarch64_feature_detected!("aes")
    }
}

#[cfg(not(feature = "std"))]
mod aarch64_no_std {
    // neon is part of the aarch64 baseline.
    #[inline]
    pub fn support_neon() -> bool {
        true
    }

    #[inline]
    pub fn support_aes() -> bool {
        cfg!(target_feature = "aes")
    }
}
