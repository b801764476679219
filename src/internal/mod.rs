pub mod cpuid;

macro_rules! aligned_words {
    ($name: ident, $align: literal) => {
        // align to $align bytes, the natural alignment of a $align-byte vector.
        #[repr(align($align))]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name<T: core::any::Any, const N: usize>(pub [T; N]);

        impl<T: core::any::Any + Copy + Default, const N: usize> Default for $name<T, N> {
            fn default() -> Self {
                Self([T::default(); N])
            }
        }

        impl<T: core::any::Any, const N: usize> AsRef<[T]> for $name<T, N> {
            fn as_ref(&self) -> &[T] {
                &self.0
            }
        }

        impl<T: core::any::Any, const N: usize> AsMut<[T]> for $name<T, N> {
            fn as_mut(&mut self) -> &mut [T] {
                &mut self.0
            }
        }
    };
}

aligned_words!(Aligned16, 16);
aligned_words!(Aligned32, 32);
aligned_words!(Aligned64, 64);
