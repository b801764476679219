//! Runtime backend selection and batch hashing.
//!
//! A [`Dispatcher`] picks one vector backend and hashes many independent
//! messages with it: messages of equal length are grouped into full lane
//! groups, anything left over goes through the scalar digest.

use alloc::vec::Vec;
use core::fmt;

use crate::error::{Error, Result};
use crate::shabal::Digest;
use crate::shabal_simd::ShabalX;
use crate::simd::{Lanes, Vector};

#[cfg(target_arch = "x86_64")]
use crate::simd::amd64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Backend {
    /// AVX-512F/BW, 16 lanes.
    Avx512 = 0,
    /// AVX2, 8 lanes.
    Avx2 = 1,
    /// SSE4.1, 4 lanes.
    Sse41 = 2,
    /// NEON, 4 lanes.
    Neon = 3,
    /// Portable vectors, 4 lanes.
    Portable = 4,
}

impl Backend {
    /// Every backend, best first.
    pub const ALL: [Backend; 5] = [Backend::Avx512, Backend::Avx2, Backend::Sse41, Backend::Neon, Backend::Portable];

    pub const fn lanes(self) -> usize {
        match self {
            Backend::Avx512 => 16,
            Backend::Avx2 => 8,
            Backend::Sse41 | Backend::Neon | Backend::Portable => 4,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Backend::Avx512 => "avx512",
            Backend::Avx2 => "avx2",
            Backend::Sse41 => "sse4.1",
            Backend::Neon => "neon",
            Backend::Portable => "portable",
        }
    }

    /// Whether the running cpu supports this backend.
    pub fn available(self) -> bool {
        match self {
            #[cfg(target_arch = "x86_64")]
            Backend::Avx512 => amd64::V512::available(),
            #[cfg(target_arch = "x86_64")]
            Backend::Avx2 => amd64::V256::available(),
            #[cfg(target_arch = "x86_64")]
            Backend::Sse41 => amd64::V128::available(),
            #[cfg(target_arch = "aarch64")]
            Backend::Neon => crate::simd::aarch64::V128::available(),
            Backend::Portable => true,
            _ => false,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hashes batches of messages on one backend. A dispatcher only holds a
/// backend the running cpu supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatcher {
    backend: Backend,
}

impl Dispatcher {
    /// The best backend of this cpu.
    pub fn detect() -> Self {
        let backend = Backend::ALL
            .into_iter()
            .find(|b| b.available())
            .unwrap_or(Backend::Portable);
        #[cfg(feature = "tracing")]
        tracing::debug!(%backend, lanes = backend.lanes(), "detected shabal backend");
        Dispatcher { backend }
    }

    pub fn with_backend(backend: Backend) -> Result<Self> {
        if !backend.available() {
            #[cfg(feature = "tracing")]
            tracing::warn!(%backend, "shabal backend not supported on this cpu");
            return Err(Error::Unsupported(backend));
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(%backend, lanes = backend.lanes(), "forced shabal backend");
        Ok(Dispatcher { backend })
    }

    pub const fn backend(&self) -> Backend {
        self.backend
    }

    pub const fn lanes(&self) -> usize {
        self.backend.lanes()
    }

    /// Shabal-256 of every input, in input order.
    pub fn shabal256_batch(&self, inputs: &[&[u8]]) -> Vec<[u8; 32]> {
        self.batch::<32>(inputs)
    }

    /// Shabal-512 of every input, in input order.
    pub fn shabal512_batch(&self, inputs: &[&[u8]]) -> Vec<[u8; 64]> {
        self.batch::<64>(inputs)
    }

    fn batch<const D: usize>(&self, inputs: &[&[u8]]) -> Vec<[u8; D]> {
        let mut out = vec![[0u8; D]; inputs.len()];
        let lanes = self.lanes();

        let mut order: Vec<usize> = (0..inputs.len()).collect();
        order.sort_by_key(|&i| inputs[i].len());

        let mut digests = [0u8; 64 * 16];
        for same_len in order.chunk_by(|&i, &j| inputs[i].len() == inputs[j].len()) {
            let groups = same_len.chunks_exact(lanes);
            let rest = groups.remainder();
            for group in groups {
                let mut msgs: [&[u8]; 16] = [&[]; 16];
                for (m, &i) in msgs.iter_mut().zip(group) {
                    *m = inputs[i];
                }
                if self.hash_group::<D>(&msgs[..lanes], &mut digests).is_ok() {
                    for (l, &i) in group.iter().enumerate() {
                        out[i].copy_from_slice(&digests[l * D..(l + 1) * D]);
                    }
                } else {
                    for &i in group {
                        out[i] = scalar::<D>(inputs[i]);
                    }
                }
            }
            for &i in rest {
                out[i] = scalar::<D>(inputs[i]);
            }
        }
        out
    }

    fn hash_group<const D: usize>(&self, lanes: &[&[u8]], out: &mut [u8]) -> Result<()> {
        match self.backend {
            #[cfg(target_arch = "x86_64")]
            Backend::Avx512 => hash_lanes::<amd64::V512, D>(lanes, out),
            #[cfg(target_arch = "x86_64")]
            Backend::Avx2 => hash_lanes::<amd64::V256, D>(lanes, out),
            #[cfg(target_arch = "x86_64")]
            Backend::Sse41 => hash_lanes::<amd64::V128, D>(lanes, out),
            #[cfg(target_arch = "aarch64")]
            Backend::Neon => hash_lanes::<crate::simd::aarch64::V128, D>(lanes, out),
            Backend::Portable => hash_lanes::<Lanes<4>, D>(lanes, out),
            b => Err(Error::Unsupported(b)),
        }
    }
}

fn scalar<const D: usize>(msg: &[u8]) -> [u8; D] {
    let mut h = Digest::<D>::new();
    h.write(msg);
    h.sum()
}

fn hash_lanes<V: Vector, const D: usize>(lanes: &[&[u8]], out: &mut [u8]) -> Result<()> {
    let mut s = ShabalX::<V, D>::new()?;
    s.update(lanes)?;
    s.close(out)
}

#[cfg(feature = "std")]
#[ctor::ctor]
static GLOBAL_DISPATCHER: Dispatcher = { Dispatcher::detect() };

/// The process-wide dispatcher on the best detected backend.
pub fn global() -> Dispatcher {
    #[cfg(feature = "std")]
    return *GLOBAL_DISPATCHER;
    #[cfg(not(feature = "std"))]
    return Dispatcher::detect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};

    fn random_inputs(rng: &mut StdRng, n: usize) -> Vec<Vec<u8>> {
        (0..n)
            .map(|_| {
                // few distinct lengths, so most inputs share a lane group.
                let len = [0, 1, 64, 100, 129][rng.random_range(0..5)];
                let mut v = vec![0u8; len];
                rng.fill_bytes(&mut v);
                v
            })
            .collect()
    }

    #[test]
    fn test_detect() {
        let d = Dispatcher::detect();
        assert!(d.backend().available());
        assert_eq!(global(), global());
        assert_eq!(global().backend(), d.backend());
        assert!(Backend::Portable.available());
    }

    #[test]
    fn test_backend_names() {
        for b in Backend::ALL {
            assert_eq!(std::format!("{b}"), b.name());
            assert!(matches!(b.lanes(), 4 | 8 | 16));
        }
        assert_eq!(std::format!("{}", Backend::Sse41), "sse4.1");
    }

    #[test]
    fn test_unsupported() {
        for b in Backend::ALL {
            match Dispatcher::with_backend(b) {
                Ok(d) => assert_eq!(d.backend(), b),
                Err(e) => {
                    assert!(!b.available());
                    assert_eq!(e, Error::Unsupported(b));
                }
            }
        }
        #[cfg(target_arch = "x86_64")]
        assert_eq!(Dispatcher::with_backend(Backend::Neon), Err(Error::Unsupported(Backend::Neon)));
    }

    #[test]
    fn test_batch_matches_scalar() {
        let mut rng = StdRng::seed_from_u64(0xba7c);
        let msgs = random_inputs(&mut rng, 77);
        let inputs: Vec<&[u8]> = msgs.iter().map(|m| m.as_slice()).collect();

        for b in Backend::ALL.into_iter().filter(|b| b.available()) {
            let d = Dispatcher::with_backend(b).unwrap();
            let d256 = d.shabal256_batch(&inputs);
            let d512 = d.shabal512_batch(&inputs);
            assert_eq!(d256.len(), inputs.len());
            for (i, msg) in inputs.iter().enumerate() {
                assert_eq!(d256[i], shabal256!(msg), "{b} input {i}");
                assert_eq!(d512[i], shabal512!(msg), "{b} input {i}");
            }
        }
    }

    #[test]
    fn test_empty_batch() {
        assert!(global().shabal256_batch(&[]).is_empty());
        let one = global().shabal512_batch(&[&b"abc"[..]]);
        assert_eq!(one, std::vec![shabal512!(b"abc")]);
    }
}
