use crate::error::Result;
use crate::shabal;

pub trait Hash<const DIGEST_SIZE: usize> {
    fn reset(&mut self);

    fn write(&mut self, data: &[u8]);

    /// Writes the digest to `digest[..DIGEST_SIZE]`, or fails with
    /// `Error::OutputTooShort`.
    fn sum_into(&self, digest: &mut [u8]) -> Result<()>;

    fn sum(&self) -> [u8; DIGEST_SIZE];

    // The block size of the input for the Hash, 64 for Shabal.
    // The self is not necessarily, but we need it for a dyn Hash.
    fn block_size(&self) -> usize;
}

impl<const DIGEST_SIZE: usize> Hash<DIGEST_SIZE> for shabal::Digest<DIGEST_SIZE> {
    fn reset(&mut self) {
        shabal::Digest::reset(self);
    }

    fn write(&mut self, data: &[u8]) {
        shabal::Digest::write(self, data);
    }

    fn sum_into(&self, digest: &mut [u8]) -> Result<()> {
        shabal::Digest::sum_into(self, digest)
    }

    fn sum(&self) -> [u8; DIGEST_SIZE] {
        shabal::Digest::sum(self)
    }

    fn block_size(&self) -> usize {
        shabal::BLOCK_SIZE
    }
}
