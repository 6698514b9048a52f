use rand::{rngs::OsRng, RngCore};

use crate::Error;

/// Source of uniformly distributed integers used for padding lengths and
/// pool offsets.
///
/// Implementors only provide raw 64-bit draws; [`LengthSampler::uniform_int`]
/// turns them into an unbiased value in a closed range by rejection sampling.
/// Samplers are shared between every in-flight request, so they must be safe
/// to call concurrently.
pub trait LengthSampler: Send + Sync {
    fn next_u64(&self) -> Result<u64, Error>;

    /// Returns an integer in `[min, max]` inclusive.
    ///
    /// `min > max` is rejected with [`Error::InvalidRange`]; the bounds are
    /// never swapped. `min == max` returns `min` without drawing.
    fn uniform_int(&self, min: usize, max: usize) -> Result<usize, Error> {
        if min > max {
            return Err(Error::InvalidRange { min, max });
        }
        if min == max {
            return Ok(min);
        }
        let span = match ((max - min) as u64).checked_add(1) {
            Some(span) => span,
            // the range covers every u64, any draw is uniform
            None => return Ok(min + self.next_u64()? as usize),
        };
        // 2^64 mod span: draws below this would favour the low residues
        let threshold = span.wrapping_neg() % span;
        loop {
            let value = self.next_u64()?;
            if value >= threshold {
                return Ok(min + (value % span) as usize);
            }
        }
    }
}

/// Sampler backed by the operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsSampler;

impl LengthSampler for OsSampler {
    fn next_u64(&self) -> Result<u64, Error> {
        let mut buf = [0u8; 8];
        OsRng.try_fill_bytes(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }
}

impl<S: LengthSampler + ?Sized> LengthSampler for std::sync::Arc<S> {
    fn next_u64(&self) -> Result<u64, Error> {
        (**self).next_u64()
    }

    fn uniform_int(&self, min: usize, max: usize) -> Result<usize, Error> {
        (**self).uniform_int(min, max)
    }
}
