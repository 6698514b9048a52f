use bytes::Bytes;

use crate::{Error, LengthSampler};

/// Default pool size, and therefore the longest padding a single header can carry.
pub const DEFAULT_POOL_CAPACITY: usize = 4096;
/// Far beyond what proxies accept in a single header line.
pub const MAX_POOL_CAPACITY: usize = 64 * 1024;

pub const DEFAULT_PADDING_CHARSET: &[u8; 62] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Pre-generated padding content, filled once and shared read-only.
#[derive(Debug, Clone)]
pub struct RandomPool {
    data: Bytes,
}

impl RandomPool {
    /// Fills a pool of `capacity` bytes, each drawn uniformly from `charset`.
    ///
    /// Any entropy failure aborts construction: a pool with predictable
    /// content must never be handed out.
    pub fn new<S: LengthSampler + ?Sized>(
        capacity: usize,
        charset: &[u8],
        sampler: &S,
    ) -> Result<Self, Error> {
        if capacity == 0 || capacity > MAX_POOL_CAPACITY {
            return Err(Error::InvalidCapacity(capacity));
        }
        validate_charset(charset)?;
        let mut data = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            let index = sampler.uniform_int(0, charset.len() - 1)?;
            data.push(charset[index]);
        }
        tracing::debug!(capacity, charset_len = charset.len(), "Random padding pool initialized");
        Ok(Self { data: data.into() })
    }

    pub fn with_defaults<S: LengthSampler + ?Sized>(sampler: &S) -> Result<Self, Error> {
        Self::new(DEFAULT_POOL_CAPACITY, DEFAULT_PADDING_CHARSET, sampler)
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// `length` contiguous bytes at a random offset, clamped to the capacity.
    /// A failed offset draw falls back to the start of the pool.
    pub fn slice<S: LengthSampler + ?Sized>(&self, length: usize, sampler: &S) -> Bytes {
        if length == 0 {
            return Bytes::new();
        }
        let length = length.min(self.capacity());
        let start = sampler
            .uniform_int(0, self.capacity() - length)
            .unwrap_or_else(|e| {
                tracing::trace!("Failed to draw padding offset, falling back to 0: {}", e);
                0
            });
        self.data.slice(start..start + length)
    }
}

fn validate_charset(charset: &[u8]) -> Result<(), Error> {
    if charset.is_empty() {
        return Err(Error::InvalidCharset("charset is empty".into()));
    }
    if let Some(byte) = charset.iter().find(|b| !b.is_ascii_graphic()) {
        return Err(Error::InvalidCharset(
            format!("byte 0x{byte:02x} is not visible ASCII").into(),
        ));
    }
    Ok(())
}
