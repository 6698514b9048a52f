use std::sync::Arc;

use http::{HeaderMap, HeaderValue, Request};

use crate::{Error, LengthSampler, OsSampler, PaddingOptions, RandomPool};

/// Computes padding header values and attaches them to messages.
#[derive(Debug)]
pub struct PaddingInjector<S = OsSampler> {
    pool: RandomPool,
    sampler: Arc<S>,
    options: Arc<PaddingOptions>,
}

impl<S> Clone for PaddingInjector<S> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            sampler: self.sampler.clone(),
            options: self.options.clone(),
        }
    }
}

impl PaddingInjector<OsSampler> {
    pub fn new(pool: RandomPool, options: PaddingOptions) -> Self {
        Self::with_sampler(pool, OsSampler, options)
    }
}

impl<S: LengthSampler> PaddingInjector<S> {
    pub fn with_sampler(pool: RandomPool, sampler: S, options: PaddingOptions) -> Self {
        let mut options = options;
        // no-op unless the options were built for a different pool
        options.profile = options.profile.normalize(pool.capacity());
        Self {
            pool,
            sampler: Arc::new(sampler),
            options: Arc::new(options),
        }
    }

    pub fn options(&self) -> &PaddingOptions {
        &self.options
    }

    pub fn pool(&self) -> &RandomPool {
        &self.pool
    }

    /// Draws one padding value. A zero length draw means no padding and yields `None`.
    pub fn generate(&self) -> Result<Option<HeaderValue>, Error> {
        let profile = self.options.profile;
        let length = self
            .sampler
            .uniform_int(profile.min_length, profile.max_length)?;
        if length == 0 {
            return Ok(None);
        }
        let padding = self.pool.slice(length, self.sampler.as_ref());
        HeaderValue::from_maybe_shared(padding)
            .map(Some)
            .map_err(|_| Error::InvalidHeaderValue)
    }

    /// Best-effort [`generate`](Self::generate): failures are logged and
    /// reported as no padding, so the message always goes out.
    pub fn draw(&self) -> Option<HeaderValue> {
        self.generate().unwrap_or_else(|e| {
            tracing::warn!("Failed to generate random padding, sending without it: {}", e);
            None
        })
    }

    /// Sets the padding header on `headers`, replacing any previous value.
    /// Returns whether a header was set.
    pub fn pad_headers(&self, headers: &mut HeaderMap) -> bool {
        match self.draw() {
            Some(value) => {
                tracing::trace!(
                    "Attaching {} bytes of padding to {}",
                    value.len(),
                    self.options.header_name
                );
                headers.insert(self.options.header_name.clone(), value);
                true
            }
            None => false,
        }
    }

    pub fn pad_request<B>(&self, request: &mut Request<B>) -> bool {
        self.pad_headers(request.headers_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        sampler::testing::FailingSampler, PaddingProfile, DEFAULT_PADDING_CHARSET,
        DEFAULT_POOL_CAPACITY,
    };

    fn injector(min: usize, max: usize) -> PaddingInjector {
        let pool = RandomPool::with_defaults(&OsSampler).unwrap();
        let options = PaddingOptions::builder()
            .header_name("X-Pad")
            .profile(PaddingProfile::new(min, max))
            .build(pool.capacity())
            .unwrap();
        PaddingInjector::new(pool, options)
    }

    #[test]
    fn test_fixed_length_padding() {
        let injector = injector(10, 10);
        let mut headers = HeaderMap::new();
        assert!(injector.pad_headers(&mut headers));
        let value = headers.get("X-Pad").unwrap();
        assert_eq!(value.len(), 10);
        assert!(value
            .as_bytes()
            .iter()
            .all(|b| DEFAULT_PADDING_CHARSET.contains(b)));
    }

    #[test]
    fn test_zero_length_means_no_header() {
        let injector = injector(0, 0);
        assert!(injector.generate().unwrap().is_none());
        let mut headers = HeaderMap::new();
        assert!(!injector.pad_headers(&mut headers));
        assert!(headers.is_empty());
    }

    #[test]
    fn test_lengths_follow_profile() {
        let injector = injector(32, 256);
        for _ in 0..500 {
            let value = injector.generate().unwrap().unwrap();
            assert!((32..=256).contains(&value.len()));
        }
    }

    #[test]
    fn test_profile_renormalized_for_smaller_pool() {
        let pool = RandomPool::new(64, DEFAULT_PADDING_CHARSET, &OsSampler).unwrap();
        let options = PaddingOptions::builder()
            .profile(PaddingProfile::new(100, 2000))
            .build(DEFAULT_POOL_CAPACITY)
            .unwrap();
        let injector = PaddingInjector::new(pool, options);
        assert_eq!(injector.options().profile(), PaddingProfile::new(64, 64));
        assert_eq!(injector.generate().unwrap().unwrap().len(), 64);
    }

    #[test]
    fn test_entropy_failure_skips_padding() {
        let pool = RandomPool::with_defaults(&OsSampler).unwrap();
        let options = PaddingOptions::builder().build(pool.capacity()).unwrap();
        let injector = PaddingInjector::with_sampler(pool, FailingSampler, options);
        assert!(matches!(injector.generate(), Err(Error::EntropyFailure(_))));

        let mut request = Request::get("https://example.com/").body(()).unwrap();
        assert!(!injector.pad_request(&mut request));
        assert!(request.headers().is_empty());
    }

    #[test]
    fn test_pad_request_replaces_existing_value() {
        let injector = injector(20, 20);
        let mut request = Request::post("https://example.com/")
            .header("X-Pad", "stale")
            .body(())
            .unwrap();
        assert!(injector.pad_request(&mut request));
        let values: Vec<_> = request.headers().get_all("X-Pad").iter().collect();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].len(), 20);
    }
}
