use serde::Deserialize;

use crate::{
    Error, LengthSampler, OsSampler, PaddingInjector, PaddingOptions, PaddingProfile, Preset,
    ProfileSource, RandomPool, DEFAULT_PADDING_CHARSET, DEFAULT_POOL_CAPACITY,
};

/// Declarative form of a padding installation, e.g. a `[padding]` table in a
/// service config file.
///
/// ```toml
/// header_name = "X-Pad"
/// profile = { min_length = 64, max_length = 512 }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaddingConfig {
    pub header_name: String,
    pub profile: Option<ProfileConfig>,
    pub charset: Option<String>,
    pub pool_capacity: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ProfileConfig {
    Preset(Preset),
    /// Signed so that negative minimums are floored instead of rejected.
    Custom { min_length: i64, max_length: i64 },
}

impl From<ProfileConfig> for ProfileSource {
    fn from(profile: ProfileConfig) -> Self {
        match profile {
            ProfileConfig::Preset(preset) => ProfileSource::Preset(preset),
            ProfileConfig::Custom {
                min_length,
                max_length,
            } => ProfileSource::Custom(PaddingProfile::from_signed(min_length, max_length)),
        }
    }
}

impl PaddingConfig {
    /// Builds the pool and injector. Fails if the pool cannot be filled.
    pub fn build(&self) -> Result<PaddingInjector, Error> {
        self.build_with_sampler(OsSampler)
    }

    pub fn build_with_sampler<S: LengthSampler>(
        &self,
        sampler: S,
    ) -> Result<PaddingInjector<S>, Error> {
        let capacity = self.pool_capacity.unwrap_or(DEFAULT_POOL_CAPACITY);
        let charset = self
            .charset
            .as_deref()
            .map(str::as_bytes)
            .unwrap_or(&DEFAULT_PADDING_CHARSET[..]);
        let pool = RandomPool::new(capacity, charset, &sampler)?;

        let mut options = PaddingOptions::builder().header_name(self.header_name.clone());
        if let Some(profile) = self.profile {
            options = options.profile(profile);
        }
        let options = options.build(capacity)?;
        Ok(PaddingInjector::with_sampler(pool, sampler, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{sampler::testing::FailingSampler, MAX_POOL_CAPACITY, PROFILE_DEFAULT};

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: PaddingConfig = toml::from_str("").unwrap();
        let injector = config.build().unwrap();
        assert_eq!(injector.options().header_name().as_str(), "t-padding");
        assert_eq!(injector.options().profile(), PROFILE_DEFAULT);
        assert_eq!(injector.pool().capacity(), DEFAULT_POOL_CAPACITY);
    }

    #[test]
    fn test_preset_profile() {
        let config: PaddingConfig = toml::from_str(
            r#"
            header_name = "X-Pad"
            profile = "long"
            pool_capacity = 2048
            "#,
        )
        .unwrap();
        let injector = config.build().unwrap();
        assert_eq!(injector.options().header_name().as_str(), "x-pad");
        assert_eq!(injector.options().profile(), PaddingProfile::new(1024, 2048));
    }

    #[test]
    fn test_custom_profile_is_normalized() {
        let config: PaddingConfig = toml::from_str(
            r#"
            profile = { min_length = -20, max_length = 99999 }
            charset = "X"
            "#,
        )
        .unwrap();
        let injector = config.build().unwrap();
        assert_eq!(injector.options().profile(), PaddingProfile::new(0, 4096));
        let value = injector.generate().unwrap();
        assert!(value.map_or(true, |v| v.as_bytes().iter().all(|&b| b == b'X')));
    }

    #[test]
    fn test_rejects_unknown_preset_and_fields() {
        assert!(toml::from_str::<PaddingConfig>(r#"profile = "huge""#).is_err());
        assert!(toml::from_str::<PaddingConfig>("min_length = 3").is_err());
    }

    #[test]
    fn test_invalid_config_values() {
        let config = PaddingConfig {
            charset: Some("tab\there".into()),
            ..Default::default()
        };
        assert!(matches!(config.build(), Err(Error::InvalidCharset(_))));

        let config = PaddingConfig {
            pool_capacity: Some(0),
            ..Default::default()
        };
        assert!(matches!(config.build(), Err(Error::InvalidCapacity(0))));
    }

    #[test]
    fn test_oversized_pool_capacity_is_an_error() {
        for capacity in [MAX_POOL_CAPACITY + 1, usize::MAX] {
            let config = PaddingConfig {
                pool_capacity: Some(capacity),
                ..Default::default()
            };
            let err = config.build().unwrap_err();
            assert!(matches!(err, Error::InvalidCapacity(c) if c == capacity));
        }

        let config: PaddingConfig = toml::from_str("pool_capacity = 8192").unwrap();
        assert_eq!(config.build().unwrap().pool().capacity(), 8192);
    }

    #[test]
    fn test_pool_entropy_failure_is_fatal() {
        let err = PaddingConfig::default()
            .build_with_sampler(FailingSampler)
            .unwrap_err();
        assert!(matches!(err, Error::EntropyFailure(_)));
    }
}
