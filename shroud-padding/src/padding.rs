use std::{fmt, str::FromStr};

use serde::Deserialize;

use crate::{Error, DEFAULT_POOL_CAPACITY};

/// General purpose range for web pages and API responses.
pub const PROFILE_DEFAULT: PaddingProfile = PaddingProfile {
    min_length: 96,
    max_length: 1024,
};
/// Small range for tiny API responses and health checks.
pub const PROFILE_SHORT: PaddingProfile = PaddingProfile {
    min_length: 32,
    max_length: 256,
};
/// Large range for content-heavy pages; runs up to the default pool size.
pub const PROFILE_LONG: PaddingProfile = PaddingProfile {
    min_length: 1024,
    max_length: DEFAULT_POOL_CAPACITY,
};

/// Inclusive range of padding lengths, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddingProfile {
    pub min_length: usize,
    pub max_length: usize,
}

impl PaddingProfile {
    pub const fn new(min_length: usize, max_length: usize) -> Self {
        Self {
            min_length,
            max_length,
        }
    }

    /// Clamps the profile into `[0, capacity]` with `min_length <= max_length`.
    ///
    /// Misconfiguration is corrected rather than rejected, and each correction
    /// is logged once here, at installation time.
    #[tracing::instrument(level = "debug")]
    pub fn normalize(self, capacity: usize) -> Self {
        let mut profile = self;
        if profile.max_length > capacity {
            tracing::warn!(
                "Profile max_length ({}) exceeds the padding pool capacity ({}). It will be capped.",
                profile.max_length,
                capacity
            );
            profile.max_length = capacity;
        }
        if profile.min_length > profile.max_length {
            tracing::warn!(
                "Profile min_length ({}) is greater than max_length ({}). Adjusting to be equal.",
                profile.min_length,
                profile.max_length
            );
            profile.min_length = profile.max_length;
        }
        profile
    }

    /// Builds a profile from signed bounds, flooring both at zero.
    pub fn from_signed(min_length: i64, max_length: i64) -> Self {
        let floor = |v: i64| usize::try_from(v.max(0)).unwrap_or(usize::MAX);
        Self::new(floor(min_length), floor(max_length))
    }
}

impl Default for PaddingProfile {
    fn default() -> Self {
        PROFILE_DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Default,
    Short,
    Long,
}

impl Preset {
    pub fn profile(self) -> PaddingProfile {
        self.profile_for(DEFAULT_POOL_CAPACITY)
    }

    /// `Long` runs up to `capacity`; the other presets are fixed.
    pub fn profile_for(self, capacity: usize) -> PaddingProfile {
        match self {
            Preset::Default => PROFILE_DEFAULT,
            Preset::Short => PROFILE_SHORT,
            Preset::Long => PaddingProfile::new(PROFILE_LONG.min_length, capacity),
        }
    }
}

/// A profile as configured, before the pool capacity is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSource {
    Preset(Preset),
    Custom(PaddingProfile),
}

impl ProfileSource {
    pub fn resolve(self, capacity: usize) -> PaddingProfile {
        match self {
            ProfileSource::Preset(preset) => preset.profile_for(capacity),
            ProfileSource::Custom(profile) => profile,
        }
    }
}

impl From<Preset> for ProfileSource {
    fn from(preset: Preset) -> Self {
        ProfileSource::Preset(preset)
    }
}

impl From<PaddingProfile> for ProfileSource {
    fn from(profile: PaddingProfile) -> Self {
        ProfileSource::Custom(profile)
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(Preset::Default),
            "short" => Ok(Preset::Short),
            "long" => Ok(Preset::Long),
            _ => Err(Error::Config(format!("Unknown padding preset: {s}").into())),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Preset::Default => "default",
            Preset::Short => "short",
            Preset::Long => "long",
        };
        f.write_str(name)
    }
}
