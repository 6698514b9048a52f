use std::borrow::Cow;

use http::HeaderName;

use crate::{Error, PaddingProfile, ProfileSource};

pub const DEFAULT_HEADER_NAME: &str = "T-Padding";

/// Settings for one padding installation; the profile is normalized at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddingOptions {
    pub(crate) header_name: HeaderName,
    pub(crate) profile: PaddingProfile,
}

impl PaddingOptions {
    pub fn builder() -> PaddingOptionsBuilder {
        PaddingOptionsBuilder {
            header_name: Cow::Borrowed(""),
            profile: None,
        }
    }

    pub fn header_name(&self) -> &HeaderName {
        &self.header_name
    }

    pub fn profile(&self) -> PaddingProfile {
        self.profile
    }
}

#[derive(Debug, Clone)]
pub struct PaddingOptionsBuilder {
    header_name: Cow<'static, str>,
    profile: Option<ProfileSource>,
}

impl PaddingOptionsBuilder {
    /// An empty name selects [`DEFAULT_HEADER_NAME`].
    pub fn header_name(mut self, header_name: impl Into<Cow<'static, str>>) -> Self {
        self.header_name = header_name.into();
        self
    }

    /// Presets are resolved against the capacity passed to [`build`](Self::build).
    pub fn profile(mut self, profile: impl Into<ProfileSource>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn build(self, capacity: usize) -> Result<PaddingOptions, Error> {
        let header_name = if self.header_name.is_empty() {
            DEFAULT_HEADER_NAME
        } else {
            self.header_name.as_ref()
        };
        let header_name = HeaderName::try_from(header_name)
            .map_err(|_| Error::InvalidHeaderName(header_name.to_string().into()))?;
        let profile = self
            .profile
            .map_or(PaddingProfile::default(), |profile| profile.resolve(capacity))
            .normalize(capacity);
        Ok(PaddingOptions {
            header_name,
            profile,
        })
    }
}
