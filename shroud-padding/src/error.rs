use std::{borrow::Cow, sync::Arc};

use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum Error {
    #[error("Invalid range: min ({min}) is greater than max ({max})")]
    InvalidRange { min: usize, max: usize },

    #[error("Entropy source failure: {0}")]
    EntropyFailure(#[from] Arc<rand::Error>),

    #[error("Random pool capacity must be between 1 and {max}, got {0}", max = crate::MAX_POOL_CAPACITY)]
    InvalidCapacity(usize),

    #[error("Invalid padding charset: {0}")]
    InvalidCharset(Cow<'static, str>),

    #[error("Invalid padding header name: {0}")]
    InvalidHeaderName(Cow<'static, str>),

    #[error("Padding bytes are not a valid header value")]
    InvalidHeaderValue,

    #[error("Configuration error: {0}")]
    Config(Cow<'static, str>),
}

impl From<rand::Error> for Error {
    fn from(err: rand::Error) -> Self {
        Error::EntropyFailure(Arc::new(err))
    }
}
