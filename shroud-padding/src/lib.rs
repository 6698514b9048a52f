//! Randomized-length padding headers for HTTP requests and responses.
//!
//! A [`RandomPool`] is filled once at startup; each message then gets a slice
//! of it, of a length drawn uniformly from a [`PaddingProfile`], as the value
//! of one extra header. [`client::PaddingTransport`] pads outbound requests and
//! [`server::PaddingResponseWriter`] pads responses exactly once, before the
//! first body byte.

pub mod client;
mod config;
mod error;
mod injector;
mod options;
mod padding;
mod pool;
mod sampler;
pub mod server;

pub use config::*;
pub use error::Error;
pub use injector::*;
pub use options::*;
pub use padding::*;
pub use pool::*;
pub use sampler::*;
