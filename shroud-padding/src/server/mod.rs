mod buffered;
mod writer;

pub use buffered::*;
pub use writer::*;

use crate::{LengthSampler, OsSampler, PaddingInjector};

/// Inbound side of the padding layer: decorates each response writer.
#[derive(Debug, Clone)]
pub struct PaddingMiddleware<S = OsSampler> {
    injector: PaddingInjector<S>,
}

impl<S: LengthSampler> PaddingMiddleware<S> {
    pub fn new(injector: PaddingInjector<S>) -> Self {
        Self { injector }
    }

    pub fn injector(&self) -> &PaddingInjector<S> {
        &self.injector
    }

    pub fn wrap<W: ResponseWriter>(&self, writer: W) -> PaddingResponseWriter<W, S> {
        PaddingResponseWriter::new(writer, self.injector.clone())
    }

    /// Runs `handler` against the decorated writer and hands back the original one.
    pub fn handle<W, F>(&self, writer: W, handler: F) -> W
    where
        W: ResponseWriter,
        F: FnOnce(&PaddingResponseWriter<W, S>),
    {
        let writer = self.wrap(writer);
        handler(&writer);
        writer.into_inner()
    }
}
