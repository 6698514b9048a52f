use std::future::Future;

use async_trait::async_trait;
use http::{Request, Response};

use crate::{LengthSampler, OsSampler, PaddingInjector};

/// Outbound request pipeline stage: sends a request and yields its response.
#[async_trait]
pub trait Transport<B: Send + 'static>: Send + Sync {
    type ResponseBody;
    type Error;

    async fn send(&self, request: Request<B>) -> Result<Response<Self::ResponseBody>, Self::Error>;
}

#[derive(Debug, Clone)]
pub struct TransportFn<F>(F);

pub fn transport_fn<F>(f: F) -> TransportFn<F> {
    TransportFn(f)
}

#[async_trait]
impl<B, F, Fut, ResBody, E> Transport<B> for TransportFn<F>
where
    B: Send + 'static,
    F: Fn(Request<B>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response<ResBody>, E>> + Send + 'static,
    ResBody: 'static,
    E: 'static,
{
    type ResponseBody = ResBody;
    type Error = E;

    async fn send(&self, request: Request<B>) -> Result<Response<ResBody>, E> {
        (self.0)(request).await
    }
}

/// Pads every request before handing it to the inner transport. A failed
/// draw sends the request unpadded.
#[derive(Debug, Clone)]
pub struct PaddingTransport<T, S = OsSampler> {
    inner: T,
    injector: PaddingInjector<S>,
}

impl<T, S> PaddingTransport<T, S> {
    pub fn new(inner: T, injector: PaddingInjector<S>) -> Self {
        Self { inner, injector }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[async_trait]
impl<B, T, S> Transport<B> for PaddingTransport<T, S>
where
    B: Send + 'static,
    T: Transport<B>,
    S: LengthSampler + 'static,
{
    type ResponseBody = T::ResponseBody;
    type Error = T::Error;

    #[tracing::instrument(level = "debug", skip_all, fields(method = %request.method(), uri = %request.uri()))]
    async fn send(
        &self,
        mut request: Request<B>,
    ) -> Result<Response<Self::ResponseBody>, Self::Error> {
        self.injector.pad_request(&mut request);
        self.inner.send(request).await
    }
}
