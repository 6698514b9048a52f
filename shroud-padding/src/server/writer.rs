use std::{
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use http::{HeaderMap, StatusCode};
use parking_lot::Mutex;

use crate::{LengthSampler, OsSampler, PaddingInjector};

/// The part of an inbound response pipeline the padding layer needs.
///
/// Methods take `&self` because a single response may be written from more
/// than one code path at once.
pub trait ResponseWriter: Send + Sync {
    /// Runs `f` against the headers that will be sent with the status line.
    fn with_headers(&self, f: &mut dyn FnMut(&mut HeaderMap));

    /// Commits the status and headers.
    fn write_header(&self, status: StatusCode);

    /// Writes body bytes, committing `200 OK` first if nothing was committed yet.
    fn write(&self, data: &[u8]) -> io::Result<usize>;

    /// The committed status, if any.
    fn status(&self) -> Option<StatusCode>;

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

impl<W: ResponseWriter + ?Sized> ResponseWriter for Arc<W> {
    fn with_headers(&self, f: &mut dyn FnMut(&mut HeaderMap)) {
        (**self).with_headers(f)
    }

    fn write_header(&self, status: StatusCode) {
        (**self).write_header(status)
    }

    fn write(&self, data: &[u8]) -> io::Result<usize> {
        (**self).write(data)
    }

    fn status(&self) -> Option<StatusCode> {
        (**self).status()
    }

    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Wraps a [`ResponseWriter`] and attaches the padding header exactly once,
/// before the first body byte reaches the inner writer.
///
/// `Unwritten -> HeaderWritten` is the only transition. Either entry point can
/// trigger it; every later header write is a silent no-op.
#[derive(Debug)]
pub struct PaddingResponseWriter<W, S = OsSampler> {
    inner: W,
    injector: PaddingInjector<S>,
    wrote_header: AtomicBool,
    lock: Mutex<()>,
}

impl<W, S> PaddingResponseWriter<W, S> {
    pub fn new(inner: W, injector: PaddingInjector<S>) -> Self {
        Self {
            inner,
            injector,
            wrote_header: AtomicBool::new(false),
            lock: Mutex::new(()),
        }
    }

    pub fn header_written(&self) -> bool {
        self.wrote_header.load(Ordering::Acquire)
    }

    pub fn inner(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: ResponseWriter, S: LengthSampler> ResponseWriter for PaddingResponseWriter<W, S> {
    fn with_headers(&self, f: &mut dyn FnMut(&mut HeaderMap)) {
        self.inner.with_headers(f)
    }

    fn write_header(&self, status: StatusCode) {
        if self.header_written() {
            return;
        }
        // Drawn before locking. A caller that loses the race drops its value.
        let mut padding = self.injector.draw();
        if self.header_written() {
            return;
        }

        let _guard = self.lock.lock();
        if self.wrote_header.load(Ordering::Relaxed) {
            return;
        }
        if padding.is_some() {
            let header_name = self.injector.options().header_name();
            self.inner.with_headers(&mut |headers: &mut HeaderMap| {
                if let Some(value) = padding.take() {
                    headers.insert(header_name.clone(), value);
                }
            });
        }
        self.inner.write_header(status);
        // published only after the commit, so a fast-path reader never sees
        // the flag ahead of the headers
        self.wrote_header.store(true, Ordering::Release);
    }

    fn write(&self, data: &[u8]) -> io::Result<usize> {
        if !self.header_written() {
            let pending = {
                let _guard = self.lock.lock();
                !self.wrote_header.load(Ordering::Relaxed)
            };
            if pending {
                self.write_header(StatusCode::OK);
            }
        }
        self.inner.write(data)
    }

    fn status(&self) -> Option<StatusCode> {
        self.inner.status()
    }

    fn flush(&self) -> io::Result<()> {
        self.inner.flush()
    }
}
