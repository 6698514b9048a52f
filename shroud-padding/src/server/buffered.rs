use std::io;

use bytes::{Bytes, BytesMut};
use http::{HeaderMap, Response, StatusCode};
use parking_lot::Mutex;

use super::ResponseWriter;

#[derive(Debug, Default)]
struct BufferedState {
    headers: HeaderMap,
    status: Option<StatusCode>,
    committed: Option<HeaderMap>,
    commits: usize,
    implicit_commit: bool,
    body: BytesMut,
}

/// A [`ResponseWriter`] that keeps the whole response in memory.
///
/// The header map is snapshotted when the status is committed, so later
/// header edits are not part of the response, as on a real connection.
#[derive(Debug, Default)]
pub struct BufferedResponse {
    state: Mutex<BufferedState>,
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times [`ResponseWriter::write_header`] reached this writer.
    pub fn commit_count(&self) -> usize {
        self.state.lock().commits
    }

    pub fn committed_headers(&self) -> Option<HeaderMap> {
        self.state.lock().committed.clone()
    }

    /// Whether body bytes arrived before any explicit header commit.
    pub fn wrote_body_before_commit(&self) -> bool {
        self.state.lock().implicit_commit
    }

    pub fn body(&self) -> Bytes {
        Bytes::copy_from_slice(&self.state.lock().body)
    }

    pub fn into_response(self) -> Response<Bytes> {
        let state = self.state.into_inner();
        let mut response = Response::new(state.body.freeze());
        *response.status_mut() = state.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = state.committed.unwrap_or(state.headers);
        response
    }
}

impl ResponseWriter for BufferedResponse {
    fn with_headers(&self, f: &mut dyn FnMut(&mut HeaderMap)) {
        f(&mut self.state.lock().headers)
    }

    fn write_header(&self, status: StatusCode) {
        let mut state = self.state.lock();
        state.commits += 1;
        if state.status.is_some() {
            tracing::warn!("Superfluous response header write with status {}", status);
            return;
        }
        let headers = state.headers.clone();
        state.status = Some(status);
        state.committed = Some(headers);
    }

    fn write(&self, data: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock();
        if state.status.is_none() {
            let headers = state.headers.clone();
            state.implicit_commit = true;
            state.status = Some(StatusCode::OK);
            state.committed = Some(headers);
        }
        state.body.extend_from_slice(data);
        Ok(data.len())
    }

    fn status(&self) -> Option<StatusCode> {
        self.state.lock().status
    }
}
