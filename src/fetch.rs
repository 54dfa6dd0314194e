//! The fetch collaborator used by pagination stitching.
//!
//! The crate does no networking itself. Hosts implement [`PageFetcher`] over
//! whatever HTTP stack they use; timeouts and retries are theirs to handle.

use crate::error::Result;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// Whether the response status counts as success (2xx or 304).
    pub ok: bool,
    pub body: String,
    /// Cache validator of the response, if the server sent one.
    pub etag: Option<String>,
}

impl FetchResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            ok: true,
            body: body.into(),
            etag: None,
        }
    }

    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }

    /// Identity of the page content: the ETag, or a hash of the body when the
    /// server sent none.
    pub fn fingerprint(&self) -> String {
        match &self.etag {
            Some(etag) => format!("etag:{}", etag),
            None => {
                let mut hasher = DefaultHasher::new();
                self.body.hash(&mut hasher);
                format!("body:{:016x}", hasher.finish())
            }
        }
    }
}

/// Asynchronous page source. Only one fetch is ever in flight per session.
///
/// Returning [`ReaderError::Cancelled`](crate::ReaderError::Cancelled) ends the
/// session as cancelled; any other error ends it as a failed fetch.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse>;
}

/// Cancellation signal shared between a host and a running session.
///
/// Checked before every fetch; a fetch already in flight is not interrupted.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
