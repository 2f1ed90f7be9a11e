//! Shared server state.
//!
//! Configuration is fixed after startup. The only moving part is the
//! conversion semaphore, which bounds how many conversions occupy blocking
//! workers at once. Requests carry all of their own key material.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::dispatch::CodecSettings;

/// State handed to every axum handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Codec parameters (Argon2id cost for encryption).
    pub settings: CodecSettings,
    /// Upper bound on one conversion's wall-clock time, including the wait
    /// for a conversion slot.
    pub request_timeout: Duration,
    /// Largest accepted request body.
    pub max_body_bytes: usize,
    /// One permit per conversion allowed to run at once. A permit is held
    /// until its worker finishes, even if the request already timed out.
    pub conversion_slots: Arc<Semaphore>,
}

impl AppState {
    #[must_use]
    pub fn new(
        settings: CodecSettings,
        request_timeout: Duration,
        max_body_bytes: usize,
        max_concurrent_conversions: usize,
    ) -> Self {
        Self {
            settings,
            request_timeout,
            max_body_bytes,
            conversion_slots: Arc::new(Semaphore::new(max_concurrent_conversions)),
        }
    }
}
