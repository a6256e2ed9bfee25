//! Progress reporting for dataset loading.
//!
//! Loading reports bytes read through [`ProgressCallback`] so that callers
//! decide how (or whether) to render it. The CLI plugs in `indicatif` bars;
//! the server and tests use [`NullProgress`].

/// Receives progress updates from a long-running load.
///
/// Implementations must be `Send + Sync` so one reporter can be shared
/// across threads behind an `Arc`.
pub trait ProgressCallback: Send + Sync {
    /// Sets the expected total in bytes. May be called late, or never when
    /// the size is unknown.
    fn set_total(&self, total: u64);

    /// Advances by `delta` bytes.
    fn inc(&self, delta: u64);

    fn set_message(&self, msg: String);

    /// Marks the load complete with a final message.
    fn finish(&self, msg: String);
}

/// Discards every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}
