// src/progress.rs
/// Lightweight progress reporting for the firm fan-out.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the number of firms queued.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One firm's detail page was fetched and parsed.
    fn item_done(&mut self, _firm: &str) {}

    /// One firm's detail page could not be fetched.
    fn item_failed(&mut self, _firm: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
