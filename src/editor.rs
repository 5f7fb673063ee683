//! The editor surface.
//!
//! Buffer and window primitives belong to the host editor; this trait is the
//! seam the panel engine drives them through. A host binds it to its RPC
//! layer; tests bind it to a scripted mock.

/// Host-assigned buffer identifier.
pub type BufferId = u64;

/// Operations the panel engine needs from the host editor.
///
/// All methods are synchronous: buffer edits and prompts are host round-trips
/// that complete before the calling action resumes.
pub trait Editor {
    /// Create (or reclaim) a scratch buffer with the given name.
    fn create_buffer(&mut self, name: &str) -> BufferId;

    /// Replace lines `start..end` (0-based, exclusive) with `lines`. An `end`
    /// past the last line is clamped. Replacing with an empty slice deletes
    /// the range.
    fn set_lines(&mut self, bufnr: BufferId, start: usize, end: usize, lines: &[String]);

    /// Number of lines currently in the buffer.
    fn line_count(&self, bufnr: BufferId) -> usize;

    /// Full buffer content, one string per line.
    fn get_lines(&self, bufnr: BufferId) -> Vec<String>;

    /// Ask the user for one line of input. `None` means the prompt was
    /// cancelled.
    fn prompt(&mut self, message: &str) -> Option<String>;

    /// Present a selection menu; returns the chosen index, or `None` when
    /// dismissed.
    fn select(&mut self, title: &str, items: &[String]) -> Option<usize>;

    /// Show a one-line informational message.
    fn show_message(&mut self, text: &str);

    /// Show a one-line error message.
    fn show_error(&mut self, text: &str);

    /// Open a URL in the user's browser.
    fn open_url(&mut self, url: &str);
}
