pub mod fetch;
pub mod retry;

use crate::scene::SceneDescription;
use self::fetch::FetchError;

/// Progress/outcome notifications emitted during a scene fetch.
///
/// The fetcher holds no UI state; everything the surrounding application
/// wants to show (spinners, status lines, failure banners) flows through
/// this interface. All methods default to no-ops.
pub trait FetchEvents {
    /// Human-readable progress message ("Analyzing dream...", retry notices).
    fn on_status(&mut self, _message: &str) {}
    /// A validated scene description was obtained.
    fn on_complete(&mut self, _scene: &SceneDescription) {}
    /// The fetch failed terminally (retries exhausted).
    fn on_failure(&mut self, _error: &FetchError) {}
}

/// Event sink that discards everything.
pub struct NullEvents;

impl FetchEvents for NullEvents {}
