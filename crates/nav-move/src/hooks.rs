//! Host side effects requested by the dispatcher.

use nav_core::ClientId;

/// Callbacks into the game host.
///
/// All methods have no-op defaults, so `impl MoveHooks for MyHost {}` is
/// valid.  Hook on/off and attack are not routed here; they travel on the
/// command's [`ActionFlags`][crate::ActionFlags].
pub trait MoveHooks: Send + Sync {
    /// Load `path` on the host before its first use by `client`.
    fn precache_model(&self, _client: ClientId, _path: &str) {}
}

/// A [`MoveHooks`] that does nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopHooks;

impl MoveHooks for NoopHooks {}
