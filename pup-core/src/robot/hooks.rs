//! Boundary seams toward the rest of the device.
//!
//! The application's state machine, the screen and the hardware RNG are
//! external collaborators; the idle scheduler receives implementations
//! of these traits at construction time.

/// Application device states, as observed by the idle scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Starting,
    Idle,
    Connecting,
    Listening,
    Speaking,
    Upgrading,
    FatalError,
}

/// Read-only view of the application state. Polled, never pushed.
pub trait StatusSource {
    fn device_state(&self) -> DeviceState;
}

/// Screen-side hooks around autonomous motion.
pub trait DisplayHooks {
    /// Switch to the animated presentation while the dog moves on its own.
    fn notify_motion_start(&self);
    /// Restore the default idle presentation.
    fn notify_motion_idle(&self);
}

/// Entropy seam for the idle scheduler's draws. Seeded hardware RNG on
/// the board, deterministic sequences in tests.
pub trait Entropy {
    fn next_u32(&mut self) -> u32;
}
