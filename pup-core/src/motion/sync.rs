use core::sync::atomic::{AtomicBool, Ordering};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use crate::robot::commands::{LegCommand, MotionCommand};
use crate::robot::leg::LEG_COUNT;
use crate::{LEG_CHANNEL_SIZE, MOTION_CHANNEL_SIZE};

/// Cooperative stop flag. Set by `stop()`, polled by looping gaits at
/// cycle boundaries, cleared at the start of every posture and gait.
pub struct CancelToken(AtomicBool);

impl CancelToken {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Observes and clears the flag in one step, so a single stop request
    /// is honored exactly once.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::Relaxed)
    }
}

/// Process-wide stop signal for the lifetime of the robot.
pub static CANCEL: CancelToken = CancelToken::new();

/// Rails between the gait engine and one leg runner.
///
/// The start latch makes multi-leg postures begin in lock-step: the
/// engine places all four commands first, then opens every latch. The
/// latch is a latched signal, so a release that lands before the runner
/// waits is never lost.
pub struct LegChannel {
    commands: Channel<CriticalSectionRawMutex, LegCommand, LEG_CHANNEL_SIZE>,
    start: Signal<CriticalSectionRawMutex, ()>,
    done: Signal<CriticalSectionRawMutex, ()>,
}

impl LegChannel {
    pub const fn new() -> Self {
        Self {
            commands: Channel::new(),
            start: Signal::new(),
            done: Signal::new(),
        }
    }

    // engine side

    pub async fn issue(&self, cmd: LegCommand) {
        self.commands.send(cmd).await;
    }

    /// Opens the start latch for one queued `Seek`.
    pub fn release(&self) {
        self.start.signal(());
    }

    pub async fn join(&self) {
        self.done.wait().await;
    }

    // runner side

    pub async fn next(&self) -> LegCommand {
        self.commands.receive().await
    }

    pub async fn wait_start(&self) {
        self.start.wait().await;
    }

    pub fn complete(&self) {
        self.done.signal(());
    }
}

/// One fixed rail per leg slot, indexed by `Leg`.
pub static LEG_CHANNELS: [LegChannel; LEG_COUNT] = [
    LegChannel::new(),
    LegChannel::new(),
    LegChannel::new(),
    LegChannel::new(),
];

/// Intake of the motion task; `dispatch` and the idle scheduler feed it.
pub static MOTION_COMMANDS: Channel<CriticalSectionRawMutex, MotionCommand, MOTION_CHANNEL_SIZE> =
    Channel::new();

/// Raised by the motion task when an idle fidget and its follow-up sleep
/// have finished; the idle scheduler waits on it.
pub static FIDGET_COMPLETED: Signal<CriticalSectionRawMutex, ()> = Signal::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_consumes_a_single_stop_request() {
        let token = CancelToken::new();
        assert!(!token.take());
        token.set();
        assert!(token.is_set());
        assert!(token.take());
        assert!(!token.is_set());
        assert!(!token.take());
    }

    #[test]
    fn clear_discards_a_pending_stop() {
        let token = CancelToken::new();
        token.set();
        token.clear();
        assert!(!token.take());
    }
}
