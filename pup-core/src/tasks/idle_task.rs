//! Background inactivity scheduler.
//!
//! Samples the device state once per second. While the device stays
//! idle a randomized countdown runs; when it expires the dog performs a
//! fidget, naps, and the countdown re-arms with a fresh draw. Any
//! non-idle observation discards the countdown outright.
use embassy_time::Timer;
use log::{debug, info};

use crate::motion::sync::{FIDGET_COMPLETED, MOTION_COMMANDS};
use crate::robot::commands::{Fidget, MotionCommand};
use crate::robot::config::{IDLE_WAIT_MIN_SECS, IDLE_WAIT_SPAN_SECS};
use crate::robot::hooks::{DeviceState, DisplayHooks, Entropy, StatusSource};
use crate::tasks::motion_task::motion_active;

/// One armed countdown: how long to keep still, and what to do after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleTimer {
    pub remaining_seconds: u32,
    pub chosen_fidget: Fidget,
}

/// Outcome of one 1 Hz observation.
#[derive(Debug, PartialEq, Eq)]
pub enum Tick {
    Counting,
    /// The device left idle; remaining time is discarded, not paused.
    Abandoned,
    Expired,
}

impl IdleTimer {
    pub fn draw(rng: &mut impl Entropy) -> Self {
        let remaining_seconds = IDLE_WAIT_MIN_SECS + rng.next_u32() % IDLE_WAIT_SPAN_SECS;
        let chosen_fidget = match rng.next_u32() % 3 {
            0 => Fidget::Stretch,
            1 => Fidget::Stretch2,
            _ => Fidget::Scratch,
        };
        Self {
            remaining_seconds,
            chosen_fidget,
        }
    }

    /// Advances the countdown by one observed second.
    pub fn tick(&mut self, state: DeviceState) -> Tick {
        if state != DeviceState::Idle {
            self.remaining_seconds = 0;
            return Tick::Abandoned;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            Tick::Expired
        } else {
            Tick::Counting
        }
    }
}

/// Perpetual 1 Hz scheduler. Boundary handles are injected once; the
/// entropy source in particular is seeded by the board and drawn from
/// repeatedly.
pub async fn idle_task<S, D, E>(status: S, display: D, mut rng: E) -> !
where
    S: StatusSource,
    D: DisplayHooks,
    E: Entropy,
{
    loop {
        if status.device_state() == DeviceState::Idle {
            let mut timer = IdleTimer::draw(&mut rng);
            debug!(
                "[IDLE_TASK] armed: {}s until {:?}",
                timer.remaining_seconds, timer.chosen_fidget
            );
            loop {
                Timer::after_secs(1).await;
                match timer.tick(status.device_state()) {
                    Tick::Counting => {}
                    Tick::Abandoned => {
                        debug!("[IDLE_TASK] device busy, countdown discarded");
                        break;
                    }
                    Tick::Expired => {
                        // skip if a dispatched action holds the legs;
                        // the outer loop re-arms with a fresh draw
                        if !motion_active() {
                            run_fidget(&display, timer.chosen_fidget).await;
                        }
                        break;
                    }
                }
            }
        }
        Timer::after_secs(1).await;
    }
}

async fn run_fidget(display: &impl DisplayHooks, fidget: Fidget) {
    if MOTION_COMMANDS
        .try_send(MotionCommand::Fidget(fidget))
        .is_err()
    {
        return;
    }
    info!("[IDLE_TASK] fidgeting: {:?}", fidget);
    display.notify_motion_start();
    FIDGET_COMPLETED.wait().await;
    display.notify_motion_idle();
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SeqEntropy {
        values: Vec<u32>,
        next: usize,
    }

    impl SeqEntropy {
        fn new(values: &[u32]) -> Self {
            Self {
                values: values.to_vec(),
                next: 0,
            }
        }
    }

    impl Entropy for SeqEntropy {
        fn next_u32(&mut self) -> u32 {
            let value = self.values[self.next % self.values.len()];
            self.next += 1;
            value
        }
    }

    #[test]
    fn draw_spans_sixty_to_one_eighty_seconds() {
        // draws are (seconds, fidget) pairs
        let mut rng = SeqEntropy::new(&[0, 0, 120, 0, 121, 0, 242, 0]);
        assert_eq!(IdleTimer::draw(&mut rng).remaining_seconds, 60);
        assert_eq!(IdleTimer::draw(&mut rng).remaining_seconds, 180);
        assert_eq!(IdleTimer::draw(&mut rng).remaining_seconds, 60);
        assert_eq!(IdleTimer::draw(&mut rng).remaining_seconds, 60);
    }

    #[test]
    fn every_fidget_is_reachable() {
        let mut rng = SeqEntropy::new(&[0, 0, 0, 1, 0, 2]);
        assert_eq!(IdleTimer::draw(&mut rng).chosen_fidget, Fidget::Stretch);
        assert_eq!(IdleTimer::draw(&mut rng).chosen_fidget, Fidget::Stretch2);
        assert_eq!(IdleTimer::draw(&mut rng).chosen_fidget, Fidget::Scratch);
    }

    #[test]
    fn countdown_expires_after_the_drawn_seconds() {
        let mut rng = SeqEntropy::new(&[0, 2]);
        let mut timer = IdleTimer::draw(&mut rng);
        for _ in 0..59 {
            assert_eq!(timer.tick(DeviceState::Idle), Tick::Counting);
        }
        assert_eq!(timer.tick(DeviceState::Idle), Tick::Expired);
    }

    #[test]
    fn leaving_idle_discards_the_countdown() {
        // the concrete scenario: 60 s armed, Listening at second 30
        let mut rng = SeqEntropy::new(&[0, 0]);
        let mut timer = IdleTimer::draw(&mut rng);
        for _ in 0..30 {
            assert_eq!(timer.tick(DeviceState::Idle), Tick::Counting);
        }
        assert_eq!(timer.tick(DeviceState::Listening), Tick::Abandoned);
        assert_eq!(timer.remaining_seconds, 0);

        // back to idle means a fresh draw, never a resume
        let mut rng = SeqEntropy::new(&[100, 1]);
        let rearmed = IdleTimer::draw(&mut rng);
        assert_eq!(rearmed.remaining_seconds, 160);
    }

    #[test]
    fn non_idle_states_all_abandon() {
        for state in [
            DeviceState::Starting,
            DeviceState::Connecting,
            DeviceState::Listening,
            DeviceState::Speaking,
            DeviceState::Upgrading,
            DeviceState::FatalError,
        ] {
            let mut timer = IdleTimer {
                remaining_seconds: 42,
                chosen_fidget: Fidget::Scratch,
            };
            assert_eq!(timer.tick(state), Tick::Abandoned);
        }
    }
}
