use embassy_time::Timer;
use embedded_hal::pwm::SetDutyCycle;
use log::debug;

use crate::motion::sync::LegChannel;
use crate::robot::commands::LegCommand;
use crate::robot::leg::Leg;
use crate::robot::servo::Servo;
use crate::robot::state;

/// One interpolation step: a single degree toward the target.
pub fn step_toward(current: u8, target: u8) -> u8 {
    match current.cmp(&target) {
        core::cmp::Ordering::Less => current + 1,
        core::cmp::Ordering::Greater => current - 1,
        core::cmp::Ordering::Equal => current,
    }
}

/// Drives one leg. The runner owns the leg's servo for the lifetime of
/// the robot, so no other task ever writes that channel. Every step
/// updates the shared slot and the hardware together.
pub async fn leg_task<PWM: SetDutyCycle>(
    leg: Leg,
    mut servo: Servo<PWM>,
    channel: &'static LegChannel,
) -> ! {
    loop {
        match channel.next().await {
            LegCommand::Seek {
                target,
                step_delay_ms,
            } => {
                state::begin_segment(leg, target, step_delay_ms);
                channel.wait_start().await;
                let mut current = state::current_angle(leg);
                while current != target {
                    current = step_toward(current, target);
                    servo.set_angle(current);
                    state::record_step(leg, current);
                    Timer::after_millis(step_delay_ms).await;
                }
                debug!("{} settled at {}", leg, current);
                channel.complete();
            }
            LegCommand::Jump { target } => {
                servo.set_angle(target);
                state::record_jump(leg, target);
                channel.complete();
            }
            LegCommand::Release => {
                servo.release();
                channel.complete();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Runs the step function to convergence, returning the trace.
    fn interpolate(mut current: u8, target: u8) -> Vec<u8> {
        let mut trace = vec![current];
        while current != target {
            current = step_toward(current, target);
            trace.push(current);
        }
        trace
    }

    #[test]
    fn steps_are_single_degrees() {
        let trace = interpolate(180, 90);
        assert!(trace
            .windows(2)
            .all(|w| w[0].abs_diff(w[1]) == 1));
    }

    #[test]
    fn interpolation_is_monotonic_and_converges() {
        // stand-up from the sleep posture
        for (from, to) in [(180u8, 90u8), (180, 103), (0, 87), (0, 90)] {
            let trace = interpolate(from, to);
            assert_eq!(*trace.last().unwrap(), to);
            assert_eq!(trace.len(), from.abs_diff(to) as usize + 1);
            if from > to {
                assert!(trace.windows(2).all(|w| w[0] > w[1]));
            } else {
                assert!(trace.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn settled_leg_does_not_move() {
        assert_eq!(step_toward(90, 90), 90);
        assert_eq!(interpolate(45, 45), vec![45]);
    }
}
