use crate::robot::leg::{Leg, LEG_COUNT};

// SERVO CALIBRATION
// 50 Hz hobby servos; the pulse window maps 0..=180 degrees onto the
// 0.5 ms..2.6 ms span the dog's horns were trimmed for.
pub const SERVO_FREQUENCY_HZ: u32 = 50;
pub const SERVO_MIN_PULSE_US: u32 = 500;
pub const SERVO_MAX_PULSE_US: u32 = 2600;

/// Per-degree interpolation delay for postures, in milliseconds.
pub const DEFAULT_STEP_DELAY_MS: u64 = 10;
/// Stretch-class fidgets run at twice the posture rate.
pub const FAST_STEP_DELAY_MS: u64 = 5;
/// Dwell after each single-leg write inside a looping gait.
pub const GAIT_STEP_MS: u64 = 40;

/// A four-leg angle tuple in (FL, FR, BL, BR) order.
pub type Pose = [u8; LEG_COUNT];

// NAMED POSTURES
pub const STAND_POSE: Pose = [90, 103, 87, 90];
pub const SIT_POSE: Pose = [90, 100, 25, 25];
pub const SLEEP_POSE: Pose = [180, 180, 0, 0];
/// Assumed power-up attitude: just inside the sleep posture.
pub const BOOT_POSE: Pose = [175, 175, 5, 5];

// FIDGET WAYPOINTS
pub const STRETCH_FOLD_POSE: Pose = [10, 10, 45, 45];
pub const STRETCH_REACH_POSE: Pose = [135, 135, 170, 170];
pub const STRETCH2_SPLAY_POSE: Pose = [0, 0, 180, 180];
/// Braced on three legs, back-left free to scratch.
pub const SCRATCH_BRACE_POSE: Pose = [90, 180, 0, 0];
/// Seated back, front-left free to wave.
pub const WAVE_BRACE_POSE: Pose = [90, 90, 50, 0];

// LEG SWEEPS (single-leg oscillations)
pub const SWEEP_STEP: u8 = 4;
pub const SCRATCH_SWEEP_TOP: u8 = 44;
pub const SCRATCH_RAISE_MS: u64 = 15;
pub const SCRATCH_LOWER_MS: u64 = 25;
pub const SCRATCH_REPEATS: usize = 5;
pub const WAVE_SWEEP_TOP: u8 = 64;
pub const WAVE_SWEEP_MS: u64 = 25;
pub const WAVE_REPEATS: usize = 5;

// IDLE SCHEDULER
/// Inactivity draws land in [60, 180] seconds.
pub const IDLE_WAIT_MIN_SECS: u32 = 60;
pub const IDLE_WAIT_SPAN_SECS: u32 = 121;

/// Eight phases of the forward trot, written leg by leg.
pub const WALK_FORWARD_CYCLE: [Pose; 8] = [
    [90, 45, 45, 90],
    [135, 45, 45, 135],
    [135, 90, 90, 135],
    [90, 90, 90, 90],
    [45, 90, 90, 45],
    [45, 135, 135, 45],
    [90, 135, 135, 90],
    [90, 90, 90, 90],
];

/// The forward cycle played backwards.
pub const WALK_BACK_CYCLE: [Pose; 8] = [
    [90, 90, 90, 90],
    [90, 135, 135, 90],
    [45, 135, 135, 45],
    [45, 90, 90, 45],
    [90, 90, 90, 90],
    [135, 90, 90, 135],
    [135, 45, 45, 135],
    [90, 45, 45, 90],
];

/// Sixteen single-leg steps, four phases of four writes.
pub const TURN_LEFT_CYCLE: [(Leg, u8); 16] = [
    (Leg::FrontRight, 90),
    (Leg::BackRight, 90),
    (Leg::FrontLeft, 90),
    (Leg::BackLeft, 90),
    (Leg::FrontRight, 90),
    (Leg::BackRight, 50),
    (Leg::FrontLeft, 130),
    (Leg::BackLeft, 90),
    (Leg::FrontRight, 130),
    (Leg::BackRight, 50),
    (Leg::FrontLeft, 130),
    (Leg::BackLeft, 50),
    (Leg::FrontRight, 130),
    (Leg::BackRight, 90),
    (Leg::FrontLeft, 90),
    (Leg::BackLeft, 50),
];

pub const TURN_RIGHT_CYCLE: [(Leg, u8); 16] = [
    (Leg::FrontRight, 130),
    (Leg::BackRight, 90),
    (Leg::FrontLeft, 90),
    (Leg::BackLeft, 50),
    (Leg::FrontRight, 130),
    (Leg::BackRight, 50),
    (Leg::FrontLeft, 130),
    (Leg::BackLeft, 50),
    (Leg::FrontRight, 90),
    (Leg::BackRight, 50),
    (Leg::FrontLeft, 130),
    (Leg::BackLeft, 90),
    (Leg::FrontRight, 90),
    (Leg::BackRight, 90),
    (Leg::FrontLeft, 90),
    (Leg::BackLeft, 90),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_pose_in_range(pose: Pose) {
        for angle in pose {
            assert!(angle <= 180, "angle {} out of servo range", angle);
        }
    }

    #[test]
    fn all_tabled_angles_are_within_servo_range() {
        for pose in [
            STAND_POSE,
            SIT_POSE,
            SLEEP_POSE,
            BOOT_POSE,
            STRETCH_FOLD_POSE,
            STRETCH_REACH_POSE,
            STRETCH2_SPLAY_POSE,
            SCRATCH_BRACE_POSE,
            WAVE_BRACE_POSE,
        ] {
            assert_pose_in_range(pose);
        }
        for pose in WALK_FORWARD_CYCLE {
            assert_pose_in_range(pose);
        }
        for (_, angle) in TURN_LEFT_CYCLE.iter().chain(TURN_RIGHT_CYCLE.iter()) {
            assert!(*angle <= 180);
        }
    }

    #[test]
    fn walk_back_is_walk_forward_reversed() {
        let mut reversed = WALK_FORWARD_CYCLE;
        reversed.reverse();
        assert_eq!(reversed, WALK_BACK_CYCLE);
    }

    #[test]
    fn walk_cycles_chain_without_a_jump() {
        // forward ends neutral, backward ends where forward begins
        assert_eq!(WALK_FORWARD_CYCLE[7], [90, 90, 90, 90]);
        assert_eq!(WALK_BACK_CYCLE[0], [90, 90, 90, 90]);
        assert_eq!(WALK_BACK_CYCLE[7], WALK_FORWARD_CYCLE[0]);
    }

    #[test]
    fn turn_right_is_turn_left_phase_reversed() {
        for phase in 0..4 {
            let left = &TURN_LEFT_CYCLE[phase * 4..phase * 4 + 4];
            let right = &TURN_RIGHT_CYCLE[(3 - phase) * 4..(3 - phase) * 4 + 4];
            assert_eq!(left, right);
        }
    }

    #[test]
    fn sweeps_stay_clear_of_the_brace_poses() {
        // the free leg oscillates below its neighbours' braced angles
        assert!(SCRATCH_SWEEP_TOP < 90);
        assert!(WAVE_SWEEP_TOP < 90);
        assert_eq!(SCRATCH_SWEEP_TOP % SWEEP_STEP, 0);
        assert_eq!(WAVE_SWEEP_TOP % SWEEP_STEP, 0);
    }
}
