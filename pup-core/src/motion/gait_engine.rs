use embassy_time::Timer;
use log::info;

use crate::motion::sync::{LegChannel, CANCEL, MOTION_COMMANDS};
use crate::robot::commands::LegCommand;
use crate::robot::config::*;
use crate::robot::leg::Leg;

/// Sequences named postures and gaits over the four leg runners.
///
/// Owns no leg state itself; every hardware write goes through the rails,
/// so each leg's channel keeps a single owner.
pub struct GaitEngine {
    legs: &'static [LegChannel; 4],
    step_delay_ms: u64,
}

impl GaitEngine {
    pub fn new(legs: &'static [LegChannel; 4]) -> Self {
        Self {
            legs,
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
        }
    }

    /// Interpolated move of all four legs, started in lock-step and
    /// joined before returning.
    async fn posture(&self, pose: Pose) {
        for (slot, target) in self.legs.iter().zip(pose) {
            slot.issue(LegCommand::Seek {
                target,
                step_delay_ms: self.step_delay_ms,
            })
            .await;
        }
        // every runner holds at its latch until all four commands are placed
        for slot in self.legs {
            slot.release();
        }
        for slot in self.legs {
            slot.join().await;
        }
    }

    /// Immediate single-leg write, paced by the gait step delay.
    async fn place(&self, leg: Leg, angle: u8) {
        let slot = &self.legs[leg as usize];
        slot.issue(LegCommand::Jump { target: angle }).await;
        slot.join().await;
        Timer::after_millis(GAIT_STEP_MS).await;
    }

    /// One gait phase, written leg by leg.
    async fn phase(&self, pose: Pose) {
        for leg in Leg::ALL {
            self.place(leg, pose[leg as usize]).await;
        }
    }

    async fn sweep_up(&self, leg: Leg, top: u8, dwell_ms: u64) {
        let slot = &self.legs[leg as usize];
        let mut angle = 0;
        while angle <= top {
            slot.issue(LegCommand::Jump { target: angle }).await;
            slot.join().await;
            Timer::after_millis(dwell_ms).await;
            angle += SWEEP_STEP;
        }
    }

    async fn sweep_down(&self, leg: Leg, top: u8, dwell_ms: u64) {
        let slot = &self.legs[leg as usize];
        let mut angle = top;
        while angle > 0 {
            slot.issue(LegCommand::Jump { target: angle }).await;
            slot.join().await;
            Timer::after_millis(dwell_ms).await;
            angle -= SWEEP_STEP;
        }
    }

    /// A looping gait gives way when a stop was requested or a fresh
    /// command is waiting at the motion task.
    fn takeover_requested(&self) -> bool {
        CANCEL.take() || !MOTION_COMMANDS.is_empty()
    }

    pub async fn stand(&mut self) {
        CANCEL.clear();
        self.posture(STAND_POSE).await;
        CANCEL.clear();
    }

    pub async fn sit_down(&mut self) {
        CANCEL.clear();
        self.posture(SIT_POSE).await;
        CANCEL.clear();
    }

    /// Lies down, then after a hold releases all four servos so the dog
    /// can sleep without humming horns.
    pub async fn sleep(&mut self) {
        CANCEL.clear();
        self.posture(SLEEP_POSE).await;
        CANCEL.clear();
        Timer::after_secs(5).await;
        for slot in self.legs {
            slot.issue(LegCommand::Release).await;
            slot.join().await;
        }
    }

    pub async fn stretch(&mut self) {
        CANCEL.clear();
        self.step_delay_ms = FAST_STEP_DELAY_MS;
        self.posture(STAND_POSE).await;
        Timer::after_millis(2000).await;
        self.posture(STRETCH_FOLD_POSE).await;
        Timer::after_millis(3000).await;
        self.posture(STRETCH_REACH_POSE).await;
        Timer::after_millis(3000).await;
        self.posture(STAND_POSE).await;
        self.step_delay_ms = DEFAULT_STEP_DELAY_MS;
        CANCEL.clear();
    }

    pub async fn stretch2(&mut self) {
        CANCEL.clear();
        self.step_delay_ms = FAST_STEP_DELAY_MS;
        self.posture(STAND_POSE).await;
        Timer::after_millis(2000).await;
        self.posture(STRETCH2_SPLAY_POSE).await;
        Timer::after_millis(3000).await;
        self.posture(STAND_POSE).await;
        self.step_delay_ms = DEFAULT_STEP_DELAY_MS;
        CANCEL.clear();
    }

    /// Braces on three legs and rubs the back-left one. Cancellable
    /// between repetitions, never inside a sweep.
    pub async fn scratch(&mut self) {
        CANCEL.clear();
        self.step_delay_ms = FAST_STEP_DELAY_MS;
        self.posture(STAND_POSE).await;
        Timer::after_millis(2000).await;
        self.posture(SCRATCH_BRACE_POSE).await;
        Timer::after_millis(1200).await;
        for _ in 0..SCRATCH_REPEATS {
            if CANCEL.take() {
                break;
            }
            self.sweep_up(Leg::BackLeft, SCRATCH_SWEEP_TOP, SCRATCH_RAISE_MS)
                .await;
            self.sweep_down(Leg::BackLeft, SCRATCH_SWEEP_TOP, SCRATCH_LOWER_MS)
                .await;
        }
        Timer::after_millis(1000).await;
        self.stand().await;
        self.step_delay_ms = DEFAULT_STEP_DELAY_MS;
    }

    /// Sits back and waves the front-left leg five times. Runs to
    /// completion once started.
    pub async fn wave(&mut self) {
        CANCEL.clear();
        self.posture(WAVE_BRACE_POSE).await;
        Timer::after_millis(600).await;
        for _ in 0..WAVE_REPEATS {
            self.sweep_up(Leg::FrontLeft, WAVE_SWEEP_TOP, WAVE_SWEEP_MS).await;
            self.sweep_down(Leg::FrontLeft, WAVE_SWEEP_TOP, WAVE_SWEEP_MS).await;
        }
        Timer::after_millis(1000).await;
        self.stand().await;
    }

    pub async fn walk_forward(&mut self) {
        CANCEL.clear();
        loop {
            if self.takeover_requested() {
                break;
            }
            for pose in WALK_FORWARD_CYCLE {
                self.phase(pose).await;
            }
        }
        info!("[GAIT] walk forward ended, standing");
        self.stand().await;
    }

    pub async fn walk_back(&mut self) {
        CANCEL.clear();
        loop {
            if self.takeover_requested() {
                break;
            }
            for pose in WALK_BACK_CYCLE {
                self.phase(pose).await;
            }
        }
        info!("[GAIT] walk back ended, standing");
        self.stand().await;
    }

    pub async fn turn_left(&mut self) {
        CANCEL.clear();
        loop {
            if self.takeover_requested() {
                break;
            }
            for (leg, angle) in TURN_LEFT_CYCLE {
                self.place(leg, angle).await;
            }
        }
        info!("[GAIT] turn left ended, standing");
        self.stand().await;
    }

    pub async fn turn_right(&mut self) {
        CANCEL.clear();
        loop {
            if self.takeover_requested() {
                break;
            }
            for (leg, angle) in TURN_RIGHT_CYCLE {
                self.place(leg, angle).await;
            }
        }
        info!("[GAIT] turn right ended, standing");
        self.stand().await;
    }

    /// Requests a cooperative stop; the active gait exits at the top of
    /// its next cycle.
    pub fn stop(&self) {
        CANCEL.set();
    }
}
