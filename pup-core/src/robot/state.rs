use core::cell::RefCell;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::robot::config::{BOOT_POSE, DEFAULT_STEP_DELAY_MS};
use crate::robot::leg::{Leg, LEG_COUNT};

/// Bookkeeping for one leg. `current_angle` always mirrors the last duty
/// value written to that leg's channel; there is no hidden hardware state.
#[derive(Debug, Clone, Copy)]
pub struct LegState {
    pub leg: Leg,
    pub current_angle: u8,
    pub target_angle: u8,
    pub step_delay_ms: u64,
}

const fn boot_state(leg: Leg, angle: u8) -> LegState {
    LegState {
        leg,
        current_angle: angle,
        target_angle: angle,
        step_delay_ms: DEFAULT_STEP_DELAY_MS,
    }
}

/// The four leg slots. Each slot is written by exactly one leg runner;
/// the mutex only guards the shared static, it is never contended for a
/// single slot.
pub static LEG_STATE: Mutex<CriticalSectionRawMutex, RefCell<[LegState; LEG_COUNT]>> =
    Mutex::new(RefCell::new([
        boot_state(Leg::FrontLeft, BOOT_POSE[0]),
        boot_state(Leg::FrontRight, BOOT_POSE[1]),
        boot_state(Leg::BackLeft, BOOT_POSE[2]),
        boot_state(Leg::BackRight, BOOT_POSE[3]),
    ]));

/// Arms a leg for a new interpolation segment.
pub fn begin_segment(leg: Leg, target: u8, step_delay_ms: u64) {
    LEG_STATE.lock(|state| {
        let mut state = state.borrow_mut();
        state[leg].target_angle = target;
        state[leg].step_delay_ms = step_delay_ms;
    });
}

/// Records one interpolation step just written to hardware.
pub fn record_step(leg: Leg, angle: u8) {
    LEG_STATE.lock(|state| state.borrow_mut()[leg].current_angle = angle);
}

/// Records an immediate write; current and target collapse onto it.
pub fn record_jump(leg: Leg, angle: u8) {
    LEG_STATE.lock(|state| {
        let mut state = state.borrow_mut();
        state[leg].current_angle = angle;
        state[leg].target_angle = angle;
    });
}

pub fn current_angle(leg: Leg) -> u8 {
    LEG_STATE.lock(|state| state.borrow()[leg].current_angle)
}

pub fn current_angles() -> [u8; LEG_COUNT] {
    LEG_STATE.lock(|state| {
        let state = state.borrow();
        [
            state[0].current_angle,
            state[1].current_angle,
            state[2].current_angle,
            state[3].current_angle,
        ]
    })
}
