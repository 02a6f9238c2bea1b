//! The action dispatcher and the perpetual motion task.
//!
//! `dispatch` is the command boundary: synchronous, non-blocking, safe to
//! call from any task. The motion task is the single consumer of the
//! command channel, so dispatched actions and idle fidgets can never
//! fight over the legs.
use core::sync::atomic::{AtomicBool, Ordering};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Receiver;
use embassy_time::Timer;
use log::{info, warn};

use crate::motion::gait_engine::GaitEngine;
use crate::motion::sync::{LegChannel, CANCEL, FIDGET_COMPLETED, MOTION_COMMANDS};
use crate::robot::commands::{Action, Fidget, MotionCommand};
use crate::MOTION_CHANNEL_SIZE;

/// Raised while the motion task is executing a command.
static MOTION_ACTIVE: AtomicBool = AtomicBool::new(false);

pub fn motion_active() -> bool {
    MOTION_ACTIVE.load(Ordering::Relaxed)
}

/// Entry point for the remote-command layer. Requests a stop of whatever
/// gait is in flight, then queues the action; looping gaits observe the
/// stop at their next cycle boundary and give way. A `Stop` is queued
/// too, so it also reaches a gait that was dispatched but has not
/// started looping yet.
pub fn dispatch(action: Action) {
    CANCEL.set();
    if MOTION_COMMANDS
        .try_send(MotionCommand::Act(action))
        .is_err()
    {
        warn!("[MOTION_TASK] command queue full, dropping {:?}", action);
    }
}

/// Same, from the raw wire identifier. Unknown ids are a no-op.
pub fn dispatch_id(id: u8) {
    match Action::from_id(id) {
        Some(action) => dispatch(action),
        None => warn!("[MOTION_TASK] ignoring unknown action id {}", id),
    }
}

pub async fn motion_task(
    commands: Receiver<'static, CriticalSectionRawMutex, MotionCommand, MOTION_CHANNEL_SIZE>,
    legs: &'static [LegChannel; 4],
) -> ! {
    let mut gait = GaitEngine::new(legs);

    loop {
        let cmd = commands.receive().await;
        // no await between dequeue and the busy flag, so a dispatcher
        // never observes a stale idle state
        MOTION_ACTIVE.store(true, Ordering::Relaxed);
        let stamp = "[MOTION_TASK] received";
        match cmd {
            MotionCommand::Act(Action::Stand) => {
                info!("{stamp} stand");
                gait.stand().await;
            }
            MotionCommand::Act(Action::SitDown) => {
                info!("{stamp} sit down");
                gait.sit_down().await;
            }
            MotionCommand::Act(Action::Sleep) => {
                info!("{stamp} sleep");
                gait.sleep().await;
            }
            MotionCommand::Act(Action::Walk) => {
                info!("{stamp} walk");
                gait.walk_forward().await;
            }
            MotionCommand::Act(Action::WalkBack) => {
                info!("{stamp} walk back");
                gait.walk_back().await;
            }
            MotionCommand::Act(Action::TurnLeft) => {
                info!("{stamp} turn left");
                gait.turn_left().await;
            }
            MotionCommand::Act(Action::TurnRight) => {
                info!("{stamp} turn right");
                gait.turn_right().await;
            }
            MotionCommand::Act(Action::Wave) => {
                info!("{stamp} wave");
                gait.wave().await;
            }
            // the stop itself happened in `dispatch`; the queue entry
            // only flushes a gait that had not started looping yet
            MotionCommand::Act(Action::Stop) => {}
            MotionCommand::Fidget(fidget) => {
                info!("{stamp} fidget {:?}", fidget);
                match fidget {
                    Fidget::Stretch => gait.stretch().await,
                    Fidget::Stretch2 => gait.stretch2().await,
                    Fidget::Scratch => gait.scratch().await,
                }
                Timer::after_secs(3).await;
                gait.sleep().await;
                FIDGET_COMPLETED.signal(());
            }
        }
        MOTION_ACTIVE.store(false, Ordering::Relaxed);
    }
}
