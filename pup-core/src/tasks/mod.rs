//! Asynchronous task bodies for the pup runtime.
//!
//! - [`leg_task`]: One runner per leg, owning that leg's servo.
//! - [`motion_task`]: Serializes dispatched actions and idle fidgets and
//!   drives the gait engine.
//! - [`idle_task`]: Counts down inactivity and triggers fidgets.
//!
//! The bodies are generic over the boundary traits; the firmware wraps
//! them in `#[embassy_executor::task]` functions with concrete types and
//! spawns them from `main`.
pub mod idle_task;
pub mod leg_task;
pub mod motion_task;
