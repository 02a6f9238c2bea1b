//! Gait sequencing and task synchronization for the pup.
//!
//! - [`sync`] holds the cooperative cancellation token and the per-leg
//!   rails (command channel, start latch, done signal).
//! - [`gait_engine`] sequences named postures and gaits over the rails.
//!
//! Used by the motion task to plan and execute movement.
pub mod gait_engine;
pub mod sync;
