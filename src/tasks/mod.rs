//! Tasks Module
//!
//! Background maintenance tasks.

mod sweep;

pub use sweep::spawn_sweep_task;
