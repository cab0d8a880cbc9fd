//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Health Check: Pings the shared store connection at a configured interval

mod health;

pub use health::spawn_health_check_task;
