//! Domain types, error taxonomy, capability configuration, and tracked
//! background tasks for the tendermill platform.

pub mod capability;
pub mod error;
pub mod proposal;
pub mod task;
pub mod tender;
pub mod types;
pub mod webhook;
