//! Recommends marketplace health plans for employee groups under hard eligibility
//! constraints and rolls up the employer's cost.

pub mod catalog;
pub mod config;
pub mod error;
pub mod optimization;
pub mod telemetry;
