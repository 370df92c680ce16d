//! Validation rules for the scheduled-job form of the transfer dashboard,
//! plus the HTTP and CLI surfaces that expose them.

pub mod api;
pub mod cli;
pub mod config;
pub mod form;
pub mod shutdown;
