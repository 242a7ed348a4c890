//! Application-wide services: live config reload and light/dark appearance.

pub mod appearance;
pub mod config_manager;
