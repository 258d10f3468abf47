//! Command-line front end for the Pakistani income tax engine.

pub mod cmd;
pub mod config;
pub mod logging;
pub mod profile_loader;
pub mod report;
pub mod utils;
