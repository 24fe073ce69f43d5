//! Library components of the termmap command line.

pub mod config;
pub mod logging;
