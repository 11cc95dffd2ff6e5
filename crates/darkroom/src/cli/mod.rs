//! Command handlers for the Darkroom CLI.

pub mod config;
pub mod ops;
pub mod transform;
