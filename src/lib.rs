//! Footprint foot IK support library
//!
//! Estimates per-frame foot/ground contact for a character and exposes the
//! per-foot offsets and pelvis drop an animation layer needs.

pub mod config;
pub mod game;
