//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (`core-playback`, `core-runtime`). Host applications can
//! depend on `streamreader-workspace` and enable the documented decoder
//! features without needing to wire each crate individually.

pub use core_playback as playback;

pub use core_runtime as runtime;
