//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the stream reader core:
//! - Logging and tracing infrastructure
//! - Runtime error type
//!
//! ## Overview
//!
//! This crate contains the logging conventions that the decoding crates rely
//! on. It does not own any audio state.

pub mod error;
pub mod logging;

pub use error::{Error, Result};
