//! # Reader Configuration
//!
//! Buffer sizing for the streaming reader.

use serde::{Deserialize, Serialize};

/// Largest decoded frame a single decode call is expected to produce, in bytes.
pub const DEFAULT_MAX_FRAME_BYTES: usize = 192_000;

/// Streaming reader configuration.
///
/// Controls the sizing of the carry-over buffer that holds decoded samples
/// between `read` calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Size of one maximal decoded frame in bytes.
    ///
    /// Before every decode call the carry buffer is grown by this amount if
    /// less than this much room is left.
    ///
    /// Default: 192 000 bytes.
    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,

    /// Initial size of the carry buffer in bytes.
    ///
    /// Default: two maximal frames (384 000 bytes).
    #[serde(default = "default_carry_capacity")]
    pub carry_capacity: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_frame_bytes: default_max_frame_bytes(),
            carry_capacity: default_carry_capacity(),
        }
    }
}

impl ReaderConfig {
    /// Configuration with a custom frame bound; the carry buffer starts at
    /// two frames.
    pub fn with_max_frame_bytes(max_frame_bytes: usize) -> Self {
        Self {
            max_frame_bytes,
            carry_capacity: max_frame_bytes * 2,
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_frame_bytes == 0 {
            return Err("max_frame_bytes must be > 0".to_string());
        }

        if self.carry_capacity == 0 {
            return Err("carry_capacity must be > 0".to_string());
        }

        if self.carry_capacity < self.max_frame_bytes {
            return Err("carry_capacity cannot be smaller than max_frame_bytes".to_string());
        }

        Ok(())
    }
}

// ============================================================================
// Default Functions (for serde)
// ============================================================================

fn default_max_frame_bytes() -> usize {
    DEFAULT_MAX_FRAME_BYTES
}

fn default_carry_capacity() -> usize {
    DEFAULT_MAX_FRAME_BYTES * 2
}
