//!
//! Injectable time source
//!

use std::time::{SystemTime, SystemTimeError};

/// Source of the current time
///
/// Signers and verifiers read every timestamp they need through their clock, once per operation.
/// Tests install a fixed clock to make `created`, `iat`, `nbf` and `exp` deterministic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Clock {
    /// Read the system clock
    #[default]
    System,

    /// Always report the same UNIX timestamp (in seconds)
    Fixed(u64),
}

impl Clock {
    /// Current UNIX timestamp in seconds
    pub fn unix_timestamp(&self) -> Result<u64, SystemTimeError> {
        match self {
            Self::System => SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .map(|duration| duration.as_secs()),
            Self::Fixed(timestamp) => Ok(*timestamp),
        }
    }
}
