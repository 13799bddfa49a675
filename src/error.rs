use core::fmt;

use heapless::String;

/// Maximum length of an unrecognized `dht_type` kept in [`ConfigError::UnknownVariant`].
pub const MAX_VARIANT_TAG_LEN: usize = 16;

/// Possible errors from a single sensor read.
///
/// None of these are fatal: the polling adapter logs them and keeps its last good reading.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadError {
    /// The driver completed but returned no humidity or temperature value.
    NoReading,
    /// Timed out waiting for the sensor to respond.
    Timeout,
    /// Checksum did not match the received data.
    ChecksumMismatch,
    /// Error from the underlying pin or bus.
    Bus,
    /// The driver was already in use when the read was requested.
    Busy,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoReading => write!(f, "sensor returned no data"),
            Self::Timeout => write!(f, "timed out waiting for sensor"),
            Self::ChecksumMismatch => write!(f, "checksum mismatch"),
            Self::Bus => write!(f, "pin or bus error"),
            Self::Busy => write!(f, "driver busy"),
        }
    }
}

impl core::error::Error for ReadError {}

/// Errors raised while building a [`SensorConfig`](crate::SensorConfig).
///
/// These abort sensor setup: no adapter is built and no timer is registered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required option is absent.
    MissingOption(&'static str),
    /// The option value is not a number.
    InvalidFloat {
        /// Offending option.
        option: &'static str,
    },
    /// The option value is not strictly above the allowed minimum.
    BelowMinimum {
        /// Offending option.
        option: &'static str,
        /// Exclusive lower bound, in milliseconds.
        minimum_ms: u64,
    },
    /// The option value is above the allowed maximum.
    AboveMaximum {
        /// Offending option.
        option: &'static str,
        /// Inclusive upper bound, in milliseconds.
        maximum_ms: u64,
    },
    /// `dht_type` does not name a supported sensor.
    UnknownVariant(String<MAX_VARIANT_TAG_LEN>),
    /// The option value does not fit the fixed-capacity field it is stored in.
    ValueTooLong {
        /// Offending option.
        option: &'static str,
        /// Capacity of the field, in bytes.
        max_len: usize,
    },
}

impl ConfigError {
    /// Builds a [`ConfigError::UnknownVariant`], truncating the tag to the stored capacity.
    pub(crate) fn unknown_variant(tag: &str) -> Self {
        let mut kept = String::new();
        for c in tag.chars() {
            if kept.push(c).is_err() {
                break;
            }
        }
        Self::UnknownVariant(kept)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOption(option) => write!(f, "option '{option}' must be specified"),
            Self::InvalidFloat { option } => write!(f, "option '{option}' must be a number"),
            Self::BelowMinimum { option, minimum_ms } => {
                write!(f, "option '{option}' must be above {minimum_ms} ms")
            }
            Self::AboveMaximum { option, maximum_ms } => {
                write!(f, "option '{option}' must be at most {maximum_ms} ms")
            }
            Self::UnknownVariant(tag) => write!(f, "unknown dht_type: {tag}"),
            Self::ValueTooLong { option, max_len } => {
                write!(f, "option '{option}' is longer than {max_len} bytes")
            }
        }
    }
}

impl core::error::Error for ConfigError {}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, f: defmt::Formatter<'_>) {
        match self {
            Self::MissingOption(option) => defmt::write!(f, "option '{}' must be specified", option),
            Self::InvalidFloat { option } => defmt::write!(f, "option '{}' must be a number", option),
            Self::BelowMinimum { option, minimum_ms } => {
                defmt::write!(f, "option '{}' must be above {} ms", option, minimum_ms)
            }
            Self::AboveMaximum { option, maximum_ms } => {
                defmt::write!(f, "option '{}' must be at most {} ms", option, maximum_ms)
            }
            Self::UnknownVariant(tag) => defmt::write!(f, "unknown dht_type: {}", tag.as_str()),
            Self::ValueTooLong { option, max_len } => {
                defmt::write!(f, "option '{}' is longer than {} bytes", option, max_len)
            }
        }
    }
}

/// Error returned when arming an adapter that is already armed.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivationError {
    /// A timer is already registered for this adapter.
    AlreadyActive,
}

impl fmt::Display for ActivationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sensor polling is already active")
    }
}

impl core::error::Error for ActivationError {}
