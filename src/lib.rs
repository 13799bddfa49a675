//! Timer-driven DHT Sensor Polling for Embedded Rust
//!
//! This crate integrates a DHT11/DHT22 temperature and humidity sensor into a cooperative,
//! timer-driven event loop. A [`PollingAdapter`] reads the sensor on a fixed cadence from a
//! reactor timer and caches the last good reading, which status consumers query at any time
//! without touching the hardware.
//!
//! # Features
//! - Drift-free cadence: the next read is scheduled from the firing time, not from the end of
//!   a (possibly slow) read
//! - Early timer wake-ups are absorbed without reading the sensor
//! - Failed reads are logged and keep the last good values; polling continues
//! - Configuration is validated once, before any timer is registered
//! - Designed for `no_std` environments, no allocation
//!
//! # Collaborators
//! The bus protocol, the event loop and the configuration loader belong to the host. They plug
//! in through:
//! - [`SensorDriver`] for blocking reads, optionally wrapped in a [`RetryDriver`] that paces
//!   its attempts with an [`embedded-hal`] [`DelayNs`]
//! - [`Reactor`] for timer registration
//! - [`ConfigSection`] and [`SensorRegistry`] for configuration and factory registration
//! - [`StatusSource`] for status queries
//!
//! # Usage
//!
//! ```ignore
//! // At configuration load time.
//! dht_poller::load_config(&mut registry);
//! let config = SensorConfig::from_section(&section)?;
//! let sensor = PollingAdapter::new(config, RetryDriver::new(driver, delay));
//!
//! // Once the host is ready.
//! sensor.activate(&mut reactor)?;
//! ```
//!
//! # Optional Features
//! - `defmt`: Logs through `defmt` and implements `defmt::Format` for public types
//! - `log`: Logs through the `log` facade (ignored when `defmt` is enabled)
//! - `serde`: Implements `serde::Serialize` for [`Status`]
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod adapter;
pub mod config;
pub mod driver;
pub mod error;
pub mod reactor;
pub mod registry;

pub use adapter::{PollingAdapter, Status};
pub use config::{ConfigSection, Name, Pin, SensorConfig, SensorVariant};
pub use driver::{Reading, RetryDriver, SensorDriver};
pub use error::{ActivationError, ConfigError, ReadError};
pub use reactor::{Reactor, TimerCallback};
pub use registry::{SENSOR_KIND, SensorFactory, SensorRegistry, StatusSource, load_config};
