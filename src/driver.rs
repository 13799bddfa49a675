use embedded_hal::delay::DelayNs;

use crate::config::{Pin, SensorVariant};
use crate::error::ReadError;

/// Extra attempts made by [`RetryDriver`] after a failed read, by default.
pub const DEFAULT_RETRIES: u8 = 15;

/// Pause between two attempts of [`RetryDriver`], by default.
///
/// The sensors need about two seconds between conversions.
pub const DEFAULT_RETRY_DELAY_MS: u32 = 2000;

/// Reading returned by a DHT sensor.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    /// Temperature in degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent.
    pub relative_humidity: f32,
}

impl Reading {
    /// Creates a reading from both values.
    pub const fn new(temperature: f32, relative_humidity: f32) -> Self {
        Self {
            temperature,
            relative_humidity,
        }
    }

    /// Converts a `(humidity, temperature)` pair where either value may be missing.
    ///
    /// Many driver libraries report a failed conversion by leaving the values unset instead of
    /// returning an error. A reading exists only if both values do.
    ///
    /// # Returns
    ///
    /// * `Ok(Reading)` if both values are present.
    /// * `Err(ReadError::NoReading)` otherwise.
    pub fn from_parts(humidity: Option<f32>, temperature: Option<f32>) -> Result<Self, ReadError> {
        match (humidity, temperature) {
            (Some(relative_humidity), Some(temperature)) => Ok(Self {
                temperature,
                relative_humidity,
            }),
            _ => Err(ReadError::NoReading),
        }
    }
}

/// Blocking access to a DHT sensor.
///
/// Implementations own the bus protocol (start signal, bit timing, checksum). A call may block
/// the caller for as long as the implementation needs, including its own retries.
pub trait SensorDriver {
    /// Performs one read of the sensor of model `variant` attached to `pin`.
    fn read(&mut self, variant: SensorVariant, pin: &Pin) -> Result<Reading, ReadError>;
}

impl<F> SensorDriver for F
where
    F: FnMut(SensorVariant, &Pin) -> Result<Reading, ReadError>,
{
    fn read(&mut self, variant: SensorVariant, pin: &Pin) -> Result<Reading, ReadError> {
        self(variant, pin)
    }
}

/// Wraps a [`SensorDriver`], retrying failed reads.
///
/// The first successful attempt is returned immediately. After `retries + 1` failed attempts
/// the error of the last one is returned.
pub struct RetryDriver<D, DELAY> {
    driver: D,
    delay: DELAY,
    retries: u8,
    delay_ms: u32,
}

impl<D, DELAY> RetryDriver<D, DELAY>
where
    D: SensorDriver,
    DELAY: DelayNs,
{
    /// Creates a retrying driver with [`DEFAULT_RETRIES`] and [`DEFAULT_RETRY_DELAY_MS`].
    ///
    /// # Arguments
    ///
    /// * `driver` - The driver performing a single read attempt.
    /// * `delay` - A delay provider implementing the `DelayNs` trait, used between attempts.
    pub fn new(driver: D, delay: DELAY) -> Self {
        Self::with_retries(driver, delay, DEFAULT_RETRIES, DEFAULT_RETRY_DELAY_MS)
    }

    /// Creates a retrying driver with an explicit retry count and pause.
    pub fn with_retries(driver: D, delay: DELAY, retries: u8, delay_ms: u32) -> Self {
        Self {
            driver,
            delay,
            retries,
            delay_ms,
        }
    }

    /// Returns the wrapped driver.
    pub fn into_inner(self) -> D {
        self.driver
    }
}

impl<D, DELAY> SensorDriver for RetryDriver<D, DELAY>
where
    D: SensorDriver,
    DELAY: DelayNs,
{
    fn read(&mut self, variant: SensorVariant, pin: &Pin) -> Result<Reading, ReadError> {
        let mut result = self.driver.read(variant, pin);

        for _ in 0..self.retries {
            if result.is_ok() {
                break;
            }
            self.delay.delay_ms(self.delay_ms);
            result = self.driver.read(variant, pin);
        }

        result
    }
}
