//! Sensor configuration.
//!
//! A [`SensorConfig`] is built once from a [`ConfigSection`] when the host loads its
//! configuration, and never changes afterwards. Every validation happens here, so an adapter
//! built from a `SensorConfig` cannot hold an invalid driver binding.

use embassy_time::Duration;
use heapless::String;

use crate::error::ConfigError;

/// Maximum length of a sensor name.
pub const MAX_NAME_LEN: usize = 32;

/// Maximum length of a pin identifier.
pub const MAX_PIN_LEN: usize = 16;

/// Report interval used when `report_time` is not set.
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_millis(2000);

/// `report_time` must be strictly above this.
pub const MIN_REPORT_INTERVAL: Duration = Duration::from_millis(100);

/// `report_time` must not exceed this.
pub const MAX_REPORT_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Name of a configured sensor.
pub type Name = String<MAX_NAME_LEN>;

/// Identifier of the pin the sensor data line is attached to.
///
/// Opaque to this crate; it is handed to the [`SensorDriver`](crate::SensorDriver) verbatim.
pub type Pin = String<MAX_PIN_LEN>;

/// A named configuration section holding string-valued options.
///
/// Implemented by the host's configuration loader. Option lookup is by exact name.
pub trait ConfigSection {
    /// Full section name, e.g. `"dht_sensor chamber"`.
    fn name(&self) -> &str;

    /// Raw value of `option`, or `None` when it is not set.
    fn get(&self, option: &str) -> Option<&str>;
}

/// Supported sensor models.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SensorVariant {
    /// DHT11: 1 degree / 1 %RH resolution.
    Dht11,
    /// DHT22 / AM2302: 0.1 degree / 0.1 %RH resolution.
    #[default]
    Dht22,
}

impl SensorVariant {
    /// Resolves a `dht_type` tag, ignoring ASCII case.
    pub fn from_tag(tag: &str) -> Result<Self, ConfigError> {
        if tag.eq_ignore_ascii_case("DHT11") {
            Ok(Self::Dht11)
        } else if tag.eq_ignore_ascii_case("DHT22") {
            Ok(Self::Dht22)
        } else {
            Err(ConfigError::unknown_variant(tag))
        }
    }

    /// Canonical tag of the variant.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dht11 => "DHT11",
            Self::Dht22 => "DHT22",
        }
    }
}

/// Validated configuration of one polled sensor.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorConfig {
    /// Sensor name, used in logs and by the status registry.
    pub name: Name,
    /// Pin the data line is attached to.
    pub pin: Pin,
    /// Sensor model.
    pub variant: SensorVariant,
    /// Time between two read attempts.
    pub report_interval: Duration,
}

impl SensorConfig {
    /// Builds a configuration, checking the report interval.
    pub fn new(
        name: &str,
        pin: &str,
        variant: SensorVariant,
        report_interval: Duration,
    ) -> Result<Self, ConfigError> {
        if report_interval <= MIN_REPORT_INTERVAL {
            return Err(ConfigError::BelowMinimum {
                option: "report_time",
                minimum_ms: MIN_REPORT_INTERVAL.as_millis(),
            });
        }
        if report_interval > MAX_REPORT_INTERVAL {
            return Err(ConfigError::AboveMaximum {
                option: "report_time",
                maximum_ms: MAX_REPORT_INTERVAL.as_millis(),
            });
        }

        Ok(Self {
            name: bounded("name", name)?,
            pin: bounded("pin", pin)?,
            variant,
            report_interval,
        })
    }

    /// Reads and validates the `pin`, `dht_type` and `report_time` options of a section.
    ///
    /// The sensor name is the last whitespace-separated word of the section name, so
    /// `[dht_sensor chamber]` yields a sensor called `chamber`.
    ///
    /// # Errors
    ///
    /// * `MissingOption("pin")` if `pin` is not set.
    /// * `UnknownVariant` if `dht_type` is neither DHT11 nor DHT22.
    /// * `InvalidFloat`, `BelowMinimum` or `AboveMaximum` if `report_time` is not a number above
    ///   0.1 seconds and at most one day.
    pub fn from_section<C>(section: &C) -> Result<Self, ConfigError>
    where
        C: ConfigSection + ?Sized,
    {
        let name = section.name().split_whitespace().last().unwrap_or_default();
        let pin = section
            .get("pin")
            .map(str::trim)
            .ok_or(ConfigError::MissingOption("pin"))?;
        let variant = match section.get("dht_type") {
            Some(tag) => SensorVariant::from_tag(tag.trim())?,
            None => SensorVariant::default(),
        };
        let report_interval = match section.get("report_time") {
            Some(raw) => parse_seconds("report_time", raw)?,
            None => DEFAULT_REPORT_INTERVAL,
        };

        Self::new(name, pin, variant, report_interval)
    }
}

/// Parses a float number of seconds into a [`Duration`], rejecting values at or below the
/// minimum report interval or above the maximum one.
fn parse_seconds(option: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    let seconds: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidFloat { option })?;

    if !seconds.is_finite() {
        return Err(ConfigError::InvalidFloat { option });
    }

    let micros = seconds * 1_000_000.0;
    if micros <= MIN_REPORT_INTERVAL.as_micros() as f64 {
        return Err(ConfigError::BelowMinimum {
            option,
            minimum_ms: MIN_REPORT_INTERVAL.as_millis(),
        });
    }
    if micros > MAX_REPORT_INTERVAL.as_micros() as f64 {
        return Err(ConfigError::AboveMaximum {
            option,
            maximum_ms: MAX_REPORT_INTERVAL.as_millis(),
        });
    }

    // Rounded to the nearest microsecond, but never onto the minimum: the value is above it.
    let micros = ((micros + 0.5) as u64).max(MIN_REPORT_INTERVAL.as_micros() + 1);
    Ok(Duration::from_micros(micros))
}

fn bounded<const N: usize>(option: &'static str, value: &str) -> Result<String<N>, ConfigError> {
    String::try_from(value).map_err(|_| ConfigError::ValueTooLong {
        option,
        max_len: N,
    })
}
