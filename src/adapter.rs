//! Timer-driven polling of a DHT sensor.
//!
//! [`PollingAdapter`] turns a blocking [`SensorDriver`] into a recurring reactor timer and caches
//! the last good reading. The reactor and the status registry both hold shared references to the
//! adapter, so its mutable state lives in `Cell`s; everything runs on the event-loop thread.

use core::cell::{Cell, RefCell};

use embassy_time::Instant;

use crate::config::SensorConfig;
use crate::driver::{Reading, SensorDriver};
use crate::error::{ActivationError, ReadError};
use crate::reactor::{Reactor, TimerCallback};
use crate::registry::StatusSource;

/// Snapshot of the last good reading, as reported to status consumers.
///
/// Both fields are `None` until the first successful read.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Status {
    /// Temperature in degrees Celsius.
    pub temperature: Option<f32>,
    /// Relative humidity in percent.
    pub humidity: Option<f32>,
}

impl From<Option<Reading>> for Status {
    fn from(reading: Option<Reading>) -> Self {
        Self {
            temperature: reading.map(|r| r.temperature),
            humidity: reading.map(|r| r.relative_humidity),
        }
    }
}

/// Polls one sensor on a fixed cadence and caches the last good reading.
pub struct PollingAdapter<D> {
    config: SensorConfig,
    driver: RefCell<D>,
    // A single cell so both values are always replaced together.
    reading: Cell<Option<Reading>>,
    next_deadline: Cell<Instant>,
    active: Cell<bool>,
}

impl<D> PollingAdapter<D>
where
    D: SensorDriver,
{
    /// Creates an unarmed adapter. Nothing is read until [`activate`](Self::activate) is called
    /// and the reactor fires.
    pub fn new(config: SensorConfig, driver: D) -> Self {
        Self {
            config,
            driver: RefCell::new(driver),
            reading: Cell::new(None),
            next_deadline: Cell::new(Instant::from_ticks(0)),
            active: Cell::new(false),
        }
    }

    /// Registers the adapter as a recurring timer with `reactor`.
    ///
    /// Call this once, after the host reports it is ready. The first firing is requested for the
    /// current deadline, i.e. as soon as possible.
    ///
    /// # Errors
    ///
    /// Returns [`ActivationError::AlreadyActive`] and registers nothing if the adapter is already
    /// armed.
    pub fn activate<'a, R>(&'a self, reactor: &mut R) -> Result<R::Handle, ActivationError>
    where
        R: Reactor<'a>,
    {
        if self.active.replace(true) {
            return Err(ActivationError::AlreadyActive);
        }

        info!(
            "{}: polling {} on pin {} every {} ms",
            self.config.name.as_str(),
            self.config.variant.as_str(),
            self.config.pin.as_str(),
            self.config.report_interval.as_millis()
        );

        Ok(reactor.register_timer(self, self.next_deadline.get()))
    }

    /// Handles a timer firing at `now` and returns when the timer should fire next.
    ///
    /// An early firing (`now` before the deadline) reads nothing and returns the deadline
    /// unchanged. Otherwise the deadline moves to `now + report_interval` before the read, so a
    /// slow read never delays the following one, and the sensor is read once. A failed read
    /// keeps the previous reading and is not retried before the next deadline. The deadline
    /// saturates at [`Instant::MAX`].
    pub fn on_timer_fire(&self, now: Instant) -> Instant {
        let deadline = self.next_deadline.get();
        if now < deadline {
            return deadline;
        }

        let next_deadline = now
            .checked_add(self.config.report_interval)
            .unwrap_or(Instant::MAX);
        self.next_deadline.set(next_deadline);

        match self.read() {
            Ok(reading) => {
                debug!(
                    "{}: {} C, {} %RH",
                    self.config.name.as_str(),
                    reading.temperature,
                    reading.relative_humidity
                );
                self.reading.set(Some(reading));
            }
            Err(ReadError::NoReading) => {
                warn!(
                    "{}: Failed to read from sensor on pin {}",
                    self.config.name.as_str(),
                    self.config.pin.as_str()
                );
            }
            Err(err) => {
                error!(
                    "{}: Error reading DHT sensor on pin {}: {}",
                    self.config.name.as_str(),
                    self.config.pin.as_str(),
                    err
                );
            }
        }

        next_deadline
    }

    fn read(&self) -> Result<Reading, ReadError> {
        let mut driver = self.driver.try_borrow_mut().map_err(|_| ReadError::Busy)?;
        driver.read(self.config.variant, &self.config.pin)
    }
}

impl<D> PollingAdapter<D> {
    /// Returns the last good reading. Never touches the sensor.
    ///
    /// `_now` is the time of the query; the cached values are returned regardless of their age.
    pub fn get_status(&self, _now: Instant) -> Status {
        self.reading.get().into()
    }

    /// Returns the last good reading, if any.
    pub fn reading(&self) -> Option<Reading> {
        self.reading.get()
    }

    /// Returns the sensor name.
    pub fn name(&self) -> &str {
        self.config.name.as_str()
    }

    /// Returns the configuration the adapter was built with.
    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Returns whether a timer has been registered.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Returns the time of the next intended read.
    pub fn next_deadline(&self) -> Instant {
        self.next_deadline.get()
    }
}

impl<D> TimerCallback for PollingAdapter<D>
where
    D: SensorDriver,
{
    fn on_timer(&self, now: Instant) -> Instant {
        self.on_timer_fire(now)
    }
}

impl<D> StatusSource for PollingAdapter<D> {
    fn name(&self) -> &str {
        PollingAdapter::name(self)
    }

    fn get_status(&self, now: Instant) -> Status {
        PollingAdapter::get_status(self, now)
    }
}
