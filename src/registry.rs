//! Boundary to the host's temperature-sensor registry.
//!
//! The registry creates sensors from configuration sections of a known kind, and later pulls
//! their status by name. This crate registers a factory for the [`SENSOR_KIND`] kind through
//! [`load_config`]; the registry then calls it for every matching section.

use embassy_time::Instant;

use crate::adapter::Status;
use crate::config::{ConfigSection, SensorConfig};
use crate::error::ConfigError;

/// Sensor kind under which DHT sensors are registered.
pub const SENSOR_KIND: &str = "DHTSensor";

/// Builds a validated sensor configuration from a configuration section.
pub type SensorFactory<C> = fn(&C) -> Result<SensorConfig, ConfigError>;

/// A sensor whose latest values can be queried at any time.
pub trait StatusSource {
    /// Name the sensor was configured with.
    fn name(&self) -> &str;

    /// Latest known values at `now`. Must not block.
    fn get_status(&self, now: Instant) -> Status;
}

/// Registry mapping sensor kinds to factories.
pub trait SensorRegistry {
    /// Configuration section type the factories receive.
    type Section: ConfigSection + ?Sized;

    /// Registers `factory` for sections of sensor kind `kind`.
    fn add_sensor_factory(&mut self, kind: &'static str, factory: SensorFactory<Self::Section>);
}

/// Registers the DHT sensor factory with `registry`.
pub fn load_config<R>(registry: &mut R)
where
    R: SensorRegistry + ?Sized,
{
    registry.add_sensor_factory(SENSOR_KIND, SensorConfig::from_section::<R::Section>);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::PollingAdapter;
    use crate::config::{Pin, SensorVariant};
    use crate::driver::Reading;
    use crate::error::ReadError;
    use crate::reactor::{Reactor, TimerCallback};
    use embassy_time::Duration;

    struct Section {
        name: String,
        options: Vec<(String, String)>,
    }

    impl Section {
        fn parse(name: &str, options: &str) -> Self {
            let options = options
                .lines()
                .filter_map(|line| line.split_once(':'))
                .map(|(key, value)| (key.trim().to_owned(), value.trim().to_owned()))
                .collect();
            Self {
                name: name.to_owned(),
                options,
            }
        }
    }

    impl ConfigSection for Section {
        fn name(&self) -> &str {
            &self.name
        }

        fn get(&self, option: &str) -> Option<&str> {
            self.options
                .iter()
                .find(|(key, _)| key == option)
                .map(|(_, value)| value.as_str())
        }
    }

    #[derive(Default)]
    struct Registry {
        factories: Vec<(&'static str, SensorFactory<Section>)>,
    }

    impl Registry {
        fn create(
            &self,
            kind: &str,
            section: &Section,
        ) -> Option<Result<SensorConfig, ConfigError>> {
            self.factories
                .iter()
                .find(|(k, _)| *k == kind)
                .map(|(_, factory)| factory(section))
        }
    }

    impl SensorRegistry for Registry {
        type Section = Section;

        fn add_sensor_factory(&mut self, kind: &'static str, factory: SensorFactory<Section>) {
            self.factories.push((kind, factory));
        }
    }

    #[derive(Default)]
    struct LoopReactor<'a> {
        timers: Vec<&'a dyn TimerCallback>,
    }

    impl<'a> Reactor<'a> for LoopReactor<'a> {
        type Handle = ();

        fn register_timer(&mut self, callback: &'a dyn TimerCallback, _waketime: Instant) {
            self.timers.push(callback);
        }
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_load_config_registers_factory() {
        let mut registry = Registry::default();

        load_config(&mut registry);

        assert_eq!(registry.factories.len(), 1);
        assert_eq!(registry.factories[0].0, "DHTSensor");
    }

    #[test]
    fn test_factory_rejects_unknown_variant() {
        let mut registry = Registry::default();
        load_config(&mut registry);

        let section = Section::parse("dht_sensor shelf", "pin: gpio4\ndht_type: DHT99");

        assert_eq!(
            registry.create(SENSOR_KIND, &section),
            Some(Err(ConfigError::unknown_variant("DHT99")))
        );
        assert_eq!(registry.create("BME280", &section), None);
    }

    #[test]
    fn test_configured_sensors_report_by_name() {
        let mut registry = Registry::default();
        load_config(&mut registry);

        let chamber = registry
            .create(
                SENSOR_KIND,
                &Section::parse("dht_sensor chamber", "pin: gpio4\nreport_time: 1.0"),
            )
            .unwrap()
            .unwrap();
        let electronics = registry
            .create(
                SENSOR_KIND,
                &Section::parse("dht_sensor electronics", "pin: gpio5\ndht_type: dht11"),
            )
            .unwrap()
            .unwrap();
        assert_eq!(chamber.report_interval, Duration::from_millis(1000));
        assert_eq!(electronics.variant, SensorVariant::Dht11);

        let chamber = PollingAdapter::new(chamber, |_: SensorVariant, _: &Pin| {
            Reading::from_parts(Some(30.0), Some(35.5))
        });
        let electronics = PollingAdapter::new(
            electronics,
            |_: SensorVariant, _: &Pin| -> Result<Reading, ReadError> { Err(ReadError::Timeout) },
        );

        let mut reactor = LoopReactor::default();
        chamber.activate(&mut reactor).unwrap();
        electronics.activate(&mut reactor).unwrap();
        for timer in &reactor.timers {
            timer.on_timer(at(0));
        }

        let sensors: [&dyn StatusSource; 2] = [&chamber, &electronics];
        let statuses: Vec<_> = sensors
            .iter()
            .map(|sensor| (sensor.name(), sensor.get_status(at(100))))
            .collect();

        assert_eq!(
            statuses,
            vec![
                (
                    "chamber",
                    Status {
                        temperature: Some(35.5),
                        humidity: Some(30.0),
                    }
                ),
                ("electronics", Status::default()),
            ]
        );
    }
}
