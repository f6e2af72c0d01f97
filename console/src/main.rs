use std::rc::Rc;

use weather_station_common::weather::{
    CurrentConditionsDisplay, DummyMeasurementProvider, ForecastDisplay, HeatIndexDisplay,
    MeasurementProviderPointer, StatisticsDisplay, WeatherData,
};

/// Our App struct that holds the weather data, its displays and the provider of the readings.
///
/// The App struct is responsible for wiring the displays to the weather data.
/// Running it replays every reading of the provider, so each display prints one line per reading.
struct App {
    weather_data: Rc<WeatherData>,
    current_conditions: Rc<std::cell::RefCell<CurrentConditionsDisplay>>,
    provider: MeasurementProviderPointer,
}

impl App {
    /// Environment variable naming a JSON file with readings to replay instead of the bundled ones.
    const READINGS_VAR: &'static str = "WEATHER_READINGS";

    /// Create a new App struct.
    fn new() -> anyhow::Result<Self> {
        // If WEATHER_READINGS is set, read the measurements from that file,
        // otherwise use the bundled ones.
        let provider: MeasurementProviderPointer = match std::env::var_os(Self::READINGS_VAR) {
            Some(path) => Box::new(DummyMeasurementProvider::from_path(path)?),
            None => Box::new(DummyMeasurementProvider::new()?),
        };

        let weather_data = WeatherData::new();

        // The displays register themselves; the weather data keeps them alive.
        let current_conditions = CurrentConditionsDisplay::new(&weather_data);
        StatisticsDisplay::new(&weather_data);
        ForecastDisplay::new(&weather_data);
        HeatIndexDisplay::new(&weather_data);

        Ok(Self {
            weather_data,
            current_conditions,
            provider,
        })
    }

    /// Replay all readings, then drop the current conditions display and replay the last one again.
    fn run(&self) -> anyhow::Result<()> {
        log::info!("Replaying readings from {}", self.provider.station_name());

        let readings = self.provider.readings()?;
        for reading in &readings {
            log::info!(
                "Reading received at {}: {reading:?}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
            );

            self.weather_data
                .set_measurements(reading.temperature, reading.humidity, reading.pressure)?;
        }

        if let Some(last) = readings.last() {
            self.current_conditions.borrow_mut().unregister()?;
            log::info!(
                "Current conditions display removed, {} displays left",
                self.weather_data.observer_count()
            );

            self.weather_data
                .set_measurements(last.temperature, last.humidity, last.pressure)?;
        }

        Ok(())
    }
}

/// A minimal main function that initializes the App and runs it.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let app = App::new()?;

    app.run()
}
