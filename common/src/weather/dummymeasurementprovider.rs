// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::path::Path;

use crate::weather::observer::Measurement;
use crate::StationError;

/// The measurement provider trait that supplies readings to feed into the weather data.
pub trait MeasurementProvider {
    /// The name of the station the readings come from.
    fn station_name(&self) -> &str;

    /// The readings, oldest first.
    fn readings(&self) -> Result<Vec<Measurement>, StationError>;
}

pub type MeasurementProviderPointer = Box<dyn MeasurementProvider>;

/// Replays a fixed list of readings, by default the ones bundled with the crate.
#[derive(Deserialize, Default, Debug, Clone)]
pub struct DummyMeasurementProvider {
    station_name: String,
    readings: Vec<Measurement>,
}

impl DummyMeasurementProvider {
    pub fn new() -> Result<Self, StationError> {
        let json_data = std::include_str!("./dummymeasurements.json");

        Self::from_json(json_data)
    }

    pub fn from_json(json_data: &str) -> Result<Self, StationError> {
        Ok(serde_json::from_str::<Self>(json_data)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StationError> {
        let path = path.as_ref();
        let json_data = std::fs::read_to_string(path).map_err(|source| StationError::ReadData {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded measurement data from {}", path.display());

        Self::from_json(&json_data)
    }
}

impl MeasurementProvider for DummyMeasurementProvider {
    fn station_name(&self) -> &str {
        &self.station_name
    }

    fn readings(&self) -> Result<Vec<Measurement>, StationError> {
        Ok(self.readings.clone())
    }
}

#[test]
fn test_dummy_measurement_provider() {
    let provider = DummyMeasurementProvider::new().unwrap();
    let readings = provider.readings().unwrap();

    assert_eq!(provider.station_name(), "Weather-O-Rama");
    assert_eq!(readings.len(), 3);
    assert_eq!(readings[0], Measurement::new(80.0, 65.0, 30.4));
}

#[test]
fn test_dummy_measurement_provider_rejects_malformed_json() {
    let result = DummyMeasurementProvider::from_json(
        r#"{
            "station_name": "Broken",
            "readings": [ { "temperature": 80.0 } ]
        }"#,
    );

    assert!(matches!(result, Err(StationError::Data(_))));
}

#[test]
fn test_dummy_measurement_provider_from_path() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        br#"{
            "station_name": "Rooftop",
            "readings": [ { "temperature": 71.5, "humidity": 40.0, "pressure": 30.1 } ]
        }"#,
    )
    .unwrap();

    let provider = DummyMeasurementProvider::from_path(file.path()).unwrap();

    assert_eq!(provider.station_name(), "Rooftop");
    assert_eq!(provider.readings().unwrap(), vec![Measurement::new(71.5, 40.0, 30.1)]);

    let missing = file.path().with_extension("missing");
    assert!(matches!(
        DummyMeasurementProvider::from_path(&missing),
        Err(StationError::ReadData { .. })
    ));
}
