// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

use std::cell::RefCell;
use std::io::{Stdout, Write};
use std::rc::Rc;

use crate::weather::observer::{DisplayElement, Observer};
use crate::weather::weatherdata::{Registration, WeatherData};
use crate::StationError;

/// Computes the heat index from a temperature in degrees Fahrenheit and a relative humidity in
/// percent, using the Rothfusz regression.
///
/// Inputs are not validated or clamped. The terms are evaluated left to right with powers
/// spelled out as repeated multiplication, so results are reproducible to the last bit.
pub fn compute_heat_index(t: f64, rh: f64) -> f64 {
    16.923 + (0.185212 * t) + (5.37941 * rh) - (0.100254 * t * rh)
        + (0.00941695 * (t * t))
        + (0.00728898 * (rh * rh))
        + (0.000345372 * (t * t * rh))
        - (0.000814971 * (t * rh * rh))
        + (0.0000102102 * (t * t * rh * rh))
        - (0.000038646 * (t * t * t))
        + (0.0000291583 * (rh * rh * rh))
        + (0.00000142721 * (t * t * t * rh))
        + (0.000000197483 * (t * rh * rh * rh))
        - (0.0000000218429 * (t * t * t * rh * rh))
        + (0.000000000843296 * (t * t * rh * rh * rh))
        - (0.0000000000481975 * (t * t * t * rh * rh * rh))
}

/// Shows the heat index derived from the latest measurement.
pub struct HeatIndexDisplay<W: Write = Stdout> {
    heat_index: f64,
    out: W,
    registration: Option<Registration>,
}

impl HeatIndexDisplay {
    pub fn new(weather_data: &Rc<WeatherData>) -> Rc<RefCell<Self>> {
        Self::with_output(weather_data, std::io::stdout())
    }
}

impl<W: Write + 'static> HeatIndexDisplay<W> {
    pub fn with_output(weather_data: &Rc<WeatherData>, out: W) -> Rc<RefCell<Self>> {
        let display = Rc::new(RefCell::new(Self {
            heat_index: 0.0,
            out,
            registration: None,
        }));

        let registration = weather_data.subscribe(display.clone());
        display.borrow_mut().registration = Some(registration);

        display
    }
}

impl<W: Write> HeatIndexDisplay<W> {
    pub fn heat_index(&self) -> f64 {
        self.heat_index
    }

    pub fn registration(&self) -> Option<&Registration> {
        self.registration.as_ref()
    }

    pub fn unregister(&mut self) -> Result<(), StationError> {
        match self.registration.take() {
            Some(registration) => registration.unregister(),
            None => Err(StationError::NotRegistered),
        }
    }
}

impl<W: Write> Observer for HeatIndexDisplay<W> {
    fn update(
        &mut self,
        temperature: f64,
        humidity: f64,
        _pressure: f64,
    ) -> Result<(), StationError> {
        self.heat_index = compute_heat_index(temperature, humidity);

        self.display()
    }
}

impl<W: Write> DisplayElement for HeatIndexDisplay<W> {
    fn display(&mut self) -> Result<(), StationError> {
        writeln!(self.out, "Heat index is {}", self.heat_index)?;

        Ok(())
    }
}

#[test]
fn test_compute_heat_index() {
    assert_eq!(compute_heat_index(80.0, 65.0), 82.95535063710001);
    assert_eq!(compute_heat_index(82.0, 70.0), 86.90123306385205);
    assert_eq!(compute_heat_index(78.0, 90.0), 83.64967139559604);
    assert_eq!(compute_heat_index(0.0, 0.0), 16.923);
}

#[test]
fn test_compute_heat_index_propagates_nan() {
    assert!(compute_heat_index(f64::NAN, 65.0).is_nan());
    assert!(compute_heat_index(80.0, f64::NAN).is_nan());
}

#[test]
fn test_heat_index_display() {
    let weather_data = WeatherData::new();
    let output = crate::SharedOutput::default();
    let display = HeatIndexDisplay::with_output(&weather_data, output.clone());

    weather_data.set_measurements(80.0, 65.0, 30.4).unwrap();
    weather_data.set_measurements(82.0, 70.0, 29.2).unwrap();

    assert_eq!(display.borrow().heat_index(), 86.90123306385205);
    assert_eq!(
        output.lines(),
        vec!["Heat index is 82.95535063710001", "Heat index is 86.90123306385205"]
    );
}
