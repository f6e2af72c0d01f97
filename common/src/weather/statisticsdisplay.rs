// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

use std::cell::RefCell;
use std::io::{Stdout, Write};
use std::rc::Rc;

use crate::weather::observer::{DisplayElement, Observer};
use crate::weather::weatherdata::{Registration, WeatherData};
use crate::StationError;

/// Shows the average, maximum and minimum temperature seen so far.
pub struct StatisticsDisplay<W: Write = Stdout> {
    sum: f64,
    readings: u64,
    max: f64,
    min: f64,
    out: W,
    registration: Option<Registration>,
}

impl StatisticsDisplay {
    pub fn new(weather_data: &Rc<WeatherData>) -> Rc<RefCell<Self>> {
        Self::with_output(weather_data, std::io::stdout())
    }
}

impl<W: Write + 'static> StatisticsDisplay<W> {
    pub fn with_output(weather_data: &Rc<WeatherData>, out: W) -> Rc<RefCell<Self>> {
        let display = Rc::new(RefCell::new(Self {
            sum: 0.0,
            readings: 0,
            max: f64::NEG_INFINITY,
            min: f64::INFINITY,
            out,
            registration: None,
        }));

        let registration = weather_data.subscribe(display.clone());
        display.borrow_mut().registration = Some(registration);

        display
    }
}

impl<W: Write> StatisticsDisplay<W> {
    /// Mean temperature, `None` before the first measurement.
    pub fn average(&self) -> Option<f64> {
        (self.readings > 0).then(|| self.sum / self.readings as f64)
    }

    pub fn max(&self) -> Option<f64> {
        (self.readings > 0).then_some(self.max)
    }

    pub fn min(&self) -> Option<f64> {
        (self.readings > 0).then_some(self.min)
    }

    pub fn unregister(&mut self) -> Result<(), StationError> {
        match self.registration.take() {
            Some(registration) => registration.unregister(),
            None => Err(StationError::NotRegistered),
        }
    }
}

impl<W: Write> Observer for StatisticsDisplay<W> {
    fn update(
        &mut self,
        temperature: f64,
        _humidity: f64,
        _pressure: f64,
    ) -> Result<(), StationError> {
        self.sum += temperature;
        self.readings += 1;
        // NaN sticks, like it does in the sum.
        if temperature.is_nan() || temperature > self.max {
            self.max = temperature;
        }
        if temperature.is_nan() || temperature < self.min {
            self.min = temperature;
        }

        self.display()
    }
}

impl<W: Write> DisplayElement for StatisticsDisplay<W> {
    fn display(&mut self) -> Result<(), StationError> {
        match self.average() {
            Some(average) => writeln!(
                self.out,
                "Avg/Max/Min temperature = {}/{}/{}",
                average, self.max, self.min
            )?,
            None => writeln!(self.out, "Avg/Max/Min temperature = -/-/-")?,
        }

        Ok(())
    }
}

#[test]
fn test_statistics_display() {
    let weather_data = WeatherData::new();
    let output = crate::SharedOutput::default();
    let display = StatisticsDisplay::with_output(&weather_data, output.clone());

    assert_eq!(display.borrow().average(), None);

    weather_data.set_measurements(80.0, 65.0, 30.4).unwrap();
    weather_data.set_measurements(82.0, 70.0, 29.2).unwrap();
    weather_data.set_measurements(78.0, 90.0, 29.2).unwrap();

    assert_eq!(display.borrow().average(), Some(80.0));
    assert_eq!(display.borrow().max(), Some(82.0));
    assert_eq!(display.borrow().min(), Some(78.0));
    assert_eq!(
        output.lines(),
        vec![
            "Avg/Max/Min temperature = 80/80/80",
            "Avg/Max/Min temperature = 81/82/80",
            "Avg/Max/Min temperature = 80/82/78",
        ]
    );
}

#[test]
fn test_statistics_display_before_first_measurement() {
    let weather_data = WeatherData::new();
    let output = crate::SharedOutput::default();
    let display = StatisticsDisplay::with_output(&weather_data, output.clone());

    display.borrow_mut().display().unwrap();

    assert_eq!(output.lines(), vec!["Avg/Max/Min temperature = -/-/-"]);
}

#[test]
fn test_statistics_display_propagates_nan() {
    let weather_data = WeatherData::new();
    let output = crate::SharedOutput::default();
    let display = StatisticsDisplay::with_output(&weather_data, output.clone());

    weather_data.set_measurements(80.0, 65.0, 30.4).unwrap();
    weather_data.set_measurements(f64::NAN, 65.0, 30.4).unwrap();
    weather_data.set_measurements(90.0, 65.0, 30.4).unwrap();

    assert!(display.borrow().average().unwrap().is_nan());
    assert!(display.borrow().max().unwrap().is_nan());
    assert!(display.borrow().min().unwrap().is_nan());
    assert_eq!(
        output.lines(),
        vec![
            "Avg/Max/Min temperature = 80/80/80",
            "Avg/Max/Min temperature = NaN/NaN/NaN",
            "Avg/Max/Min temperature = NaN/NaN/NaN",
        ]
    );
}
