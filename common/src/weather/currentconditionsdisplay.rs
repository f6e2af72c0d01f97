// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

use std::cell::RefCell;
use std::io::{Stdout, Write};
use std::rc::Rc;

use crate::weather::observer::{DisplayElement, Observer};
use crate::weather::weatherdata::{Registration, WeatherData};
use crate::StationError;

/// Shows the latest temperature and humidity.
pub struct CurrentConditionsDisplay<W: Write = Stdout> {
    temperature: f64,
    humidity: f64,
    out: W,
    registration: Option<Registration>,
}

impl CurrentConditionsDisplay {
    /// Creates a display printing to stdout and registers it with `weather_data`.
    pub fn new(weather_data: &Rc<WeatherData>) -> Rc<RefCell<Self>> {
        Self::with_output(weather_data, std::io::stdout())
    }
}

impl<W: Write + 'static> CurrentConditionsDisplay<W> {
    /// Creates a display writing to `out` and registers it with `weather_data`.
    pub fn with_output(weather_data: &Rc<WeatherData>, out: W) -> Rc<RefCell<Self>> {
        let display = Rc::new(RefCell::new(Self {
            temperature: 0.0,
            humidity: 0.0,
            out,
            registration: None,
        }));

        let registration = weather_data.subscribe(display.clone());
        display.borrow_mut().registration = Some(registration);

        display
    }
}

impl<W: Write> CurrentConditionsDisplay<W> {
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn humidity(&self) -> f64 {
        self.humidity
    }

    pub fn registration(&self) -> Option<&Registration> {
        self.registration.as_ref()
    }

    /// Stops receiving measurements.
    pub fn unregister(&mut self) -> Result<(), StationError> {
        match self.registration.take() {
            Some(registration) => registration.unregister(),
            None => Err(StationError::NotRegistered),
        }
    }
}

impl<W: Write> Observer for CurrentConditionsDisplay<W> {
    fn update(
        &mut self,
        temperature: f64,
        humidity: f64,
        _pressure: f64,
    ) -> Result<(), StationError> {
        self.temperature = temperature;
        self.humidity = humidity;

        self.display()
    }
}

impl<W: Write> DisplayElement for CurrentConditionsDisplay<W> {
    fn display(&mut self) -> Result<(), StationError> {
        writeln!(
            self.out,
            "Current conditions: {}F degrees and {}% humidity",
            self.temperature, self.humidity
        )?;

        Ok(())
    }
}

#[test]
fn test_current_conditions_display() {
    let weather_data = WeatherData::new();
    let output = crate::SharedOutput::default();
    let display = CurrentConditionsDisplay::with_output(&weather_data, output.clone());

    weather_data.set_measurements(80.0, 65.0, 30.4).unwrap();

    assert_eq!(display.borrow().temperature(), 80.0);
    assert_eq!(display.borrow().humidity(), 65.0);
    assert_eq!(
        output.lines(),
        vec!["Current conditions: 80F degrees and 65% humidity"]
    );

    weather_data.set_measurements(82.5, 70.0, 29.2).unwrap();
    assert_eq!(
        output.lines().last().unwrap(),
        "Current conditions: 82.5F degrees and 70% humidity"
    );
}

#[test]
fn test_current_conditions_display_unregister() {
    let weather_data = WeatherData::new();
    let output = crate::SharedOutput::default();
    let display = CurrentConditionsDisplay::with_output(&weather_data, output.clone());

    display.borrow_mut().unregister().unwrap();
    weather_data.set_measurements(80.0, 65.0, 30.4).unwrap();

    assert!(output.lines().is_empty());
    assert_eq!(weather_data.observer_count(), 0);
    assert!(matches!(
        display.borrow_mut().unregister(),
        Err(StationError::NotRegistered)
    ));
}
