// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

use std::cell::RefCell;
use std::io::{Stdout, Write};
use std::rc::Rc;

use crate::weather::observer::{DisplayElement, Observer};
use crate::weather::weatherdata::{Registration, WeatherData};
use crate::StationError;

/// Standard sea level pressure in inches of mercury.
pub const INITIAL_PRESSURE: f64 = 29.92;

/// The forecast, guessed from the pressure trend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Forecast {
    Improving,
    Unchanged,
    Worsening,
    /// One of the pressures is not a number.
    Unknown,
}

impl Forecast {
    pub fn from_pressure(last: f64, current: f64) -> Self {
        if current > last {
            Forecast::Improving
        } else if current < last {
            Forecast::Worsening
        } else if current == last {
            Forecast::Unchanged
        } else {
            Forecast::Unknown
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Forecast::Improving => "Improving weather on the way!",
            Forecast::Unchanged => "More of the same",
            Forecast::Worsening => "Watch out for cooler, rainy weather",
            Forecast::Unknown => "Unknown",
        }
    }
}

/// Shows a simple forecast based on whether the barometric pressure rises or falls.
pub struct ForecastDisplay<W: Write = Stdout> {
    current_pressure: f64,
    last_pressure: f64,
    out: W,
    registration: Option<Registration>,
}

impl ForecastDisplay {
    pub fn new(weather_data: &Rc<WeatherData>) -> Rc<RefCell<Self>> {
        Self::with_output(weather_data, std::io::stdout())
    }
}

impl<W: Write + 'static> ForecastDisplay<W> {
    pub fn with_output(weather_data: &Rc<WeatherData>, out: W) -> Rc<RefCell<Self>> {
        let display = Rc::new(RefCell::new(Self {
            current_pressure: INITIAL_PRESSURE,
            last_pressure: INITIAL_PRESSURE,
            out,
            registration: None,
        }));

        let registration = weather_data.subscribe(display.clone());
        display.borrow_mut().registration = Some(registration);

        display
    }
}

impl<W: Write> ForecastDisplay<W> {
    pub fn forecast(&self) -> Forecast {
        Forecast::from_pressure(self.last_pressure, self.current_pressure)
    }

    pub fn unregister(&mut self) -> Result<(), StationError> {
        match self.registration.take() {
            Some(registration) => registration.unregister(),
            None => Err(StationError::NotRegistered),
        }
    }
}

impl<W: Write> Observer for ForecastDisplay<W> {
    fn update(
        &mut self,
        _temperature: f64,
        _humidity: f64,
        pressure: f64,
    ) -> Result<(), StationError> {
        self.last_pressure = self.current_pressure;
        self.current_pressure = pressure;

        self.display()
    }
}

impl<W: Write> DisplayElement for ForecastDisplay<W> {
    fn display(&mut self) -> Result<(), StationError> {
        writeln!(self.out, "Forecast: {}", self.forecast().description())?;

        Ok(())
    }
}

#[test]
fn test_forecast_display() {
    let weather_data = WeatherData::new();
    let output = crate::SharedOutput::default();
    let display = ForecastDisplay::with_output(&weather_data, output.clone());

    weather_data.set_measurements(80.0, 65.0, 30.4).unwrap();
    assert_eq!(display.borrow().forecast(), Forecast::Improving);

    weather_data.set_measurements(82.0, 70.0, 29.2).unwrap();
    weather_data.set_measurements(78.0, 90.0, 29.2).unwrap();

    assert_eq!(
        output.lines(),
        vec![
            "Forecast: Improving weather on the way!",
            "Forecast: Watch out for cooler, rainy weather",
            "Forecast: More of the same",
        ]
    );
}

#[test]
fn test_forecast_display_with_nan_pressure() {
    let weather_data = WeatherData::new();
    let output = crate::SharedOutput::default();
    let display = ForecastDisplay::with_output(&weather_data, output.clone());

    weather_data.set_measurements(80.0, 65.0, f64::NAN).unwrap();
    assert_eq!(display.borrow().forecast(), Forecast::Unknown);

    // The previous pressure is still NaN here.
    weather_data.set_measurements(80.0, 65.0, 29.2).unwrap();
    assert_eq!(display.borrow().forecast(), Forecast::Unknown);

    weather_data.set_measurements(80.0, 65.0, 29.0).unwrap();

    assert_eq!(
        output.lines(),
        vec![
            "Forecast: Unknown",
            "Forecast: Unknown",
            "Forecast: Watch out for cooler, rainy weather",
        ]
    );
}
