// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::cell::RefCell;
use std::rc::Rc;

use crate::StationError;

/// A single reading of the weather station sensors.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    /// Temperature in degrees Fahrenheit.
    pub temperature: f64,

    /// Relative humidity in percent.
    pub humidity: f64,

    /// Barometric pressure in inches of mercury.
    pub pressure: f64,
}

impl Measurement {
    pub fn new(temperature: f64, humidity: f64, pressure: f64) -> Self {
        Self {
            temperature,
            humidity,
            pressure,
        }
    }
}

pub type ObserverSharedPointer = Rc<RefCell<dyn Observer>>;

/// The observer trait, implemented by everything that wants to receive measurements.
pub trait Observer {
    /// Called by the weather data with the latest measurement.
    ///
    /// The broadcast is synchronous, so an implementation must not block.
    fn update(
        &mut self,
        temperature: f64,
        humidity: f64,
        pressure: f64,
    ) -> Result<(), StationError>;
}

/// The display element trait for anything that can render its current state.
pub trait DisplayElement {
    /// Writes the current state as one line.
    fn display(&mut self) -> Result<(), StationError>;
}
