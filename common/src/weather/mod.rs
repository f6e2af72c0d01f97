// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

mod observer;
mod weatherdata;
mod dummymeasurementprovider;

mod currentconditionsdisplay;
mod forecastdisplay;
mod heatindexdisplay;
mod statisticsdisplay;

pub use observer::{DisplayElement, Measurement, Observer, ObserverSharedPointer};
pub use weatherdata::{ObserverId, Registration, Subject, WeatherData};

pub use dummymeasurementprovider::{
    DummyMeasurementProvider, MeasurementProvider, MeasurementProviderPointer,
};

pub use currentconditionsdisplay::CurrentConditionsDisplay;
pub use forecastdisplay::{Forecast, ForecastDisplay, INITIAL_PRESSURE};
pub use heatindexdisplay::{compute_heat_index, HeatIndexDisplay};
pub use statisticsdisplay::StatisticsDisplay;
