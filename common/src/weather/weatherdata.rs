// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::weather::observer::{Measurement, ObserverSharedPointer};
use crate::StationError;

/// Identifier handed out by the weather data when an observer registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The subject trait that keeps track of observers and notifies them.
pub trait Subject {
    /// Subscribes `observer`. Registering an observer twice returns the id it already has.
    fn register_observer(&self, observer: ObserverSharedPointer) -> ObserverId;

    /// Unsubscribes `observer`.
    fn remove_observer(&self, observer: &ObserverSharedPointer) -> Result<(), StationError>;

    /// Sends the current measurement to every observer in registration order.
    fn notify_observers(&self) -> Result<(), StationError>;
}

/// The weather data that owns the latest measurement and broadcasts it to its observers.
///
/// Observers are notified synchronously on the calling thread. Each broadcast iterates a copy of
/// the observer list taken when it starts, so observers may unregister themselves (or others)
/// while being notified. Entries removed during a broadcast are skipped if they were not reached
/// yet, and entries added during a broadcast are notified from the next one on.
///
/// The measurement is re-read for every observer. If an observer stores a newer measurement from
/// inside its own update, the observers after it receive that newer snapshot.
#[derive(Default)]
pub struct WeatherData {
    observers: RefCell<Vec<(ObserverId, ObserverSharedPointer)>>,
    measurement: Cell<Option<Measurement>>,
    next_id: Cell<u64>,
}

fn same_observer(a: &ObserverSharedPointer, b: &ObserverSharedPointer) -> bool {
    // Compare data addresses only; vtable pointers of the same type may differ.
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

impl WeatherData {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Stores a new measurement and notifies all observers.
    ///
    /// The measurement is stored before the broadcast, so it stays updated even when an observer
    /// fails and the error is returned.
    pub fn set_measurements(
        &self,
        temperature: f64,
        humidity: f64,
        pressure: f64,
    ) -> Result<(), StationError> {
        self.measurement
            .set(Some(Measurement::new(temperature, humidity, pressure)));

        self.notify_observers()
    }

    /// The latest measurement, if any was set yet.
    pub fn measurement(&self) -> Option<Measurement> {
        self.measurement.get()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn is_registered(&self, id: ObserverId) -> bool {
        self.observers.borrow().iter().any(|(entry, _)| *entry == id)
    }

    /// Registers `observer` and returns a handle it can keep to unregister itself later.
    pub fn subscribe(self: &Rc<Self>, observer: ObserverSharedPointer) -> Registration {
        Registration {
            subject: Rc::downgrade(self),
            id: self.register_observer(observer),
        }
    }

    /// Unsubscribes the observer registered under `id`.
    pub fn remove_by_id(&self, id: ObserverId) -> Result<(), StationError> {
        let mut observers = self.observers.borrow_mut();
        let index = observers
            .iter()
            .position(|(entry, _)| *entry == id)
            .ok_or(StationError::NotRegistered)?;

        observers.remove(index);
        log::debug!("Observer {id} removed, {} left", observers.len());

        Ok(())
    }
}

impl Subject for WeatherData {
    fn register_observer(&self, observer: ObserverSharedPointer) -> ObserverId {
        let mut observers = self.observers.borrow_mut();

        let existing = observers
            .iter()
            .find(|(_, entry)| same_observer(entry, &observer));

        if let Some((id, _)) = existing {
            log::debug!("Observer {id} is already registered");
            return *id;
        }

        let id = ObserverId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        observers.push((id, observer));
        log::debug!("Observer {id} registered, {} in total", observers.len());

        id
    }

    fn remove_observer(&self, observer: &ObserverSharedPointer) -> Result<(), StationError> {
        let id = self
            .observers
            .borrow()
            .iter()
            .find(|(_, entry)| same_observer(entry, observer))
            .map(|(id, _)| *id)
            .ok_or(StationError::NotRegistered)?;

        self.remove_by_id(id)
    }

    fn notify_observers(&self) -> Result<(), StationError> {
        let Some(measurement) = self.measurement.get() else {
            log::debug!("No measurement yet, nothing to notify");
            return Ok(());
        };

        let observers = self.observers.borrow().clone();
        log::debug!("Notifying {} observers of {measurement:?}", observers.len());

        for (id, observer) in observers {
            if !self.is_registered(id) {
                continue;
            }

            let mut observer = observer
                .try_borrow_mut()
                .map_err(|_| StationError::ReentrantUpdate(id))?;

            let measurement = self.measurement.get().unwrap_or(measurement);
            if let Err(e) = observer.update(
                measurement.temperature,
                measurement.humidity,
                measurement.pressure,
            ) {
                log::warn!("Observer {id} failed to handle update: {e}");
                return Err(e);
            }
        }

        Ok(())
    }
}

/// Non-owning link from an observer back to the weather data it is registered with.
#[derive(Clone, Debug)]
pub struct Registration {
    subject: Weak<WeatherData>,
    id: ObserverId,
}

impl Registration {
    pub fn id(&self) -> ObserverId {
        self.id
    }

    /// Whether the weather data still exists and still has this observer registered.
    pub fn is_active(&self) -> bool {
        self.subject
            .upgrade()
            .is_some_and(|subject| subject.is_registered(self.id))
    }

    /// Removes the observer from its weather data.
    ///
    /// Does nothing if the weather data was dropped already, since nothing can notify the observer
    /// anymore.
    pub fn unregister(&self) -> Result<(), StationError> {
        match self.subject.upgrade() {
            Some(subject) => subject.remove_by_id(self.id),
            None => {
                log::debug!("Weather data for observer {} is gone", self.id);
                Ok(())
            }
        }
    }
}
