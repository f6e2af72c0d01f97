use std::cell::RefCell;
use std::rc::{Rc, Weak};

use weather_station_common::weather::{
    Measurement, Observer, ObserverId, ObserverSharedPointer, Registration, Subject, WeatherData,
};
use weather_station_common::StationError;

type Log = Rc<RefCell<Vec<(&'static str, Measurement)>>>;

struct Recorder {
    name: &'static str,
    log: Log,
}

impl Observer for Recorder {
    fn update(
        &mut self,
        temperature: f64,
        humidity: f64,
        pressure: f64,
    ) -> Result<(), StationError> {
        self.log
            .borrow_mut()
            .push((self.name, Measurement::new(temperature, humidity, pressure)));
        Ok(())
    }
}

fn recorder(name: &'static str, log: &Log) -> ObserverSharedPointer {
    Rc::new(RefCell::new(Recorder {
        name,
        log: log.clone(),
    }))
}

fn names(log: &Log) -> Vec<&'static str> {
    log.borrow().iter().map(|(name, _)| *name).collect()
}

#[test]
fn test_observers_notified_in_registration_order() {
    let weather_data = WeatherData::new();
    let log = Log::default();

    for name in ["a", "b", "c"] {
        weather_data.register_observer(recorder(name, &log));
    }

    weather_data.set_measurements(80.0, 65.0, 30.4).unwrap();

    assert_eq!(names(&log), vec!["a", "b", "c"]);
}

#[test]
fn test_removed_observer_is_not_notified() {
    let weather_data = WeatherData::new();
    let log = Log::default();
    let a = recorder("a", &log);
    let b = recorder("b", &log);
    let c = recorder("c", &log);

    weather_data.register_observer(a);
    weather_data.register_observer(b.clone());
    weather_data.register_observer(c);
    weather_data.remove_observer(&b).unwrap();

    weather_data.set_measurements(80.0, 65.0, 30.4).unwrap();

    assert_eq!(names(&log), vec!["a", "c"]);
    assert_eq!(weather_data.observer_count(), 2);
}

#[test]
fn test_remove_unregistered_observer_fails() {
    let weather_data = WeatherData::new();
    let log = Log::default();
    let stranger = recorder("stranger", &log);

    assert!(matches!(
        weather_data.remove_observer(&stranger),
        Err(StationError::NotRegistered)
    ));

    let id = weather_data.register_observer(stranger.clone());
    weather_data.remove_by_id(id).unwrap();

    assert!(matches!(
        weather_data.remove_by_id(id),
        Err(StationError::NotRegistered)
    ));
}

#[test]
fn test_duplicate_registration_is_idempotent() {
    let weather_data = WeatherData::new();
    let log = Log::default();
    let a = recorder("a", &log);

    let first = weather_data.register_observer(a.clone());
    let second = weather_data.register_observer(a.clone());

    assert_eq!(first, second);
    assert_eq!(weather_data.observer_count(), 1);

    weather_data.set_measurements(80.0, 65.0, 30.4).unwrap();
    assert_eq!(names(&log), vec!["a"]);

    // A single removal is enough to stop notifications.
    weather_data.remove_observer(&a).unwrap();
    weather_data.set_measurements(82.0, 70.0, 29.2).unwrap();
    assert_eq!(names(&log), vec!["a"]);
}

#[test]
fn test_measurements_are_complete_snapshots() {
    let weather_data = WeatherData::new();
    let log = Log::default();
    weather_data.register_observer(recorder("a", &log));

    weather_data.set_measurements(80.0, 65.0, 30.4).unwrap();
    weather_data.set_measurements(82.0, 70.0, 29.2).unwrap();

    let seen: Vec<Measurement> = log.borrow().iter().map(|(_, m)| *m).collect();
    assert_eq!(
        seen,
        vec![
            Measurement::new(80.0, 65.0, 30.4),
            Measurement::new(82.0, 70.0, 29.2),
        ]
    );
    assert_eq!(
        weather_data.measurement(),
        Some(Measurement::new(82.0, 70.0, 29.2))
    );
}

#[test]
fn test_notify_without_measurement_is_noop() {
    let weather_data = WeatherData::new();
    let log = Log::default();
    weather_data.register_observer(recorder("a", &log));

    weather_data.notify_observers().unwrap();

    assert!(log.borrow().is_empty());
    assert_eq!(weather_data.measurement(), None);
}

struct Failing;

impl Observer for Failing {
    fn update(&mut self, _: f64, _: f64, _: f64) -> Result<(), StationError> {
        Err(std::io::Error::other("display unplugged").into())
    }
}

#[test]
fn test_failing_observer_aborts_broadcast() {
    let weather_data = WeatherData::new();
    let log = Log::default();
    weather_data.register_observer(recorder("a", &log));
    weather_data.register_observer(Rc::new(RefCell::new(Failing)));
    weather_data.register_observer(recorder("c", &log));

    let result = weather_data.set_measurements(80.0, 65.0, 30.4);

    assert!(matches!(result, Err(StationError::Render(_))));
    assert_eq!(names(&log), vec!["a"]);
    assert_eq!(
        weather_data.measurement(),
        Some(Measurement::new(80.0, 65.0, 30.4))
    );
}

/// Unregisters itself, and optionally another observer, on its first update.
struct Quitter {
    registration: Option<Registration>,
    victim: Option<ObserverId>,
    weather_data: Weak<WeatherData>,
    updates: usize,
}

impl Observer for Quitter {
    fn update(&mut self, _: f64, _: f64, _: f64) -> Result<(), StationError> {
        self.updates += 1;
        if let Some(registration) = self.registration.take() {
            registration.unregister()?;
        }
        if let (Some(victim), Some(weather_data)) =
            (self.victim.take(), self.weather_data.upgrade())
        {
            weather_data.remove_by_id(victim)?;
        }
        Ok(())
    }
}

#[test]
fn test_observer_can_unregister_during_broadcast() {
    let weather_data = WeatherData::new();
    let log = Log::default();

    let quitter = Rc::new(RefCell::new(Quitter {
        registration: None,
        victim: None,
        weather_data: Rc::downgrade(&weather_data),
        updates: 0,
    }));
    let registration = weather_data.subscribe(quitter.clone());
    let b = weather_data.register_observer(recorder("b", &log));
    weather_data.register_observer(recorder("c", &log));

    quitter.borrow_mut().registration = Some(registration.clone());
    quitter.borrow_mut().victim = Some(b);

    weather_data.set_measurements(80.0, 65.0, 30.4).unwrap();
    assert_eq!(names(&log), vec!["c"]);
    assert!(!registration.is_active());

    weather_data.set_measurements(82.0, 70.0, 29.2).unwrap();
    assert_eq!(names(&log), vec!["c", "c"]);
    assert_eq!(quitter.borrow().updates, 1);
}

/// Pushes a warmer measurement from inside its own update, optionally ignoring the outcome.
struct Echo {
    weather_data: Weak<WeatherData>,
    ignore_errors: bool,
}

impl Observer for Echo {
    fn update(
        &mut self,
        temperature: f64,
        humidity: f64,
        pressure: f64,
    ) -> Result<(), StationError> {
        let Some(weather_data) = self.weather_data.upgrade() else {
            return Ok(());
        };

        match weather_data.set_measurements(temperature + 1.0, humidity, pressure) {
            Err(_) if self.ignore_errors => Ok(()),
            result => result,
        }
    }
}

#[test]
fn test_reentrant_broadcast_is_reported() {
    let weather_data = WeatherData::new();
    let id = weather_data.register_observer(Rc::new(RefCell::new(Echo {
        weather_data: Rc::downgrade(&weather_data),
        ignore_errors: false,
    })));

    let result = weather_data.set_measurements(80.0, 65.0, 30.4);

    assert!(matches!(result, Err(StationError::ReentrantUpdate(failed)) if failed == id));
    assert_eq!(
        weather_data.measurement(),
        Some(Measurement::new(81.0, 65.0, 30.4))
    );
}

#[test]
fn test_later_observers_get_measurement_stored_during_broadcast() {
    let weather_data = WeatherData::new();
    let log = Log::default();
    weather_data.register_observer(Rc::new(RefCell::new(Echo {
        weather_data: Rc::downgrade(&weather_data),
        ignore_errors: true,
    })));
    weather_data.register_observer(recorder("b", &log));

    weather_data.set_measurements(80.0, 65.0, 30.4).unwrap();

    let seen: Vec<Measurement> = log.borrow().iter().map(|(_, m)| *m).collect();
    assert_eq!(seen, vec![Measurement::new(81.0, 65.0, 30.4)]);
    assert_eq!(weather_data.measurement(), Some(seen[0]));
}

#[test]
fn test_registration_outlives_weather_data() {
    let weather_data = WeatherData::new();
    let log = Log::default();
    let registration = weather_data.subscribe(recorder("a", &log));
    assert!(registration.is_active());

    drop(weather_data);

    assert!(!registration.is_active());
    registration.unregister().unwrap();
}
