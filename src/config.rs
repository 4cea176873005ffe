//! Support for library configuration options

use std::sync::{Arc, Mutex};
use once_cell::sync::Lazy;

/// Name of the remote collection that holds one document per event.
/// Feel free to override it when initing this library.
pub static COLLECTION_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("timeline-events".to_string())));

/// Key of the blob that holds the whole collection in the local store.
/// Feel free to override it when initing this library.
pub static STORAGE_KEY: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("timeline-events".to_string())));

/// The first year the timeline can display.
/// Feel free to override it when initing this library.
pub static START_YEAR: Lazy<Arc<Mutex<i32>>> = Lazy::new(|| Arc::new(Mutex::new(2015)));

/// The current value of [`COLLECTION_NAME`]
pub fn collection_name() -> String {
    read::<String>(&COLLECTION_NAME)
}

/// The current value of [`STORAGE_KEY`]
pub fn storage_key() -> String {
    read::<String>(&STORAGE_KEY)
}

/// The current value of [`START_YEAR`]
pub fn start_year() -> i32 {
    read::<i32>(&START_YEAR)
}

fn read<T: Clone>(setting: &Mutex<T>) -> T {
    // A poisoned setting still holds a valid value
    match setting.lock() {
        Ok(value) => value.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}
