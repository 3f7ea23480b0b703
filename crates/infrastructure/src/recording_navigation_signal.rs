use std::sync::Mutex;

use tracing::info;
use warden_application::{Destination, NavigationSignal};

/// Navigation signal for headless callers. Records requested destinations.
#[derive(Default)]
pub struct RecordingNavigationSignal {
    destinations: Mutex<Vec<Destination>>,
}

impl RecordingNavigationSignal {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the most recently requested destination.
    #[must_use]
    pub fn last(&self) -> Option<Destination> {
        self.destinations
            .lock()
            .ok()
            .and_then(|destinations| destinations.last().copied())
    }

    /// Returns every requested destination in order.
    #[must_use]
    pub fn destinations(&self) -> Vec<Destination> {
        self.destinations
            .lock()
            .map(|destinations| destinations.clone())
            .unwrap_or_default()
    }
}

impl NavigationSignal for RecordingNavigationSignal {
    fn navigate(&self, destination: Destination) {
        info!(path = destination.path(), "navigation requested");
        if let Ok(mut destinations) = self.destinations.lock() {
            destinations.push(destination);
        }
    }
}
