//! Device location contract.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use nearbite_core::Coordinate;

/// Location permission as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    NotDetermined,
    Denied,
    AuthorizedWhenInUse,
    AuthorizedAlways,
}

impl Authorization {
    #[must_use]
    pub fn is_authorized(self) -> bool {
        matches!(self, Self::AuthorizedWhenInUse | Self::AuthorizedAlways)
    }
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    fn authorization(&self) -> Authorization;

    /// One-shot position fix. `None` when no fix is available.
    async fn current(&self) -> Option<Coordinate>;
}

/// A provider with a position set by the caller, for the CLI and tests.
#[derive(Debug)]
pub struct FixedLocation {
    authorization: Authorization,
    coordinate: Mutex<Option<Coordinate>>,
}

impl FixedLocation {
    /// Authorized provider reporting `coordinate`.
    #[must_use]
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            authorization: Authorization::AuthorizedWhenInUse,
            coordinate: Mutex::new(Some(coordinate)),
        }
    }

    /// Authorized provider that has no fix.
    #[must_use]
    pub fn without_fix() -> Self {
        Self {
            authorization: Authorization::AuthorizedWhenInUse,
            coordinate: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn with_authorization(mut self, authorization: Authorization) -> Self {
        self.authorization = authorization;
        self
    }

    pub fn move_to(&self, coordinate: Coordinate) {
        *self.coordinate.lock().unwrap_or_else(PoisonError::into_inner) = Some(coordinate);
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    fn authorization(&self) -> Authorization {
        self.authorization
    }

    async fn current(&self) -> Option<Coordinate> {
        *self.coordinate.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
