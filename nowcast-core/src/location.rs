//! Device location seam.
//!
//! The platform location service is an external collaborator. The app only
//! needs three things from it: the current permission status, a way to ask for
//! permission, and a single coordinate reading.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::{error::WeatherError, model::Coordinates};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    NotDetermined,
    Granted,
    Denied,
}

#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    fn permission(&self) -> PermissionStatus;

    /// Ask for permission. Resolves once, with the user's decision.
    async fn request_permission(&self) -> PermissionStatus;

    /// One coordinate reading; the first fix wins.
    async fn current_location(&self) -> Result<Coordinates, WeatherError>;
}

/// A location provider backed by fixed coordinates (e.g. from config).
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation {
    coordinates: Coordinates,
}

impl FixedLocation {
    pub fn new(coordinates: Coordinates) -> Self {
        Self { coordinates }
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    fn permission(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    async fn request_permission(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    async fn current_location(&self) -> Result<Coordinates, WeatherError> {
        Ok(self.coordinates)
    }
}

/// Used when no location source exists: permission is never granted.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

#[async_trait]
impl LocationProvider for NoLocation {
    fn permission(&self) -> PermissionStatus {
        PermissionStatus::NotDetermined
    }

    async fn request_permission(&self) -> PermissionStatus {
        PermissionStatus::Denied
    }

    async fn current_location(&self) -> Result<Coordinates, WeatherError> {
        Err(WeatherError::PermissionDenied)
    }
}
