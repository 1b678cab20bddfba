//! Core library for the `nowcast` weather app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The WeatherAPI.com client behind the `WeatherProvider` trait
//! - Icon classification and temperature unit conversion
//! - The application controller (state machine) and its async driver
//!
//! It is used by `nowcast-cli`, but any front end can drive the same controller.

pub mod app;
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod icon;
pub mod location;
pub mod model;
pub mod provider;
pub mod units;

pub use app::App;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use controller::{Action, AppController, Display, DisplayState, Effect, Phase};
pub use error::WeatherError;
pub use icon::{Icon, classify};
pub use location::{FixedLocation, LocationProvider, NoLocation, PermissionStatus};
pub use model::{Coordinates, WeatherQuery, WeatherResult};
pub use provider::{WeatherProvider, provider_from_config, weatherapi::WeatherApiProvider};
pub use units::{TemperatureUnit, to_display};
