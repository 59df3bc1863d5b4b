//! Core library for the `wxpanel` weather station panel.
//!
//! This crate defines:
//! - The wire model of the station backend (`/api/weather`, `/api/refresh`)
//! - The display controller and the sink/notifier traits it writes through
//! - An HTTP backend client and configuration handling
//!
//! It is used by `wxpanel-cli`, but any front end that implements
//! [`DisplaySink`] and [`Notifier`] can drive a [`DisplayController`].

pub mod backend;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod model;

pub use backend::{HttpBackend, WeatherBackend};
pub use config::Config;
pub use controller::{DisplayController, render_report};
pub use display::{DisplaySink, Field, Notifier, Panel};
pub use error::{BackendError, ModelError};
pub use model::{Conditions, RefreshAck, WeatherReading, WeatherReport};
