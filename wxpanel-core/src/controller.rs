use crate::{
    backend::WeatherBackend,
    display::{DisplaySink, Notifier},
    error::BackendError,
    model::WeatherReport,
};

/// Placeholder shown in the temperature field when no reading is available.
pub const TEMPERATURE_FALLBACK: &str = "-- °C";

/// Prefix of the location field for a degraded display.
pub const WARNING_PREFIX: &str = "⚠️ ";

/// `"{value} {unit}"`, with negative zero printed as `0`.
fn with_unit(value: f64, unit: &str) -> String {
    // -0.0 == 0.0, so this maps both zeros to positive zero.
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value} {unit}")
}

/// Write a validated report into the display.
///
/// An unavailable report only touches the location and temperature fields;
/// the rest keep whatever they showed before.
pub fn render_report<S: DisplaySink + ?Sized>(report: &WeatherReport, sink: &mut S) {
    match report {
        WeatherReport::Conditions(c) => {
            sink.set_location(c.location.clone());
            sink.set_temperature(with_unit(c.temperature, &c.unit_temp));
            sink.set_dew(with_unit(c.dew_point, &c.unit_temp));
            sink.set_wind(with_unit(c.wind_speed, &c.unit_wind));
            sink.set_rain(with_unit(c.rain, &c.unit_rain));
            sink.set_pressure(with_unit(c.pressure, &c.unit_pressure));
        }
        WeatherReport::Unavailable { message } => {
            sink.set_location(format!("{WARNING_PREFIX}{message}"));
            sink.set_temperature(TEMPERATURE_FALLBACK.to_string());
        }
    }
}

/// Fetches readings from a backend and writes them to a display.
///
/// Transport and decode failures are returned to the caller untouched and
/// leave the display as it was.
#[derive(Debug)]
pub struct DisplayController<B, S, N> {
    backend: B,
    sink: S,
    notifier: N,
}

impl<B, S, N> DisplayController<B, S, N>
where
    B: WeatherBackend,
    S: DisplaySink,
    N: Notifier,
{
    pub fn new(backend: B, sink: S, notifier: N) -> Self {
        Self { backend, sink, notifier }
    }

    /// Initial load once the display is ready.
    pub async fn start(&mut self) -> Result<(), BackendError> {
        tracing::debug!(backend = ?self.backend, "starting display controller");
        self.load_weather().await
    }

    /// Fetch the current reading and render it.
    pub async fn load_weather(&mut self) -> Result<(), BackendError> {
        let reading = self.backend.fetch_weather().await?;
        let report = reading.into_report()?;

        match &report {
            WeatherReport::Conditions(c) => {
                tracing::info!(location = %c.location, temperature = c.temperature, "displaying reading");
            }
            WeatherReport::Unavailable { message } => {
                tracing::warn!(%message, "weather unavailable, showing degraded display");
            }
        }

        render_report(&report, &mut self.sink);
        Ok(())
    }

    /// Ask the backend to refresh, show its message, then reload.
    pub async fn refresh_weather(&mut self) -> Result<(), BackendError> {
        let ack = self.backend.request_refresh().await?;

        if ack.is_failure() {
            tracing::warn!(message = %ack.message, "backend reported refresh failure");
        } else {
            tracing::info!(message = %ack.message, "backend refreshed");
        }

        self.notifier.notify(&ack.message);
        self.load_weather().await
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn into_parts(self) -> (B, S, N) {
        (self.backend, self.sink, self.notifier)
    }
}
