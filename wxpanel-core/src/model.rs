use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};

use crate::error::ModelError;

/// Status value the backend uses for a usable reading.
pub const STATUS_OK: &str = "ok";

/// Body of `GET /api/weather`, as sent on the wire.
///
/// When `status` is not `"ok"` the backend sends `message` and nothing else
/// should be trusted, so every field decodes leniently: a missing, null or
/// mistyped value becomes `None` (or an empty `status`) instead of failing
/// the whole body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub dew_point: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub unit_temp: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub wind_speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub unit_wind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub rain: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub unit_rain: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub pressure: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub unit_pressure: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn lenient_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    lenient::<D, String>(deserializer).map(Option::unwrap_or_default)
}

/// Strings pass through, other scalars keep their JSON text, null is absent.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Current conditions from an `"ok"` reading. Every field is required.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditions {
    pub location: String,
    pub temperature: f64,
    pub dew_point: f64,
    pub unit_temp: String,
    pub wind_speed: f64,
    pub unit_wind: String,
    pub rain: f64,
    pub unit_rain: String,
    pub pressure: f64,
    pub unit_pressure: String,
}

/// A reading after validation: either usable data or the backend's reason why not.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherReport {
    Conditions(Conditions),
    Unavailable { message: String },
}

impl WeatherReading {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Validate the wire reading.
    ///
    /// A non-`"ok"` status never fails: data fields are dropped and a
    /// missing `message` becomes empty.
    pub fn into_report(self) -> Result<WeatherReport, ModelError> {
        if !self.is_ok() {
            return Ok(WeatherReport::Unavailable {
                message: self.message.unwrap_or_default(),
            });
        }

        Ok(WeatherReport::Conditions(Conditions {
            location: required(self.location, "location")?,
            temperature: required(self.temperature, "temperature")?,
            dew_point: required(self.dew_point, "dew_point")?,
            unit_temp: required(self.unit_temp, "unit_temp")?,
            wind_speed: required(self.wind_speed, "wind_speed")?,
            unit_wind: required(self.unit_wind, "unit_wind")?,
            rain: required(self.rain, "rain")?,
            unit_rain: required(self.unit_rain, "unit_rain")?,
            pressure: required(self.pressure, "pressure")?,
            unit_pressure: required(self.unit_pressure, "unit_pressure")?,
        }))
    }
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ModelError> {
    value.ok_or(ModelError::MissingField(field))
}

/// Body of `GET /api/refresh`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshAck {
    #[serde(default)]
    pub status: Option<String>,
    pub message: String,
}

impl RefreshAck {
    /// True when the backend explicitly reported the refresh as failed.
    pub fn is_failure(&self) -> bool {
        self.status.as_deref().is_some_and(|s| s != STATUS_OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_reading_becomes_conditions() {
        let reading: WeatherReading = serde_json::from_value(serde_json::json!({
            "status": "ok",
            "location": "Berlin",
            "temperature": 21,
            "unit_temp": "°C",
            "dew_point": 10,
            "wind_speed": 5,
            "unit_wind": "km/h",
            "rain": 0,
            "unit_rain": "mm",
            "pressure": 1013,
            "unit_pressure": "hPa"
        }))
        .expect("reading should decode");

        let report = reading.into_report().expect("ok reading should validate");
        let WeatherReport::Conditions(c) = &report else {
            panic!("expected conditions, got {report:?}");
        };
        assert_eq!(c.location, "Berlin");
        assert_eq!(c.temperature, 21.0);
        assert_eq!(c.unit_pressure, "hPa");
    }

    #[test]
    fn error_status_ignores_data_fields() {
        let reading: WeatherReading = serde_json::from_value(serde_json::json!({
            "status": "error",
            "message": "sensor offline",
            "temperature": 99
        }))
        .expect("reading should decode");

        assert_eq!(
            reading.into_report().expect("error reading should validate"),
            WeatherReport::Unavailable { message: "sensor offline".into() }
        );
    }

    #[test]
    fn unknown_status_without_message_is_unavailable() {
        let reading = WeatherReading { status: "stale".into(), ..Default::default() };

        assert_eq!(
            reading.into_report().expect("should validate"),
            WeatherReport::Unavailable { message: String::new() }
        );
    }

    fn decode(value: serde_json::Value) -> WeatherReading {
        serde_json::from_value(value).expect("reading should decode")
    }

    #[test]
    fn error_status_tolerates_mistyped_data_fields() {
        let reading = decode(serde_json::json!({
            "status": "error",
            "message": "sensor offline",
            "temperature": "n/a",
            "unit_temp": 5,
            "pressure": null
        }));

        assert_eq!(
            reading.into_report().expect("should validate"),
            WeatherReport::Unavailable { message: "sensor offline".into() }
        );
    }

    #[test]
    fn missing_or_null_status_is_not_ok() {
        for body in [
            serde_json::json!({ "message": "sensor offline" }),
            serde_json::json!({ "status": null, "message": "sensor offline" }),
            serde_json::json!({ "status": 1, "message": "sensor offline" }),
        ] {
            let reading = decode(body);
            assert!(!reading.is_ok());
            assert_eq!(
                reading.into_report().expect("should validate"),
                WeatherReport::Unavailable { message: "sensor offline".into() }
            );
        }
    }

    #[test]
    fn non_string_message_keeps_its_json_text() {
        let reading = decode(serde_json::json!({ "status": "error", "message": 42 }));
        assert_eq!(reading.message.as_deref(), Some("42"));

        let reading = decode(serde_json::json!({ "status": "error", "message": null }));
        assert_eq!(reading.message, None);
    }

    #[test]
    fn ok_reading_with_mistyped_field_is_rejected() {
        let reading = decode(serde_json::json!({
            "status": "ok",
            "location": "Berlin",
            "temperature": "warm"
        }));

        assert_eq!(reading.into_report().unwrap_err(), ModelError::MissingField("temperature"));
    }

    #[test]
    fn ok_reading_missing_field_is_rejected() {
        let reading = WeatherReading {
            status: "ok".into(),
            location: Some("Berlin".into()),
            ..Default::default()
        };

        let err = reading.into_report().unwrap_err();
        assert_eq!(err, ModelError::MissingField("temperature"));
    }

    #[test]
    fn refresh_ack_failure_flag() {
        let ok: RefreshAck =
            serde_json::from_str(r#"{"status":"ok","message":"done"}"#).expect("decode");
        let bare: RefreshAck = serde_json::from_str(r#"{"message":"done"}"#).expect("decode");
        let failed: RefreshAck =
            serde_json::from_str(r#"{"status":"error","message":"no quota"}"#).expect("decode");

        assert!(!ok.is_failure());
        assert!(!bare.is_failure());
        assert!(failed.is_failure());
    }
}
