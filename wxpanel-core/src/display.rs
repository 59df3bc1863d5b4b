use std::fmt::Debug;

/// The fixed display fields of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Location,
    Temperature,
    Dew,
    Wind,
    Rain,
    Pressure,
}

impl Field {
    /// Element identifier the field is known by.
    pub fn id(&self) -> &'static str {
        match self {
            Field::Location => "location",
            Field::Temperature => "temperature",
            Field::Dew => "dew",
            Field::Wind => "wind",
            Field::Rain => "rain",
            Field::Pressure => "pressure",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Location => "Location",
            Field::Temperature => "Temperature",
            Field::Dew => "Dew point",
            Field::Wind => "Wind",
            Field::Rain => "Rain",
            Field::Pressure => "Pressure",
        }
    }

    pub const fn all() -> &'static [Field] {
        &[
            Field::Location,
            Field::Temperature,
            Field::Dew,
            Field::Wind,
            Field::Rain,
            Field::Pressure,
        ]
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Where the controller writes rendered text. One setter per field.
pub trait DisplaySink {
    fn set_location(&mut self, text: String);
    fn set_temperature(&mut self, text: String);
    fn set_dew(&mut self, text: String);
    fn set_wind(&mut self, text: String);
    fn set_rain(&mut self, text: String);
    fn set_pressure(&mut self, text: String);
}

/// Blocking, user-facing message. Returns once the user has seen it.
pub trait Notifier: Debug {
    fn notify(&mut self, message: &str);
}

/// In-memory sink holding the current text of every field.
///
/// Fields start empty and keep their last written value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Panel {
    location: String,
    temperature: String,
    dew: String,
    wind: String,
    rain: String,
    pressure: String,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Location => &self.location,
            Field::Temperature => &self.temperature,
            Field::Dew => &self.dew,
            Field::Wind => &self.wind,
            Field::Rain => &self.rain,
            Field::Pressure => &self.pressure,
        }
    }

    /// `(field, text)` pairs in display order.
    pub fn rows(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::all().iter().map(move |f| (*f, self.get(*f)))
    }
}

impl DisplaySink for Panel {
    fn set_location(&mut self, text: String) {
        self.location = text;
    }

    fn set_temperature(&mut self, text: String) {
        self.temperature = text;
    }

    fn set_dew(&mut self, text: String) {
        self.dew = text;
    }

    fn set_wind(&mut self, text: String) {
        self.wind = text;
    }

    fn set_rain(&mut self, text: String) {
        self.rain = text;
    }

    fn set_pressure(&mut self, text: String) {
        self.pressure = text;
    }
}
