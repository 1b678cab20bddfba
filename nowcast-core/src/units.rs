use serde::{Deserialize, Serialize};

/// Temperature unit shown on the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn toggle(&self) -> Self {
        match self {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }
}

pub fn to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Format a canonical Celsius value for display in `unit`, one decimal place.
pub fn to_display(temp_c: f64, unit: TemperatureUnit) -> String {
    let value = match unit {
        TemperatureUnit::Celsius => temp_c,
        TemperatureUnit::Fahrenheit => to_fahrenheit(temp_c),
    };
    format!("{:.1}{}", value, unit.suffix())
}
