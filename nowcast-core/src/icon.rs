//! Mapping from provider condition codes to icon identifiers.
//!
//! Codes are WeatherAPI.com condition codes:
//! https://www.weatherapi.com/docs/weather_conditions.json

use std::fmt;

/// Closed set of icons the display can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    SunMax,
    SunAndHorizon,
    Moon,
    CloudSunBolt,
    CloudMoonBolt,
    Cloud,
    CloudMoon,
    CloudFog,
    CloudDrizzle,
    CloudHeavyRain,
    CloudSnow,
    CloudBoltRain,
}

impl Icon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Icon::SunMax => "sun.max",
            Icon::SunAndHorizon => "sun.and.horizon",
            Icon::Moon => "moon",
            Icon::CloudSunBolt => "cloud.sun.bolt",
            Icon::CloudMoonBolt => "cloud.moon.bolt",
            Icon::Cloud => "cloud",
            Icon::CloudMoon => "cloud.moon",
            Icon::CloudFog => "cloud.fog",
            Icon::CloudDrizzle => "cloud.drizzle",
            Icon::CloudHeavyRain => "cloud.heavyrain",
            Icon::CloudSnow => "cloud.snow",
            Icon::CloudBoltRain => "cloud.bolt.rain",
        }
    }

    /// Terminal glyph used by the CLI renderer.
    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::SunMax => "☀️",
            Icon::SunAndHorizon => "🌅",
            Icon::Moon => "🌙",
            Icon::CloudSunBolt => "⛅",
            Icon::CloudMoonBolt => "🌩️",
            Icon::Cloud | Icon::CloudMoon => "☁️",
            Icon::CloudFog => "🌫️",
            Icon::CloudDrizzle => "🌦️",
            Icon::CloudHeavyRain => "🌧️",
            Icon::CloudSnow => "🌨️",
            Icon::CloudBoltRain => "⛈️",
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the icon for a condition. Total: unmatched codes fall back to [`Icon::Cloud`].
pub fn classify(code: i32, condition_text: &str, is_daytime: bool) -> Icon {
    match code {
        1000 if !is_daytime => Icon::Moon,
        1000 if condition_text.eq_ignore_ascii_case("sunny") => Icon::SunMax,
        1000 => Icon::SunAndHorizon,
        1003 | 1006 if is_daytime => Icon::CloudSunBolt,
        1003 | 1006 => Icon::CloudMoonBolt,
        1009 if is_daytime => Icon::Cloud,
        1009 => Icon::CloudMoon,
        1030 | 1135 | 1147 => Icon::CloudFog,
        1063 | 1150..=1189 => Icon::CloudDrizzle,
        1192..=1201 => Icon::CloudHeavyRain,
        1210..=1216 => Icon::CloudSnow,
        1273..=1276 => Icon::CloudBoltRain,
        _ => Icon::Cloud,
    }
}
