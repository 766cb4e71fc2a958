/// Bundled icon file for an OpenWeather condition code (`01d` … `50n`).
pub fn icon_path(code: &str) -> Option<&'static str> {
    let path = match code {
        "01d" => "icons/2682848_sunny_weather_forecast_day_sun.png",
        "01n" => "icons/2682847_eclipse_forecast_moon_weather_night_space.png",
        "02d" => "icons/2682849_sun_forecast_cloud_day_weather_cloudy.png",
        "02n" | "03n" => "icons/2682846_cloud_cloudy_forecast_weather_night_moon.png",
        "03d" | "04d" | "04n" => "icons/2682850_weather_clouds_cloud_cloudy_forecast.png",
        "09d" => "icons/2682845_cloud_weather_rain_sun_cloudy_forecast.png",
        "09n" => "icons/2682843_weather_snow_rain_cloud_moon_night_forecast.png",
        "10d" => "icons/2682835_precipitation_weather_forecast_cloudy_rainy_cloud_rain.png",
        "10n" => "icons/2682833_weather_night_moon_precipitation_cloud_forecast_rain.png",
        "11d" => "icons/2682828_thunder_cloud_light bolt_storm_weather_lightning_rain.png",
        "11n" => "icons/2682826_weather_rain_thunderstorm_light_night_bolt_moon.png",
        "13d" => "icons/2682816_snowing_cloudy_forecast_weather_precipitation_cloud_snow.png",
        "13n" => "icons/2682814_snowing_snow_weather_night_precipitation_cloud_moon.png",
        "50d" => "icons/2682821_weather_fog_forecast_mist_foggy.png",
        "50n" => "icons/2682801_mist_moon_cloudy_fog_weather_night_foggy.png",
        _ => return None,
    };
    Some(path)
}

pub const UNKNOWN_GLYPH: &str = "❓";

/// Terminal stand-in for the condition icon.
pub fn glyph(code: &str) -> &'static str {
    match code {
        "01d" => "☀️",
        "01n" => "🌙",
        "02d" => "⛅",
        "02n" | "03d" | "03n" | "04d" | "04n" => "☁️",
        "09d" | "09n" => "🌦️",
        "10d" | "10n" => "🌧️",
        "11d" | "11n" => "⛈️",
        "13d" | "13n" => "🌨️",
        "50d" | "50n" => "🌫️",
        _ => UNKNOWN_GLYPH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_code_has_path_and_glyph() {
        for code in [
            "01d", "01n", "02d", "02n", "03d", "03n", "04d", "04n", "09d", "09n", "10d", "10n",
            "11d", "11n", "13d", "13n", "50d", "50n",
        ] {
            assert!(icon_path(code).is_some(), "{code} has no icon");
            assert_ne!(glyph(code), UNKNOWN_GLYPH, "{code} has no glyph");
        }
    }

    #[test]
    fn unknown_code_falls_back() {
        assert_eq!(icon_path("99x"), None);
        assert_eq!(glyph("99x"), UNKNOWN_GLYPH);
    }
}
