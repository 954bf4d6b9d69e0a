use chrono::{DateTime, FixedOffset};

use crate::models::{ForecastEntry, ForecastResponse};

/// Icon used when the condition is missing or not in the table.
pub const DEFAULT_CONDITION_ICON: &str = "🌤️";

/// Round half up (towards positive infinity), so -2.5 becomes -2.
pub fn round_temp(value: f64) -> i64 {
    let floor = value.floor();
    // Compare the fraction; `value + 0.5` can round up before flooring.
    if value - floor >= 0.5 {
        floor as i64 + 1
    } else {
        floor as i64
    }
}

/// Emoji for a provider condition group such as "Rain" or "Clouds".
pub fn condition_icon(main: Option<&str>) -> &'static str {
    match main {
        Some("Rain") => "🌧️",
        Some("Clear") => "☀️",
        Some("Clouds") => "☁️",
        Some("Snow") => "❄️",
        Some("Thunderstorm") => "⛈️",
        Some("Drizzle") => "🌦️",
        Some("Mist") | Some("Fog") => "🌫️",
        _ => DEFAULT_CONDITION_ICON,
    }
}

/// Sun for daytime entries (`pod == "d"`), moon otherwise.
pub fn part_of_day_icon(pod: &str) -> &'static str {
    if pod == "d" {
        "☀️"
    } else {
        "🌙"
    }
}

/// Entry timestamp shifted into the location's own timezone.
pub fn local_time(dt: i64, offset_secs: i32) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(offset_secs)?;
    DateTime::from_timestamp(dt, 0).map(|utc| utc.with_timezone(&offset))
}

/// e.g. "Sat, Oct 18"
pub fn format_date(dt: i64, offset_secs: i32) -> String {
    local_time(dt, offset_secs)
        .map(|t| t.format("%a, %b %-d").to_string())
        .unwrap_or_default()
}

/// e.g. "03:00 PM"
pub fn format_time(dt: i64, offset_secs: i32) -> String {
    local_time(dt, offset_secs)
        .map(|t| t.format("%I:%M %p").to_string())
        .unwrap_or_default()
}

/// Visibility in kilometres, as shown on a card.
pub fn visibility_km(meters: Option<u32>) -> Option<f64> {
    meters.map(|m| m as f64 / 1000.0)
}

/// Everything a forecast card displays, already formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct CardSummary {
    pub date: String,
    pub time: String,
    pub part_of_day_icon: &'static str,
    pub condition_icon: &'static str,
    pub description: String,
    pub temp: i64,
    pub feels_like: i64,
    pub temp_min: i64,
    pub temp_max: i64,
    pub humidity: u8,
    pub clouds: u8,
    pub wind_speed: f64,
    pub visibility_km: Option<f64>,
}

impl CardSummary {
    pub fn from_entry(entry: &ForecastEntry, offset_secs: i32) -> Self {
        let condition = entry.condition();
        CardSummary {
            date: format_date(entry.dt, offset_secs),
            time: format_time(entry.dt, offset_secs),
            part_of_day_icon: part_of_day_icon(&entry.sys.pod),
            condition_icon: condition_icon(condition.map(|c| c.main.as_str())),
            description: condition.map(|c| c.description.clone()).unwrap_or_default(),
            temp: round_temp(entry.main.temp),
            feels_like: round_temp(entry.main.feels_like),
            temp_min: round_temp(entry.main.temp_min),
            temp_max: round_temp(entry.main.temp_max),
            humidity: entry.main.humidity,
            clouds: entry.clouds.all,
            wind_speed: entry.wind.speed,
            visibility_km: visibility_km(entry.visibility),
        }
    }
}

/// One card per entry, in response order.
pub fn summarize(response: &ForecastResponse) -> Vec<CardSummary> {
    let offset = response.timezone_offset();
    response
        .list
        .iter()
        .map(|e| CardSummary::from_entry(e, offset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Clouds, Condition, MainReadings, PartOfDay, Wind};

    fn entry(dt: i64, temp: f64, main: Option<&str>) -> ForecastEntry {
        ForecastEntry {
            dt,
            dt_txt: None,
            main: MainReadings {
                temp,
                feels_like: temp + 2.5,
                temp_min: temp - 0.4,
                temp_max: temp + 0.6,
                humidity: 70,
            },
            weather: main
                .map(|m| {
                    vec![Condition {
                        id: 800,
                        main: m.to_string(),
                        description: format!("{} sky", m.to_lowercase()),
                        icon: "01d".to_string(),
                    }]
                })
                .unwrap_or_default(),
            clouds: Clouds { all: 40 },
            wind: Wind {
                speed: 3.6,
                deg: Some(90.0),
            },
            visibility: Some(9500),
            sys: PartOfDay {
                pod: "d".to_string(),
            },
        }
    }

    #[test]
    fn test_round_temp_half_up() {
        assert_eq!(round_temp(27.4), 27);
        assert_eq!(round_temp(27.5), 28);
        assert_eq!(round_temp(-2.5), -2);
        assert_eq!(round_temp(-2.6), -3);
        assert_eq!(round_temp(0.0), 0);
    }

    #[test]
    fn test_round_temp_just_below_half() {
        assert_eq!(round_temp(0.49999999999999994), 0);
        assert_eq!(round_temp(-0.49999999999999994), 0);
        assert_eq!(round_temp(-0.5), 0);
        assert_eq!(round_temp(4503599627370495.5), 4503599627370496);
    }

    #[test]
    fn test_condition_icon_table() {
        assert_eq!(condition_icon(Some("Rain")), "🌧️");
        assert_eq!(condition_icon(Some("Clear")), "☀️");
        assert_eq!(condition_icon(Some("Clouds")), "☁️");
        assert_eq!(condition_icon(Some("Snow")), "❄️");
        assert_eq!(condition_icon(Some("Thunderstorm")), "⛈️");
        assert_eq!(condition_icon(Some("Drizzle")), "🌦️");
        assert_eq!(condition_icon(Some("Mist")), "🌫️");
        assert_eq!(condition_icon(Some("Fog")), "🌫️");
    }

    #[test]
    fn test_condition_icon_unmapped_falls_back() {
        assert_eq!(condition_icon(Some("Tornado")), DEFAULT_CONDITION_ICON);
        assert_eq!(condition_icon(Some("rain")), DEFAULT_CONDITION_ICON);
        assert_eq!(condition_icon(None), DEFAULT_CONDITION_ICON);
    }

    #[test]
    fn test_part_of_day_icon() {
        assert_eq!(part_of_day_icon("d"), "☀️");
        assert_eq!(part_of_day_icon("n"), "🌙");
        assert_eq!(part_of_day_icon(""), "🌙");
    }

    #[test]
    fn test_format_date_and_time_utc() {
        assert_eq!(format_date(1760781600, 0), "Sat, Oct 18");
        assert_eq!(format_time(1760781600, 0), "10:00 AM");
    }

    #[test]
    fn test_format_uses_city_offset() {
        // +7h
        assert_eq!(format_time(1760781600, 25200), "05:00 PM");
        // Midnight UTC is the previous evening five hours west.
        assert_eq!(format_date(1760745600, -18000), "Fri, Oct 17");
        assert_eq!(format_time(1760745600, -18000), "07:00 PM");
    }

    #[test]
    fn test_invalid_offset_formats_empty() {
        assert_eq!(format_time(1760781600, 200_000), "");
    }

    #[test]
    fn test_visibility_km() {
        assert_eq!(visibility_km(Some(10000)), Some(10.0));
        assert_eq!(visibility_km(Some(9500)), Some(9.5));
        assert_eq!(visibility_km(None), None);
    }

    #[test]
    fn test_card_summary_rounds_all_temperatures() {
        let card = CardSummary::from_entry(&entry(1760781600, 27.4, Some("Clear")), 0);
        assert_eq!(card.temp, 27);
        assert_eq!(card.feels_like, 30);
        assert_eq!(card.temp_min, 27);
        assert_eq!(card.temp_max, 28);
        assert_eq!(card.condition_icon, "☀️");
        assert_eq!(card.part_of_day_icon, "☀️");
        assert_eq!(card.description, "clear sky");
        assert_eq!(card.humidity, 70);
        assert_eq!(card.clouds, 40);
        assert_eq!(card.visibility_km, Some(9.5));
    }

    #[test]
    fn test_card_summary_without_condition_uses_default_icon() {
        let card = CardSummary::from_entry(&entry(0, 5.0, None), 0);
        assert_eq!(card.condition_icon, DEFAULT_CONDITION_ICON);
        assert!(card.description.is_empty());
    }

    #[test]
    fn test_summarize_one_card_per_entry() {
        let response = ForecastResponse {
            list: vec![
                entry(1760781600, 27.4, Some("Rain")),
                entry(1760792400, 25.0, Some("Clouds")),
                entry(1760803200, 23.0, Some("Volcanic Ash")),
            ],
            city: None,
        };
        let cards = summarize(&response);
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].condition_icon, "🌧️");
        assert_eq!(cards[1].condition_icon, "☁️");
        assert_eq!(cards[2].condition_icon, DEFAULT_CONDITION_ICON);
    }

    #[test]
    fn test_summarize_empty_list() {
        let response = ForecastResponse {
            list: vec![],
            city: None,
        };
        assert!(summarize(&response).is_empty());
    }
}
