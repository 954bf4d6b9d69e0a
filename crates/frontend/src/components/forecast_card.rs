use dioxus::prelude::*;
use wxmap_shared::forecast::CardSummary;

/// Stagger between consecutive card reveals.
const REVEAL_STEP_SECS: f64 = 0.05;
/// Cards past this index share the last delay.
const MAX_STAGGERED: usize = 12;

fn reveal_delay(index: usize) -> f64 {
    index.min(MAX_STAGGERED) as f64 * REVEAL_STEP_SECS
}

fn format_visibility(km: Option<f64>) -> String {
    match km {
        Some(km) => format!("{} km", km),
        None => "–".to_string(),
    }
}

#[component]
pub fn ForecastCard(card: CardSummary, index: usize) -> Element {
    let delay = reveal_delay(index);
    let visibility = format_visibility(card.visibility_km);

    rsx! {
        div {
            class: "forecast-card",
            style: "animation-delay: {delay}s;",

            div { class: "forecast-card-header",
                div {
                    div { class: "forecast-date", "{card.date}" }
                    div { class: "forecast-time", "{card.time}" }
                }
                span { class: "forecast-pod", "{card.part_of_day_icon}" }
            }

            div { class: "forecast-main",
                span { class: "forecast-icon", "{card.condition_icon}" }
                div {
                    div { class: "forecast-temp", "{card.temp}°C" }
                    div { class: "forecast-description", "{card.description}" }
                }
            }

            div { class: "forecast-feels", "Feels like {card.feels_like}°C" }

            div { class: "forecast-stats",
                div { span { "Min" } strong { "{card.temp_min}°C" } }
                div { span { "Max" } strong { "{card.temp_max}°C" } }
                div { span { "Humidity" } strong { "{card.humidity}%" } }
                div { span { "Clouds" } strong { "{card.clouds}%" } }
                div { span { "Wind" } strong { "{card.wind_speed} m/s" } }
                div { span { "Visibility" } strong { "{visibility}" } }
            }
        }
    }
}
