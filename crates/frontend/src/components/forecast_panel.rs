use dioxus::prelude::*;
use wxmap_shared::forecast::{summarize, CardSummary};
use wxmap_shared::models::{Coordinates, ForecastResponse};

use crate::components::forecast_card::ForecastCard;
use crate::forecast_query::{use_forecast, ForecastState};

/// Cards to render; only a loaded forecast has any.
fn panel_cards(state: &ForecastState) -> Vec<CardSummary> {
    match state {
        ForecastState::Ready(response) => summarize(response),
        ForecastState::Pending | ForecastState::Failed => Vec::new(),
    }
}

/// The error view stands alone; loading and loaded views sit under the heading.
fn shows_heading(state: &ForecastState) -> bool {
    !matches!(state, ForecastState::Failed)
}

fn location_caption(response: &ForecastResponse) -> Option<String> {
    let city = response.city.as_ref()?;
    if city.name.is_empty() {
        return None;
    }
    Some(match &city.country {
        Some(country) if !country.is_empty() => format!("{}, {}", city.name, country),
        _ => city.name.clone(),
    })
}

#[component]
pub fn ForecastPanel(coordinates: ReadSignal<Coordinates>) -> Element {
    let forecast = use_forecast(coordinates);
    let state = ForecastState::from_resource(
        *coordinates.read(),
        forecast.state().cloned(),
        forecast.read().as_ref(),
    );
    let cards = panel_cards(&state);

    rsx! {
        section { class: "forecast-panel",
            if shows_heading(&state) {
                h2 { class: "forecast-heading", "Weather Predictions" }
            }
            {match &state {
                ForecastState::Pending => rsx! {
                    div { class: "forecast-status",
                        div { class: "spinner" }
                        p { class: "forecast-status-title", "Loading weather data..." }
                        p { class: "forecast-status-detail", "Please wait while we fetch the latest predictions" }
                    }
                },
                ForecastState::Failed => rsx! {
                    div { class: "forecast-status forecast-error",
                        div { class: "forecast-error-icon", "⚠️" }
                        p { class: "forecast-status-title", "Unable to Load Weather Data" }
                        p { class: "forecast-status-detail",
                            "We couldn't fetch the weather information. Please check your connection and try again."
                        }
                    }
                },
                ForecastState::Ready(response) => rsx! {
                    if let Some(caption) = location_caption(response) {
                        p { class: "forecast-location", "{caption}" }
                    }
                    div { class: "forecast-cards",
                        for (index, card) in cards.into_iter().enumerate() {
                            ForecastCard { key: "{index}", card, index }
                        }
                    }
                },
            }}
        }
    }
}
