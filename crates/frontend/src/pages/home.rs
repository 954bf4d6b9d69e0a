use dioxus::logger::tracing::info;
use dioxus::prelude::*;
use wxmap_shared::models::{Coordinates, Place, ViewState};

use crate::components::forecast_panel::ForecastPanel;
use crate::components::map_view::MapView;
use crate::components::place_search::PlaceSearch;
use crate::config::AppConfig;
use crate::forecast_query::ForecastCache;
use crate::locale;

/// Where the marker and forecast go, if a usable place is selected.
pub fn selected_coordinates(place: Option<&Place>) -> Option<Coordinates> {
    place.and_then(Place::coordinates)
}

/// Viewport after a selection: focused on the place, or unchanged if it has
/// no usable coordinates.
pub fn view_after_selection(current: ViewState, place: Option<&Place>) -> ViewState {
    match selected_coordinates(place) {
        Some(coords) => ViewState::focused_on(coords),
        None => current,
    }
}

/// Composition root: map, search box and forecast panel around one viewport
/// and one selected place.
#[component]
pub fn WeatherMap(config: AppConfig) -> Element {
    let mut view_state = use_signal(ViewState::default);
    let mut selected_place = use_signal(|| None::<Place>);
    let lang = use_hook(locale::browser_language);

    use_context_provider(ForecastCache::shared);

    // Recenter whenever a new place is chosen; later gestures win until the next one.
    use_effect(move || {
        let place = selected_place.read();
        if place.is_some() {
            let next = view_after_selection(*view_state.peek(), place.as_ref());
            view_state.set(next);
        }
    });

    let coords = selected_coordinates(selected_place.read().as_ref());

    rsx! {
        div { class: "app",
            MapView {
                view_state,
                marker: coords,
                tile_url_template: config.tile_url_template.clone(),
            }

            div { class: "search-overlay",
                PlaceSearch {
                    api_key: config.geoapify_api_key.clone(),
                    lang,
                    on_select: move |place: Place| {
                        info!(label = %place.label(), "place selected");
                        selected_place.set(Some(place));
                    },
                }
            }

            if let Some(coords) = coords {
                div { class: "forecast-overlay",
                    ForecastPanel { coordinates: coords }
                }
            }
        }
    }
}
