use dioxus::logger::tracing::warn;
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use wxmap_shared::models::Place;

use crate::api;
use crate::coords;

const SEARCH_INPUT_ID: &str = "place-search-input";
const PLACEHOLDER: &str = "Enter location here";

/// Wait after the last keystroke before asking the geocoder.
const DEBOUNCE_MS: u32 = 300;

/// Shorter input clears the suggestion list instead of querying.
pub const MIN_QUERY_CHARS: usize = 3;

pub fn should_query(text: &str) -> bool {
    text.trim().chars().count() >= MIN_QUERY_CHARS
}

/// Next highlighted row when pressing down (`forward`) or up, wrapping at both ends.
pub fn move_highlight(current: Option<usize>, len: usize, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match (current, forward) {
        (None, true) => 0,
        (None, false) => len - 1,
        (Some(i), true) => (i + 1) % len,
        (Some(0), false) => len - 1,
        (Some(i), false) => (i - 1).min(len - 1),
    })
}

/// Primary and secondary line for a suggestion row.
fn suggestion_lines(place: &Place) -> (String, Option<String>) {
    let p = &place.properties;
    match (&p.address_line1, &p.address_line2) {
        (Some(first), second) => (first.clone(), second.clone()),
        (None, _) => (place.label(), None),
    }
}

/// Text input with geocoder suggestions. Arrow keys move the highlight,
/// Enter or a click selects, Escape closes the list.
#[component]
pub fn PlaceSearch(api_key: String, lang: String, on_select: EventHandler<Place>) -> Element {
    let mut query = use_signal(String::new);
    let mut suggestions = use_signal(Vec::<Place>::new);
    let mut highlighted = use_signal(|| None::<usize>);
    let mut open = use_signal(|| false);
    // Label written into the input by the last selection; not re-queried.
    let mut selected_label = use_signal(|| None::<String>);

    // Restarts on every keystroke, dropping the pending request.
    let _suggest = use_resource(move || {
        let text = query.read().clone();
        let api_key = api_key.clone();
        let lang = lang.clone();
        async move {
            let just_selected = selected_label.peek().as_deref() == Some(text.as_str());
            if just_selected || !should_query(&text) {
                suggestions.set(Vec::new());
                highlighted.set(None);
                return;
            }

            TimeoutFuture::new(DEBOUNCE_MS).await;

            match api::autocomplete(text.trim(), &lang, &api_key).await {
                Ok(places) => suggestions.set(places),
                Err(e) => {
                    warn!(error = %e, "place suggestions failed");
                    suggestions.set(Vec::new());
                }
            }
            highlighted.set(None);
        }
    });

    let mut select = move |place: Place| {
        let label = place.label();
        selected_label.set(Some(label.clone()));
        query.set(label);
        suggestions.set(Vec::new());
        highlighted.set(None);
        open.set(false);
        coords::blur_element(SEARCH_INPUT_ID);
        on_select.call(place);
    };

    let rows: Vec<(usize, Place, String, Option<String>)> = suggestions
        .read()
        .iter()
        .enumerate()
        .map(|(i, place)| {
            let (primary, secondary) = suggestion_lines(place);
            (i, place.clone(), primary, secondary)
        })
        .collect();
    let show_list = *open.read() && !rows.is_empty();
    let current = *highlighted.read();

    rsx! {
        div { class: "place-search",
            input {
                id: SEARCH_INPUT_ID,
                r#type: "text",
                autocomplete: "off",
                placeholder: PLACEHOLDER,
                value: "{query}",
                oninput: move |evt: Event<FormData>| {
                    selected_label.set(None);
                    query.set(evt.value());
                    open.set(true);
                },
                onfocus: move |_| open.set(true),
                onblur: move |_| open.set(false),
                onkeydown: move |evt: Event<KeyboardData>| {
                    let len = suggestions.read().len();
                    match evt.key() {
                        Key::ArrowDown => {
                            evt.prevent_default();
                            open.set(true);
                            let next = move_highlight(*highlighted.read(), len, true);
                            highlighted.set(next);
                        }
                        Key::ArrowUp => {
                            evt.prevent_default();
                            open.set(true);
                            let next = move_highlight(*highlighted.read(), len, false);
                            highlighted.set(next);
                        }
                        Key::Enter => {
                            let index = *highlighted.read();
                            let chosen = index.and_then(|i| suggestions.read().get(i).cloned());
                            if let Some(place) = chosen {
                                evt.prevent_default();
                                select(place);
                            }
                        }
                        Key::Escape => {
                            open.set(false);
                            highlighted.set(None);
                        }
                        _ => {}
                    }
                },
            }

            if !query.read().is_empty() {
                button {
                    class: "place-search-clear",
                    title: "Clear",
                    onclick: move |_| {
                        selected_label.set(None);
                        query.set(String::new());
                    },
                    "×"
                }
            }

            if show_list {
                ul { class: "place-suggestions",
                    for (i, place, primary, secondary) in rows {
                        li {
                            key: "{i}",
                            class: if current == Some(i) { "suggestion active" } else { "suggestion" },
                            // mousedown fires before the input's blur closes the list
                            onmousedown: move |evt: Event<MouseData>| {
                                evt.prevent_default();
                                select(place.clone());
                            },
                            onmouseenter: move |_| highlighted.set(Some(i)),
                            span { class: "suggestion-main", "{primary}" }
                            if let Some(secondary) = secondary {
                                span { class: "suggestion-secondary", "{secondary}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
