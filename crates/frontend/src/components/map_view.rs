use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;
use wxmap_shared::models::{Coordinates, ViewState};
use wxmap_shared::tiles::{self, TilePlacement};

use crate::coords;

const MAP_CONTAINER_ID: &str = "weather-map-container";

const PIN_ICON: Asset = asset!("/assets/location-pin.svg");

/// Drag threshold in pixels; movement below this is treated as a click.
const DRAG_THRESHOLD: f64 = 3.0;

/// Touch drag threshold, larger than the mouse one.
const TOUCH_DRAG_THRESHOLD: f64 = 8.0;

/// Zoom change per wheel notch, in zoom levels.
const WHEEL_ZOOM_STEP: f64 = 0.5;

/// Zoom change for the +/- buttons and double-click.
const BUTTON_ZOOM_STEP: f64 = 1.0;

const ATTRIBUTION: &str = "© OpenStreetMap contributors | Powered by Geoapify";

// ---------------------------------------------------------------------------
// Pure helpers
// ---------------------------------------------------------------------------

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

/// Zoom level after one wheel event; scrolling up zooms in.
fn wheel_zoom_target(zoom: f64, delta_y: f64) -> f64 {
    if delta_y < 0.0 {
        zoom + WHEEL_ZOOM_STEP
    } else if delta_y > 0.0 {
        zoom - WHEEL_ZOOM_STEP
    } else {
        zoom
    }
}

/// Zoom level for a pinch that changed finger distance from `start_distance` to `distance`.
fn pinch_zoom_target(start_zoom: f64, start_distance: f64, distance: f64) -> f64 {
    if start_distance < 1.0 || distance < 1.0 {
        return start_zoom;
    }
    start_zoom + (distance / start_distance).log2()
}

/// Zoom about the viewport center, as the navigation buttons do.
fn step_zoom(view: ViewState, delta: f64) -> ViewState {
    ViewState {
        zoom: view.zoom + delta,
        ..view
    }
    .normalized()
}

/// Screen position for the marker, if there is one and the viewport has a size.
fn marker_screen_position(
    view: &ViewState,
    marker: Option<Coordinates>,
    size: (f64, f64),
) -> Option<(f64, f64)> {
    let coords = marker?;
    if size.0 <= 0.0 || size.1 <= 0.0 {
        return None;
    }
    Some(tiles::to_screen(view, coords, size.0, size.1))
}

fn tile_style(tile: &TilePlacement) -> String {
    format!(
        "left: {}px; top: {}px; width: {}px; height: {}px;",
        tile.left, tile.top, tile.size, tile.size
    )
}

fn tile_key(tile: &TilePlacement) -> String {
    // The same tile can appear twice when the world wraps.
    format!("{}/{}/{}@{}", tile.z, tile.x, tile.y, tile.left.round() as i64)
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// Raster slippy map. User gestures are written back into `view_state`.
#[component]
pub fn MapView(
    view_state: Signal<ViewState>,
    #[props(!optional)]
    marker: Option<Coordinates>,
    tile_url_template: String,
) -> Element {
    let mut view_state = view_state;
    let mut viewport = use_signal(|| (0.0_f64, 0.0_f64));

    // Drag state (mouse)
    let mut is_dragging = use_signal(|| false);
    let mut did_drag = use_signal(|| false);
    let mut drag_start = use_signal(|| (0.0_f64, 0.0_f64));
    let mut drag_start_view = use_signal(ViewState::default);

    // Touch state
    let mut touch_start_pos = use_signal(|| None::<(f64, f64)>);
    let mut touch_did_pan = use_signal(|| false);
    let mut touch_start_view = use_signal(ViewState::default);
    let mut is_pinching = use_signal(|| false);
    let mut pinch_start_distance = use_signal(|| 0.0_f64);
    let mut pinch_start_view = use_signal(ViewState::default);
    let mut pinch_midpoint = use_signal(|| (0.0_f64, 0.0_f64));

    let mut measure = move || {
        if let Some(size) = coords::element_size(MAP_CONTAINER_ID) {
            viewport.set(size);
        }
    };

    let view = *view_state.read();
    let size = *viewport.read();
    let tile_imgs: Vec<(String, String, String)> = tiles::visible_tiles(&view, size.0, size.1)
        .iter()
        .map(|t| {
            (
                tile_key(t),
                tiles::tile_url(&tile_url_template, t.z, t.x, t.y),
                tile_style(t),
            )
        })
        .collect();
    let marker_pos = marker_screen_position(&view, marker, size);

    let container_class = if *is_dragging.read() && *did_drag.read() {
        "map-container dragging"
    } else {
        "map-container"
    };

    rsx! {
        div {
            id: MAP_CONTAINER_ID,
            class: "{container_class}",

            onmounted: move |_| measure(),
            onresize: move |_| measure(),

            onwheel: move |evt: Event<WheelData>| {
                evt.prevent_default();
                let delta_y = wheel_delta_y(evt.data().delta());
                let client = evt.data().client_coordinates();
                let Some((cx, cy)) = coords::client_to_element(client.x, client.y, MAP_CONTAINER_ID) else {
                    return;
                };
                let (w, h) = *viewport.read();
                let current = *view_state.read();
                let target = wheel_zoom_target(current.zoom, delta_y);
                if (target - current.zoom).abs() < 1e-9 {
                    return;
                }
                view_state.set(tiles::zoom_at(&current, target, cx, cy, w, h));
            },

            onmousedown: move |evt: Event<MouseData>| {
                if evt.trigger_button() != Some(MouseButton::Primary) {
                    return;
                }
                let client = evt.client_coordinates();
                is_dragging.set(true);
                did_drag.set(false);
                drag_start.set((client.x, client.y));
                drag_start_view.set(*view_state.read());
            },

            onmousemove: move |evt: Event<MouseData>| {
                if !*is_dragging.read() {
                    return;
                }
                let client = evt.client_coordinates();
                let (sx, sy) = *drag_start.read();
                let dx = client.x - sx;
                let dy = client.y - sy;

                if !*did_drag.read() && (dx.abs() > DRAG_THRESHOLD || dy.abs() > DRAG_THRESHOLD) {
                    did_drag.set(true);
                }
                if *did_drag.read() {
                    let start = *drag_start_view.read();
                    view_state.set(tiles::pan_by(&start, dx, dy));
                }
            },

            onmouseup: move |_| {
                is_dragging.set(false);
            },

            onmouseleave: move |_| {
                is_dragging.set(false);
            },

            ondoubleclick: move |evt: Event<MouseData>| {
                evt.prevent_default();
                let client = evt.client_coordinates();
                let Some((cx, cy)) = coords::client_to_element(client.x, client.y, MAP_CONTAINER_ID) else {
                    return;
                };
                let (w, h) = *viewport.read();
                let current = *view_state.read();
                view_state.set(tiles::zoom_at(&current, current.zoom + BUTTON_ZOOM_STEP, cx, cy, w, h));
            },

            // --- Touch event handlers ---

            ontouchstart: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let touches = evt.data().touches();
                if touches.len() == 1 {
                    let t = &touches[0];
                    touch_start_pos.set(Some((t.client_coordinates().x, t.client_coordinates().y)));
                    touch_did_pan.set(false);
                    touch_start_view.set(*view_state.read());
                } else if touches.len() >= 2 {
                    let t0 = &touches[0];
                    let t1 = &touches[1];
                    let p0 = (t0.client_coordinates().x, t0.client_coordinates().y);
                    let p1 = (t1.client_coordinates().x, t1.client_coordinates().y);
                    is_pinching.set(true);
                    pinch_start_distance.set(coords::point_distance(p0, p1));
                    pinch_start_view.set(*view_state.read());
                    pinch_midpoint.set(coords::midpoint(p0, p1));
                    touch_start_pos.set(None);
                    touch_did_pan.set(true);
                }
            },

            ontouchmove: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let touches = evt.data().touches();

                if *is_pinching.read() && touches.len() >= 2 {
                    let t0 = &touches[0];
                    let t1 = &touches[1];
                    let p0 = (t0.client_coordinates().x, t0.client_coordinates().y);
                    let p1 = (t1.client_coordinates().x, t1.client_coordinates().y);
                    let start = *pinch_start_view.read();
                    let target = pinch_zoom_target(
                        start.zoom,
                        *pinch_start_distance.read(),
                        coords::point_distance(p0, p1),
                    );
                    let (mx, my) = *pinch_midpoint.read();
                    let Some((cx, cy)) = coords::client_to_element(mx, my, MAP_CONTAINER_ID) else {
                        return;
                    };
                    let (w, h) = *viewport.read();
                    view_state.set(tiles::zoom_at(&start, target, cx, cy, w, h));
                } else if touches.len() == 1 {
                    let t = &touches[0];
                    let cur = (t.client_coordinates().x, t.client_coordinates().y);
                    if let Some(start) = *touch_start_pos.read() {
                        if !*touch_did_pan.read() && coords::point_distance(start, cur) > TOUCH_DRAG_THRESHOLD {
                            touch_did_pan.set(true);
                        }
                        if *touch_did_pan.read() {
                            let start_view = *touch_start_view.read();
                            view_state.set(tiles::pan_by(&start_view, cur.0 - start.0, cur.1 - start.1));
                        }
                    }
                }
            },

            ontouchend: move |evt: Event<TouchData>| {
                evt.prevent_default();
                if evt.data().touches().is_empty() {
                    is_pinching.set(false);
                    touch_start_pos.set(None);
                }
            },

            ontouchcancel: move |_evt: Event<TouchData>| {
                touch_start_pos.set(None);
                touch_did_pan.set(false);
                is_pinching.set(false);
            },

            div { class: "map-tiles",
                for (key, src, style) in tile_imgs {
                    img {
                        key: "{key}",
                        class: "map-tile",
                        src: "{src}",
                        style: "{style}",
                        alt: "",
                        draggable: "false",
                    }
                }
            }

            if let Some((x, y)) = marker_pos {
                img {
                    class: "map-marker",
                    src: PIN_ICON,
                    alt: "Selected location",
                    draggable: "false",
                    style: "left: {x}px; top: {y}px;",
                }
            }

            // Navigation control; stops events so clicks don't start a drag.
            div {
                class: "map-nav",
                onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
                ondoubleclick: move |evt: Event<MouseData>| evt.stop_propagation(),
                button {
                    title: "Zoom in",
                    onclick: move |_| {
                        let current = *view_state.read();
                        view_state.set(step_zoom(current, BUTTON_ZOOM_STEP));
                    },
                    "+"
                }
                button {
                    title: "Zoom out",
                    onclick: move |_| {
                        let current = *view_state.read();
                        view_state.set(step_zoom(current, -BUTTON_ZOOM_STEP));
                    },
                    "−"
                }
            }

            div { class: "map-attribution", "{ATTRIBUTION}" }
        }
    }
}
