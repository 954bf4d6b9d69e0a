//! Web-Mercator slippy-map math.
//!
//! World pixel coordinates grow east (x) and south (y); the whole world spans
//! `TILE_SIZE * 2^zoom` pixels on each axis, using the continuous zoom so
//! fractional zoom levels scale tiles smoothly.

use std::f64::consts::PI;

use crate::models::{Coordinates, ViewState};

/// Square raster tile edge in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Highest zoom level tile servers provide.
pub const MAX_TILE_ZOOM: u8 = 19;

/// Side length of the world in pixels at `zoom`.
pub fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * 2.0_f64.powf(zoom)
}

/// Project a geographic point to world pixels at `zoom`.
pub fn project(coords: Coordinates, zoom: f64) -> (f64, f64) {
    let size = world_size(zoom);
    let x = (coords.longitude + 180.0) / 360.0 * size;
    let lat_rad = coords.latitude.to_radians();
    let y = (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * size;
    (x, y)
}

/// Inverse of [`project`].
pub fn unproject(world_x: f64, world_y: f64, zoom: f64) -> Coordinates {
    let size = world_size(zoom);
    let longitude = world_x / size * 360.0 - 180.0;
    let latitude = (PI * (1.0 - 2.0 * world_y / size)).sinh().atan().to_degrees();
    Coordinates::new(latitude, longitude)
}

/// Position of `coords` relative to the top-left of a `width`×`height` viewport.
pub fn to_screen(view: &ViewState, coords: Coordinates, width: f64, height: f64) -> (f64, f64) {
    let (cx, cy) = project(view.center(), view.zoom);
    let (px, py) = project(coords, view.zoom);
    let size = world_size(view.zoom);
    // Take the copy of the point nearest the center so markers survive the antimeridian.
    let mut dx = px - cx;
    if dx > size / 2.0 {
        dx -= size;
    } else if dx < -size / 2.0 {
        dx += size;
    }
    (width / 2.0 + dx, height / 2.0 + (py - cy))
}

/// Geographic point under a viewport pixel.
pub fn from_screen(view: &ViewState, x: f64, y: f64, width: f64, height: f64) -> Coordinates {
    let (cx, cy) = project(view.center(), view.zoom);
    unproject(
        cx + (x - width / 2.0),
        cy + (y - height / 2.0),
        view.zoom,
    )
}

/// Move the view by a screen-space drag of `(dx, dy)` pixels.
///
/// Dragging right moves the map content right, so the center moves west.
pub fn pan_by(view: &ViewState, dx: f64, dy: f64) -> ViewState {
    let (cx, cy) = project(view.center(), view.zoom);
    let center = unproject(cx - dx, cy - dy, view.zoom);
    ViewState {
        longitude: center.longitude,
        latitude: center.latitude,
        zoom: view.zoom,
    }
    .normalized()
}

/// Change zoom to `new_zoom` keeping the geographic point under the cursor
/// `(x, y)` fixed on screen.
pub fn zoom_at(
    view: &ViewState,
    new_zoom: f64,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> ViewState {
    let new_zoom = new_zoom.clamp(crate::models::MIN_ZOOM, crate::models::MAX_ZOOM);
    let anchor = from_screen(view, x, y, width, height);
    let (ax, ay) = project(anchor, new_zoom);
    let center = unproject(ax - (x - width / 2.0), ay - (y - height / 2.0), new_zoom);
    ViewState {
        longitude: center.longitude,
        latitude: center.latitude,
        zoom: new_zoom,
    }
    .normalized()
}

/// One tile to draw: its address and where its top-left corner lands on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePlacement {
    pub z: u8,
    pub x: u32,
    pub y: u32,
    pub left: f64,
    pub top: f64,
    pub size: f64,
}

/// Integer tile zoom used to draw the view.
pub fn tile_zoom(zoom: f64) -> u8 {
    (zoom.floor().max(0.0) as u8).min(MAX_TILE_ZOOM)
}

/// Tiles covering a `width`×`height` viewport, wrapped horizontally.
pub fn visible_tiles(view: &ViewState, width: f64, height: f64) -> Vec<TilePlacement> {
    if width <= 0.0 || height <= 0.0 {
        return Vec::new();
    }
    let tz = tile_zoom(view.zoom);
    let scale = 2.0_f64.powf(view.zoom - tz as f64);
    let size = TILE_SIZE * scale;
    let count = 1_i64 << tz;

    let (cx, cy) = project(view.center(), view.zoom);
    // World pixel at the viewport's top-left corner.
    let origin_x = cx - width / 2.0;
    let origin_y = cy - height / 2.0;

    let first_col = (origin_x / size).floor() as i64;
    let last_col = ((origin_x + width) / size).floor() as i64;
    let first_row = ((origin_y / size).floor() as i64).max(0);
    let last_row = (((origin_y + height) / size).floor() as i64).min(count - 1);

    let mut tiles = Vec::new();
    for row in first_row..=last_row {
        for col in first_col..=last_col {
            tiles.push(TilePlacement {
                z: tz,
                x: col.rem_euclid(count) as u32,
                y: row as u32,
                left: col as f64 * size - origin_x,
                top: row as f64 * size - origin_y,
                size,
            });
        }
    }
    tiles
}

/// Fill a `{z}/{x}/{y}` tile URL template.
pub fn tile_url(template: &str, z: u8, x: u32, y: u32) -> String {
    template
        .replace("{z}", &z.to_string())
        .replace("{x}", &x.to_string())
        .replace("{y}", &y.to_string())
}
