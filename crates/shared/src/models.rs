use serde::{Deserialize, Serialize};

/// Latitude and longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinates {
            latitude,
            longitude,
        }
    }

    /// Finite and inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// World view shown before any place is chosen.
pub const DEFAULT_LONGITUDE: f64 = 108.2772;
pub const DEFAULT_LATITUDE: f64 = 14.0583;
pub const DEFAULT_ZOOM: f64 = 2.0;

/// Zoom applied when the map jumps to a selected place.
pub const FOCUS_ZOOM: f64 = 10.0;

pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 19.0;

/// Web-Mercator latitude limit.
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// Map center and zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            longitude: DEFAULT_LONGITUDE,
            latitude: DEFAULT_LATITUDE,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl ViewState {
    /// Centered exactly on `coords` at the focus zoom.
    pub fn focused_on(coords: Coordinates) -> Self {
        ViewState {
            longitude: coords.longitude,
            latitude: coords.latitude,
            zoom: FOCUS_ZOOM,
        }
    }

    pub fn center(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Clamp zoom and latitude to the renderable range and wrap longitude
    /// into [-180, 180).
    pub fn normalized(self) -> Self {
        let longitude = if (-180.0..180.0).contains(&self.longitude) {
            self.longitude
        } else {
            (self.longitude + 180.0).rem_euclid(360.0) - 180.0
        };
        ViewState {
            longitude,
            latitude: self.latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE),
            zoom: self.zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }
}

/// A geocoding result as returned by the autocomplete service (a GeoJSON feature).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub properties: PlaceProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[f64; 4]>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaceProperties {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub formatted: Option<String>,
    #[serde(default)]
    pub address_line1: Option<String>,
    #[serde(default)]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub result_type: Option<String>,
    #[serde(default)]
    pub place_id: Option<String>,
}

impl Place {
    /// Coordinates of the place, or `None` if they are not usable.
    pub fn coordinates(&self) -> Option<Coordinates> {
        let c = Coordinates::new(self.properties.lat, self.properties.lon);
        c.is_valid().then_some(c)
    }

    /// Text shown in the search input and suggestion list.
    pub fn label(&self) -> String {
        let p = &self.properties;
        p.formatted
            .clone()
            .or_else(|| match (&p.address_line1, &p.address_line2) {
                (Some(a), Some(b)) => Some(format!("{}, {}", a, b)),
                (Some(a), None) => Some(a.clone()),
                _ => None,
            })
            .or_else(|| p.name.clone())
            .unwrap_or_else(|| format!("{:.4}, {:.4}", p.lat, p.lon))
    }
}

/// Autocomplete response body (GeoJSON feature collection).
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceCollection {
    #[serde(default)]
    pub features: Vec<Place>,
}

// --- Forecast schema (5 day / 3 hour provider format) ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub list: Vec<ForecastEntry>,
    #[serde(default)]
    pub city: Option<City>,
}

impl ForecastResponse {
    /// Seconds east of UTC for the forecast location, 0 when unknown.
    pub fn timezone_offset(&self) -> i32 {
        self.city.as_ref().map(|c| c.timezone).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub timezone: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    #[serde(default)]
    pub dt_txt: Option<String>,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub clouds: Clouds,
    #[serde(default)]
    pub wind: Wind,
    #[serde(default)]
    pub visibility: Option<u32>,
    #[serde(default)]
    pub sys: PartOfDay,
}

impl ForecastEntry {
    pub fn condition(&self) -> Option<&Condition> {
        self.weather.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    #[serde(default)]
    pub humidity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub id: u32,
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    #[serde(default)]
    pub all: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub deg: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartOfDay {
    #[serde(default)]
    pub pod: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLACE_JSON: &str = r#"{"type":"Feature","properties":{"lat":21.0,"lon":105.8,"formatted":"Hanoi, Vietnam","address_line1":"Hanoi","address_line2":"Vietnam","city":"Hanoi","country":"Vietnam","result_type":"city","place_id":"51abc"},"geometry":{"type":"Point","coordinates":[105.8,21.0]},"bbox":[105.3,20.5,106.0,21.4]}"#;

    #[test]
    fn test_default_view_is_world_view() {
        let v = ViewState::default();
        assert_eq!(v.longitude, 108.2772);
        assert_eq!(v.latitude, 14.0583);
        assert_eq!(v.zoom, 2.0);
    }

    #[test]
    fn test_focused_on_centers_exactly() {
        let v = ViewState::focused_on(Coordinates::new(21.0, 105.8));
        assert_eq!(v.latitude, 21.0);
        assert_eq!(v.longitude, 105.8);
        assert_eq!(v.zoom, FOCUS_ZOOM);
    }

    #[test]
    fn test_normalized_wraps_longitude_and_clamps() {
        let v = ViewState {
            longitude: 190.0,
            latitude: 89.0,
            zoom: 25.0,
        }
        .normalized();
        assert!((v.longitude - (-170.0)).abs() < 1e-9);
        assert!((v.latitude - MAX_LATITUDE).abs() < 1e-9);
        assert_eq!(v.zoom, MAX_ZOOM);
    }

    #[test]
    fn test_normalized_keeps_valid_view() {
        let v = ViewState::focused_on(Coordinates::new(-33.9, 18.4));
        assert_eq!(v.normalized(), v);
    }

    #[test]
    fn test_place_deserializes_geojson_feature() {
        let place: Place = serde_json::from_str(PLACE_JSON).unwrap();
        assert_eq!(place.properties.lat, 21.0);
        assert_eq!(place.properties.lon, 105.8);
        assert_eq!(place.properties.city.as_deref(), Some("Hanoi"));
        assert_eq!(place.bbox, Some([105.3, 20.5, 106.0, 21.4]));
        assert_eq!(place.coordinates(), Some(Coordinates::new(21.0, 105.8)));
    }

    #[test]
    fn test_place_with_only_coordinates() {
        let place: Place =
            serde_json::from_str(r#"{"properties":{"lat":48.85,"lon":2.35}}"#).unwrap();
        assert!(place.properties.formatted.is_none());
        assert_eq!(place.label(), "48.8500, 2.3500");
    }

    #[test]
    fn test_place_label_prefers_formatted() {
        let place: Place = serde_json::from_str(PLACE_JSON).unwrap();
        assert_eq!(place.label(), "Hanoi, Vietnam");
    }

    #[test]
    fn test_place_label_falls_back_to_address_lines() {
        let mut place: Place = serde_json::from_str(PLACE_JSON).unwrap();
        place.properties.formatted = None;
        place.properties.address_line2 = Some("Northern Vietnam".to_string());
        assert_eq!(place.label(), "Hanoi, Northern Vietnam");
    }

    #[test]
    fn test_place_with_out_of_range_coordinates_has_none() {
        let place = Place {
            properties: PlaceProperties {
                lat: 95.0,
                lon: 10.0,
                ..Default::default()
            },
            bbox: None,
        };
        assert!(place.coordinates().is_none());
    }

    #[test]
    fn test_place_with_nan_coordinates_has_none() {
        let place = Place {
            properties: PlaceProperties {
                lat: f64::NAN,
                lon: 10.0,
                ..Default::default()
            },
            bbox: None,
        };
        assert!(place.coordinates().is_none());
    }

    #[test]
    fn test_place_collection_deserializes() {
        let json = format!(
            r#"{{"type":"FeatureCollection","features":[{}],"query":{{"text":"hanoi"}}}}"#,
            PLACE_JSON
        );
        let coll: PlaceCollection = serde_json::from_str(&json).unwrap();
        assert_eq!(coll.features.len(), 1);
    }

    #[test]
    fn test_forecast_response_deserializes_provider_body() {
        let json = r#"{"cod":"200","message":0,"cnt":1,"list":[{"dt":1760781600,"main":{"temp":27.4,"feels_like":30.1,"temp_min":26.9,"temp_max":27.4,"pressure":1010,"humidity":78},"weather":[{"id":500,"main":"Rain","description":"light rain","icon":"10d"}],"clouds":{"all":75},"wind":{"speed":3.2,"deg":120,"gust":4.1},"visibility":10000,"pop":0.4,"sys":{"pod":"d"},"dt_txt":"2025-10-18 10:00:00"}],"city":{"id":1581130,"name":"Hanoi","coord":{"lat":21.0,"lon":105.8},"country":"VN","timezone":25200}}"#;
        let resp: ForecastResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.list.len(), 1);
        assert_eq!(resp.timezone_offset(), 25200);
        let e = &resp.list[0];
        assert_eq!(e.main.humidity, 78);
        assert_eq!(e.clouds.all, 75);
        assert_eq!(e.visibility, Some(10000));
        assert_eq!(e.sys.pod, "d");
        assert_eq!(e.condition().unwrap().main, "Rain");
    }

    #[test]
    fn test_forecast_entry_tolerates_missing_optional_sections() {
        let json = r#"{"list":[{"dt":0,"main":{"temp":1.0,"feels_like":0.0,"temp_min":1.0,"temp_max":1.0}}]}"#;
        let resp: ForecastResponse = serde_json::from_str(json).unwrap();
        let e = &resp.list[0];
        assert!(e.condition().is_none());
        assert_eq!(e.visibility, None);
        assert_eq!(resp.timezone_offset(), 0);
    }
}
