use serde::de::DeserializeOwned;
use url::Url;
use wxmap_shared::models::{Coordinates, ForecastResponse, Place, PlaceCollection};

const AUTOCOMPLETE_URL: &str = "https://api.geoapify.com/v1/geocode/autocomplete";

/// Suggestions requested per keystroke.
pub const SUGGESTION_LIMIT: u8 = 5;

/// Build the backend forecast URL for `coords` under `origin`.
pub fn build_forecast_url(origin: &str, coords: Coordinates) -> Result<String, String> {
    let lat = coords.latitude.to_string();
    let lon = coords.longitude.to_string();
    Url::parse_with_params(
        &format!("{}/weather", origin.trim_end_matches('/')),
        &[("latitude", lat.as_str()), ("longitude", lon.as_str())],
    )
    .map(String::from)
    .map_err(|e| e.to_string())
}

/// Build the geocoder autocomplete URL.
pub fn build_autocomplete_url(text: &str, lang: &str, api_key: &str) -> Result<String, String> {
    let limit = SUGGESTION_LIMIT.to_string();
    Url::parse_with_params(
        AUTOCOMPLETE_URL,
        &[
            ("text", text),
            ("lang", lang),
            ("limit", limit.as_str()),
            ("apiKey", api_key),
        ],
    )
    .map(String::from)
    .map_err(|e| e.to_string())
}

fn page_origin() -> Result<String, String> {
    // Same origin as the backend that served the page.
    web_sys::window()
        .ok_or_else(|| "no window".to_string())?
        .location()
        .origin()
        .map_err(|_| "page origin unavailable".to_string())
}

async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, String> {
    let resp = reqwest::Client::new()
        .get(url)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let status = resp.status();
    if !status.is_success() {
        return Err(format!("request failed with status {}", status));
    }

    resp.json().await.map_err(|e| e.to_string())
}

pub async fn fetch_forecast(coords: Coordinates) -> Result<ForecastResponse, String> {
    let url = build_forecast_url(&page_origin()?, coords)?;
    get_json(&url).await
}

pub async fn autocomplete(text: &str, lang: &str, api_key: &str) -> Result<Vec<Place>, String> {
    let url = build_autocomplete_url(text, lang, api_key)?;
    let collection: PlaceCollection = get_json(&url).await?;
    Ok(collection.features)
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- URL builders ---

    #[test]
    fn test_build_forecast_url() {
        assert_eq!(
            build_forecast_url("http://localhost:3000", Coordinates::new(21.0, 105.8)).unwrap(),
            "http://localhost:3000/weather?latitude=21&longitude=105.8"
        );
    }

    #[test]
    fn test_build_forecast_url_trailing_slash_and_negative() {
        assert_eq!(
            build_forecast_url("https://wx.example.com/", Coordinates::new(-33.8688, 151.2093))
                .unwrap(),
            "https://wx.example.com/weather?latitude=-33.8688&longitude=151.2093"
        );
    }

    #[test]
    fn test_build_forecast_url_bad_origin() {
        assert!(build_forecast_url("not a url", Coordinates::new(0.0, 0.0)).is_err());
    }

    #[test]
    fn test_build_autocomplete_url() {
        assert_eq!(
            build_autocomplete_url("Hanoi", "vi", "k").unwrap(),
            "https://api.geoapify.com/v1/geocode/autocomplete?text=Hanoi&lang=vi&limit=5&apiKey=k"
        );
    }

    #[test]
    fn test_build_autocomplete_url_encodes_text() {
        let url = build_autocomplete_url("São Paulo & co", "pt", "k").unwrap();
        assert!(url.contains("text=S%C3%A3o+Paulo+%26+co"));
    }

    // --- Response deserialization ---

    #[test]
    fn test_autocomplete_response_deserializes() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {
                    "lat": 21.0285, "lon": 105.8542,
                    "formatted": "Hanoi, Vietnam",
                    "address_line1": "Hanoi", "address_line2": "Vietnam",
                    "city": "Hanoi", "country": "Vietnam",
                    "result_type": "city", "place_id": "51abc"
                },
                "bbox": [105.28, 20.56, 106.02, 21.38]
            }]
        }"#;
        let collection: PlaceCollection = serde_json::from_str(json).unwrap();
        assert_eq!(collection.features.len(), 1);
        assert_eq!(collection.features[0].label(), "Hanoi, Vietnam");
    }

    #[test]
    fn test_forecast_response_deserializes() {
        let json = r#"{"cod":"200","cnt":1,"list":[{"dt":1760781600,"main":{"temp":27.4,"feels_like":30.1,"temp_min":27.0,"temp_max":28.2,"humidity":70},"weather":[{"id":500,"main":"Rain","description":"light rain","icon":"10d"}],"clouds":{"all":75},"wind":{"speed":3.6,"deg":90},"visibility":10000,"sys":{"pod":"d"},"dt_txt":"2025-10-18 10:00:00"}],"city":{"name":"Hanoi","country":"VN","timezone":25200}}"#;
        let resp: ForecastResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.list.len(), 1);
        assert_eq!(resp.timezone_offset(), 25200);
    }
}
