/// Raster tile endpoint; `{key}` is filled in once at startup.
pub const TILE_URL_TEMPLATE: &str =
    "https://maps.geoapify.com/v1/tile/osm-liberty/{z}/{x}/{y}.png?apiKey={key}";

/// Values baked in at build time and handed down from `App`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub geoapify_api_key: String,
    /// Tile template with the key already substituted; still carries `{z}/{x}/{y}`.
    pub tile_url_template: String,
}

impl AppConfig {
    pub fn from_build_env() -> Self {
        Self::with_key(option_env!("GEOAPIFY_API_KEY"))
    }

    pub fn with_key(key: Option<&str>) -> Self {
        let key = key.map(str::trim).unwrap_or_default().to_string();
        AppConfig {
            tile_url_template: TILE_URL_TEMPLATE.replace("{key}", &key),
            geoapify_api_key: key,
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.geoapify_api_key.is_empty()
    }
}
