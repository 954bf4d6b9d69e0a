mod api;
mod components;
mod config;
mod coords;
mod forecast_query;
mod locale;
mod pages;

use dioxus::logger::tracing::warn;
use dioxus::prelude::*;

use config::AppConfig;

const CSS: Asset = asset!("/assets/main.css");
const FAVICON: Asset = asset!("/assets/favicon.svg");

#[allow(non_snake_case)]
fn App() -> Element {
    let config = use_hook(|| {
        let config = AppConfig::from_build_env();
        if !config.has_api_key() {
            warn!("GEOAPIFY_API_KEY was not set at build time; map tiles and search will fail");
        }
        config
    });

    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Stylesheet { href: CSS }
        document::Title { "Weather Map" }
        pages::home::WeatherMap { config }
    }
}

fn main() {
    launch(App);
}
