pub mod forecast_card;
pub mod forecast_panel;
pub mod map_view;
pub mod place_search;
