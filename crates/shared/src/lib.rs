pub mod forecast;
pub mod models;
pub mod tiles;
