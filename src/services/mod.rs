pub mod analysis;
pub mod climate_collector;
pub mod notifier;
pub mod price_feed;
pub mod trading;
