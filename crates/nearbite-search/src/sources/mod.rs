//! Concrete candidate sources.

mod apple_maps;
mod http;
mod yelp;

pub use apple_maps::{infer_price_tier, AppleMapsSource};
pub use yelp::YelpSource;
