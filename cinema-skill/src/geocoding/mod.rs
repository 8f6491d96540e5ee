mod api;
mod provider;

pub use api::GeocoderClient;
pub use provider::LocationResolver;
