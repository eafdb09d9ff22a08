//! External API integrations

pub mod crop_lookup;

pub use crop_lookup::CropLookupClient;
