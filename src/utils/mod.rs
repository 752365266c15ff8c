pub mod date_format;
pub mod serde_helpers;
