//! Configuration loaded from `heartsync.toml`.

pub mod settings;

pub use settings::Settings;
