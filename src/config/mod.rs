mod settings;

pub use settings::{DevConfig, ExportSettings, InitSettings, NetworkOverrides};
