use log4rs::config::runtime::ConfigErrors;

#[derive(thiserror::Error, Debug)]
pub enum HeroTextErrors {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Error in Graphics: {0}")]
    Graphics(#[from] eframe::Error),
    #[error("Error in config: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Error in TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Error in IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error in log: {0}")]
    LoggingRuntime(#[from] ConfigErrors),
}
