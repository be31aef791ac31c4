use crate::errors::HeroTextErrors;
use crate::gui::app::HeroApp;
use crate::types::settings::SettingsApp;
use log4rs::Config;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;

pub mod errors;
pub mod gui;
pub mod types;
pub mod typing;

const FILE_LOG: &str = "herotext.log";
const LOG_PATTERN: &str = "{d} - {m}{n}";

pub fn initialize_logging(settings: &SettingsApp) -> Result<(), HeroTextErrors> {
    let level = settings.level()?;
    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(FILE_LOG)?;
    let config = Config::builder()
        .appender(Appender::builder().build("logfile", Box::new(logfile)))
        .build(Root::builder().appender("logfile").build(level))?;
    let _ = log4rs::init_config(config);
    Ok(())
}

/// Sets up logging and builds the hero banner. Must run inside a tokio runtime.
pub fn initialize_app(settings: &SettingsApp) -> Result<HeroApp, HeroTextErrors> {
    initialize_logging(settings)?;
    settings.validate()?;
    let app = HeroApp::new(settings)?;
    log::info!("hero banner ready");
    Ok(app)
}
