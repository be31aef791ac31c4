use eframe::egui::ViewportBuilder;
use herotext::errors::HeroTextErrors;
use herotext::initialize_app;
use herotext::types::settings::SettingsApp;
use std::path::PathBuf;

const CONFIG_FILE: &str = "config.toml";

async fn run() -> Result<(), HeroTextErrors> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    let settings = SettingsApp::load_or_create(&path)?;
    let app = initialize_app(&settings)?;

    let (width, height) = settings.window_size();
    let native_options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_app_id("herotext")
            .with_title("Portfolio")
            .with_inner_size((width, height))
            .with_min_inner_size((width * 0.5, height * 0.5)),
        ..Default::default()
    };

    log::info!("Starting application");
    eframe::run_native(
        "Portfolio",
        native_options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )?;

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{}", err);
        log::error!("error in herotext!: {:?}", err);
        std::process::exit(1);
    }
}
