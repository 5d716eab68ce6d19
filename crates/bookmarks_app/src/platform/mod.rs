//! Terminal front-end: configuration, logging, the message loop and rendering.
mod app;
mod config;
mod effects;
mod logging;
mod ui;

use anyhow::Context;

pub fn run() -> anyhow::Result<()> {
    let path = config::config_path(std::env::args().nth(1));
    let config = config::load_config(&path)
        .with_context(|| format!("loading configuration from {}", path.display()))?;
    logging::initialize(config.log);
    app::run_app(config)
}
