mod config;
mod demo;

use config::AppConfig;
use std::env;
use std::path::PathBuf;

fn main() {
    let args: Vec<String> = env::args().collect();
    let config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from);

    let loaded = config_path.as_ref().map(|path| config::load_config(path));
    let (app_config, load_error) = match loaded {
        Some(Ok(config)) => (config, None),
        Some(Err(err)) => (AppConfig::default(), Some(err)),
        None => (AppConfig::default(), None),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(app_config.log_level.as_str()),
    )
    .init();
    if let (Some(err), Some(path)) = (load_error, config_path.as_ref()) {
        log::error!("failed to load {}: {err}; using defaults", path.display());
    }

    let summary = demo::run(app_config.sync);
    let renders: usize = summary.passes.iter().map(|p| p.renders).sum();
    println!(
        "{} passes, {} pass render(s), {} event render(s), data range [{}, {}]",
        summary.passes.len(),
        renders,
        summary.pumped_renders,
        summary.data_range.min,
        summary.data_range.max
    );
}
