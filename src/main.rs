//! scenic - run scene scripts
//!
//! Loads a RON scene script, queues its commands, and runs them.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;

use scenic::config::AppConfig;
use scenic::scenic_core::PluginRegistry;
use scenic::scenic_render::{FlatBackend, RenderBackend};
use scenic::{Executor, SceneInterface, SceneScript};

/// Run a scene script
#[derive(Parser, Debug)]
#[command(name = "scenic", version, about)]
struct Args {
    /// Scene script (RON); defaults to `script.path` from the configuration
    script: Option<PathBuf>,

    /// Directory holding default.toml and user.toml
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,

    /// Print the queued commands before running
    #[arg(long)]
    print: bool,

    /// Print the scene graph after running
    #[arg(long)]
    dump: bool,
}

fn create_backend(config: &AppConfig) -> Result<Box<dyn RenderBackend>> {
    match config.rendering.backend.as_str() {
        "flat" => Ok(Box::new(FlatBackend::new(config.rendering.background_color))),
        other => bail!("Unknown render backend: '{}'", other),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logging needs the configured level, so load config first
    let loaded = AppConfig::load_from(&args.config_dir);
    let level = loaded
        .as_ref()
        .map(|c| c.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    let script_path = match args.script.clone().or_else(|| config.script.path.clone().map(PathBuf::from)) {
        Some(path) => path,
        None => bail!("No scene script given and script.path is not configured"),
    };
    let script = SceneScript::load(&script_path)
        .with_context(|| format!("Failed to load script {}", script_path.display()))?;
    log::info!("Loaded script '{}' ({} commands)", script.name, script.commands.len());

    let asset_dir = match &config.script.asset_dir {
        Some(dir) => PathBuf::from(dir),
        None => script_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    let executor = Executor::with_plugins(PluginRegistry::default(), create_backend(&config)?)
        .with_asset_dir(asset_dir)
        .with_output_dir(&config.output.directory);

    let mut si = SceneInterface::new(executor);
    for plugin in &config.plugins.preload {
        si.load_plugin(plugin);
    }
    si.queue_script(&script);

    if args.print || config.debug.print_commands {
        print!("{}", si.print());
    }

    let report = si
        .run()
        .with_context(|| format!("Script '{}' failed", script.name))?;
    log::info!(
        "Finished '{}': {} commands, {} render(s) in {:.2?}",
        script.name,
        report.applied,
        report.renders,
        report.elapsed
    );

    if args.dump || config.debug.dump_graph {
        print!("{}", si.snapshot());
    }
    Ok(())
}
