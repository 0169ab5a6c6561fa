//! Minigame launcher
//!
//! Loads the configuration, fills the registry, seeds the RNG and hands a
//! headless display plus a menu to the session loop.

use std::time::Duration;

use anyhow::{Context, Result};
use minigame_core::config;
use minigame_core::{
    BundleStorage, Config, Display, GameSelector, LoopConfig, MinigameRegistry, ModuleStorage,
    NullInput, SessionLoop, SessionReport,
};

pub mod cli;
pub mod games;
pub mod menu;
pub mod platform;

pub use cli::Args;
use menu::{FixedSelector, TextMenu};
use platform::{FixedFrameDisplay, SystemClockDisplay};

/// Resolve the configuration: file (or defaults), then command line.
pub fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => config::load_from(path)?,
        None => config::load()?,
    };
    args.apply_to(&mut config);

    for warning in config.validate() {
        tracing::warn!("Config: {}", warning);
    }
    Ok(config)
}

/// Build the registry from `--bundle` or the built-in list.
pub fn load_registry(args: &Args) -> Result<MinigameRegistry> {
    let registry = match &args.bundle {
        Some(dir) => {
            let storage = BundleStorage::new(dir, games::entry_table());
            MinigameRegistry::from_storage(&storage)
                .with_context(|| format!("failed to load {}", storage.name()))?
        }
        None => MinigameRegistry::from_storage(&games::builtin())?,
    };

    if registry.is_empty() {
        tracing::warn!("No minigames available");
    }
    Ok(registry)
}

/// Run the launcher. Returns the report of every session played.
pub fn run(args: &Args) -> Result<Vec<SessionReport>> {
    let config = load_config(args)?;
    let registry = load_registry(args)?;

    if args.list {
        for descriptor in registry.descriptors() {
            println!("{}", menu::describe(descriptor));
        }
        return Ok(Vec::new());
    }

    let seed = config.debug.seed.unwrap_or_else(rand::random);
    games::seed_rng(seed);
    tracing::info!("RNG seed: {}", seed);

    let mut selector: Box<dyn GameSelector> = if config.debug.skip_menu {
        tracing::info!(
            "Skipping menu, playing '{}'",
            config.debug.minigame_to_test
        );
        Box::new(FixedSelector::new(
            config.debug.minigame_to_test.clone(),
            args.sessions,
        ))
    } else {
        Box::new(TextMenu::stdio(args.sessions))
    };

    match args.fixed_frame_ms {
        Some(ms) => play(
            FixedFrameDisplay::new(Duration::from_millis(ms)),
            registry,
            &config,
            selector.as_mut(),
        ),
        None => play(
            SystemClockDisplay::new(config.timing.refresh_period()),
            registry,
            &config,
            selector.as_mut(),
        ),
    }
}

fn play<D: Display>(
    display: D,
    registry: MinigameRegistry,
    config: &Config,
    selector: &mut dyn GameSelector,
) -> Result<Vec<SessionReport>> {
    let mut runtime = SessionLoop::with_config(
        display,
        NullInput,
        registry,
        config.session.clone(),
        LoopConfig::from(&config.timing),
    );
    tracing::info!(
        "Session loop ready: {} Hz, {} player(s)",
        runtime.tick_rate(),
        config.session.player_count
    );

    let reports = runtime.run(selector)?;
    for report in &reports {
        tracing::debug!(
            "{}: {} frames, {} ticks, {:.2}s simulated",
            report.minigame,
            report.frames,
            report.ticks,
            report.elapsed.as_secs_f64()
        );
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use minigame_core::RegistryError;

    use super::*;

    fn args(dir: &tempfile::TempDir, extra: &[&str]) -> Args {
        let config = dir.path().join("config.toml");
        let mut argv = vec!["minigames", "--config", config.to_str().unwrap()];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_run_fixed_game_for_n_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(
            &dir,
            &["--game", "pong", "--sessions", "2", "--seed", "11", "--fixed-frame-ms", "16"],
        );

        let reports = run(&args).unwrap();

        assert_eq!(reports.len(), 2);
        for report in &reports {
            assert_eq!(report.minigame, "pong");
            assert_eq!(report.winners.len(), 1);
        }
    }

    #[test]
    fn test_run_unknown_game_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(&dir, &["--game", "pogn", "--sessions", "1", "--fixed-frame-ms", "16"]);

        let err = run(&args).unwrap_err();

        match err.downcast_ref::<RegistryError>() {
            Some(RegistryError::NotFound { suggestions, .. }) => {
                assert_eq!(suggestions, &["pong".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_list_plays_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let reports = run(&args(&dir, &["--list"])).unwrap();
        assert!(reports.is_empty());
    }

    #[test]
    fn test_config_file_is_used() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "[session]\nplayer_count = 2\n\n[debug]\nskip_menu = true\nminigame_to_test = \"pong\"\n",
        )
        .unwrap();

        let config = load_config(&args(&dir, &[])).unwrap();
        assert_eq!(config.session.player_count, 2);
        assert!(config.debug.skip_menu);

        let config = load_config(&args(&dir, &["--players", "4"])).unwrap();
        assert_eq!(config.session.player_count, 4);
    }

    #[test]
    fn test_bundle_registry() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("bundle");
        std::fs::create_dir(&bundle).unwrap();
        std::fs::write(
            bundle.join("pong-classic.toml"),
            "id = \"pong-classic\"\nname = \"Pong Classic\"\nentry = \"pong\"\n",
        )
        .unwrap();

        let registry =
            load_registry(&args(&dir, &["--bundle", bundle.to_str().unwrap()])).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("pong-classic").is_some());
        assert!(registry.get("pong").is_none());
    }

    #[test]
    fn test_missing_bundle_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = load_registry(&args(&dir, &["--bundle", missing.to_str().unwrap()])).unwrap_err();
        assert!(err.downcast_ref::<RegistryError>().is_some());
        assert!(format!("{err:#}").contains("unavailable"));
    }
}
