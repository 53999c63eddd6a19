use anyhow::Context;
use availability_resolver::config::toml_config::ResolutionConfig;
use availability_resolver::utils::{logger, validation::Validate};
use availability_resolver::{
    preview_slots, AvailabilityError, AvailabilityRequest, AvailabilityResolver,
    AvailabilitySession, AvailabilityState, CliConfig, Clock, ConfigProvider, FixedClock,
    InMemorySlotStore, LoadOutcome, SlotStore, SupabaseSlotStore, SystemClock, TomlConfig,
    VenueClock,
};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let toml = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(mut config) => {
                apply_overrides(&mut config, &cli);
                Some(config)
            }
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let verbose = cli.verbose || toml.as_ref().is_some_and(|t| t.verbose_logging());
    if cli.log_json || toml.as_ref().is_some_and(|t| t.json_logging()) {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting availability-resolver");
    tracing::debug!("CLI config: {:?}", cli);

    let validation = match &toml {
        Some(config) => config.validate().and_then(|_| cli_checks_without_source(&cli)),
        None => cli.validate(),
    };
    if let Err(e) = validation {
        exit_with(&e, 1);
    }

    let provider: &dyn ConfigProvider = match &toml {
        Some(config) => config as &dyn ConfigProvider,
        None => &cli as &dyn ConfigProvider,
    };

    let store: Box<dyn SlotStore> = match &cli.slots_file {
        Some(path) => {
            tracing::info!("Reading slots from {}", path);
            Box::new(
                InMemorySlotStore::from_json_file(path)
                    .await
                    .with_context(|| format!("loading slots from {}", path))?,
            )
        }
        None => Box::new(SupabaseSlotStore::from_config(provider).context("building slot store")?),
    };

    let clock = match build_clock(&cli, provider) {
        Ok(clock) => clock,
        Err(e) => exit_with(&e, 1),
    };

    let min_lead_time = match provider.min_lead_time() {
        Ok(lead) => lead,
        Err(e) => exit_with(&e, 1),
    };
    let request = AvailabilityRequest::new(cli.activity_id.clone(), provider.days_ahead())
        .with_min_lead_time(min_lead_time);

    let resolver = Arc::new(AvailabilityResolver::new(store, clock));
    let session = AvailabilitySession::new(resolver);

    let state = match session.load(request).await {
        LoadOutcome::Applied(state) => state,
        LoadOutcome::Superseded => session.state().await,
    };

    let preview = cli.preview.or_else(|| toml.as_ref().and_then(|t| t.preview_limit()));
    print_state(&state, preview, cli.json)?;

    if let Some(message) = &state.error {
        tracing::error!("❌ Availability could not be loaded: {}", message);
        std::process::exit(2);
    }

    Ok(())
}

fn apply_overrides(config: &mut TomlConfig, cli: &CliConfig) {
    if let Some(url) = &cli.store_url {
        config.store.url = url.clone();
    }
    if let Some(key) = &cli.api_key {
        config.store.api_key = key.clone();
    }
    if let Some(table) = &cli.table {
        config.store.table = Some(table.clone());
    }
    if let Some(timeout) = cli.timeout_seconds {
        config.store.timeout_seconds = Some(timeout);
    }

    let resolution = config.resolution.get_or_insert_with(ResolutionConfig::default);
    if let Some(days) = cli.days_ahead {
        resolution.days_ahead = Some(days);
    }
    if let Some(minutes) = cli.min_lead_minutes {
        resolution.min_lead_minutes = Some(minutes);
    }
    if let Some(offset) = cli.venue_utc_offset_minutes {
        resolution.venue_utc_offset_minutes = Some(offset);
    }
}

/// With a config file the slot source is already settled; only `--now` needs checking.
fn cli_checks_without_source(cli: &CliConfig) -> availability_resolver::Result<()> {
    cli.fixed_now().map(|_| ())
}

fn build_clock(
    cli: &CliConfig,
    provider: &dyn ConfigProvider,
) -> availability_resolver::Result<Box<dyn Clock>> {
    if let Some(now) = cli.fixed_now()? {
        tracing::info!("Using fixed clock at {}", now);
        return Ok(Box::new(FixedClock::new(now)));
    }
    match provider.venue_utc_offset_minutes() {
        Some(minutes) => {
            tracing::info!("Evaluating now at UTC offset {} minutes", minutes);
            Ok(Box::new(VenueClock::from_offset_minutes(minutes)?))
        }
        None => Ok(Box::new(SystemClock)),
    }
}

fn print_state(state: &AvailabilityState, preview: Option<usize>, json: bool) -> anyhow::Result<()> {
    if json {
        match preview {
            Some(limit) => println!(
                "{}",
                serde_json::to_string_pretty(&preview_slots(&state.groups, limit))?
            ),
            None => println!("{}", serde_json::to_string_pretty(state)?),
        }
        return Ok(());
    }

    if let Some(message) = &state.error {
        eprintln!("❌ Couldn't load availability: {}", message);
        return Ok(());
    }

    if state.groups.is_empty() {
        println!("No upcoming slots available.");
        return Ok(());
    }

    match preview {
        Some(limit) => {
            for entry in preview_slots(&state.groups, limit) {
                println!(
                    "{}  {}  ({} spots left)",
                    entry.date_label,
                    entry.slot.time_range(),
                    entry.slot.spots_left()
                );
            }
        }
        None => {
            for group in &state.groups {
                println!("{}", group.label);
                for slot in &group.slots {
                    println!("  {}  ({} spots left)", slot.time_range(), slot.spots_left());
                }
            }
        }
    }

    Ok(())
}

fn exit_with(error: &AvailabilityError, code: i32) -> ! {
    tracing::error!("❌ Configuration validation failed: {}", error);
    tracing::error!("💡 Suggestion: {}", error.recovery_suggestion());
    eprintln!("❌ {}", error.user_friendly_message());
    eprintln!("💡 {}", error.recovery_suggestion());
    std::process::exit(code);
}
