use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use starroute_lib::{
    load_catalog, Catalog, CostModel, Error as LibError, ItineraryRenderMode, ItinerarySummary,
    Route, RoutingSettings, SystemId,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Star map routing utilities")]
struct Cli {
    /// Path to the catalog JSON document.
    #[arg(long)]
    catalog: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a route between two system names.
    Route(RouteArgs),
    /// List the systems in the catalog.
    Systems {
        /// Case-insensitive substring filter on system names.
        #[arg(long)]
        filter: Option<String>,
    },
}

#[derive(Args, Debug)]
struct RouteArgs {
    /// Starting system name.
    #[arg(long = "from")]
    from: String,

    /// Destination system name.
    #[arg(long = "to")]
    to: String,

    /// Intermediate stops between start and destination, in order.
    #[arg(long = "via")]
    via: Vec<String>,

    /// System names to avoid en route.
    #[arg(long = "avoid")]
    avoid: Vec<String>,

    /// Avoid territory hostile to the given faction.
    #[arg(long)]
    avoid_hostile: bool,

    /// Avoid unconfirmed or undiscovered jump points.
    #[arg(long)]
    avoid_unknown: bool,

    /// Avoid off-limits systems.
    #[arg(long)]
    avoid_off_limits: bool,

    /// The acting user's faction name; required for hostility checks.
    #[arg(long)]
    faction: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Route(args) => handle_route(&cli.catalog, &args),
        Command::Systems { filter } => handle_systems(&cli.catalog, filter.as_deref()),
    }
}

fn handle_route(catalog_path: &Path, args: &RouteArgs) -> Result<()> {
    let catalog = Arc::new(load_catalog_at(catalog_path)?);

    let start = resolve_system(&catalog, &args.from)?;
    let mut waypoints: Vec<SystemId> = Vec::with_capacity(args.via.len() + 1);
    for name in &args.via {
        waypoints.push(resolve_system(&catalog, name)?);
    }
    waypoints.push(resolve_system(&catalog, &args.to)?);

    let mut avoid_systems = HashSet::new();
    for name in &args.avoid {
        avoid_systems.insert(resolve_system(&catalog, name)?);
    }

    let user_faction = args
        .faction
        .as_deref()
        .map(|name| {
            catalog
                .faction_by_name(name)
                .map(|faction| faction.id)
                .ok_or_else(|| LibError::UnknownFaction {
                    name: name.to_string(),
                })
        })
        .transpose()?;

    let settings = RoutingSettings {
        avoid_hostile: args.avoid_hostile,
        avoid_unknown_jump_points: args.avoid_unknown,
        avoid_off_limits: args.avoid_off_limits,
        user_faction,
        avoid_systems,
    };

    let route = Route::new(
        Arc::clone(&catalog),
        Some(start),
        &waypoints,
        settings,
        CostModel::default(),
    );
    let summary = ItinerarySummary::from_route(&catalog, &route);

    match args.format {
        OutputFormat::Text => print!("{}", summary.render(ItineraryRenderMode::PlainText)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("failed to serialise itinerary")?
        ),
    }

    if !route.is_set() {
        match route.last_error() {
            Some(error) => bail!("no route possible: {error}"),
            None => bail!("no route possible"),
        }
    }

    Ok(())
}

fn handle_systems(catalog_path: &Path, filter: Option<&str>) -> Result<()> {
    let catalog = load_catalog_at(catalog_path)?;
    let needle = filter.map(|value| value.to_lowercase());

    let mut systems: Vec<_> = catalog
        .systems()
        .filter(|system| match &needle {
            Some(needle) => system.name.to_lowercase().contains(needle),
            None => true,
        })
        .collect();
    systems.sort_by(|a, b| a.name.cmp(&b.name));

    for system in systems {
        let faction = system
            .faction
            .and_then(|id| catalog.faction(id))
            .map(|faction| format!(" [{}]", faction.name))
            .unwrap_or_default();
        println!("{} ({}){}", system.name, system.id, faction);
    }

    Ok(())
}

fn load_catalog_at(path: &Path) -> Result<Catalog> {
    load_catalog(path).with_context(|| format!("failed to load catalog from {}", path.display()))
}

fn resolve_system(catalog: &Catalog, name: &str) -> Result<SystemId> {
    catalog
        .system_by_name(name)
        .map(|system| system.id)
        .ok_or_else(|| {
            LibError::UnknownSystem {
                name: name.to_string(),
                suggestions: catalog.fuzzy_system_matches(name, 3),
            }
            .into()
        })
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
