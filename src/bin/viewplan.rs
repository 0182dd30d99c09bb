use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use viewplan::config::PlanConfig;
use viewplan::display::{PlanSummary, PlanTable};
use viewplan::plan::ViewPlanner;

#[derive(Clone, Copy, ValueEnum)]
enum Order {
    /// Largest azimuth first, lowest first inside a one-degree bucket
    Azimuth,
    /// Shortest slewing path, west to east
    Path,
}

#[derive(Parser)]
#[command(name = "viewplan")]
#[command(about = "Plan an evening of telescope observing")]
struct Cli {
    /// TOML configuration file; flags override its values
    #[arg(long)]
    config: Option<Utf8PathBuf>,

    /// Named place (wins over --lat/--lon)
    #[arg(long)]
    city: Option<String>,

    /// Latitude, decimal or sexagesimal (e.g. 37:50:15.3)
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<String>,

    /// Longitude, east positive, decimal or sexagesimal (e.g. -122:16:51.6)
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<String>,

    /// Elevation in meters
    #[arg(long, allow_hyphen_values = true)]
    elevation: Option<f64>,

    /// Start time: "now", "in 2 hours", "2024-03-01T21:30:00"...
    #[arg(long)]
    start: Option<String>,

    /// Include notable stars
    #[arg(long)]
    stars: bool,

    /// Include planets
    #[arg(long)]
    planets: bool,

    /// Include deep-sky objects
    #[arg(long)]
    dsos: bool,

    /// Faintest star magnitude
    #[arg(long, allow_hyphen_values = true)]
    starlimit: Option<f64>,

    /// Faintest deep-sky object magnitude
    #[arg(long, allow_hyphen_values = true)]
    dsolimit: Option<f64>,

    /// Lowest altitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    minalt: Option<f64>,

    /// Highest altitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    maxalt: Option<f64>,

    /// Observing order
    #[arg(long, value_enum)]
    order: Option<Order>,

    /// Leave the Moon out unless planets are requested
    #[arg(long)]
    no_moon: bool,

    /// Ignore atmospheric refraction
    #[arg(long)]
    no_refraction: bool,

    /// More logging (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Apply the command-line flags on top of a configuration.
    fn apply(&self, mut config: PlanConfig) -> PlanConfig {
        let location = &mut config.location;
        // explicit coordinates drop a configured city
        if self.city.is_some() || self.lat.is_some() || self.lon.is_some() {
            location.city = self.city.clone();
        }
        if let Some(lat) = &self.lat {
            location.latitude = lat.clone();
        }
        if let Some(lon) = &self.lon {
            location.longitude = lon.clone();
        }
        if let Some(elevation) = self.elevation {
            location.elevation = elevation;
        }

        let filter = &mut config.filter;
        filter.include_stars |= self.stars;
        filter.include_planets |= self.planets;
        filter.include_dsos |= self.dsos;
        if let Some(limit) = self.starlimit {
            filter.star_magnitude_limit = limit;
        }
        if let Some(limit) = self.dsolimit {
            filter.dso_magnitude_limit = limit;
        }
        if let Some(min) = self.minalt {
            filter.min_altitude = min;
        }
        if let Some(max) = self.maxalt {
            filter.max_altitude = max;
        }
        if self.no_moon {
            filter.always_include_moon = false;
        }

        match self.order {
            Some(Order::Azimuth) => config.ordering.policy = "azimuth".into(),
            Some(Order::Path) => config.ordering.policy = "path".into(),
            None => {}
        }

        if self.start.is_some() {
            config.observer.start = self.start.clone();
        }
        if self.no_refraction {
            config.observer.refraction = false;
        }
        config
    }

    fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => PlanConfig::from_file(path)
            .with_context(|| format!("cannot load configuration {path}"))?,
        None => PlanConfig::default(),
    };
    let config = cli.apply(config);

    let planner = ViewPlanner::from_config(&config)?;
    let plan = planner.plan()?;

    println!("{}", PlanSummary(&plan));
    println!();
    println!("{}", PlanTable(&plan));
    Ok(())
}
