use clap::{Parser, ValueEnum};
use hexdiv::compute::geojson::result_set_to_geojson;
use hexdiv::{
    Config, GeohashGrid, HexDivError, HexGrid, OverpassProvider, Pipeline, Region, ResultSet,
    Tessellation, regions,
};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Scheme {
    H3,
    Geohash,
}

/// Fetch OpenStreetMap features for a region and print per-cell category
/// diversity as GeoJSON.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Preset city, e.g. "San Francisco"
    #[arg(short, long, conflicts_with = "bbox")]
    city: Option<String>,

    /// Bounding box as lat_min,lon_min,lat_max,lon_max
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    bbox: Option<Vec<f64>>,

    /// JSON or TOML configuration file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    resolution: Option<u8>,

    /// Minimum distinct categories for a highlighted cell
    #[arg(short, long)]
    threshold: Option<u32>,

    #[arg(long, value_enum, default_value_t = Scheme::H3)]
    scheme: Scheme,

    /// Overpass endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Skip edge refinement and keep only cells hit by a lattice point
    #[arg(long)]
    no_refine_edges: bool,

    /// Write GeoJSON here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the preset city names and exit
    #[arg(long)]
    list_cities: bool,
}

impl Args {
    fn region(&self) -> hexdiv::Result<Region> {
        if let Some(name) = &self.city {
            return regions::named(name)
                .ok_or_else(|| HexDivError::InvalidRegion(format!("Unknown city '{}'", name)));
        }

        match self.bbox.as_deref() {
            Some([lat_min, lon_min, lat_max, lon_max]) => {
                Ok(Region::new(*lat_min, *lon_min, *lat_max, *lon_max))
            }
            Some(other) => Err(HexDivError::InvalidRegion(format!(
                "--bbox needs 4 values, got {}",
                other.len()
            ))),
            None => regions::named("San Francisco")
                .ok_or_else(|| HexDivError::InvalidRegion("no region given".into())),
        }
    }

    fn config(&self) -> hexdiv::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(resolution) = self.resolution {
            config = config.with_resolution(resolution);
        }
        if let Some(threshold) = self.threshold {
            config = config.with_threshold(threshold);
        }
        if let Some(endpoint) = &self.endpoint {
            config.provider = config.provider.with_endpoint(endpoint.clone());
        }
        if let Some(timeout) = self.timeout {
            config.provider = config.provider.with_timeout_secs(timeout);
        }
        if self.no_refine_edges {
            config.sampling = config.sampling.with_refine_edges(false);
        }
        Ok(config.with_parallel(cfg!(feature = "parallel")))
    }
}

fn run<T: Tessellation>(
    tessellation: T,
    config: Config,
    region: &Region,
) -> hexdiv::Result<ResultSet> {
    let provider = OverpassProvider::new(&config.provider)?;
    let pipeline = Pipeline::new(tessellation, config)?;
    pipeline.run_with_provider(region, &provider)
}

fn main() -> hexdiv::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.list_cities {
        for (name, region) in regions::all() {
            println!("{:<14} {:?}", name, region.bounds());
        }
        return Ok(());
    }

    let region = args.region()?;
    let config = args.config()?;
    log::info!(
        "Aggregating {:?} at resolution {} with threshold {}",
        region.bounds(),
        config.resolution,
        config.threshold
    );

    let result = match args.scheme {
        Scheme::H3 => run(HexGrid, config, &region)?,
        Scheme::Geohash => run(GeohashGrid, config, &region)?,
    };

    for diagnostic in &result.diagnostics {
        log::warn!("{}", diagnostic);
    }
    log::info!(
        "{} cells, {} highlighted; {} of {} features counted",
        result.len(),
        result.highlighted_count(),
        result.report.accepted,
        result.report.total()
    );

    let geojson = result_set_to_geojson(&result)?;
    match &args.output {
        Some(path) => std::fs::write(path, geojson)?,
        None => println!("{}", geojson),
    }
    Ok(())
}
