use anyhow::{anyhow, Error as AnyError};
use clap::{Parser, Subcommand};
use geo::geometry::Coord;
use opentopo::DemType;
use std::{path::PathBuf, str::FromStr, time::Duration};
use viewshed::Config;

/// Compute which terrain around a tower can see its top.
#[derive(Parser, Debug, Clone)]
pub struct Cli {
    /// Tower "lat,lon". Defaults to the last location used.
    #[arg(short, long)]
    pub location: Option<LatLon>,

    /// Tower height above ground, in meters.
    #[arg(long, default_value_t = Config::DEFAULT_TOWER_HEIGHT_M)]
    pub tower_height: f64,

    /// Viewer height above ground, in meters.
    #[arg(long, default_value_t = Config::DEFAULT_VIEWER_HEIGHT_M)]
    pub viewer_height: f64,

    /// Degrees of terrain fetched on each side of the tower.
    #[arg(long, default_value_t = Config::DEFAULT_AREA_HALF_SPAN_DEG)]
    pub half_span: f64,

    /// Cells scanned between progress updates.
    #[arg(long, default_value_t = Config::DEFAULT_CHECKPOINT_INTERVAL)]
    pub checkpoint_interval: usize,

    /// Abort the scan after this many seconds.
    #[arg(long, default_value_t = Config::DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Keep every n-th row and column of the result.
    #[arg(long, default_value_t = viewshed::DEFAULT_STRIDE)]
    pub stride: usize,

    /// OpenTopography API key.
    #[arg(long, env = "OPENTOPOGRAPHY_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// OpenTopography global DEM dataset.
    #[arg(long, default_value_t = DemType::default())]
    pub dem: DemType,

    /// File remembering the last tower location.
    #[arg(long, default_value = "towerview.json")]
    pub state: PathBuf,

    #[command(subcommand)]
    pub cmd: Command,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            tower_height_m: self.tower_height,
            viewer_height_m: self.viewer_height,
            area_half_span_deg: self.half_span,
            checkpoint_interval: self.checkpoint_interval,
            timeout: Duration::from_secs(self.timeout),
            downsample_stride: self.stride,
        }
    }
}

#[derive(Clone, Debug, Copy, PartialEq)]
pub struct LatLon(pub Coord<f64>);

impl FromStr for LatLon {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let (lat_str, lon_str) = s
            .split_once(',')
            .ok_or_else(|| anyhow!("not a valid lat,lon"))?;
        let lat = f64::from_str(lat_str.trim())?;
        let lon = f64::from_str(lon_str.trim())?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(anyhow!("{lat},{lon} is not on Earth"));
        }
        Ok(Self(Coord { y: lat, x: lon }))
    }
}

#[derive(Debug, Subcommand, Clone, Copy)]
pub enum Command {
    /// Print a short text summary.
    Summary,

    /// Print visible points as JSON.
    Json,

    /// Print visible points as "lat,lon" lines.
    Csv,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, LatLon};
    use clap::Parser;
    use opentopo::DemType;
    use viewshed::Config;

    #[test]
    fn test_parse_lat_lon() {
        let LatLon(coord) = "51.5074,-0.1278".parse().unwrap();
        assert_eq!(coord.y, 51.5074);
        assert_eq!(coord.x, -0.1278);
        assert!("51.5074".parse::<LatLon>().is_err());
        assert!("north,west".parse::<LatLon>().is_err());
        assert!("91,0".parse::<LatLon>().is_err());
        assert!("0,-181".parse::<LatLon>().is_err());
    }

    #[test]
    fn test_defaults_match_config() {
        let cli = Cli::try_parse_from(["towerview", "--api-key", "demo", "summary"]).unwrap();
        assert_eq!(cli.config(), Config::default());
        assert_eq!(cli.dem, DemType::Srtmgl3);
        assert!(cli.location.is_none());
        assert!(matches!(cli.cmd, Command::Summary));
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "towerview",
            "--api-key",
            "demo",
            "--location",
            "44.2705,-71.3033",
            "--tower-height",
            "50",
            "--dem",
            "cop30",
            "--stride",
            "2",
            "json",
        ])
        .unwrap();
        let config = cli.config();
        assert_eq!(config.tower_height_m, 50.0);
        assert_eq!(config.downsample_stride, 2);
        assert_eq!(cli.dem, DemType::Cop30);
        assert_eq!(cli.location.map(|LatLon(c)| c.y), Some(44.2705));
        assert!(matches!(cli.cmd, Command::Json));
    }
}
