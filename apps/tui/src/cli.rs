use clap::Parser;
use parkmap_core::Coord;

#[derive(Debug, Parser)]
#[command(name = "parkmap", version, about = "Parking availability map for the terminal")]
pub struct CliArgs {
    /// Print a lot summary and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless output as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override database path
    #[arg(long, value_name = "PATH")]
    pub db: Option<String>,

    /// Override the lot listing endpoint
    #[arg(long = "lots-url", value_name = "URL")]
    pub lots_url: Option<String>,

    /// Your position, used as the route origin
    #[arg(long, value_name = "LAT,LNG")]
    pub origin: Option<Coord>,

    /// Radius of the nearby highlight in kilometres
    #[arg(long = "radius-km", value_name = "KM")]
    pub radius_km: Option<f64>,

    /// Occupancy thresholds: coarse, quartile or HIGH,MEDIUM
    #[arg(long, value_name = "SET")]
    pub thresholds: Option<String>,

    /// Headless: only lots near this point, nearest first
    #[arg(long, value_name = "LAT,LNG", conflicts_with = "search")]
    pub near: Option<Coord>,

    /// Headless: only lots near this place, nearest first
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Headless: print the recorded history of one lot
    #[arg(long, value_name = "PARK_NO")]
    pub history: Option<String>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(db) = &self.db {
            std::env::set_var("DATABASE_NAME", db);
        }
        if let Some(url) = &self.lots_url {
            std::env::set_var("PARKMAP_LOTS_URL", url);
        }
        if let Some(origin) = self.origin {
            std::env::set_var("PARKMAP_ORIGIN", origin.to_string());
        }
        if let Some(radius) = self.radius_km {
            std::env::set_var("PARKMAP_RADIUS_KM", radius.to_string());
        }
        if let Some(thresholds) = &self.thresholds {
            std::env::set_var("PARKMAP_THRESHOLDS", thresholds);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }

    /// Any of the one-shot query flags implies headless mode.
    pub const fn wants_headless(&self) -> bool {
        self.headless
            || self.json
            || self.near.is_some()
            || self.search.is_some()
            || self.history.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_coordinates_and_flags() {
        let args = CliArgs::parse_from([
            "parkmap",
            "--origin",
            "24.8,120.97",
            "--near",
            "24.81,120.96",
            "--json",
        ]);

        assert_eq!(args.origin, Some(Coord::new(24.8, 120.97)));
        assert_eq!(args.near, Some(Coord::new(24.81, 120.96)));
        assert!(args.wants_headless());
    }

    #[test]
    fn rejects_near_with_search() {
        let result = CliArgs::try_parse_from([
            "parkmap",
            "--near",
            "24.81,120.96",
            "--search",
            "Hsinchu Station",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn plain_run_is_interactive() {
        let args = CliArgs::parse_from(["parkmap"]);
        assert!(!args.wants_headless());
    }
}
