use crate::geo::Coord;
use crate::occupancy::Thresholds;
use crate::proximity::DEFAULT_RADIUS_KM;
use crate::services::RetryPolicy;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_LOTS_URL: &str = "https://wellpark.dd-long.fun/api/latest-parks";
pub const DEFAULT_HISTORY_URL: &str = "https://wellpark.dd-long.fun/api/parks";
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_ROUTER_URL: &str = "https://router.project-osrm.org";
pub const DEFAULT_ZOOM: u8 = 15;

/// Hsinchu, where the lot feed is published. Used until a location is known.
pub const DEFAULT_CENTER: Coord = Coord::new(24.807_260, 120.969_783);

/// Resolved runtime configuration shared by both front ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub lots_url: String,
    pub history_url: String,
    pub page_size: Option<u32>,
    pub geocoder_url: String,
    pub router_url: String,
    pub radius_km: f64,
    pub zoom: u8,
    pub thresholds: Thresholds,
    pub origin: Option<Coord>,
    pub refresh_interval: Option<Duration>,
    pub retry: RetryPolicy,
    pub initial_center: Coord,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lots_url: DEFAULT_LOTS_URL.to_string(),
            history_url: DEFAULT_HISTORY_URL.to_string(),
            page_size: None,
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            router_url: DEFAULT_ROUTER_URL.to_string(),
            radius_km: DEFAULT_RADIUS_KM,
            zoom: DEFAULT_ZOOM,
            thresholds: Thresholds::default(),
            origin: None,
            refresh_interval: Some(Duration::from_secs(60)),
            retry: RetryPolicy::default(),
            initial_center: DEFAULT_CENTER,
        }
    }
}

impl Settings {
    /// Builds settings from `PARKMAP_*` keys. `lookup` is usually
    /// `std::env::var(..).ok()`; malformed values keep their default and
    /// are logged.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        let value = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(url) = value("PARKMAP_LOTS_URL") {
            settings.lots_url = url;
        }
        if let Some(url) = value("PARKMAP_HISTORY_URL") {
            settings.history_url = url;
        }
        if let Some(url) = value("PARKMAP_GEOCODER_URL") {
            settings.geocoder_url = url;
        }
        if let Some(url) = value("PARKMAP_ROUTER_URL") {
            settings.router_url = url;
        }

        settings.page_size = parse_or("PARKMAP_PAGE_SIZE", value("PARKMAP_PAGE_SIZE"), None, |size: u32| {
            (size > 0).then_some(Some(size))
        });
        settings.radius_km = parse_or(
            "PARKMAP_RADIUS_KM",
            value("PARKMAP_RADIUS_KM"),
            settings.radius_km,
            |radius: f64| (radius.is_finite() && radius > 0.0).then_some(radius),
        );
        settings.zoom = parse_or("PARKMAP_ZOOM", value("PARKMAP_ZOOM"), settings.zoom, |zoom: u8| {
            (1..=20).contains(&zoom).then_some(zoom)
        });
        settings.thresholds = parse_or(
            "PARKMAP_THRESHOLDS",
            value("PARKMAP_THRESHOLDS"),
            settings.thresholds,
            Some,
        );
        settings.origin = parse_or("PARKMAP_ORIGIN", value("PARKMAP_ORIGIN"), None, |origin: Coord| {
            Some(Some(origin))
        });
        settings.refresh_interval = parse_or(
            "PARKMAP_REFRESH_SECS",
            value("PARKMAP_REFRESH_SECS"),
            settings.refresh_interval,
            |secs: u64| Some((secs > 0).then(|| Duration::from_secs(secs))),
        );
        settings.retry = parse_or(
            "PARKMAP_RETRY_ATTEMPTS",
            value("PARKMAP_RETRY_ATTEMPTS"),
            settings.retry,
            |attempts: u32| (1..=10).contains(&attempts).then(|| RetryPolicy::new(attempts)),
        );

        settings
    }
}

fn parse_or<T, U, F>(key: &str, raw: Option<String>, default: U, accept: F) -> U
where
    T: FromStr,
    F: FnOnce(T) -> Option<U>,
{
    let Some(raw) = raw else {
        return default;
    };

    match raw.parse::<T>().ok().and_then(accept) {
        Some(parsed) => parsed,
        None => {
            log::warn!("ignoring invalid {key}=\"{raw}\"; keeping the default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Settings {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(settings_from(&[]), Settings::default());
    }

    #[test]
    fn reads_overrides() {
        let settings = settings_from(&[
            ("PARKMAP_LOTS_URL", "http://localhost:8080/parks"),
            ("PARKMAP_PAGE_SIZE", "200"),
            ("PARKMAP_RADIUS_KM", "1.5"),
            ("PARKMAP_ZOOM", "13"),
            ("PARKMAP_THRESHOLDS", "quartile"),
            ("PARKMAP_ORIGIN", "24.8,120.97"),
            ("PARKMAP_REFRESH_SECS", "0"),
            ("PARKMAP_RETRY_ATTEMPTS", "5"),
        ]);

        assert_eq!(settings.lots_url, "http://localhost:8080/parks");
        assert_eq!(settings.page_size, Some(200));
        assert!((settings.radius_km - 1.5).abs() < 1e-12);
        assert_eq!(settings.zoom, 13);
        assert_eq!(settings.thresholds, Thresholds::quartile());
        assert_eq!(settings.origin, Some(Coord::new(24.8, 120.97)));
        assert_eq!(settings.refresh_interval, None);
        assert_eq!(settings.retry.attempts, 5);
    }

    #[test]
    fn malformed_values_keep_defaults() {
        let settings = settings_from(&[
            ("PARKMAP_RADIUS_KM", "-2"),
            ("PARKMAP_ZOOM", "99"),
            ("PARKMAP_THRESHOLDS", "generous"),
            ("PARKMAP_ORIGIN", "somewhere"),
            ("PARKMAP_PAGE_SIZE", "0"),
            ("PARKMAP_RETRY_ATTEMPTS", "many"),
        ]);

        assert_eq!(settings, Settings::default());
    }
}
