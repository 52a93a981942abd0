//! Page configuration. The browser has no environment, so the `PARKMAP_*`
//! keys are read from the query string instead: `PARKMAP_RADIUS_KM`
//! becomes `?radius_km=1.2`.

use parkmap_core::Settings;
use web_sys::UrlSearchParams;

const ENV_PREFIX: &str = "PARKMAP_";

/// Query parameter name for a settings key.
pub fn param_name(key: &str) -> String {
    key.strip_prefix(ENV_PREFIX).unwrap_or(key).to_ascii_lowercase()
}

/// `?debug` or `?debug=1` turns on debug logging.
pub fn debug_flag(value: Option<&str>) -> bool {
    value.is_some_and(|value| !matches!(value.trim(), "0" | "false" | "off"))
}

pub struct PageConfig {
    pub settings: Settings,
    pub debug: bool,
}

pub fn load_page_config() -> PageConfig {
    let search = web_sys::window()
        .and_then(|window| window.location().search().ok())
        .unwrap_or_default();

    let Ok(params) = UrlSearchParams::new_with_str(&search) else {
        return PageConfig {
            settings: Settings::default(),
            debug: false,
        };
    };

    PageConfig {
        settings: Settings::from_lookup(|key| params.get(&param_name(key))),
        debug: debug_flag(params.get("debug").as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_short_lowercase_params() {
        assert_eq!(param_name("PARKMAP_RADIUS_KM"), "radius_km");
        assert_eq!(param_name("PARKMAP_LOTS_URL"), "lots_url");
        assert_eq!(param_name("DEBUG"), "debug");
    }

    #[test]
    fn debug_flag_accepts_bare_and_truthy_values() {
        assert!(debug_flag(Some("")));
        assert!(debug_flag(Some("1")));
        assert!(!debug_flag(Some("0")));
        assert!(!debug_flag(Some("off")));
        assert!(!debug_flag(None));
    }
}
