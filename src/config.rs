//! Build-time configuration.
//!
//! Values come from environment variables captured at compile time, so the
//! WASM bundle carries them without a runtime config fetch.

const DEFAULT_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Prefix for REST calls; empty means same-origin relative paths.
    pub api_base: String,
    /// Map provider access token (`MAP_TOKEN`).
    pub map_token: Option<String>,
    /// Raster tile template with `{z}`, `{x}`, `{y}` placeholders.
    pub tile_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            map_token: None,
            tile_url: DEFAULT_TILE_URL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_build_env() -> Self {
        Self {
            api_base: option_env!("PIN_API_BASE")
                .unwrap_or("")
                .trim_end_matches('/')
                .to_string(),
            map_token: option_env!("MAP_TOKEN")
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            tile_url: option_env!("MAP_TILE_URL")
                .filter(|t| !t.is_empty())
                .unwrap_or(DEFAULT_TILE_URL)
                .to_string(),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    pub fn tile(&self, z: u32, x: u32, y: u32) -> String {
        let url = self
            .tile_url
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string());
        match &self.map_token {
            Some(token) => {
                let sep = if url.contains('?') { '&' } else { '?' };
                format!("{url}{sep}access_token={token}")
            }
            None => url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_relative_without_base() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.endpoint("/pins"), "/pins");
        let cfg = AppConfig {
            api_base: "https://api.example.com".into(),
            ..Default::default()
        };
        assert_eq!(cfg.endpoint("/pins"), "https://api.example.com/pins");
    }

    #[test]
    fn tile_url_fills_placeholders_and_appends_token() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.tile(4, 14, 6), "https://tile.openstreetmap.org/4/14/6.png");

        let cfg = AppConfig {
            tile_url: "https://tiles.example.com/{z}/{x}/{y}?style=dark".into(),
            map_token: Some("pk.abc".into()),
            ..Default::default()
        };
        assert_eq!(
            cfg.tile(1, 0, 1),
            "https://tiles.example.com/1/0/1?style=dark&access_token=pk.abc"
        );
    }
}
