use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Directory holding the per-user JSON documents.
    pub data_dir: PathBuf,
    pub static_path: PathBuf,
    pub currency_symbol: String,
    /// Show generated sample data to users without any expenses.
    pub sample_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8501,
            data_dir: PathBuf::from("data"),
            static_path: PathBuf::from("static"),
            currency_symbol: "\u{20b9}".into(),
            sample_data: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Self {
            host: env::var("SMARTSPEND_HOST").unwrap_or(defaults.host),
            port: env::var("SMARTSPEND_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            data_dir: env::var("SMARTSPEND_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            static_path: env::var("SMARTSPEND_STATIC_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_path),
            currency_symbol: env::var("SMARTSPEND_CURRENCY_SYMBOL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.currency_symbol),
            sample_data: env::var("SMARTSPEND_SAMPLE_DATA")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.sample_data),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
