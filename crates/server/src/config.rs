use std::env;
use std::path::PathBuf;

pub const DEFAULT_EXPLORER_URL: &str = "https://explorer.lichess.ovh";

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub theory_tsv_path: Option<PathBuf>,
    pub lichess_api_token: Option<String>,
    pub explorer_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            data_dir: env::var("TRAINER_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/store")),
            theory_tsv_path: non_empty("THEORY_TSV_PATH").map(PathBuf::from),
            // No token means no crowd statistics
            lichess_api_token: non_empty("LICHESS_API_TOKEN"),
            explorer_url: env::var("EXPLORER_URL")
                .unwrap_or_else(|_| DEFAULT_EXPLORER_URL.to_string()),
        }
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
