use std::{env, path::PathBuf};

use directories::BaseDirs;
use lazy_static::lazy_static;
use serde::Deserialize;

use crate::transform::{DEFAULT_PAGE_SIZE, DateDetection};

const CONFIG: &str = include_str!("../.config/config.json5");

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub date_detection: DateDetection,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            date_detection: DateDetection::default(),
            output_dir: default_output_dir(),
        }
    }
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

impl Config {
    /// Layer embedded defaults, then the user file, then `SHEETBENCH_*` environment variables.
    ///
    /// An explicit `config_path` must exist; the default location is optional.
    pub fn from_path(config_path: Option<&PathBuf>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(CONFIG, config::FileFormat::Json5));

        builder = match config_path {
            Some(path) => builder.add_source(
                config::File::from(expand_tilde(path))
                    .format(config::FileFormat::Json5)
                    .required(true),
            ),
            None => builder.add_source(
                config::File::from(get_config_dir().join("config.json5"))
                    .format(config::FileFormat::Json5)
                    .required(false),
            ),
        };

        builder = builder.add_source(
            config::Environment::with_prefix(PROJECT_NAME.as_str()).try_parsing(true),
        );

        let mut cfg: Self = builder.build()?.try_deserialize()?;
        cfg.output_dir = expand_tilde(&cfg.output_dir);
        if cfg.page_size == 0 {
            return Err(config::ConfigError::Message(
                "page_size must be at least 1".to_string(),
            ));
        }
        Ok(cfg)
    }
}

fn expand_tilde(path: &PathBuf) -> PathBuf {
    if let Some(s) = path.to_str() {
        if s.starts_with('~') {
            if let Some(base) = BaseDirs::new() {
                return PathBuf::from(s.replacen('~', base.home_dir().to_str().unwrap_or(""), 1));
            }
        }
    }
    path.clone()
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else if let Some(base) = BaseDirs::new() {
        base.config_dir().join(env!("CARGO_CRATE_NAME"))
    } else {
        PathBuf::from(".").join(".config")
    }
}
