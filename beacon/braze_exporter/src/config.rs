use beacon_common_logger::LoggerConfig;
use beacon_composer_braze::config::BrazeAppConfig;
use clap::Parser;
use config_rs::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};

pub const CONFIG_DIR_DEFAULT: Option<&'static str> =
    option_env!("BEACON_BRAZE_EXPORTER_CONFIG_DIR_DEFAULT");

pub const CONFIG_FILE_NAME: &str = "braze_exporter.toml";

fn default_config_dir() -> &'static str {
    CONFIG_DIR_DEFAULT.unwrap_or("/etc/beacon_braze_exporter")
}

/// Reads newline-delimited JSON events and prints the Braze requests they translate to.
#[derive(Parser, Debug)]
#[clap(name = "braze_exporter")]
pub struct Args {
    /// The filesystem folder where the Braze exporter configuration is saved
    #[clap(long, default_value = default_config_dir())]
    pub config_dir: String,

    /// A file with one JSON event per line. If not set, events are read from stdin
    #[clap(long)]
    pub input: Option<String>,
}

#[derive(Deserialize, Serialize, Clone)]
pub struct ExporterConfig {
    /// The logger configuration
    pub logger: LoggerConfig,
    pub braze: BrazeAppConfig,
}

pub fn build_config(config_dir: &str) -> Result<ExporterConfig, ConfigError> {
    let config_file_path = format!("{}/{}", &config_dir, CONFIG_FILE_NAME);
    let mut s = Config::new();
    s.merge(File::with_name(&config_file_path))?;
    s.try_into()
}
