use std::path::PathBuf;

use clap::Parser;
use tasklists_store::StoreConfig;

#[derive(Debug, Parser)]
#[command(name = "tasklists", about = "Terminal dashboard for prioritized task lists")]
pub struct Config {
    /// Directory the task lists are stored in
    #[arg(long, env = "TASKLISTS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log file (defaults to tasklists.log inside the data directory)
    #[arg(long, env = "TASKLISTS_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Keep everything in memory; nothing is saved
    #[arg(long)]
    pub in_memory: bool,
}

impl Config {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            local_data_dir: self.data_dir.clone(),
            in_memory: self.in_memory,
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.store_config().resolved_data_dir().join("tasklists.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags() {
        let config = Config::parse_from([
            "tasklists",
            "--data-dir",
            "/tmp/tl",
            "--log-file",
            "/tmp/tl.log",
        ]);
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/tl")));
        assert_eq!(config.log_path(), PathBuf::from("/tmp/tl.log"));
        assert!(!config.store_config().in_memory);
    }

    #[test]
    fn log_defaults_into_data_dir() {
        let config = Config::parse_from(["tasklists", "--data-dir", "/tmp/tl", "--in-memory"]);
        assert_eq!(config.log_path(), PathBuf::from("/tmp/tl/tasklists.log"));
        assert!(config.store_config().in_memory);
    }
}
