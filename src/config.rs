//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the
//! tide-calendar.toml file. It centralizes the server bind address,
//! the feed span, and the upstream JMA base URL (overridable so tests
//! and mirrors can point elsewhere).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Application configuration loaded from tide-calendar.toml
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Feed generation configuration
    pub feed: FeedConfig,
}

/// HTTP server configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "0.0.0.0:8080"
    pub bind: String,
}

/// Feed generation configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct FeedConfig {
    /// Number of consecutive days each feed covers
    pub days: u32,
    /// Base URL of the JMA suisan text service (no trailing slash)
    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                bind: "0.0.0.0:8080".to_string(),
            },
            feed: FeedConfig {
                days: 90,
                base_url: "https://www.data.jma.go.jp/kaiyou/data/db/tide/suisan/txt".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from tide-calendar.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path("tide-calendar.toml")
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Invalid config file format: {}", e);
                    eprintln!("Using default configuration");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Save current configuration to tide-calendar.toml
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)?;
        fs::write("tide-calendar.toml", contents)?;
        Ok(())
    }
}
