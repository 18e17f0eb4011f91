//! Server configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) gives a
//! working server on `127.0.0.1:5000` over the built-in city grid.
//!
//! ```toml
//! [listen]
//! bind = "127.0.0.1"
//! port = 5000
//! idle_timeout_secs = 300   # 0 disables the idle timeout
//! max_line_bytes = 1024
//!
//! [network]
//! vertex_count = 20
//! roads_csv = "roads.csv"   # omit to use the seeded grid
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use fb_spatial::{load_roads_csv, RoadGraph};

use crate::{seed, ServerError, ServerResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen:  ListenConfig,
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenConfig {
    pub bind:              String,
    pub port:              u16,
    pub idle_timeout_secs: u64,
    pub max_line_bytes:    usize,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            bind:              "127.0.0.1".to_string(),
            port:              5000,
            idle_timeout_secs: 0,
            max_line_bytes:    1024,
        }
    }
}

impl ListenConfig {
    /// `host:port` string for `TcpListener::bind`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout_secs > 0).then(|| Duration::from_secs(self.idle_timeout_secs))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub vertex_count: usize,
    pub roads_csv:    Option<PathBuf>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            vertex_count: seed::CITY_VERTICES,
            roads_csv:    None,
        }
    }
}

impl NetworkConfig {
    /// Build the road graph: the CSV file if one is configured, otherwise
    /// the seeded city grid.
    pub fn build_graph(&self) -> ServerResult<RoadGraph> {
        match &self.roads_csv {
            Some(path) => Ok(load_roads_csv(path, self.vertex_count)?),
            None if self.vertex_count != seed::CITY_VERTICES => Err(ServerError::Config(format!(
                "vertex_count = {} requires roads_csv (the built-in grid has {} vertices)",
                self.vertex_count,
                seed::CITY_VERTICES
            ))),
            None => Ok(seed::city_graph()?),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> ServerResult<()> {
        if self.listen.max_line_bytes == 0 {
            return Err(ServerError::Config("listen.max_line_bytes must be positive".to_string()));
        }
        Ok(())
    }
}
