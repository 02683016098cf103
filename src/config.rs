//! Engine configuration.
//!
//! Load the pipeline's tunables from TOML so that deployments can adjust
//! search budgets and placement policy without code changes. Room
//! diversity ceilings live on each [`RoomConfig`](crate::models::RoomConfig)
//! and are not part of this file.
//!
//! # Examples
//!
//! ```
//! use u_seating::config::EngineConfig;
//! use u_seating::seating::FallbackPolicy;
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     [graph]
//!     section_separation = false
//!
//!     [search]
//!     node_limit = 50000
//!     time_limit_ms = 2000
//!
//!     [placement]
//!     fallback = "fewest_adjacent"
//! "#).unwrap();
//!
//! assert!(config.graph.relationship_separation);
//! assert!(!config.graph.section_separation);
//! assert_eq!(config.search.node_limit, Some(50_000));
//! assert_eq!(config.placement.fallback, FallbackPolicy::FewestAdjacent);
//! ```
//!
//! Fall back to defaults when the file is missing:
//!
//! ```
//! use u_seating::config::EngineConfig;
//!
//! let config = EngineConfig::load("seating.toml").unwrap_or_default();
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::GraphOptions;
use crate::rooms::SearchBudget;
use crate::seating::{FallbackPolicy, PlacementOptions};

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Pipeline configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Soft edges added to the conflict graph.
    pub graph: GraphOptions,
    /// Backtracking budget for room allocation.
    pub search: SearchBudget,
    /// Seat placement policy.
    pub placement: PlacementOptions,
}

impl EngineConfig {
    /// Creates a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file can't be read, isn't valid TOML, or
    /// fails [`validate`](Self::validate).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::from_toml_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Rejects limits that would stop the search before it starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.node_limit == Some(0) {
            return Err(ConfigError::Invalid(
                "search.node_limit must be positive".to_string(),
            ));
        }
        if self.search.time_limit_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "search.time_limit_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Sets graph options.
    pub fn with_graph(mut self, graph: GraphOptions) -> Self {
        self.graph = graph;
        self
    }

    /// Sets the search budget.
    pub fn with_search(mut self, search: SearchBudget) -> Self {
        self.search = search;
        self
    }

    /// Sets the adjacency fallback policy.
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.placement.fallback = fallback;
        self
    }

    /// Enables or disables relationship separation in graph and seating.
    pub fn with_relationship_separation(mut self, enabled: bool) -> Self {
        self.graph.relationship_separation = enabled;
        self
    }
}
