//! Configuration types for Scenery diagram generation.
//!
//! This module provides configuration structures that control how the
//! hierarchy graph is analyzed and how diagram documents are written. All
//! types implement [`serde::Deserialize`] for loading from external sources,
//! and every field falls back to a default when omitted.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining diagram and analysis settings.
//! - [`DiagramConfig`] - Output naming, link style and opt-in behavior.
//! - [`AnalysisConfig`] - Naming conventions used while wiring the graph.
//!
//! # Example
//!
//! ```
//! # use scenery::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.diagram().output_suffix(), ".g.puml");
//! assert_eq!(config.analysis().interface_prefix(), "I");
//! ```

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Diagram output section.
    #[serde(default)]
    diagram: DiagramConfig,

    /// Graph analysis section.
    #[serde(default)]
    analysis: AnalysisConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its two sections.
    pub fn new(diagram: DiagramConfig, analysis: AnalysisConfig) -> Self {
        Self { diagram, analysis }
    }

    /// Returns the diagram configuration.
    pub fn diagram(&self) -> &DiagramConfig {
        &self.diagram
    }

    /// Returns the analysis configuration.
    pub fn analysis(&self) -> &AnalysisConfig {
        &self.analysis
    }
}

/// Controls how diagram documents are named and how they link to sources.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    /// Suffix replacing the extension of a root's file to name its document.
    output_suffix: String,

    /// Protocol of absolute IDE links, e.g. `vscode://file/...`.
    ide_protocol: String,

    /// Link style used when a root carries no diagram marker.
    use_absolute_ide_links: bool,

    /// Write every document at the output root as `<Name><suffix>`.
    flatten_output: bool,

    /// Only emit documents for roots whose backing type carries a diagram marker.
    require_opt_in: bool,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            output_suffix: ".g.puml".to_string(),
            ide_protocol: "vscode".to_string(),
            use_absolute_ide_links: false,
            flatten_output: false,
            require_opt_in: false,
        }
    }
}

impl DiagramConfig {
    pub fn output_suffix(&self) -> &str {
        &self.output_suffix
    }

    pub fn ide_protocol(&self) -> &str {
        &self.ide_protocol
    }

    pub fn use_absolute_ide_links(&self) -> bool {
        self.use_absolute_ide_links
    }

    pub fn flatten_output(&self) -> bool {
        self.flatten_output
    }

    pub fn require_opt_in(&self) -> bool {
        self.require_opt_in
    }

    /// Returns a copy with the default link style replaced.
    pub fn with_absolute_ide_links(mut self, enabled: bool) -> Self {
        self.use_absolute_ide_links = enabled;
        self
    }

    /// Returns a copy with flattened output enabled or disabled.
    pub fn with_flatten_output(mut self, enabled: bool) -> Self {
        self.flatten_output = enabled;
        self
    }

    /// Returns a copy with the opt-in requirement enabled or disabled.
    pub fn with_require_opt_in(mut self, enabled: bool) -> Self {
        self.require_opt_in = enabled;
        self
    }
}

/// Naming conventions applied while wiring the hierarchy graph.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Properties decorated with this attribute never produce child edges.
    skip_attribute: String,

    /// Prefix of interface names, as in `IPlayer`.
    interface_prefix: String,

    /// Extension of scene description files, without the dot.
    scene_extension: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            skip_attribute: "Dependency".to_string(),
            interface_prefix: "I".to_string(),
            scene_extension: "tscn".to_string(),
        }
    }
}

impl AnalysisConfig {
    pub fn skip_attribute(&self) -> &str {
        &self.skip_attribute
    }

    pub fn interface_prefix(&self) -> &str {
        &self.interface_prefix
    }

    pub fn scene_extension(&self) -> &str {
        &self.scene_extension
    }
}
