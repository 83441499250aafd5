//! PlantUML export of a wired hierarchy graph.
//!
//! Each root node becomes one [`DiagramDocument`]. Rendering goes through a
//! structured [`document::Block`] tree and is serialized to text last.

mod document;
mod link;
mod render;

use std::path::{Path, PathBuf};

use log::debug;

use crate::{
    config::AppConfig,
    project::slash_path,
    structure::{HierarchyGraph, HierarchyNode},
};
use document::Document;
use link::LinkStyle;
use render::Renderer;

/// A generated diagram, ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramDocument {
    path: PathBuf,
    name: String,
    text: String,
}

impl DiagramDocument {
    /// Output path, relative to the output directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the root node the document describes.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Output path of `root`'s document: its own file with the extension
/// replaced by the configured suffix, or `<Name><suffix>` when flattened.
pub(crate) fn output_path(root: &HierarchyNode, config: &AppConfig) -> String {
    let suffix = config.diagram().output_suffix();
    if config.diagram().flatten_output() {
        return format!("{}{suffix}", root.name());
    }
    let stem = slash_path(&Path::new(root.file().relative()).with_extension(""));
    format!("{stem}{suffix}")
}

/// Renders the document of one root node.
///
/// `link_base` leads from the output directory to the project directory and
/// prefixes every relative link.
pub(crate) fn render_document(
    graph: &HierarchyGraph,
    root: &HierarchyNode,
    config: &AppConfig,
    link_base: &str,
) -> DiagramDocument {
    let path = output_path(root, config);
    let absolute = root
        .diagram_marker()
        .map(|marker| marker.use_absolute_ide_links())
        .unwrap_or(config.diagram().use_absolute_ide_links());
    let style = if absolute {
        LinkStyle::Absolute {
            protocol: config.diagram().ide_protocol().to_string(),
        }
    } else {
        LinkStyle::relative_to(&path, link_base)
    };
    debug!(name:% = root.name(), path = path, style:? = style; "Rendering document");

    let renderer = Renderer::new(graph, &style, config.analysis().interface_prefix());
    let document = Document::new(renderer.render(root));
    debug!(name:% = root.name(), blocks_count = document.blocks().len(); "Document rendered");
    let text = document.to_text();

    DiagramDocument {
        path: PathBuf::from(path),
        name: root.name().to_string(),
        text,
    }
}
