//! Scenery turns a game project's scene files and declared types into
//! hyperlinked PlantUML architecture diagrams.
//!
//! The main entry point is [`DiagramGenerator`], which runs the whole pass
//! over a [`ProjectInput`]: parse every scene, register one hierarchy node per
//! scene and per declaration group, wire parent/child edges, reject cycles and
//! render one [`DiagramDocument`] per root node.
//!
//! # Example
//!
//! ```
//! use scenery::{CancellationToken, DiagramGenerator, ProjectInput};
//!
//! # fn main() -> Result<(), scenery::SceneryError> {
//! let input = ProjectInput::new("/game")
//!     .with_scene(
//!         "World/World.tscn",
//!         r#"
//! [gd_scene format=3]
//!
//! [ext_resource type="PackedScene" path="res://Camera/Camera.tscn" id="1_cam"]
//!
//! [node name="World" type="Node3D"]
//!
//! [node name="Camera" parent="." instance=ExtResource("1_cam")]
//! "#,
//!     )
//!     .with_scene("Camera/Camera.tscn", r#"[node name="Camera" type="Camera3D"]"#);
//!
//! let generation = DiagramGenerator::default().generate(&input, &CancellationToken::new())?;
//!
//! assert_eq!(generation.documents().len(), 1);
//! assert!(generation.documents()[0].text().contains("World --> Camera"));
//! # Ok(())
//! # }
//! ```

mod cancel;
pub mod config;
mod error;
mod export;
mod project;
mod structure;
mod warning;

pub use cancel::CancellationToken;
pub use error::SceneryError;
pub use export::DiagramDocument;
pub use project::{ProjectInput, SceneSource};
pub use warning::Warning;

use log::{debug, info, trace};

use config::AppConfig;
use structure::Arena;

/// Result of a successful generation pass.
#[derive(Debug, Clone)]
pub struct Generation {
    documents: Vec<DiagramDocument>,
    warnings: Vec<Warning>,
}

impl Generation {
    /// Documents in root registration order.
    pub fn documents(&self) -> &[DiagramDocument] {
        &self.documents
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_parts(self) -> (Vec<DiagramDocument>, Vec<Warning>) {
        (self.documents, self.warnings)
    }
}

/// Runs generation passes with a fixed configuration.
#[derive(Debug, Default)]
pub struct DiagramGenerator {
    config: AppConfig,
}

impl DiagramGenerator {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Runs one generation pass.
    ///
    /// The pass is all or nothing: a malformed scene file, a hierarchy cycle
    /// or cancellation returns an error and no documents.
    ///
    /// # Errors
    ///
    /// - [`SceneryError::Parse`] if any scene file is malformed.
    /// - [`SceneryError::Cycle`] if the wired edges form a cycle.
    /// - [`SceneryError::Cancelled`] if `cancel` was triggered.
    pub fn generate(
        &self,
        input: &ProjectInput,
        cancel: &CancellationToken,
    ) -> Result<Generation, SceneryError> {
        info!(
            scenes_count = input.scenes().len(),
            declarations_count = input.declarations().len();
            "Generating diagrams"
        );
        let analysis = self.config.analysis();
        let mut warnings = Vec::new();
        let mut arena = Arena::new(input.project_dir(), analysis.interface_prefix());

        for source in input.scenes() {
            cancel.check()?;
            debug!(path:? = source.path(); "Parsing scene");
            let parsed = scenery_parser::parse_scene(source.text()).map_err(|err| {
                SceneryError::new_parse_error(err, source.text(), source.path())
            })?;

            let (scene, diagnostics) = parsed.into_parts();
            warnings.extend(diagnostics.into_iter().map(|diagnostic| Warning::Scene {
                path: source.path().to_path_buf(),
                src: source.text().to_string(),
                diagnostic,
            }));
            arena.add_scene(source.path(), scene, &mut warnings);
        }
        arena.add_declarations(input.declarations(), &mut warnings);

        cancel.check()?;
        let mut graph = arena.finalize();
        graph.wire(analysis);
        graph.check_acyclic()?;
        debug!(nodes_count = graph.nodes().count(); "Hierarchy graph ready");
        trace!(graph:?; "Wired hierarchy graph");

        let link_base = project::relative_between(input.output_dir(), input.project_dir());
        let mut documents = Vec::new();
        for root in graph.roots() {
            cancel.check()?;
            if self.config.diagram().require_opt_in() && root.diagram_marker().is_none() {
                debug!(name:% = root.name(); "Root has no diagram marker, skipped");
                continue;
            }
            documents.push(export::render_document(
                &graph,
                root,
                &self.config,
                &link_base,
            ));
        }

        info!(
            documents_count = documents.len(),
            warnings_count = warnings.len();
            "Diagrams generated"
        );
        Ok(Generation {
            documents,
            warnings,
        })
    }
}
