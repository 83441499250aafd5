//! # Scenery Parser
//!
//! Parser for Godot scene description files (`.tscn`). This crate turns
//! scene text into a [`Scene`] tree plus any warnings found on the way.
//!
//! ## Usage
//!
//! ```
//! # use scenery_parser::{parse_scene, error::ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//! [node name="World" type="Node"]
//!
//! [node name="Sun" type="DirectionalLight3D" parent="."]
//! "#;
//!
//!     let parsed = parse_scene(source)?;
//!     assert_eq!(parsed.scene().root().map(|n| n.children().len()), Some(1));
//!     Ok(())
//! }
//! ```

mod elaborate;
pub mod error;
mod lexer;
mod parser;
#[cfg(test)]
mod parser_tests;
mod parser_types;
mod span;
mod tokens;

pub use span::Span;

use log::debug;

use scenery_core::scene::Scene;

use elaborate::Builder;
use error::{Diagnostic, ParseError};

/// A successfully parsed scene together with its non-fatal diagnostics.
#[derive(Debug, Clone)]
pub struct ParsedScene {
    scene: Scene,
    warnings: Vec<Diagnostic>,
}

impl ParsedScene {
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Warnings reported while elaborating the scene.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn into_parts(self) -> (Scene, Vec<Diagnostic>) {
        (self.scene, self.warnings)
    }
}

/// Parse scene description text.
///
/// Runs the whole pipeline:
///
/// 1. **Tokenize** - Convert source text to tokens
/// 2. **Parse** - Build the section tree from tokens
/// 3. **Elaborate** - Resolve resources and assemble the node tree
///
/// # Errors
///
/// Returns a [`ParseError`] carrying every diagnostic when the text is
/// malformed. Unresolvable parents, repeated roots and duplicate resource ids
/// are not errors; they are returned as warnings in [`ParsedScene`].
pub fn parse_scene(source: &str) -> Result<ParsedScene, ParseError> {
    let tokens = lexer::tokenize(source)?;
    debug!(tokens_count = tokens.len(); "Scene tokenized");

    let file = parser::build_file(&tokens)?;
    debug!(sections_count = file.sections.len(); "Scene parsed");

    let (scene, warnings) = Builder::new().build(&file)?;
    Ok(ParsedScene { scene, warnings })
}
