//! CLI logic for the Scenery diagram tool.
//!
//! This module discovers the scene files of a project, loads its declared
//! types, runs a generation pass and keeps the output directory in sync with
//! the documents that pass produced.

pub mod error_adapter;

mod args;
mod config;
mod discover;
mod manifest;

pub use args::Args;

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};

use scenery::{
    CancellationToken, DiagramDocument, DiagramGenerator, ProjectInput, SceneSource, SceneryError,
    config::AppConfig,
};

use error_adapter::render_warning;

/// Run the Scenery CLI application
///
/// This function analyzes the project directory through the Scenery pipeline
/// and writes one PlantUML document per root node into the output directory.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `SceneryError` for:
/// - File I/O errors
/// - Configuration and manifest loading errors
/// - Malformed scene files
/// - Hierarchy cycles
///
/// After a failed pass every previously generated document is removed.
pub fn run(args: &Args) -> Result<(), SceneryError> {
    let project_dir = std::path::absolute(&args.project)?;
    let output_dir = match &args.output_dir {
        Some(dir) => std::path::absolute(dir)?,
        None => project_dir.clone(),
    };
    info!(
        project_dir:? = project_dir,
        output_dir:? = output_dir;
        "Processing project"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let suffix = app_config.diagram().output_suffix().to_string();

    match generate(args, &project_dir, &output_dir, app_config) {
        Ok(documents) => write_documents(&output_dir, &suffix, &documents),
        Err(err) => {
            remove_generated(&output_dir, &suffix, &HashSet::new())?;
            Err(err)
        }
    }
}

/// Builds the project input and runs one generation pass.
fn generate(
    args: &Args,
    project_dir: &Path,
    output_dir: &Path,
    app_config: AppConfig,
) -> Result<Vec<DiagramDocument>, SceneryError> {
    let extension = app_config.analysis().scene_extension().to_string();
    let mut input = ProjectInput::new(project_dir).with_output_dir(output_dir);

    for path in discover::find_scenes(project_dir, &extension)? {
        let text = fs::read_to_string(&path)?;
        let relative = path.strip_prefix(project_dir).unwrap_or(&path).to_path_buf();
        input.add_scene(SceneSource::new(relative, text));
    }
    input.add_declarations(manifest::load_declarations(
        project_dir,
        args.declarations.as_ref(),
    )?);

    let generator = DiagramGenerator::new(app_config);
    let (documents, warnings) = generator
        .generate(&input, &CancellationToken::new())?
        .into_parts();

    for warning in &warnings {
        warn!("{}", render_warning(warning));
    }
    Ok(documents)
}

/// Writes every document, then removes generated files this pass did not produce.
fn write_documents(
    output_dir: &Path,
    suffix: &str,
    documents: &[DiagramDocument],
) -> Result<(), SceneryError> {
    let mut written = HashSet::new();
    for document in documents {
        let path = output_dir.join(document.path());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, document.text())?;
        info!(name = document.name(), path:? = path; "Document written");
        written.insert(path);
    }

    remove_generated(output_dir, suffix, &written)?;
    info!(documents_count = documents.len(); "Documents exported successfully");
    Ok(())
}

/// Removes every generated document under `output_dir` not listed in `keep`.
fn remove_generated(
    output_dir: &Path,
    suffix: &str,
    keep: &HashSet<PathBuf>,
) -> Result<(), SceneryError> {
    for path in discover::find_generated(output_dir, suffix)? {
        if keep.contains(&path) {
            continue;
        }
        debug!(path:? = path; "Removing stale document");
        fs::remove_file(&path)?;
    }
    Ok(())
}
