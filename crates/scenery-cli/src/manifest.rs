//! Loading of the declared-type manifest.
//!
//! The manifest lists the types and interfaces declared by the project's
//! source files:
//!
//! ```toml
//! [[types]]
//! name = "Game"
//! kind = "class"
//! file = "Game/Game.cs"
//!
//! [[types.members]]
//! kind = "property"
//! name = "Player"
//! type = "IPlayer"
//! line = 14
//! ```

use std::{fs, path::Path};

use log::{debug, info};
use serde::Deserialize;

use scenery::SceneryError;
use scenery_core::declaration::TypeDeclaration;

/// File name of the manifest looked up in the project directory.
pub const DEFAULT_MANIFEST: &str = "scenery.toml";

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default)]
    types: Vec<TypeDeclaration>,
}

/// Loads the declarations of a project.
///
/// An explicit manifest must exist. Without one, `<project>/scenery.toml` is
/// used when present; otherwise the project has no declarations.
///
/// # Errors
///
/// Returns [`SceneryError::Config`] if the manifest is missing (when given
/// explicitly) or malformed, and [`SceneryError::Io`] if it cannot be read.
pub fn load_declarations(
    project_dir: &Path,
    explicit_path: Option<impl AsRef<Path>>,
) -> Result<Vec<TypeDeclaration>, SceneryError> {
    let path = match explicit_path {
        Some(path) => {
            let path = path.as_ref().to_path_buf();
            if !path.exists() {
                return Err(SceneryError::Config(format!(
                    "Missing declaration manifest: {}",
                    path.display()
                )));
            }
            path
        }
        None => {
            let path = project_dir.join(DEFAULT_MANIFEST);
            if !path.exists() {
                debug!(path = path.display().to_string(); "No declaration manifest found");
                return Ok(Vec::new());
            }
            path
        }
    };

    info!(path = path.display().to_string(); "Loading declaration manifest");
    let content = fs::read_to_string(&path)?;
    let manifest: Manifest = toml::from_str(&content).map_err(|e| {
        SceneryError::Config(format!(
            "Failed to parse declaration manifest {}: {e}",
            path.display()
        ))
    })?;

    debug!(types_count = manifest.types.len(); "Declaration manifest loaded");
    Ok(manifest.types)
}

#[cfg(test)]
mod tests {
    use scenery_core::declaration::{DeclarationKind, MemberKind};
    use tempfile::tempdir;

    use super::*;

    const MANIFEST: &str = r#"
[[types]]
name = "Game"
kind = "class"
file = "Game/Game.cs"
diagram = { use_absolute_ide_links = true }

[[types.members]]
kind = "property"
name = "Player"
type = "IPlayer"
line = 14
attributes = ["Export"]

[[types.members]]
kind = "method"
name = "Start"

[[types]]
name = "IGame"
kind = "interface"
file = "Game/Game.cs"
"#;

    #[test]
    fn test_default_manifest_is_loaded() {
        let dir = tempdir().expect("temp dir");
        fs::write(dir.path().join(DEFAULT_MANIFEST), MANIFEST).expect("write manifest");

        let types = load_declarations(dir.path(), None::<&Path>).expect("manifest loads");

        assert_eq!(types.len(), 2);
        let game = &types[0];
        assert_eq!(game.name(), "Game");
        assert_eq!(game.kind(), DeclarationKind::Class);
        assert_eq!(game.file(), Path::new("Game/Game.cs"));
        assert!(game.diagram().is_some_and(|marker| marker.use_absolute_ide_links()));
        assert_eq!(game.members().len(), 2);
        assert_eq!(game.members()[0].kind(), MemberKind::Property);
        assert_eq!(game.members()[0].type_name(), "IPlayer");
        assert_eq!(game.members()[0].line(), Some(14));
        assert!(game.members()[0].has_attribute("Export"));
        assert_eq!(game.members()[1].type_name(), "");
        assert_eq!(types[1].kind(), DeclarationKind::Interface);
    }

    #[test]
    fn test_missing_default_manifest_means_no_declarations() {
        let dir = tempdir().expect("temp dir");

        let types = load_declarations(dir.path(), None::<&Path>).expect("no manifest is fine");

        assert!(types.is_empty());
    }

    #[test]
    fn test_missing_explicit_manifest_is_an_error() {
        let dir = tempdir().expect("temp dir");

        let result = load_declarations(dir.path(), Some(dir.path().join("types.toml")));

        assert!(matches!(result, Err(SceneryError::Config(_))));
    }

    #[test]
    fn test_malformed_manifest_is_an_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("types.toml");
        fs::write(&path, "[[types]]\nname = \"Game\"\nkind = \"enum\"\n").expect("write manifest");

        let result = load_declarations(dir.path(), Some(&path));

        assert!(matches!(result, Err(SceneryError::Config(msg)) if msg.contains("types.toml")));
    }
}
