use std::{fmt, path::PathBuf};

use scenery_parser::error::Diagnostic;

/// A non-fatal finding of a generation pass.
///
/// Warnings never abort the pass. They are returned alongside the generated
/// documents so the caller decides how to surface them.
#[derive(Debug, Clone)]
pub enum Warning {
    /// A scene file parsed, but part of it could not be attached.
    Scene {
        path: PathBuf,
        src: String,
        diagnostic: Diagnostic,
    },

    /// A scene file declares no root node and contributes nothing.
    MissingSceneRoot { path: PathBuf },

    /// Two sources produced the same node name; the first one was kept.
    DuplicateName {
        name: String,
        kept: PathBuf,
        ignored: PathBuf,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::Scene {
                path, diagnostic, ..
            } => write!(f, "{}: {diagnostic}", path.display()),
            Warning::MissingSceneRoot { path } => {
                write!(f, "{}: scene has no root node", path.display())
            }
            Warning::DuplicateName {
                name,
                kept,
                ignored,
            } => write!(
                f,
                "duplicate node name `{name}`: keeping {}, ignoring {}",
                kept.display(),
                ignored.display()
            ),
        }
    }
}
