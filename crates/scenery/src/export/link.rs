use crate::{project::slash_path, structure::FileRef};

/// How links in one document point back at source files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStyle {
    /// `<protocol>://file/<absolute path>`, opened by an IDE.
    Absolute { protocol: String },
    /// Project-relative path, reached by climbing `depth` directories from
    /// the document and then following `base` from the output directory to
    /// the project directory.
    Relative { depth: usize, base: String },
}

impl LinkStyle {
    /// Relative style for a document written at `output_path`, where the
    /// depth is the number of `/` separators in that path.
    pub fn relative_to(output_path: &str, base: &str) -> Self {
        LinkStyle::Relative {
            depth: output_path.matches('/').count(),
            base: base.to_string(),
        }
    }

    /// Renders the link target of `file`.
    pub fn target(&self, file: &FileRef) -> String {
        match self {
            LinkStyle::Absolute { protocol } => {
                format!("{protocol}://file/{}", slash_path(file.absolute()))
            }
            LinkStyle::Relative { depth, base } => {
                format!("{}{base}{}", "../".repeat(*depth), file.relative())
            }
        }
    }
}
