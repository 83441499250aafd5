//! Inputs of a generation pass and the path conventions shared by the graph
//! builder and the renderer.

use std::path::{Component, Path, PathBuf};

use scenery_core::declaration::TypeDeclaration;

/// Prefix of project resource paths written in scene files.
const RESOURCE_PREFIX: &str = "res://";

/// A scene description file and its text.
#[derive(Debug, Clone)]
pub struct SceneSource {
    path: PathBuf,
    text: String,
}

impl SceneSource {
    /// Creates a scene source. `path` may be relative to the project
    /// directory or absolute.
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Everything a generation pass reads: the project directory, its scene
/// files and the declared types of its source files.
///
/// Documents are written under the output directory, which defaults to the
/// project directory.
#[derive(Debug, Clone)]
pub struct ProjectInput {
    project_dir: PathBuf,
    output_dir: Option<PathBuf>,
    scenes: Vec<SceneSource>,
    declarations: Vec<TypeDeclaration>,
}

impl ProjectInput {
    /// Creates an empty input rooted at `project_dir`.
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            output_dir: None,
            scenes: Vec::new(),
            declarations: Vec::new(),
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.set_output_dir(output_dir);
        self
    }

    pub fn with_scene(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.add_scene(SceneSource::new(path, text));
        self
    }

    pub fn with_declaration(mut self, declaration: TypeDeclaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    pub fn set_output_dir(&mut self, output_dir: impl Into<PathBuf>) {
        self.output_dir = Some(output_dir.into());
    }

    pub fn add_scene(&mut self, scene: SceneSource) {
        self.scenes.push(scene);
    }

    pub fn add_declarations(&mut self, declarations: impl IntoIterator<Item = TypeDeclaration>) {
        self.declarations.extend(declarations);
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.project_dir)
    }

    pub fn scenes(&self) -> &[SceneSource] {
        &self.scenes
    }

    pub fn declarations(&self) -> &[TypeDeclaration] {
        &self.declarations
    }
}

/// Joins the normal components of `path` with `/`.
pub(crate) fn slash_path(path: &Path) -> String {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::ParentDir => parts.push("..".to_string()),
            Component::Prefix(prefix) => {
                parts.push(prefix.as_os_str().to_string_lossy().into_owned())
            }
            Component::CurDir | Component::RootDir => {}
        }
    }
    parts.join("/")
}

/// Returns `path` relative to `project_dir`, `/`-separated.
///
/// Absolute paths outside the project keep all of their components.
pub(crate) fn project_relative(project_dir: &Path, path: &Path) -> String {
    slash_path(path.strip_prefix(project_dir).unwrap_or(path))
}

/// Returns `path` resolved against `project_dir` unless already absolute.
pub(crate) fn project_absolute(project_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_dir.join(path)
    }
}

/// Returns the `/`-separated path leading from `from_dir` to `to_dir`, with a
/// trailing `/`, or an empty string when both are the same directory.
///
/// Both paths are compared lexically, component by component.
pub(crate) fn relative_between(from_dir: &Path, to_dir: &Path) -> String {
    let from: Vec<Component<'_>> = from_dir
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let to: Vec<Component<'_>> = to_dir
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut relative = "../".repeat(from.len() - common);
    for component in &to[common..] {
        relative.push_str(&component.as_os_str().to_string_lossy());
        relative.push('/');
    }
    relative
}

/// Converts a `res://` resource path into a project-relative path.
pub(crate) fn resource_to_relative(resource: &str) -> &str {
    resource.strip_prefix(RESOURCE_PREFIX).unwrap_or(resource)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_relative_strips_project_dir() {
        let dir = Path::new("/game");
        assert_eq!(
            project_relative(dir, Path::new("/game/World/World.tscn")),
            "World/World.tscn"
        );
        assert_eq!(
            project_relative(dir, Path::new("Player/Player.cs")),
            "Player/Player.cs"
        );
        assert_eq!(
            project_relative(dir, Path::new("./Player/Player.cs")),
            "Player/Player.cs"
        );
    }

    #[test]
    fn test_project_relative_outside_project() {
        assert_eq!(
            project_relative(Path::new("/game"), Path::new("/lib/Shared.cs")),
            "lib/Shared.cs"
        );
    }

    #[test]
    fn test_project_absolute() {
        let dir = Path::new("/game");
        assert_eq!(
            project_absolute(dir, Path::new("World/World.cs")),
            PathBuf::from("/game/World/World.cs")
        );
        assert_eq!(
            project_absolute(dir, Path::new("/other/A.cs")),
            PathBuf::from("/other/A.cs")
        );
    }

    #[test]
    fn test_output_dir_defaults_to_project_dir() {
        let input = ProjectInput::new("/game");
        assert_eq!(input.output_dir(), Path::new("/game"));

        let input = input.with_output_dir("/tmp/diagrams");
        assert_eq!(input.output_dir(), Path::new("/tmp/diagrams"));
        assert_eq!(input.project_dir(), Path::new("/game"));
    }

    #[test]
    fn test_relative_between() {
        assert_eq!(relative_between(Path::new("/game"), Path::new("/game")), "");
        assert_eq!(
            relative_between(Path::new("/game/diagrams"), Path::new("/game")),
            "../"
        );
        assert_eq!(
            relative_between(Path::new("/tmp/out"), Path::new("/tmp/.tmpA1/game")),
            "../.tmpA1/game/"
        );
        assert_eq!(
            relative_between(Path::new("/game"), Path::new("/game/src")),
            "src/"
        );
    }

    #[test]
    fn test_resource_to_relative() {
        assert_eq!(resource_to_relative("res://World/World.cs"), "World/World.cs");
        assert_eq!(resource_to_relative("World/World.cs"), "World/World.cs");
    }
}
