//! Hierarchy nodes: one per scene file or declaration group.
//!
//! A [`HierarchyNode`] is created while the arena is built, receives its
//! edges once during wiring and is read-only afterwards.

use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use log::debug;

use scenery_core::{
    declaration::{DiagramMarker, TypeDeclaration},
    identifier::Name,
    scene::{Scene, SceneNode},
};

/// Which strategy created a child edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOrigin {
    /// The child's root node appears in the parent's scene tree.
    SceneContainment,
    /// A property of the parent's backing type is typed as the child.
    DeclaredMember,
}

/// Edge from a node to one of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEdge {
    label: Option<String>,
    origin: EdgeOrigin,
}

impl ChildEdge {
    pub fn scene_containment() -> Self {
        Self {
            label: None,
            origin: EdgeOrigin::SceneContainment,
        }
    }

    /// An edge labelled with the identifier of the property that created it.
    pub fn declared_member(property: impl Into<String>) -> Self {
        Self {
            label: Some(property.into()),
            origin: EdgeOrigin::DeclaredMember,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn origin(&self) -> EdgeOrigin {
        self.origin
    }
}

/// What a node was built from.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// A scene file; owns the elaborated scene tree.
    Scene(Scene),
    /// A group of declarations sharing a source file.
    Code,
}

/// A file on disk, known both relative to the project and absolutely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    relative: String,
    absolute: PathBuf,
}

impl FileRef {
    pub fn new(relative: impl Into<String>, absolute: impl Into<PathBuf>) -> Self {
        Self {
            relative: relative.into(),
            absolute: absolute.into(),
        }
    }

    /// Project-relative, `/`-separated path.
    pub fn relative(&self) -> &str {
        &self.relative
    }

    pub fn absolute(&self) -> &Path {
        &self.absolute
    }
}

/// A node of the hierarchy graph.
#[derive(Debug, Clone)]
pub struct HierarchyNode {
    name: Name,
    kind: NodeKind,
    file: FileRef,
    script: Option<FileRef>,
    declarations: Vec<TypeDeclaration>,
    backing: Option<usize>,
    interface: Option<usize>,
    children: IndexMap<Name, ChildEdge>,
    parents: IndexSet<Name>,
}

impl HierarchyNode {
    /// Creates a scene-backed node named after the scene's root node.
    ///
    /// Returns `None` when the scene has no root node.
    pub fn from_scene(scene: Scene, file: FileRef, script: Option<FileRef>) -> Option<Self> {
        let name = Name::new(scene.root()?.name());
        Some(Self::new(name, NodeKind::Scene(scene), file, script))
    }

    /// Creates a code-only node for a group of declarations. Its file and
    /// script are both the group's source file.
    pub fn from_declarations(name: Name, file: FileRef, declarations: Vec<TypeDeclaration>) -> Self {
        let mut node = Self::new(name, NodeKind::Code, file.clone(), Some(file));
        node.declarations = declarations;
        node
    }

    fn new(name: Name, kind: NodeKind, file: FileRef, script: Option<FileRef>) -> Self {
        Self {
            name,
            kind,
            file,
            script,
            declarations: Vec::new(),
            backing: None,
            interface: None,
            children: IndexMap::new(),
            parents: IndexSet::new(),
        }
    }

    pub fn name(&self) -> Name {
        self.name
    }

    pub fn is_scene_backed(&self) -> bool {
        matches!(self.kind, NodeKind::Scene(_))
    }

    /// Root of the scene tree, for scene-backed nodes.
    pub fn scene_root(&self) -> Option<&SceneNode> {
        match &self.kind {
            NodeKind::Scene(scene) => scene.root(),
            NodeKind::Code => None,
        }
    }

    pub fn file(&self) -> &FileRef {
        &self.file
    }

    pub fn script(&self) -> Option<&FileRef> {
        self.script.as_ref()
    }

    pub fn has_declarations(&self) -> bool {
        !self.declarations.is_empty()
    }

    /// Attaches the declarations of the node's backing source file.
    pub fn attach_declarations(&mut self, declarations: Vec<TypeDeclaration>) {
        self.declarations.extend(declarations);
    }

    /// Resolves and memoizes the backing type and its interface.
    ///
    /// The backing type is the class-like declaration named like the node,
    /// else the first class-like declaration. The interface is the one named
    /// `<prefix><Name>`.
    pub fn finalize(&mut self, interface_prefix: &str) {
        let name = self.name.to_string();
        let interface_name = self.name.interface_name(interface_prefix);

        self.backing = self
            .declarations
            .iter()
            .position(|decl| decl.kind().is_class_like() && decl.name() == name)
            .or_else(|| {
                self.declarations
                    .iter()
                    .position(|decl| decl.kind().is_class_like())
            });
        self.interface = self
            .declarations
            .iter()
            .position(|decl| !decl.kind().is_class_like() && decl.name() == interface_name);
    }

    pub fn backing_type(&self) -> Option<&TypeDeclaration> {
        self.backing.map(|idx| &self.declarations[idx])
    }

    pub fn interface_type(&self) -> Option<&TypeDeclaration> {
        self.interface.map(|idx| &self.declarations[idx])
    }

    /// Diagram opt-in marker of the backing type.
    pub fn diagram_marker(&self) -> Option<&DiagramMarker> {
        self.backing_type().and_then(TypeDeclaration::diagram)
    }

    pub fn children(&self) -> &IndexMap<Name, ChildEdge> {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Adds a child edge. The first edge to a child wins.
    ///
    /// Returns `false` if the child was already present.
    pub fn add_child(&mut self, child: Name, edge: ChildEdge) -> bool {
        if self.children.contains_key(&child) {
            debug!(parent:% = self.name, child:% = child; "Duplicate child edge dropped");
            return false;
        }
        self.children.insert(child, edge);
        true
    }

    /// Records a parent. Returns `false` if it was already present.
    pub fn add_parent(&mut self, parent: Name) -> bool {
        if !self.parents.insert(parent) {
            debug!(child:% = self.name, parent:% = parent; "Duplicate parent dropped");
            return false;
        }
        true
    }
}
