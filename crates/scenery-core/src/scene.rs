//! Elaborated scene model.
//!
//! A scene file declares a tree of named, typed nodes plus a registry of
//! external resources. The parser turns the text into a [`Scene`]; the graph
//! builder only ever reads it.

use indexmap::{IndexMap, IndexSet};

/// A resolved reference pairing a class name with its source file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    class_name: String,
    path: String,
}

impl Script {
    /// Creates a script whose class name is derived from `path`.
    ///
    /// ```
    /// use scenery_core::scene::Script;
    ///
    /// let script = Script::from_path("res://player/player_controller.gd");
    /// assert_eq!(script.class_name(), "PlayerController");
    /// ```
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            class_name: class_name_from_path(&path),
            path,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The path as written in the scene file, e.g. `res://World/World.cs`.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Registry entry for a non-script external resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtResource {
    uid: Option<String>,
    id: String,
    kind: String,
    path: String,
}

impl ExtResource {
    pub fn new(
        uid: Option<String>,
        id: impl Into<String>,
        kind: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            uid,
            id: id.into(),
            kind: kind.into(),
            path: path.into(),
        }
    }

    pub fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The resource type, e.g. `PackedScene`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Class name of the resource, used for instanced scenes.
    pub fn class_name(&self) -> String {
        class_name_from_path(&self.path)
    }
}

/// A node of the scene tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneNode {
    name: String,
    type_name: String,
    parent_path: Option<String>,
    script: Option<Script>,
    groups: IndexSet<String>,
    children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            parent_path: None,
            script: None,
            groups: IndexSet::new(),
            children: Vec::new(),
        }
    }

    pub fn with_parent_path(mut self, parent_path: impl Into<String>) -> Self {
        self.parent_path = Some(parent_path.into());
        self
    }

    pub fn with_script(mut self, script: Option<Script>) -> Self {
        self.script = script;
        self
    }

    pub fn with_groups(mut self, groups: impl IntoIterator<Item = String>) -> Self {
        self.groups.extend(groups);
        self
    }

    /// Appends a child, keeping declaration order.
    pub fn push_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class name or literal type string.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn parent_path(&self) -> Option<&str> {
        self.parent_path.as_deref()
    }

    pub fn script(&self) -> Option<&Script> {
        self.script.as_ref()
    }

    pub fn groups(&self) -> &IndexSet<String> {
        &self.groups
    }

    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    /// Path of this node relative to the scene root.
    ///
    /// Nodes attached to the root (`parent="."`) and the root itself are
    /// addressed by their bare name.
    pub fn full_name(&self) -> String {
        match self.parent_path.as_deref() {
            Some(parent) if !parent.is_empty() && parent != "." => {
                format!("{parent}/{}", self.name)
            }
            _ => self.name.clone(),
        }
    }

    /// Depth-first, pre-order iterator over every descendant.
    pub fn all_children(&self) -> AllChildren<'_> {
        AllChildren {
            stack: vec![self.children.iter()],
        }
    }

    /// Looks up a descendant by a `/`-separated path relative to this node.
    pub fn select_child(&self, path: &str) -> Option<&SceneNode> {
        path.split('/').try_fold(self, |node, segment| {
            node.children.iter().find(|child| child.name == segment)
        })
        .filter(|_| !path.is_empty())
    }
}

/// Lazy depth-first traversal returned by [`SceneNode::all_children`].
#[derive(Debug, Clone)]
pub struct AllChildren<'a> {
    stack: Vec<std::slice::Iter<'a, SceneNode>>,
}

impl<'a> Iterator for AllChildren<'a> {
    type Item = &'a SceneNode;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some(node) => {
                    self.stack.push(node.children.iter());
                    return Some(node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// A fully elaborated scene file.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    root: Option<SceneNode>,
    scripts: IndexMap<String, Script>,
    ext_resources: IndexMap<String, ExtResource>,
}

impl Scene {
    pub fn new(
        root: Option<SceneNode>,
        scripts: IndexMap<String, Script>,
        ext_resources: IndexMap<String, ExtResource>,
    ) -> Self {
        Self {
            root,
            scripts,
            ext_resources,
        }
    }

    pub fn root(&self) -> Option<&SceneNode> {
        self.root.as_ref()
    }

    /// Script attached to the root node, if any.
    pub fn script(&self) -> Option<&Script> {
        self.root.as_ref().and_then(SceneNode::script)
    }

    /// Scripts keyed by external resource id.
    pub fn scripts(&self) -> &IndexMap<String, Script> {
        &self.scripts
    }

    /// Non-script external resources keyed by id.
    pub fn ext_resources(&self) -> &IndexMap<String, ExtResource> {
        &self.ext_resources
    }
}

/// Derives a class name from a resource path.
///
/// Takes the file name up to its first `.` and converts it to PascalCase.
///
/// ```
/// use scenery_core::scene::class_name_from_path;
///
/// assert_eq!(class_name_from_path("res://World/UI/WorldUI.tscn"), "WorldUI");
/// assert_eq!(class_name_from_path("res://enemy_spawner.gd"), "EnemySpawner");
/// ```
pub fn class_name_from_path(path: &str) -> String {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let raw = file_name.split('.').next().unwrap_or(file_name);
    to_pascal_case(raw)
}

/// Upper-cases the first character of every alphanumeric run and drops the
/// separators between runs. The rest of each run is kept as written.
pub fn to_pascal_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut upper_next = true;
    for c in text.chars() {
        if !c.is_alphanumeric() {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
