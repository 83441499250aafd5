//! Build arena: registers one node per scene file and per declaration group
//! before any edge exists.

use std::path::{Path, PathBuf};

use indexmap::{IndexMap, map::Entry};
use log::{debug, trace};

use scenery_core::{declaration::TypeDeclaration, identifier::Name, scene::Scene};

use super::{
    graph::HierarchyGraph,
    node::{FileRef, HierarchyNode},
};
use crate::{
    project::{project_absolute, project_relative, resource_to_relative},
    warning::Warning,
};

/// Collects nodes keyed by name in registration order.
///
/// The first registration of a name wins; later ones are reported as
/// [`Warning::DuplicateName`] and contribute nothing.
#[derive(Debug)]
pub struct Arena<'a> {
    project_dir: &'a Path,
    interface_prefix: &'a str,
    nodes: IndexMap<Name, HierarchyNode>,
}

impl<'a> Arena<'a> {
    pub fn new(project_dir: &'a Path, interface_prefix: &'a str) -> Self {
        Self {
            project_dir,
            interface_prefix,
            nodes: IndexMap::new(),
        }
    }

    fn file_ref(&self, path: &Path) -> FileRef {
        FileRef::new(
            project_relative(self.project_dir, path),
            project_absolute(self.project_dir, path),
        )
    }

    /// Registers a scene-backed node for a parsed scene file.
    pub fn add_scene(&mut self, path: &Path, scene: Scene, warnings: &mut Vec<Warning>) {
        let script = scene
            .script()
            .map(|script| self.file_ref(Path::new(resource_to_relative(script.path()))));
        let file = self.file_ref(path);

        let Some(node) = HierarchyNode::from_scene(scene, file, script) else {
            debug!(path:? = path; "Scene has no root node");
            warnings.push(Warning::MissingSceneRoot {
                path: path.to_path_buf(),
            });
            return;
        };

        self.insert(node, warnings);
    }

    /// Groups declarations by source file and registers them.
    ///
    /// A group named like an existing scene-backed node without declarations
    /// is attached to that node. Every other group becomes a code-only node.
    pub fn add_declarations(
        &mut self,
        declarations: &[TypeDeclaration],
        warnings: &mut Vec<Warning>,
    ) {
        let mut groups: IndexMap<PathBuf, Vec<TypeDeclaration>> = IndexMap::new();
        for declaration in declarations {
            groups
                .entry(declaration.file().to_path_buf())
                .or_default()
                .push(declaration.clone());
        }

        for (file, group) in groups {
            let Some(name) = Name::from_file_stem(&file) else {
                debug!(file:? = file; "Declaration file has no usable stem");
                continue;
            };

            if let Some(existing) = self.nodes.get_mut(&name) {
                if existing.is_scene_backed() && !existing.has_declarations() {
                    trace!(name:% = name, file:? = file; "Attaching declarations to scene");
                    existing.attach_declarations(group);
                    continue;
                }
            }

            let node = HierarchyNode::from_declarations(name, self.file_ref(&file), group);
            self.insert(node, warnings);
        }
    }

    fn insert(&mut self, node: HierarchyNode, warnings: &mut Vec<Warning>) {
        match self.nodes.entry(node.name()) {
            Entry::Occupied(kept) => {
                debug!(name:% = node.name(); "Duplicate node name ignored");
                warnings.push(Warning::DuplicateName {
                    name: node.name().to_string(),
                    kept: PathBuf::from(kept.get().file().relative()),
                    ignored: PathBuf::from(node.file().relative()),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(node);
            }
        }
    }

    /// Resolves every node's backing type and hands the nodes to the graph.
    pub fn finalize(mut self) -> HierarchyGraph {
        for node in self.nodes.values_mut() {
            node.finalize(self.interface_prefix);
        }
        debug!(nodes_count = self.nodes.len(); "Arena finalized");
        HierarchyGraph::new(self.nodes)
    }
}
