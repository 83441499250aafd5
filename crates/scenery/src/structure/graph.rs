//! The finished hierarchy graph: edge wiring and the cycle check.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, trace};
use petgraph::{algo::toposort, graph::DiGraph};

use scenery_core::{declaration::TypeDeclaration, identifier::Name};

use super::node::{ChildEdge, HierarchyNode};
use crate::{config::AnalysisConfig, error::SceneryError};

/// All hierarchy nodes of a pass, keyed by name in registration order.
#[derive(Debug)]
pub struct HierarchyGraph {
    nodes: IndexMap<Name, HierarchyNode>,
}

impl HierarchyGraph {
    pub(super) fn new(nodes: IndexMap<Name, HierarchyNode>) -> Self {
        Self { nodes }
    }

    pub fn node(&self, name: Name) -> Option<&HierarchyNode> {
        self.nodes.get(&name)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.nodes.values()
    }

    /// Nodes without parents, in registration order.
    pub fn roots(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.nodes.values().filter(|node| node.is_root())
    }

    /// Resolves a declared type name to another node of the graph.
    ///
    /// The type itself is tried first, then the type with the interface
    /// prefix removed.
    pub fn resolve_type(&self, type_name: &str, interface_prefix: &str) -> Option<Name> {
        std::iter::once(type_name)
            .chain(Name::strip_interface_prefix(type_name, interface_prefix))
            .filter(|candidate| !candidate.is_empty())
            .map(Name::new)
            .find(|candidate| self.nodes.contains_key(candidate))
    }

    /// Computes and writes every child edge, then derives the parent sets.
    ///
    /// Edges are planned against the read-only node set first and written
    /// afterwards, so wiring order does not affect the result.
    pub fn wire(&mut self, analysis: &AnalysisConfig) {
        let planned: Vec<(Name, IndexMap<Name, ChildEdge>)> = self
            .nodes
            .values()
            .map(|node| (node.name(), self.plan_edges(node, analysis)))
            .collect();

        for (parent, edges) in planned {
            let Some(node) = self.nodes.get_mut(&parent) else {
                continue;
            };
            for (child, edge) in edges {
                trace!(parent:% = parent, child:% = child, origin:? = edge.origin(); "Wiring edge");
                node.add_child(child, edge);
            }
        }

        let links: Vec<(Name, Name)> = self
            .nodes
            .values()
            .flat_map(|node| node.children().keys().map(move |child| (node.name(), *child)))
            .collect();
        for (parent, child) in links {
            if let Some(node) = self.nodes.get_mut(&child) {
                node.add_parent(parent);
            }
        }

        debug!(edges_count = self.nodes.values().map(|n| n.children().len()).sum::<usize>(); "Graph wired");
    }

    fn plan_edges(&self, node: &HierarchyNode, analysis: &AnalysisConfig) -> IndexMap<Name, ChildEdge> {
        let mut edges = IndexMap::new();

        // Scene containment, at any depth of the tree.
        if let Some(root) = node.scene_root() {
            for descendant in root.all_children() {
                let child = Name::new(descendant.name());
                if child != node.name()
                    && self.nodes.contains_key(&child)
                    && !edges.contains_key(&child)
                {
                    edges.insert(child, ChildEdge::scene_containment());
                }
            }
        }

        // Declared members of the backing type.
        let properties = node
            .backing_type()
            .into_iter()
            .flat_map(TypeDeclaration::properties)
            .filter(|property| !property.has_attribute(analysis.skip_attribute()));
        for property in properties {
            let Some(child) =
                self.resolve_type(property.value_type(), analysis.interface_prefix())
            else {
                continue;
            };
            if child != node.name() && !edges.contains_key(&child) {
                edges.insert(child, ChildEdge::declared_member(property.name()));
            }
        }

        edges
    }

    /// Fails with [`SceneryError::Cycle`] if the child edges form a cycle.
    pub fn check_acyclic(&self) -> Result<(), SceneryError> {
        let mut graph = DiGraph::<Name, ()>::new();
        let indices: HashMap<Name, _> = self
            .nodes
            .keys()
            .map(|name| (*name, graph.add_node(*name)))
            .collect();

        for node in self.nodes.values() {
            for child in node.children().keys() {
                if let (Some(&source), Some(&target)) =
                    (indices.get(&node.name()), indices.get(child))
                {
                    graph.add_edge(source, target, ());
                }
            }
        }

        toposort(&graph, None).map(|_| ()).map_err(|cycle| {
            let name = graph[cycle.node_id()];
            debug!(name:% = name; "Cycle detected");
            SceneryError::Cycle(name.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use indexmap::IndexMap;
    use proptest::prelude::*;
    use scenery_core::{
        declaration::{DeclarationKind, Member},
        scene::{Scene, SceneNode},
    };

    use super::*;
    use crate::structure::{arena::Arena, node::EdgeOrigin};

    fn scene(root: SceneNode) -> Scene {
        Scene::new(Some(root), IndexMap::new(), IndexMap::new())
    }

    fn leaf_scene(name: &str) -> Scene {
        scene(SceneNode::new(name, "Node"))
    }

    fn build(
        scenes: Vec<(&str, Scene)>,
        declarations: Vec<TypeDeclaration>,
    ) -> HierarchyGraph {
        let mut arena = Arena::new(Path::new("/game"), "I");
        let mut warnings = Vec::new();
        for (path, scene) in scenes {
            arena.add_scene(Path::new(path), scene, &mut warnings);
        }
        arena.add_declarations(&declarations, &mut warnings);
        let mut graph = arena.finalize();
        graph.wire(&AnalysisConfig::default());
        graph
    }

    fn world_scene() -> Scene {
        let mut root = SceneNode::new("World", "Node3D");
        root.push_child(SceneNode::new("Camera", "Camera").with_parent_path("."));
        let mut ui = SceneNode::new("UI", "Control").with_parent_path(".");
        ui.push_child(SceneNode::new("WorldUI", "WorldUI").with_parent_path("UI"));
        root.push_child(ui);
        root.push_child(SceneNode::new("Player", "Player").with_parent_path("."));
        scene(root)
    }

    fn child_names(graph: &HierarchyGraph, name: &str) -> Vec<String> {
        graph
            .node(Name::new(name))
            .expect("node exists")
            .children()
            .keys()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_scene_containment_at_any_depth() {
        let graph = build(
            vec![
                ("World/World.tscn", world_scene()),
                ("Camera/Camera.tscn", leaf_scene("Camera")),
                ("Player/Player.tscn", leaf_scene("Player")),
                ("WorldUI/WorldUI.tscn", leaf_scene("WorldUI")),
            ],
            Vec::new(),
        );

        assert_eq!(child_names(&graph, "World"), ["Camera", "WorldUI", "Player"]);
        let world = graph.node(Name::new("World")).expect("node exists");
        assert!(world.children().values().all(|edge| edge.label().is_none()));

        let roots: Vec<String> = graph.roots().map(|n| n.name().to_string()).collect();
        assert_eq!(roots, ["World"]);
        let player = graph.node(Name::new("Player")).expect("node exists");
        assert!(!player.is_root());
    }

    #[test]
    fn test_duplicate_scene_contributes_no_edges() {
        let mut armed = SceneNode::new("Player", "CharacterBody3D");
        armed.push_child(SceneNode::new("Sword", "Sword").with_parent_path("."));

        let graph = build(
            vec![
                ("A/Player.tscn", leaf_scene("Player")),
                ("B/Player.tscn", scene(armed)),
                ("Sword/Sword.tscn", leaf_scene("Sword")),
            ],
            Vec::new(),
        );

        assert!(child_names(&graph, "Player").is_empty());
        let sword = graph.node(Name::new("Sword")).expect("node exists");
        assert!(sword.is_root());
        let roots: Vec<String> = graph.roots().map(|n| n.name().to_string()).collect();
        assert_eq!(roots, ["Player", "Sword"]);
    }

    #[test]
    fn test_declared_member_edge_strips_interface_prefix() {
        let graph = build(
            Vec::new(),
            vec![
                TypeDeclaration::new("Game", DeclarationKind::Class, "Game/Game.cs")
                    .with_member(Member::property("Player", "IPlayer?"))
                    .with_member(Member::property("Score", "int")),
                TypeDeclaration::new("Player", DeclarationKind::Class, "Player/Player.cs"),
            ],
        );

        let game = graph.node(Name::new("Game")).expect("node exists");
        let edge = &game.children()[&Name::new("Player")];
        assert_eq!(edge.label(), Some("Player"));
        assert_eq!(edge.origin(), EdgeOrigin::DeclaredMember);
        assert_eq!(game.children().len(), 1);
    }

    #[test]
    fn test_skip_attribute_prevents_edge() {
        let graph = build(
            Vec::new(),
            vec![
                TypeDeclaration::new("Game", DeclarationKind::Class, "Game/Game.cs").with_member(
                    Member::property("Repo", "IGameRepo").with_attribute("Dependency"),
                ),
                TypeDeclaration::new("GameRepo", DeclarationKind::Class, "Game/GameRepo.cs"),
            ],
        );

        assert!(child_names(&graph, "Game").is_empty());
        assert_eq!(graph.roots().count(), 2);
    }

    #[test]
    fn test_scene_edge_wins_over_member_edge() {
        let graph = build(
            vec![
                ("World/World.tscn", world_scene()),
                ("Player/Player.tscn", leaf_scene("Player")),
            ],
            vec![
                TypeDeclaration::new("World", DeclarationKind::Class, "World/World.cs")
                    .with_member(Member::property("MainPlayer", "IPlayer")),
            ],
        );

        let world = graph.node(Name::new("World")).expect("node exists");
        let edge = &world.children()[&Name::new("Player")];
        assert_eq!(edge.origin(), EdgeOrigin::SceneContainment);
        assert_eq!(edge.label(), None);
    }

    #[test]
    fn test_unmatched_property_type_is_not_wired() {
        let graph = build(
            Vec::new(),
            vec![
                TypeDeclaration::new("Game", DeclarationKind::Class, "Game.cs")
                    .with_member(Member::property("Missing", "IMissing")),
            ],
        );

        assert!(child_names(&graph, "Game").is_empty());
    }

    #[test]
    fn test_self_reference_is_not_wired() {
        let graph = build(
            Vec::new(),
            vec![
                TypeDeclaration::new("Node", DeclarationKind::Class, "Node.cs")
                    .with_member(Member::property("Next", "Node")),
            ],
        );

        assert!(child_names(&graph, "Node").is_empty());
        assert!(graph.check_acyclic().is_ok());
    }

    #[test]
    fn test_cycle_is_detected() {
        let graph = build(
            Vec::new(),
            vec![
                TypeDeclaration::new("A", DeclarationKind::Class, "A.cs")
                    .with_member(Member::property("B", "B")),
                TypeDeclaration::new("B", DeclarationKind::Class, "B.cs")
                    .with_member(Member::property("A", "IA")),
            ],
        );

        match graph.check_acyclic() {
            Err(SceneryError::Cycle(name)) => assert!(name == "A" || name == "B"),
            other => panic!("expected cycle, got {other:?}"),
        }
        assert_eq!(graph.roots().count(), 0);
    }

    #[test]
    fn test_resolve_type() {
        let graph = build(Vec::new(), vec![TypeDeclaration::new(
            "Inventory",
            DeclarationKind::Class,
            "Inventory.cs",
        )]);

        assert_eq!(graph.resolve_type("Inventory", "I"), Some(Name::new("Inventory")));
        assert_eq!(graph.resolve_type("IInventory", "I"), Some(Name::new("Inventory")));
        assert_eq!(graph.resolve_type("Other", "I"), None);
        assert_eq!(graph.resolve_type("", "I"), None);
    }

    proptest! {
        #[test]
        fn wiring_twice_equals_wiring_once(
            edges in prop::collection::vec((0usize..6, 0usize..6), 0..12)
        ) {
            let declarations: Vec<TypeDeclaration> = (0..6)
                .map(|idx| {
                    let name = format!("Type{idx}");
                    let mut decl = TypeDeclaration::new(
                        name.clone(),
                        DeclarationKind::Class,
                        format!("{name}.cs"),
                    );
                    for (member_idx, (parent, child)) in edges.iter().enumerate() {
                        if *parent == idx {
                            decl = decl.with_member(Member::property(
                                format!("P{member_idx}"),
                                format!("IType{child}"),
                            ));
                        }
                    }
                    decl
                })
                .collect();

            let mut graph = build(Vec::new(), declarations);
            let snapshot: Vec<(String, Vec<(String, Option<String>)>, bool)> = graph
                .nodes()
                .map(|node| {
                    let children = node
                        .children()
                        .iter()
                        .map(|(name, edge)| (name.to_string(), edge.label().map(str::to_string)))
                        .collect();
                    (node.name().to_string(), children, node.is_root())
                })
                .collect();

            graph.wire(&AnalysisConfig::default());
            let rewired: Vec<(String, Vec<(String, Option<String>)>, bool)> = graph
                .nodes()
                .map(|node| {
                    let children = node
                        .children()
                        .iter()
                        .map(|(name, edge)| (name.to_string(), edge.label().map(str::to_string)))
                        .collect();
                    (node.name().to_string(), children, node.is_root())
                })
                .collect();

            prop_assert_eq!(snapshot, rewired);
        }
    }
}
