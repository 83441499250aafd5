//! Recursive rendering of a hierarchy node into diagram blocks.

use std::collections::HashSet;

use scenery_core::{
    declaration::{Member, TypeDeclaration},
    identifier::Name,
};

use super::{
    document::{Block, ClassBlock, Link, MemberLine, PackageBlock, Relation},
    link::LinkStyle,
};
use crate::structure::{ChildEdge, FileRef, HierarchyGraph, HierarchyNode};

/// Renders nodes of one document. Holds no state besides its inputs, so
/// rendering the same graph twice yields the same blocks.
#[derive(Debug)]
pub struct Renderer<'a> {
    graph: &'a HierarchyGraph,
    style: &'a LinkStyle,
    interface_prefix: &'a str,
}

impl<'a> Renderer<'a> {
    pub fn new(graph: &'a HierarchyGraph, style: &'a LinkStyle, interface_prefix: &'a str) -> Self {
        Self {
            graph,
            style,
            interface_prefix,
        }
    }

    /// Renders `node`'s class block, followed by a package of its children
    /// when it has any.
    pub fn render(&self, node: &HierarchyNode) -> Vec<Block> {
        let mut blocks = vec![Block::Class(self.class_block(node))];
        if !node.has_children() {
            return blocks;
        }

        let mut body = Vec::new();
        for child in node.children().keys().filter_map(|name| self.graph.node(*name)) {
            body.extend(self.render(child));
        }
        for (name, edge) in node.children() {
            let Some(child) = self.graph.node(*name) else {
                continue;
            };
            body.push(Block::Relation(Relation {
                from: node.name().to_string(),
                member: self.member_label(node, *name, edge),
                to: name.to_string(),
                extended: child.has_children(),
            }));
        }

        let suffix = if node.is_scene_backed() { "Scene" } else { "Type" };
        blocks.push(Block::Package(PackageBlock {
            name: format!("{}{suffix}", node.name()),
            link: Link::new(self.style.target(node.file())),
            body,
        }));
        blocks
    }

    fn class_block(&self, node: &HierarchyNode) -> ClassBlock {
        let (own_file, own_label) = match node.script() {
            Some(script) => (script, "ScriptFile"),
            None => (node.file(), "SceneFile"),
        };

        let mut sections: Vec<Vec<MemberLine>> = Vec::new();
        let mut linked_children = HashSet::new();

        if let (Some(class), Some(interface)) = (node.backing_type(), node.interface_type()) {
            let mut properties = shared_members(class, interface, Member::is_property);
            properties.sort_by(|a, b| a.name().cmp(b.name()));
            let mut lines = Vec::new();
            for property in properties {
                let mut line = MemberLine::public(self.member_link(node, property, ""));
                let labelled = node.children().iter().find(|(name, edge)| {
                    self.member_label(node, **name, edge).as_deref() == Some(property.name())
                });
                if let Some((name, child)) = labelled.and_then(|(name, _)| {
                    self.graph.node(*name).map(|child| (*name, child))
                }) {
                    line = line.with_child(self.child_link(child));
                    linked_children.insert(name);
                }
                lines.push(line);
            }
            sections.push(lines);

            let mut methods = shared_members(class, interface, Member::is_method);
            methods.sort_by(|a, b| a.name().cmp(b.name()));
            sections.push(
                methods
                    .into_iter()
                    .map(|method| MemberLine::public(self.member_link(node, method, "()")))
                    .collect(),
            );
        }

        let external = node
            .children()
            .iter()
            .filter(|(name, _)| !linked_children.contains(*name))
            .filter_map(|(name, edge)| {
                let child = self.graph.node(*name)?;
                let text = self.external_child_text(node, *name, edge);
                Some(MemberLine::plain(text).with_child(self.child_link(child)))
            })
            .collect();
        sections.push(external);

        ClassBlock {
            name: node.name().to_string(),
            spotted: node.script().is_none(),
            file_link: Link::new(self.style.target(own_file)).with_label(own_label),
            sections,
        }
    }

    /// Label of the member holding `child`: the edge's own label, else the
    /// first property of the backing type whose type names the child.
    fn member_label(&self, node: &HierarchyNode, child: Name, edge: &ChildEdge) -> Option<String> {
        if let Some(label) = edge.label() {
            return Some(label.to_string());
        }
        let child = child.to_string();
        node.backing_type()?
            .properties()
            .find(|property| self.names_type(property.value_type(), &child))
            .map(|property| property.name().to_string())
    }

    fn names_type(&self, type_name: &str, node_name: &str) -> bool {
        type_name == node_name
            || Name::strip_interface_prefix(type_name, self.interface_prefix) == Some(node_name)
    }

    fn external_child_text(&self, node: &HierarchyNode, child: Name, edge: &ChildEdge) -> String {
        let property = self
            .member_label(node, child, edge)
            .and_then(|label| node.backing_type()?.find_property(&label));
        if let Some(property) = property {
            return self.member_link(node, property, "");
        }

        let child = child.to_string();
        let instance = node.scene_root().and_then(|root| {
            root.all_children()
                .find(|descendant| descendant.type_name() == child)
        });
        match instance {
            Some(descendant) => descendant.name().to_string(),
            None => child,
        }
    }

    /// `[[<script>:<line> <Name><suffix>]]`
    fn member_link(&self, node: &HierarchyNode, member: &Member, suffix: &str) -> String {
        let file = node.script().unwrap_or(node.file());
        Link::new(self.style.target(file))
            .with_line(member.line())
            .with_label(format!("{}{suffix}", member.name()))
            .to_string()
    }

    fn child_link(&self, child: &HierarchyNode) -> Link {
        let (file, label): (&FileRef, _) = match child.script() {
            Some(script) => (script, "Script"),
            None => (child.file(), "Scene"),
        };
        Link::new(self.style.target(file)).with_label(label)
    }
}

/// Members of `class` that `interface` declares as well, matched by name and kind.
fn shared_members<'d>(
    class: &'d TypeDeclaration,
    interface: &TypeDeclaration,
    kind: fn(&Member) -> bool,
) -> Vec<&'d Member> {
    class
        .members()
        .iter()
        .filter(|member| kind(member))
        .filter(|member| {
            interface
                .members()
                .iter()
                .any(|declared| kind(declared) && declared.name() == member.name())
        })
        .collect()
}
