//! Elaboration of parsed sections into a [`Scene`].
//!
//! The elaborator walks sections in file order. `ext_resource` sections fill
//! the script and resource registries; `node` sections build the node tree.
//! Everything else (`gd_scene`, `sub_resource`, `connection`, ...) is ignored.
//!
//! Problems found here never abort parsing: a node whose parent cannot be
//! found, a second root or a repeated resource id is reported as a warning
//! and the offending entry is dropped.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, trace};

use scenery_core::scene::{ExtResource, Scene, SceneNode, Script, class_name_from_path};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    parser_types::{File, Section},
    span::Span,
};

/// A node waiting for the tree to be assembled.
struct PendingNode {
    node: Option<SceneNode>,
    children: Vec<usize>,
}

/// Builds a [`Scene`] from the sections of one file.
pub(crate) struct Builder {
    scripts: IndexMap<String, Script>,
    ext_resources: IndexMap<String, ExtResource>,
    resource_spans: HashMap<String, Span>,
    nodes: Vec<PendingNode>,
    by_full_name: HashMap<String, usize>,
    root: Option<(usize, Span)>,
    diagnostics: DiagnosticCollector,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            scripts: IndexMap::new(),
            ext_resources: IndexMap::new(),
            resource_spans: HashMap::new(),
            nodes: Vec::new(),
            by_full_name: HashMap::new(),
            root: None,
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// Elaborate every section and return the scene with its warnings.
    pub fn build(mut self, file: &File<'_>) -> Result<(Scene, Vec<Diagnostic>), ParseError> {
        for section in &file.sections {
            match *section.tag.inner() {
                "ext_resource" => self.ext_resource(section),
                "node" => self.node(section),
                tag => trace!(tag = tag; "Ignoring section"),
            }
        }

        let root = self.root.and_then(|(index, _)| self.assemble(index));
        let scene = Scene::new(root, self.scripts, self.ext_resources);
        let warnings = self.diagnostics.finish()?;
        Ok((scene, warnings))
    }

    fn ext_resource(&mut self, section: &Section<'_>) {
        let (Some(kind), Some(path), Some(id)) = (
            attribute_text(section, "type"),
            attribute_text(section, "path").filter(|p| !p.is_empty()),
            attribute_text(section, "id").filter(|i| !i.is_empty()),
        ) else {
            debug!("Skipping external resource without type, path or id");
            return;
        };

        let id_span = section
            .attribute("id")
            .map_or(section.tag.span(), |p| p.value.span());

        if let Some(first) = self.resource_spans.get(&id) {
            self.diagnostics.emit(
                Diagnostic::warning(format!("duplicate external resource id `{id}`"))
                    .with_code(ErrorCode::E202)
                    .with_label(id_span, "duplicate id")
                    .with_secondary_label(*first, "first declared here")
                    .with_help("the first resource with this id is kept"),
            );
            return;
        }
        self.resource_spans.insert(id.clone(), id_span);

        if kind == "Script" {
            self.scripts.insert(id, Script::from_path(path));
        } else {
            let uid = attribute_text(section, "uid").filter(|u| !u.is_empty());
            self.ext_resources
                .insert(id.clone(), ExtResource::new(uid, id, kind, path));
        }
    }

    /// Resolves the node type: script class, then literal type, then the
    /// class of the instanced scene.
    fn resolve_type(&self, section: &Section<'_>) -> (Option<Script>, Option<String>) {
        let script = section
            .lookup("script")
            .and_then(|p| p.value.ext_resource_id())
            .and_then(|id| self.scripts.get(&id))
            .cloned();
        if let Some(script) = script {
            let type_name = script.class_name().to_string();
            return (Some(script), Some(type_name));
        }

        let literal = section
            .lookup("type")
            .and_then(|p| p.value.as_str())
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        if literal.is_some() {
            return (None, literal);
        }

        let instanced = section
            .lookup("instance")
            .and_then(|p| p.value.ext_resource_id())
            .and_then(|id| self.ext_resources.get(&id))
            .map(|resource| class_name_from_path(resource.path()))
            .filter(|t| !t.is_empty());
        (None, instanced)
    }

    fn node(&mut self, section: &Section<'_>) {
        let Some(name) = section
            .lookup("name")
            .and_then(|p| p.value.as_str())
            .filter(|n| !n.is_empty())
        else {
            debug!("Skipping node section without a name");
            return;
        };

        let (script, type_name) = self.resolve_type(section);
        let Some(type_name) = type_name else {
            debug!(name = name; "Skipping node without a resolvable type");
            return;
        };

        let groups: Vec<String> = section
            .lookup("groups")
            .and_then(|p| p.value.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str())
                    .filter(|g| !g.trim().is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let node = SceneNode::new(name, type_name)
            .with_script(script)
            .with_groups(groups);

        let Some(parent) = section.lookup("parent") else {
            self.add_root(node, section);
            return;
        };

        let parent_path = parent.value.as_str().unwrap_or_default();
        let parent_index = if parent_path == "." {
            self.root.map(|(index, _)| index)
        } else {
            self.by_full_name.get(parent_path).copied()
        };

        let Some(parent_index) = parent_index else {
            self.diagnostics.emit(
                Diagnostic::warning(format!(
                    "could not find parent node `{parent_path}` for node `{name}`"
                ))
                .with_code(ErrorCode::E200)
                .with_label(parent.value.span(), "unknown parent path")
                .with_help("the node is dropped from the scene tree"),
            );
            return;
        };

        let node = node.with_parent_path(parent_path);
        let full_name = node.full_name();
        let index = self.push(node);
        self.nodes[parent_index].children.push(index);
        self.by_full_name.entry(full_name).or_insert(index);
    }

    fn add_root(&mut self, node: SceneNode, section: &Section<'_>) {
        let span = section
            .lookup("name")
            .map_or(section.tag.span(), |p| p.value.span());

        if let Some((_, first)) = self.root {
            self.diagnostics.emit(
                Diagnostic::warning(format!(
                    "node `{}` has no parent but the scene already has a root",
                    node.name()
                ))
                .with_code(ErrorCode::E201)
                .with_label(span, "second root node")
                .with_secondary_label(first, "root declared here")
                .with_help("add a `parent` attribute; the node is ignored"),
            );
            return;
        }

        let index = self.push(node);
        self.root = Some((index, span));
    }

    fn push(&mut self, node: SceneNode) -> usize {
        self.nodes.push(PendingNode {
            node: Some(node),
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    /// Moves pending nodes into their parents, depth first.
    fn assemble(&mut self, index: usize) -> Option<SceneNode> {
        let mut node = self.nodes[index].node.take()?;
        let children = std::mem::take(&mut self.nodes[index].children);
        for child in children {
            if let Some(child) = self.assemble(child) {
                node.push_child(child);
            }
        }
        Some(node)
    }
}

/// Text of a header attribute, for string, numeric and bare values.
fn attribute_text(section: &Section<'_>, key: &str) -> Option<String> {
    section.attribute(key).and_then(|p| p.value.scalar_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::tokenize, parser::build_file};

    fn elaborate(source: &str) -> (Scene, Vec<Diagnostic>) {
        let tokens = tokenize(source).expect("tokenize");
        let file = build_file(&tokens).expect("parse");
        Builder::new().build(&file).expect("elaborate")
    }

    #[test]
    fn test_registries() {
        let (scene, warnings) = elaborate(
            r#"
[ext_resource type="Script" path="res://World/World.cs" id="1_a"]
[ext_resource type="PackedScene" uid="uid://b" path="res://Camera/Camera.tscn" id="2_b"]
[ext_resource type="Texture2D" path="res://icon.svg" id="3_c"]
"#,
        );
        assert!(warnings.is_empty());
        assert_eq!(scene.scripts().len(), 1);
        assert_eq!(scene.scripts()["1_a"].class_name(), "World");
        let ids: Vec<_> = scene.ext_resources().keys().map(String::as_str).collect();
        assert_eq!(ids, ["2_b", "3_c"]);
        assert_eq!(scene.ext_resources()["2_b"].uid(), Some("uid://b"));
        assert_eq!(scene.ext_resources()["3_c"].uid(), None);
    }

    #[test]
    fn test_type_priority() {
        let (scene, _) = elaborate(
            r#"
[ext_resource type="Script" path="res://game_root.gd" id="1"]
[ext_resource type="PackedScene" path="res://Enemy/enemy_boss.tscn" id="2"]

[node name="Root" type="Node"]
script = ExtResource("1")

[node name="Light" type="OmniLight3D" parent="."]

[node name="Boss" parent="." instance=ExtResource("2")]
"#,
        );
        let root = scene.root().expect("root");
        assert_eq!(root.type_name(), "GameRoot");
        assert_eq!(scene.script().map(Script::path), Some("res://game_root.gd"));

        let types: Vec<_> = root.children().iter().map(SceneNode::type_name).collect();
        assert_eq!(types, ["OmniLight3D", "EnemyBoss"]);
    }

    #[test]
    fn test_unresolved_script_falls_back_to_type() {
        let (scene, _) = elaborate("[node name=\"Root\" type=\"Node2D\"]\nscript = ExtResource(\"9\")\n");
        assert_eq!(scene.root().map(SceneNode::type_name), Some("Node2D"));
        assert!(scene.script().is_none());
    }

    #[test]
    fn test_node_without_type_is_skipped() {
        let (scene, warnings) = elaborate(
            r#"
[node name="Root" type="Node"]
[node name="Camera" parent="." index="0"]
"#,
        );
        assert!(warnings.is_empty());
        assert!(scene.root().expect("root").children().is_empty());
    }

    #[test]
    fn test_nested_parents_and_groups() {
        let (scene, _) = elaborate(
            r#"
[node name="Root" type="Node"]
[node name="Camera" type="Node3D" parent="."]
[node name="Rig" type="Node3D" parent="Camera" groups=["rigs", "", "cameras"]]
[node name="Lens" type="Camera3D" parent="Camera/Rig"]
"#,
        );
        let root = scene.root().expect("root");
        let lens = root.select_child("Camera/Rig/Lens").expect("lens");
        assert_eq!(lens.full_name(), "Camera/Rig/Lens");

        let rig = root.select_child("Camera/Rig").expect("rig");
        let groups: Vec<_> = rig.groups().iter().map(String::as_str).collect();
        assert_eq!(groups, ["rigs", "cameras"]);
    }

    #[test]
    fn test_missing_parent_warns_and_drops() {
        let (scene, warnings) = elaborate(
            r#"
[node name="Root" type="Node"]
[node name="Lens" type="Camera3D" parent="Camera/Rig"]
"#,
        );
        assert!(scene.root().expect("root").children().is_empty());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code(), Some(ErrorCode::E200));
        assert!(warnings[0].severity().is_warning());
    }

    #[test]
    fn test_second_root_is_ignored() {
        let (scene, warnings) = elaborate(
            r#"
[node name="Root" type="Node"]
[node name="Other" type="Node"]
"#,
        );
        assert_eq!(scene.root().map(SceneNode::name), Some("Root"));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code(), Some(ErrorCode::E201));
        assert_eq!(warnings[0].labels().len(), 2);
    }

    #[test]
    fn test_duplicate_resource_id_first_wins() {
        let (scene, warnings) = elaborate(
            r#"
[ext_resource type="Script" path="res://a.cs" id="1"]
[ext_resource type="Script" path="res://b.cs" id="1"]
"#,
        );
        assert_eq!(scene.scripts()["1"].class_name(), "A");
        assert_eq!(warnings[0].code(), Some(ErrorCode::E202));
    }

    #[test]
    fn test_no_node_sections_means_no_root() {
        let (scene, warnings) = elaborate("[gd_resource type=\"Theme\" format=3]\n");
        assert!(scene.root().is_none());
        assert!(warnings.is_empty());
    }
}
