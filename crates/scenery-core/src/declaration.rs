//! Declared-type metadata.
//!
//! Declarations describe the classes and interfaces behind scenes and
//! code-only hierarchy nodes. They are deserialized from the project manifest
//! and grouped by source file when the hierarchy graph is built.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Kind of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Class,
    Record,
    Struct,
    Interface,
}

impl DeclarationKind {
    /// Returns true for kinds that can back a hierarchy node.
    pub fn is_class_like(self) -> bool {
        matches!(self, Self::Class | Self::Record | Self::Struct)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Record => "record",
            Self::Struct => "struct",
            Self::Interface => "interface",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Property,
    Method,
}

/// Diagram opt-in marker attached to a declared type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DiagramMarker {
    use_absolute_ide_links: bool,
}

impl DiagramMarker {
    pub fn new(use_absolute_ide_links: bool) -> Self {
        Self {
            use_absolute_ide_links,
        }
    }

    pub fn use_absolute_ide_links(&self) -> bool {
        self.use_absolute_ide_links
    }
}

/// A property or method of a declared type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Member {
    kind: MemberKind,
    name: String,
    #[serde(rename = "type", default)]
    type_name: String,
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    attributes: Vec<String>,
}

impl Member {
    pub fn property(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            kind: MemberKind::Property,
            name: name.into(),
            type_name: type_name.into(),
            line: None,
            attributes: Vec::new(),
        }
    }

    pub fn method(name: impl Into<String>) -> Self {
        Self {
            kind: MemberKind::Method,
            name: name.into(),
            type_name: String::new(),
            line: None,
            attributes: Vec::new(),
        }
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    pub fn is_property(&self) -> bool {
        self.kind == MemberKind::Property
    }

    pub fn is_method(&self) -> bool {
        self.kind == MemberKind::Method
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type as written, nullable marker included.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Declared type with a trailing nullable `?` removed.
    pub fn value_type(&self) -> &str {
        self.type_name.strip_suffix('?').unwrap_or(&self.type_name)
    }

    /// 1-based source line, when known.
    pub fn line(&self) -> Option<u32> {
        self.line
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Returns true when decorated with `attribute`, written either bare or
    /// with the `Attribute` suffix.
    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes.iter().any(|a| {
            a == attribute || a.strip_suffix("Attribute").is_some_and(|bare| bare == attribute)
        })
    }
}

/// A class, record, struct or interface declared in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TypeDeclaration {
    name: String,
    kind: DeclarationKind,
    file: PathBuf,
    #[serde(default)]
    members: Vec<Member>,
    #[serde(default)]
    diagram: Option<DiagramMarker>,
}

impl TypeDeclaration {
    pub fn new(name: impl Into<String>, kind: DeclarationKind, file: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            kind,
            file: file.into(),
            members: Vec::new(),
            diagram: None,
        }
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_diagram(mut self, marker: DiagramMarker) -> Self {
        self.diagram = Some(marker);
        self
    }

    /// Replaces the source path, e.g. after resolving it against a base directory.
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = file.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DeclarationKind {
        self.kind
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn diagram(&self) -> Option<&DiagramMarker> {
        self.diagram.as_ref()
    }

    pub fn properties(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(|m| m.is_property())
    }

    pub fn methods(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(|m| m.is_method())
    }

    pub fn find_property(&self, name: &str) -> Option<&Member> {
        self.properties().find(|m| m.name == name)
    }

    pub fn find_method(&self, name: &str) -> Option<&Member> {
        self.methods().find(|m| m.name == name)
    }
}
