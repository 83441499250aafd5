//! Structured PlantUML document tree.
//!
//! The renderer builds [`Block`]s; text only appears in [`Document::to_text`].

use std::fmt::{self, Write};

/// Spot drawn on classes that have no backing script.
const SCENE_SPOT: &str = "<< (S,black) >>";

/// A `[[target label]]` hyperlink, with an optional `:line` suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    target: String,
    line: Option<u32>,
    label: Option<String>,
}

impl Link {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            line: None,
            label: None,
        }
    }

    pub fn with_line(mut self, line: Option<u32>) -> Self {
        self.line = line;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[[{}", self.target)?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
        }
        if let Some(label) = &self.label {
            write!(f, " {label}")?;
        }
        f.write_str("]]")
    }
}

/// One line inside a class body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberLine {
    public: bool,
    text: String,
    child: Option<Link>,
}

impl MemberLine {
    /// A public member, rendered with a leading `+`.
    pub fn public(text: impl Into<String>) -> Self {
        Self {
            public: true,
            text: text.into(),
            child: None,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            public: false,
            text: text.into(),
            child: None,
        }
    }

    /// Appends ` - <link>` pointing at the child the member refers to.
    pub fn with_child(mut self, child: Link) -> Self {
        self.child = Some(child);
        self
    }
}

impl fmt::Display for MemberLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.public {
            f.write_str("+ ")?;
        }
        f.write_str(&self.text)?;
        if let Some(child) = &self.child {
            write!(f, " - {child}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassBlock {
    pub name: String,
    pub spotted: bool,
    pub file_link: Link,
    /// Sections separated by `--`, in order. Empty sections are not written.
    pub sections: Vec<Vec<MemberLine>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageBlock {
    pub name: String,
    pub link: Link,
    pub body: Vec<Block>,
}

/// `Parent[::member] -->[-] Child`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub from: String,
    pub member: Option<String>,
    pub to: String,
    /// The child has children of its own.
    pub extended: bool,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.from)?;
        if let Some(member) = &self.member {
            write!(f, "::{member}")?;
        }
        let arrow = if self.extended { "--->" } else { "-->" };
        write!(f, " {arrow} {}", self.to)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Class(ClassBlock),
    Package(PackageBlock),
    Relation(Relation),
}

impl Block {
    fn write_to(&self, out: &mut String, indent: usize) -> fmt::Result {
        let pad = "\t".repeat(indent);
        match self {
            Block::Class(class) => {
                write!(out, "{pad}class {}", class.name)?;
                if class.spotted {
                    write!(out, " {SCENE_SPOT}")?;
                }
                writeln!(out, " {{")?;
                writeln!(out, "{pad}\t{}", class.file_link)?;
                for section in class.sections.iter().filter(|s| !s.is_empty()) {
                    writeln!(out, "{pad}\t--")?;
                    for line in section {
                        writeln!(out, "{pad}\t{line}")?;
                    }
                }
                writeln!(out, "{pad}}}")
            }
            Block::Package(package) => {
                writeln!(out, "{pad}package {} {} {{", package.name, package.link)?;
                for block in &package.body {
                    block.write_to(out, indent + 1)?;
                }
                writeln!(out, "{pad}}}")
            }
            Block::Relation(relation) => writeln!(out, "{pad}{relation}"),
        }
    }
}

/// A complete diagram document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Serializes the document between `@startuml` and `@enduml`.
    pub fn to_text(&self) -> String {
        let mut out = String::from("@startuml\n");
        for block in &self.blocks {
            // Writing into a String cannot fail.
            let _ = block.write_to(&mut out, 0);
        }
        out.push_str("@enduml\n");
        out
    }
}
