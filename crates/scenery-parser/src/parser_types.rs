//! Syntax tree produced by the [`parser`](super::parser).

use crate::span::Spanned;

/// A value on the right-hand side of `key = value`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'src> {
    String(String),
    StringName(String),
    NodePath(String),
    Number(f64),
    Bool(bool),
    Null,
    /// Any other bare word
    Identifier(&'src str),
    /// Constructor call such as `ExtResource("1_abc")` or `Vector3(0, 0, 1)`.
    /// Typed collections carry their element types: `Array[int]([1, 2])`.
    Call {
        name: &'src str,
        type_args: Vec<Spanned<Value<'src>>>,
        args: Vec<Spanned<Value<'src>>>,
    },
    /// `Object(InputEventKey, "keycode": 4194309, ...)`
    Object {
        class: &'src str,
        properties: Vec<(Spanned<Value<'src>>, Spanned<Value<'src>>)>,
    },
    Array(Vec<Spanned<Value<'src>>>),
    Dictionary(Vec<(Spanned<Value<'src>>, Spanned<Value<'src>>)>),
}

impl<'src> Value<'src> {
    /// Returns the text of any quoted value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::StringName(s) | Value::NodePath(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the resource id referenced by `ExtResource(...)`.
    ///
    /// Both quoted ids and the bare numeric ids of older files are accepted.
    pub fn ext_resource_id(&self) -> Option<String> {
        match self {
            Value::Call { name, args, .. } if *name == "ExtResource" => match args.as_slice() {
                [arg] => arg.scalar_text(),
                _ => None,
            },
            _ => None,
        }
    }

    /// Returns the elements of an array value.
    pub fn as_array(&self) -> Option<&[Spanned<Value<'src>>]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Renders quoted, numeric and bare scalar values as text.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Value::String(s) | Value::StringName(s) | Value::NodePath(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Identifier(word) => Some((*word).to_string()),
            _ => None,
        }
    }
}

/// `key = value`, either inside a section header or on a body line.
#[derive(Debug, Clone, PartialEq)]
pub struct Property<'src> {
    pub key: Spanned<&'src str>,
    pub value: Spanned<Value<'src>>,
}

/// `[tag key=value ...]` followed by its body lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Section<'src> {
    pub tag: Spanned<&'src str>,
    pub attributes: Vec<Property<'src>>,
    pub properties: Vec<Property<'src>>,
}

impl<'src> Section<'src> {
    /// Looks up a header attribute.
    pub fn attribute(&self, key: &str) -> Option<&Property<'src>> {
        self.attributes.iter().find(|p| *p.key.inner() == key)
    }

    /// Looks up a header attribute, then a body property.
    pub fn lookup(&self, key: &str) -> Option<&Property<'src>> {
        self.attribute(key)
            .or_else(|| self.properties.iter().find(|p| *p.key.inner() == key))
    }
}

/// A whole scene or resource file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct File<'src> {
    pub sections: Vec<Section<'src>>,
}
