//! Hierarchy node names backed by a global string interner.
//!
//! Every scene file and declaration group becomes a node keyed by a [`Name`].
//! Names are compared and hashed constantly while wiring the graph, so they
//! are interned once and copied around as symbols.
//!
//! The interface naming convention (`I<Name>`) lives here too, so that the
//! rest of the workspace resolves interfaces through a single seam.

use std::{
    fmt,
    path::Path,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for node names.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn with_interner<R>(f: impl FnOnce(&mut DefaultStringInterner) -> R) -> R {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock");
    f(&mut interner)
}

/// Interned name of a hierarchy node.
///
/// # Examples
///
/// ```
/// use scenery_core::identifier::Name;
///
/// let world = Name::new("World");
/// assert_eq!(world, "World");
/// assert_eq!(world.interface_name("I"), "IWorld");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Name(DefaultSymbol);

impl Name {
    /// Creates a `Name` from a string slice, interning it if needed.
    pub fn new(name: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(name)))
    }

    /// Creates a `Name` from the file stem of `path`.
    ///
    /// Returns `None` when the path has no stem or the stem is not valid UTF-8.
    ///
    /// ```
    /// use std::path::Path;
    /// use scenery_core::identifier::Name;
    ///
    /// let name = Name::from_file_stem(Path::new("Player/Player.cs")).unwrap();
    /// assert_eq!(name, "Player");
    /// ```
    pub fn from_file_stem(path: &Path) -> Option<Self> {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .map(Self::new)
    }

    /// Returns the conventional interface name for this node: `prefix` + name.
    pub fn interface_name(&self, prefix: &str) -> String {
        format!("{prefix}{self}")
    }

    /// Strips the interface convention prefix from a declared type name.
    ///
    /// The prefix only counts when it is followed by an upper-case letter, so
    /// `IPlayer` yields `Player` while `Inventory` is left alone.
    ///
    /// ```
    /// use scenery_core::identifier::Name;
    ///
    /// assert_eq!(Name::strip_interface_prefix("IPlayer", "I"), Some("Player"));
    /// assert_eq!(Name::strip_interface_prefix("Inventory", "I"), None);
    /// ```
    pub fn strip_interface_prefix<'a>(type_name: &'a str, prefix: &str) -> Option<&'a str> {
        if prefix.is_empty() {
            return None;
        }
        let rest = type_name.strip_prefix(prefix)?;
        rest.chars()
            .next()
            .filter(|c| c.is_uppercase())
            .map(|_| rest)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = with_interner(|interner| {
            interner
                .resolve(self.0)
                .map(str::to_owned)
                .expect("Symbol should exist in interner")
        });
        f.write_str(&value)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({self})")
    }
}

impl From<&str> for Name {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        with_interner(|interner| interner.resolve(self.0) == Some(other))
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_new_interns_equal_strings() {
        let a = Name::new("Camera");
        let b = Name::new("Camera");
        let c = Name::new("Player");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, "Camera");
    }

    #[test]
    fn test_display_and_debug() {
        let name = Name::new("WorldUI");
        assert_eq!(name.to_string(), "WorldUI");
        assert_eq!(format!("{name:?}"), "Name(WorldUI)");
    }

    #[test]
    fn test_from_file_stem() {
        assert_eq!(
            Name::from_file_stem(Path::new("/project/World/World.tscn")),
            Some(Name::new("World"))
        );
        assert_eq!(
            Name::from_file_stem(Path::new("Game.g.cs")),
            Some(Name::new("Game.g"))
        );
        assert_eq!(Name::from_file_stem(Path::new("")), None);
    }

    #[test]
    fn test_interface_name() {
        assert_eq!(Name::new("Foo").interface_name("I"), "IFoo");
        assert_eq!(Name::new("Foo").interface_name(""), "Foo");
    }

    #[test]
    fn test_strip_interface_prefix() {
        assert_eq!(Name::strip_interface_prefix("IGameRepo", "I"), Some("GameRepo"));
        assert_eq!(Name::strip_interface_prefix("Input", "I"), None);
        assert_eq!(Name::strip_interface_prefix("I", "I"), None);
        assert_eq!(Name::strip_interface_prefix("Player", "I"), None);
        assert_eq!(Name::strip_interface_prefix("IPlayer", ""), None);
    }

    #[test]
    fn test_hash_as_map_key() {
        let mut map = HashMap::new();
        map.insert(Name::new("key1"), 1);
        map.insert(Name::new("key2"), 2);

        assert_eq!(map.get(&Name::new("key1")), Some(&1));
        assert_eq!(map.len(), 2);
    }
}
