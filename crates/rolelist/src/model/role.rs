//! Roles: the run-time schema of a list model.
//!
//! A role is a named accessor pair defining one field per row. Views learn
//! the schema from [`RoleSchema::names`] and address roles by index; host
//! code may also address them by name through [`RoleRef`].
//!
//! The schema is in exactly one of two modes. A fresh model has the single
//! implicit role (named `"string"` by default) that stringifies each item.
//! The first user-defined role replaces it for good.

use std::collections::BTreeMap;
use std::fmt;

use rolelist_core::Pinned;

use super::runtime::{Getter, Setter};

/// Reference to a role by index or by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleRef<'a> {
    /// Position in the role table.
    Index(usize),
    /// Role name.
    Name(&'a str),
}

impl From<usize> for RoleRef<'_> {
    fn from(index: usize) -> Self {
        RoleRef::Index(index)
    }
}

impl<'a> From<&'a str> for RoleRef<'a> {
    fn from(name: &'a str) -> Self {
        RoleRef::Name(name)
    }
}

impl<'a> From<&'a String> for RoleRef<'a> {
    fn from(name: &'a String) -> Self {
        RoleRef::Name(name.as_str())
    }
}

impl fmt::Display for RoleRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleRef::Index(index) => write!(f, "#{index}"),
            RoleRef::Name(name) => write!(f, "{name:?}"),
        }
    }
}

/// A user-defined role with its pinned accessors.
pub struct Role<I, V> {
    name: String,
    getter: Pinned<Getter<I, V>>,
    setter: Option<Pinned<Setter<I, V>>>,
}

impl<I, V> Role<I, V> {
    pub(crate) fn new(
        name: String,
        getter: Pinned<Getter<I, V>>,
        setter: Option<Pinned<Setter<I, V>>>,
    ) -> Self {
        Self {
            name,
            getter,
            setter,
        }
    }

    /// The role name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if the role has no setter.
    pub fn is_read_only(&self) -> bool {
        self.setter.is_none()
    }
}

impl<I, V> fmt::Debug for Role<I, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Role")
            .field("name", &self.name)
            .field("getter", &self.getter.root())
            .field("setter", &self.setter.as_ref().map(|s| s.root()))
            .finish()
    }
}

/// How to read a role's value from an item.
pub(crate) enum Accessor<I, V> {
    /// The implicit role: runtime stringification.
    Stringify,
    /// A user-defined getter.
    Getter(Getter<I, V>),
}

/// The role table of a list model.
pub enum RoleSchema<I, V> {
    /// The single implicit role.
    Default {
        /// Name of the implicit role.
        name: String,
    },
    /// User-defined roles, indexed `0..len`.
    Custom(Vec<Role<I, V>>),
}

impl<I, V> RoleSchema<I, V> {
    /// A table in default mode whose implicit role is called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        RoleSchema::Default { name: name.into() }
    }

    /// Returns `true` once the table holds user-defined roles.
    pub fn is_custom(&self) -> bool {
        matches!(self, RoleSchema::Custom(_))
    }

    /// Number of roles.
    pub fn len(&self) -> usize {
        match self {
            RoleSchema::Default { .. } => 1,
            RoleSchema::Custom(roles) => roles.len(),
        }
    }

    /// Returns `true` if the table has no roles at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the role at `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        match self {
            RoleSchema::Default { name } => (index == 0).then_some(name.as_str()),
            RoleSchema::Custom(roles) => roles.get(index).map(Role::name),
        }
    }

    /// Role names in index order.
    pub fn names(&self) -> Vec<String> {
        (0..self.len())
            .filter_map(|index| self.name(index).map(str::to_owned))
            .collect()
    }

    /// Role names keyed by index, as views consume them.
    pub fn name_map(&self) -> BTreeMap<usize, String> {
        self.names().into_iter().enumerate().collect()
    }

    /// Index of the role called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        (0..self.len()).find(|&index| self.name(index) == Some(name))
    }

    /// Resolve a role reference to an in-range index.
    pub fn resolve(&self, role: RoleRef<'_>) -> Option<usize> {
        match role {
            RoleRef::Index(index) => (index < self.len()).then_some(index),
            RoleRef::Name(name) => self.position(name),
        }
    }

    pub(crate) fn accessor(&self, index: usize) -> Option<Accessor<I, V>> {
        match self {
            RoleSchema::Default { .. } => (index == 0).then_some(Accessor::Stringify),
            RoleSchema::Custom(roles) => roles
                .get(index)
                .map(|role| Accessor::Getter(role.getter.get().clone())),
        }
    }

    pub(crate) fn setter(&self, index: usize) -> Option<Setter<I, V>> {
        match self {
            RoleSchema::Default { .. } => None,
            RoleSchema::Custom(roles) => roles
                .get(index)
                .and_then(|role| role.setter.as_ref())
                .map(|setter| setter.get().clone()),
        }
    }

    /// Switch to custom mode, discarding the implicit role.
    ///
    /// One-way: returns `true` only on the call that performs the switch.
    pub(crate) fn enter_custom(&mut self) -> bool {
        if self.is_custom() {
            return false;
        }
        *self = RoleSchema::Custom(Vec::new());
        true
    }

    pub(crate) fn push(&mut self, role: Role<I, V>) {
        self.enter_custom();
        if let RoleSchema::Custom(roles) = self {
            roles.push(role);
        }
    }

    /// Replace the role at `index`, returning the old one so its pins are
    /// released when the caller drops it.
    pub(crate) fn replace(&mut self, index: usize, role: Role<I, V>) -> Option<Role<I, V>> {
        if !self.is_custom() {
            if index == 0 {
                *self = RoleSchema::Custom(vec![role]);
            }
            return None;
        }
        match self {
            RoleSchema::Custom(roles) => roles
                .get_mut(index)
                .map(|slot| std::mem::replace(slot, role)),
            RoleSchema::Default { .. } => None,
        }
    }

    /// Remove the role at `index`; later roles shift down by one.
    pub(crate) fn remove(&mut self, index: usize) -> Option<Role<I, V>> {
        if !self.is_custom() {
            if index == 0 {
                *self = RoleSchema::Custom(Vec::new());
            }
            return None;
        }
        match self {
            RoleSchema::Custom(roles) => (index < roles.len()).then(|| roles.remove(index)),
            RoleSchema::Default { .. } => None,
        }
    }
}

impl<I, V> fmt::Debug for RoleSchema<I, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleSchema::Default { name } => f.debug_struct("Default").field("name", name).finish(),
            RoleSchema::Custom(roles) => f.debug_tuple("Custom").field(roles).finish(),
        }
    }
}
