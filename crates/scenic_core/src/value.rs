//! Property values
//!
//! Every property or reference stored on an entity is a [`Value`]. Numeric
//! values carry one to three components; reference values point at other
//! entities by key.

use crate::registry::EntityKey;

/// Number of numeric components a property holds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Arity {
    /// One component
    Scalar = 1,
    /// Two components
    Pair = 2,
    /// Three components
    Triple = 3,
}

impl Arity {
    /// Arity for a component count, if it is 1, 2 or 3
    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            1 => Some(Arity::Scalar),
            2 => Some(Arity::Pair),
            3 => Some(Arity::Triple),
            _ => None,
        }
    }

    /// Number of components
    #[inline]
    pub fn len(self) -> usize {
        self as usize
    }
}

/// A typed value stored on an entity
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Single number
    Scalar(f64),
    /// Two numbers (resolution, tile size, ...)
    Pair(f64, f64),
    /// Three numbers (translate, color, ...)
    Triple(f64, f64, f64),
    /// Reference to one entity
    Reference(EntityKey),
    /// Ordered references to several entities
    ReferenceList(Vec<EntityKey>),
}

impl Value {
    /// Build a numeric value from its components
    ///
    /// Returns `None` unless there are between one and three components.
    pub fn from_components(components: &[f64]) -> Option<Self> {
        match *components {
            [a] => Some(Value::Scalar(a)),
            [a, b] => Some(Value::Pair(a, b)),
            [a, b, c] => Some(Value::Triple(a, b, c)),
            _ => None,
        }
    }

    /// Arity of a numeric value, `None` for references
    pub fn arity(&self) -> Option<Arity> {
        match self {
            Value::Scalar(_) => Some(Arity::Scalar),
            Value::Pair(..) => Some(Arity::Pair),
            Value::Triple(..) => Some(Arity::Triple),
            Value::Reference(_) | Value::ReferenceList(_) => None,
        }
    }

    /// Numeric components, empty for references
    pub fn components(&self) -> Vec<f64> {
        match *self {
            Value::Scalar(a) => vec![a],
            Value::Pair(a, b) => vec![a, b],
            Value::Triple(a, b, c) => vec![a, b, c],
            Value::Reference(_) | Value::ReferenceList(_) => Vec::new(),
        }
    }

    /// First component of a numeric value
    pub fn as_scalar(&self) -> Option<f64> {
        match *self {
            Value::Scalar(a) | Value::Pair(a, _) | Value::Triple(a, _, _) => Some(a),
            _ => None,
        }
    }

    /// The value as a pair, if it has exactly two components
    pub fn as_pair(&self) -> Option<[f64; 2]> {
        match *self {
            Value::Pair(a, b) => Some([a, b]),
            _ => None,
        }
    }

    /// The value as a triple, if it has exactly three components
    pub fn as_triple(&self) -> Option<[f64; 3]> {
        match *self {
            Value::Triple(a, b, c) => Some([a, b, c]),
            _ => None,
        }
    }

    /// The single referenced entity
    pub fn as_reference(&self) -> Option<EntityKey> {
        match self {
            Value::Reference(key) => Some(*key),
            _ => None,
        }
    }

    /// All referenced entities, in order
    pub fn references(&self) -> &[EntityKey] {
        match self {
            Value::Reference(key) => std::slice::from_ref(key),
            Value::ReferenceList(keys) => keys,
            _ => &[],
        }
    }
}
