//! Decoded payload attributes
//!
//! Every decoded field is stored against its [`FieldId`] and the
//! [`OrdinalPath`] of the repeating groups enclosing it, so the third area of
//! a GAD message has its latitude at `(SF032, [3])`.

use std::{collections::HashMap, fmt};

use crate::{constants::MAX_GROUP_DEPTH, error::DecodeError, schema::FieldId};

/// 1-based index of each enclosing repeating group, outermost first
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OrdinalPath {
    len: u8,
    idx: [u16; MAX_GROUP_DEPTH],
}

impl OrdinalPath {
    /// Path of a field outside any repeating group
    pub const ROOT: Self = Self {
        len: 0,
        idx: [0; MAX_GROUP_DEPTH],
    };

    /// `None` when `ordinals` is deeper than the deepest schema nesting
    pub fn new(ordinals: &[u16]) -> Option<Self> {
        if ordinals.len() > MAX_GROUP_DEPTH {
            return None;
        }
        let mut path = Self::ROOT;
        path.idx[..ordinals.len()].copy_from_slice(ordinals);
        path.len = ordinals.len() as u8;
        Some(path)
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.idx[..usize::from(self.len)]
    }

    /// Number of enclosing groups
    pub fn depth(&self) -> usize {
        usize::from(self.len)
    }

    pub fn is_root(&self) -> bool {
        self.len == 0
    }

    /// This path followed by each shorter prefix, down to the root
    pub fn scopes(self) -> impl Iterator<Item = OrdinalPath> {
        (0..=self.depth()).rev().map(move |len| OrdinalPath {
            len: len as u8,
            idx: {
                let mut idx = [0; MAX_GROUP_DEPTH];
                idx[..len].copy_from_slice(&self.idx[..len]);
                idx
            },
        })
    }

    pub(crate) fn push(&mut self, ordinal: u16) -> Result<(), DecodeError> {
        let slot = self
            .idx
            .get_mut(usize::from(self.len))
            .ok_or(DecodeError::NestingTooDeep)?;
        *slot = ordinal;
        self.len += 1;
        Ok(())
    }

    pub(crate) fn pop(&mut self) {
        if self.len > 0 {
            self.len -= 1;
            self.idx[usize::from(self.len)] = 0;
        }
    }

    pub(crate) fn set_last(&mut self, ordinal: u16) {
        if let Some(last) = self.len.checked_sub(1) {
            self.idx[usize::from(last)] = ordinal;
        }
    }
}

impl fmt::Debug for OrdinalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Attribute name suffix, one `_NN` per level: `_01_03`
impl fmt::Display for OrdinalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_slice()
            .iter()
            .try_for_each(|ordinal| write!(f, "_{ordinal:02}"))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for OrdinalPath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.as_slice())
    }
}

/// Value of a decoded field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Integer, enumeration and bitmask fields up to 64 bits
    Int(u64),
    /// Scaled field with its physical value `raw * resolution + min`
    Scaled { raw: u64, value: f64 },
    /// Fields wider than 64 bits, big-endian and right-aligned
    Wide(Vec<u8>),
    /// Satellite PRN taken from the enclosing satellite mask
    Prn(u16),
    /// Bias signal taken from the enclosing bias mask
    Signal(&'static str),
}

impl FieldValue {
    /// Integer value of the field as encoded, `None` for wide fields and signals
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            FieldValue::Scaled { raw, .. } => Some(*raw),
            FieldValue::Prn(prn) => Some(u64::from(*prn)),
            FieldValue::Wide(_) | FieldValue::Signal(_) => None,
        }
    }

    /// Physical value of a scaled field, or the integer value of any other numeric field
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Scaled { value, .. } => Some(*value),
            other => other.as_u64().map(|v| v as f64),
        }
    }

    pub fn as_signal(&self) -> Option<&'static str> {
        match self {
            FieldValue::Signal(signal) => Some(signal),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Wide(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Number of set bits, used for bitmask driven repeat counts
    pub(crate) fn count_ones(&self) -> Option<u32> {
        match self {
            FieldValue::Int(v) => Some(v.count_ones()),
            FieldValue::Wide(bytes) => Some(crate::bits::count_ones_wide(bytes)),
            _ => None,
        }
    }
}

/// Encoded value as it appears on the wire, wide fields in hex
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Scaled { raw, .. } => write!(f, "{raw}"),
            FieldValue::Wide(bytes) => {
                f.write_str("0x")?;
                bytes.iter().try_for_each(|b| write!(f, "{b:02x}"))
            },
            FieldValue::Prn(prn) => write!(f, "{prn}"),
            FieldValue::Signal(signal) => f.write_str(signal),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FieldValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Int(v) => serializer.serialize_u64(*v),
            FieldValue::Scaled { value, .. } => serializer.serialize_f64(*value),
            FieldValue::Wide(_) => serializer.collect_str(self),
            FieldValue::Prn(prn) => serializer.serialize_u16(*prn),
            FieldValue::Signal(signal) => serializer.serialize_str(signal),
        }
    }
}

/// One decoded field instance
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub field: FieldId,
    pub path: OrdinalPath,
    pub value: FieldValue,
}

impl Attribute {
    /// Flat attribute name, e.g. `SF031_01`
    pub fn name(&self) -> String {
        format!("{}{}", self.field, self.path)
    }
}

/// Decoded fields of a payload in decode order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    items: Vec<Attribute>,
    index: HashMap<(FieldId, OrdinalPath), usize>,
}

impl Attributes {
    pub(crate) fn insert(&mut self, field: FieldId, path: OrdinalPath, value: FieldValue) {
        self.index.insert((field, path), self.items.len());
        self.items.push(Attribute { field, path, value });
    }

    /// Value of `field` at exactly the given group ordinals
    pub fn get(&self, field: FieldId, ordinals: &[u16]) -> Option<&FieldValue> {
        self.get_at(field, OrdinalPath::new(ordinals)?)
    }

    pub fn get_at(&self, field: FieldId, path: OrdinalPath) -> Option<&FieldValue> {
        self.index
            .get(&(field, path))
            .and_then(|i| self.items.get(*i))
            .map(|attr| &attr.value)
    }

    /// Value of `field` in the nearest scope enclosing `path`
    pub fn lookup(&self, field: FieldId, path: OrdinalPath) -> Option<&FieldValue> {
        path.scopes().find_map(|scope| self.get_at(field, scope))
    }

    /// Number of instances of `field` one level below `parent`
    pub fn group_count(&self, field: FieldId, parent: &[u16]) -> usize {
        self.items
            .iter()
            .filter(|attr| {
                let path = attr.path.as_slice();
                attr.field == field
                    && path.len() == parent.len() + 1
                    && path.starts_with(parent)
            })
            .count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Attributes {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.items.iter().map(|attr| (attr.name(), &attr.value)))
    }
}
