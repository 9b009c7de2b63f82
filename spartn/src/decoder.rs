//! Schema driven payload decoder
//!
//! Walks a payload [`Schema`] over a decrypted payload, reading fields
//! MSB-first and expanding repeating and conditional groups from values
//! decoded earlier in the same payload.

use std::collections::HashMap;

use log::trace;

use crate::{
    attributes::{Attributes, FieldValue, OrdinalPath},
    bits::{decode_scaled_float, extract_bits, extract_wide, set_bit_positions},
    error::DecodeError,
    schema::{
        tables::signal_label, Count, Expansion, FieldId, FieldKind, Lookup, Node, Schema, Width,
    },
};

/// Largest byte-alignment slack a well formed payload may carry
pub const MAX_PADDING_BITS: i64 = 8;

/// Result of decoding one payload
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPayload {
    pub attributes: Attributes,
    /// Unused trailing bits
    pub padding: u8,
}

/// Bitmask expansion of the group currently being iterated
#[derive(Debug)]
struct ActiveExpansion {
    expansion: Expansion,
    positions: Vec<u16>,
    /// Depth of the group iterating over the mask
    depth: usize,
}

pub struct PayloadDecoder<'a> {
    payload: &'a [u8],
    offset: usize,
    path: OrdinalPath,
    attributes: Attributes,
    /// Set bit positions of every decoded bitmask that carries an expansion
    masks: HashMap<(FieldId, OrdinalPath), (Expansion, Vec<u16>)>,
    active: Vec<ActiveExpansion>,
}

impl<'a> PayloadDecoder<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self {
            payload,
            offset: 0,
            path: OrdinalPath::ROOT,
            attributes: Attributes::default(),
            masks: HashMap::new(),
            active: Vec::new(),
        }
    }

    /// Decode the whole payload against `schema` and check the trailing padding
    pub fn decode(mut self, schema: Schema) -> Result<DecodedPayload, DecodeError> {
        self.walk(schema)?;
        let padding = (self.payload.len() * 8) as i64 - self.offset as i64;
        if !(0..=MAX_PADDING_BITS).contains(&padding) {
            return Err(DecodeError::InvalidPadding { padding });
        }
        Ok(DecodedPayload {
            attributes: self.attributes,
            padding: padding as u8,
        })
    }

    fn walk(&mut self, nodes: &'static [Node]) -> Result<(), DecodeError> {
        for node in nodes {
            match node {
                Node::Field(field) => self.decode_field(*field)?,
                Node::Group { count, children } => self.decode_group(*count, children)?,
                Node::Conditional {
                    predicate,
                    children,
                } => {
                    if predicate.holds(self.value(predicate.field())?) {
                        self.walk(children)?;
                    }
                },
            }
        }
        Ok(())
    }

    /// Integer value of `field` in the nearest enclosing scope
    fn value(&self, field: FieldId) -> Result<u64, DecodeError> {
        self.attributes
            .lookup(field, self.path)
            .and_then(FieldValue::as_u64)
            .ok_or(DecodeError::UnresolvedField { field })
    }

    fn width(&self, field: FieldId, width: Width) -> Result<usize, DecodeError> {
        Ok(match width {
            Width::Fixed(bits) => usize::from(bits),
            Width::Selected { selector, widths } => {
                let value = self.value(selector)?;
                usize::try_from(value)
                    .ok()
                    .and_then(|i| widths.get(i))
                    .map(|bits| usize::from(*bits))
                    .ok_or(DecodeError::InvalidSelector { field, value })?
            },
            Width::ValueOf(source) => {
                let value = self.value(source)?;
                usize::try_from(value)
                    .map_err(|_| DecodeError::InvalidSelector { field, value })?
            },
            Width::GridNodes { lat, lon } => {
                let lat = self.value(lat)? as usize;
                let lon = self.value(lon)? as usize;
                (lat + 1) * (lon + 1)
            },
        })
    }

    fn decode_field(&mut self, field: FieldId) -> Result<(), DecodeError> {
        let def = field.definition();
        let value = match def.kind {
            FieldKind::Derived(lookup) => self.derive(field, lookup)?,
            kind => {
                let width = self.width(field, def.width)?;
                let value = if width > 64 {
                    FieldValue::Wide(extract_wide(self.payload, self.offset, width)?)
                } else {
                    let raw = extract_bits(self.payload, self.offset, width)?;
                    match kind {
                        FieldKind::Scaled { resolution, min } => FieldValue::Scaled {
                            raw,
                            value: decode_scaled_float(raw, resolution, min),
                        },
                        FieldKind::Bitmask(Some(expansion)) => {
                            self.masks.insert(
                                (field, self.path),
                                (expansion, set_bit_positions(raw, width)),
                            );
                            FieldValue::Int(raw)
                        },
                        _ => FieldValue::Int(raw),
                    }
                };
                self.offset += width;
                value
            },
        };
        self.attributes.insert(field, self.path, value);
        Ok(())
    }

    /// Value of a derived field from the innermost group iterating over a
    /// matching bitmask
    fn derive(&self, field: FieldId, lookup: Lookup) -> Result<FieldValue, DecodeError> {
        let active = self
            .active
            .iter()
            .rev()
            .find(|active| lookup.matches(&active.expansion))
            .ok_or(DecodeError::MissingExpansion { field })?;
        let position = self
            .path
            .as_slice()
            .get(active.depth - 1)
            .and_then(|ordinal| active.positions.get(usize::from(*ordinal) - 1))
            .copied()
            .ok_or(DecodeError::MissingExpansion { field })?;
        Ok(match active.expansion {
            Expansion::Satellite => FieldValue::Prn(position + 1),
            Expansion::PhaseBias(labels) | Expansion::CodeBias(labels) => {
                FieldValue::Signal(signal_label(labels, position))
            },
        })
    }

    fn decode_group(&mut self, count: Count, children: &'static [Node]) -> Result<(), DecodeError> {
        let mut expansion = None;
        let (field, repeats) = match count {
            Count::Fixed(n) => return self.repeat(n, None, children),
            Count::ValueOf(field) => (field, self.value(field)?),
            Count::ValueOfPlusOne(field) => (field, self.value(field)?.saturating_add(1)),
            Count::SetBits(field) => {
                let scoped = self
                    .path
                    .scopes()
                    .find_map(|scope| self.masks.get(&(field, scope)));
                let repeats = match scoped {
                    Some((exp, positions)) => {
                        expansion = Some((*exp, positions.clone()));
                        positions.len() as u64
                    },
                    None => self
                        .attributes
                        .lookup(field, self.path)
                        .and_then(FieldValue::count_ones)
                        .map(u64::from)
                        .ok_or(DecodeError::UnresolvedField { field })?,
                };
                (field, repeats)
            },
        };
        let repeats = u16::try_from(repeats).map_err(|_| DecodeError::InvalidCount {
            field,
            count: repeats,
        })?;
        self.repeat(repeats, expansion, children)
    }

    fn repeat(
        &mut self,
        repeats: u16,
        expansion: Option<(Expansion, Vec<u16>)>,
        children: &'static [Node],
    ) -> Result<(), DecodeError> {
        self.path.push(0)?;
        let pushed = expansion.is_some();
        if let Some((expansion, positions)) = expansion {
            self.active.push(ActiveExpansion {
                expansion,
                positions,
                depth: self.path.depth(),
            });
        }
        trace!("group of {repeats} at {:?}, bit {}", self.path, self.offset);
        for ordinal in 1..=repeats {
            self.path.set_last(ordinal);
            self.walk(children)?;
        }
        if pushed {
            self.active.pop();
        }
        self.path.pop();
        Ok(())
    }
}

/// Decode `payload` against `schema`
pub fn decode_payload(payload: &[u8], schema: Schema) -> Result<DecodedPayload, DecodeError> {
    PayloadDecoder::new(payload).decode(schema)
}
