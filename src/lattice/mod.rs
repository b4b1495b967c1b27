//! Lattice element store consumed by the support registry.
//!
//! The registry never owns element physics. It only needs the lattice length
//! for ordinate normalisation and per-element named vector fields in which
//! the nominal `<Carrier>Offset` / `<Carrier>Roll` state lives. Both are
//! reached through [`ElementStore`]; [`Lattice`] is the in-memory store used
//! by lattice construction code and the tests.
//!
//! Indices are 1-based throughout, matching the ordinate convention.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::support::{FieldKey, RegistryError};

/// Mutable access to per-element records with named numeric fields.
pub trait ElementStore {
    /// Number of elements in the ring.
    fn len(&self) -> usize;

    /// Returns `true` when the store holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` when `index` (1-based) names a writable element.
    /// `set_field` must succeed for every such index.
    fn contains(&self, index: usize) -> bool {
        (1..=self.len()).contains(&index)
    }

    /// Overwrites the named field of the element at `index` (1-based).
    fn set_field(
        &mut self,
        index: usize,
        key: &FieldKey,
        values: &[f64],
    ) -> Result<(), RegistryError>;

    /// Reads the named field of the element at `index` (1-based).
    fn field(&self, index: usize, key: &FieldKey) -> Option<&[f64]>;
}

/// Single lattice element with its free-form support fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatticeElement {
    /// Family name of the element (`QF`, `BPM`, `DRIFT`, ...).
    pub family: String,
    fields: BTreeMap<String, Vec<f64>>,
}

impl LatticeElement {
    /// Creates an element without any support fields.
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Returns the raw field value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    /// Number of named fields attached to the element.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// Ordered ring of lattice elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    elements: Vec<LatticeElement>,
}

impl Lattice {
    /// Builds a lattice from its elements in beamline order.
    pub fn new(elements: Vec<LatticeElement>) -> Self {
        Self { elements }
    }

    /// Builds a lattice of `len` anonymous drift elements.
    pub fn with_drifts(len: usize) -> Self {
        Self {
            elements: (0..len).map(|_| LatticeElement::new("DRIFT")).collect(),
        }
    }

    /// Returns the element at the 1-based `index`.
    pub fn element(&self, index: usize) -> Option<&LatticeElement> {
        index
            .checked_sub(1)
            .and_then(|slot| self.elements.get(slot))
    }

    fn element_mut(&mut self, index: usize) -> Result<&mut LatticeElement, RegistryError> {
        let len = self.elements.len();
        index
            .checked_sub(1)
            .and_then(|slot| self.elements.get_mut(slot))
            .ok_or(RegistryError::ElementOutOfRange { index, len })
    }
}

impl ElementStore for Lattice {
    fn len(&self) -> usize {
        self.elements.len()
    }

    fn set_field(
        &mut self,
        index: usize,
        key: &FieldKey,
        values: &[f64],
    ) -> Result<(), RegistryError> {
        let element = self.element_mut(index)?;
        element.fields.insert(key.to_string(), values.to_vec());
        Ok(())
    }

    fn field(&self, index: usize, key: &FieldKey) -> Option<&[f64]> {
        self.element(index)?.get(&key.to_string())
    }
}
