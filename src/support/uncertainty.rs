use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::{CarrierType, FieldKey, FieldName};

/// Sigma rows exactly as supplied by the caller.
///
/// The canonical shapes are 1×3 (start only, end mirrors start) and 2×3
/// (independent start and end). Other shapes are kept as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SigmaArray {
    rows: Vec<Vec<f64>>,
}

impl SigmaArray {
    /// Wraps arbitrary rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    /// Single-row sigma applied to the start point only.
    pub fn start(sigma: [f64; 3]) -> Self {
        Self {
            rows: vec![sigma.to_vec()],
        }
    }

    /// Two-row sigma with independent start and end values.
    pub fn start_end(start: [f64; 3], end: [f64; 3]) -> Self {
        Self {
            rows: vec![start.to_vec(), end.to_vec()],
        }
    }

    /// Raw rows.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column count of every row, in order.
    pub fn column_counts(&self) -> Vec<usize> {
        self.rows.iter().map(Vec::len).collect()
    }

    /// Total number of elements across all rows.
    pub fn element_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Row written to the start point. An empty array yields an empty row.
    pub(crate) fn start_row(&self) -> &[f64] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Row written to the end point, present only for multi-row arrays.
    pub(crate) fn end_row(&self) -> Option<&[f64]> {
        self.rows.get(1).map(Vec::as_slice)
    }
}

/// Value paired with a field name in a registration call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpecValue {
    /// Sigma only; the configured default cutoff applies.
    Sigma(SigmaArray),
    /// Sigma with an explicit cutoff. The cutoff must hold exactly one value.
    WithCutoff {
        /// Sigma rows.
        sigma: SigmaArray,
        /// Cutoff values as given; anything but one element is rejected.
        cutoff: Vec<f64>,
    },
}

impl SpecValue {
    /// Sigma with the default cutoff.
    pub fn sigma(sigma: SigmaArray) -> Self {
        SpecValue::Sigma(sigma)
    }

    /// Sigma with a scalar cutoff.
    pub fn with_cutoff(sigma: SigmaArray, cutoff: f64) -> Self {
        SpecValue::WithCutoff {
            sigma,
            cutoff: vec![cutoff],
        }
    }

    /// Sigma rows regardless of the variant.
    pub fn sigma_array(&self) -> &SigmaArray {
        match self {
            SpecValue::Sigma(sigma) | SpecValue::WithCutoff { sigma, .. } => sigma,
        }
    }
}

/// Uncertainty stored for one endpoint and one prefixed field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertaintySpec {
    /// Standard deviations of the zero-mean perturbation.
    pub sigma: Vec<f64>,
    /// Truncation bound in standard deviations.
    pub cutoff: f64,
}

impl UncertaintySpec {
    /// Returns the sigma as a three-vector when it has the canonical shape.
    pub fn sigma3(&self) -> Option<[f64; 3]> {
        <[f64; 3]>::try_from(self.sigma.as_slice()).ok()
    }
}

/// How the apply-errors collaborator must treat the end point of a pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EndpointDraw<'a> {
    /// End point carries its own spec and is drawn independently (tilt).
    Independent(&'a UncertaintySpec),
    /// Only the start carries a spec; the end copies the start's draw
    /// (rigid translation).
    MirrorStart,
    /// Neither endpoint carries a spec for this field.
    Fixed,
}

/// Per-endpoint uncertainty specs keyed by element index and prefixed field.
///
/// Use [`RegistrySnapshot`](super::RegistrySnapshot) for a serialisable view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SigmaStore {
    entries: BTreeMap<usize, BTreeMap<FieldKey, UncertaintySpec>>,
}

impl SigmaStore {
    /// Returns the spec stored for `(index, key)`.
    pub fn get(&self, index: usize, key: &FieldKey) -> Option<&UncertaintySpec> {
        self.entries.get(&index)?.get(key)
    }

    /// All specs stored for the element at `index`.
    pub fn entries_for(&self, index: usize) -> Option<&BTreeMap<FieldKey, UncertaintySpec>> {
        self.entries.get(&index)
    }

    /// Element indices carrying at least one spec, ascending.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.keys().copied()
    }

    /// Iterates over every `(index, key, spec)` triple in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &FieldKey, &UncertaintySpec)> {
        self.entries
            .iter()
            .flat_map(|(&index, fields)| fields.iter().map(move |(key, spec)| (index, key, spec)))
    }

    /// Total number of stored specs.
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of specs whose key belongs to `carrier`.
    pub fn count_carrier(&self, carrier: CarrierType) -> usize {
        self.iter().filter(|(_, key, _)| key.carrier == carrier).count()
    }

    pub(crate) fn insert(&mut self, index: usize, key: FieldKey, spec: UncertaintySpec) {
        self.entries.entry(index).or_default().insert(key, spec);
    }

    /// Drops every spec whose key belongs to `carrier`; returns how many went.
    pub(crate) fn clear_carrier(&mut self, carrier: CarrierType) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, fields| {
            let before = fields.len();
            fields.retain(|key, _| key.carrier != carrier);
            removed += before - fields.len();
            !fields.is_empty()
        });
        removed
    }
}

/// Returns `true` for names that receive shape validation.
pub(crate) fn is_validated(field: &FieldName) -> bool {
    matches!(field, FieldName::Offset | FieldName::Roll)
}
