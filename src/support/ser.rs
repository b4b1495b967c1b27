use serde::{Deserialize, Serialize};

use crate::config::REGISTRY_LAYOUT_VERSION;
use crate::lattice::ElementStore;

use super::registry::SupportModel;
use super::types::{CarrierType, FieldKey, FieldName};
use super::validate::RegistryError;

/// Canonical binary serialisation of the ordinate index and sigma store.
///
/// | Section | Field | Encoding |
/// |---------|-------|----------|
/// | header | layout version | `u8` |
/// | ordinates | per carrier in `Girder, Plinth, Section` order: presence flag | `u8` (0 or 1) |
/// | ordinates | pair count (if present) | `u64` little-endian |
/// | ordinates | each pair | `start`, `end` as `u64` little-endian |
/// | sigmas | entry count | `u64` little-endian |
/// | sigmas | element index | `u64` little-endian |
/// | sigmas | carrier | `u8` code |
/// | sigmas | field | `u8` tag (1 Offset, 2 Roll, 3 custom) |
/// | sigmas | custom name (tag 3 only) | `u64` length + UTF-8 bytes |
/// | sigmas | sigma | `u64` length + `f64` little-endian values |
/// | sigmas | cutoff | `f64` little-endian |
///
/// Sigma entries are emitted sorted by element index, then by key, so equal
/// stores always produce equal bytes. Nominal state is not part of the layout;
/// it is always zero right after registration.
pub fn serialize_registry<S: ElementStore>(model: &SupportModel<S>) -> Vec<u8> {
    let mut out = Vec::with_capacity(64);
    out.push(REGISTRY_LAYOUT_VERSION);
    for carrier in CarrierType::ALL {
        match model.ordinates().get(carrier) {
            Some(set) => {
                out.push(1);
                put_len(&mut out, set.len());
                for pair in set.pairs() {
                    put_len(&mut out, pair.start);
                    put_len(&mut out, pair.end);
                }
            }
            None => out.push(0),
        }
    }
    put_len(&mut out, model.sigmas().len());
    for (index, key, spec) in model.sigmas().iter() {
        put_len(&mut out, index);
        put_key(&mut out, key);
        put_len(&mut out, spec.sigma.len());
        for value in &spec.sigma {
            out.extend_from_slice(&value.to_le_bytes());
        }
        out.extend_from_slice(&spec.cutoff.to_le_bytes());
    }
    out
}

fn put_len(out: &mut Vec<u8>, value: usize) {
    out.extend_from_slice(&(value as u64).to_le_bytes());
}

fn put_key(out: &mut Vec<u8>, key: &FieldKey) {
    out.push(key.carrier.code());
    match &key.field {
        FieldName::Offset => out.push(1),
        FieldName::Roll => out.push(2),
        FieldName::Custom(name) => {
            out.push(3);
            put_len(out, name.len());
            out.extend_from_slice(name.as_bytes());
        }
    }
}

/// Registered carriers of one type in the 2×N layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierSnapshot {
    pub carrier: CarrierType,
    pub starts: Vec<usize>,
    pub ends: Vec<usize>,
}

/// One sigma store entry with its key rendered as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SigmaSnapshot {
    pub index: usize,
    pub key: String,
    pub sigma: Vec<f64>,
    pub cutoff: f64,
}

/// Serialisable view of the registry stores, for export and inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub ordinates: Vec<CarrierSnapshot>,
    pub sigmas: Vec<SigmaSnapshot>,
}

impl RegistrySnapshot {
    /// Captures the current ordinate index and sigma store of `model`.
    pub fn capture<S: ElementStore>(model: &SupportModel<S>) -> Self {
        let ordinates = model
            .ordinates()
            .iter()
            .map(|(carrier, set)| CarrierSnapshot {
                carrier,
                starts: set.starts(),
                ends: set.ends(),
            })
            .collect();
        let sigmas = model
            .sigmas()
            .iter()
            .map(|(index, key, spec)| SigmaSnapshot {
                index,
                key: key.to_string(),
                sigma: spec.sigma.clone(),
                cutoff: spec.cutoff,
            })
            .collect();
        Self { ordinates, sigmas }
    }

    /// Renders the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, RegistryError> {
        serde_json::to_string_pretty(self).map_err(|err| RegistryError::Snapshot(err.to_string()))
    }
}
