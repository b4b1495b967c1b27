use core::fmt;

use serde::{Deserialize, Serialize};

use super::types::{CarrierType, FieldName};
use super::uncertainty::{is_validated, SpecValue};

/// Fatal registration failure. Nothing is written to the model when one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Carrier type text outside the allowed set.
    #[error("unknown support type '{0}', allowed: Girder, Plinth, Section")]
    UnknownCarrierType(String),
    /// Ordinates are not a non-empty 2×N array.
    #[error("ordinates must be a non-empty 2xN array, got {rows} row(s) with lengths {columns:?}")]
    OrdinateShape {
        /// Number of rows supplied.
        rows: usize,
        /// Length of every row supplied.
        columns: Vec<usize>,
    },
    /// A trailing field name has no paired value.
    #[error("uncertainty arguments must come in name/value pairs, got {count} trailing argument(s)")]
    UnpairedArguments {
        /// Number of trailing arguments after carrier type and ordinates.
        count: usize,
    },
    /// A positional argument had the wrong kind.
    #[error("argument {position} must be {expected}")]
    ArgumentKind {
        /// Zero-based argument position.
        position: usize,
        /// Human readable description of the expected kind.
        expected: &'static str,
    },
    /// A cutoff held anything but a single value.
    #[error("cutoff for {carrier}{field} must be a single scalar, got {len} value(s)")]
    NonScalarCutoff {
        /// Carrier type being registered.
        carrier: CarrierType,
        /// Field the cutoff belongs to.
        field: FieldName,
        /// Number of cutoff values supplied.
        len: usize,
    },
    /// Ordinates cannot be normalised against an empty lattice.
    #[error("lattice has no elements; ordinates cannot be normalised")]
    EmptyLattice,
    /// Element store rejected an index.
    #[error("element index {index} outside lattice of length {len}")]
    ElementOutOfRange {
        /// Offending 1-based index.
        index: usize,
        /// Lattice length.
        len: usize,
    },
    /// Configuration could not be parsed.
    #[error("invalid registry configuration: {0}")]
    InvalidConfig(String),
    /// Snapshot export failed.
    #[error("registry snapshot could not be encoded: {0}")]
    Snapshot(String),
}

impl RegistryError {
    /// Returns `true` for errors caused by the arguments of a registration
    /// call, as opposed to configuration or element-store failures.
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(
            self,
            RegistryError::InvalidConfig(_)
                | RegistryError::ElementOutOfRange { .. }
                | RegistryError::Snapshot(_)
        )
    }
}

/// Severity attached to a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Informational only.
    Notice,
    /// Suspicious input that was stored anyway.
    Warning,
}

/// Non-fatal finding surfaced during registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// Offset or Roll sigma with an unexpected shape; stored as given.
    ShapeWarning {
        /// Carrier type being registered.
        carrier: CarrierType,
        /// Field whose sigma is malformed.
        field: FieldName,
        /// Number of sigma rows supplied.
        rows: usize,
        /// Number of values in each row.
        columns: Vec<usize>,
    },
    /// Some carriers end upstream of where they start.
    LayoutNotice {
        /// Carrier type being registered.
        carrier: CarrierType,
        /// Number of pairs whose end ordinate precedes the start ordinate.
        reversed: usize,
    },
}

impl Diagnostic {
    /// Returns the severity of this diagnostic.
    pub const fn severity(&self) -> Severity {
        match self {
            Diagnostic::ShapeWarning { .. } => Severity::Warning,
            Diagnostic::LayoutNotice { .. } => Severity::Notice,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ShapeWarning {
                carrier,
                field: FieldName::Roll,
                columns,
                ..
            } => write!(
                f,
                "{carrier}Roll sigma should hold exactly 3 values, got {}",
                columns.iter().sum::<usize>()
            ),
            Diagnostic::ShapeWarning {
                carrier,
                field,
                rows,
                columns,
            } => write!(
                f,
                "{carrier}{field} sigma should be 1x3 or 2x3, got {rows} row(s) with lengths {columns:?}"
            ),
            Diagnostic::LayoutNotice { carrier, reversed } => write!(
                f,
                "{reversed} {carrier} support(s) end upstream of their start ordinate"
            ),
        }
    }
}

/// Checks the shape of one uncertainty value.
///
/// Cutoff scalarity is fatal. Shape mismatches on `Offset` and `Roll` only
/// yield a warning; custom fields are not shape checked.
pub(crate) fn validate_spec(
    carrier: CarrierType,
    field: &FieldName,
    value: &SpecValue,
) -> Result<Option<Diagnostic>, RegistryError> {
    if let SpecValue::WithCutoff { cutoff, .. } = value {
        if cutoff.len() != 1 {
            return Err(RegistryError::NonScalarCutoff {
                carrier,
                field: field.clone(),
                len: cutoff.len(),
            });
        }
    }
    if !is_validated(field) {
        return Ok(None);
    }
    let sigma = value.sigma_array();
    let well_formed = match field {
        FieldName::Offset => {
            (1..=2).contains(&sigma.row_count()) && sigma.rows().iter().all(|row| row.len() == 3)
        }
        _ => sigma.element_count() == 3,
    };
    if well_formed {
        return Ok(None);
    }
    Ok(Some(Diagnostic::ShapeWarning {
        carrier,
        field: field.clone(),
        rows: sigma.row_count(),
        columns: sigma.column_counts(),
    }))
}

/// Counts raw pairs whose end ordinate precedes the start ordinate.
pub(crate) fn count_reversed(starts: &[i64], ends: &[i64]) -> usize {
    starts
        .iter()
        .zip(ends)
        .filter(|(start, end)| end < start)
        .count()
}

/// Resolves the cutoff of an already validated value.
pub(crate) fn resolve_cutoff(value: &SpecValue, default_cutoff: f64) -> f64 {
    match value {
        SpecValue::Sigma(_) => default_cutoff,
        SpecValue::WithCutoff { cutoff, .. } => cutoff.first().copied().unwrap_or(default_cutoff),
    }
}
