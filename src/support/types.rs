use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use super::validate::RegistryError;

/// Kind of mechanical carrier a registration call refers to.
///
/// | Variant | Prefix | Code |
/// |---------|--------|------|
/// | `Girder` | `Girder` | 1 |
/// | `Plinth` | `Plinth` | 2 |
/// | `Section` | `Section` | 3 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CarrierType {
    /// Girder carrying magnets and diagnostics.
    Girder,
    /// Plinth below one or more girders.
    Plinth,
    /// Whole machine section.
    Section,
}

impl CarrierType {
    /// Canonical order used by the ordinate index and the serialised layout.
    pub const ALL: [CarrierType; 3] = [
        CarrierType::Girder,
        CarrierType::Plinth,
        CarrierType::Section,
    ];

    /// Returns the field-name prefix for this carrier type.
    pub const fn prefix(self) -> &'static str {
        match self {
            CarrierType::Girder => "Girder",
            CarrierType::Plinth => "Plinth",
            CarrierType::Section => "Section",
        }
    }

    pub(crate) const fn code(self) -> u8 {
        match self {
            CarrierType::Girder => 1,
            CarrierType::Plinth => 2,
            CarrierType::Section => 3,
        }
    }

    pub(crate) const fn slot(self) -> usize {
        self.code() as usize - 1
    }
}

impl fmt::Display for CarrierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

impl FromStr for CarrierType {
    type Err = RegistryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        CarrierType::ALL
            .into_iter()
            .find(|carrier| carrier.prefix() == raw)
            .ok_or_else(|| RegistryError::UnknownCarrierType(raw.to_owned()))
    }
}

/// Name of a support field, without the carrier prefix.
///
/// `Offset` and `Roll` receive shape validation during registration. Any other
/// name is kept verbatim as [`FieldName::Custom`] and bypasses shape checks.
///
/// Serialised as the bare name; decoding goes through `From<String>`, so
/// `"Offset"` and `"Roll"` always come back as the typed variants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldName {
    /// Translational displacement `(x, y, z)`.
    Offset,
    /// Rotation `(az, ax, ay)` about the z, x and y axes.
    Roll,
    /// Any other field name, stored without shape validation.
    ///
    /// The cutoff of a custom field must still be a single scalar: every
    /// sigma entry holds one `f64` cutoff, so a vector cutoff is rejected
    /// with [`RegistryError::NonScalarCutoff`] like it is for `Offset` and
    /// `Roll`. `Custom("Offset")` and `Custom("Roll")` are folded into the
    /// typed variants by [`FieldKey::new`] and by registration.
    Custom(String),
}

impl FieldName {
    /// Returns the unprefixed field name.
    pub fn as_str(&self) -> &str {
        match self {
            FieldName::Offset => "Offset",
            FieldName::Roll => "Roll",
            FieldName::Custom(name) => name.as_str(),
        }
    }

    /// Folds a custom name that spells `Offset` or `Roll` into the typed
    /// variant.
    pub fn canonical(self) -> Self {
        match self {
            FieldName::Custom(name) => FieldName::from(name),
            typed => typed,
        }
    }
}

impl From<&str> for FieldName {
    fn from(raw: &str) -> Self {
        match raw {
            "Offset" => FieldName::Offset,
            "Roll" => FieldName::Roll,
            other => FieldName::Custom(other.to_owned()),
        }
    }
}

impl From<String> for FieldName {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Offset" => FieldName::Offset,
            "Roll" => FieldName::Roll,
            _ => FieldName::Custom(raw),
        }
    }
}

impl From<FieldName> for String {
    fn from(field: FieldName) -> Self {
        match field {
            FieldName::Custom(name) => name,
            typed => typed.as_str().to_owned(),
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prefixed field identifier such as `GirderOffset` or `PlinthRoll`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldKey {
    /// Carrier type supplying the prefix.
    pub carrier: CarrierType,
    /// Unprefixed field name.
    pub field: FieldName,
}

impl FieldKey {
    /// Builds a key from its parts. Custom names spelling `Offset` or `Roll`
    /// map onto the typed variants.
    pub fn new(carrier: CarrierType, field: FieldName) -> Self {
        Self {
            carrier,
            field: field.canonical(),
        }
    }

    /// Nominal offset key for `carrier`.
    pub fn offset(carrier: CarrierType) -> Self {
        Self::new(carrier, FieldName::Offset)
    }

    /// Nominal roll key for `carrier`.
    pub fn roll(carrier: CarrierType) -> Self {
        Self::new(carrier, FieldName::Roll)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.carrier.prefix(), self.field)
    }
}

/// Normalised start/end pair of 1-based lattice indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrdinatePair {
    /// Upstream mounting point.
    pub start: usize,
    /// Downstream mounting point; may precede `start` on a ring.
    pub end: usize,
}

impl OrdinatePair {
    /// Creates a pair from already normalised indices.
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns `true` when the end ordinate precedes the start ordinate.
    pub const fn is_reversed(&self) -> bool {
        self.end < self.start
    }

    /// Both endpoints, start first.
    pub const fn endpoints(&self) -> [usize; 2] {
        [self.start, self.end]
    }
}
