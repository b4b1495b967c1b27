use crate::lattice::ElementStore;

use super::ordinates::OrdinateMatrix;
use super::registry::{RegistrationReport, SupportModel};
use super::types::{CarrierType, FieldName};
use super::uncertainty::{SigmaArray, SpecValue};
use super::validate::RegistryError;

/// Builder used to assemble one registration call.
///
/// | Method | Effect |
/// |--------|--------|
/// | `offset(sigma)` | `Offset` spec with the default cutoff |
/// | `offset_with_cutoff(sigma, c)` | `Offset` spec with cutoff `c` |
/// | `roll(sigma)` | `Roll` spec with the default cutoff |
/// | `roll_with_cutoff(sigma, c)` | `Roll` spec with cutoff `c` |
/// | `custom(name, value)` | Field by name; names other than `Offset`/`Roll` skip shape checks |
///
/// Specs are applied in the order they were added; a later spec for the same
/// field overwrites the earlier one at the same endpoints.
#[derive(Debug, Clone)]
pub struct SupportRegistration {
    carrier: CarrierType,
    ordinates: OrdinateMatrix,
    specs: Vec<(FieldName, SpecValue)>,
}

impl SupportRegistration {
    /// Starts a registration for `carrier` over the given ordinates.
    pub fn new(carrier: CarrierType, ordinates: OrdinateMatrix) -> Self {
        Self {
            carrier,
            ordinates,
            specs: Vec::new(),
        }
    }

    /// Convenience constructor taking `(start, end)` tuples.
    pub fn from_pairs(carrier: CarrierType, pairs: &[(i64, i64)]) -> Self {
        Self::new(carrier, OrdinateMatrix::from_pairs(pairs))
    }

    pub fn offset(self, sigma: SigmaArray) -> Self {
        self.spec(FieldName::Offset, SpecValue::sigma(sigma))
    }

    pub fn offset_with_cutoff(self, sigma: SigmaArray, cutoff: f64) -> Self {
        self.spec(FieldName::Offset, SpecValue::with_cutoff(sigma, cutoff))
    }

    pub fn roll(self, sigma: SigmaArray) -> Self {
        self.spec(FieldName::Roll, SpecValue::sigma(sigma))
    }

    pub fn roll_with_cutoff(self, sigma: SigmaArray, cutoff: f64) -> Self {
        self.spec(FieldName::Roll, SpecValue::with_cutoff(sigma, cutoff))
    }

    /// Adds a field by name. `"Offset"` and `"Roll"` resolve to the typed
    /// fields and are shape checked like them.
    pub fn custom(self, name: impl Into<String>, value: SpecValue) -> Self {
        let name: String = name.into();
        self.spec(FieldName::from(name), value)
    }

    /// Adds an arbitrary field/value pair.
    pub fn spec(mut self, field: FieldName, value: SpecValue) -> Self {
        self.specs.push((field.canonical(), value));
        self
    }

    pub fn carrier(&self) -> CarrierType {
        self.carrier
    }

    pub fn specs(&self) -> &[(FieldName, SpecValue)] {
        &self.specs
    }

    /// Runs the registration against `model`.
    pub fn apply<S: ElementStore>(
        &self,
        model: &mut SupportModel<S>,
    ) -> Result<RegistrationReport, RegistryError> {
        model.register(self.carrier, &self.ordinates, &self.specs)
    }
}
