//! Support-structure registration for accelerator lattice models.
//!
//! The crate records which lattice elements form the start and end of every
//! girder, plinth and section, resets their nominal offset and roll, and
//! stores the truncated-Gaussian uncertainty specs later used to draw random
//! misalignments. Drawing the errors and interpolating them onto mounted
//! elements are left to the callers; see [`support`] for the contract they
//! rely on.

pub mod config;
pub mod lattice;
pub mod support;

pub use config::{RegistryConfig, DEFAULT_CUTOFF};
pub use lattice::{ElementStore, Lattice, LatticeElement};
pub use support::{
    CarrierType, Diagnostic, FieldKey, FieldName, OrdinateMatrix, RegistrationReport,
    RegistryError, SigmaArray, SpecValue, SupportModel, SupportRegistration,
};

/// Result type used throughout the crate.
pub type SupportResult<T> = core::result::Result<T, RegistryError>;

/// Registers carriers of one type on `model`.
///
/// Free-function form of [`SupportModel::register`] for lattice construction
/// code that builds one registration per carrier type.
pub fn register_support<S: ElementStore>(
    model: &mut SupportModel<S>,
    carrier: CarrierType,
    ordinates: &OrdinateMatrix,
    specs: &[(FieldName, SpecValue)],
) -> SupportResult<RegistrationReport> {
    model.register(carrier, ordinates, specs)
}
