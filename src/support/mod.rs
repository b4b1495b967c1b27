#![forbid(unsafe_code)]

//! Support-structure registry.
//!
//! Girders, plinths and sections are carriers spanning a start and an end
//! element of the lattice. Elements mounted on a carrier inherit its
//! misalignment, so the carrier's own error model has to be declared before
//! any random errors are drawn. This module records that declaration.
//!
//! # Overview
//!
//! | Store | Keyed by | Written by | Read by |
//! |-------|----------|------------|---------|
//! | [`OrdinateIndex`] | [`CarrierType`] | [`SupportModel::register`] | support update |
//! | nominal fields | element index × [`FieldKey`] | [`SupportModel::register`] | support update, apply errors |
//! | [`SigmaStore`] | element index × [`FieldKey`] | [`SupportModel::register`] | apply errors |
//!
//! # Invariants
//!
//! * Registering a carrier type replaces its ordinate set wholesale and drops
//!   the sigma entries it wrote before; nothing accumulates across calls.
//! * Every endpoint of a registered pair has zero `Offset` and `Roll`
//!   immediately after registration.
//! * A single-row sigma writes only the start entry. The end point then
//!   mirrors the start's drawn value (rigid translation). A two-row sigma
//!   writes both entries and the endpoints are drawn independently (tilt).
//!   [`SupportModel::endpoint_draw`] encodes this rule for collaborators.
//! * Every index in the [`SigmaStore`] is an endpoint in the [`OrdinateIndex`].
//!
//! # Validation
//!
//! Structural problems (unknown carrier type, ordinate shape, unpaired
//! arguments, non-scalar cutoffs) are fatal [`RegistryError`]s and are
//! detected before anything is written. Sigma shape problems on `Offset` and
//! `Roll` are reported as [`Diagnostic::ShapeWarning`] and the value is stored
//! as given; reversed pairs are reported as [`Diagnostic::LayoutNotice`].
//! A two-row `Roll` is accepted. Custom field names are not shape checked;
//! custom names spelling `Offset` or `Roll` are the typed fields.

mod builder;
mod hash;
mod ordinates;
mod registry;
mod ser;
mod types;
mod uncertainty;
mod validate;


pub use builder::SupportRegistration;
pub use hash::registry_digest;
pub use ordinates::{normalize_ordinate, OrdinateIndex, OrdinateMatrix, OrdinateSet};
pub use registry::{Argument, RegistrationReport, SupportModel};
pub use ser::{serialize_registry, CarrierSnapshot, RegistrySnapshot, SigmaSnapshot};
pub use types::{CarrierType, FieldKey, FieldName, OrdinatePair};
pub use uncertainty::{EndpointDraw, SigmaArray, SigmaStore, SpecValue, UncertaintySpec};
pub use validate::{Diagnostic, RegistryError, Severity};
