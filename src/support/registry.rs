use serde::{Deserialize, Serialize};
use tracing::{debug_span, info, trace, warn};

use crate::config::RegistryConfig;
use crate::lattice::{ElementStore, Lattice};

use super::ordinates::{OrdinateIndex, OrdinateMatrix, OrdinateSet};
use super::types::{CarrierType, FieldKey, FieldName, OrdinatePair};
use super::uncertainty::{EndpointDraw, SigmaStore, SpecValue, UncertaintySpec};
use super::validate::{count_reversed, resolve_cutoff, validate_spec, Diagnostic, RegistryError};

const ZERO3: [f64; 3] = [0.0; 3];

/// Outcome of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationReport {
    /// Carrier type that was (re)registered.
    pub carrier: CarrierType,
    /// Number of carriers now registered for that type.
    pub pairs: usize,
    /// Number of distinct sigma entries now stored for that type.
    pub sigma_entries: usize,
    /// Warnings and notices in the order they were raised.
    pub diagnostics: Vec<Diagnostic>,
}

impl RegistrationReport {
    /// Returns `true` when no diagnostic was raised.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Positional argument of the loose registration call convention.
///
/// The sequence is: carrier type text, ordinates, then alternating field name
/// text and uncertainty values.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// Carrier type or field name.
    Text(String),
    /// Ordinate array.
    Ordinates(OrdinateMatrix),
    /// Uncertainty value following a field name.
    Spec(SpecValue),
}

impl From<&str> for Argument {
    fn from(raw: &str) -> Self {
        Argument::Text(raw.to_owned())
    }
}

impl From<OrdinateMatrix> for Argument {
    fn from(matrix: OrdinateMatrix) -> Self {
        Argument::Ordinates(matrix)
    }
}

impl From<SpecValue> for Argument {
    fn from(value: SpecValue) -> Self {
        Argument::Spec(value)
    }
}

/// Support-structure state owned by a simulation model.
///
/// Holds the lattice element store, the ordinate index and the sigma store.
/// Registration mutates all three; the support-update and apply-errors
/// collaborators only read them.
#[derive(Debug, Clone, PartialEq)]
pub struct SupportModel<S = Lattice> {
    lattice: S,
    ordinates: OrdinateIndex,
    sigmas: SigmaStore,
    config: RegistryConfig,
}

impl<S: ElementStore> SupportModel<S> {
    /// Wraps a lattice with the default configuration.
    pub fn new(lattice: S) -> Self {
        Self::with_config(lattice, RegistryConfig::default())
    }

    /// Wraps a lattice with an explicit configuration.
    pub fn with_config(lattice: S, config: RegistryConfig) -> Self {
        Self {
            lattice,
            ordinates: OrdinateIndex::default(),
            sigmas: SigmaStore::default(),
            config,
        }
    }

    pub fn lattice(&self) -> &S {
        &self.lattice
    }

    /// Mutable lattice access for collaborators writing actual offsets.
    pub fn lattice_mut(&mut self) -> &mut S {
        &mut self.lattice
    }

    pub fn ordinates(&self) -> &OrdinateIndex {
        &self.ordinates
    }

    pub fn sigmas(&self) -> &SigmaStore {
        &self.sigmas
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Consumes the model and returns the lattice.
    pub fn into_lattice(self) -> S {
        self.lattice
    }

    /// Registers carriers of one type.
    ///
    /// All fatal checks run before the first write, including a
    /// [`ElementStore::contains`] pass over every endpoint, so an `Err` leaves
    /// the model untouched. On success the ordinate slot of `carrier` is
    /// replaced, the nominal `Offset` and `Roll` fields of every endpoint are
    /// zeroed and one sigma entry per spec and start point is written, plus one
    /// per end point for two-row specs. A zero-length carrier keeps its start
    /// row only.
    pub fn register(
        &mut self,
        carrier: CarrierType,
        ordinates: &OrdinateMatrix,
        specs: &[(FieldName, SpecValue)],
    ) -> Result<RegistrationReport, RegistryError> {
        let span = debug_span!("register_support", %carrier);
        let _guard = span.enter();

        let (starts, ends) = ordinates.as_start_end()?;
        let specs: Vec<(FieldName, &SpecValue)> = specs
            .iter()
            .map(|(field, value)| (field.clone().canonical(), value))
            .collect();
        let mut diagnostics = Vec::new();
        for (field, value) in &specs {
            if let Some(diagnostic) = validate_spec(carrier, field, value)? {
                warn!(
                    carrier = %carrier,
                    field = %field,
                    rows = value.sigma_array().row_count(),
                    "{diagnostic}"
                );
                diagnostics.push(diagnostic);
            }
        }
        if self.config.report_reversed_pairs {
            let reversed = count_reversed(starts, ends);
            if reversed > 0 {
                let notice = Diagnostic::LayoutNotice { carrier, reversed };
                info!(carrier = %carrier, reversed, "{notice}");
                diagnostics.push(notice);
            }
        }
        let set = OrdinateSet::normalize(ordinates, self.lattice.len())?;
        let pairs: Vec<OrdinatePair> = set.pairs().to_vec();
        if let Some(index) = pairs
            .iter()
            .flat_map(OrdinatePair::endpoints)
            .find(|&index| !self.lattice.contains(index))
        {
            return Err(RegistryError::ElementOutOfRange {
                index,
                len: self.lattice.len(),
            });
        }

        // Nominal writes go first; the slot and sigma entries change only
        // after every one of them succeeded.
        let offset_key = FieldKey::offset(carrier);
        let roll_key = FieldKey::roll(carrier);
        for index in pairs.iter().flat_map(OrdinatePair::endpoints) {
            self.lattice.set_field(index, &offset_key, &ZERO3)?;
            self.lattice.set_field(index, &roll_key, &ZERO3)?;
        }

        self.ordinates.replace(carrier, set);
        let cleared = self.sigmas.clear_carrier(carrier);
        if cleared > 0 {
            trace!(cleared, "dropped sigma entries of previous registration");
        }

        for (field, value) in &specs {
            let key = FieldKey::new(carrier, field.clone());
            let cutoff = resolve_cutoff(value, self.config.default_cutoff);
            let sigma = value.sigma_array();
            for pair in &pairs {
                let start = UncertaintySpec {
                    sigma: sigma.start_row().to_vec(),
                    cutoff,
                };
                trace!(index = pair.start, key = %key, "sigma entry");
                self.sigmas.insert(pair.start, key.clone(), start);
                let Some(row) = sigma.end_row() else {
                    continue;
                };
                if pair.end == pair.start {
                    continue;
                }
                let end = UncertaintySpec {
                    sigma: row.to_vec(),
                    cutoff,
                };
                trace!(index = pair.end, key = %key, "sigma entry");
                self.sigmas.insert(pair.end, key.clone(), end);
            }
        }

        Ok(RegistrationReport {
            carrier,
            pairs: pairs.len(),
            sigma_entries: self.sigmas.count_carrier(carrier),
            diagnostics,
        })
    }

    /// Registers carriers using the positional call convention.
    ///
    /// Returns `Ok(None)` without touching the model when fewer than two
    /// arguments are given.
    pub fn register_args(
        &mut self,
        args: &[Argument],
    ) -> Result<Option<RegistrationReport>, RegistryError> {
        let [carrier, ordinates, rest @ ..] = args else {
            return Ok(None);
        };
        let carrier: CarrierType = match carrier {
            Argument::Text(raw) => raw.parse()?,
            _ => {
                return Err(RegistryError::ArgumentKind {
                    position: 0,
                    expected: "a support type name",
                })
            }
        };
        let Argument::Ordinates(ordinates) = ordinates else {
            return Err(RegistryError::ArgumentKind {
                position: 1,
                expected: "an ordinate array",
            });
        };
        if rest.len() % 2 != 0 {
            return Err(RegistryError::UnpairedArguments { count: rest.len() });
        }
        let specs = rest
            .chunks_exact(2)
            .enumerate()
            .map(|(i, chunk)| match chunk {
                [Argument::Text(name), Argument::Spec(value)] => {
                    Ok((FieldName::from(name.as_str()), value.clone()))
                }
                [Argument::Text(_), _] => Err(RegistryError::ArgumentKind {
                    position: 3 + 2 * i,
                    expected: "an uncertainty value",
                }),
                _ => Err(RegistryError::ArgumentKind {
                    position: 2 + 2 * i,
                    expected: "an uncertainty field name",
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.register(carrier, ordinates, &specs).map(Some)
    }

    /// Reads a nominal or actual support field of an element.
    pub fn nominal(&self, index: usize, key: &FieldKey) -> Option<&[f64]> {
        self.lattice.field(index, key)
    }

    /// Tells the apply-errors collaborator how to treat the end of `pair`
    /// for `field` of `carrier`.
    pub fn endpoint_draw(
        &self,
        carrier: CarrierType,
        pair: OrdinatePair,
        field: FieldName,
    ) -> EndpointDraw<'_> {
        let key = FieldKey::new(carrier, field);
        let start = self.sigmas.get(pair.start, &key);
        // A zero-length carrier shares one entry between both endpoints.
        let end = if pair.start == pair.end {
            None
        } else {
            self.sigmas.get(pair.end, &key)
        };
        match (start, end) {
            (_, Some(end)) => EndpointDraw::Independent(end),
            (Some(_), None) => EndpointDraw::MirrorStart,
            (None, None) => EndpointDraw::Fixed,
        }
    }
}
