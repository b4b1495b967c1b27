//! Registry configuration shared by lattice construction code and the
//! collaborators that consume the support stores.
//!
//! The module exposes the process-wide defaults applied while registering
//! support structures together with the domain tags used when hashing the
//! canonical registry layout. Configuration values are plain data: they can be
//! built in code, or loaded from JSON.
//!
//! | Field | Default | Meaning |
//! |-------|---------|---------|
//! | `default_cutoff` | [`DEFAULT_CUTOFF`] (`2.0`) | Truncation bound in standard deviations used when a spec carries no cutoff. |
//! | `report_reversed_pairs` | `true` | Emit a layout notice when end ordinates precede start ordinates. |

use serde::{Deserialize, Serialize};

use crate::support::RegistryError;

/// Cutoff applied to uncertainty specs given without an explicit cutoff.
pub const DEFAULT_CUTOFF: f64 = 2.0;

/// Fixed domain separator prepended to the canonical registry layout before
/// running BLAKE3. The tag is ASCII encoded.
pub const REGISTRY_DIGEST_DOMAIN_TAG: &[u8; 16] = b"LATTICE-SUPPORTS";

/// Version byte emitted at the head of the canonical registry layout.
pub const REGISTRY_LAYOUT_VERSION: u8 = 1;

/// Tunables applied by [`SupportModel`](crate::support::SupportModel) while
/// registering carriers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Cutoff in standard deviations used for specs without an explicit one.
    pub default_cutoff: f64,
    /// Whether reversed start/end pairs produce a layout notice.
    pub report_reversed_pairs: bool,
}

impl RegistryConfig {
    /// Returns the configuration used when nothing else is specified.
    pub const fn new() -> Self {
        Self {
            default_cutoff: DEFAULT_CUTOFF,
            report_reversed_pairs: true,
        }
    }

    /// Overrides the default cutoff. The cutoff must be finite and positive.
    pub fn with_default_cutoff(mut self, cutoff: f64) -> Result<Self, RegistryError> {
        self.default_cutoff = check_cutoff(cutoff)?;
        Ok(self)
    }

    /// Enables or disables the reversed-pair layout notice.
    pub fn with_reversed_pair_notice(mut self, enabled: bool) -> Self {
        self.report_reversed_pairs = enabled;
        self
    }

    /// Parses a configuration from JSON. Missing fields fall back to the
    /// defaults; unknown fields are rejected.
    pub fn from_json_str(raw: &str) -> Result<Self, RegistryError> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|err| RegistryError::InvalidConfig(err.to_string()))?;
        check_cutoff(config.default_cutoff)?;
        Ok(config)
    }
}

fn check_cutoff(cutoff: f64) -> Result<f64, RegistryError> {
    if cutoff.is_finite() && cutoff > 0.0 {
        Ok(cutoff)
    } else {
        Err(RegistryError::InvalidConfig(format!(
            "default_cutoff must be finite and positive, got {cutoff}"
        )))
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new()
    }
}
