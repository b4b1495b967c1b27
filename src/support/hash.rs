use crate::config::REGISTRY_DIGEST_DOMAIN_TAG;
use crate::lattice::ElementStore;

use super::registry::SupportModel;
use super::ser::serialize_registry;

/// Computes the canonical registry digest.
///
/// BLAKE3 over [`REGISTRY_DIGEST_DOMAIN_TAG`] followed by the layout of
/// [`serialize_registry`]. Two models with the same registered carriers and
/// the same uncertainty specs share a digest regardless of registration order
/// across carrier types.
pub fn registry_digest<S: ElementStore>(model: &SupportModel<S>) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(REGISTRY_DIGEST_DOMAIN_TAG);
    hasher.update(&serialize_registry(model));
    hasher.finalize().into()
}
