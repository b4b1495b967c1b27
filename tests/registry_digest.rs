
use _fixtures::ring_model;
use lattice_supports::support::{registry_digest, serialize_registry, RegistrySnapshot};
use lattice_supports::{CarrierType, SigmaArray, SupportModel, SupportRegistration};

fn girders() -> SupportRegistration {
    SupportRegistration::from_pairs(CarrierType::Girder, &[(5, 20), (50, 70)])
        .offset(SigmaArray::start([1e-6, 1e-6, 1e-6]))
        .roll_with_cutoff(SigmaArray::start([1e-5, 0.0, 0.0]), 2.5)
}

fn plinths() -> SupportRegistration {
    SupportRegistration::from_pairs(CarrierType::Plinth, &[(1, 60), (61, 120)])
        .offset(SigmaArray::start_end([1e-5; 3], [2e-5; 3]))
}

fn registered(order: &[&SupportRegistration]) -> SupportModel {
    let mut model = ring_model();
    for registration in order {
        registration.apply(&mut model).expect("valid registration");
    }
    model
}

#[test]
fn digest_ignores_carrier_registration_order() {
    let (g, p) = (girders(), plinths());
    let forward = registered(&[&g, &p]);
    let backward = registered(&[&p, &g]);
    assert_eq!(serialize_registry(&forward), serialize_registry(&backward));
    assert_eq!(registry_digest(&forward), registry_digest(&backward));
}

#[test]
fn digest_is_stable_under_reregistration() {
    let g = girders();
    let once = registered(&[&g]);
    let twice = registered(&[&g, &g]);
    assert_eq!(registry_digest(&once), registry_digest(&twice));
}

#[test]
fn digest_tracks_cutoff_changes() {
    let base = registered(&[&girders()]);
    let tweaked = registered(&[&SupportRegistration::from_pairs(
        CarrierType::Girder,
        &[(5, 20), (50, 70)],
    )
    .offset_with_cutoff(SigmaArray::start([1e-6, 1e-6, 1e-6]), 3.0)
    .roll_with_cutoff(SigmaArray::start([1e-5, 0.0, 0.0]), 2.5)]);
    assert_ne!(registry_digest(&base), registry_digest(&tweaked));
}

#[test]
fn empty_registry_layout() {
    let model = ring_model();
    // version byte, three absent carrier slots, zero sigma entries
    let mut expected = vec![1u8, 0, 0, 0];
    expected.extend_from_slice(&0u64.to_le_bytes());
    assert_eq!(serialize_registry(&model), expected);
}

#[test]
fn snapshot_json_lists_entries_in_index_order() {
    let model = registered(&[&plinths()]);
    let snapshot = RegistrySnapshot::capture(&model);
    let indices: Vec<usize> = snapshot.sigmas.iter().map(|entry| entry.index).collect();
    assert_eq!(indices, vec![1, 60, 61, 120]);

    let json = snapshot.to_json().expect("snapshot encodes");
    let decoded: RegistrySnapshot = serde_json::from_str(&json).expect("snapshot decodes");
    assert_eq!(decoded, snapshot);
    assert_eq!(decoded.ordinates[0].carrier, CarrierType::Plinth);
    assert_eq!(decoded.ordinates[0].starts, vec![1, 61]);
    assert_eq!(decoded.ordinates[0].ends, vec![60, 120]);
}
