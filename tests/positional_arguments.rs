
use _fixtures::ring_model;
use insta::assert_snapshot;
use lattice_supports::support::{Argument, FieldKey};
use lattice_supports::{CarrierType, OrdinateMatrix, RegistryError, SigmaArray, SpecValue};

fn girder_ordinates() -> Argument {
    OrdinateMatrix::new(vec![5, 50], vec![20, 70]).into()
}

#[test]
fn fewer_than_two_arguments_is_a_no_op() {
    let mut model = ring_model();
    let before = model.clone();
    assert_eq!(model.register_args(&[]), Ok(None));
    assert_eq!(model.register_args(&["Girder".into()]), Ok(None));
    assert_eq!(model, before);
}

#[test]
fn reference_girder_scenario() {
    let mut model = ring_model();
    let report = model
        .register_args(&[
            "Girder".into(),
            girder_ordinates(),
            "Offset".into(),
            SpecValue::sigma(SigmaArray::start([1e-6, 1e-6, 1e-6])).into(),
        ])
        .expect("valid call")
        .expect("registration ran");
    assert_eq!(report.carrier, CarrierType::Girder);

    let key = FieldKey::offset(CarrierType::Girder);
    let start = model.sigmas().get(5, &key).expect("start entry");
    assert_eq!(start.sigma, vec![1e-6, 1e-6, 1e-6]);
    assert_eq!(start.cutoff, 2.0);
    // 50 starts the second carrier and carries the same spec.
    assert_eq!(model.sigmas().get(50, &key), Some(start));
    assert!(model.sigmas().get(20, &key).is_none());
    assert!(model.sigmas().get(70, &key).is_none());
}

#[test]
fn unknown_carrier_type_cites_allowed_set() {
    let mut model = ring_model();
    let err = model
        .register_args(&["Magnet".into(), girder_ordinates()])
        .unwrap_err();
    assert!(err.is_invalid_argument());
    assert_snapshot!(err.to_string(), @"unknown support type 'Magnet', allowed: Girder, Plinth, Section");
}

#[test]
fn carrier_type_is_case_sensitive() {
    let mut model = ring_model();
    let err = model
        .register_args(&["girder".into(), girder_ordinates()])
        .unwrap_err();
    assert_eq!(err, RegistryError::UnknownCarrierType("girder".into()));
}

#[test]
fn unpaired_name_is_rejected() {
    let mut model = ring_model();
    let before = model.clone();
    let err = model
        .register_args(&["Plinth".into(), girder_ordinates(), "Offset".into()])
        .unwrap_err();
    assert_snapshot!(err.to_string(), @"uncertainty arguments must come in name/value pairs, got 1 trailing argument(s)");
    assert_eq!(model, before);
}

#[test]
fn ordinate_shape_is_checked() {
    let mut model = ring_model();
    let err = model
        .register_args(&[
            "Section".into(),
            OrdinateMatrix::from_rows(vec![vec![1, 2, 3]]).into(),
        ])
        .unwrap_err();
    assert_snapshot!(err.to_string(), @"ordinates must be a non-empty 2xN array, got 1 row(s) with lengths [3]");

    let err = model
        .register_args(&[
            "Section".into(),
            OrdinateMatrix::new(vec![], vec![]).into(),
        ])
        .unwrap_err();
    assert!(matches!(err, RegistryError::OrdinateShape { rows: 2, .. }));
}

#[test]
fn argument_kinds_are_checked() {
    let mut model = ring_model();
    let err = model
        .register_args(&[girder_ordinates(), girder_ordinates()])
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::ArgumentKind {
            position: 0,
            expected: "a support type name",
        }
    );

    let err = model
        .register_args(&["Girder".into(), "Offset".into()])
        .unwrap_err();
    assert_snapshot!(err.to_string(), @"argument 1 must be an ordinate array");

    let err = model
        .register_args(&["Girder".into(), girder_ordinates(), "Offset".into(), "Roll".into()])
        .unwrap_err();
    assert_snapshot!(err.to_string(), @"argument 3 must be an uncertainty value");
}

#[test]
fn non_scalar_cutoff_is_fatal() {
    let mut model = ring_model();
    let err = model
        .register_args(&[
            "Girder".into(),
            girder_ordinates(),
            "Roll".into(),
            SpecValue::WithCutoff {
                sigma: SigmaArray::start([1e-4, 0.0, 0.0]),
                cutoff: vec![2.0, 2.0],
            }
            .into(),
        ])
        .unwrap_err();
    assert_snapshot!(err.to_string(), @"cutoff for GirderRoll must be a single scalar, got 2 value(s)");
    assert!(model.ordinates().get(CarrierType::Girder).is_none());
}

#[test]
fn custom_name_is_stored_verbatim() {
    let mut model = ring_model();
    model
        .register_args(&[
            "Plinth".into(),
            girder_ordinates(),
            "Twist".into(),
            SpecValue::with_cutoff(SigmaArray::from_rows(vec![vec![1.0, 2.0, 3.0, 4.0]]), 3.0)
                .into(),
        ])
        .expect("valid call")
        .expect("registration ran");
    let snapshot = lattice_supports::support::RegistrySnapshot::capture(&model);
    let keys: Vec<_> = snapshot.sigmas.iter().map(|entry| entry.key.as_str()).collect();
    assert_eq!(keys, vec!["PlinthTwist", "PlinthTwist"]);
    assert!(snapshot.sigmas.iter().all(|entry| entry.cutoff == 3.0));
}
