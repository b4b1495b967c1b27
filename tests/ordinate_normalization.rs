
use _fixtures::{fodo_ring, ring_model, RING_LEN};
use lattice_supports::support::{normalize_ordinate, OrdinateSet};
use lattice_supports::{CarrierType, OrdinateMatrix, SupportModel};
use proptest::prelude::*;

proptest! {
    #[test]
    fn normalized_ordinate_is_in_range_and_congruent(raw in -10_000i64..10_000, len in 1usize..500) {
        let index = normalize_ordinate(raw, len).expect("non-empty lattice");
        prop_assert!((1..=len).contains(&index));
        prop_assert_eq!((index as i64 - raw).rem_euclid(len as i64), 0);
    }

    #[test]
    fn in_range_ordinates_are_unchanged(len in 1usize..500, offset in 0usize..500) {
        let raw = 1 + offset % len;
        prop_assert_eq!(normalize_ordinate(raw as i64, len), Ok(raw));
    }

    #[test]
    fn registered_pairs_are_normalized(
        pairs in prop::collection::vec((-400i64..400, -400i64..400), 1..12),
    ) {
        let mut model = SupportModel::new(fodo_ring(RING_LEN));
        let matrix = OrdinateMatrix::from_pairs(&pairs);
        model
            .register(CarrierType::Girder, &matrix, &[])
            .expect("well-formed ordinates");
        let set = model.ordinates().get(CarrierType::Girder).expect("registered");
        prop_assert_eq!(set.len(), pairs.len());
        for (pair, (start, end)) in set.pairs().iter().zip(&pairs) {
            prop_assert_eq!(Ok(pair.start), normalize_ordinate(*start, RING_LEN));
            prop_assert_eq!(Ok(pair.end), normalize_ordinate(*end, RING_LEN));
        }
    }
}

#[test]
fn wrap_around_carrier_spans_ring_end() {
    let mut model = ring_model();
    model
        .register(
            CarrierType::Section,
            &OrdinateMatrix::from_pairs(&[(RING_LEN as i64 - 5, RING_LEN as i64 + 7)]),
            &[],
        )
        .expect("wrap-around is legal");
    let set = model.ordinates().get(CarrierType::Section).expect("registered");
    assert_eq!(set.starts(), vec![RING_LEN - 5]);
    assert_eq!(set.ends(), vec![7]);
}

#[test]
fn single_column_matrix_is_accepted() {
    let matrix = OrdinateMatrix::new(vec![3], vec![9]);
    let set = OrdinateSet::normalize(&matrix, 10).expect("2x1 is a valid shape");
    assert_eq!(set.len(), 1);
}
