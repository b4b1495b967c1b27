use serde::{Deserialize, Serialize};

use super::types::{CarrierType, OrdinatePair};
use super::validate::RegistryError;

/// Raw ordinate array as handed over by lattice construction code.
///
/// Row one holds the start points, row two the end points; column `i`
/// describes carrier `i`. Values are 1-based and may lie outside the ring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdinateMatrix {
    rows: Vec<Vec<i64>>,
}

impl OrdinateMatrix {
    /// Wraps arbitrary rows. Shape is checked at registration time.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Self {
        Self { rows }
    }

    /// Builds the canonical two-row layout from start and end points.
    pub fn new(starts: Vec<i64>, ends: Vec<i64>) -> Self {
        Self {
            rows: vec![starts, ends],
        }
    }

    /// Builds the matrix from `(start, end)` tuples, one per carrier.
    pub fn from_pairs(pairs: &[(i64, i64)]) -> Self {
        let (starts, ends) = pairs.iter().copied().unzip();
        Self::new(starts, ends)
    }

    /// Raw rows as given.
    pub fn rows(&self) -> &[Vec<i64>] {
        &self.rows
    }

    /// Checks the 2×N shape and returns `(starts, ends)` on success.
    pub(crate) fn as_start_end(&self) -> Result<(&[i64], &[i64]), RegistryError> {
        let shape_error = || RegistryError::OrdinateShape {
            rows: self.rows.len(),
            columns: self.rows.iter().map(Vec::len).collect(),
        };
        match self.rows.as_slice() {
            [starts, ends] if !starts.is_empty() && starts.len() == ends.len() => {
                Ok((starts.as_slice(), ends.as_slice()))
            }
            _ => Err(shape_error()),
        }
    }
}

/// Maps a raw 1-based ordinate onto the ring of `lattice_len` elements.
///
/// `((raw - 1) mod lattice_len) + 1` with Euclidean remainder, so values below
/// one and above the ring length both wrap to `1..=lattice_len`.
pub fn normalize_ordinate(raw: i64, lattice_len: usize) -> Result<usize, RegistryError> {
    if lattice_len == 0 {
        return Err(RegistryError::EmptyLattice);
    }
    let len = i128::try_from(lattice_len).map_err(|_| RegistryError::EmptyLattice)?;
    let wrapped = (i128::from(raw) - 1).rem_euclid(len) + 1;
    // `wrapped` lies in 1..=len, which fits `usize` because `len` came from one.
    Ok(wrapped as usize)
}

/// Normalised pairs registered for one carrier type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdinateSet {
    pairs: Vec<OrdinatePair>,
}

impl OrdinateSet {
    /// Normalises every column of `matrix` against `lattice_len`.
    pub fn normalize(matrix: &OrdinateMatrix, lattice_len: usize) -> Result<Self, RegistryError> {
        let (starts, ends) = matrix.as_start_end()?;
        let pairs = starts
            .iter()
            .zip(ends)
            .map(|(&start, &end)| {
                Ok(OrdinatePair::new(
                    normalize_ordinate(start, lattice_len)?,
                    normalize_ordinate(end, lattice_len)?,
                ))
            })
            .collect::<Result<Vec<_>, RegistryError>>()?;
        Ok(Self { pairs })
    }

    /// Registered pairs in column order.
    pub fn pairs(&self) -> &[OrdinatePair] {
        &self.pairs
    }

    /// Number of registered carriers.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if no carrier is registered.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Start points, one per carrier (row one of the 2×N layout).
    pub fn starts(&self) -> Vec<usize> {
        self.pairs.iter().map(|pair| pair.start).collect()
    }

    /// End points, one per carrier (row two of the 2×N layout).
    pub fn ends(&self) -> Vec<usize> {
        self.pairs.iter().map(|pair| pair.end).collect()
    }

    /// Returns `true` if `index` is a start or end point of any carrier.
    pub fn contains_endpoint(&self, index: usize) -> bool {
        self.pairs
            .iter()
            .any(|pair| pair.start == index || pair.end == index)
    }
}

/// Registered carriers, one slot per [`CarrierType`].
///
/// Each registration replaces the slot of its carrier type wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdinateIndex {
    slots: [Option<OrdinateSet>; 3],
}

impl OrdinateIndex {
    /// Returns the pairs registered for `carrier`, if any.
    pub fn get(&self, carrier: CarrierType) -> Option<&OrdinateSet> {
        self.slots[carrier.slot()].as_ref()
    }

    /// Replaces the slot of `carrier` and returns the previous set.
    pub(crate) fn replace(
        &mut self,
        carrier: CarrierType,
        set: OrdinateSet,
    ) -> Option<OrdinateSet> {
        self.slots[carrier.slot()].replace(set)
    }

    /// Iterates over registered carrier types in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (CarrierType, &OrdinateSet)> {
        CarrierType::ALL
            .into_iter()
            .filter_map(move |carrier| self.get(carrier).map(|set| (carrier, set)))
    }

    /// Returns `true` if `index` is an endpoint of any registered carrier.
    pub fn contains_endpoint(&self, index: usize) -> bool {
        self.iter().any(|(_, set)| set.contains_endpoint(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_below_and_above_range() {
        assert_eq!(normalize_ordinate(1, 10), Ok(1));
        assert_eq!(normalize_ordinate(10, 10), Ok(10));
        assert_eq!(normalize_ordinate(11, 10), Ok(1));
        assert_eq!(normalize_ordinate(0, 10), Ok(10));
        assert_eq!(normalize_ordinate(-1, 10), Ok(9));
        assert_eq!(normalize_ordinate(-20, 10), Ok(10));
        assert_eq!(normalize_ordinate(35, 10), Ok(5));
    }

    #[test]
    fn empty_lattice_rejected() {
        assert_eq!(normalize_ordinate(3, 0), Err(RegistryError::EmptyLattice));
    }

    #[test]
    fn ragged_rows_rejected() {
        let matrix = OrdinateMatrix::from_rows(vec![vec![1, 2], vec![3]]);
        let err = OrdinateSet::normalize(&matrix, 10).unwrap_err();
        assert_eq!(
            err,
            RegistryError::OrdinateShape {
                rows: 2,
                columns: vec![2, 1],
            }
        );
    }

    #[test]
    fn three_rows_rejected() {
        let matrix = OrdinateMatrix::from_rows(vec![vec![1], vec![2], vec![3]]);
        assert!(matches!(
            OrdinateSet::normalize(&matrix, 10),
            Err(RegistryError::OrdinateShape { rows: 3, .. })
        ));
    }

    #[test]
    fn pairs_follow_columns() {
        let matrix = OrdinateMatrix::new(vec![5, 50], vec![20, 70]);
        let set = OrdinateSet::normalize(&matrix, 100).expect("valid ordinates");
        assert_eq!(
            set.pairs(),
            &[OrdinatePair::new(5, 20), OrdinatePair::new(50, 70)]
        );
        assert_eq!(set.starts(), vec![5, 50]);
        assert_eq!(set.ends(), vec![20, 70]);
    }
}
