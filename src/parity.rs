//! Permutation parity, used to keep track of simplex orientation.

use crate::{DecError, Result};

/// Parity of a permutation, i.e. whether it's made of
/// an even or odd number of transpositions.
///
/// Used as the orientation bit of a [`Simplex`][crate::Simplex]:
/// `Even` means the simplex is oriented like its sorted vertex order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Parity {
    /// An even number of transpositions, sign +1.
    #[default]
    Even,
    /// An odd number of transpositions, sign -1.
    Odd,
}

impl Parity {
    /// Get the parity of an integer, i.e. `n mod 2`.
    #[inline]
    pub fn of(n: usize) -> Self {
        if n % 2 == 0 {
            Self::Even
        } else {
            Self::Odd
        }
    }

    /// 0 for even, 1 for odd.
    #[inline]
    pub fn bit(self) -> usize {
        match self {
            Self::Even => 0,
            Self::Odd => 1,
        }
    }

    /// +1 for even, -1 for odd.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Self::Even => 1.0,
            Self::Odd => -1.0,
        }
    }

    /// The opposite parity.
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Self::Even => Self::Odd,
            Self::Odd => Self::Even,
        }
    }
}

/// Parities compose like addition mod 2.
impl std::ops::Add for Parity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::of(self.bit() + rhs.bit())
    }
}

/// Compute the parity of a permutation of the integers `0..perm.len()`.
///
/// Fails if `perm` contains an out-of-range or repeated value.
pub fn permutation_parity(perm: &[usize]) -> Result<Parity> {
    let mut seen = vec![false; perm.len()];
    for &p in perm {
        if p >= perm.len() || seen[p] {
            return Err(DecError::InvalidPermutation(format!(
                "{perm:?} is not a permutation of 0..{}",
                perm.len()
            )));
        }
        seen[p] = true;
    }

    // compute the number of distinct "cycles" in the permutation.
    // a cycle is a sequence where we take a permuted index
    // and look at the element at that index,
    // repeating until we arrive at the original index.
    // each swap changes the number of cycles by exactly 1,
    // so the parity is that of `len - cycle_count`
    let mut cycle_count = 0;

    'outer: for i in 0..perm.len() {
        let mut cycle_idx = perm[i];
        while cycle_idx != i {
            if cycle_idx < i {
                // this cycle was already counted starting from its smallest index
                continue 'outer;
            }
            cycle_idx = perm[cycle_idx];
        }
        cycle_count += 1;
    }

    Ok(Parity::of(perm.len() - cycle_count))
}

/// Compute the parity of the permutation that takes the order of `a`
/// to the order of `b`.
///
/// The slices need not contain the integers `0..len`,
/// but they must be permutations of each other without repeated elements.
pub fn relative_parity(a: &[usize], b: &[usize]) -> Result<Parity> {
    if a.len() != b.len() {
        return Err(DecError::InvalidPermutation(format!(
            "{a:?} and {b:?} have different lengths"
        )));
    }

    // positions of each element of `a`, sorted by element for lookup
    let mut a_positions: Vec<(usize, usize)> =
        a.iter().enumerate().map(|(pos, &val)| (val, pos)).collect();
    a_positions.sort_unstable();
    if a_positions.windows(2).any(|w| w[0].0 == w[1].0) {
        return Err(DecError::InvalidPermutation(format!(
            "{a:?} contains duplicate values"
        )));
    }

    let perm = b
        .iter()
        .map(|b_val| {
            a_positions
                .binary_search_by_key(b_val, |&(val, _)| val)
                .map(|found| a_positions[found].1)
                .map_err(|_| {
                    DecError::InvalidPermutation(format!(
                        "{b:?} is not a permutation of {a:?}"
                    ))
                })
        })
        .collect::<Result<Vec<usize>>>()?;

    // duplicates in `b` show up as repeated positions here
    permutation_parity(&perm).map_err(|_| {
        DecError::InvalidPermutation(format!("{b:?} is not a permutation of {a:?}"))
    })
}

/// Compute the parity of `a` relative to its own sorted order.
pub fn parity_wrt_sorted(a: &[usize]) -> Result<Parity> {
    let mut sorted = a.to_vec();
    sorted.sort_unstable();
    relative_parity(&sorted, a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    /// Reference parity by counting inversions.
    fn inversion_parity(perm: &[usize]) -> Parity {
        let inversions = (0..perm.len())
            .tuple_combinations()
            .filter(|&(i, j)| perm[i] > perm[j])
            .count();
        Parity::of(inversions)
    }

    #[test]
    fn parity_matches_inversion_count() {
        for n in 1..=5 {
            for perm in (0..n).permutations(n) {
                assert_eq!(
                    permutation_parity(&perm).unwrap(),
                    inversion_parity(&perm),
                    "wrong parity for {perm:?}"
                );
            }
        }
    }

    #[test]
    fn relative_parities() {
        assert_eq!(relative_parity(&[0, 1, 2], &[1, 0, 2]), Ok(Parity::Odd));
        assert_eq!(relative_parity(&[0, 1, 2], &[0, 1, 2]), Ok(Parity::Even));
        assert_eq!(relative_parity(&[4, 7, 9], &[9, 4, 7]), Ok(Parity::Even));
        assert_eq!(relative_parity(&[4, 7, 9], &[9, 7, 4]), Ok(Parity::Odd));
        assert_eq!(relative_parity(&[], &[]), Ok(Parity::Even));
    }

    /// Check that parities are computed correctly
    /// also when the permutation isn't of a range 0..len.
    #[test]
    fn parities_with_gaps() {
        let checks = [
            (vec![2, 5, 8, 10], Parity::Even),
            (vec![3, 1, 5], Parity::Odd),
            (vec![2, 0, 1], Parity::Even),
            (vec![8, 9, 7, 6, 15], Parity::Odd),
            (vec![8, 7, 9, 6, 15], Parity::Even),
            (vec![3, 2], Parity::Odd),
            (vec![5], Parity::Even),
            (vec![2, 3], Parity::Even),
        ];

        for (indices, parity) in checks {
            assert_eq!(
                Ok(parity),
                parity_wrt_sorted(&indices),
                "Permutation {indices:?} got wrong parity"
            );
        }
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert!(matches!(
            relative_parity(&[0, 1], &[0, 1, 2]),
            Err(DecError::InvalidPermutation(_))
        ));
        assert!(matches!(
            relative_parity(&[0, 0, 1], &[0, 1, 0]),
            Err(DecError::InvalidPermutation(_))
        ));
        assert!(matches!(
            relative_parity(&[0, 1, 2], &[0, 1, 1]),
            Err(DecError::InvalidPermutation(_))
        ));
        assert!(matches!(
            relative_parity(&[0, 1, 2], &[0, 1, 3]),
            Err(DecError::InvalidPermutation(_))
        ));
        assert!(matches!(
            permutation_parity(&[0, 2]),
            Err(DecError::InvalidPermutation(_))
        ));
    }

    #[test]
    fn parity_arithmetic() {
        assert_eq!(Parity::Odd + Parity::Odd, Parity::Even);
        assert_eq!(Parity::Even + Parity::Odd, Parity::Odd);
        assert_eq!(Parity::Odd.flipped(), Parity::Even);
        assert_eq!(Parity::of(7).sign(), -1.0);
    }
}
