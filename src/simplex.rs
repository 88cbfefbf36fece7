//! Oriented simplices identified by their vertex indices.

use crate::{parity, DecError, Parity, Result};

/// A simplex given by its vertex indices and an orientation.
///
/// Vertices are stored in sorted (canonical) order,
/// and the orientation is stored as the [`Parity`]
/// of the originally given vertex order relative to the sorted one.
/// Equality, ordering and hashing only consider the sorted vertices;
/// the orientation is a sign attached to the simplex, not part of its identity.
#[derive(Clone, Debug)]
pub struct Simplex {
    vertices: Vec<usize>,
    parity: Parity,
}

impl Simplex {
    /// Create a simplex from vertex indices in any order,
    /// combining the parity of the order with `incoming_parity`.
    ///
    /// Fails if a vertex is repeated.
    pub fn new(vertices: &[usize], incoming_parity: Parity) -> Result<Self> {
        if vertices.is_empty() {
            return Err(DecError::InvalidPermutation(
                "a simplex needs at least one vertex".to_string(),
            ));
        }
        let mut sorted = vertices.to_vec();
        sorted.sort_unstable();
        let order_parity = parity::relative_parity(&sorted, vertices)?;
        Ok(Self {
            vertices: sorted,
            parity: incoming_parity + order_parity,
        })
    }

    /// Create a positively oriented simplex from vertex indices in any order.
    #[inline]
    pub fn from_vertices(vertices: &[usize]) -> Result<Self> {
        Self::new(vertices, Parity::Even)
    }

    /// Construct directly from already sorted, distinct vertices.
    #[inline]
    pub(crate) fn from_sorted(vertices: &[usize], parity: Parity) -> Self {
        debug_assert!(vertices.windows(2).all(|w| w[0] < w[1]));
        Self {
            vertices: vertices.to_vec(),
            parity,
        }
    }

    /// The vertex indices in sorted order.
    #[inline]
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    /// The orientation relative to the sorted vertex order.
    #[inline]
    pub fn parity(&self) -> Parity {
        self.parity
    }

    /// Dimension of the simplex, i.e. the number of vertices minus one.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.vertices.len() - 1
    }

    /// Iterate over the faces on the boundary of this simplex.
    ///
    /// Face `i` leaves out the `i`th vertex
    /// and has parity `own parity + i`, following the alternating sum convention.
    /// A 0-simplex has no boundary faces.
    #[inline]
    pub fn boundary(&self) -> Boundary<'_> {
        Boundary {
            simplex: self,
            omitted: 0,
        }
    }

    /// Check whether `other`, which must have the same vertex set,
    /// has the same orientation as `self`.
    ///
    /// Simplices with different vertex sets never match.
    #[inline]
    pub fn compare_parity(&self, other: &Simplex) -> bool {
        self.vertices == other.vertices && self.parity == other.parity
    }

    /// `self` with the opposite orientation.
    pub fn flipped(&self) -> Self {
        Self {
            vertices: self.vertices.clone(),
            parity: self.parity.flipped(),
        }
    }
}

impl PartialEq for Simplex {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices
    }
}

impl Eq for Simplex {}

impl std::hash::Hash for Simplex {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.vertices.hash(state);
    }
}

impl PartialOrd for Simplex {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Lexicographic order over the sorted vertices.
impl Ord for Simplex {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.vertices.cmp(&other.vertices)
    }
}

impl std::fmt::Display for Simplex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "simplex({:?}, parity={})", self.vertices, self.parity.bit())
    }
}

/// Lazy iterator over the boundary faces of a [`Simplex`].
///
/// Call [`Simplex::boundary`] again to start over.
#[derive(Clone, Debug)]
pub struct Boundary<'a> {
    simplex: &'a Simplex,
    omitted: usize,
}

impl<'a> Iterator for Boundary<'a> {
    type Item = Simplex;

    fn next(&mut self) -> Option<Self::Item> {
        let verts = &self.simplex.vertices;
        if verts.len() < 2 || self.omitted >= verts.len() {
            return None;
        }
        let i = self.omitted;
        self.omitted += 1;

        let mut face = Vec::with_capacity(verts.len() - 1);
        face.extend_from_slice(&verts[..i]);
        face.extend_from_slice(&verts[i + 1..]);
        Some(Simplex {
            vertices: face,
            parity: self.simplex.parity + Parity::of(i),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.simplex.vertices.len();
        let remaining = if len < 2 {
            0
        } else {
            len.saturating_sub(self.omitted)
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Boundary<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_sorts_and_records_parity() {
        let s = Simplex::from_vertices(&[2, 0, 1]).unwrap();
        assert_eq!(s.vertices(), &[0, 1, 2]);
        assert_eq!(s.parity(), Parity::Even);

        let s = Simplex::from_vertices(&[1, 0, 2]).unwrap();
        assert_eq!(s.vertices(), &[0, 1, 2]);
        assert_eq!(s.parity(), Parity::Odd);

        // incoming parity is combined with the order's parity
        let s = Simplex::new(&[1, 0, 2], Parity::Odd).unwrap();
        assert_eq!(s.parity(), Parity::Even);

        assert!(Simplex::from_vertices(&[1, 1, 2]).is_err());
        assert!(Simplex::from_vertices(&[]).is_err());
    }

    #[test]
    fn triangle_boundary() {
        let tri = Simplex::from_vertices(&[0, 1, 2]).unwrap();
        let faces: Vec<Simplex> = tri.boundary().collect();
        assert_eq!(faces.len(), 3);

        let expected = [([1, 2], 1.0), ([0, 2], -1.0), ([0, 1], 1.0)];
        for (face, (verts, sign)) in faces.iter().zip(expected) {
            assert_eq!(face.vertices(), &verts);
            assert_eq!(face.parity().sign(), sign);
        }

        // boundary can be generated again
        assert_eq!(tri.boundary().count(), 3);
        assert_eq!(tri.boundary().len(), 3);
    }

    #[test]
    fn boundary_of_odd_simplex_flips_signs() {
        let tri = Simplex::from_vertices(&[1, 0, 2]).unwrap();
        itertools::assert_equal(
            tri.boundary().map(|f| f.parity().sign()),
            [-1.0, 1.0, -1.0],
        );
    }

    #[test]
    fn vertex_has_no_boundary() {
        let v = Simplex::from_vertices(&[4]).unwrap();
        assert_eq!(v.dimension(), 0);
        assert_eq!(v.boundary().count(), 0);
    }

    #[test]
    fn identity_ignores_orientation() {
        let a = Simplex::from_vertices(&[3, 5]).unwrap();
        let b = Simplex::from_vertices(&[5, 3]).unwrap();
        assert_eq!(a, b);
        assert!(!a.compare_parity(&b));
        assert!(a.compare_parity(&b.flipped()));

        let c = Simplex::from_vertices(&[3, 6]).unwrap();
        assert!(a < c);
        assert!(!a.compare_parity(&c));
    }
}
