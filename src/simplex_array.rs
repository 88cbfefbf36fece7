//! Sorted arrays of same-dimensional simplices and boundary operator construction.
//!
//! This is the combinatorial core of complex construction:
//! the (k-1)-simplices of a complex are generated from the k-simplices
//! by emitting every face of every simplex, sorting the faces lexicographically
//! and collapsing runs of equal faces into one row of the boundary operator
//! (see the PyDEC paper section 7, <https://dl.acm.org/doi/pdf/10.1145/2382585.2382588>).

use itertools::{izip, Itertools};
use nalgebra_sparse as nas;

use crate::{parity, DecError, Parity, Result, Simplex};

/// A collection of simplices of one dimension,
/// each stored as a row of sorted vertex indices,
/// with rows in lexicographic order.
///
/// Indices are stored in a flat array
/// where every `simplex_size` entries form one simplex.
/// Each row carries the [`Parity`] of the vertex order it was given in
/// relative to its sorted order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimplexArray {
    simplex_size: usize,
    indices: Vec<usize>,
    parities: Vec<Parity>,
}

impl SimplexArray {
    /// Build an array from simplices given as a flat list of vertex indices,
    /// every `simplex_size` of which form one simplex.
    ///
    /// Each simplex is sorted and the parity of its given order recorded,
    /// after which the rows are sorted lexicographically, carrying their parities along.
    pub fn from_elements(simplex_size: usize, mut indices: Vec<usize>) -> Result<Self> {
        if simplex_size == 0 || indices.len() % simplex_size != 0 {
            return Err(DecError::InvalidMesh(format!(
                "{} indices can't be split into simplices of {simplex_size} vertices",
                indices.len()
            )));
        }

        let mut parities = Vec::with_capacity(indices.len() / simplex_size);
        for (row_idx, row) in indices.chunks_exact_mut(simplex_size).enumerate() {
            let row_parity = parity::parity_wrt_sorted(row).map_err(|_| {
                DecError::InvalidMesh(format!("simplex {row_idx} has repeated vertices: {row:?}"))
            })?;
            parities.push(row_parity);
            row.sort_unstable();
        }

        let mut sorted_indices = Vec::with_capacity(indices.len());
        let mut sorted_parities = Vec::with_capacity(parities.len());
        for (row, &row_parity) in indices
            .chunks_exact(simplex_size)
            .zip(&parities)
            .sorted_unstable_by_key(|(row, _)| *row)
        {
            sorted_indices.extend_from_slice(row);
            sorted_parities.push(row_parity);
        }

        Ok(Self {
            simplex_size,
            indices: sorted_indices,
            parities: sorted_parities,
        })
    }

    /// Construct from rows that are already sorted and deduplicated,
    /// all with canonical orientation.
    pub(crate) fn from_sorted_rows(simplex_size: usize, indices: Vec<usize>) -> Self {
        let len = indices.len() / simplex_size;
        Self {
            simplex_size,
            indices,
            parities: vec![Parity::Even; len],
        }
    }

    /// Number of vertices in each simplex.
    #[inline]
    pub fn simplex_size(&self) -> usize {
        self.simplex_size
    }

    /// Dimension of the simplices in the array.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.simplex_size - 1
    }

    /// Number of simplices in the array.
    #[inline]
    pub fn len(&self) -> usize {
        self.parities.len()
    }

    /// Whether the array contains no simplices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parities.is_empty()
    }

    /// The flat array of vertex indices.
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// The sorted vertex indices of the `i`th simplex.
    ///
    /// # Panics
    ///
    /// If `i` is not less than [`len`][Self::len].
    #[inline]
    pub fn row(&self, i: usize) -> &[usize] {
        let start = i * self.simplex_size;
        &self.indices[start..start + self.simplex_size]
    }

    /// The recorded orientation of the `i`th simplex.
    ///
    /// # Panics
    ///
    /// If `i` is not less than [`len`][Self::len].
    #[inline]
    pub fn parity(&self, i: usize) -> Parity {
        self.parities[i]
    }

    /// Iterate over the rows of the array.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, usize> {
        self.indices.chunks_exact(self.simplex_size)
    }

    /// The `i`th simplex as a [`Simplex`] carrying its recorded orientation.
    ///
    /// # Panics
    ///
    /// If `i` is not less than [`len`][Self::len].
    /// [`SimplicialComplex::simplex`][crate::SimplicialComplex::simplex]
    /// is the checked equivalent.
    pub fn simplex(&self, i: usize) -> Simplex {
        Simplex::from_sorted(self.row(i), self.parities[i])
    }

    /// Find the index of a sorted vertex tuple with binary search.
    pub fn position(&self, row: &[usize]) -> Option<usize> {
        if row.len() != self.simplex_size {
            return None;
        }
        // rows are stored flat, so there's no slice of rows to call `binary_search` on
        let (mut low, mut high) = (0, self.len());
        while low < high {
            let mid = (low + high) / 2;
            match self.row(mid).cmp(row) {
                std::cmp::Ordering::Less => low = mid + 1,
                std::cmp::Ordering::Greater => high = mid,
                std::cmp::Ordering::Equal => return Some(mid),
            }
        }
        None
    }

    /// Find the indices of several sorted vertex tuples,
    /// given as a flat array of `simplex_size`-length rows.
    ///
    /// Fails if the query length isn't a multiple of the simplex size
    /// or any of the queried simplices isn't in the array.
    pub fn search_sorted(&self, queries: &[usize]) -> Result<Vec<usize>> {
        if queries.len() % self.simplex_size != 0 {
            return Err(DecError::ShapeMismatch {
                operation: "search_sorted",
                expected: (queries.len() / self.simplex_size, self.simplex_size),
                found: (1, queries.len()),
            });
        }
        queries
            .chunks_exact(self.simplex_size)
            .map(|query| {
                self.position(query)
                    .ok_or_else(|| DecError::UnknownSimplex(query.to_vec()))
            })
            .collect()
    }

    /// Generate the unique faces of the simplices in this array
    /// and the boundary operator mapping chains on this array to chains on the faces.
    ///
    /// The operator has one row per face and one column per simplex in `self`.
    /// The face obtained by omitting the `i`th vertex of simplex `row`
    /// gets the coefficient `(-1)^(parity[row] + i)`.
    /// The returned faces are canonically oriented.
    ///
    /// Faces shared by more than two simplices are accepted,
    /// but the result then isn't the boundary operator of a manifold.
    /// 0-simplices have no faces and produce an error.
    pub fn boundary(&self) -> Result<(SimplexArray, nas::CsrMatrix<f64>)> {
        if self.simplex_size < 2 {
            return Err(DecError::DimensionOutOfRange {
                dimension: 0,
                max: self.dimension(),
            });
        }
        let face_size = self.simplex_size - 1;

        // collect every face of every simplex along with its orientation
        // and the simplex it came from
        // (these correspond to the matrix S++ in the PyDEC paper)
        let record_count = self.len() * self.simplex_size;
        let mut face_indices: Vec<usize> = Vec::with_capacity(record_count * face_size);
        let mut face_signs: Vec<f64> = Vec::with_capacity(record_count);
        let mut coface_indices: Vec<usize> = Vec::with_capacity(record_count);

        for (simplex_idx, (row, &row_parity)) in self.rows().zip(&self.parities).enumerate() {
            for omitted in 0..self.simplex_size {
                face_indices.extend_from_slice(&row[..omitted]);
                face_indices.extend_from_slice(&row[omitted + 1..]);
                face_signs.push((row_parity + Parity::of(omitted)).sign());
                coface_indices.push(simplex_idx);
            }
        }

        // sort faces lexicographically to bring duplicates next to each other

        let mut sorted_faces = Vec::with_capacity(face_indices.len());
        let mut sorted_signs = Vec::with_capacity(face_signs.len());
        let mut sorted_cofaces = Vec::with_capacity(coface_indices.len());
        for (face, sign, coface) in izip!(
            face_indices.chunks_exact(face_size),
            &face_signs,
            &coface_indices,
        )
        .sorted_unstable_by_key(|(face, _, _)| *face)
        {
            sorted_faces.extend_from_slice(face);
            sorted_signs.push(*sign);
            sorted_cofaces.push(*coface);
        }

        // one row per run of equal faces.
        // column indices and values are given directly
        // by the coface indices and signs, so only row offsets need computing
        let mut unique_faces: Vec<usize> = Vec::new();
        let mut row_offsets: Vec<usize> = vec![0];
        let mut overshared_faces = 0;

        let mut face_iter = sorted_faces.chunks_exact(face_size).enumerate().peekable();
        while let Some((record_idx, face)) = face_iter.next() {
            if matches!(face_iter.peek(), Some((_, next_face)) if *next_face == face) {
                continue;
            }
            let row_start = row_offsets.last().copied().unwrap_or(0);
            if record_idx + 1 - row_start > 2 {
                overshared_faces += 1;
            }
            row_offsets.push(record_idx + 1);
            unique_faces.extend_from_slice(face);
        }

        if overshared_faces > 0 {
            tracing::warn!(
                dimension = face_size - 1,
                count = overshared_faces,
                "faces shared by more than two simplices, the complex is not a manifold"
            );
        }

        let faces = SimplexArray::from_sorted_rows(face_size, unique_faces);
        let boundary = nas::CsrMatrix::try_from_unsorted_csr_data(
            faces.len(),
            self.len(),
            row_offsets,
            sorted_cofaces,
            sorted_signs,
        )
        .map_err(|e| DecError::InvalidOperator(format!("boundary construction failed: {e}")))?;

        tracing::trace!(
            dimension = self.dimension(),
            simplices = self.len(),
            faces = faces.len(),
            "built boundary operator"
        );

        Ok((faces, boundary))
    }
}
