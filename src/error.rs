//! The error type shared by all fallible operations in the crate.

/// Error produced by complex construction, geometry computation
/// and operations on operators and cochains.
///
/// Every error is local to the call that produced it;
/// nothing is retried or recovered internally.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DecError {
    /// Operator or vector shapes don't fit together.
    #[error("shape mismatch in {operation}: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        /// Name of the operation that detected the mismatch.
        operation: &'static str,
        /// The shape (rows, columns) that was required.
        expected: (usize, usize),
        /// The shape (rows, columns) that was given.
        found: (usize, usize),
    },
    /// Operator data that doesn't describe a valid operator,
    /// e.g. malformed CSR arrays or an empty stack.
    #[error("invalid operator: {0}")]
    InvalidOperator(String),
    /// Two cochains can't be combined
    /// because they live on different complexes, dimensions or meshes.
    #[error("cochain mismatch in {operation}: {reason}")]
    CochainMismatch {
        /// Name of the operation that detected the mismatch.
        operation: &'static str,
        /// Which property differed.
        reason: String,
    },
    /// A dimension argument outside `0..=max`,
    /// or an operator applied past either end of the complex.
    #[error("dimension {dimension} is out of range (complex dimension is {max})")]
    DimensionOutOfRange {
        /// The requested dimension.
        dimension: usize,
        /// The highest valid dimension.
        max: usize,
    },
    /// A raw index outside a cochain or simplex collection.
    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Length of the indexed collection.
        len: usize,
    },
    /// Inputs to a parity computation are not permutations of each other.
    #[error("invalid permutation: {0}")]
    InvalidPermutation(String),
    /// Mesh data that doesn't describe a simplicial mesh.
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
    /// A simplex that doesn't exist in the complex was looked up.
    #[error("simplex {0:?} is not part of the complex")]
    UnknownSimplex(Vec<usize>),
    /// A dense solve or factorization failed
    /// because the simplex's points are coincident or affinely dependent.
    #[error("degenerate {dimension}-simplex with vertices {vertices:?}")]
    DegenerateSimplex {
        /// Dimension of the simplex.
        dimension: usize,
        /// Vertex indices of the simplex, if known.
        vertices: Vec<usize>,
    },
}

/// Result type alias with [`DecError`] as the error.
pub type Result<T> = std::result::Result<T, DecError>;
