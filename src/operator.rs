//! Sparse linear operators that the chain complex and Hodge stars are built from.
//!
//! All operators share one interface:
//! accumulating application `y += alpha * A x` and its transpose,
//! in-place scaling and transposition.
//! Composite operators (block stacks, `AᵗA`, constrained saddle-point systems)
//! are variants of the same [`LinearOperator`] type
//! and delegate to their constituent operators.

use nalgebra as na;
use nalgebra_sparse as nas;
use nas::ops::{serial::spmm_csr_dense, Op};

use crate::{DecError, Result};

/// Shape of an operator as (rows, columns).
pub type Shape = (usize, usize);

/// A linear operator on dense vectors of reals.
#[derive(Clone, Debug, PartialEq)]
pub enum LinearOperator {
    /// A compressed sparse row matrix.
    Csr(nas::CsrMatrix<f64>),
    /// A diagonal matrix stored as its diagonal.
    Diagonal(na::DVector<f64>),
    /// Block-diagonal stack: block `i` acts on the `i`th slice of the input
    /// and writes into the `i`th slice of the output.
    DiagonalStack(Vec<LinearOperator>),
    /// Horizontal stack `[A B ...]` of operators with equal row counts.
    HorizontalStack(Vec<LinearOperator>),
    /// Vertical stack `[A; B; ...]` of operators with equal column counts.
    VerticalStack(Vec<LinearOperator>),
    /// The symmetric product `factor * AᵗA`.
    AtA {
        /// The operator `A`.
        a: Box<LinearOperator>,
        /// Scalar multiplier accumulated by [`LinearOperator::scale`].
        factor: f64,
    },
    /// The saddle-point operator `[[A, Cᵗ], [C, 0]]`
    /// for a problem `Ax = b` under constraints `Cx = k`.
    Constrained {
        /// The square problem operator.
        a: Box<LinearOperator>,
        /// The constraint operator.
        c: Box<LinearOperator>,
    },
}

/// Reusable scratch vectors for operators that need intermediate results
/// (currently [`LinearOperator::AtA`]).
///
/// Owned by the caller and passed explicitly
/// so that repeated applications don't reallocate.
#[derive(Clone, Debug, Default)]
pub struct OperatorWorkspace {
    buffers: Vec<Vec<f64>>,
}

impl OperatorWorkspace {
    /// Create an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a zeroed buffer of the given length out of the workspace.
    fn take(&mut self, len: usize) -> Vec<f64> {
        let mut buf = self.buffers.pop().unwrap_or_default();
        buf.clear();
        buf.resize(len, 0.0);
        buf
    }

    /// Return a buffer for later reuse.
    fn give(&mut self, buf: Vec<f64>) {
        self.buffers.push(buf);
    }
}

impl LinearOperator {
    //
    // constructors
    //

    /// Build a CSR operator from raw arrays.
    ///
    /// Column indices within a row don't need to be sorted,
    /// but each must be less than `ncols`,
    /// and `row_offsets` must have `nrows + 1` entries.
    pub fn from_csr_data(
        nrows: usize,
        ncols: usize,
        row_offsets: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<f64>,
    ) -> Result<Self> {
        nas::CsrMatrix::try_from_unsorted_csr_data(nrows, ncols, row_offsets, col_indices, values)
            .map(Self::Csr)
            .map_err(|e| DecError::InvalidOperator(format!("{e}")))
    }

    /// The null operator of the given shape.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self::Csr(nas::CsrMatrix::zeros(nrows, ncols))
    }

    /// A diagonal operator.
    pub fn diagonal(diagonal: na::DVector<f64>) -> Self {
        Self::Diagonal(diagonal)
    }

    /// Stack operators block-diagonally.
    pub fn diagonal_stack(blocks: Vec<LinearOperator>) -> Result<Self> {
        if blocks.is_empty() {
            return Err(empty_stack());
        }
        Ok(Self::DiagonalStack(blocks))
    }

    /// Stack operators side by side. All blocks must have the same number of rows.
    pub fn horizontal_stack(blocks: Vec<LinearOperator>) -> Result<Self> {
        let first = blocks.first().ok_or_else(empty_stack)?.shape();
        for block in &blocks[1..] {
            if block.nrows() != first.0 {
                return Err(DecError::ShapeMismatch {
                    operation: "horizontal_stack",
                    expected: (first.0, block.ncols()),
                    found: block.shape(),
                });
            }
        }
        Ok(Self::HorizontalStack(blocks))
    }

    /// Stack operators on top of each other. All blocks must have the same number of columns.
    pub fn vertical_stack(blocks: Vec<LinearOperator>) -> Result<Self> {
        let first = blocks.first().ok_or_else(empty_stack)?.shape();
        for block in &blocks[1..] {
            if block.ncols() != first.1 {
                return Err(DecError::ShapeMismatch {
                    operation: "vertical_stack",
                    expected: (block.nrows(), first.1),
                    found: block.shape(),
                });
            }
        }
        Ok(Self::VerticalStack(blocks))
    }

    /// The operator `AᵗA`.
    pub fn ata(a: LinearOperator) -> Self {
        Self::AtA {
            a: Box::new(a),
            factor: 1.0,
        }
    }

    /// The constrained operator `[[A, Cᵗ], [C, 0]]`.
    ///
    /// `a` must be square and `c` must have as many columns as `a`.
    pub fn constrained(a: LinearOperator, c: LinearOperator) -> Result<Self> {
        if a.nrows() != a.ncols() {
            return Err(DecError::ShapeMismatch {
                operation: "constrained",
                expected: (a.ncols(), a.ncols()),
                found: a.shape(),
            });
        }
        if c.ncols() != a.ncols() {
            return Err(DecError::ShapeMismatch {
                operation: "constrained",
                expected: (c.nrows(), a.ncols()),
                found: c.shape(),
            });
        }
        Ok(Self::Constrained {
            a: Box::new(a),
            c: Box::new(c),
        })
    }

    //
    // shape
    //

    /// Get the shape of the operator as (rows, columns).
    pub fn shape(&self) -> Shape {
        match self {
            Self::Csr(mat) => (mat.nrows(), mat.ncols()),
            Self::Diagonal(diag) => (diag.len(), diag.len()),
            Self::DiagonalStack(blocks) => blocks.iter().fold((0, 0), |(r, c), b| {
                let (br, bc) = b.shape();
                (r + br, c + bc)
            }),
            Self::HorizontalStack(blocks) => (
                blocks.first().map_or(0, |b| b.nrows()),
                blocks.iter().map(|b| b.ncols()).sum(),
            ),
            Self::VerticalStack(blocks) => (
                blocks.iter().map(|b| b.nrows()).sum(),
                blocks.first().map_or(0, |b| b.ncols()),
            ),
            Self::AtA { a, .. } => (a.ncols(), a.ncols()),
            Self::Constrained { a, c } => (a.nrows() + c.nrows(), a.ncols() + c.nrows()),
        }
    }

    /// Number of rows, i.e. the length of output vectors.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.shape().0
    }

    /// Number of columns, i.e. the length of input vectors.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.shape().1
    }

    //
    // application
    //

    /// Compute `y += alpha * A x`.
    pub fn apply_add(&self, alpha: f64, x: &[f64], y: &mut [f64]) -> Result<()> {
        self.apply_add_with(alpha, x, y, &mut OperatorWorkspace::new())
    }

    /// Compute `y += alpha * A x`, taking scratch space from `workspace`.
    pub fn apply_add_with(
        &self,
        alpha: f64,
        x: &[f64],
        y: &mut [f64],
        workspace: &mut OperatorWorkspace,
    ) -> Result<()> {
        self.check_vectors("apply_add", self.shape(), x.len(), y.len())?;
        self.add_product(alpha, x, y, false, workspace);
        Ok(())
    }

    /// Compute `y += alpha * Aᵗ x`.
    pub fn apply_transpose_add(&self, alpha: f64, x: &[f64], y: &mut [f64]) -> Result<()> {
        self.apply_transpose_add_with(alpha, x, y, &mut OperatorWorkspace::new())
    }

    /// Compute `y += alpha * Aᵗ x`, taking scratch space from `workspace`.
    pub fn apply_transpose_add_with(
        &self,
        alpha: f64,
        x: &[f64],
        y: &mut [f64],
        workspace: &mut OperatorWorkspace,
    ) -> Result<()> {
        let (rows, cols) = self.shape();
        self.check_vectors("apply_transpose_add", (cols, rows), x.len(), y.len())?;
        self.add_product(alpha, x, y, true, workspace);
        Ok(())
    }

    /// Compute `A x` into a new vector.
    pub fn apply(&self, x: &na::DVector<f64>) -> Result<na::DVector<f64>> {
        let mut y = na::DVector::zeros(self.nrows());
        self.apply_add(1.0, x.as_slice(), y.as_mut_slice())?;
        Ok(y)
    }

    /// Compute `Aᵗ x` into a new vector.
    pub fn apply_transpose(&self, x: &na::DVector<f64>) -> Result<na::DVector<f64>> {
        let mut y = na::DVector::zeros(self.ncols());
        self.apply_transpose_add(1.0, x.as_slice(), y.as_mut_slice())?;
        Ok(y)
    }

    fn check_vectors(
        &self,
        operation: &'static str,
        (out_len, in_len): Shape,
        x_len: usize,
        y_len: usize,
    ) -> Result<()> {
        if x_len != in_len || y_len != out_len {
            return Err(DecError::ShapeMismatch {
                operation,
                expected: (out_len, in_len),
                found: (y_len, x_len),
            });
        }
        Ok(())
    }

    /// `y += alpha * op(A) x` where `op` is the identity or transposition.
    /// Vector lengths have been checked by the caller.
    fn add_product(
        &self,
        alpha: f64,
        x: &[f64],
        y: &mut [f64],
        transpose: bool,
        ws: &mut OperatorWorkspace,
    ) {
        match self {
            Self::Csr(mat) => {
                let op = if transpose {
                    Op::Transpose(mat)
                } else {
                    Op::NoOp(mat)
                };
                let x = na::DMatrixView::from_slice(x, x.len(), 1);
                let y_len = y.len();
                let y = na::DMatrixViewMut::from_slice(y, y_len, 1);
                spmm_csr_dense(1.0, y, alpha, op, Op::NoOp(x));
            }
            Self::Diagonal(diag) => {
                for ((y_val, &x_val), &d) in y.iter_mut().zip(x).zip(diag.iter()) {
                    *y_val += alpha * d * x_val;
                }
            }
            Self::DiagonalStack(blocks) => {
                let (mut x_off, mut y_off) = (0, 0);
                for block in blocks {
                    let (r, c) = block.shape();
                    let (x_len, y_len) = if transpose { (r, c) } else { (c, r) };
                    block.add_product(
                        alpha,
                        &x[x_off..x_off + x_len],
                        &mut y[y_off..y_off + y_len],
                        transpose,
                        ws,
                    );
                    x_off += x_len;
                    y_off += y_len;
                }
            }
            // a horizontal stack applied transposed is a vertical stack of transposes
            // and vice versa, so both share the same two code paths
            Self::HorizontalStack(blocks) | Self::VerticalStack(blocks) => {
                let horizontal = matches!(self, Self::HorizontalStack(_));
                let splits_input = horizontal != transpose;
                let mut off = 0;
                for block in blocks {
                    let (r, c) = block.shape();
                    let len = if horizontal { c } else { r };
                    if splits_input {
                        block.add_product(alpha, &x[off..off + len], y, transpose, ws);
                    } else {
                        block.add_product(alpha, x, &mut y[off..off + len], transpose, ws);
                    }
                    off += len;
                }
            }
            // symmetric, so transposition doesn't matter
            Self::AtA { a, factor } => {
                let mut ax = ws.take(a.nrows());
                a.add_product(1.0, x, &mut ax, false, ws);
                a.add_product(alpha * factor, &ax, y, true, ws);
                ws.give(ax);
            }
            Self::Constrained { a, c } => {
                let n = a.ncols();
                let (x1, x2) = x.split_at(n);
                let (y1, y2) = y.split_at_mut(n);
                a.add_product(alpha, x1, y1, transpose, ws);
                c.add_product(alpha, x2, y1, true, ws);
                c.add_product(alpha, x1, y2, false, ws);
            }
        }
    }

    //
    // transformations
    //

    /// Multiply the operator by a scalar in place.
    pub fn scale(&mut self, alpha: f64) {
        match self {
            Self::Csr(mat) => {
                for val in mat.values_mut() {
                    *val *= alpha;
                }
            }
            Self::Diagonal(diag) => *diag *= alpha,
            Self::DiagonalStack(blocks)
            | Self::HorizontalStack(blocks)
            | Self::VerticalStack(blocks) => {
                for block in blocks {
                    block.scale(alpha);
                }
            }
            Self::AtA { factor, .. } => *factor *= alpha,
            Self::Constrained { a, c } => {
                a.scale(alpha);
                c.scale(alpha);
            }
        }
    }

    /// Build the transposed operator.
    pub fn transpose(&self) -> Self {
        let transpose_all = |blocks: &[LinearOperator]| blocks.iter().map(Self::transpose).collect();
        match self {
            Self::Csr(mat) => Self::Csr(mat.transpose()),
            Self::Diagonal(_) | Self::AtA { .. } => self.clone(),
            Self::DiagonalStack(blocks) => Self::DiagonalStack(transpose_all(blocks)),
            Self::HorizontalStack(blocks) => Self::VerticalStack(transpose_all(blocks)),
            Self::VerticalStack(blocks) => Self::HorizontalStack(transpose_all(blocks)),
            Self::Constrained { a, c } => Self::Constrained {
                a: Box::new(a.transpose()),
                c: c.clone(),
            },
        }
    }

    /// Assemble the operator into an explicit CSR matrix.
    ///
    /// Useful for handing the operator to a sparse solver.
    pub fn to_csr(&self) -> nas::CsrMatrix<f64> {
        let (rows, cols) = self.shape();
        let mut coo = nas::CooMatrix::new(rows, cols);
        self.push_triplets(0, 0, 1.0, false, &mut coo);
        nas::CsrMatrix::from(&coo)
    }

    fn push_triplets(
        &self,
        row_off: usize,
        col_off: usize,
        alpha: f64,
        transpose: bool,
        coo: &mut nas::CooMatrix<f64>,
    ) {
        // position of a block-local (row, col) in the output
        let at = |r: usize, c: usize| {
            if transpose {
                (row_off + c, col_off + r)
            } else {
                (row_off + r, col_off + c)
            }
        };
        let push_block = |blocks: &[LinearOperator],
                          advance_rows: bool,
                          advance_cols: bool,
                          coo: &mut nas::CooMatrix<f64>| {
            let (mut r_off, mut c_off) = (0, 0);
            for block in blocks {
                let (out_r, out_c) = at(r_off, c_off);
                block.push_triplets(out_r, out_c, alpha, transpose, coo);
                let (r, c) = block.shape();
                if advance_rows {
                    r_off += r;
                }
                if advance_cols {
                    c_off += c;
                }
            }
        };

        match self {
            Self::Csr(mat) => {
                for (r, c, &v) in mat.triplet_iter() {
                    let (r, c) = at(r, c);
                    coo.push(r, c, alpha * v);
                }
            }
            Self::Diagonal(diag) => {
                for (i, &v) in diag.iter().enumerate() {
                    let (r, c) = at(i, i);
                    coo.push(r, c, alpha * v);
                }
            }
            Self::AtA { a, factor } => {
                let a = a.to_csr();
                let ata = &a.transpose() * &a;
                for (r, c, &v) in ata.triplet_iter() {
                    let (r, c) = at(r, c);
                    coo.push(r, c, alpha * factor * v);
                }
            }
            Self::DiagonalStack(blocks) => push_block(blocks, true, true, coo),
            Self::HorizontalStack(blocks) => push_block(blocks, false, true, coo),
            Self::VerticalStack(blocks) => push_block(blocks, true, false, coo),
            Self::Constrained { a, c } => {
                let n = a.ncols();
                // blocks at (0,0): A, (0,n): Cᵗ, (n,0): C
                let (r0, c0) = at(0, 0);
                a.push_triplets(r0, c0, alpha, transpose, coo);
                let (r1, c1) = at(0, n);
                c.push_triplets(r1, c1, alpha, !transpose, coo);
                let (r2, c2) = at(n, 0);
                c.push_triplets(r2, c2, alpha, transpose, coo);
            }
        }
    }
}

impl From<nas::CsrMatrix<f64>> for LinearOperator {
    fn from(mat: nas::CsrMatrix<f64>) -> Self {
        Self::Csr(mat)
    }
}

fn empty_stack() -> DecError {
    DecError::InvalidOperator("must specify at least one operator to stack".to_string())
}
