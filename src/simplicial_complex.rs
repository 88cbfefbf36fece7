//! The simplicial complex: the chain complex of a mesh
//! together with the primal and dual geometry needed for the Hodge star.

use std::cell::OnceCell;

use fixedbitset as fb;
use itertools::{izip, Itertools};
use nalgebra as na;
use nalgebra_sparse as nas;

use crate::{
    geometry, Cochain, DecError, LinearOperator, Primality, Result, Simplex, SimplexArray,
    SimplicialMesh,
};

/// How elementary dual volumes are accumulated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DualVolumeMode {
    /// Sum of the unsigned volumes of the elementary duals.
    #[default]
    Unsigned,
    /// Each elementary dual is signed by the barycentric coordinates
    /// of the circumcenters along its path,
    /// so that circumcenters outside their simplex give negative contributions.
    /// See Hirani et al. (2012). Delaunay Hodge Star,
    /// <https://www.sciencedirect.com/science/article/pii/S0010448512002436>
    Signed,
}

/// Options for building a [`SimplicialComplex`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComplexOptions {
    /// How dual volumes are accumulated. Defaults to unsigned.
    pub dual_volumes: DualVolumeMode,
    /// Reorient mesh elements to positive signed volume before building.
    /// Defaults to false.
    pub orient_elements: bool,
    /// Minimum barycentric coordinate of a circumcenter
    /// for [`SimplicialComplex::is_well_centered`]. Defaults to `1e-8`.
    pub well_centered_tolerance: f64,
}

impl Default for ComplexOptions {
    fn default() -> Self {
        Self {
            dual_volumes: DualVolumeMode::Unsigned,
            orient_elements: false,
            well_centered_tolerance: 1e-8,
        }
    }
}

impl ComplexOptions {
    /// Set the dual volume mode.
    pub fn with_dual_volumes(mut self, mode: DualVolumeMode) -> Self {
        self.dual_volumes = mode;
        self
    }

    /// Set whether elements are reoriented before building.
    pub fn with_orient_elements(mut self, orient: bool) -> Self {
        self.orient_elements = orient;
        self
    }

    /// Set the well-centeredness tolerance.
    pub fn with_well_centered_tolerance(mut self, tolerance: f64) -> Self {
        self.well_centered_tolerance = tolerance;
        self
    }
}

/// The simplices of one dimension of a complex
/// along with the operators connecting them to the neighboring dimensions
/// and lazily computed geometry.
#[derive(Clone, Debug)]
pub struct Subspace<const EMBED_DIM: usize> {
    dimension: usize,
    simplices: SimplexArray,
    /// `#(k-1) x #k` matrix mapping k-chains to (k-1)-chains.
    /// null operator with a single row for k = 0
    boundary: nas::CsrMatrix<f64>,
    /// `#(k+1) x #k` transpose of the next dimension's boundary,
    /// the exterior derivative on k-cochains.
    /// null operator with no rows for the top dimension.
    /// row `i` lists the faces of (k+1)-simplex `i`
    coboundary: nas::CsrMatrix<f64>,
    /// simplices on the boundary of the mesh
    mesh_boundary: fb::FixedBitSet,
    geometry: SubspaceGeometry<EMBED_DIM>,
}

/// Geometric quantities computed on first access
/// and cleared when the vertices change.
#[derive(Clone, Debug, Default)]
struct SubspaceGeometry<const EMBED_DIM: usize> {
    circumcenters: OnceCell<Circumcenters<EMBED_DIM>>,
    primal_volumes: OnceCell<na::DVector<f64>>,
    dual_volumes: OnceCell<na::DVector<f64>>,
    star: OnceCell<na::DVector<f64>>,
    star_inverse: OnceCell<na::DVector<f64>>,
}

#[derive(Clone, Debug)]
struct Circumcenters<const EMBED_DIM: usize> {
    points: Vec<na::SVector<f64, EMBED_DIM>>,
    /// barycentric coordinates of each circumcenter, `dimension + 1` per simplex
    barycentric: Vec<f64>,
}

impl<const EMBED_DIM: usize> Subspace<EMBED_DIM> {
    /// Dimension of the simplices in this subspace.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of simplices in this subspace.
    #[inline]
    pub fn len(&self) -> usize {
        self.simplices.len()
    }

    /// Whether this subspace has no simplices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.simplices.is_empty()
    }

    /// The simplices of this dimension in index order.
    #[inline]
    pub fn simplices(&self) -> &SimplexArray {
        &self.simplices
    }

    /// The boundary operator from this dimension to the one below.
    #[inline]
    pub fn boundary(&self) -> &nas::CsrMatrix<f64> {
        &self.boundary
    }

    /// The coboundary operator (exterior derivative) from this dimension to the one above.
    #[inline]
    pub fn coboundary(&self) -> &nas::CsrMatrix<f64> {
        &self.coboundary
    }

    /// The simplices of this dimension that lie on the boundary of the mesh.
    #[inline]
    pub fn mesh_boundary(&self) -> &fb::FixedBitSet {
        &self.mesh_boundary
    }
}

/// A simplicial complex built from a [`SimplicialMesh`]:
/// every dimension of simplex from vertices up to the mesh elements,
/// the boundary and coboundary operators between them,
/// and the circumcentric dual geometry.
///
/// Structure is fixed at construction.
/// Geometry (circumcenters, volumes, Hodge stars) is computed on first access
/// and cached until the vertices are changed with [`set_vertices`][Self::set_vertices].
/// The caches make the complex `!Sync`.
#[derive(Clone, Debug)]
pub struct SimplicialComplex<const EMBED_DIM: usize> {
    vertices: Vec<na::SVector<f64, EMBED_DIM>>,
    subspaces: Vec<Subspace<EMBED_DIM>>,
    options: ComplexOptions,
}

impl<const EMBED_DIM: usize> SimplicialComplex<EMBED_DIM> {
    /// Build a complex from a mesh with default options.
    pub fn new(mesh: SimplicialMesh<EMBED_DIM>) -> Result<Self> {
        Self::with_options(mesh, ComplexOptions::default())
    }

    /// Build a complex from raw vertices and a flat array of element indices,
    /// every `element_size` of which form one element.
    pub fn from_raw(
        vertices: Vec<na::SVector<f64, EMBED_DIM>>,
        element_size: usize,
        indices: Vec<usize>,
    ) -> Result<Self> {
        Self::new(SimplicialMesh::new(vertices, element_size, indices)?)
    }

    /// Build a complex from a mesh.
    ///
    /// The mesh elements are canonically sorted with their orientation recorded,
    /// and lower-dimensional simplices are generated as boundaries
    /// one dimension at a time down to the vertices.
    pub fn with_options(
        mut mesh: SimplicialMesh<EMBED_DIM>,
        options: ComplexOptions,
    ) -> Result<Self> {
        if options.orient_elements {
            mesh.orient()?;
        }
        let top_dim = mesh.manifold_dimension();

        // arrays and boundary operators from the top dimension down
        let mut arrays: Vec<SimplexArray> = Vec::with_capacity(top_dim + 1);
        let mut boundaries: Vec<nas::CsrMatrix<f64>> = Vec::with_capacity(top_dim + 1);
        let mut current = SimplexArray::from_elements(mesh.element_size(), mesh.indices().to_vec())?;
        for _ in 0..top_dim {
            let (faces, boundary) = current.boundary()?;
            arrays.push(current);
            boundaries.push(boundary);
            current = faces;
        }
        // vertices have the null operator into a single row as their boundary
        boundaries.push(nas::CsrMatrix::zeros(1, current.len()));
        arrays.push(current);
        arrays.reverse();
        boundaries.reverse();

        let mut coboundaries: Vec<nas::CsrMatrix<f64>> =
            boundaries.iter().skip(1).map(|b| b.transpose()).collect();
        coboundaries.push(nas::CsrMatrix::zeros(0, arrays[top_dim].len()));

        let mut subspaces: Vec<Subspace<EMBED_DIM>> =
            izip!(0.., arrays, boundaries, coboundaries)
                .map(|(dimension, simplices, boundary, coboundary)| Subspace {
                    dimension,
                    mesh_boundary: fb::FixedBitSet::with_capacity(simplices.len()),
                    simplices,
                    boundary,
                    coboundary,
                    geometry: SubspaceGeometry::default(),
                })
                .collect();

        Self::find_mesh_boundary(&mut subspaces);

        let complex = Self {
            vertices: mesh.vertices().to_vec(),
            subspaces,
            options,
        };
        tracing::debug!(
            dimension = top_dim,
            simplex_counts = ?complex.subspaces.iter().map(|s| s.len()).collect_vec(),
            "built simplicial complex"
        );
        Ok(complex)
    }

    /// Mark the simplices of every dimension that lie on the boundary of the mesh.
    fn find_mesh_boundary(subspaces: &mut [Subspace<EMBED_DIM>]) {
        let top_dim = subspaces.len() - 1;
        if top_dim == 0 {
            return;
        }

        // a codimension 1 simplex that bounds only one top-dimensional simplex
        // is on the boundary of the mesh
        let (lower, upper) = subspaces.split_at_mut(top_dim);
        let cod_1 = &mut lower[top_dim - 1];
        for (row_idx, cofaces) in upper[0].boundary.row_iter().enumerate() {
            if cofaces.nnz() == 1 {
                cod_1.mesh_boundary.insert(row_idx);
            }
        }

        // faces of boundary simplices are also on the boundary
        for dim in (1..top_dim).rev() {
            let (lower, upper) = subspaces.split_at_mut(dim);
            let lower = &mut lower[dim - 1];
            let upper = &upper[0];
            for simplex_idx in upper.mesh_boundary.ones() {
                for &face_idx in lower.coboundary.row(simplex_idx).col_indices() {
                    lower.mesh_boundary.insert(face_idx);
                }
            }
        }
    }

    //
    // structure
    //

    /// Dimension of the top-level simplices.
    #[inline]
    pub fn complex_dimension(&self) -> usize {
        self.subspaces.len() - 1
    }

    /// Dimension of the space the vertices live in.
    #[inline]
    pub fn embedding_dimension(&self) -> usize {
        EMBED_DIM
    }

    /// Vertex coordinates of the complex.
    ///
    /// Note that 0-simplex `i` is the vertex at `simplices(0)?.row(i)[0]`,
    /// which differs from `i` if the mesh has vertices not used by any element.
    #[inline]
    pub fn vertices(&self) -> &[na::SVector<f64, EMBED_DIM>] {
        &self.vertices
    }

    /// The options this complex was built with.
    #[inline]
    pub fn options(&self) -> &ComplexOptions {
        &self.options
    }

    /// Get the subspace of `k`-simplices.
    pub fn subspace(&self, k: usize) -> Result<&Subspace<EMBED_DIM>> {
        self.subspaces.get(k).ok_or(DecError::DimensionOutOfRange {
            dimension: k,
            max: self.complex_dimension(),
        })
    }

    /// Number of distinct `k`-simplices in the complex.
    pub fn number_of_simplices(&self, k: usize) -> Result<usize> {
        Ok(self.subspace(k)?.len())
    }

    /// The `k`-simplices in index order.
    pub fn simplices(&self, k: usize) -> Result<&SimplexArray> {
        Ok(&self.subspace(k)?.simplices)
    }

    /// Get the `i`th `k`-simplex.
    ///
    /// Top-level simplices carry the orientation of the mesh element they came from,
    /// lower-dimensional ones are canonically oriented.
    pub fn simplex(&self, k: usize, i: usize) -> Result<Simplex> {
        let simplices = self.simplices(k)?;
        if i >= simplices.len() {
            return Err(DecError::IndexOutOfRange {
                index: i,
                len: simplices.len(),
            });
        }
        Ok(simplices.simplex(i))
    }

    /// Find the index of a simplex among the simplices of its dimension.
    pub fn simplex_index(&self, simplex: &Simplex) -> Result<usize> {
        self.simplices(simplex.dimension())?
            .position(simplex.vertices())
            .ok_or_else(|| DecError::UnknownSimplex(simplex.vertices().to_vec()))
    }

    /// The set of `k`-simplices on the boundary of the mesh.
    /// Empty for the top dimension.
    pub fn mesh_boundary(&self, k: usize) -> Result<&fb::FixedBitSet> {
        Ok(&self.subspace(k)?.mesh_boundary)
    }

    //
    // operators
    //

    /// The boundary operator from `k`-chains to `(k-1)`-chains.
    pub fn boundary_operator(&self, k: usize) -> Result<LinearOperator> {
        Ok(LinearOperator::Csr(self.subspace(k)?.boundary.clone()))
    }

    /// The exterior derivative from primal `k`-cochains to primal `(k+1)`-cochains.
    pub fn d_operator(&self, k: usize) -> Result<LinearOperator> {
        Ok(LinearOperator::Csr(self.subspace(k)?.coboundary.clone()))
    }

    /// The diagonal Hodge star operator acting on `k`-cochains of the given primality.
    ///
    /// For primal cochains this maps to dual `(n-k)`-cochains,
    /// for dual cochains it is the signed inverse of the primal star of dimension `n-k`.
    pub fn star_operator(&self, k: usize, primality: Primality) -> Result<LinearOperator> {
        let diag = match primality {
            Primality::Primal => self.star(k)?,
            Primality::Dual => self.star_inverse(self.dual_to_primal_dim(k)?)?,
        };
        Ok(LinearOperator::Diagonal(diag.clone()))
    }

    /// Dimension of the primal simplices corresponding to dual `k`-cells.
    pub(crate) fn dual_to_primal_dim(&self, k: usize) -> Result<usize> {
        self.complex_dimension()
            .checked_sub(k)
            .ok_or(DecError::DimensionOutOfRange {
                dimension: k,
                max: self.complex_dimension(),
            })
    }

    //
    // cochains
    //

    /// Create a zero-valued `k`-cochain.
    pub fn cochain(&self, k: usize, primality: Primality) -> Result<Cochain<'_, EMBED_DIM>> {
        let len = self.cochain_len(k, primality)?;
        Ok(Cochain::from_parts(self, k, primality, na::DVector::zeros(len)))
    }

    /// Create a `k`-cochain with the given values.
    pub fn cochain_from_values(
        &self,
        k: usize,
        primality: Primality,
        values: na::DVector<f64>,
    ) -> Result<Cochain<'_, EMBED_DIM>> {
        let len = self.cochain_len(k, primality)?;
        if values.len() != len {
            return Err(DecError::ShapeMismatch {
                operation: "cochain_from_values",
                expected: (len, 1),
                found: (values.len(), 1),
            });
        }
        Ok(Cochain::from_parts(self, k, primality, values))
    }

    /// Number of values in a `k`-cochain of the given primality.
    pub(crate) fn cochain_len(&self, k: usize, primality: Primality) -> Result<usize> {
        let primal_dim = match primality {
            Primality::Primal => k,
            Primality::Dual => self.dual_to_primal_dim(k)?,
        };
        self.number_of_simplices(primal_dim)
    }

    //
    // geometry
    //

    /// Replace the vertex coordinates, keeping the structure of the complex.
    /// All cached geometry is discarded.
    pub fn set_vertices(&mut self, vertices: Vec<na::SVector<f64, EMBED_DIM>>) -> Result<()> {
        if vertices.len() != self.vertices.len() {
            return Err(DecError::InvalidMesh(format!(
                "expected {} vertices, got {}",
                self.vertices.len(),
                vertices.len()
            )));
        }
        self.vertices = vertices;
        self.reset_geometry();
        Ok(())
    }

    /// Discard all cached geometric quantities,
    /// so that they are recomputed on next access.
    pub fn reset_geometry(&mut self) {
        for subspace in &mut self.subspaces {
            subspace.geometry = SubspaceGeometry::default();
        }
    }

    fn simplex_points(&self, k: usize, i: usize) -> Vec<na::SVector<f64, EMBED_DIM>> {
        self.subspaces[k]
            .simplices
            .row(i)
            .iter()
            .map(|&vert| self.vertices[vert])
            .collect()
    }

    /// Fill in the vertices of a degenerate simplex error.
    fn with_vertices(&self, err: DecError, k: usize, i: usize) -> DecError {
        match err {
            DecError::DegenerateSimplex { dimension, .. } => DecError::DegenerateSimplex {
                dimension,
                vertices: self.subspaces[k].simplices.row(i).to_vec(),
            },
            other => other,
        }
    }

    fn circumcenter_data(&self, k: usize) -> Result<&Circumcenters<EMBED_DIM>> {
        let subspace = self.subspace(k)?;
        get_or_try_init(&subspace.geometry.circumcenters, || {
            let mut points = Vec::with_capacity(subspace.len());
            let mut barycentric = Vec::with_capacity(subspace.len() * (k + 1));
            for i in 0..subspace.len() {
                let simplex_points = self.simplex_points(k, i);
                let bary = geometry::barycentric_circumcenter(&simplex_points)
                    .map_err(|e| self.with_vertices(e, k, i))?;
                points.push(
                    izip!(bary.iter(), &simplex_points)
                        .map(|(&weight, p)| weight * p)
                        .sum(),
                );
                barycentric.extend(bary.iter());
            }
            tracing::debug!(dimension = k, "computed circumcenters");
            Ok(Circumcenters {
                points,
                barycentric,
            })
        })
    }

    /// Circumcenters of the `k`-simplices.
    /// For 0-simplices these are the vertices themselves.
    pub fn circumcenters(&self, k: usize) -> Result<&[na::SVector<f64, EMBED_DIM>]> {
        Ok(&self.circumcenter_data(k)?.points)
    }

    /// Barycentric coordinates of the circumcenters of the `k`-simplices,
    /// stored flat with `k + 1` coordinates per simplex.
    pub fn circumcenter_barycentric(&self, k: usize) -> Result<&[f64]> {
        Ok(&self.circumcenter_data(k)?.barycentric)
    }

    /// Primal volumes of the `k`-simplices.
    ///
    /// Vertices have volume 1.
    /// If the top-level simplices are full-dimensional in the embedding space,
    /// their volumes are signed according to the orientation of the original mesh elements.
    /// All other volumes are unsigned.
    pub fn primal_volumes(&self, k: usize) -> Result<&na::DVector<f64>> {
        let subspace = self.subspace(k)?;
        get_or_try_init(&subspace.geometry.primal_volumes, || {
            let signed = k > 0 && k == self.complex_dimension() && k == EMBED_DIM;
            let mut volumes = na::DVector::zeros(subspace.len());
            for (i, vol) in volumes.iter_mut().enumerate() {
                let points = self.simplex_points(k, i);
                let volume = if signed {
                    geometry::signed_volume(&points)
                        .map(|v| v * subspace.simplices.parity(i).sign())
                } else {
                    geometry::unsigned_volume(&points)
                };
                *vol = volume.map_err(|e| self.with_vertices(e, k, i))?;
            }
            tracing::debug!(dimension = k, signed, "computed primal volumes");
            Ok(volumes)
        })
    }

    /// Volumes of the circumcentric dual cells of the `k`-simplices.
    ///
    /// Dual cells of top-level simplices are points with volume 1.
    /// Computing these requires circumcenters of every dimension,
    /// and dual volumes of all dimensions are computed together.
    pub fn dual_volumes(&self, k: usize) -> Result<&na::DVector<f64>> {
        let subspace = self.subspace(k)?;
        get_or_try_init(&subspace.geometry.dual_volumes, || {
            let mut all_volumes = self.compute_dual_volumes()?;
            let own_volumes = std::mem::take(&mut all_volumes[k]);
            // fill in the other dimensions while we're at it
            for (other, volumes) in izip!(&self.subspaces, all_volumes) {
                if other.dimension != k {
                    other
                        .geometry
                        .dual_volumes
                        .get_or_init(|| na::DVector::from_vec(volumes));
                }
            }
            Ok(na::DVector::from_vec(own_volumes))
        })
    }

    fn compute_dual_volumes(&self) -> Result<Vec<Vec<f64>>> {
        let top_dim = self.complex_dimension();
        let centers = (0..=top_dim)
            .map(|k| self.circumcenters(k))
            .collect::<Result<Vec<_>>>()?;
        let barycentric = (0..=top_dim)
            .map(|k| self.circumcenter_barycentric(k))
            .collect::<Result<Vec<_>>>()?;

        let mut dual_volumes: Vec<Vec<f64>> =
            self.subspaces.iter().map(|s| vec![0.0; s.len()]).collect();
        // dual cells of top-dimensional simplices are points
        dual_volumes[top_dim].fill(1.0);

        let mut traversal = DualTraversal {
            subspaces: &self.subspaces,
            centers: &centers,
            barycentric: &barycentric,
            signed: self.options.dual_volumes == DualVolumeMode::Signed,
            dual_volumes: &mut dual_volumes,
            path: Vec::with_capacity(top_dim + 1),
        };
        // for each top-dimensional simplex,
        // generate the first circumcentric subdivision
        // (see Desbrun et al. (2005). Discrete Exterior Calculus, chapter 3)
        // and add each of its pieces to the corresponding dual volumes
        for top_idx in 0..self.subspaces[top_dim].len() {
            traversal.path.push(centers[top_dim][top_idx]);
            traversal.visit(top_dim, top_idx, 1.0);
            traversal.path.pop();
        }

        tracing::debug!(mode = ?self.options.dual_volumes, "computed dual volumes");
        Ok(dual_volumes)
    }

    /// Diagonal of the Hodge star on primal `k`-cochains:
    /// dual volume divided by primal volume.
    pub fn star(&self, k: usize) -> Result<&na::DVector<f64>> {
        let subspace = self.subspace(k)?;
        get_or_try_init(&subspace.geometry.star, || {
            let primal = self.primal_volumes(k)?;
            let dual = self.dual_volumes(k)?;
            Ok(dual.component_div(primal))
        })
    }

    /// Diagonal of the inverse Hodge star,
    /// mapping dual `(n-k)`-cochains back to primal `k`-cochains:
    /// primal volume divided by dual volume,
    /// with the sign `(-1)^(k(n-k))` so that applying both stars
    /// multiplies a primal cochain by that sign.
    pub fn star_inverse(&self, k: usize) -> Result<&na::DVector<f64>> {
        let subspace = self.subspace(k)?;
        get_or_try_init(&subspace.geometry.star_inverse, || {
            let primal = self.primal_volumes(k)?;
            let dual = self.dual_volumes(k)?;
            let diag = primal.component_div(dual);
            if k * (self.complex_dimension() - k) % 2 != 0 {
                Ok(-diag)
            } else {
                Ok(diag)
            }
        })
    }

    /// Check whether every top-level simplex contains its own circumcenter,
    /// with barycentric coordinates at least the configured tolerance.
    pub fn is_well_centered(&self) -> Result<bool> {
        let tolerance = self.options.well_centered_tolerance;
        Ok(self
            .circumcenter_barycentric(self.complex_dimension())?
            .iter()
            .all(|&coord| coord >= tolerance))
    }
}

/// State for the recursive walk through the circumcentric subdivision
/// of each top-level simplex.
struct DualTraversal<'a, const EMBED_DIM: usize> {
    subspaces: &'a [Subspace<EMBED_DIM>],
    centers: &'a [&'a [na::SVector<f64, EMBED_DIM>]],
    barycentric: &'a [&'a [f64]],
    signed: bool,
    /// accumulators for every dimension
    dual_volumes: &'a mut [Vec<f64>],
    /// circumcenters from the top-level simplex down to the current one,
    /// i.e. the vertices of the elementary dual being built
    path: Vec<na::SVector<f64, EMBED_DIM>>,
}

impl<const EMBED_DIM: usize> DualTraversal<'_, EMBED_DIM> {
    /// Add the elementary duals below simplex `idx` of dimension `dim`
    /// to the dual volumes of its faces, recursively.
    fn visit(&mut self, dim: usize, idx: usize, sign: f64) {
        if dim == 0 {
            return;
        }
        let subspaces = self.subspaces;
        let simplex = subspaces[dim].simplices.row(idx);
        let faces = subspaces[dim - 1].coboundary.row(idx);

        for &face_idx in faces.col_indices() {
            let next_sign = if self.signed {
                // the elementary dual is negative if the circumcenter of the simplex
                // is on the opposite side of the face from the rest of the simplex,
                // which shows up as a negative barycentric coordinate
                // for the vertex opposite the face
                let face = subspaces[dim - 1].simplices.row(face_idx);
                let opposite_bary = simplex
                    .iter()
                    .position(|vert| !face.contains(vert))
                    .map_or(1.0, |pos| self.barycentric[dim][idx * (dim + 1) + pos]);
                sign * opposite_bary.signum()
            } else {
                sign
            };

            self.path.push(self.centers[dim - 1][face_idx]);
            let volume = geometry::gram_volume(&self.path);
            self.dual_volumes[dim - 1][face_idx] += volume * next_sign;
            self.visit(dim - 1, face_idx, next_sign);
            self.path.pop();
        }
    }
}

/// `OnceCell::get_or_try_init` for stable Rust.
fn get_or_try_init<T>(cell: &OnceCell<T>, init: impl FnOnce() -> Result<T>) -> Result<&T> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = init()?;
    Ok(cell.get_or_init(|| value))
}

impl<const EMBED_DIM: usize> std::fmt::Display for SimplicialComplex<EMBED_DIM> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-dimensional simplicial complex in {}D space with simplex counts [{}]",
            self.complex_dimension(),
            EMBED_DIM,
            self.subspaces.iter().map(|s| s.len()).join(", ")
        )
    }
}
