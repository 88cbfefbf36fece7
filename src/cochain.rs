//! Cochains, i.e. values assigned to the cells of a complex,
//! and the operators of exterior calculus acting on them.

use nalgebra as na;
use nalgebra_sparse as nas;

use crate::{DecError, Result, Simplex, SimplicialComplex};

/// Whether a cochain lives on the primal complex or its circumcentric dual.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primality {
    /// Values on the simplices of the complex.
    Primal,
    /// Values on the cells of the dual complex.
    /// A dual `k`-cell corresponds to a primal `(n-k)`-simplex.
    Dual,
}

impl Primality {
    /// The opposite primality.
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Self::Primal => Self::Dual,
            Self::Dual => Self::Primal,
        }
    }
}

/// A vector of values on the `k`-dimensional cells of a complex.
///
/// Cochains are created with [`SimplicialComplex::cochain`]
/// or [`SimplicialComplex::cochain_from_values`]
/// and borrow the complex they were created from.
/// Operators return new cochains and never modify their operand.
///
/// Values are stored in the index order of the complex's simplices,
/// each with respect to the orientation the complex stores for that simplex:
/// the orientation of the mesh element for top-level simplices
/// and the sorted vertex order for all others.
#[derive(Clone)]
pub struct Cochain<'a, const EMBED_DIM: usize> {
    complex: &'a SimplicialComplex<EMBED_DIM>,
    dimension: usize,
    primality: Primality,
    values: na::DVector<f64>,
}

impl<'a, const EMBED_DIM: usize> Cochain<'a, EMBED_DIM> {
    /// The length of `values` must already match the dimension and primality.
    #[inline]
    pub(crate) fn from_parts(
        complex: &'a SimplicialComplex<EMBED_DIM>,
        dimension: usize,
        primality: Primality,
        values: na::DVector<f64>,
    ) -> Self {
        Self {
            complex,
            dimension,
            primality,
            values,
        }
    }

    /// Dimension of the cells this cochain lives on.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Whether this is a primal or dual cochain.
    #[inline]
    pub fn primality(&self) -> Primality {
        self.primality
    }

    /// The complex this cochain is defined on.
    #[inline]
    pub fn complex(&self) -> &'a SimplicialComplex<EMBED_DIM> {
        self.complex
    }

    /// Number of values in the cochain.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the cochain has no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The underlying values in canonical orientation.
    #[inline]
    pub fn values(&self) -> &na::DVector<f64> {
        &self.values
    }

    /// Mutable access to the values in canonical orientation.
    #[inline]
    pub fn values_mut(&mut self) -> &mut [f64] {
        self.values.as_mut_slice()
    }

    /// Take the underlying values out of the cochain.
    #[inline]
    pub fn into_values(self) -> na::DVector<f64> {
        self.values
    }

    /// Get the value at a raw index, without orientation correction.
    pub fn get_index(&self, index: usize) -> Result<f64> {
        self.values
            .get(index)
            .copied()
            .ok_or(DecError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    /// Set the value at a raw index, without orientation correction.
    pub fn set_index(&mut self, index: usize, value: f64) -> Result<()> {
        let len = self.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(DecError::IndexOutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Find the index of `simplex` and the sign relating its orientation
    /// to the stored one.
    ///
    /// For dual cochains the simplex is the primal simplex the dual cell belongs to.
    fn locate(&self, simplex: &Simplex) -> Result<(usize, f64)> {
        let primal_dim = match self.primality {
            Primality::Primal => self.dimension,
            Primality::Dual => self.complex.dual_to_primal_dim(self.dimension)?,
        };
        if simplex.dimension() != primal_dim {
            return Err(DecError::CochainMismatch {
                operation: "simplex lookup",
                reason: format!(
                    "a {}-simplex doesn't index a {:?} {}-cochain",
                    simplex.dimension(),
                    self.primality,
                    self.dimension
                ),
            });
        }
        let index = self.complex.simplex_index(simplex)?;
        let stored = self.complex.simplex(primal_dim, index)?;
        let sign = if simplex.compare_parity(&stored) {
            1.0
        } else {
            -1.0
        };
        Ok((index, sign))
    }

    /// Get the value on a simplex, negated if the simplex is oriented
    /// opposite to the stored orientation.
    pub fn get(&self, simplex: &Simplex) -> Result<f64> {
        let (index, sign) = self.locate(simplex)?;
        Ok(sign * self.values[index])
    }

    /// Set the value on a simplex, negated if the simplex is oriented
    /// opposite to the stored orientation.
    pub fn set(&mut self, simplex: &Simplex, value: f64) -> Result<()> {
        let (index, sign) = self.locate(simplex)?;
        self.values[index] = sign * value;
        Ok(())
    }

    //
    // algebra
    //

    fn check_compatible(&self, other: &Self, operation: &'static str) -> Result<()> {
        let reason = if !std::ptr::eq(self.complex, other.complex) {
            "cochains are defined on different complexes".to_string()
        } else if self.dimension != other.dimension {
            format!("dimensions {} and {}", self.dimension, other.dimension)
        } else if self.primality != other.primality {
            format!("primalities {:?} and {:?}", self.primality, other.primality)
        } else {
            return Ok(());
        };
        Err(DecError::CochainMismatch { operation, reason })
    }

    /// Pointwise sum of two cochains of the same kind on the same complex.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.check_compatible(other, "add")?;
        Ok(self.with_values(&self.values + &other.values))
    }

    /// Pointwise difference of two cochains of the same kind on the same complex.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.check_compatible(other, "sub")?;
        Ok(self.with_values(&self.values - &other.values))
    }

    /// Multiply every value by a scalar.
    pub fn scale(&self, factor: f64) -> Self {
        self.with_values(factor * &self.values)
    }

    /// A cochain of the same kind with the given values.
    fn with_values(&self, values: na::DVector<f64>) -> Self {
        Self::from_parts(self.complex, self.dimension, self.primality, values)
    }

    /// Apply a sparse matrix scaled by `alpha` to the values.
    fn apply(
        &self,
        mat: &nas::CsrMatrix<f64>,
        alpha: f64,
        dimension: usize,
        primality: Primality,
    ) -> Self {
        let values = alpha * (mat * &self.values);
        Self::from_parts(self.complex, dimension, primality, values)
    }

    /// The exterior derivative, mapping `k`-cochains to `(k+1)`-cochains.
    ///
    /// Primal cochains are mapped with the coboundary operator.
    /// Dual cochains are mapped with the boundary operator of primal dimension `n-k`
    /// scaled by `(-1)^k`, because the dual complex has the opposite orientation convention.
    /// On dual 0-cochains the boundary is taken with respect to the orientation
    /// of the embedding space (the sign of each element's primal volume),
    /// so the result doesn't depend on the vertex order of the mesh elements.
    /// Fails on `n`-cochains, for which there is nothing above.
    pub fn d(&self) -> Result<Self> {
        let top_dim = self.complex.complex_dimension();
        if self.dimension >= top_dim {
            return Err(DecError::DimensionOutOfRange {
                dimension: self.dimension + 1,
                max: top_dim,
            });
        }
        let result = match self.primality {
            Primality::Primal => {
                let coboundary = self.complex.subspace(self.dimension)?.coboundary();
                self.apply(coboundary, 1.0, self.dimension + 1, Primality::Primal)
            }
            Primality::Dual if self.dimension == 0 => {
                // dual vertices are unoriented, but the top-level boundary operator
                // carries the orientation of each mesh element.
                // flip negatively oriented elements back to the orientation of the space
                let orientation = self.complex.primal_volumes(top_dim)?.map(f64::signum);
                let oriented = self.with_values(self.values.component_mul(&orientation));
                let boundary = self.complex.subspace(top_dim)?.boundary();
                oriented.apply(boundary, 1.0, 1, Primality::Dual)
            }
            Primality::Dual => {
                let boundary = self.complex.subspace(top_dim - self.dimension)?.boundary();
                let sign = if self.dimension % 2 == 0 { 1.0 } else { -1.0 };
                self.apply(boundary, sign, self.dimension + 1, Primality::Dual)
            }
        };
        Ok(result)
    }

    /// The Hodge star, mapping `k`-cochains to `(n-k)`-cochains of the opposite primality.
    ///
    /// Applying the star twice to a primal `k`-cochain multiplies it by `(-1)^(k(n-k))`.
    pub fn star(&self) -> Result<Self> {
        let target_dim = self.complex.dual_to_primal_dim(self.dimension)?;
        let diag = match self.primality {
            Primality::Primal => self.complex.star(self.dimension)?,
            Primality::Dual => self.complex.star_inverse(target_dim)?,
        };
        Ok(Self::from_parts(
            self.complex,
            target_dim,
            self.primality.flipped(),
            self.values.component_mul(diag),
        ))
    }

    /// The codifferential `±⋆d⋆`, mapping `k`-cochains to `(k-1)`-cochains.
    ///
    /// The result is negated when `n(k-1) + 1` is odd.
    /// Fails on 0-cochains.
    pub fn delta(&self) -> Result<Self> {
        let top_dim = self.complex.complex_dimension();
        if self.dimension == 0 {
            return Err(DecError::DimensionOutOfRange {
                dimension: self.dimension,
                max: top_dim,
            });
        }
        let star_d_star = self.star()?.d()?.star()?;
        if (top_dim * (self.dimension - 1) + 1) % 2 != 0 {
            Ok(-star_d_star)
        } else {
            Ok(star_d_star)
        }
    }

    /// The Laplace-de Rham operator `dδ + δd`.
    ///
    /// Terms that would leave the complex are treated as zero,
    /// i.e. this is `δd` on 0-cochains and `dδ` on `n`-cochains.
    pub fn laplace_de_rham(&self) -> Result<Self> {
        let top_dim = self.complex.complex_dimension();
        let mut result = self.with_values(na::DVector::zeros(self.len()));
        if self.dimension > 0 {
            result.values += self.delta()?.d()?.values;
        }
        if self.dimension < top_dim {
            result.values += self.d()?.delta()?.values;
        }
        Ok(result)
    }

    /// The Laplace-Beltrami operator `δd`.
    ///
    /// Zero on `n`-cochains.
    pub fn laplace_beltrami(&self) -> Result<Self> {
        if self.dimension == self.complex.complex_dimension() {
            return Ok(self.with_values(na::DVector::zeros(self.len())));
        }
        self.d()?.delta()
    }
}

impl<const EMBED_DIM: usize> PartialEq for Cochain<'_, EMBED_DIM> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.complex, other.complex)
            && self.dimension == other.dimension
            && self.primality == other.primality
            && self.values == other.values
    }
}

impl<const EMBED_DIM: usize> std::fmt::Debug for Cochain<'_, EMBED_DIM> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} {}-cochain, values {:?}",
            self.primality,
            self.dimension,
            self.values.as_slice()
        )
    }
}

impl<const EMBED_DIM: usize> std::fmt::Display for Cochain<'_, EMBED_DIM> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cochain(k={}, n={}, primal={})",
            self.dimension,
            self.complex.complex_dimension(),
            self.primality == Primality::Primal
        )
    }
}

// Neg

impl<const EMBED_DIM: usize> std::ops::Neg for Cochain<'_, EMBED_DIM> {
    type Output = Self;

    fn neg(mut self) -> Self::Output {
        self.values.neg_mut();
        self
    }
}

impl<'a, const EMBED_DIM: usize> std::ops::Neg for &Cochain<'a, EMBED_DIM> {
    type Output = Cochain<'a, EMBED_DIM>;

    fn neg(self) -> Self::Output {
        self.with_values(-&self.values)
    }
}

// scalar Mul

impl<'a, const EMBED_DIM: usize> std::ops::Mul<Cochain<'a, EMBED_DIM>> for f64 {
    type Output = Cochain<'a, EMBED_DIM>;

    fn mul(self, mut rhs: Cochain<'a, EMBED_DIM>) -> Self::Output {
        rhs.values *= self;
        rhs
    }
}

impl<'a, const EMBED_DIM: usize> std::ops::Mul<&Cochain<'a, EMBED_DIM>> for f64 {
    type Output = Cochain<'a, EMBED_DIM>;

    fn mul(self, rhs: &Cochain<'a, EMBED_DIM>) -> Self::Output {
        rhs.scale(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{single_triangle, tiny_mesh_2d, tiny_mesh_3d};
    use crate::{ComplexOptions, SimplicialMesh};
    use approx::assert_relative_eq;

    /// A cochain with distinct, irregular values.
    fn test_cochain<const E: usize>(
        complex: &SimplicialComplex<E>,
        k: usize,
        primality: Primality,
    ) -> Cochain<'_, E> {
        let len = complex.cochain(k, primality).unwrap().len();
        let values = na::DVector::from_fn(len, |i, _| ((i * 7 + 3) % 11) as f64 - 4.5);
        complex.cochain_from_values(k, primality, values).unwrap()
    }

    #[test]
    fn boundary_of_boundary_is_zero() {
        fn check<const E: usize>(complex: &SimplicialComplex<E>) {
            for k in 1..complex.complex_dimension() {
                let lower = complex.subspace(k).unwrap().boundary();
                let upper = complex.subspace(k + 1).unwrap().boundary();
                let product = lower * upper;
                assert!(
                    product.values().iter().all(|&v| v == 0.0),
                    "boundary of boundary nonzero in dimension {k}"
                );
            }
        }
        check(&SimplicialComplex::new(tiny_mesh_2d()).unwrap());
        check(&SimplicialComplex::new(tiny_mesh_3d()).unwrap());
    }

    #[test]
    fn exterior_derivative_squares_to_zero() {
        fn check<const E: usize>(complex: &SimplicialComplex<E>) {
            let n = complex.complex_dimension();
            for primality in [Primality::Primal, Primality::Dual] {
                for k in 0..n - 1 {
                    let c = test_cochain(complex, k, primality);
                    let dd = c.d().unwrap().d().unwrap();
                    assert_eq!(dd.dimension(), k + 2);
                    assert_eq!(dd.primality(), primality);
                    assert_eq!(dd.len(), complex.cochain_len(k + 2, primality).unwrap());
                    assert!(
                        dd.values().iter().all(|v| v.abs() < 1e-12),
                        "dd nonzero on {primality:?} {k}-cochain: {dd:?}"
                    );
                }
            }
        }
        check(&SimplicialComplex::new(tiny_mesh_2d()).unwrap());
        check(&SimplicialComplex::new(tiny_mesh_3d()).unwrap());
    }

    #[test]
    fn double_star_is_signed_identity() {
        fn check<const E: usize>(complex: &SimplicialComplex<E>) {
            let n = complex.complex_dimension();
            for k in 0..=n {
                let c = test_cochain(complex, k, Primality::Primal);
                let starred = c.star().unwrap();
                assert_eq!(starred.dimension(), n - k);
                assert_eq!(starred.primality(), Primality::Dual);

                let back = starred.star().unwrap();
                assert_eq!(back.dimension(), k);
                assert_eq!(back.primality(), Primality::Primal);
                let sign = if k * (n - k) % 2 == 0 { 1.0 } else { -1.0 };
                assert_relative_eq!(*back.values(), sign * c.values(), epsilon = 1e-10);
            }
        }
        check(&SimplicialComplex::new(tiny_mesh_2d()).unwrap());
        check(&SimplicialComplex::new(tiny_mesh_3d()).unwrap());
    }

    #[test]
    fn add_and_sub_are_inverse() {
        let complex = SimplicialComplex::new(tiny_mesh_2d()).unwrap();
        let f = test_cochain(&complex, 1, Primality::Primal);
        let g = complex
            .cochain_from_values(1, Primality::Primal, na::DVector::from_element(12, 0.25))
            .unwrap();
        let roundtrip = f.add(&g).unwrap().sub(&g).unwrap();
        assert_relative_eq!(*roundtrip.values(), *f.values());
        assert_eq!(roundtrip.dimension(), 1);

        let neg = -&f;
        assert!(f.add(&neg).unwrap().values().iter().all(|&v| v == 0.0));
        assert_eq!(2.0 * &f, f.add(&f).unwrap());
        assert_eq!(-(f.clone()), -1.0 * f.clone());
    }

    #[test]
    fn mismatched_cochains_are_rejected() {
        let complex = SimplicialComplex::new(tiny_mesh_2d()).unwrap();
        let other_complex = SimplicialComplex::new(tiny_mesh_2d()).unwrap();

        let f = complex.cochain(1, Primality::Primal).unwrap();
        for other in [
            complex.cochain(0, Primality::Primal).unwrap(),
            complex.cochain(1, Primality::Dual).unwrap(),
            other_complex.cochain(1, Primality::Primal).unwrap(),
        ] {
            assert!(matches!(
                f.add(&other),
                Err(DecError::CochainMismatch { operation: "add", .. })
            ));
            assert!(matches!(
                f.sub(&other),
                Err(DecError::CochainMismatch { operation: "sub", .. })
            ));
        }

        assert!(matches!(
            complex.cochain(3, Primality::Primal),
            Err(DecError::DimensionOutOfRange { .. })
        ));
        assert!(matches!(
            complex.cochain_from_values(0, Primality::Primal, na::DVector::zeros(3)),
            Err(DecError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn operators_at_the_ends_of_the_complex() {
        let complex = SimplicialComplex::new(tiny_mesh_2d()).unwrap();
        for primality in [Primality::Primal, Primality::Dual] {
            let top = complex.cochain(2, primality).unwrap();
            assert!(matches!(
                top.d(),
                Err(DecError::DimensionOutOfRange { dimension: 3, max: 2 })
            ));
            let bottom = complex.cochain(0, primality).unwrap();
            assert!(matches!(
                bottom.delta(),
                Err(DecError::DimensionOutOfRange { .. })
            ));
        }

        let top = test_cochain(&complex, 2, Primality::Primal);
        let lb = top.laplace_beltrami().unwrap();
        assert_eq!(lb.dimension(), 2);
        assert!(lb.values().iter().all(|&v| v == 0.0));
        let ldr = top.laplace_de_rham().unwrap();
        assert_eq!(ldr.len(), 6);
        assert_eq!(ldr, top.delta().unwrap().d().unwrap());
    }

    #[test]
    fn laplacians_of_0_forms() {
        fn vertex_cochain(
            complex: &SimplicialComplex<2>,
            f: impl Fn(f64, f64) -> f64,
        ) -> Cochain<'_, 2> {
            let values = na::DVector::from_iterator(
                complex.number_of_simplices(0).unwrap(),
                complex.vertices().iter().map(|v| f(v.x, v.y)),
            );
            complex
                .cochain_from_values(0, Primality::Primal, values)
                .unwrap()
        }
        let complex = SimplicialComplex::new(tiny_mesh_2d()).unwrap();

        // constants are in the kernel everywhere
        let constant = vertex_cochain(&complex, |_, _| 3.0);
        let lap = constant.laplace_beltrami().unwrap();
        assert!(lap.values().iter().all(|v| v.abs() < 1e-12));

        // linear functions are in the kernel at the interior vertex
        let linear = vertex_cochain(&complex, |x, y| 2.0 * x + 3.0 * y + 1.0);
        let lap = linear.laplace_beltrami().unwrap();
        assert_relative_eq!(lap.values()[3], 0.0, epsilon = 1e-10);

        // δd is the positive semidefinite Laplacian, -∇²(x² + y²) = -4
        let quadratic = vertex_cochain(&complex, |x, y| x * x + y * y);
        let lap = quadratic.laplace_beltrami().unwrap();
        assert_relative_eq!(lap.values()[3], -4.0, epsilon = 1e-10);
        assert_eq!(lap, quadratic.laplace_de_rham().unwrap());
    }

    #[test]
    fn operators_ignore_element_vertex_order() {
        let unoriented = SimplicialComplex::new(tiny_mesh_2d()).unwrap();
        let oriented = SimplicialComplex::with_options(
            tiny_mesh_2d(),
            ComplexOptions::default().with_orient_elements(true),
        )
        .unwrap();
        // same triangles in the same index order, only some of them flipped
        assert_eq!(
            unoriented.simplices(2).unwrap().indices(),
            oriented.simplices(2).unwrap().indices()
        );

        for complex in [&unoriented, &oriented] {
            // the area form is closed under the codifferential away from the boundary
            let area = complex
                .cochain_from_values(2, Primality::Primal, complex.primal_volumes(2).unwrap().clone())
                .unwrap();
            let delta_area = area.delta().unwrap();
            let boundary_edges = complex.mesh_boundary(1).unwrap();
            for (edge_idx, val) in delta_area.values().iter().enumerate() {
                if !boundary_edges.contains(edge_idx) {
                    assert!(val.abs() < 1e-12, "δ of area form nonzero on edge {edge_idx}");
                }
            }
        }

        let delta_area = |complex: &SimplicialComplex<2>| {
            complex
                .cochain_from_values(2, Primality::Primal, complex.primal_volumes(2).unwrap().clone())
                .unwrap()
                .delta()
                .unwrap()
                .into_values()
        };
        assert_relative_eq!(delta_area(&unoriented), delta_area(&oriented), epsilon = 1e-12);

        // edges are canonically oriented in both, so the same values are the same 1-form
        let one_form = |complex: &SimplicialComplex<2>| {
            test_cochain(complex, 1, Primality::Primal)
                .laplace_de_rham()
                .unwrap()
                .into_values()
        };
        assert_relative_eq!(one_form(&unoriented), one_form(&oriented), epsilon = 1e-10);
    }

    #[test]
    fn oriented_access() {
        let complex = SimplicialComplex::new(tiny_mesh_2d()).unwrap();
        let mut c = complex.cochain(1, Primality::Primal).unwrap();

        let edge = Simplex::from_vertices(&[0, 1]).unwrap();
        let reversed = Simplex::from_vertices(&[1, 0]).unwrap();
        c.set(&reversed, 2.0).unwrap();
        assert_eq!(c.get_index(0).unwrap(), -2.0);
        assert_eq!(c.get(&edge).unwrap(), -2.0);
        assert_eq!(c.get(&reversed).unwrap(), 2.0);

        c.set_index(0, 5.0).unwrap();
        assert_eq!(c.get(&edge).unwrap(), 5.0);
        assert!(matches!(
            c.get_index(12),
            Err(DecError::IndexOutOfRange { index: 12, len: 12 })
        ));
        assert!(c.set_index(12, 0.0).is_err());

        // simplices of the wrong dimension or not in the complex
        let tri = Simplex::from_vertices(&[0, 1, 3]).unwrap();
        assert!(matches!(c.get(&tri), Err(DecError::CochainMismatch { .. })));
        let missing = Simplex::from_vertices(&[0, 6]).unwrap();
        assert!(matches!(c.get(&missing), Err(DecError::UnknownSimplex(_))));

        // dual cochains are indexed by the corresponding primal simplex
        let mut dual = complex.cochain(2, Primality::Dual).unwrap();
        dual.set(&Simplex::from_vertices(&[3]).unwrap(), 1.5).unwrap();
        assert_eq!(dual.get_index(3).unwrap(), 1.5);

        // top-level simplices use the orientation of the mesh element
        let complex = SimplicialComplex::new(
            SimplicialMesh::new(single_triangle().vertices().to_vec(), 3, vec![1, 0, 2]).unwrap(),
        )
        .unwrap();
        let mut c = complex.cochain(2, Primality::Primal).unwrap();
        c.set(&Simplex::from_vertices(&[1, 0, 2]).unwrap(), 1.0).unwrap();
        assert_eq!(c.get_index(0).unwrap(), 1.0);
        assert_eq!(c.get(&Simplex::from_vertices(&[0, 1, 2]).unwrap()).unwrap(), -1.0);
    }

    #[test]
    fn single_triangle_boundary() {
        let complex = SimplicialComplex::new(single_triangle()).unwrap();
        let mut tri = complex.cochain(2, Primality::Primal).unwrap();
        tri.set_index(0, 1.0).unwrap();

        // the boundary of the triangle as a chain: each edge exactly once
        let boundary = complex.boundary_operator(2).unwrap();
        let chain = boundary.apply(tri.values()).unwrap();
        assert_eq!(chain.len(), 3);
        assert!(chain.iter().all(|v| v.abs() == 1.0));
        assert_eq!(complex.simplices(1).unwrap().indices(), &[0, 1, 0, 2, 1, 2]);
    }

    #[test]
    fn formatting() {
        let complex = SimplicialComplex::new(single_triangle()).unwrap();
        let c = complex.cochain(1, Primality::Dual).unwrap();
        assert_eq!(c.to_string(), "cochain(k=1, n=2, primal=false)");
        assert_eq!(format!("{c:?}"), "Dual 1-cochain, values [0.0, 0.0, 0.0]");
    }
}
