//! Geometric kernels on point sets defining a single simplex:
//! primal volumes and circumcenters.
//!
//! All functions take the simplex's points in `EMBED_DIM`-dimensional space
//! and delegate the numerical work to dense `nalgebra` factorizations.
//! Degenerate point sets (coincident or affinely dependent points)
//! are reported as [`DecError::DegenerateSimplex`] with an empty vertex list;
//! callers that know the vertex indices fill them in.

use nalgebra as na;

use crate::{DecError, Result};

fn degenerate(point_count: usize) -> DecError {
    DecError::DegenerateSimplex {
        dimension: point_count.saturating_sub(1),
        vertices: Vec::new(),
    }
}

/// `k!` as a float, the denominator of simplex volume formulas.
fn factorial(k: usize) -> f64 {
    (1..=k).product::<usize>() as f64
}

/// Edge vectors from the first point to each of the others.
fn edge_vectors<const EMBED_DIM: usize>(
    points: &[na::SVector<f64, EMBED_DIM>],
) -> Vec<na::SVector<f64, EMBED_DIM>> {
    points[1..].iter().map(|p| p - points[0]).collect()
}

/// Compute the unsigned volume of the simplex spanned by `points`.
///
/// Uses the Gram determinant formula `vol = sqrt(det(VᵀV)) / k!`
/// (see the PyDEC paper, <https://dl.acm.org/doi/pdf/10.1145/2382585.2382588>, section 10.1),
/// where the determinant is obtained from a Cholesky factorization.
/// A single point has volume 1 by convention.
pub fn unsigned_volume<const EMBED_DIM: usize>(
    points: &[na::SVector<f64, EMBED_DIM>],
) -> Result<f64> {
    match points.len() {
        0 => return Err(degenerate(0)),
        1 => return Ok(1.0),
        _ => {}
    }

    let edges = edge_vectors(points);
    let edge_count = edges.len();
    let gram = na::DMatrix::from_fn(edge_count, edge_count, |row, col| {
        edges[row].dot(&edges[col])
    });
    let chol = gram.cholesky().ok_or_else(|| degenerate(points.len()))?;
    // the product of the Cholesky factor's diagonal is sqrt(det(gram))
    let sqrt_det: f64 = chol.l_dirty().diagonal().iter().product();
    Ok(sqrt_det.abs() / factorial(edge_count))
}

/// Unsigned volume from the Gram determinant, without failing on degenerate input.
///
/// Used for the elementary pieces of dual cells,
/// which legitimately collapse to zero volume
/// when a circumcenter lies on a face (e.g. in right triangles).
pub(crate) fn gram_volume<const EMBED_DIM: usize>(points: &[na::SVector<f64, EMBED_DIM>]) -> f64 {
    if points.len() < 2 {
        return 1.0;
    }
    let edges = edge_vectors(points);
    let edge_count = edges.len();
    let gram = na::DMatrix::from_fn(edge_count, edge_count, |row, col| {
        edges[row].dot(&edges[col])
    });
    // rounding can push the determinant of a degenerate system slightly negative
    f64::sqrt(gram.determinant().max(0.0)) / factorial(edge_count)
}

/// Compute the signed volume of a full-dimensional simplex,
/// i.e. one with exactly `EMBED_DIM + 1` points.
///
/// The sign is positive when the edge vectors from the first point
/// form a right-handed basis.
pub fn signed_volume<const EMBED_DIM: usize>(
    points: &[na::SVector<f64, EMBED_DIM>],
) -> Result<f64> {
    if points.len() != EMBED_DIM + 1 {
        return Err(DecError::ShapeMismatch {
            operation: "signed_volume",
            expected: (EMBED_DIM + 1, EMBED_DIM),
            found: (points.len(), EMBED_DIM),
        });
    }
    if EMBED_DIM == 0 {
        return Ok(1.0);
    }

    let edges = edge_vectors(points);
    let edge_mat = na::DMatrix::from_fn(EMBED_DIM, EMBED_DIM, |row, col| edges[row][col]);
    let lu = edge_mat.lu();
    if !lu.is_invertible() {
        return Err(degenerate(points.len()));
    }
    Ok(lu.determinant() / factorial(EMBED_DIM))
}

/// Compute the barycentric coordinates of the circumcenter of `points`.
///
/// Solves the linear system from the PyDEC paper, section 10.1:
/// ```text
/// [ 2 PPᵀ  1 ] [ λ ]   [ |p_i|² ]
/// [ 1ᵀ     0 ] [ μ ] = [ 1      ]
/// ```
/// which works for any number of points up to `EMBED_DIM + 1`.
/// The returned coordinates sum to one.
pub fn barycentric_circumcenter<const EMBED_DIM: usize>(
    points: &[na::SVector<f64, EMBED_DIM>],
) -> Result<na::DVector<f64>> {
    let point_count = points.len();
    match point_count {
        0 => return Err(degenerate(0)),
        1 => return Ok(na::DVector::from_element(1, 1.0)),
        _ => {}
    }

    // dimension is point_count + 1 because there's an extra row
    // for normalizing the barycentric coordinates
    let system_dim = point_count + 1;
    let mut coef_mat = na::DMatrix::zeros(system_dim, system_dim);
    let mut rhs = na::DVector::zeros(system_dim);
    for row in 0..point_count {
        rhs[row] = points[row].dot(&points[row]);
        for col in 0..point_count {
            coef_mat[(row, col)] = 2.0 * points[row].dot(&points[col]);
        }
        coef_mat[(row, point_count)] = 1.0;
        coef_mat[(point_count, row)] = 1.0;
    }
    rhs[point_count] = 1.0;

    let solution = coef_mat
        .lu()
        .solve(&rhs)
        .ok_or_else(|| degenerate(point_count))?;
    Ok(solution.rows(0, point_count).into_owned())
}

/// Compute the circumcenter of `points` in Cartesian coordinates.
pub fn circumcenter<const EMBED_DIM: usize>(
    points: &[na::SVector<f64, EMBED_DIM>],
) -> Result<na::SVector<f64, EMBED_DIM>> {
    let bary = barycentric_circumcenter(points)?;
    Ok(bary
        .iter()
        .zip(points)
        .map(|(&weight, p)| weight * p)
        .sum())
}

/// Compute the radius of the circumsphere of `points`.
pub fn circumradius<const EMBED_DIM: usize>(
    points: &[na::SVector<f64, EMBED_DIM>],
) -> Result<f64> {
    let center = circumcenter(points)?;
    Ok((center - points[0]).magnitude())
}

/// Check whether the circumcenter of `points` lies strictly inside the simplex,
/// i.e. every barycentric coordinate of the circumcenter is at least `tolerance`.
pub fn is_well_centered<const EMBED_DIM: usize>(
    points: &[na::SVector<f64, EMBED_DIM>],
    tolerance: f64,
) -> Result<bool> {
    let bary = barycentric_circumcenter(points)?;
    Ok(bary.iter().all(|&coord| coord >= tolerance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    type Vec2 = na::Vector2<f64>;
    type Vec3 = na::Vector3<f64>;

    #[test]
    fn unsigned_volumes() {
        assert_eq!(unsigned_volume(&[Vec2::new(0.0, 0.0)]).unwrap(), 1.0);
        assert_relative_eq!(
            unsigned_volume(&[Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0)]).unwrap(),
            5.0
        );
        assert_relative_eq!(
            unsigned_volume(&[
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0)
            ])
            .unwrap(),
            0.5
        );
        assert_relative_eq!(
            unsigned_volume(&[
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(3.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
            ])
            .unwrap(),
            0.5
        );
    }

    #[test]
    fn signed_volumes() {
        let ccw = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];
        let cw = [Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0)];
        assert_relative_eq!(signed_volume(&ccw).unwrap(), 0.5);
        assert_relative_eq!(signed_volume(&cw).unwrap(), -0.5);

        let tet = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        assert_relative_eq!(signed_volume(&tet).unwrap(), 0.5);

        // not full-dimensional
        assert!(matches!(
            signed_volume(&ccw[..2]),
            Err(DecError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn circumcenters() {
        let seg = [Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0)];
        assert_relative_eq!(circumcenter(&seg).unwrap(), Vec2::new(2.0, 0.0));

        let tri = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];
        assert_relative_eq!(
            circumcenter(&tri).unwrap(),
            Vec2::new(0.5, 0.5),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            circumradius(&tri).unwrap(),
            f64::sqrt(0.5),
            epsilon = 1e-12
        );
        let bary = barycentric_circumcenter(&tri).unwrap();
        assert_relative_eq!(bary.sum(), 1.0, epsilon = 1e-12);
        // right angle at the first vertex puts the circumcenter on the hypotenuse
        assert_relative_eq!(bary[0], 0.0, epsilon = 1e-12);

        // a triangle embedded in 3D
        let tri_3d = [
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(2.0, 0.0, 1.0),
            Vec3::new(0.0, 2.0, 1.0),
        ];
        assert_relative_eq!(
            circumcenter(&tri_3d).unwrap(),
            Vec3::new(1.0, 1.0, 1.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn well_centeredness() {
        let equilateral = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.5, f64::sqrt(3.0) / 2.0),
        ];
        assert!(is_well_centered(&equilateral, 1e-8).unwrap());

        let obtuse = [Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), Vec2::new(2.0, 0.5)];
        assert!(!is_well_centered(&obtuse, 1e-8).unwrap());
    }

    #[test]
    fn gram_volume_allows_collapse() {
        let seg = [Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0)];
        assert_relative_eq!(gram_volume(&seg), 5.0);
        let collapsed = [Vec2::new(0.5, 0.5), Vec2::new(0.5, 0.5)];
        assert_eq!(gram_volume(&collapsed), 0.0);
    }

    #[test]
    fn degenerate_simplices_fail() {
        let coincident = [Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0)];
        assert!(matches!(
            circumcenter(&coincident),
            Err(DecError::DegenerateSimplex { dimension: 1, .. })
        ));
        assert!(matches!(
            unsigned_volume(&coincident),
            Err(DecError::DegenerateSimplex { .. })
        ));

        let collinear = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0)];
        assert!(matches!(
            circumcenter(&collinear),
            Err(DecError::DegenerateSimplex { dimension: 2, .. })
        ));
        assert!(matches!(
            signed_volume(&collinear),
            Err(DecError::DegenerateSimplex { .. })
        ));
    }
}
