//! Simplicial meshes as raw vertex and element data,
//! the input from which a [`SimplicialComplex`][crate::SimplicialComplex] is built.

use std::collections::BTreeSet;

use itertools::Itertools;
use nalgebra as na;

use crate::{geometry, DecError, Result, SimplexArray, Vec2, Vec3};

/// A mesh of top-dimensional simplices (elements)
/// given by vertex coordinates and vertex indices.
///
/// Every element has the same number of vertices, `manifold_dimension() + 1`,
/// and the vertex coordinates live in `EMBED_DIM`-dimensional space.
/// No lower-dimensional simplices are stored here;
/// those are generated when building a complex.
#[derive(Clone, Debug, PartialEq)]
pub struct SimplicialMesh<const EMBED_DIM: usize> {
    vertices: Vec<na::SVector<f64, EMBED_DIM>>,
    element_size: usize,
    /// indices stored in a flat Vec, every `element_size` forming one element
    indices: Vec<usize>,
}

impl<const EMBED_DIM: usize> SimplicialMesh<EMBED_DIM> {
    /// Construct a mesh from raw vertices and indices.
    ///
    /// The indices are given as a flat array,
    /// where every `element_size` indices correspond to one element.
    ///
    /// Fails if there are no elements,
    /// the indices don't divide evenly into elements,
    /// an index points outside `vertices`,
    /// an element repeats a vertex,
    /// or the elements have more dimensions than the embedding space.
    pub fn new(
        vertices: Vec<na::SVector<f64, EMBED_DIM>>,
        element_size: usize,
        indices: Vec<usize>,
    ) -> Result<Self> {
        if element_size == 0 || element_size > EMBED_DIM + 1 {
            return Err(DecError::InvalidMesh(format!(
                "elements of {element_size} vertices can't be embedded in {EMBED_DIM} dimensions"
            )));
        }
        if indices.is_empty() {
            return Err(DecError::InvalidMesh("mesh has no elements".to_string()));
        }
        if indices.len() % element_size != 0 {
            return Err(DecError::InvalidMesh(format!(
                "{} indices can't be split into elements of {element_size} vertices",
                indices.len()
            )));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i >= vertices.len()) {
            return Err(DecError::InvalidMesh(format!(
                "vertex index {bad} out of range for {} vertices",
                vertices.len()
            )));
        }
        for (el_idx, el) in indices.chunks_exact(element_size).enumerate() {
            if !el.iter().all_unique() {
                return Err(DecError::InvalidMesh(format!(
                    "element {el_idx} has repeated vertices: {el:?}"
                )));
            }
        }

        Ok(Self {
            vertices,
            element_size,
            indices,
        })
    }

    /// Construct a mesh from a list of elements.
    ///
    /// All elements must have the same number of vertices.
    pub fn from_elements(
        vertices: Vec<na::SVector<f64, EMBED_DIM>>,
        elements: &[Vec<usize>],
    ) -> Result<Self> {
        let element_size = elements.first().map_or(0, |el| el.len());
        if let Some(odd) = elements.iter().find(|el| el.len() != element_size) {
            return Err(DecError::InvalidMesh(format!(
                "elements of different sizes: expected {element_size} vertices, found {odd:?}"
            )));
        }
        Self::new(vertices, element_size, elements.concat())
    }

    /// Dimension of the elements.
    #[inline]
    pub fn manifold_dimension(&self) -> usize {
        self.element_size - 1
    }

    /// Dimension of the space the vertices live in.
    #[inline]
    pub fn embedding_dimension(&self) -> usize {
        EMBED_DIM
    }

    /// Number of vertices in each element.
    #[inline]
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Number of elements in the mesh.
    #[inline]
    pub fn element_count(&self) -> usize {
        self.indices.len() / self.element_size
    }

    /// Vertex coordinates of the mesh.
    #[inline]
    pub fn vertices(&self) -> &[na::SVector<f64, EMBED_DIM>] {
        &self.vertices
    }

    /// The flat array of element vertex indices.
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Iterate over the vertex indices of each element.
    pub fn elements(&self) -> std::slice::ChunksExact<'_, usize> {
        self.indices.chunks_exact(self.element_size)
    }

    /// Vertex indices of the `i`th element.
    pub fn element(&self, i: usize) -> Result<&[usize]> {
        if i >= self.element_count() {
            return Err(DecError::IndexOutOfRange {
                index: i,
                len: self.element_count(),
            });
        }
        let start = i * self.element_size;
        Ok(&self.indices[start..start + self.element_size])
    }

    /// Vertex coordinates of the `i`th element.
    pub fn element_points(&self, i: usize) -> Result<Vec<na::SVector<f64, EMBED_DIM>>> {
        Ok(self
            .element(i)?
            .iter()
            .map(|&vert| self.vertices[vert])
            .collect())
    }

    /// Replace the vertex coordinates, keeping the connectivity.
    pub fn set_vertices(&mut self, vertices: Vec<na::SVector<f64, EMBED_DIM>>) -> Result<()> {
        if vertices.len() != self.vertices.len() {
            return Err(DecError::InvalidMesh(format!(
                "expected {} vertices, got {}",
                self.vertices.len(),
                vertices.len()
            )));
        }
        self.vertices = vertices;
        Ok(())
    }

    /// Get the codimension-1 faces on the boundary of the mesh,
    /// i.e. the ones belonging to exactly one element.
    pub fn boundary(&self) -> Result<SimplexArray> {
        let elements = SimplexArray::from_elements(self.element_size, self.indices.clone())?;
        let (faces, boundary_op) = elements.boundary()?;
        let boundary_faces: Vec<usize> = faces
            .rows()
            .zip(boundary_op.row_iter())
            .filter(|(_, cofaces)| cofaces.nnz() == 1)
            .flat_map(|(face, _)| face.iter().copied())
            .collect();
        Ok(SimplexArray::from_sorted_rows(
            faces.simplex_size(),
            boundary_faces,
        ))
    }

    /// Get all the distinct `p`-dimensional faces of the mesh's elements
    /// in lexicographic order.
    pub fn skeleton(&self, p: usize) -> Result<SimplexArray> {
        if p > self.manifold_dimension() {
            return Err(DecError::DimensionOutOfRange {
                dimension: p,
                max: self.manifold_dimension(),
            });
        }
        let faces: BTreeSet<Vec<usize>> = self
            .elements()
            .flat_map(|el| el.iter().copied().sorted_unstable().combinations(p + 1))
            .collect();
        Ok(SimplexArray::from_sorted_rows(
            p + 1,
            faces.into_iter().flatten().collect(),
        ))
    }

    /// Get the indices of the elements that share a codimension-1 face
    /// with the `i`th element.
    pub fn neighbors(&self, i: usize) -> Result<Vec<usize>> {
        let element = self.element(i)?;
        Ok(self
            .elements()
            .enumerate()
            .filter(|&(other_idx, other)| {
                other_idx != i
                    && other.iter().filter(|v| element.contains(v)).count()
                        == self.element_size - 1
            })
            .map(|(other_idx, _)| other_idx)
            .collect())
    }

    /// Make every element positively oriented
    /// by swapping its first two vertices if its signed volume is negative.
    ///
    /// Only meaningful when elements are full-dimensional
    /// (`manifold_dimension() == EMBED_DIM`); otherwise nothing is done.
    /// Returns the number of elements that were flipped.
    pub fn orient(&mut self) -> Result<usize> {
        if self.manifold_dimension() != EMBED_DIM || self.element_size < 2 {
            return Ok(0);
        }
        let mut flipped = 0;
        for el in self.indices.chunks_exact_mut(self.element_size) {
            let points: Vec<_> = el.iter().map(|&vert| self.vertices[vert]).collect();
            let volume = geometry::signed_volume(&points).map_err(|_| {
                DecError::DegenerateSimplex {
                    dimension: EMBED_DIM,
                    vertices: el.to_vec(),
                }
            })?;
            if volume < 0.0 {
                el.swap(0, 1);
                flipped += 1;
            }
        }
        if flipped > 0 {
            tracing::debug!(flipped, "reoriented mesh elements");
        }
        Ok(flipped)
    }
}

//
// test meshes
//

/// A small hexagon-shaped 2D mesh for testing basic functionality.
/// Shaped somewhat like this:
///    ____
///   /\  /\
///  /__\/__\
///  \  /\  /
///   \/__\/
///
/// with vertices ordered left to right, top to bottom.
/// Elements are not consistently oriented.
///
/// Public for use in doctests, not meant for users and hidden from docs.
#[doc(hidden)]
pub fn tiny_mesh_2d() -> SimplicialMesh<2> {
    let vertices = vec![
        Vec2::new(-0.5, 1.0),
        Vec2::new(0.5, 1.0),
        Vec2::new(-1.0, 0.0),
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(-0.5, -1.0),
        Vec2::new(0.5, -1.0),
    ];
    #[rustfmt::skip]
    let indices = vec![
        0, 2, 3,
        0, 1, 3,
        1, 3, 4,
        2, 3, 5,
        3, 5, 6,
        3, 4, 6,
    ];
    SimplicialMesh {
        vertices,
        element_size: 3,
        indices,
    }
}

/// A small 3D mesh of four tetrahedra arranged into a diamond shape,
/// split like this down the x,y plane:
///
///    /\
///   /__\
///   \  /
///    \/
///
/// and with a single point both up and down the z-axis.
#[doc(hidden)]
pub fn tiny_mesh_3d() -> SimplicialMesh<3> {
    let vertices = vec![
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(-0.5, 0.0, 0.0),
        Vec3::new(0.5, 0.0, 0.0),
        Vec3::new(0.0, -1.0, 0.0),
        Vec3::new(0.0, 0.0, -1.0),
        Vec3::new(0.0, 0.0, 1.0),
    ];
    #[rustfmt::skip]
    let indices = vec![
        0, 1, 2, 4,
        0, 1, 2, 5,
        1, 2, 3, 4,
        1, 2, 3, 5,
    ];
    SimplicialMesh {
        vertices,
        element_size: 4,
        indices,
    }
}

/// A single right triangle with its corner at the origin.
#[doc(hidden)]
pub fn single_triangle() -> SimplicialMesh<2> {
    SimplicialMesh {
        vertices: vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
        element_size: 3,
        indices: vec![0, 1, 2],
    }
}
