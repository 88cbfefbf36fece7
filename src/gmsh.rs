//! Utilities for loading meshes generated with [`gmsh`](https://www.gmsh.info/).
//!
//! Only version 4.1 of the MSH format is supported,
//! as per the [`mshio`] library.

use nalgebra as na;

use crate::{DecError, SimplicialMesh};

/// Error in loading a mesh from a Gmsh .msh file.
#[derive(thiserror::Error, Debug)]
pub enum GmshError {
    /// Error parsing the .msh file.
    ///
    /// (Implementation note: parser error converted to string
    /// to avoid lifetime issues with the byte slices it contains)
    #[error("Parsing the .msh data failed: {0}")]
    ParseError(String),
    /// The given .msh file contains no nodes.
    #[error("Invalid .msh data: no nodes")]
    MissingNodes,
    /// The given .msh file contains no elements of the supported type.
    #[error("Invalid .msh data: no elements of the correct type")]
    MissingElements,
    /// The elements don't form a valid simplicial mesh.
    #[error(transparent)]
    InvalidMesh(#[from] DecError),
}

/// Load a 2D triangle mesh from a `.msh` file.
///
/// First-order triangle elements in the file are interpreted as the triangles of the mesh.
/// These must be of type `Tri3` (see [`ElementType`][mshio::ElementType]).
/// The `z` coordinate of vertices is dropped to project the mesh to 2D space.
///
/// ```no_run
/// # use decomplex::gmsh::{load_trimesh_2d, GmshError};
/// # fn load() -> Result<(), Box<dyn std::error::Error>> {
/// let msh_bytes = std::fs::read("meshes/2d_square.msh")?;
/// let mesh = load_trimesh_2d(&msh_bytes)?;
/// # Ok(())
/// # }
/// ```
pub fn load_trimesh_2d(bytes: &[u8]) -> Result<SimplicialMesh<2>, GmshError> {
    load_mesh(bytes, mshio::ElementType::Tri3, 3)
}

/// Load a triangulated surface embedded in 3D space from a `.msh` file.
///
/// Like [`load_trimesh_2d`], but keeps all three coordinates of the vertices.
pub fn load_trimesh_3d(bytes: &[u8]) -> Result<SimplicialMesh<3>, GmshError> {
    load_mesh(bytes, mshio::ElementType::Tri3, 3)
}

/// Load a 3D tetrahedral mesh from a `.msh` file.
///
/// First-order tetrahedron elements in the file are interpreted as the tetrahedra of the mesh.
/// These must be of type `Tet4` (see [`ElementType`][mshio::ElementType]).
pub fn load_tetmesh_3d(bytes: &[u8]) -> Result<SimplicialMesh<3>, GmshError> {
    load_mesh(bytes, mshio::ElementType::Tet4, 4)
}

/// Shared implementation of the loaders.
/// `EMBED_DIM` must be at most 3, the number of coordinates gmsh stores.
fn load_mesh<const EMBED_DIM: usize>(
    bytes: &[u8],
    element_type: mshio::ElementType,
    element_size: usize,
) -> Result<SimplicialMesh<EMBED_DIM>, GmshError> {
    let msh = mshio::parse_msh_bytes(bytes).map_err(|e| GmshError::ParseError(format!("{}", e)))?;
    let nodes = msh.data.nodes.ok_or(GmshError::MissingNodes)?;
    let elements = msh.data.elements.ok_or(GmshError::MissingElements)?;

    let vertices: Vec<na::SVector<f64, EMBED_DIM>> = nodes
        .node_blocks
        .iter()
        .flat_map(|block| block.nodes.iter())
        .map(|node| {
            let coords = [node.x, node.y, node.z];
            na::SVector::<f64, EMBED_DIM>::from_fn(|row, _| coords[row])
        })
        .collect();
    if vertices.is_empty() {
        return Err(GmshError::MissingNodes);
    }

    let (blocks, skipped): (Vec<_>, Vec<_>) = elements
        .element_blocks
        .iter()
        .partition(|block| block.element_type == element_type);
    if !skipped.is_empty() {
        tracing::debug!(
            skipped = skipped.len(),
            ?element_type,
            "skipping element blocks of other types"
        );
    }

    let indices = tags_to_indices(
        blocks
            .iter()
            .flat_map(|block| block.elements.iter())
            .flat_map(|el| el.nodes.iter().copied()),
    )?;
    if indices.is_empty() {
        return Err(GmshError::MissingElements);
    }

    tracing::debug!(
        vertices = vertices.len(),
        elements = indices.len() / element_size,
        "loaded mesh from .msh data"
    );
    Ok(SimplicialMesh::new(vertices, element_size, indices)?)
}

/// Convert gmsh node tags into vertex indices.
///
/// Gmsh tags start at 1, subtract 1 to get the index in the array.
/// (this assumes tags are sequential and in order,
/// which the format doesn't strictly guarantee
/// since tags can be set manually)
fn tags_to_indices(tags: impl Iterator<Item = u64>) -> Result<Vec<usize>, GmshError> {
    tags.map(|tag| {
        (tag as usize).checked_sub(1).ok_or_else(|| {
            GmshError::InvalidMesh(DecError::InvalidMesh(
                "node tag 0 in element data".to_string(),
            ))
        })
    })
    .collect()
}
