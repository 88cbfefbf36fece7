//! Discrete exterior calculus on simplicial meshes.
//!
//! A [`SimplicialMesh`] of top-level elements is turned into a [`SimplicialComplex`],
//! which holds every lower-dimensional simplex, the boundary and coboundary operators
//! between them, and the primal and circumcentric dual volumes needed for the Hodge star.
//! [`Cochain`]s on the complex can then be combined with the exterior derivative,
//! Hodge star, codifferential and Laplacians.
//!
//! ```
//! use decomplex::{mesh::tiny_mesh_2d, Primality, SimplicialComplex};
//!
//! let complex = SimplicialComplex::new(tiny_mesh_2d())?;
//! let mut f = complex.cochain(0, Primality::Primal)?;
//! f.set_index(3, 1.0)?;
//! let df = f.d()?;
//! assert_eq!(df.dimension(), 1);
//! assert!(df.d()?.values().iter().all(|v| *v == 0.0));
//! # Ok::<(), decomplex::DecError>(())
//! ```

#![warn(missing_docs)]

pub mod error;
#[doc(inline)]
pub use error::{DecError, Result};

pub mod parity;
#[doc(inline)]
pub use parity::Parity;

pub mod simplex;
#[doc(inline)]
pub use simplex::Simplex;

pub mod geometry;

pub mod operator;
#[doc(inline)]
pub use operator::{LinearOperator, OperatorWorkspace};

pub mod simplex_array;
#[doc(inline)]
pub use simplex_array::SimplexArray;

pub mod mesh;
#[doc(inline)]
pub use mesh::SimplicialMesh;

pub mod simplicial_complex;
#[doc(inline)]
pub use simplicial_complex::{ComplexOptions, DualVolumeMode, SimplicialComplex, Subspace};

pub mod cochain;
#[doc(inline)]
pub use cochain::{Cochain, Primality};

pub mod gmsh;

// nalgebra re-exports of common types for convenience

pub use nalgebra as na;
/// Type alias for a 2D `nalgebra` vector.
pub type Vec2 = na::Vector2<f64>;
/// Type alias for a 3D `nalgebra` vector.
pub type Vec3 = na::Vector3<f64>;
