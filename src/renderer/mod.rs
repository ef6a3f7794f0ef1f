//! 2D rendering module
//!
//! Tessellates the world into a flat vertex list. Reads game state, never
//! writes it; uploading and drawing the vertices is up to the host.

pub mod scene;
pub mod shapes;
pub mod vertex;

pub use scene::build_frame;
pub use vertex::{Vertex, colors};
