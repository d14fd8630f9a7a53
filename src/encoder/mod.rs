//! Packing of scene data into the flat buffers the shading kernel reads.
//!
//! Grids are RGBA32F, row-major, and their layout depends only on the element count and the
//! maximum texture dimension, so every element can be located from its index alone.

mod layout;
mod nodes;
mod triangles;
mod uniforms;

pub use layout::{GridLayout, Texel, TexelGrid, texel_position};
pub use nodes::{NodeTextures, decode_node};
pub use triangles::{DecodedTriangle, TRIANGLE_ROWS, TriangleTexture, decode_triangle};
pub use uniforms::{MaterialArrays, PrimitiveUniforms, QuadUniforms, SphereUniforms};
