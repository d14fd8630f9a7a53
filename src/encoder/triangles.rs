use crate::geometry::{FloatType, WorldPoint, WorldVector};
use crate::scene::{Color, MeshTriangle, PrimitiveCatalog};

use super::layout::{GridLayout, TexelGrid, read_texel, texel_position};

/// Texel rows per triangle.
pub const TRIANGLE_ROWS: u32 = 6;

/// Triangles packed into blocks of six rows, one column per triangle:
/// origin, edge 1, edge 2, diffuse color, (reflectivity, ior, kind tag), emissive color.
#[derive(Clone, Debug, PartialEq)]
pub struct TriangleTexture {
    pub grid: TexelGrid,
    triangle_count: usize,
}

/// Everything the kernel reads for one triangle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DecodedTriangle {
    pub origin: WorldPoint,
    pub edge1: WorldVector,
    pub edge2: WorldVector,
    pub diffuse: Color,
    pub reflectivity: FloatType,
    pub ior: FloatType,
    pub kind_tag: i32,
    pub emissive: Color,
}

impl TriangleTexture {
    /// Encodes triangles in the given order, materials are looked up in the catalog.
    pub fn encode(
        triangles: &[MeshTriangle],
        catalog: &PrimitiveCatalog,
        max_dimension: u32,
    ) -> TriangleTexture {
        let layout = GridLayout::new(triangles.len(), TRIANGLE_ROWS, max_dimension);
        let mut grid = TexelGrid::new(layout);

        for (i, triangle) in triangles.iter().enumerate() {
            grid.set(i, 0, point_texel(&triangle.origin().coords));
            grid.set(i, 1, point_texel(&triangle.edge1()));
            grid.set(i, 2, point_texel(&triangle.edge2()));

            // A missing material leaves the shading rows zeroed
            if let Some(material) = catalog.material(triangle.material()) {
                grid.set(i, 3, color_texel(material.diffuse()));
                grid.set(
                    i,
                    4,
                    [
                        material.reflectivity(),
                        material.ior(),
                        material.kind().tag() as f32,
                        0.0,
                    ],
                );
                grid.set(i, 5, color_texel(material.emissive()));
            }
        }

        TriangleTexture {
            grid,
            triangle_count: triangles.len(),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    pub fn layout(&self) -> &GridLayout {
        self.grid.layout()
    }

    pub fn decode(&self, index: usize) -> DecodedTriangle {
        decode_triangle(index, self.grid.width(), self.grid.as_floats())
    }
}

/// Reconstructs triangle `index` from raw grid floats, the same way the kernel reads them.
pub fn decode_triangle(index: usize, width: u32, floats: &[f32]) -> DecodedTriangle {
    let row = |r| read_texel(floats, width, texel_position(index, r, width, TRIANGLE_ROWS));
    let [ox, oy, oz, _] = row(0);
    let [e1x, e1y, e1z, _] = row(1);
    let [e2x, e2y, e2z, _] = row(2);
    let [dr, dg, db, _] = row(3);
    let [reflectivity, ior, kind_tag, _] = row(4);
    let [er, eg, eb, _] = row(5);

    DecodedTriangle {
        origin: WorldPoint::new(ox, oy, oz),
        edge1: WorldVector::new(e1x, e1y, e1z),
        edge2: WorldVector::new(e2x, e2y, e2z),
        diffuse: Color::new(dr, dg, db),
        reflectivity,
        ior,
        kind_tag: kind_tag as i32,
        emissive: Color::new(er, eg, eb),
    }
}

fn point_texel(v: &WorldVector) -> [f32; 4] {
    [v.x, v.y, v.z, 0.0]
}

fn color_texel(c: Color) -> [f32; 4] {
    [c.r, c.g, c.b, 0.0]
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bvh::{Bvh, NodeContent, NodeIdx};
    use crate::encoder::NodeTextures;
    use crate::geometry::Triangle;
    use crate::scene::{Material, MaterialIdx, MaterialKind};
    use assert2::assert;

    fn catalog() -> PrimitiveCatalog {
        let mut catalog = PrimitiveCatalog::new();
        catalog.add_material(
            "matte",
            Material::builder()
                .diffuse(Color::new(0.2, 0.4, 0.6))
                .build()
                .unwrap(),
        );
        catalog.add_material(
            "glass",
            Material::builder()
                .diffuse(Color::new(1.0, 1.0, 1.0))
                .kind(MaterialKind::Refractive)
                .reflectivity(0.25)
                .ior(1.5)
                .emissive(Color::new(0.0, 0.5, 0.0))
                .build()
                .unwrap(),
        );
        catalog
    }

    /// Triangles scattered over a 2D grid, alternating materials.
    fn grid_triangles(count: usize) -> Vec<MeshTriangle> {
        (0..count)
            .map(|i| {
                let x = (i % 8) as f32;
                let z = (i / 8) as f32;
                let base = WorldPoint::new(x, (i % 3) as f32 * 0.1, -z);
                MeshTriangle::new(
                    &Triangle::new(
                        base,
                        base + WorldVector::new(0.9, 0.0, 0.0),
                        base + WorldVector::new(0.0, 0.5, -0.9),
                    ),
                    MaterialIdx::from_usize(i % 2),
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn round_trip_through_hierarchy() {
        let catalog = catalog();
        let triangles = grid_triangles(60);
        let bvh = Bvh::build(&triangles, 8);
        let ordered = bvh.apply_order(&triangles);
        let nodes = NodeTextures::encode(&bvh, 16);
        let texture = TriangleTexture::encode(&ordered, &catalog, 16);

        assert!(texture.layout().width() == 16);
        assert!(texture.layout().height() == 4 * TRIANGLE_ROWS);

        let mut leaves = 0;
        let mut seen = 0;
        for i in 0..nodes.node_count() {
            let node = nodes.decode(i);
            assert!(&node == &bvh.nodes()[NodeIdx::from_usize(i)]);
            let NodeContent::Leaf { first, count } = node.content else {
                continue;
            };
            leaves += 1;
            for t in first.index()..first.index() + count as usize {
                let decoded = texture.decode(t);
                let original = &ordered[t];
                assert!(decoded.origin == original.origin());
                assert!(decoded.edge1 == original.edge1());
                assert!(decoded.edge2 == original.edge2());

                let material = catalog.material(original.material()).unwrap();
                assert!(decoded.diffuse == material.diffuse());
                assert!(decoded.reflectivity == material.reflectivity());
                assert!(decoded.ior == material.ior());
                assert!(decoded.kind_tag == material.kind().tag());
                assert!(decoded.emissive == material.emissive());

                let vertices = decoded_vertices(&decoded);
                assert!(node.bounds.contains_box(&vertices.bounding_box()));
                seen += 1;
            }
        }
        assert!(leaves >= 3);
        assert!(seen == 60);
    }

    fn decoded_vertices(t: &DecodedTriangle) -> Triangle<WorldPoint> {
        Triangle::new(t.origin, t.origin + t.edge1, t.origin + t.edge2)
    }

    #[test]
    fn empty_texture_is_one_zeroed_block() {
        let texture = TriangleTexture::encode(&[], &catalog(), 4096);
        assert!(texture.triangle_count() == 0);
        assert!(texture.layout().width() == 1);
        assert!(texture.layout().height() == TRIANGLE_ROWS);
        assert!(texture.grid.as_floats().iter().all(|x| *x == 0.0));
    }

    #[test]
    fn rows_are_where_the_kernel_expects() {
        let triangles = grid_triangles(5);
        let texture = TriangleTexture::encode(&triangles, &catalog(), 2);
        let floats = texture.grid.as_floats();
        let width = texture.grid.width() as usize;
        assert!(width == 2);

        // Triangle 3: column 1, block 1, so its reflectivity row is y = 6 + 4
        let start = ((6 + 4) * width + 1) * 4;
        assert!(floats[start..start + 4] == [0.25, 1.5, 2.0, 0.0]);
    }
}
