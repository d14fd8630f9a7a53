use crate::scene::{Color, Material, MaterialIdx, Primitive, PrimitiveCatalog};

/// Per-primitive material attributes as parallel arrays.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterialArrays {
    pub diffuse: Vec<[f32; 3]>,
    pub reflectivity: Vec<f32>,
    pub ior: Vec<f32>,
    pub kind: Vec<i32>,
    pub emissive: Vec<[f32; 3]>,
    pub metallic: Vec<f32>,
    pub roughness: Vec<f32>,
}

impl MaterialArrays {
    fn push(&mut self, material: Option<&Material>) {
        match material {
            Some(m) => {
                self.diffuse.push(rgb_array(m.diffuse()));
                self.reflectivity.push(m.reflectivity());
                self.ior.push(m.ior());
                self.kind.push(m.kind().tag());
                self.emissive.push(rgb_array(m.emissive()));
                self.metallic.push(m.metallic());
                self.roughness.push(m.roughness());
            }
            None => {
                self.diffuse.push([0.0; 3]);
                self.reflectivity.push(0.0);
                self.ior.push(1.0);
                self.kind.push(0);
                self.emissive.push([0.0; 3]);
                self.metallic.push(0.0);
                self.roughness.push(0.0);
            }
        }
    }
}

fn rgb_array(c: Color) -> [f32; 3] {
    [c.r, c.g, c.b]
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SphereUniforms {
    pub count: i32,
    pub centers: Vec<[f32; 3]>,
    pub radii: Vec<f32>,
    pub bounds_min: Vec<[f32; 3]>,
    pub bounds_max: Vec<[f32; 3]>,
    pub materials: MaterialArrays,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuadUniforms {
    pub count: i32,
    pub corners: Vec<[f32; 3]>,
    pub u: Vec<[f32; 3]>,
    pub v: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub bounds_min: Vec<[f32; 3]>,
    pub bounds_max: Vec<[f32; 3]>,
    pub materials: MaterialArrays,
}

/// Flat uniform arrays for the analytic primitives.
/// A zero count tells the kernel to skip that primitive kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrimitiveUniforms {
    pub spheres: SphereUniforms,
    pub quads: QuadUniforms,
}

impl PrimitiveUniforms {
    pub fn encode(catalog: &PrimitiveCatalog) -> PrimitiveUniforms {
        let mut ret = PrimitiveUniforms::default();
        let material = |index: MaterialIdx| catalog.material(index);

        for sphere in catalog.spheres() {
            let s = &mut ret.spheres;
            let bounds = sphere.bounding_box();
            s.centers.push(sphere.center().into());
            s.radii.push(sphere.radius());
            s.bounds_min.push(bounds.min.into());
            s.bounds_max.push(bounds.max.into());
            s.materials.push(material(sphere.material()));
        }
        ret.spheres.count = catalog.spheres().len() as i32;

        for quad in catalog.quads() {
            let q = &mut ret.quads;
            let bounds = quad.bounding_box();
            q.corners.push(quad.corner().into());
            q.u.push(quad.u().into());
            q.v.push(quad.v().into());
            q.normals.push(quad.normal().into());
            q.bounds_min.push(bounds.min.into());
            q.bounds_max.push(bounds.max.into());
            q.materials.push(material(quad.material()));
        }
        ret.quads.count = catalog.quads().len() as i32;

        ret
    }
}
