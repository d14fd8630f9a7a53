use indexmap::IndexMap;

use super::{Material, MaterialIdx, Quad, SceneError, Sphere};

/// Named materials plus the static (non-mesh) primitives of a scene.
///
/// Material indices are insertion positions, stable for the lifetime of the catalog.
#[derive(Clone, Debug, Default)]
pub struct PrimitiveCatalog {
    materials: IndexMap<String, Material>,
    spheres: Vec<Sphere>,
    quads: Vec<Quad>,
}

impl PrimitiveCatalog {
    pub fn new() -> PrimitiveCatalog {
        Default::default()
    }

    /// Adds a material, replacing any previous material of the same name in place.
    pub fn add_material(&mut self, name: impl Into<String>, material: Material) -> MaterialIdx {
        let (index, _) = self.materials.insert_full(name.into(), material);
        MaterialIdx::from_usize(index)
    }

    pub fn material(&self, index: MaterialIdx) -> Option<&Material> {
        self.materials.get_index(index.index()).map(|(_, m)| m)
    }

    pub fn material_index(&self, name: &str) -> Result<MaterialIdx, SceneError> {
        self.materials
            .get_index_of(name)
            .map(MaterialIdx::from_usize)
            .ok_or_else(|| SceneError::UnknownMaterial(name.to_owned()))
    }

    pub fn materials(&self) -> impl ExactSizeIterator<Item = (&str, &Material)> {
        self.materials.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn check_material(&self, index: MaterialIdx) -> Result<&Material, SceneError> {
        self.material(index)
            .ok_or(SceneError::MissingMaterial(index.index()))
    }

    pub fn add_sphere(&mut self, sphere: Sphere) -> Result<(), SceneError> {
        self.check_material(sphere.material())?;
        self.spheres.push(sphere);
        Ok(())
    }

    pub fn add_quad(&mut self, quad: Quad) -> Result<(), SceneError> {
        self.check_material(quad.material())?;
        self.quads.push(quad);
        Ok(())
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::{WorldPoint, WorldVector};
    use crate::scene::Color;
    use assert2::{assert, let_assert};

    fn grey() -> Material {
        Material::builder()
            .diffuse(Color::new(0.5, 0.5, 0.5))
            .build()
            .unwrap()
    }

    #[test]
    fn material_lookup() {
        let mut catalog = PrimitiveCatalog::new();
        let a = catalog.add_material("a", grey());
        let b = catalog.add_material("b", grey());
        assert!(a.index() == 0);
        assert!(b.index() == 1);
        assert!(catalog.material_index("b").unwrap() == b);
        let_assert!(Err(SceneError::UnknownMaterial(name)) = catalog.material_index("c"));
        assert!(name == "c");
    }

    #[test]
    fn replacing_material_keeps_index() {
        let mut catalog = PrimitiveCatalog::new();
        catalog.add_material("a", grey());
        let b = catalog.add_material("b", grey());
        let mirror = Material::builder()
            .diffuse(Color::new(0.3, 0.3, 0.3))
            .kind(crate::scene::MaterialKind::Mirror)
            .build()
            .unwrap();
        let b2 = catalog.add_material("b", mirror);
        assert!(b == b2);
        assert!(catalog.material_count() == 2);
        assert!(catalog.material(b).unwrap() == &mirror);
    }

    #[test]
    fn primitives_need_existing_material() {
        let mut catalog = PrimitiveCatalog::new();
        let sphere = Sphere::new(WorldPoint::origin(), 1.0, MaterialIdx::from_usize(0)).unwrap();
        let_assert!(Err(SceneError::MissingMaterial(0)) = catalog.add_sphere(sphere));

        catalog.add_material("a", grey());
        catalog.add_sphere(sphere).unwrap();
        let quad = Quad::new(
            WorldPoint::origin(),
            WorldVector::x(),
            WorldVector::y(),
            MaterialIdx::from_usize(0),
        )
        .unwrap();
        catalog.add_quad(quad).unwrap();
        assert!(catalog.spheres().len() == 1);
        assert!(catalog.quads().len() == 1);
    }
}
