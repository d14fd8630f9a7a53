use std::sync::Arc;

use tracing::info;

use crate::bvh::Bvh;
use crate::config::Settings;
use crate::encoder::{NodeTextures, PrimitiveUniforms, TriangleTexture};
use crate::geometry::WorldBox;
use crate::mesh_import::{
    ImportError, ImportMode, ImportOptions, ImportedMesh, MeshSource, import_mesh,
};

use super::{Environment, MeshTriangle, PrimitiveCatalog};

/// Triangles, the hierarchy over them and their encoded textures.
///
/// All parts are built together from one triangle snapshot and are never modified afterwards,
/// a change produces a new value with a higher version.
#[derive(Clone, Debug)]
pub struct TriangleGeometry {
    version: u64,
    /// Stored in leaf order, leaf ranges of `bvh` index this directly.
    triangles: Vec<MeshTriangle>,
    bvh: Bvh,
    nodes: NodeTextures,
    triangle_texture: TriangleTexture,
}

impl TriangleGeometry {
    pub fn build(
        version: u64,
        triangles: Vec<MeshTriangle>,
        catalog: &PrimitiveCatalog,
        settings: &Settings,
    ) -> TriangleGeometry {
        let bvh = Bvh::build(&triangles, settings.leaf_size);
        let triangles = bvh.apply_order(&triangles);
        let nodes = NodeTextures::encode(&bvh, settings.max_texture_dimension);
        let triangle_texture =
            TriangleTexture::encode(&triangles, catalog, settings.max_texture_dimension);

        TriangleGeometry {
            version,
            triangles,
            bvh,
            nodes,
            triangle_texture,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn triangles(&self) -> &[MeshTriangle] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }

    pub fn nodes(&self) -> &NodeTextures {
        &self.nodes
    }

    pub fn triangle_texture(&self) -> &TriangleTexture {
        &self.triangle_texture
    }

    /// Bounds of the whole mesh, `None` when there are no triangles.
    pub fn bounds(&self) -> Option<&WorldBox> {
        self.bvh.root_bounds()
    }
}

/// Complete render-side scene: static primitives, environment and the current triangle snapshot.
#[derive(Clone, Debug)]
pub struct Scene {
    catalog: PrimitiveCatalog,
    environment: Environment,
    uniforms: PrimitiveUniforms,
    geometry: Arc<TriangleGeometry>,
}

impl Scene {
    pub fn new(catalog: PrimitiveCatalog, environment: Environment, settings: &Settings) -> Scene {
        let uniforms = PrimitiveUniforms::encode(&catalog);
        let geometry = Arc::new(TriangleGeometry::build(0, Vec::new(), &catalog, settings));
        Scene {
            catalog,
            environment,
            uniforms,
            geometry,
        }
    }

    pub fn catalog(&self) -> &PrimitiveCatalog {
        &self.catalog
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn uniforms(&self) -> &PrimitiveUniforms {
        &self.uniforms
    }

    /// Snapshot of the current triangle geometry.
    pub fn geometry(&self) -> Arc<TriangleGeometry> {
        Arc::clone(&self.geometry)
    }

    /// How many triangles an import in the given mode may add.
    pub fn triangle_capacity(&self, mode: ImportMode, max_triangles: usize) -> usize {
        match mode {
            ImportMode::Replace => max_triangles,
            ImportMode::Append => max_triangles.saturating_sub(self.geometry.triangle_count()),
        }
    }

    /// Imports a mesh and swaps in the rebuilt geometry.
    /// On error the current geometry stays in place.
    pub fn import_mesh(
        &mut self,
        source: &MeshSource,
        options: &ImportOptions,
        settings: &Settings,
    ) -> Result<ImportSummary, ImportError> {
        self.catalog.check_material(options.material)?;
        let capacity = self.triangle_capacity(options.mode, settings.max_triangles);
        let imported = import_mesh(source, options, capacity)?;
        Ok(self.apply_import(imported, settings))
    }

    pub fn apply_import(&mut self, imported: ImportedMesh, settings: &Settings) -> ImportSummary {
        let summary = ImportSummary {
            mode: imported.mode,
            imported: imported.triangles.len(),
            dropped: imported.dropped,
        };

        let triangles = match imported.mode {
            ImportMode::Replace => imported.triangles,
            ImportMode::Append => {
                let mut triangles = self.geometry.triangles().to_vec();
                triangles.extend(imported.triangles);
                triangles
            }
        };
        self.replace_triangles(triangles, settings);

        summary
    }

    /// Rebuilds the hierarchy and textures for a new set of triangles and swaps them in.
    pub fn replace_triangles(&mut self, triangles: Vec<MeshTriangle>, settings: &Settings) {
        let version = self.geometry.version() + 1;
        let geometry = TriangleGeometry::build(version, triangles, &self.catalog, settings);
        info!(
            version,
            triangles = geometry.triangle_count(),
            nodes = geometry.bvh().node_count(),
            "Swapped in rebuilt triangle geometry"
        );
        self.geometry = Arc::new(geometry);
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ImportSummary {
    pub mode: ImportMode,
    pub imported: usize,
    pub dropped: usize,
}
