//! Material export.
//!
//! Materials are keyed by name and exported at most once per run; a
//! material's `build` call may return several fragments (e.g.
//! medium-linked sub-elements) and the whole list is cached.

use super::ExportContext;
use crate::scene::SceneMaterial;
use tracing::debug;

/// Export a material's document fragments, idempotent per material name.
pub fn export_material(ctx: &mut ExportContext, material: &dyn SceneMaterial) {
    let name = material.name().to_string();
    if ctx.materials.have(&name) {
        return;
    }
    debug!(material = %name, "exporting material");
    let fragments = material.build();
    ctx.materials.add(name, fragments);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocNode;
    use crate::scene::SceneMaterial;

    #[derive(Debug)]
    struct CountingMaterial {
        name: String,
        builds: std::cell::Cell<usize>,
    }

    impl SceneMaterial for CountingMaterial {
        fn name(&self) -> &str {
            &self.name
        }

        fn build(&self) -> Vec<DocNode> {
            self.builds.set(self.builds.get() + 1);
            vec![
                DocNode::new("material").field("name", self.name.clone()),
                DocNode::new("medium").field("name", format!("{}_medium", self.name)),
            ]
        }
    }

    fn test_ctx() -> ExportContext {
        ExportContext::new("meshes".into(), "meshes".to_string(), false)
    }

    #[test]
    fn test_material_built_once_per_name() {
        let mut ctx = test_ctx();
        let material = CountingMaterial {
            name: "glass".to_string(),
            builds: std::cell::Cell::new(0),
        };

        export_material(&mut ctx, &material);
        export_material(&mut ctx, &material);
        export_material(&mut ctx, &material);

        assert_eq!(material.builds.get(), 1);
        assert_eq!(ctx.materials.len(), 1);
    }

    #[test]
    fn test_all_fragments_cached() {
        let mut ctx = test_ctx();
        let material = CountingMaterial {
            name: "glass".to_string(),
            builds: std::cell::Cell::new(0),
        };
        export_material(&mut ctx, &material);

        let fragments = ctx.materials.get(&"glass".to_string()).unwrap();
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[1].name(), "medium");
    }
}
