//! Export orchestration.
//!
//! One `run_export` call produces the whole output set: the main scene
//! document, a per-frame `objects.igs` scenedata document referenced by
//! an `include`, and the binary mesh artifacts next to them. The output
//! layout under the export directory is
//!
//! ```text
//! <export_path>/<filename>                    main document
//! <export_path>/<stem>/<hash>.igmesh          shared mesh artifacts
//! <export_path>/<stem>/<frame:05>/objects.igs per-frame instances
//! ```

use super::instance::build_instance_fragment;
use super::lighting::LightingChecker;
use super::transform::{keyframes, pos_field, rotation_field};
use super::traverse::{iterate_scene, GeometryExporter};
use super::{ExportConfig, ExportContext};
use crate::document::{write_document_to, DocNode};
use crate::error::{ExportError, Result};
use crate::igmesh::MeshSerializer;
use crate::scene::{CameraSettings, ClayMaterial, NamedMedium, NullMaterial, SceneMaterial, SceneSource};
use glam::Mat4;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

/// The scenes taking part in one export run. A background set contributes
/// geometry, lamps and mediums but its objects are exported before the
/// main scene's.
pub struct ExportInput<'a> {
    pub scene: &'a mut dyn SceneSource,
    pub background_set: Option<&'a mut dyn SceneSource>,
}

/// Counters reported after a finished export.
#[derive(Debug, Clone)]
pub struct ExportStats {
    pub mesh_count: usize,
    pub material_count: usize,
    pub instance_count: u64,
    pub lamp_count: usize,
    pub duration: Duration,
    /// Path of the written main document.
    pub igs_path: PathBuf,
}

/// Run the whole pipeline and write the output set.
pub fn run_export(
    input: &mut ExportInput<'_>,
    serializer: &dyn MeshSerializer,
    config: &ExportConfig,
) -> Result<ExportStats> {
    let started = Instant::now();

    // Fail before touching the scene if the output location is unusable.
    if !config.export_path.exists() {
        fs::create_dir_all(&config.export_path).map_err(|e| {
            ExportError::OutputPath(format!(
                "cannot create '{}': {}",
                config.export_path.display(),
                e
            ))
        })?;
    }
    let igs_path = config.export_path.join(&config.filename);
    fs::File::create(&igs_path).map_err(|e| {
        ExportError::OutputPath(format!("cannot write '{}': {}", igs_path.display(), e))
    })?;

    let render = input.scene.render().clone();
    let camera_settings = match input.scene.camera() {
        Some(camera) => camera.settings.clone(),
        None => {
            return Err(ExportError::InvalidScene(
                "scene has no active camera".to_string(),
            ))
        }
    };

    let start_frame = render.frame_current;
    let rel_mesh_dir = config.scene_file_stem.clone();
    let rel_frame_dir = format!("{}/{:05}", config.scene_file_stem, start_frame);
    let mesh_dir = config.export_path.join(&rel_mesh_dir);
    let frame_dir = config.export_path.join(&rel_frame_dir);
    fs::create_dir_all(&frame_dir).map_err(|e| {
        ExportError::OutputPath(format!("cannot create '{}': {}", frame_dir.display(), e))
    })?;

    // Lighting pre-pass over every participating scene.
    let mut checker = LightingChecker::new();
    if let Some(background) = input.background_set.as_deref() {
        iterate_scene(background, &mut checker)?;
    }
    iterate_scene(&*input.scene, &mut checker)?;

    let mut scene_xml = render.build_scene_root();

    if !checker.is_valid() {
        info!("no light source found, adding default background");
        scene_xml.push(fallback_background());
    }

    scene_xml.push(camera_settings.tonemapping.build());

    for fragment in ClayMaterial.build() {
        scene_xml.push(fragment);
    }
    for fragment in NullMaterial.build() {
        scene_xml.push(fragment);
    }

    let mut ctx = ExportContext::new(mesh_dir, rel_mesh_dir, render.skip_existing_meshes);

    // With motion blur the geometry is sampled once per frame over the
    // shutter interval; the last sampled frame is the first one at or
    // past shutter close.
    let fps = render.effective_fps();
    let exposure = camera_settings.exposure_duration();
    let end_frame = if render.motion_blur {
        ((start_frame as f64 / fps + exposure) * fps).ceil() as i32
    } else {
        start_frame
    };

    let mut camera_samples: Vec<(f64, Mat4)> = Vec::new();

    for frame in start_frame..=end_frame {
        let normalised_time = (frame - start_frame) as f64 / fps / exposure;
        ctx.normalised_time = normalised_time;
        info!(frame, time = normalised_time, "exporting frame");

        if let Some(background) = input.background_set.as_deref_mut() {
            background.set_frame(frame);
        }
        input.scene.set_frame(frame);

        if let Some(camera) = input.scene.camera() {
            camera_samples.push((normalised_time, camera.matrix_world));
        }

        if let Some(background) = input.background_set.as_deref() {
            iterate_scene(background, &mut GeometryExporter::new(&mut ctx, serializer))?;
        }
        iterate_scene(&*input.scene, &mut GeometryExporter::new(&mut ctx, serializer))?;
    }

    let world_scale = input.scene.world_scale();
    scene_xml.push(build_camera(&camera_settings, &camera_samples, world_scale));

    // Light layer table, background set first so indices match the
    // emitters exported above.
    let mut layer_index = 0usize;
    if let Some(background) = input.background_set.as_deref() {
        layer_index = push_light_layers(&mut scene_xml, background, layer_index);
    }
    push_light_layers(&mut scene_xml, &*input.scene, layer_index);

    push_background(&mut scene_xml, &ctx);

    // Mediums keep one running uid sequence across both scenes, with the
    // implicit basic medium last.
    let mut medium_index = 0usize;
    if let Some(background) = input.background_set.as_deref() {
        for medium in background.mediums() {
            scene_xml.push(medium.build(medium_index));
            medium_index += 1;
        }
    }
    for medium in input.scene.mediums() {
        scene_xml.push(medium.build(medium_index));
        medium_index += 1;
    }
    scene_xml.push(NamedMedium::default_basic(medium_index));

    for fragments in ctx.materials.values() {
        for fragment in fragments {
            scene_xml.push(fragment.clone());
        }
    }
    for artifact in ctx.meshes_on_disk.values() {
        scene_xml.push(artifact.fragment.clone());
    }

    let mut scenedata = DocNode::new("scenedata");
    for record in ctx.objects.values() {
        scenedata.push(build_instance_fragment(record));
    }
    write_document_to(&frame_dir.join("objects.igs"), &scenedata)?;
    scene_xml.push(
        DocNode::new("include").field("pathname", format!("{}/objects.igs", rel_frame_dir)),
    );

    write_document_to(&igs_path, &scene_xml)?;

    // Leave host playback where the user had it.
    if end_frame > start_frame {
        if let Some(background) = input.background_set.as_deref_mut() {
            background.set_frame(start_frame);
        }
        input.scene.set_frame(start_frame);
    }

    let stats = ExportStats {
        mesh_count: ctx.meshes_on_disk.len(),
        material_count: ctx.materials.len(),
        instance_count: ctx.instance_count,
        lamp_count: ctx.lamps.len(),
        duration: started.elapsed(),
        igs_path,
    };
    info!(
        meshes = stats.mesh_count,
        materials = stats.material_count,
        instances = stats.instance_count,
        lamps = stats.lamp_count,
        "export finished in {:.2?}",
        stats.duration
    );
    Ok(stats)
}

/// Constant white background at 20 kcd/m2, used when the lighting check
/// finds nothing that would illuminate the render.
fn fallback_background() -> DocNode {
    let material = DocNode::new("material").field("name", "background_material").child(
        DocNode::new("diffuse").child(
            DocNode::new("base_emission").child(
                DocNode::new("constant").child(
                    DocNode::new("rgb")
                        .field_list("rgb", [1.0, 1.0, 1.0])
                        .field("gamma", 1.0),
                ),
            ),
        ),
    );
    DocNode::new("background_settings")
        .child(DocNode::new("background_material").child(material))
        .child(
            DocNode::new("emission_scale")
                .field("material_name", "background_material")
                .field("measure", "luminance")
                .field("value", 20000),
        )
}

fn build_camera(settings: &CameraSettings, samples: &[(f64, Mat4)], world_scale: f32) -> DocNode {
    let mut node = DocNode::new("camera")
        .field("aperture_radius", settings.aperture_radius)
        .field("sensor_width", settings.sensor_width)
        .field("lens_sensor_dist", settings.lens_sensor_dist)
        .field("exposure_duration", settings.exposure_duration());
    if settings.autofocus {
        node = node.child(DocNode::new("autofocus"));
    } else {
        node = node.field("focus_distance", settings.focus_distance);
    }
    if samples.len() > 1 {
        node = node.extend(keyframes(samples, world_scale));
    } else if let Some((_, matrix)) = samples.first() {
        node = node
            .child(rotation_field(matrix))
            .child(pos_field(matrix, world_scale));
    }
    node
}

fn push_light_layers(scene_xml: &mut DocNode, scene: &dyn SceneSource, base: usize) -> usize {
    let mut index = base;
    for (_, layer) in scene.light_layers().enumerate() {
        // Disabled layers keep their slot so indices stay stable.
        let gain = if layer.enabled { layer.gain } else { 0.0 };
        scene_xml.push(
            DocNode::new("light_layer")
                .field("layer_index", index)
                .field("name", layer.name.clone())
                .field("gain", gain),
        );
        index += 1;
    }
    index
}

/// Compose the collected lamp materials into the background settings.
///
/// A single lamp becomes the background material directly; several lamps
/// are emitted as named materials blended by an equal-weight sum.
fn push_background(scene_xml: &mut DocNode, ctx: &ExportContext) {
    match ctx.lamps.len() {
        0 => {}
        1 => {
            let fragments = ctx.lamps.values().next().unwrap();
            let mut background = DocNode::new("background_material");
            for fragment in fragments {
                background.push(fragment.clone());
            }
            scene_xml.push(DocNode::new("background_settings").child(background));
        }
        _ => {
            let mut sum = DocNode::new("sum");
            for fragments in ctx.lamps.values() {
                for fragment in fragments {
                    scene_xml.push(fragment.clone());
                }
                let material_name = fragments
                    .first()
                    .and_then(|f| f.find("name"))
                    .map(|n| n.text())
                    .unwrap_or_default();
                sum.push(
                    DocNode::new("mat").field("mat_name", material_name).child(
                        DocNode::new("weight")
                            .child(DocNode::new("constant").child(
                                DocNode::new("uniform").field("value", 1),
                            )),
                    ),
                );
            }
            let combined = DocNode::new("material")
                .field("name", "background_material")
                .child(sum);
            scene_xml.push(
                DocNode::new("background_settings")
                    .child(DocNode::new("background_material").child(combined)),
            );
        }
    }
}
