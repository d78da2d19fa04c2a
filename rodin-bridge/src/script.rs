//! Standalone import script, pasted into Blender's text editor.

use serde::{Deserialize, Serialize};

use crate::{
    error::BridgeError,
    settings::{BlenderVersion, ExportSettings, ImportSettings},
};

/// Substituted when no model has been generated yet.
pub const MODEL_URL_PLACEHOLDER: &str = "YOUR_MODEL_URL_HERE";

/// File name offered when the script is downloaded.
pub const IMPORT_SCRIPT_FILE_NAME: &str = "import_model.py";

/// Everything needed to render an import script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptOptions {
    pub model_url: Option<String>,
    pub blender_version: BlenderVersion,
    pub import: ImportSettings,
    pub export: ExportSettings,
}

const PRELUDE: &str = r"import bpy
import bmesh
import os
from mathutils import Vector

";

const IMPORT_HEAD: &str = r#"

def import_model_from_url(model_url):
    """Import the generated model into a clean scene"""
    bpy.ops.object.select_all(action='SELECT')
    bpy.ops.object.delete(use_global=False, confirm=False)

    lowered = model_url.lower()
    if lowered.endswith('.glb') or lowered.endswith('.gltf'):
        bpy.ops.import_scene.gltf(filepath=model_url, import_pack_images=IMPORT_TEXTURES)
    elif lowered.endswith('.obj'):
        bpy.ops.wm.obj_import(filepath=model_url)
    elif lowered.endswith('.fbx'):
        bpy.ops.import_scene.fbx(filepath=model_url)
    else:
        raise ValueError(f"Unsupported model format: {model_url}")

    for obj in bpy.context.selected_objects:
        if obj.type != 'MESH':
            continue
        obj.scale = (SCALE, SCALE, SCALE)
"#;

const APPLY_TRANSFORMS: &str = r"        bpy.context.view_layer.objects.active = obj
        bpy.ops.object.transform_apply(location=True, rotation=True, scale=True)
";

const SMOOTH_SHADING: &str = r"        bpy.context.view_layer.objects.active = obj
        bpy.ops.object.shade_smooth()
";

const HELPERS: &str = r#"
    print("Model imported successfully!")


def setup_materials():
    """Rebuild a basic PBR node tree for every material"""
    for obj in bpy.context.scene.objects:
        if obj.type != 'MESH' or not obj.data.materials:
            continue
        for mat in obj.data.materials:
            if not mat or not mat.use_nodes:
                continue
            nodes = mat.node_tree.nodes
            links = mat.node_tree.links
            nodes.clear()

            bsdf = nodes.new(type='ShaderNodeBsdfPrincipled')
            bsdf.location = (0, 0)
            output = nodes.new(type='ShaderNodeOutputMaterial')
            output.location = (300, 0)
            links.new(bsdf.outputs['BSDF'], output.inputs['Surface'])

            print(f"Material {mat.name} setup complete")


def optimize_mesh():
    """Merge duplicate vertices and recalculate normals"""
    for obj in bpy.context.selected_objects:
        if obj.type != 'MESH':
            continue
        bpy.context.view_layer.objects.active = obj
        bpy.ops.object.mode_set(mode='EDIT')
        bpy.ops.mesh.remove_doubles(threshold=0.001)
        bpy.ops.mesh.normals_make_consistent(inside=False)
        bpy.ops.object.mode_set(mode='OBJECT')
        print(f"Mesh {obj.name} optimized")

"#;

const EXPORT_BODY: &str = r#"    """Export the scene in the requested format"""
    if format == 'glb':
        bpy.ops.export_scene.gltf(
            filepath=filepath,
            export_format='GLB',
            export_animations=EXPORT_ANIMATIONS,
            export_apply=EXPORT_APPLY_MODIFIERS,
            export_lights=EXPORT_LIGHTS,
        )
    elif format == 'obj':
        bpy.ops.wm.obj_export(filepath=filepath)
    elif format == 'fbx':
        bpy.ops.export_scene.fbx(filepath=filepath, bake_anim=EXPORT_ANIMATIONS)
    else:
        raise ValueError(f"Unsupported export format: {format}")

    print(f"Model exported to {filepath}")

"#;

/// Render the import script for the given options.
///
/// A missing or empty URL renders [`MODEL_URL_PLACEHOLDER`] so the script can
/// still be downloaded and edited by hand.
///
/// # Errors
/// Returns [`BridgeError::InvalidScale`] if the import scale is out of range.
pub fn render_import_script(options: &ScriptOptions) -> Result<String, BridgeError> {
    options.import.validate()?;

    let url = options
        .model_url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or(MODEL_URL_PLACEHOLDER);
    let import = &options.import;
    let export = &options.export;
    let version = options.blender_version;

    let mut out = String::with_capacity(4096);
    out.push_str(PRELUDE);
    out.push_str(&format!(
        "# Blender {version} import script for a generated model\n\
         # Paste into Blender's Text Editor and run\n\n"
    ));
    out.push_str(&format!("MODEL_URL = {}\n", python_string(url)));
    out.push_str(&format!("SCALE = {:?}\n", import.scale));
    out.push_str(&format!("IMPORT_TEXTURES = {}\n", python_bool(import.import_textures)));
    out.push_str(&format!("EXPORT_ANIMATIONS = {}\n", python_bool(export.include_animations)));
    out.push_str(&format!(
        "EXPORT_APPLY_MODIFIERS = {}\n",
        python_bool(export.optimize_geometry)
    ));
    out.push_str(&format!("EXPORT_LIGHTS = {}\n", python_bool(export.bake_lighting)));

    out.push_str(IMPORT_HEAD);
    if import.apply_transforms {
        out.push_str(APPLY_TRANSFORMS);
    }
    if import.smooth_shading {
        out.push_str(SMOOTH_SHADING);
    }
    out.push_str(HELPERS);

    out.push_str(&format!(
        "\ndef export_model(filepath, format={}):\n",
        python_string(export.format.as_str())
    ));
    out.push_str(EXPORT_BODY);

    out.push_str("\nif __name__ == \"__main__\":\n");
    out.push_str("    import_model_from_url(MODEL_URL)\n");
    if import.import_materials {
        out.push_str("    setup_materials()\n");
    }
    out.push_str("    optimize_mesh()\n");
    out.push_str(&format!(
        "    print(\"Import complete! Ready for editing in Blender {version}\")\n"
    ));

    Ok(out)
}

/// Quote `raw` as a double-quoted Python string literal.
#[must_use]
pub fn python_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

const fn python_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}
