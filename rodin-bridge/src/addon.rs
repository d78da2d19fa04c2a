//! Installable Blender addon exposing an "Import from Generator" operator.

use crate::settings::BlenderVersion;

/// File name offered when the addon is downloaded.
pub const ADDON_FILE_NAME: &str = "model_generator_bridge.py";

const ADDON_BODY: &str = r#"
import bpy
import requests
import tempfile
import os
from bpy.props import StringProperty, BoolProperty, FloatProperty
from bpy.types import Panel, Operator


def guess_suffix(url):
    lowered = url.lower()
    for suffix in ('.glb', '.gltf', '.fbx', '.obj'):
        if suffix in lowered:
            return suffix
    return '.glb'


class MESH_OT_import_from_generator(Operator):
    """Import model from 3D Model Generator"""
    bl_idname = "mesh.import_from_generator"
    bl_label = "Import from Generator"
    bl_options = {'REGISTER', 'UNDO'}

    url: StringProperty(
        name="Model URL",
        description="URL of the generated model",
        default=""
    )

    scale: FloatProperty(
        name="Scale",
        description="Import scale",
        default=1.0,
        min=0.1,
        max=10.0
    )

    apply_transforms: BoolProperty(
        name="Apply Transforms",
        description="Apply scale, rotation, and location",
        default=True
    )

    def execute(self, context):
        if not self.url:
            self.report({'ERROR'}, "Please provide a model URL")
            return {'CANCELLED'}

        try:
            response = requests.get(self.url, timeout=60)
            response.raise_for_status()

            suffix = guess_suffix(self.url)
            with tempfile.NamedTemporaryFile(delete=False, suffix=suffix) as temp_file:
                temp_file.write(response.content)
                temp_path = temp_file.name

            try:
                if suffix in ('.glb', '.gltf'):
                    bpy.ops.import_scene.gltf(filepath=temp_path)
                elif suffix == '.fbx':
                    bpy.ops.import_scene.fbx(filepath=temp_path)
                else:
                    bpy.ops.wm.obj_import(filepath=temp_path)
            finally:
                os.unlink(temp_path)

            for obj in context.selected_objects:
                if obj.type != 'MESH':
                    continue
                obj.scale = (self.scale, self.scale, self.scale)
                if self.apply_transforms:
                    context.view_layer.objects.active = obj
                    bpy.ops.object.transform_apply(location=True, rotation=True, scale=True)

            self.report({'INFO'}, "Model imported successfully")
            return {'FINISHED'}

        except Exception as e:
            self.report({'ERROR'}, f"Import failed: {str(e)}")
            return {'CANCELLED'}


class VIEW3D_PT_model_generator_panel(Panel):
    """Panel for 3D Model Generator tools"""
    bl_label = "3D Model Generator"
    bl_idname = "VIEW3D_PT_model_generator"
    bl_space_type = 'VIEW_3D'
    bl_region_type = 'UI'
    bl_category = "3D Gen"

    def draw(self, context):
        layout = self.layout

        box = layout.box()
        box.label(text="Import Model", icon='IMPORT')
        box.operator("mesh.import_from_generator")

        box = layout.box()
        box.label(text="Quick Tools", icon='TOOL_SETTINGS')
        box.operator("object.shade_smooth", text="Smooth Shading")
        box.operator("mesh.remove_doubles", text="Remove Doubles")


classes = (
    MESH_OT_import_from_generator,
    VIEW3D_PT_model_generator_panel,
)


def register():
    for cls in classes:
        bpy.utils.register_class(cls)


def unregister():
    for cls in reversed(classes):
        bpy.utils.unregister_class(cls)


if __name__ == "__main__":
    register()
"#;

/// Render the addon source for the given Blender release.
#[must_use]
pub fn render_addon(version: BlenderVersion) -> String {
    let (major, minor, patch) = version.triple();
    let mut out = String::with_capacity(ADDON_BODY.len() + 512);
    out.push_str("bl_info = {\n");
    out.push_str("    \"name\": \"3D Model Generator Bridge\",\n");
    out.push_str("    \"author\": \"3D Model Generator\",\n");
    out.push_str("    \"version\": (1, 0, 0),\n");
    out.push_str(&format!("    \"blender\": ({major}, {minor}, {patch}),\n"));
    out.push_str("    \"location\": \"View3D > Sidebar > 3D Gen\",\n");
    out.push_str("    \"description\": \"Bridge for importing models from 3D Model Generator\",\n");
    out.push_str("    \"category\": \"Import-Export\",\n");
    out.push_str("}\n");
    out.push_str(ADDON_BODY);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bl_info_tracks_requested_version() {
        let addon = render_addon(BlenderVersion::V4_3);
        assert!(addon.starts_with("bl_info = {"));
        assert!(addon.contains("\"blender\": (4, 3, 0),"));
    }

    #[test]
    fn addon_registers_operator_and_panel() {
        let addon = render_addon(BlenderVersion::default());
        assert!(addon.contains("bl_idname = \"mesh.import_from_generator\""));
        assert!(addon.contains("def register():"));
        assert!(addon.contains("def unregister():"));
        assert!(addon.contains("VIEW3D_PT_model_generator_panel,"));
    }
}
