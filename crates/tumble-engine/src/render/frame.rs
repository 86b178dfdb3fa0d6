use std::time::Duration;

use crate::coords::{Point, ViewportConfig};
use crate::error::{EngineError, Result};
use crate::geometry::{AttributeLayout, GeometryDescriptor};
use crate::graphics::{AttribLocation, DepthFunc, GraphicsContext};
use crate::resources::GpuResources;
use crate::shader::ShaderBindings;

use super::transforms;

/// Everything a frame depends on besides the GPU objects.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameInputs {
    pub viewport: ViewportConfig,
    /// Wall-clock time since the engine started.
    pub elapsed: Duration,
    /// Last known pointer location. Not read by the current scene.
    pub touch: Point,
}

/// Draws one frame of the lit, textured, rotating mesh.
pub struct FrameRenderer<'a> {
    bindings: &'a ShaderBindings,
    resources: &'a GpuResources,
    geometry: GeometryDescriptor<'a>,
}

impl<'a> FrameRenderer<'a> {
    pub fn new(
        bindings: &'a ShaderBindings,
        resources: &'a GpuResources,
        geometry: GeometryDescriptor<'a>,
    ) -> Self {
        Self {
            bindings,
            resources,
            geometry,
        }
    }

    pub fn render(&self, ctx: &mut dyn GraphicsContext, inputs: &FrameInputs) -> Result<()> {
        let b = self.bindings;

        ctx.enable_depth_test(DepthFunc::Less);
        ctx.clear(transforms::CLEAR_COLOR);

        ctx.use_program(&self.resources.program());

        ctx.uniform_matrix4(
            b.projection(),
            &transforms::projection(inputs.viewport).to_cols_array(),
        );
        ctx.uniform_matrix4(b.view(), &transforms::view().to_cols_array());
        ctx.uniform_matrix4(
            b.model(),
            &transforms::model(inputs.elapsed).to_cols_array(),
        );

        if let Some(loc) = b.light_intensities() {
            ctx.uniform_vec3(loc, transforms::LIGHT_INTENSITIES);
        }
        if let Some(loc) = b.light_position() {
            ctx.uniform_vec3(loc, transforms::LIGHT_POSITION);
        }

        // Attribute pointers are scoped to the bound buffer; set them every frame.
        ctx.bind_vertex_buffer(&self.resources.buffer());
        let stride = self.geometry.stride();
        self.bind_attribute(ctx, b.vert_coord(), self.geometry.position(), stride);
        self.bind_attribute(ctx, b.vert_tex_coord(), self.geometry.texcoord(), stride);
        if let Some(loc) = b.vert_normal() {
            self.bind_attribute(ctx, loc, self.geometry.normal(), stride);
        }

        ctx.bind_texture(0, &self.resources.texture());

        ctx.draw_triangles(0, self.geometry.vertex_count())
            .map_err(EngineError::Backend)?;

        // Only the position stream is disabled; texcoord/normal stay enabled
        // across frames.
        ctx.disable_attrib(b.vert_coord());

        Ok(())
    }

    fn bind_attribute(
        &self,
        ctx: &mut dyn GraphicsContext,
        location: AttribLocation,
        layout: AttributeLayout,
        stride: u32,
    ) {
        ctx.enable_attrib(location);
        ctx.attrib_pointer(location, layout.components, stride, layout.offset);
    }
}
