use crate::error::{EngineError, Result};
use crate::graphics::{AttribLocation, GraphicsContext, ProgramHandle, UniformLocation};

/// Semantic attribute and uniform names shared with the shader sources.
pub mod names {
    pub const VERT_COORD: &str = "vertCoord";
    pub const VERT_TEX_COORD: &str = "vertTexCoord";
    pub const VERT_NORMAL: &str = "vertNormal";

    pub const PROJECTION: &str = "projection";
    pub const VIEW: &str = "view";
    pub const MODEL: &str = "model";
    pub const LIGHT_POSITION: &str = "lightPosition";
    pub const LIGHT_INTENSITIES: &str = "lightIntensities";
}

/// Locations of one program's inputs, keyed by semantic name.
///
/// Resolved once after program creation and never mutated. Optional bindings
/// that the program does not declare are skipped by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderBindings {
    vert_coord: AttribLocation,
    vert_tex_coord: AttribLocation,
    vert_normal: Option<AttribLocation>,

    projection: UniformLocation,
    view: UniformLocation,
    model: UniformLocation,
    light_position: Option<UniformLocation>,
    light_intensities: Option<UniformLocation>,
}

impl ShaderBindings {
    /// Resolves every semantic name against `program`.
    ///
    /// `vertCoord`, `vertTexCoord`, `projection`, `view` and `model` are
    /// mandatory; their absence is a [`EngineError::ShaderBinding`].
    pub fn resolve(ctx: &dyn GraphicsContext, program: &ProgramHandle) -> Result<Self> {
        let attrib = |name: &'static str| {
            ctx.attrib_location(program, name)
                .ok_or(EngineError::ShaderBinding { name })
        };
        let uniform = |name: &'static str| {
            ctx.uniform_location(program, name)
                .ok_or(EngineError::ShaderBinding { name })
        };
        let optional_attrib = |name: &'static str| {
            let loc = ctx.attrib_location(program, name);
            if loc.is_none() {
                log::warn!("program has no `{name}` attribute; it will not be bound");
            }
            loc
        };
        let optional_uniform = |name: &'static str| {
            let loc = ctx.uniform_location(program, name);
            if loc.is_none() {
                log::warn!("program has no `{name}` uniform; it will not be set");
            }
            loc
        };

        Ok(Self {
            vert_coord: attrib(names::VERT_COORD)?,
            vert_tex_coord: attrib(names::VERT_TEX_COORD)?,
            vert_normal: optional_attrib(names::VERT_NORMAL),
            projection: uniform(names::PROJECTION)?,
            view: uniform(names::VIEW)?,
            model: uniform(names::MODEL)?,
            light_position: optional_uniform(names::LIGHT_POSITION),
            light_intensities: optional_uniform(names::LIGHT_INTENSITIES),
        })
    }

    pub fn vert_coord(&self) -> AttribLocation {
        self.vert_coord
    }

    pub fn vert_tex_coord(&self) -> AttribLocation {
        self.vert_tex_coord
    }

    pub fn vert_normal(&self) -> Option<AttribLocation> {
        self.vert_normal
    }

    pub fn projection(&self) -> UniformLocation {
        self.projection
    }

    pub fn view(&self) -> UniformLocation {
        self.view
    }

    pub fn model(&self) -> UniformLocation {
        self.model
    }

    pub fn light_position(&self) -> Option<UniformLocation> {
        self.light_position
    }

    pub fn light_intensities(&self) -> Option<UniformLocation> {
        self.light_intensities
    }
}
