use std::fmt;
use std::time::Instant;

use crate::coords::{Point, ViewportConfig};
use crate::error::{EngineError, Result};
use crate::geometry::GeometryDescriptor;
use crate::graphics::GraphicsContext;
use crate::render::{FrameInputs, FrameRenderer};
use crate::resources::{GpuResource, GpuResources, ImageCrateDecoder, ImageDecoder, ResourceManager};
use crate::shader::ShaderBindings;

use super::EngineAssets;

/// Observable lifecycle state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    Uninitialized,
    Running,
    Stopped,
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EngineStatus::Uninitialized => "uninitialized",
            EngineStatus::Running => "running",
            EngineStatus::Stopped => "stopped",
        })
    }
}

/// Session state that only exists between `start` and `stop`.
struct Session {
    bindings: ShaderBindings,
    resources: GpuResources,
    geometry: GeometryDescriptor<'static>,
    started_at: Instant,
    touch: Point,
}

enum Phase {
    Uninitialized,
    Running(Session),
    Stopped,
}

/// Rotating textured mesh renderer.
///
/// All GPU work goes through the [`GraphicsContext`] passed into each call.
/// The engine itself holds only handles.
pub struct Engine {
    assets: EngineAssets,
    manager: ResourceManager,
    phase: Phase,
}

impl Engine {
    pub fn new(assets: EngineAssets) -> Self {
        Self::with_decoder(assets, Box::new(ImageCrateDecoder))
    }

    pub fn with_decoder(assets: EngineAssets, decoder: Box<dyn ImageDecoder>) -> Self {
        Self {
            assets,
            manager: ResourceManager::new(decoder),
            phase: Phase::Uninitialized,
        }
    }

    pub fn status(&self) -> EngineStatus {
        match self.phase {
            Phase::Uninitialized => EngineStatus::Uninitialized,
            Phase::Running(_) => EngineStatus::Running,
            Phase::Stopped => EngineStatus::Stopped,
        }
    }

    /// Last recorded pointer location, while running.
    pub fn touch_location(&self) -> Option<Point> {
        match &self.phase {
            Phase::Running(s) => Some(s.touch),
            _ => None,
        }
    }

    /// Compiles the program, uploads geometry and texture, and resolves
    /// bindings.
    ///
    /// Any failure releases whatever was already created and leaves the
    /// engine stopped.
    pub fn start(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        if !matches!(self.phase, Phase::Uninitialized) {
            return Err(self.invalid("start"));
        }

        match self.create_session(ctx) {
            Ok(session) => {
                log::info!(
                    "engine started ({} vertices)",
                    session.geometry.vertex_count()
                );
                self.phase = Phase::Running(session);
                Ok(())
            }
            Err(e) => {
                log::error!("engine start failed: {e}");
                self.phase = Phase::Stopped;
                Err(e)
            }
        }
    }

    /// Renders one frame at the current wall-clock time.
    pub fn draw(&mut self, ctx: &mut dyn GraphicsContext, config: ViewportConfig) -> Result<()> {
        let Phase::Running(session) = &self.phase else {
            return Err(self.invalid("draw"));
        };

        let inputs = FrameInputs {
            viewport: config,
            elapsed: session.started_at.elapsed(),
            touch: session.touch,
        };
        FrameRenderer::new(&session.bindings, &session.resources, session.geometry)
            .render(ctx, &inputs)
    }

    /// Records a pointer location. The scene does not react to it.
    pub fn touch(&mut self, point: Point, _config: ViewportConfig) -> Result<()> {
        let Phase::Running(session) = &mut self.phase else {
            return Err(self.invalid("touch"));
        };
        log::trace!("touch at ({:.1}, {:.1})", point.x, point.y);
        session.touch = point;
        Ok(())
    }

    /// Viewport change. Recentres the touch location.
    pub fn config(&mut self, new: ViewportConfig, old: ViewportConfig) -> Result<()> {
        let Phase::Running(session) = &mut self.phase else {
            return Err(self.invalid("config"));
        };
        log::debug!(
            "viewport {}x{} -> {}x{}",
            old.width,
            old.height,
            new.width,
            new.height
        );
        session.touch = new.center();
        Ok(())
    }

    /// Releases program, buffer and texture, each exactly once.
    pub fn stop(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        if !matches!(self.phase, Phase::Running(_)) {
            return Err(self.invalid("stop"));
        }
        if let Phase::Running(session) = std::mem::replace(&mut self.phase, Phase::Stopped) {
            session.resources.release(&self.manager, ctx);
        }
        log::info!("engine stopped");
        Ok(())
    }

    fn create_session(&self, ctx: &mut dyn GraphicsContext) -> Result<Session> {
        let geometry = GeometryDescriptor::new(self.assets.geometry)?;

        let program =
            self.manager
                .create_program(ctx, &self.assets.vertex_source, &self.assets.fragment_source)?;

        let buffer = match self.manager.create_vertex_buffer(ctx, &geometry) {
            Ok(b) => b,
            Err(e) => return Err(self.rollback(ctx, e, [GpuResource::Program(program)])),
        };

        let bindings = match ShaderBindings::resolve(&*ctx, &program) {
            Ok(b) => b,
            Err(e) => {
                return Err(self.rollback(
                    ctx,
                    e,
                    [GpuResource::Program(program), GpuResource::Buffer(buffer)],
                ));
            }
        };

        let texture = match self.manager.load_texture(ctx, &self.assets.texture_bytes) {
            Ok(t) => t,
            Err(e) => {
                return Err(self.rollback(
                    ctx,
                    e,
                    [GpuResource::Program(program), GpuResource::Buffer(buffer)],
                ));
            }
        };

        Ok(Session {
            bindings,
            resources: GpuResources::new(program, buffer, texture),
            geometry,
            started_at: Instant::now(),
            // Origin until the first viewport config arrives.
            touch: Point::zero(),
        })
    }

    fn rollback<const N: usize>(
        &self,
        ctx: &mut dyn GraphicsContext,
        err: EngineError,
        created: [GpuResource; N],
    ) -> EngineError {
        for resource in created {
            self.manager.release(ctx, resource);
        }
        err
    }

    fn invalid(&self, operation: &'static str) -> EngineError {
        EngineError::InvalidState {
            operation,
            state: self.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::mock::{Call, MockContext};
    use crate::resources::DecodedImage;

    struct SolidDecoder;

    impl ImageDecoder for SolidDecoder {
        fn decode(&self, _bytes: &[u8]) -> std::result::Result<DecodedImage, String> {
            Ok(DecodedImage {
                width: 2,
                height: 2,
                pixels: vec![255; 16],
            })
        }
    }

    fn engine() -> Engine {
        Engine::with_decoder(EngineAssets::builtin(), Box::new(SolidDecoder))
    }

    fn started() -> (Engine, MockContext) {
        let mut e = engine();
        let mut ctx = MockContext::new();
        e.start(&mut ctx).unwrap();
        (e, ctx)
    }

    const VIEW: ViewportConfig = ViewportConfig::new(200.0, 100.0);

    // ── start ─────────────────────────────────────────────────────────────

    #[test]
    fn start_creates_three_objects_and_runs() {
        let (e, ctx) = started();
        assert_eq!(e.status(), EngineStatus::Running);
        assert_eq!(ctx.created, 3);
        assert_eq!(ctx.live.len(), 3);
        assert_eq!(e.touch_location(), Some(Point::zero()));

        let Phase::Running(session) = &e.phase else {
            panic!("not running");
        };
        let b = &session.bindings;
        assert_eq!(b.projection(), ctx.uniform("projection"));
        assert_eq!(b.view(), ctx.uniform("view"));
        assert_eq!(b.model(), ctx.uniform("model"));
        assert_eq!(b.light_position(), Some(ctx.uniform("lightPosition")));
        assert_eq!(b.light_intensities(), Some(ctx.uniform("lightIntensities")));
        assert_eq!(b.vert_coord(), ctx.attrib("vertCoord"));
        assert_eq!(b.vert_tex_coord(), ctx.attrib("vertTexCoord"));
    }

    #[test]
    fn start_twice_is_rejected() {
        let (mut e, mut ctx) = started();
        let err = e.start(&mut ctx).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidState {
                operation: "start",
                state: EngineStatus::Running
            }
        ));
        assert_eq!(ctx.created, 3);
    }

    #[test]
    fn start_after_stop_is_rejected() {
        let (mut e, mut ctx) = started();
        e.stop(&mut ctx).unwrap();
        assert!(matches!(
            e.start(&mut ctx),
            Err(EngineError::InvalidState { .. })
        ));
    }

    #[test]
    fn compile_failure_creates_nothing() {
        let mut e = engine();
        let mut ctx = MockContext::new();
        ctx.fail_compile = Some("syntax error".into());

        let err = e.start(&mut ctx).unwrap_err();
        assert!(matches!(err, EngineError::ShaderCompile(ref m) if m == "syntax error"));
        assert_eq!(e.status(), EngineStatus::Stopped);
        assert!(ctx.live.is_empty());
    }

    #[test]
    fn missing_binding_releases_program_and_buffer() {
        let mut e = engine();
        let mut ctx = MockContext::new();
        ctx.missing.insert("model");

        let err = e.start(&mut ctx).unwrap_err();
        assert!(matches!(err, EngineError::ShaderBinding { name: "model" }));
        assert_eq!(ctx.created, 2);
        assert!(ctx.live.is_empty());
        assert_eq!(e.status(), EngineStatus::Stopped);
    }

    #[test]
    fn texture_failure_releases_partial_resources() {
        let mut e = engine();
        let mut ctx = MockContext::new();
        ctx.fail_texture = Some("too large".into());

        let err = e.start(&mut ctx).unwrap_err();
        assert!(matches!(err, EngineError::TextureLoad(_)));
        assert!(ctx.live.is_empty());
        assert_eq!(e.status(), EngineStatus::Stopped);
    }

    #[test]
    fn malformed_geometry_is_a_layout_error() {
        static BAD: [f32; 7] = [0.0; 7];
        let assets = EngineAssets {
            geometry: &BAD,
            ..EngineAssets::builtin()
        };
        let mut e = Engine::with_decoder(assets, Box::new(SolidDecoder));
        let mut ctx = MockContext::new();

        assert!(matches!(
            e.start(&mut ctx),
            Err(EngineError::Layout { float_count: 7, .. })
        ));
        assert_eq!(ctx.created, 0);
    }

    // ── running ───────────────────────────────────────────────────────────

    #[test]
    fn config_recentres_touch() {
        let (mut e, _ctx) = started();
        e.config(VIEW, ViewportConfig::new(0.0, 0.0)).unwrap();
        assert_eq!(e.touch_location(), Some(Point::new(100.0, 50.0)));
    }

    #[test]
    fn touch_records_location() {
        let (mut e, _ctx) = started();
        e.touch(Point::new(10.0, 20.0), VIEW).unwrap();
        assert_eq!(e.touch_location(), Some(Point::new(10.0, 20.0)));
    }

    #[test]
    fn draw_renders_one_frame() {
        let (mut e, mut ctx) = started();
        e.draw(&mut ctx, VIEW).unwrap();
        assert!(
            ctx.last_frame()
                .contains(&Call::DrawTriangles { first: 0, count: 36 })
        );
    }

    #[test]
    fn draw_failure_is_a_backend_error() {
        let (mut e, mut ctx) = started();
        ctx.fail_draw = Some("lost".into());
        assert!(matches!(e.draw(&mut ctx, VIEW), Err(EngineError::Backend(_))));
        assert_eq!(e.status(), EngineStatus::Running);
    }

    // ── invalid states ────────────────────────────────────────────────────

    #[test]
    fn operations_before_start_are_rejected() {
        let mut e = engine();
        let mut ctx = MockContext::new();
        assert!(matches!(
            e.draw(&mut ctx, VIEW),
            Err(EngineError::InvalidState {
                operation: "draw",
                state: EngineStatus::Uninitialized
            })
        ));
        assert!(e.touch(Point::zero(), VIEW).is_err());
        assert!(e.config(VIEW, VIEW).is_err());
        assert!(e.stop(&mut ctx).is_err());
        assert!(ctx.calls.is_empty());
    }

    #[test]
    fn operations_after_stop_are_rejected() {
        let (mut e, mut ctx) = started();
        e.stop(&mut ctx).unwrap();
        let before = ctx.calls.len();

        assert!(e.draw(&mut ctx, VIEW).is_err());
        assert!(e.touch(Point::zero(), VIEW).is_err());
        assert!(e.config(VIEW, VIEW).is_err());
        assert!(matches!(
            e.stop(&mut ctx),
            Err(EngineError::InvalidState {
                operation: "stop",
                state: EngineStatus::Stopped
            })
        ));
        assert_eq!(ctx.calls.len(), before);
        assert_eq!(e.touch_location(), None);
    }

    // ── stop ──────────────────────────────────────────────────────────────

    #[test]
    fn stop_releases_each_object_once() {
        let (mut e, mut ctx) = started();
        e.draw(&mut ctx, VIEW).unwrap();
        e.stop(&mut ctx).unwrap();

        assert_eq!(e.status(), EngineStatus::Stopped);
        assert!(ctx.live.is_empty());
        let deletes = ctx
            .calls
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    Call::DeleteProgram(_) | Call::DeleteBuffer(_) | Call::DeleteTexture(_)
                )
            })
            .count();
        assert_eq!(deletes, 3);
    }
}
