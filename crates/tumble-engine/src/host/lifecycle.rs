use crate::coords::{Point, ViewportConfig};
use crate::engine::Engine;
use crate::error::Result;
use crate::graphics::GraphicsContext;

/// Handlers the host invokes as platform events arrive.
///
/// All calls come from the thread owning the graphics context. `start` runs
/// once when a surface first exists; `stop` runs once when it goes away.
pub trait Lifecycle {
    fn start(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()>;

    fn draw(&mut self, ctx: &mut dyn GraphicsContext, config: ViewportConfig) -> Result<()>;

    fn touch(&mut self, point: Point, config: ViewportConfig) -> Result<()> {
        let _ = (point, config);
        Ok(())
    }

    fn config(&mut self, new: ViewportConfig, old: ViewportConfig) -> Result<()> {
        let _ = (new, old);
        Ok(())
    }

    fn stop(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()>;
}

impl Lifecycle for Engine {
    fn start(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        Engine::start(self, ctx)
    }

    fn draw(&mut self, ctx: &mut dyn GraphicsContext, config: ViewportConfig) -> Result<()> {
        Engine::draw(self, ctx, config)
    }

    fn touch(&mut self, point: Point, config: ViewportConfig) -> Result<()> {
        Engine::touch(self, point, config)
    }

    fn config(&mut self, new: ViewportConfig, old: ViewportConfig) -> Result<()> {
        Engine::config(self, new, old)
    }

    fn stop(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        Engine::stop(self, ctx)
    }
}
