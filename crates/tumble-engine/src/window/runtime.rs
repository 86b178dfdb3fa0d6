use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::coords::{Point, ViewportConfig};
use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::graphics::WgpuGraphics;
use crate::host::Lifecycle;
use crate::time::FpsCounter;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Append the measured frame rate to the title.
    pub show_fps: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "tumble".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            show_fps: true,
        }
    }
}

/// Single-window host loop driving a [`Lifecycle`].
pub struct Runtime;

impl Runtime {
    /// Runs until the window closes.
    ///
    /// Start failures, draw failures and fatal surface errors end the loop
    /// and are returned here.
    pub fn run<L>(config: RuntimeConfig, gpu_init: GpuInit, app: L) -> Result<()>
    where
        L: Lifecycle + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut host = HostState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut host)
            .context("winit event loop terminated with error")?;

        match host.fatal {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    fps: FpsCounter,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Phase {
    Waiting,
    Started,
    Stopped,
}

struct HostState<L> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: L,

    // Field order matters: graphics holds device clones and drops first.
    graphics: Option<WgpuGraphics>,
    entry: Option<WindowEntry>,

    phase: Phase,
    viewport: ViewportConfig,
    pointer: Point,
    pressed: bool,
    fatal: Option<anyhow::Error>,
}

impl<L: Lifecycle> HostState<L> {
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: L) -> Self {
        Self {
            config,
            gpu_init,
            app,
            graphics: None,
            entry: None,
            phase: Phase::Waiting,
            viewport: ViewportConfig::default(),
            pointer: Point::zero(),
            pressed: false,
            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.shutdown();
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        event_loop.exit();
    }

    fn open_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            fps: FpsCounter::new(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()?;

        let graphics = WgpuGraphics::new(entry.borrow_gpu());
        let viewport = entry.with_window(|w| viewport_of(w.inner_size(), w.scale_factor()));

        self.graphics = Some(graphics);
        self.entry = Some(entry);
        self.viewport = viewport;
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        let graphics = self
            .graphics
            .as_mut()
            .ok_or_else(|| anyhow!("no graphics context"))?;
        self.app.start(graphics).context("engine failed to start")?;
        self.phase = Phase::Started;

        self.app
            .config(self.viewport, ViewportConfig::default())
            .context("initial viewport config failed")?;
        Ok(())
    }

    /// Stops the app once, then releases the surface.
    fn shutdown(&mut self) {
        if self.phase == Phase::Started {
            if let Some(graphics) = self.graphics.as_mut() {
                if let Err(e) = self.app.stop(graphics) {
                    log::error!("engine stop failed: {e}");
                }
            }
        }
        self.phase = Phase::Stopped;
        self.graphics = None;
        self.entry = None;
    }

    fn reconfigure(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        let Some(entry) = self.entry.as_mut() else {
            return Ok(());
        };
        entry.with_gpu_mut(|gpu| gpu.resize(size));
        let scale = entry.with_window(|w| w.scale_factor());

        let old = self.viewport;
        self.viewport = viewport_of(size, scale);
        if self.phase == Phase::Started && self.viewport != old {
            self.app.config(self.viewport, old)?;
        }
        Ok(())
    }

    fn touch(&mut self, point: Point) -> Result<()> {
        self.pointer = point;
        if self.phase == Phase::Started {
            self.app.touch(point, self.viewport)?;
        }
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        if self.phase != Phase::Started {
            return Ok(());
        }
        let (Some(entry), Some(graphics)) = (self.entry.as_mut(), self.graphics.as_mut()) else {
            return Ok(());
        };

        self.app.draw(graphics, self.viewport)?;

        match entry.with_gpu_mut(|gpu| graphics.present(gpu)) {
            Ok(()) => {}
            Err(SurfaceErrorAction::Fatal) => return Err(anyhow!("surface is out of memory")),
            Err(_) => return Ok(()),
        }

        let base = &self.config.title;
        let show_fps = self.config.show_fps;
        entry.with_mut(|fields| {
            if fields.fps.frame(Instant::now()).is_some() && show_fps {
                fields.window.set_title(&fields.fps.title(base));
            }
        });
        Ok(())
    }
}

impl<L: Lifecycle> ApplicationHandler for HostState<L> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.phase == Phase::Stopped {
            return;
        }

        if let Err(e) = self.open_window(event_loop) {
            self.fail(event_loop, e);
            return;
        }
        if let Err(e) = self.start() {
            self.fail(event_loop, e);
            return;
        }

        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let result = match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested");
                self.shutdown();
                event_loop.exit();
                Ok(())
            }

            WindowEvent::Resized(size) => self.reconfigure(size),

            WindowEvent::ScaleFactorChanged { .. } => match &self.entry {
                Some(entry) => {
                    let size = entry.with_window(|w| w.inner_size());
                    self.reconfigure(size)
                }
                None => Ok(()),
            },

            WindowEvent::CursorMoved { position, .. } => {
                let point = self.logical_point(position);
                if self.pressed {
                    self.touch(point)
                } else {
                    self.pointer = point;
                    Ok(())
                }
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.pressed = state == ElementState::Pressed;
                if self.pressed {
                    self.touch(self.pointer)
                } else {
                    Ok(())
                }
            }

            WindowEvent::Touch(touch) => match touch.phase {
                TouchPhase::Started | TouchPhase::Moved => {
                    let point = self.logical_point(touch.location);
                    self.touch(point)
                }
                TouchPhase::Ended | TouchPhase::Cancelled => Ok(()),
            },

            WindowEvent::RedrawRequested => self.redraw(),

            _ => Ok(()),
        };

        if let Err(e) = result {
            self.fail(event_loop, e);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}

impl<L> HostState<L> {
    fn logical_point(&self, position: PhysicalPosition<f64>) -> Point {
        let scale = self
            .entry
            .as_ref()
            .map_or(1.0, |e| e.with_window(|w| w.scale_factor()));
        to_logical(position, scale)
    }
}

fn to_logical(position: PhysicalPosition<f64>, scale: f64) -> Point {
    let p = position.to_logical::<f64>(scale);
    Point::new(p.x as f32, p.y as f32)
}

fn viewport_of(size: PhysicalSize<u32>, scale: f64) -> ViewportConfig {
    let s = size.to_logical::<f64>(scale);
    ViewportConfig::new(s.width as f32, s.height as f32)
}
