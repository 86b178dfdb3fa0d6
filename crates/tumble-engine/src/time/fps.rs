use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(1);

/// Counts presented frames and reports the rate once per second.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window_start: Option<Instant>,
    frames: u32,
    last: Option<f32>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            window_start: None,
            frames: 0,
            last: None,
        }
    }

    /// Records one frame at `now`. Returns the new rate when a measurement
    /// window closes.
    pub fn frame(&mut self, now: Instant) -> Option<f32> {
        let start = *self.window_start.get_or_insert(now);
        self.frames += 1;

        let elapsed = now.saturating_duration_since(start);
        if elapsed < WINDOW {
            return None;
        }

        let fps = self.frames as f32 / elapsed.as_secs_f32();
        self.window_start = Some(now);
        self.frames = 0;
        self.last = Some(fps);
        log::debug!("{fps:.1} fps");
        Some(fps)
    }

    /// `"<title> - <fps> fps"`, or just the title before the first
    /// measurement.
    pub fn title(&self, base: &str) -> String {
        match self.last {
            Some(fps) => format!("{base} - {fps:.0} fps"),
            None => base.to_owned(),
        }
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
