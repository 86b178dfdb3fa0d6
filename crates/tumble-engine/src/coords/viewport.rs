use super::Point;

/// Viewport configuration delivered by the host with every draw/touch/config
/// callback.
///
/// Width and height are in logical pixels; the aspect ratio used for the
/// projection is derived from them.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
}

impl ViewportConfig {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Width over height. Degenerate viewports (minimized windows) report 1.0.
    #[inline]
    pub fn aspect(self) -> f32 {
        if self.is_valid() {
            self.width / self.height
        } else {
            1.0
        }
    }

    #[inline]
    pub fn center(self) -> Point {
        Point::new(self.width, self.height) / 2.0
    }
}
