/// Device and surface creation parameters.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB surface format when the surface offers one.
    pub prefer_srgb: bool,

    pub present_mode: wgpu::PresentMode,

    pub power_preference: wgpu::PowerPreference,

    /// Hint only; support depends on the backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            power_preference: wgpu::PowerPreference::HighPerformance,
            desired_maximum_frame_latency: 2,
        }
    }
}

impl GpuInit {
    /// `Fifo` when `vsync`, otherwise the lowest-latency mode available.
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.present_mode = if vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        self
    }
}
