/// Browser display size, read once at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// `window.innerWidth`, CSS pixels.
    pub css_width: f64,
    /// `window.innerHeight`, CSS pixels.
    pub css_height: f64,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> Self {
        // Some embedded browsers report 0 before layout.
        let device_pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        Self {
            css_width: css_width.max(1.0),
            css_height: css_height.max(1.0),
            device_pixel_ratio,
        }
    }

    /// Backing-store size of the canvas in physical pixels. Never zero.
    pub fn physical_size(&self) -> (u32, u32) {
        let w = (self.css_width * self.device_pixel_ratio).round().max(1.0);
        let h = (self.css_height * self.device_pixel_ratio).round().max(1.0);
        (w as u32, h as u32)
    }
}
