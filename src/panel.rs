use palette::Srgb;

pub const BLACK: Srgb<u8> = Srgb::new(0, 0, 0);

/// Receives serialized frames, three bytes per pixel, rows top to bottom.
pub trait FrameOutput {
    fn send(&mut self, frame: &[u8]) -> Result<(), String>;
}

pub struct NullOutput;

impl FrameOutput for NullOutput {
    fn send(&mut self, _: &[u8]) -> Result<(), String> {
        Ok(())
    }
}

/// Pixel buffer of a W x H panel, row 0 at the top.
pub struct LedPanel {
    width: usize,
    height: usize,
    pixels: Vec<Srgb<u8>>,
    output: Box<dyn FrameOutput>,
    frame: Vec<u8>,
    frames_presented: u64,
    /// Tick interval in milliseconds, set by the active effect on init
    pub timeout: u32,
    pub dim_all: u8,
}

impl LedPanel {
    pub fn new(width: usize, height: usize, output: Box<dyn FrameOutput>) -> LedPanel {
        LedPanel {
            width,
            height,
            pixels: vec![BLACK; width * height],
            output,
            frame: Vec::with_capacity(width * height * 3),
            frames_presented: 0,
            timeout: 40,
            dim_all: 255,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    #[cfg(test)]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Srgb<u8>> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    pub fn plot_pixel(&mut self, x: usize, y: usize, color: Srgb<u8>, blend: bool) {
        if x >= self.width || y >= self.height {
            log::debug!("Ignoring pixel outside the panel at {},{}", x, y);
            return;
        }

        let pixel = &mut self.pixels[y * self.width + x];
        *pixel = if blend {
            Srgb::new(
                average(pixel.red, color.red),
                average(pixel.green, color.green),
                average(pixel.blue, color.blue),
            )
        } else {
            color
        };
    }

    pub fn fill(&mut self, color: Srgb<u8>) {
        self.pixels.fill(color);
    }

    pub fn clear(&mut self) {
        self.fill(BLACK);
    }

    pub fn present(&mut self) {
        self.frame.clear();
        for pixel in &self.pixels {
            let (r, g, b) = pixel.into_components();
            self.frame.push(dim(r, self.dim_all));
            self.frame.push(dim(g, self.dim_all));
            self.frame.push(dim(b, self.dim_all));
        }

        if let Err(err) = self.output.send(&self.frame) {
            log::warn!("Failed to send frame: {err}");
        }
        self.frames_presented += 1;
    }
}

fn average(a: u8, b: u8) -> u8 {
    ((a as u16 + b as u16) / 2) as u8
}

fn dim(channel: u8, dim_all: u8) -> u8 {
    (channel as u16 * dim_all as u16 / 255) as u8
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Keeps every frame it is handed, shared with the test through the Arc.
    pub(crate) struct RecordingOutput {
        pub frames: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    impl FrameOutput for RecordingOutput {
        fn send(&mut self, frame: &[u8]) -> Result<(), String> {
            self.frames.lock().unwrap().push(frame.to_vec());
            Ok(())
        }
    }

    pub(crate) fn recording_panel(width: usize, height: usize) -> (LedPanel, Arc<Mutex<Vec<Vec<u8>>>>) {
        let frames = Arc::new(Mutex::new(Vec::new()));
        let output = RecordingOutput {
            frames: Arc::clone(&frames),
        };
        (LedPanel::new(width, height, Box::new(output)), frames)
    }

    #[test]
    fn plot_and_read_back() {
        let mut panel = LedPanel::new(4, 3, Box::new(NullOutput));
        let red = Srgb::new(255, 0, 0);
        panel.plot_pixel(3, 2, red, false);

        assert_eq!(panel.pixel(3, 2), Some(red));
        assert_eq!(panel.pixel(0, 0), Some(BLACK));
        assert_eq!(panel.pixel(4, 0), None);
    }

    #[test]
    fn out_of_bounds_pixels_are_ignored() {
        let mut panel = LedPanel::new(2, 2, Box::new(NullOutput));
        panel.plot_pixel(2, 0, Srgb::new(1, 2, 3), false);
        panel.plot_pixel(0, 5, Srgb::new(1, 2, 3), false);

        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(panel.pixel(x, y), Some(BLACK));
            }
        }
    }

    #[test]
    fn blending_averages_channels() {
        let mut panel = LedPanel::new(1, 1, Box::new(NullOutput));
        panel.plot_pixel(0, 0, Srgb::new(200, 100, 0), false);
        panel.plot_pixel(0, 0, Srgb::new(100, 0, 255), true);

        assert_eq!(panel.pixel(0, 0), Some(Srgb::new(150, 50, 127)));
    }

    #[test]
    fn present_serializes_rows_and_dims() {
        let (mut panel, frames) = recording_panel(2, 2);
        panel.plot_pixel(0, 0, Srgb::new(255, 0, 0), false);
        panel.plot_pixel(1, 1, Srgb::new(0, 0, 255), false);
        panel.dim_all = 127;
        panel.present();

        let frames = frames.lock().unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0], vec![127, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 127]);
        assert_eq!(panel.frames_presented(), 1);
    }
}
