use {
    crate::{ImageError, PixelFormat},
    base::Vec2,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub size: Vec2<usize>,
    pub data: Vec<u8>,
    pub format: PixelFormat,
}

impl Image {
    pub fn new(size: Vec2<usize>, data: Vec<u8>, format: PixelFormat) -> Self {
        Self { size, data, format }
    }

    /// Build an image, checking the buffer length against size and format.
    pub fn try_new(
        size: Vec2<usize>,
        data: Vec<u8>,
        format: PixelFormat,
    ) -> Result<Self, ImageError> {
        let expected = size.x * size.y * format.bytes_per_pixel();
        if data.len() != expected {
            return Err(ImageError::Format(format!(
                "{}x{} {:?} needs {} bytes, got {}",
                size.x,
                size.y,
                format,
                expected,
                data.len()
            )));
        }
        Ok(Self { size, data, format })
    }

    pub fn width(&self) -> usize {
        self.size.x
    }

    pub fn height(&self) -> usize {
        self.size.y
    }

    /// Convert to interleaved RGB, swapping channels or dropping alpha as needed.
    pub fn into_rgb(self) -> Image {
        let data = match self.format {
            PixelFormat::Rgb8 => self.data,
            PixelFormat::Bgr8 => self
                .data
                .chunks_exact(3)
                .flat_map(|p| [p[2], p[1], p[0]])
                .collect(),
            PixelFormat::Argb8 => self
                .data
                .chunks_exact(4)
                .flat_map(|p| [p[1], p[2], p[3]])
                .collect(),
        };
        Image::new(self.size, data, PixelFormat::Rgb8)
    }

    /// RGB triple at (x, y). Only valid for `Rgb8` images.
    pub fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.size.x + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}
