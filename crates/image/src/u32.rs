use crate::{Image, PixelFormat};

/// Pack an image into 0RGB `u32` pixels, the layout window buffers expect.
pub fn image_to_u32(image: &Image) -> Vec<u32> {
    let pack = |r: u8, g: u8, b: u8| ((r as u32) << 16) | ((g as u32) << 8) | b as u32;
    match image.format {
        PixelFormat::Rgb8 => image
            .data
            .chunks_exact(3)
            .map(|p| pack(p[0], p[1], p[2]))
            .collect(),
        PixelFormat::Bgr8 => image
            .data
            .chunks_exact(3)
            .map(|p| pack(p[2], p[1], p[0]))
            .collect(),
        PixelFormat::Argb8 => image
            .data
            .chunks_exact(4)
            .map(|p| pack(p[1], p[2], p[3]))
            .collect(),
    }
}
