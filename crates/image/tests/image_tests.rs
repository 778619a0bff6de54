use base::Vec2;
use image::{Image, ImageError, PixelFormat, image_to_u32};

#[test]
fn test_image_new_rgb8() {
    let size = Vec2::new(2, 3);
    let data: Vec<u8> = (0..18).collect(); // 2*3*3 = 18 bytes
    let image = Image::new(size, data.clone(), PixelFormat::Rgb8);

    assert_eq!(image.size, size);
    assert_eq!(image.data, data);
    assert_eq!(image.width(), 2);
    assert_eq!(image.height(), 3);
    assert!(matches!(image.format, PixelFormat::Rgb8));
}

#[test]
fn test_try_new_rejects_short_buffer() {
    let result = Image::try_new(Vec2::new(2, 2), vec![0; 11], PixelFormat::Rgb8);
    assert!(matches!(result, Err(ImageError::Format(_))));
}

#[test]
fn test_bgr_into_rgb() {
    let image = Image::new(Vec2::new(2, 1), vec![1, 2, 3, 4, 5, 6], PixelFormat::Bgr8);
    let rgb = image.into_rgb();
    assert_eq!(rgb.format, PixelFormat::Rgb8);
    assert_eq!(rgb.data, vec![3, 2, 1, 6, 5, 4]);
    assert_eq!(rgb.rgb(1, 0), [6, 5, 4]);
}

#[test]
fn test_argb_into_rgb_drops_alpha() {
    let image = Image::new(Vec2::new(1, 1), vec![255, 10, 20, 30], PixelFormat::Argb8);
    assert_eq!(image.into_rgb().data, vec![10, 20, 30]);
}

#[test]
fn test_ensure_format() {
    assert!(PixelFormat::Rgb8.ensure_format(PixelFormat::Rgb8).is_ok());
    assert!(matches!(
        PixelFormat::Bgr8.ensure_format(PixelFormat::Rgb8),
        Err(ImageError::Format(_))
    ));
}

#[test]
fn test_image_to_u32() {
    let image = Image::new(Vec2::new(1, 1), vec![0x12, 0x34, 0x56], PixelFormat::Rgb8);
    assert_eq!(image_to_u32(&image), vec![0x0012_3456]);

    let image = Image::new(Vec2::new(1, 1), vec![0x56, 0x34, 0x12], PixelFormat::Bgr8);
    assert_eq!(image_to_u32(&image), vec![0x0012_3456]);
}
