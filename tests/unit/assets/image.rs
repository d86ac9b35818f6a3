use std::io::Cursor;

use super::*;

fn png(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_dimensions_and_premul() {
    let prepared = decode_image(&png(3, 2, [100, 50, 200, 128])).unwrap();
    assert_eq!((prepared.width, prepared.height), (3, 2));
    assert_eq!(prepared.rgba8_premul.len(), 3 * 2 * 4);
    assert_eq!(
        &prepared.rgba8_premul[..4],
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_rejects_garbage() {
    let err = decode_image(b"not an image").unwrap_err();
    assert!(err.to_string().contains("decode image"));
}

#[test]
fn transparent_pixels_zero_color() {
    let mut px = vec![255, 255, 255, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![0, 0, 0, 0]);
}

#[test]
fn solid_fills_every_pixel() {
    let img = PreparedImage::solid(2, 2, [1, 2, 3]);
    assert!(img.rgba8_premul.chunks_exact(4).all(|p| p == [1, 2, 3, 255]));
}
