use image::{ImageBuffer, Rgb, RgbImage};

use crate::biome::ColorField;
use crate::heightfield::HeightField;

/// Render a normalized height field as a grayscale color grid of the
/// given texture dimensions, index-mapped like the classifier.
pub fn grayscale_field(field: &HeightField, width: usize, height: usize) -> ColorField {
    ColorField::from_fn(width, height, |x, y| {
        let val = field.mapped(x, y, width, height);
        let gray = (val.clamp(0.0, 1.0) * 255.0).round() as u8;
        [gray, gray, gray]
    })
}

/// Convert a color grid into an `image` buffer.
pub fn render_image(colors: &ColorField) -> RgbImage {
    let mut img: RgbImage = ImageBuffer::new(colors.width() as u32, colors.height() as u32);
    for (x, y, rgb) in colors.iter() {
        img.put_pixel(x as u32, y as u32, Rgb(*rgb));
    }
    img
}

/// Save a color grid as a PNG (or any format `image` infers from the
/// path extension).
pub fn export_color_field(colors: &ColorField, path: &str) -> Result<(), image::ImageError> {
    render_image(colors).save(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grayscale_levels() {
        let field =
            HeightField::from_fn(1, |x, y| if x == 0 && y == 0 { 1.0 } else { 0.5 }).unwrap();
        let size = field.size();
        let gray = grayscale_field(&field, size, size);
        assert_eq!(*gray.get(0, 0), [255, 255, 255]);
        assert_eq!(*gray.get(1, 1), [128, 128, 128]);
    }

    #[test]
    fn test_render_image_dimensions_and_pixels() {
        let mut colors = ColorField::new_with(3, 2, [0u8; 3]);
        colors.set(2, 1, [10, 20, 30]);
        let img = render_image(&colors);
        assert_eq!(img.width(), 3);
        assert_eq!(img.height(), 2);
        assert_eq!(img.get_pixel(2, 1).0, [10, 20, 30]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);
    }
}
