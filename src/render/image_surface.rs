//! Software surface backed by an RGBA image, used for track previews

use glam::Vec2;
use image::{Rgba, RgbaImage};

use super::RenderSurface;
use crate::sim::{CollisionMask, Colour};

/// Draws into an [`RgbaImage`]; `scale` maps surface units to pixels
pub struct ImageSurface {
    pub image: RgbaImage,
    pub scale: f32,
}

impl ImageSurface {
    pub fn new(width: u32, height: u32, scale: f32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            scale,
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    fn put(&mut self, x: i64, y: i64, colour: Colour) {
        if x < 0 || y < 0 || x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return;
        }
        self.image
            .put_pixel(x as u32, y as u32, Rgba([colour[0], colour[1], colour[2], 255]));
    }

    /// Pixel bounds covering `min..max` in surface units, clipped to the image
    fn pixel_bounds(&self, min: Vec2, max: Vec2) -> (i64, i64, i64, i64) {
        let min = (min * self.scale).floor();
        let max = (max * self.scale).ceil();
        (
            (min.x as i64).max(0),
            (min.y as i64).max(0),
            (max.x as i64).min(self.image.width() as i64 - 1),
            (max.y as i64).min(self.image.height() as i64 - 1),
        )
    }

    fn pixel_centre(&self, x: i64, y: i64) -> Vec2 {
        Vec2::new(x as f32 + 0.5, y as f32 + 0.5) / self.scale
    }
}

impl RenderSurface for ImageSurface {
    fn clear(&mut self, colour: Colour) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([colour[0], colour[1], colour[2], 255]);
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, colour: Colour) {
        let reach = Vec2::splat(radius);
        let (x0, y0, x1, y1) = self.pixel_bounds(center - reach, center + reach);
        let r_sq = radius * radius;
        for y in y0..=y1 {
            for x in x0..=x1 {
                if self.pixel_centre(x, y).distance_squared(center) <= r_sq {
                    self.put(x, y, colour);
                }
            }
        }
    }

    fn polyline(&mut self, points: &[Vec2], width: f32, colour: Colour) {
        let radius = (width * 0.5).max(0.5 / self.scale);
        // Stamp round brushes at one-pixel steps along each span
        let step = 1.0 / self.scale;
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let steps = (a.distance(b) / step).ceil().max(1.0) as usize;
            for i in 0..=steps {
                let p = a.lerp(b, i as f32 / steps as f32);
                self.fill_circle(p, radius, colour);
            }
        }
    }

    fn fill_quad(&mut self, corners: [Vec2; 4], colour: Colour) {
        let min = corners.iter().copied().fold(Vec2::splat(f32::MAX), Vec2::min);
        let max = corners.iter().copied().fold(Vec2::splat(f32::MIN), Vec2::max);
        let (x0, y0, x1, y1) = self.pixel_bounds(min, max);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = self.pixel_centre(x, y);
                let mut sign = 0.0f32;
                let inside = (0..4).all(|i| {
                    let a = corners[i];
                    let b = corners[(i + 1) % 4];
                    let cross = (b - a).perp_dot(p - a);
                    if cross == 0.0 {
                        return true;
                    }
                    if sign == 0.0 {
                        sign = cross.signum();
                    }
                    cross.signum() == sign
                });
                if inside {
                    self.put(x, y, colour);
                }
            }
        }
    }

    fn blit_mask(&mut self, mask: &CollisionMask, origin: Vec2, bit: bool, colour: Colour) {
        let (x0, y0, x1, y1) = self.pixel_bounds(origin, origin + mask.size().as_vec2());
        for y in y0..=y1 {
            for x in x0..=x1 {
                let local = (self.pixel_centre(x, y) - origin).floor().as_ivec2();
                if local.x < 0
                    || local.y < 0
                    || local.x >= mask.width() as i32
                    || local.y >= mask.height() as i32
                {
                    continue;
                }
                if mask.get(local.x, local.y) == bit {
                    self.put(x, y, colour);
                }
            }
        }
    }

    fn label(&mut self, text: &str, pos: Vec2, _colour: Colour) {
        // No font rasterizer; labels only show up in the log
        log::trace!("label {text:?} at {pos}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::UVec2;

    fn rgb(surface: &ImageSurface, x: u32, y: u32) -> [u8; 3] {
        let p = surface.image.get_pixel(x, y).0;
        [p[0], p[1], p[2]]
    }

    #[test]
    fn test_circle_and_clear() {
        let mut surface = ImageSurface::new(20, 20, 1.0);
        surface.clear([0, 0, 0]);
        surface.fill_circle(Vec2::new(10.0, 10.0), 4.0, [255, 0, 0]);
        assert_eq!(rgb(&surface, 10, 10), [255, 0, 0]);
        assert_eq!(rgb(&surface, 0, 0), [0, 0, 0]);
        assert_eq!(rgb(&surface, 16, 10), [0, 0, 0]);
    }

    #[test]
    fn test_scaled_polyline() {
        let mut surface = ImageSurface::new(50, 50, 0.1);
        surface.polyline(&[Vec2::new(0.0, 250.0), Vec2::new(500.0, 250.0)], 20.0, [9, 9, 9]);
        assert_eq!(rgb(&surface, 25, 25), [9, 9, 9]);
        assert_eq!(rgb(&surface, 25, 10)[0], 0);
    }

    #[test]
    fn test_rotated_quad() {
        let mut surface = ImageSurface::new(20, 20, 1.0);
        let diamond = [
            Vec2::new(10.0, 2.0),
            Vec2::new(18.0, 10.0),
            Vec2::new(10.0, 18.0),
            Vec2::new(2.0, 10.0),
        ];
        surface.fill_quad(diamond, [1, 2, 3]);
        assert_eq!(rgb(&surface, 10, 10), [1, 2, 3]);
        assert_eq!(rgb(&surface, 2, 2), [0, 0, 0]);
    }

    #[test]
    fn test_blit_clear_bits() {
        let mut mask = CollisionMask::new(UVec2::new(4, 4));
        mask.set(0, 0, true);
        let mut surface = ImageSurface::new(8, 8, 1.0);
        surface.blit_mask(&mask, Vec2::new(2.0, 2.0), false, [7, 7, 7]);
        assert_eq!(rgb(&surface, 2, 2), [0, 0, 0]);
        assert_eq!(rgb(&surface, 3, 2), [7, 7, 7]);
        assert_eq!(rgb(&surface, 6, 6), [0, 0, 0]);
    }
}
