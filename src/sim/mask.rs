//! Binary per-pixel occupancy masks
//!
//! A set bit means "this pixel blocks movement" for track masks, and "this
//! pixel is part of the body" for footprint masks. Overlap between the two is
//! a collision.

use bitvec::prelude::*;
use glam::{IVec2, UVec2, Vec2};
use image::{RgbaImage, imageops};

use super::spline::CurveSegment;

/// Alpha above which a source pixel counts as opaque
pub const ALPHA_THRESHOLD: u8 = 127;

/// What the opaque pixels of a raster source mean
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfacePolarity {
    /// Opaque pixels are road; everything else blocks
    OpaqueDrivable,
    /// Opaque pixels are walls; transparent pixels are road
    OpaqueBlocking,
}

/// Fixed-size bitmap, one bit per pixel, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionMask {
    size: UVec2,
    bits: BitVec,
    /// Whether pixels past the edges read as set
    outside_blocks: bool,
}

impl CollisionMask {
    /// Mask with every bit clear
    pub fn new(size: UVec2) -> Self {
        let n = (size.x as usize) * (size.y as usize);
        Self {
            size,
            bits: bitvec![0; n],
            outside_blocks: false,
        }
    }

    /// Zero-sized mask; never overlaps anything
    pub fn empty() -> Self {
        Self::new(UVec2::ZERO)
    }

    /// Mask with every bit set (a solid rectangular footprint)
    pub fn filled(size: UVec2) -> Self {
        let n = (size.x as usize) * (size.y as usize);
        Self {
            size,
            bits: bitvec![1; n],
            outside_blocks: false,
        }
    }

    /// Set bits wherever the image alpha is above [`ALPHA_THRESHOLD`]
    pub fn from_alpha(image: &RgbaImage) -> Self {
        let (w, h) = image.dimensions();
        let mut mask = Self::new(UVec2::new(w, h));
        for (x, y, pixel) in image.enumerate_pixels() {
            if pixel.0[3] > ALPHA_THRESHOLD {
                mask.set(x as i32, y as i32, true);
            }
        }
        mask
    }

    /// Blocking mask for an imported raster track.
    ///
    /// The image is scaled by `scale` (nearest neighbour) before sampling.
    pub fn from_raster(image: &RgbaImage, scale: u32, polarity: SurfacePolarity) -> Self {
        let scale = scale.max(1);
        let mut mask = if scale == 1 {
            Self::from_alpha(image)
        } else {
            let (w, h) = image.dimensions();
            let scaled =
                imageops::resize(image, w * scale, h * scale, imageops::FilterType::Nearest);
            Self::from_alpha(&scaled)
        };
        if polarity == SurfacePolarity::OpaqueDrivable {
            mask.invert();
        }
        log::debug!(
            "Raster mask {}x{} ({:?}), {} blocking pixels",
            mask.size.x,
            mask.size.y,
            polarity,
            mask.count()
        );
        mask
    }

    /// Blocking mask for a vector-built track.
    ///
    /// Paints a circle of radius `track_width` at every curve sample; the
    /// painted union is road and everything else blocks, including everything
    /// past the raster edges. No curves yields an empty mask.
    pub fn build(curves: &[CurveSegment], track_width: f32, size: UVec2) -> Self {
        if curves.iter().all(CurveSegment::is_empty) {
            return Self::empty();
        }
        let mut mask = Self::new(size);
        for curve in curves {
            for &point in &curve.points {
                mask.fill_circle(point, track_width);
            }
        }
        mask.invert();
        log::debug!(
            "Track mask {}x{}: {} of {} pixels blocking",
            size.x,
            size.y,
            mask.count(),
            mask.bits.len()
        );
        mask
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.x
    }

    pub fn height(&self) -> u32 {
        self.size.y
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn outside_blocks(&self) -> bool {
        self.outside_blocks
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.size.x && (y as u32) < self.size.y
    }

    #[inline]
    fn idx(&self, x: i32, y: i32) -> usize {
        x as usize + y as usize * self.size.x as usize
    }

    /// Bit at (x, y); out of bounds reads as [`Self::outside_blocks`]
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if self.in_bounds(x, y) {
            self.bits[self.idx(x, y)]
        } else {
            self.outside_blocks
        }
    }

    /// Set bit at (x, y); out of bounds writes are dropped
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: bool) {
        if self.in_bounds(x, y) {
            let i = self.idx(x, y);
            self.bits.set(i, value);
        }
    }

    /// Number of set bits
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Flip every bit, the area past the edges included
    pub fn invert(&mut self) {
        self.bits = !std::mem::take(&mut self.bits);
        self.outside_blocks = !self.outside_blocks;
    }

    /// Set every pixel within `radius` of `center`, clipped to the mask
    pub fn fill_circle(&mut self, center: Vec2, radius: f32) {
        if radius < 0.0 || self.is_empty() {
            return;
        }
        let max_x = self.size.x as i32 - 1;
        let max_y = self.size.y as i32 - 1;
        let y0 = ((center.y - radius).ceil() as i32).max(0);
        let y1 = ((center.y + radius).floor() as i32).min(max_y);
        let r_sq = radius * radius;

        for y in y0..=y1 {
            let dy = y as f32 - center.y;
            let half = (r_sq - dy * dy).max(0.0).sqrt();
            let x0 = ((center.x - half).ceil() as i32).max(0);
            let x1 = ((center.x + half).floor() as i32).min(max_x);
            if x0 > x1 {
                continue;
            }
            let start = self.idx(x0, y);
            let end = self.idx(x1, y) + 1;
            self.bits[start..end].fill(true);
        }
    }

    /// Pixels (in `self` coordinates) where `other`, placed with its origin
    /// at `offset`, has a set bit that is also set in `self`, row-major
    fn shared_bits<'a>(
        &'a self,
        other: &'a CollisionMask,
        offset: IVec2,
    ) -> impl Iterator<Item = IVec2> + 'a {
        let width = other.size.x.max(1) as usize;
        other
            .bits
            .iter_ones()
            .map(move |i| IVec2::new((i % width) as i32, (i / width) as i32) + offset)
            .filter(move |p| self.get(p.x, p.y))
    }

    /// First pixel (in `self` coordinates) where `other`, placed with its
    /// origin at `offset`, shares a set bit with `self`
    pub fn overlap(&self, other: &CollisionMask, offset: IVec2) -> Option<IVec2> {
        if self.is_empty() && !self.outside_blocks {
            return None;
        }
        self.shared_bits(other, offset).next()
    }

    /// Number of pixels where `other` at `offset` shares a set bit with `self`
    pub fn overlap_area(&self, other: &CollisionMask, offset: IVec2) -> usize {
        if self.is_empty() && !self.outside_blocks {
            return 0;
        }
        self.shared_bits(other, offset).count()
    }

    /// Whether the pixel under `pos` blocks movement
    pub fn is_blocked(&self, pos: Vec2) -> bool {
        self.get(pos.x.floor() as i32, pos.y.floor() as i32)
    }

    /// Whether the pixel under `pos` is inside the mask and clear
    pub fn is_drivable(&self, pos: Vec2) -> bool {
        let (x, y) = (pos.x.floor() as i32, pos.y.floor() as i32);
        self.in_bounds(x, y) && !self.get(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spline::{SampleDensity, build_curves};
    use crate::tuning::TrackTuning;
    use image::Rgba;

    fn square_curves(density: &SampleDensity) -> Vec<CurveSegment> {
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1000.0, 0.0),
            Vec2::new(1000.0, 1000.0),
            Vec2::new(0.0, 1000.0),
        ];
        build_curves(&points, density)
    }

    #[test]
    fn test_square_track_polarity() {
        let density = SampleDensity::collision(&TrackTuning::default());
        let curves = square_curves(&density);
        let mask = CollisionMask::build(&curves, 250.0, UVec2::new(1400, 1400));

        assert!(mask.is_drivable(Vec2::new(500.0, 0.0)));
        assert!(!mask.is_drivable(Vec2::new(500.0, 600.0)));
        assert!(mask.is_blocked(Vec2::new(500.0, 600.0)));
    }

    #[test]
    fn test_footprint_overlap_on_and_off_track() {
        let density = SampleDensity::collision(&TrackTuning::default());
        let curves = square_curves(&density);
        let mut road = CollisionMask::build(&curves, 250.0, UVec2::new(1400, 1400));
        // Drivable polarity: set bits are road
        road.invert();

        let footprint = CollisionMask::filled(UVec2::new(20, 30));
        let centred_on = |p: Vec2| IVec2::new(p.x as i32 - 10, p.y as i32 - 15);

        let on_line = curves[1].points[10];
        assert!(road.overlap(&footprint, centred_on(on_line)).is_some());
        assert!(road.overlap(&footprint, centred_on(Vec2::new(500.0, 600.0))).is_none());
    }

    #[test]
    fn test_built_mask_blocks_past_edges() {
        let density = SampleDensity::collision(&TrackTuning::default());
        let curves = square_curves(&density);
        let mask = CollisionMask::build(&curves, 250.0, UVec2::new(1400, 1400));
        assert!(mask.outside_blocks());
        assert!(mask.is_blocked(Vec2::new(500.0, -10.0)));
        assert!(!mask.is_drivable(Vec2::new(500.0, -10.0)));

        // Road at x=500 runs right up to the top edge
        let body = CollisionMask::filled(UVec2::new(20, 30));
        assert!(mask.overlap(&body, IVec2::new(490, 10)).is_none());
        let hit = mask.overlap(&body, IVec2::new(490, -5));
        assert!(hit.is_some_and(|p| p.y < 0));
        assert_eq!(mask.overlap_area(&body, IVec2::new(490, -5)), 20 * 5);

        // Inverted, the outside reads as clear again
        let mut road = mask.clone();
        road.invert();
        assert!(!road.outside_blocks());
        assert!(!road.get(-1, -1));
    }

    #[test]
    fn test_empty_curves_give_empty_mask() {
        let mask = CollisionMask::build(&[], 250.0, UVec2::new(100, 100));
        assert!(mask.is_empty());
        let footprint = CollisionMask::filled(UVec2::new(4, 4));
        assert!(mask.overlap(&footprint, IVec2::ZERO).is_none());
    }

    #[test]
    fn test_overlap_offsets_and_area() {
        let mut wall = CollisionMask::new(UVec2::new(10, 10));
        wall.set(5, 5, true);
        wall.set(6, 5, true);
        let body = CollisionMask::filled(UVec2::new(2, 2));

        assert_eq!(wall.overlap(&body, IVec2::new(4, 4)), Some(IVec2::new(5, 5)));
        assert_eq!(wall.overlap_area(&body, IVec2::new(5, 4)), 2);
        assert_eq!(wall.overlap_area(&body, IVec2::new(4, 4)), 1);
        assert!(wall.overlap(&body, IVec2::new(0, 0)).is_none());
        // Partially outside the mask
        assert!(wall.overlap(&body, IVec2::new(-1, -1)).is_none());
        assert!(wall.overlap(&body, IVec2::new(20, 20)).is_none());
    }

    #[test]
    fn test_fill_circle_clips_at_edges() {
        let mut mask = CollisionMask::new(UVec2::new(10, 10));
        mask.fill_circle(Vec2::new(0.0, 0.0), 3.0);
        assert!(mask.get(0, 0));
        assert!(mask.get(3, 0));
        assert!(mask.get(2, 2));
        assert!(!mask.get(3, 3));
        assert!(!mask.get(-1, 0));
    }

    #[test]
    fn test_raster_polarity() {
        let mut image = RgbaImage::new(4, 2);
        image.put_pixel(0, 0, Rgba([0, 0, 0, 255]));

        let opaque_road = CollisionMask::from_raster(&image, 1, SurfacePolarity::OpaqueDrivable);
        assert!(!opaque_road.get(0, 0));
        assert!(opaque_road.get(1, 0));

        let opaque_walls = CollisionMask::from_raster(&image, 2, SurfacePolarity::OpaqueBlocking);
        assert_eq!(opaque_walls.size(), UVec2::new(8, 4));
        assert!(opaque_walls.get(1, 1));
        assert!(!opaque_walls.get(2, 0));
        assert_eq!(opaque_walls.count(), 4);
    }
}
