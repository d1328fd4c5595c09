//! Drawing through an abstract surface
//!
//! The core never owns a window. Draw routines receive a [`RenderSurface`]
//! and issue primitives in screen coordinates (world minus camera offset).

pub mod draw;
pub mod image_surface;

pub use draw::{DrawStyle, draw_editor, draw_race};
pub use image_surface::ImageSurface;

use glam::Vec2;

use crate::sim::{CollisionMask, Colour};

/// Primitive drawing operations the core needs from the platform
pub trait RenderSurface {
    /// Fill the whole surface
    fn clear(&mut self, colour: Colour);

    fn fill_circle(&mut self, center: Vec2, radius: f32, colour: Colour);

    /// Connected line strip with the given stroke width
    fn polyline(&mut self, points: &[Vec2], width: f32, colour: Colour);

    fn line(&mut self, a: Vec2, b: Vec2, width: f32, colour: Colour) {
        self.polyline(&[a, b], width, colour);
    }

    /// Filled convex quad, corners in winding order
    fn fill_quad(&mut self, corners: [Vec2; 4], colour: Colour);

    /// Paint every mask pixel whose bit equals `bit`, mask origin at `origin`
    fn blit_mask(&mut self, mask: &CollisionMask, origin: Vec2, bit: bool, colour: Colour);

    /// Text label with its top-left at `pos`
    fn label(&mut self, text: &str, pos: Vec2, colour: Colour);
}
