//! Eased follow camera

use glam::Vec2;

use crate::consts::CAMERA_SCROLL_SPEED;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World position drawn at the screen's top-left corner
    pub offset: Vec2,
    /// Screen size in pixels
    pub viewport: Vec2,
    /// Fraction of the remaining distance covered per tick
    pub scroll_speed: f32,
}

impl Camera {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            offset: Vec2::ZERO,
            viewport,
            scroll_speed: CAMERA_SCROLL_SPEED,
        }
    }

    /// Jump straight to centring `target`
    pub fn snap_to(&mut self, target: Vec2) {
        self.offset = target - self.viewport * 0.5;
    }

    /// Ease toward centring `target` on screen
    pub fn follow(&mut self, target: Vec2) {
        let wanted = target - self.viewport * 0.5;
        self.offset += (wanted - self.offset) * self.scroll_speed;
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.offset
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_converges_without_overshoot() {
        let mut camera = Camera::new(Vec2::new(800.0, 600.0));
        let target = Vec2::new(1000.0, 1000.0);
        let wanted = Vec2::new(600.0, 700.0);

        let mut last_gap = (wanted - camera.offset).length();
        for _ in 0..200 {
            camera.follow(target);
            let gap = (wanted - camera.offset).length();
            assert!(gap <= last_gap);
            last_gap = gap;
        }
        assert!(last_gap < 1e-3);
        assert!((camera.world_to_screen(target) - Vec2::new(400.0, 300.0)).length() < 1e-2);
    }
}
