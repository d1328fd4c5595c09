//! Editor and race draw routines

use glam::Vec2;

use super::RenderSurface;
use crate::editor::EditorPreview;
use crate::heading_to_direction;
use crate::sim::{Colour, Race, Track, Vehicle};

/// Car colour when the style lists none
pub const DEFAULT_CAR_COLOUR: Colour = [40, 90, 230];

/// Colours and sizes for everything the core draws
#[derive(Debug, Clone, PartialEq)]
pub struct DrawStyle {
    pub background: Colour,
    pub curve: Colour,
    /// Segment that closes the loop back to the first point
    pub closing_curve: Colour,
    pub curve_width: f32,
    pub point: Colour,
    pub point_radius: f32,
    pub label: Colour,
    pub label_offset: Vec2,
    pub checkpoint: Colour,
    pub checkpoint_width: f32,
    /// One colour per racer, cycled
    pub cars: Vec<Colour>,
    /// Draw gates during races
    pub show_checkpoints: bool,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            background: [8, 132, 28],
            curve: [255, 255, 255],
            closing_curve: [0, 0, 0],
            curve_width: 10.0,
            point: [255, 0, 0],
            point_radius: 15.0,
            label: [255, 255, 255],
            label_offset: Vec2::new(10.0, 10.0),
            checkpoint: [255, 255, 0],
            checkpoint_width: 10.0,
            cars: vec![DEFAULT_CAR_COLOUR, [220, 40, 40], [240, 200, 40], [200, 80, 220]],
            show_checkpoints: true,
        }
    }
}

/// Track under construction: road, curves, control points, gates
pub fn draw_editor(
    surface: &mut dyn RenderSurface,
    track: &Track,
    preview: &EditorPreview,
    style: &DrawStyle,
) {
    surface.clear(style.background);

    for curve in &preview.curves {
        for &point in &curve.points {
            surface.fill_circle(point, track.track_width, track.track_colour);
        }
    }

    let closing = preview.curves.len().checked_sub(2);
    for (index, curve) in preview.curves.iter().enumerate() {
        let colour = if Some(index) == closing {
            style.closing_curve
        } else {
            style.curve
        };
        surface.polyline(&curve.points, style.curve_width, colour);
    }

    for (index, &point) in track.points.iter().enumerate() {
        surface.fill_circle(point, style.point_radius, style.point);
        surface.label(&format!("P{index}"), point + style.label_offset, style.label);
    }

    for (index, gate) in preview.checkpoints.iter().enumerate() {
        surface.line(gate.a, gate.b, style.checkpoint_width, style.checkpoint);
        surface.label(&format!("C{index}"), gate.a + style.label_offset, style.label);
    }
}

/// Corners of a vehicle's body rotated to its heading
pub fn vehicle_corners(vehicle: &Vehicle) -> [Vec2; 4] {
    let forward = heading_to_direction(vehicle.heading);
    let right = Vec2::new(-forward.y, forward.x);
    let half = vehicle.size() * 0.5;
    let f = forward * half.y;
    let r = right * half.x;
    let c = vehicle.center();
    [c + f - r, c + f + r, c - f + r, c - f - r]
}

/// Race view from the race camera
pub fn draw_race(surface: &mut dyn RenderSurface, race: &Race, style: &DrawStyle) {
    let camera = race.camera.offset;
    let track = race.track();

    surface.clear(style.background);
    surface.blit_mask(&track.mask, -camera, false, track.track_colour);

    if style.show_checkpoints {
        for (index, gate) in track.checkpoints.iter().enumerate() {
            let (a, b) = (gate.a - camera, gate.b - camera);
            surface.line(a, b, style.checkpoint_width, style.checkpoint);
            surface.label(&format!("C{index}"), a + style.label_offset, style.label);
        }
    }

    for (index, racer) in race.racers().iter().enumerate() {
        let colour = style
            .cars
            .get(index % style.cars.len().max(1))
            .copied()
            .unwrap_or(DEFAULT_CAR_COLOUR);
        let corners = vehicle_corners(&racer.vehicle).map(|c| c - camera);
        surface.fill_quad(corners, colour);
    }
}
