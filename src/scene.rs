//! Backend-neutral draw commands in normalized space.
//!
//! The renderer walks an immutable [`Projection`] and records commands
//! into a [`Scene`]; a drawing backend executes them later against a
//! concrete surface. The projection side never touches a drawing
//! capability.

use crate::gauge::{Projection, GAUGE_CIRCLE_RADIUS};
use crate::transform::{Color, NormColor3, NormPoint};

/// Half-length of the N/S and E/W axis lines.
const AXIS_HALF_LEN: f64 = 0.8;

/// Radius of the platform marker circle at the gauge center.
const PLATFORM_RADIUS: f64 = 0.03;

/// Half-extent of the vehicle marker triangles.
const MARKER_EXTENT: f64 = 0.03;

#[derive(Clone, Debug)]
pub enum DrawCommand {
    Clear(NormColor3),
    Point {
        at: NormPoint,
        color: NormColor3,
    },
    Line {
        a: NormPoint,
        b: NormPoint,
        color: NormColor3,
    },
    Polyline {
        points: Vec<NormPoint>,
        color: NormColor3,
    },
    /// Filled simple polygon, vertices in order.
    Polygon {
        points: Vec<NormPoint>,
        color: NormColor3,
    },
    Ellipse {
        center: NormPoint,
        rx: f64,
        ry: f64,
        color: NormColor3,
        filled: bool,
    },
    /// Text centered inside the box spanned by the two corners.
    Label {
        text: String,
        top_left: NormPoint,
        bottom_right: NormPoint,
        color: Color,
    },
}

#[derive(Default)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }
}

/// Gauge color scheme. Defaults follow the ground-station card.
#[derive(Debug, Clone, Copy)]
pub struct GaugePalette {
    pub background: Color,
    pub circle_fill: Color,
    pub lines: Color,
    pub platform: Color,
    pub vehicle: Color,
    pub text: Color,
}

impl Default for GaugePalette {
    fn default() -> Self {
        Self {
            background: Color::new(5, 27, 50),
            circle_fill: Color::new(8, 47, 88),
            lines: Color::new(79, 91, 104),
            platform: Color::new(243, 4, 4),
            vehicle: Color::new(246, 238, 7),
            text: Color::new(255, 255, 255),
        }
    }
}

/// Record the full gauge frame for one projection.
pub fn render_gauge(scene: &mut Scene, projection: &Projection, palette: &GaugePalette) {
    add_background(scene, palette);
    add_axes(scene, palette);
    add_distance_mark(scene, projection, palette);
    add_platform(scene, palette);
    add_vehicle(scene, projection, palette);
}

fn add_background(scene: &mut Scene, palette: &GaugePalette) {
    scene.add_command(DrawCommand::Clear(palette.background.to_normalized()));
    scene.add_command(DrawCommand::Ellipse {
        center: NormPoint::new(0.0, 0.0),
        rx: GAUGE_CIRCLE_RADIUS,
        ry: GAUGE_CIRCLE_RADIUS,
        color: palette.circle_fill.to_normalized(),
        filled: true,
    });
    scene.add_command(DrawCommand::Ellipse {
        center: NormPoint::new(0.0, 0.0),
        rx: GAUGE_CIRCLE_RADIUS,
        ry: GAUGE_CIRCLE_RADIUS,
        color: palette.lines.to_normalized(),
        filled: false,
    });
}

fn add_axes(scene: &mut Scene, palette: &GaugePalette) {
    let color = palette.lines.to_normalized();
    scene.add_command(DrawCommand::Line {
        a: NormPoint::new(-AXIS_HALF_LEN, 0.0),
        b: NormPoint::new(AXIS_HALF_LEN, 0.0),
        color,
    });
    scene.add_command(DrawCommand::Line {
        a: NormPoint::new(0.0, -AXIS_HALF_LEN),
        b: NormPoint::new(0.0, AXIS_HALF_LEN),
        color,
    });
    // north tag at the top of the vertical axis
    scene.add_command(DrawCommand::Label {
        text: "N".to_string(),
        top_left: NormPoint::new(0.0, AXIS_HALF_LEN),
        bottom_right: NormPoint::new(0.1, AXIS_HALF_LEN - 0.2),
        color: palette.text,
    });
}

fn add_distance_mark(scene: &mut Scene, projection: &Projection, palette: &GaugePalette) {
    scene.add_command(DrawCommand::Polyline {
        points: projection.distance_mark_line.to_vec(),
        color: palette.lines.to_normalized(),
    });
    let [top_left, bottom_right] = projection.distance_text_anchor;
    scene.add_command(DrawCommand::Label {
        text: projection.distance_label.clone(),
        top_left,
        bottom_right,
        color: palette.text,
    });
}

fn add_platform(scene: &mut Scene, palette: &GaugePalette) {
    scene.add_command(DrawCommand::Ellipse {
        center: NormPoint::new(0.0, 0.0),
        rx: PLATFORM_RADIUS,
        ry: PLATFORM_RADIUS,
        color: palette.platform.to_normalized(),
        filled: true,
    });
    scene.add_command(DrawCommand::Label {
        text: "H".to_string(),
        top_left: NormPoint::new(-PLATFORM_RADIUS, PLATFORM_RADIUS),
        bottom_right: NormPoint::new(PLATFORM_RADIUS, -PLATFORM_RADIUS),
        color: palette.text,
    });
}

fn add_vehicle(scene: &mut Scene, projection: &Projection, palette: &GaugePalette) {
    // Pointed triangle while tracked inside the radius window, blunt
    // edge wedge while pinned to the circle.
    let f = MARKER_EXTENT;
    let shape: &[NormPoint] = if projection.uav_inside {
        &[
            NormPoint::new(f, -2.0 * f),
            NormPoint::new(-f, -2.0 * f),
            NormPoint::new(0.0, 2.0 * f),
        ]
    } else {
        &[
            NormPoint::new(-f, -f),
            NormPoint::new(f, -f),
            NormPoint::new(0.0, 0.0),
        ]
    };

    let (sin, cos) = projection.marker_rotation.sin_cos();
    let points = shape
        .iter()
        .map(|p| {
            NormPoint::new(
                projection.uav_pos.x + p.x * cos - p.y * sin,
                projection.uav_pos.y + p.x * sin + p.y * cos,
            )
        })
        .collect();

    scene.add_command(DrawCommand::Polygon {
        points,
        color: palette.vehicle.to_normalized(),
    });
}
