//! Gauge state and polar-to-cartesian projection.
//!
//! The state holds the raw polar inputs (bearing, distance, vehicle
//! heading) and the configurable radius window. Setters only mutate the
//! raw fields; [`GaugeState::recompute`] derives the full set of
//! normalized-space primitives the renderer needs in a single pass, so
//! a draw never observes a half-updated projection.

use crate::transform::NormPoint;

/// Visual radius of the gauge circle in normalized units.
pub const GAUGE_CIRCLE_RADIUS: f64 = 0.6;

/// Half-width of the horizontal leg of the distance-mark polyline.
const H_LINE_HALF_WIDTH: f64 = 0.4;

/// Height of the distance-label anchor box in normalized units.
const TEXT_HEIGHT: f64 = 0.1;

/// Geometry and strings derived from the current gauge state, replaced
/// wholesale on every [`GaugeState::recompute`].
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// `distance < radius`, strict.
    pub uav_inside: bool,
    /// Vehicle marker position; pinned to the circle's edge when the
    /// vehicle is beyond the configured radius.
    pub uav_pos: NormPoint,
    /// Center, marker, horizontal end point.
    pub distance_mark_line: [NormPoint; 3],
    /// Top-left and bottom-right of the distance-label box, picked on
    /// the side of the vertical axis away from the marker.
    pub distance_text_anchor: [NormPoint; 2],
    /// `"12.34m"` inside the radius window, `">500m"` beyond it.
    pub distance_label: String,
    /// Rotation of the vehicle marker: own heading while inside,
    /// bearing while pinned to the edge.
    pub marker_rotation: f64,
}

#[derive(Debug, Clone)]
pub struct GaugeState {
    direction: f64,
    distance: f64,
    uav_heading: f64,

    radius: f64,
    min_radius: f64,
    max_radius: f64,
    radius_scale_step: f64,

    projection: Projection,
}

impl Default for GaugeState {
    fn default() -> Self {
        Self::new()
    }
}

impl GaugeState {
    pub fn new() -> Self {
        let mut state = Self {
            direction: 0.0,
            distance: 0.0,
            uav_heading: 0.0,
            radius: 500.0,
            min_radius: 50.0,
            max_radius: 2000.0,
            radius_scale_step: 25.0,
            projection: Projection {
                uav_inside: true,
                uav_pos: NormPoint::default(),
                distance_mark_line: [NormPoint::default(); 3],
                distance_text_anchor: [NormPoint::default(); 2],
                distance_label: String::new(),
                marker_rotation: 0.0,
            },
        };
        state.recompute();
        state
    }

    pub fn set_direction(&mut self, d: f64) {
        self.direction = d;
    }

    pub fn direction(&self) -> f64 {
        self.direction
    }

    /// Negative distances are silently ignored.
    pub fn set_distance(&mut self, d: f64) {
        if d < 0.0 {
            return;
        }
        self.distance = d;
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn set_uav_heading(&mut self, d: f64) {
        self.uav_heading = d;
    }

    pub fn uav_heading(&self) -> f64 {
        self.uav_heading
    }

    /// Ignored unless `0 <= min <= max`. Does not re-clamp the current
    /// radius; the next `set_radius` call will.
    pub fn set_radius_range(&mut self, min: f64, max: f64) {
        if min < 0.0 || max < 0.0 || min > max {
            return;
        }
        self.min_radius = min;
        self.max_radius = max;
    }

    pub fn min_radius(&self) -> f64 {
        self.min_radius
    }

    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    pub fn set_radius(&mut self, d: f64) {
        self.radius = d.clamp(self.min_radius, self.max_radius);
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn set_radius_scale_step(&mut self, d: f64) {
        if d < 0.0 {
            return;
        }
        self.radius_scale_step = d;
    }

    pub fn radius_scale_step(&self) -> f64 {
        self.radius_scale_step
    }

    /// Grow or shrink the radius window by whole scale steps, e.g. from
    /// a mouse wheel. The result stays clamped to the radius range.
    pub fn zoom(&mut self, steps: i32) {
        self.set_radius(self.radius + self.radius_scale_step * steps as f64);
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Derive the projection from the raw fields. Runs to completion and
    /// swaps the projection in one assignment; callers sequence this
    /// with drawing so derived state is never read partially stale.
    pub fn recompute(&mut self) {
        let (uav_inside, uav_pos) = self.calc_uav_pos();
        let (distance_mark_line, distance_text_anchor) =
            self.calc_distance_mark_points(uav_inside, uav_pos);
        let distance_label = self.calc_distance_mark_text(uav_inside);
        let marker_rotation = if uav_inside {
            self.uav_heading
        } else {
            self.direction
        };

        self.projection = Projection {
            uav_inside,
            uav_pos,
            distance_mark_line,
            distance_text_anchor,
            distance_label,
            marker_rotation,
        };
    }

    fn calc_uav_pos(&self) -> (bool, NormPoint) {
        // Degenerate radius window. The configured minimum normally
        // keeps radius positive, but a zero minimum makes radius == 0
        // reachable and the ratio below would be NaN.
        if self.radius == 0.0 {
            return (self.distance == 0.0, NormPoint::new(0.0, 0.0));
        }

        let uav_inside = self.distance < self.radius;

        let ratio = self.distance / self.radius;
        let r = GAUGE_CIRCLE_RADIUS * ratio.min(1.0);
        // +pi/2 turns the compass bearing into a trig angle: direction 0
        // points at the gauge's "up" axis.
        let x = r * (self.direction + std::f64::consts::FRAC_PI_2).cos();
        let y = r * (self.direction + std::f64::consts::FRAC_PI_2).sin();

        (uav_inside, NormPoint::new(x, y))
    }

    fn calc_distance_mark_points(
        &self,
        uav_inside: bool,
        uav_pos: NormPoint,
    ) -> ([NormPoint; 3], [NormPoint; 2]) {
        // sign(0) is +1: a marker on the vertical axis gets the label on
        // the right.
        let h_offset = H_LINE_HALF_WIDTH * if uav_pos.x < 0.0 { -1.0 } else { 1.0 };
        let marker = if uav_inside {
            uav_pos
        } else {
            uav_pos.scale(1.2)
        };
        let end = NormPoint::new(marker.x + h_offset, marker.y);

        let line = [NormPoint::new(0.0, 0.0), marker, end];

        // Label box on the side away from the marker so the text never
        // overlaps it.
        let anchor = if uav_pos.x < 0.0 {
            [NormPoint::new(end.x, end.y + TEXT_HEIGHT), marker]
        } else {
            [NormPoint::new(marker.x, marker.y + TEXT_HEIGHT), end]
        };

        (line, anchor)
    }

    fn calc_distance_mark_text(&self, uav_inside: bool) -> String {
        if uav_inside {
            format!("{:.2}m", self.distance)
        } else {
            // "at least this far": out of range, the true distance is
            // not implied
            format!(">{:.0}m", self.radius)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use std::f64::consts::PI;

    #[test]
    fn negative_distance_is_rejected() {
        let mut state = GaugeState::new();
        state.set_distance(120.0);
        state.set_distance(-5.0);
        assert_eq!(state.distance(), 120.0);
    }

    #[test]
    fn invalid_radius_range_is_rejected() {
        let mut state = GaugeState::new();
        state.set_radius_range(-1.0, 100.0);
        state.set_radius_range(100.0, -1.0);
        state.set_radius_range(300.0, 200.0);
        assert_eq!(state.min_radius(), 50.0);
        assert_eq!(state.max_radius(), 2000.0);

        state.set_radius_range(100.0, 1000.0);
        assert_eq!(state.min_radius(), 100.0);
        assert_eq!(state.max_radius(), 1000.0);
    }

    #[rstest]
    #[case(-1e9, 50.0)]
    #[case(0.0, 50.0)]
    #[case(700.0, 700.0)]
    #[case(1e9, 2000.0)]
    fn radius_is_clamped(#[case] input: f64, #[case] expected: f64) {
        let mut state = GaugeState::new();
        state.set_radius(input);
        assert_eq!(state.radius(), expected);
    }

    #[test]
    fn negative_scale_step_is_rejected() {
        let mut state = GaugeState::new();
        state.set_radius_scale_step(-3.0);
        assert_eq!(state.radius_scale_step(), 25.0);
        state.set_radius_scale_step(10.0);
        assert_eq!(state.radius_scale_step(), 10.0);
    }

    #[test]
    fn zoom_steps_by_scale_step() {
        let mut state = GaugeState::new();
        assert_eq!(state.radius(), 500.0);
        state.zoom(1);
        assert_eq!(state.radius(), 525.0);
        state.zoom(-2);
        assert_eq!(state.radius(), 475.0);
        // clamped at the bottom of the range
        state.zoom(-100);
        assert_eq!(state.radius(), 50.0);
    }

    #[test]
    fn vehicle_at_platform_center() {
        let mut state = GaugeState::new();
        state.set_direction(0.0);
        state.set_distance(0.0);
        state.set_radius(500.0);
        state.recompute();

        let p = state.projection();
        assert!(p.uav_inside);
        assert_eq!(p.uav_pos, NormPoint::new(0.0, 0.0));
        assert_eq!(p.distance_label, "0.00m");
    }

    #[test]
    fn direction_zero_points_up() {
        let mut state = GaugeState::new();
        state.set_direction(0.0);
        state.set_distance(250.0);
        state.set_radius(500.0);
        state.recompute();

        let p = state.projection();
        // half the radius window maps to half the gauge circle, straight
        // up
        assert_relative_eq!(p.uav_pos.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.uav_pos.y, 0.3, epsilon = 1e-12);
    }

    #[test]
    fn out_of_range_pins_to_circle_edge() {
        let mut state = GaugeState::new();
        state.set_direction(PI);
        state.set_distance(1000.0);
        state.set_radius(500.0);
        state.recompute();

        let p = state.projection();
        assert!(!p.uav_inside);
        // ratio clamps to 1, direction pi lands at 3pi/2: straight down
        assert_relative_eq!(p.uav_pos.x, 0.6 * (1.5 * PI).cos(), epsilon = 1e-12);
        assert_relative_eq!(p.uav_pos.y, -0.6, epsilon = 1e-12);
        assert_eq!(p.distance_label, ">500m");
        assert_eq!(p.marker_rotation, PI);
    }

    #[test]
    fn boundary_distance_is_outside() {
        let mut state = GaugeState::new();
        state.set_distance(500.0);
        state.set_radius(500.0);
        state.recompute();

        let p = state.projection();
        assert!(!p.uav_inside, "distance == radius is out of range");
        assert_eq!(p.distance_label, ">500m");
    }

    #[test]
    fn inside_marker_uses_heading_rotation() {
        let mut state = GaugeState::new();
        state.set_distance(100.0);
        state.set_uav_heading(0.75);
        state.recompute();
        assert_eq!(state.projection().marker_rotation, 0.75);
    }

    #[test]
    fn distance_mark_line_inside() {
        let mut state = GaugeState::new();
        state.set_direction(PI / 2.0); // west of the platform
        state.set_distance(250.0);
        state.set_radius(500.0);
        state.recompute();

        let p = state.projection();
        let [center, marker, end] = p.distance_mark_line;
        assert_eq!(center, NormPoint::new(0.0, 0.0));
        assert_relative_eq!(marker.x, -0.3, epsilon = 1e-12);
        assert_relative_eq!(marker.y, 0.0, epsilon = 1e-12);
        // marker is inside: no 1.2 push-out, horizontal leg goes left
        assert_relative_eq!(end.x, -0.7, epsilon = 1e-12);
        assert_relative_eq!(end.y, marker.y, epsilon = 1e-12);
    }

    #[test]
    fn distance_mark_marker_pushed_out_when_outside() {
        let mut state = GaugeState::new();
        state.set_direction(0.0);
        state.set_distance(1500.0);
        state.set_radius(500.0);
        state.recompute();

        let p = state.projection();
        let marker = p.distance_mark_line[1];
        assert_relative_eq!(marker.y, 0.6 * 1.2, epsilon = 1e-12);
        // the marker position itself stays on the edge
        assert_relative_eq!(p.uav_pos.y, 0.6, epsilon = 1e-12);
    }

    #[test]
    fn text_anchor_negative_x_branch() {
        let mut state = GaugeState::new();
        state.set_direction(PI / 2.0);
        state.set_distance(250.0);
        state.recompute();

        let p = state.projection();
        assert!(p.uav_pos.x < 0.0);
        let [marker, end] = [p.distance_mark_line[1], p.distance_mark_line[2]];
        assert_eq!(
            p.distance_text_anchor,
            [NormPoint::new(end.x, end.y + 0.1), marker]
        );
    }

    #[test]
    fn text_anchor_positive_x_branch() {
        let mut state = GaugeState::new();
        state.set_direction(-PI / 2.0);
        state.set_distance(250.0);
        state.recompute();

        let p = state.projection();
        assert!(p.uav_pos.x > 0.0);
        let [marker, end] = [p.distance_mark_line[1], p.distance_mark_line[2]];
        assert_eq!(
            p.distance_text_anchor,
            [NormPoint::new(marker.x, marker.y + 0.1), end]
        );
    }

    #[test]
    fn text_anchor_zero_x_takes_positive_branch() {
        // distance 0 puts the marker exactly on the vertical axis
        let mut state = GaugeState::new();
        state.set_direction(0.0);
        state.set_distance(0.0);
        state.recompute();

        let p = state.projection();
        assert_eq!(p.uav_pos, NormPoint::new(0.0, 0.0));
        let end = p.distance_mark_line[2];
        // sign(0) treated as +1: horizontal leg to the right, anchor on
        // the positive branch
        assert_eq!(end, NormPoint::new(0.4, 0.0));
        assert_eq!(p.distance_text_anchor, [NormPoint::new(0.0, 0.1), end]);
    }

    #[test]
    fn zero_radius_does_not_produce_nan() {
        let mut state = GaugeState::new();
        state.set_radius_range(0.0, 2000.0);
        state.set_radius(0.0);
        state.set_distance(10.0);
        state.recompute();

        let p = state.projection();
        assert!(!p.uav_inside);
        assert_eq!(p.uav_pos, NormPoint::new(0.0, 0.0));
        assert!(p.uav_pos.x.is_finite() && p.uav_pos.y.is_finite());

        state.set_distance(0.0);
        state.recompute();
        assert!(state.projection().uav_inside);
    }

    #[test]
    fn label_formatting() {
        let mut state = GaugeState::new();
        state.set_distance(123.456);
        state.set_radius(500.0);
        state.recompute();
        assert_eq!(state.projection().distance_label, "123.46m");

        state.set_distance(600.0);
        state.recompute();
        assert_eq!(state.projection().distance_label, ">500m");
    }
}
