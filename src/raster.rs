//! Software rasterizer for [`DrawCommand`]s.
//!
//! Executes a recorded scene against an RGBA frame buffer (the `pixels`
//! frame), converting normalized-space geometry to pixels through the
//! transform layer and a [`Viewport`]. Labels go through `rusttype`.

use crate::scene::{DrawCommand, Scene};
use crate::transform::{Color, NormColor3, NormPoint, PixelPoint, Viewport};
use rusttype::{point, Font, PositionedGlyph, Scale};

/// Segments used to approximate ellipse outlines.
const ELLIPSE_SEGMENTS: usize = 360;

const LINE_THICKNESS: f32 = 1.5;

pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    fn clear(&mut self, color: (u8, u8, u8)) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.0, color.1, color.2, 0xff]);
        }
    }
}

/// Frame-buffer drawing backend: owns the canvas for one frame plus the
/// viewport used to project normalized coordinates.
pub struct RasterBackend<'a, 'f> {
    canvas: Canvas<'a>,
    viewport: Viewport,
    font: &'f Font<'f>,
    font_size: f32,
}

impl<'a, 'f> RasterBackend<'a, 'f> {
    pub fn new(canvas: Canvas<'a>, viewport: Viewport, font: &'f Font<'f>, font_size: f32) -> Self {
        Self {
            canvas,
            viewport,
            font,
            font_size,
        }
    }

    pub fn execute(&mut self, scene: &Scene) {
        for command in scene.commands() {
            match command {
                DrawCommand::Clear(color) => {
                    self.canvas.clear(color.to_color().as_tuple());
                }
                DrawCommand::Point { at, color } => {
                    let p = at.to_viewport(self.viewport);
                    let (r, g, b) = color.to_color().as_tuple();
                    set_pixel(
                        &mut self.canvas,
                        p.x.round() as i32,
                        p.y.round() as i32,
                        r,
                        g,
                        b,
                        1.0,
                    );
                }
                DrawCommand::Line { a, b, color } => {
                    self.line(*a, *b, *color);
                }
                DrawCommand::Polyline { points, color } => {
                    for pair in points.windows(2) {
                        self.line(pair[0], pair[1], *color);
                    }
                }
                DrawCommand::Polygon { points, color } => {
                    let pixels: Vec<PixelPoint> =
                        points.iter().map(|p| p.to_viewport(self.viewport)).collect();
                    fill_polygon(&mut self.canvas, &pixels, color.to_color().as_tuple());
                }
                DrawCommand::Ellipse {
                    center,
                    rx,
                    ry,
                    color,
                    filled,
                } => {
                    if *filled {
                        self.fill_ellipse(*center, *rx, *ry, *color);
                    } else {
                        self.ellipse_outline(*center, *rx, *ry, *color);
                    }
                }
                DrawCommand::Label {
                    text,
                    top_left,
                    bottom_right,
                    color,
                } => {
                    self.label(text, *top_left, *bottom_right, *color);
                }
            }
        }
    }

    fn line(&mut self, a: NormPoint, b: NormPoint, color: NormColor3) {
        let pa = a.to_viewport(self.viewport);
        let pb = b.to_viewport(self.viewport);
        let (cr, cg, cb) = color.to_color().as_tuple();
        draw_thick_line_aa(
            &mut self.canvas,
            pa.x.round() as i32,
            pa.y.round() as i32,
            pb.x.round() as i32,
            pb.y.round() as i32,
            LINE_THICKNESS,
            cr,
            cg,
            cb,
        );
    }

    fn fill_ellipse(&mut self, center: NormPoint, rx: f64, ry: f64, color: NormColor3) {
        let c = center.to_viewport(self.viewport);
        let prx = rx * self.viewport.width as f64 / 2.0;
        let pry = ry * self.viewport.height as f64 / 2.0;
        if prx <= 0.0 || pry <= 0.0 {
            return;
        }
        let (r, g, b) = color.to_color().as_tuple();
        let edge_scale = prx.min(pry);

        let min_x = (c.x - prx).floor() as i32 - 1;
        let max_x = (c.x + prx).ceil() as i32 + 1;
        let min_y = (c.y - pry).floor() as i32 - 1;
        let max_y = (c.y + pry).ceil() as i32 + 1;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dx = (x as f64 - c.x) / prx;
                let dy = (y as f64 - c.y) / pry;
                // radial distance in units of the ellipse radius, scaled
                // back to pixels for a ~1px soft edge
                let t = (dx * dx + dy * dy).sqrt();
                let aa = (1.0 - (t - 1.0) * edge_scale).clamp(0.0, 1.0);
                if aa > 0.01 {
                    set_pixel(&mut self.canvas, x, y, r, g, b, aa as f32);
                }
            }
        }
    }

    fn ellipse_outline(&mut self, center: NormPoint, rx: f64, ry: f64, color: NormColor3) {
        let step = 2.0 * std::f64::consts::PI / ELLIPSE_SEGMENTS as f64;
        let mut prev = NormPoint::new(center.x + rx, center.y);
        for i in 1..=ELLIPSE_SEGMENTS {
            let angle = step * i as f64;
            let next = NormPoint::new(center.x + rx * angle.cos(), center.y + ry * angle.sin());
            self.line(prev, next, color);
            prev = next;
        }
    }

    fn label(&mut self, text: &str, top_left: NormPoint, bottom_right: NormPoint, color: Color) {
        let a = top_left.to_viewport(self.viewport);
        let b = bottom_right.to_viewport(self.viewport);
        let cx = ((a.x + b.x) / 2.0).round() as i32;
        let cy = ((a.y + b.y) / 2.0).round() as i32;
        draw_text(
            &mut self.canvas,
            cx,
            cy,
            text,
            self.font,
            Scale::uniform(self.font_size),
            color.as_tuple(),
        );
    }
}

fn set_pixel(canvas: &mut Canvas, x: i32, y: i32, r: u8, g: u8, b: u8, alpha: f32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    // bound rows by the actual frame length, not the claimed height: a
    // failed or lagging buffer resize must not index past the frame
    if x >= canvas.width || y >= canvas.height || y >= canvas.frame.len() / (canvas.width * 4) {
        return;
    }
    let idx = (y * canvas.width + x) * 4;
    let src = [r as f32, g as f32, b as f32, 255.0 * alpha];
    let dst = [
        canvas.frame[idx] as f32,
        canvas.frame[idx + 1] as f32,
        canvas.frame[idx + 2] as f32,
        canvas.frame[idx + 3] as f32,
    ];
    let a = src[3] / 255.0;
    let out = [
        (src[0] * a + dst[0] * (1.0 - a)).round() as u8,
        (src[1] * a + dst[1] * (1.0 - a)).round() as u8,
        (src[2] * a + dst[2] * (1.0 - a)).round() as u8,
        0xff,
    ];
    canvas.frame[idx..idx + 4].copy_from_slice(&out);
}

fn draw_thick_line_aa(
    canvas: &mut Canvas,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    thickness: f32,
    r: u8,
    g: u8,
    b: u8,
) {
    let min_x = x0.min(x1) - thickness.ceil() as i32 - 1;
    let max_x = x0.max(x1) + thickness.ceil() as i32 + 1;
    let min_y = y0.min(y1) - thickness.ceil() as i32 - 1;
    let max_y = y0.max(y1) + thickness.ceil() as i32 + 1;
    let dx = (x1 - x0) as f32;
    let dy = (y1 - y0) as f32;
    let len_sq = (dx * dx + dy * dy).max(1.0);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = x as f32 - x0 as f32;
            let py = y as f32 - y0 as f32;
            let t = ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0);
            let lx = x0 as f32 + t * dx;
            let ly = y0 as f32 + t * dy;
            let dist = ((lx - x as f32).powi(2) + (ly - y as f32).powi(2)).sqrt();
            let aa = (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
            if aa > 0.01 {
                set_pixel(canvas, x, y, r, g, b, aa);
            }
        }
    }
}

/// Even-odd scanline fill of a simple polygon.
fn fill_polygon(canvas: &mut Canvas, points: &[PixelPoint], color: (u8, u8, u8)) {
    if points.len() < 3 {
        return;
    }
    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = points
        .iter()
        .map(|p| p.y)
        .fold(f64::NEG_INFINITY, f64::max);
    let y0 = min_y.floor().max(0.0) as i32;
    let y1 = max_y.ceil().min(canvas.height as f64) as i32;

    for y in y0..y1 {
        let scan = y as f64 + 0.5;
        let mut crossings = Vec::new();
        for i in 0..points.len() {
            let a = points[i];
            let b = points[(i + 1) % points.len()];
            if (a.y <= scan && b.y > scan) || (b.y <= scan && a.y > scan) {
                let t = (scan - a.y) / (b.y - a.y);
                crossings.push(a.x + t * (b.x - a.x));
            }
        }
        crossings.sort_by(f64::total_cmp);
        for pair in crossings.chunks_exact(2) {
            let x0 = pair[0].round().max(0.0) as i32;
            let x1 = pair[1].round().min(canvas.width as f64) as i32;
            for x in x0..x1 {
                set_pixel(canvas, x, y, color.0, color.1, color.2, 1.0);
            }
        }
    }
}

fn draw_text(
    canvas: &mut Canvas,
    x: i32,
    y: i32,
    text: &str,
    font: &Font,
    scale: Scale,
    color: (u8, u8, u8),
) {
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font
        .layout(text, scale, point(0.0, 0.0 + v_metrics.ascent))
        .collect();
    // bounding box for the whole string so it can be centered on (x, y)
    let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    );
    let width_px = if min_x < max_x { max_x - min_x } else { 0 };
    let height_px = if min_y < max_y { max_y - min_y } else { 0 };
    let offset_x = x - width_px / 2;
    let offset_y = y - height_px / 2;
    for glyph in glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = offset_x + gx as i32 + bb.min.x - min_x;
                let py = offset_y + gy as i32 + bb.min.y - min_y;
                set_pixel(canvas, px, py, color.0, color.1, color.2, v);
            });
        }
    }
}
