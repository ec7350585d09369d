use std::f64::consts::{FRAC_PI_2, TAU};

use crate::foundation::{
    core::{Point, Vec2},
    error::{PlannerError, PlannerResult},
};

/// Value that lands exactly on the outer ring.
pub const RADAR_SCALE_MAX: f64 = 5.0;

/// Grid ring levels drawn behind the data polygons.
pub const RADAR_RING_LEVELS: [f64; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];

/// Polar layout of a radar chart.
///
/// Axis 0 points straight up and axes proceed clockwise in screen space (y down). Every
/// polygon overlaid on one chart must use the same axis order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadarGeometry {
    pub center: Point,
    pub radius: f64,
    pub axes: usize,
}

impl RadarGeometry {
    pub fn new(center: Point, radius: f64, axes: usize) -> PlannerResult<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(PlannerError::validation("radar radius must be finite and > 0"));
        }
        if axes < 3 {
            return Err(PlannerError::validation("radar needs at least 3 axes"));
        }
        Ok(Self {
            center,
            radius,
            axes,
        })
    }

    /// Angle of axis `i` in radians.
    pub fn angle(&self, i: usize) -> f64 {
        -FRAC_PI_2 + (i as f64) * TAU / (self.axes as f64)
    }

    fn at_distance(&self, distance: f64, i: usize) -> Point {
        let a = self.angle(i);
        self.center + Vec2::new(distance * a.cos(), distance * a.sin())
    }

    /// Position of value `v` on axis `i`.
    ///
    /// Values outside `0..=5` are not clamped; they extrapolate along the same line.
    pub fn point(&self, v: f64, i: usize) -> Point {
        if v == 0.0 {
            return self.center;
        }
        self.at_distance(v / RADAR_SCALE_MAX * self.radius, i)
    }

    /// One vertex per axis at grid level `level`.
    pub fn ring(&self, level: f64) -> Vec<Point> {
        (0..self.axes).map(|i| self.point(level, i)).collect()
    }

    pub fn rings(&self) -> Vec<Vec<Point>> {
        RADAR_RING_LEVELS.iter().map(|&l| self.ring(l)).collect()
    }

    /// Data polygon; `values[i]` is plotted on axis `i`. Extra values are ignored.
    pub fn polygon(&self, values: &[f64]) -> Vec<Point> {
        values
            .iter()
            .take(self.axes)
            .enumerate()
            .map(|(i, &v)| self.point(v, i))
            .collect()
    }

    /// Anchor for the label of axis `i`, `offset` beyond the outer ring.
    pub fn label_point(&self, i: usize, offset: f64) -> Point {
        self.at_distance(self.radius + offset, i)
    }
}

/// Compact decimal for SVG attributes (at most two fractional digits, no trailing zeros).
pub fn fmt_coord(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// `points` attribute value: `"x,y x,y ..."`.
pub fn svg_points(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", fmt_coord(p.x), fmt_coord(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/radar.rs"]
mod tests;
