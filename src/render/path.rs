use std::fmt::Write;

use serde::{Deserialize, Serialize};

/// A point in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "camelCase")]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo { c1: Point, c2: Point, to: Point },
}

/// Anchor and control coordinates for one drawn line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurvePath {
    pub commands: Vec<PathCommand>,
}

impl CurvePath {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of drawn segments (everything after the initial move).
    pub fn segment_count(&self) -> usize {
        self.commands.len().saturating_sub(1)
    }

    /// SVG path data (`d` attribute).
    pub fn to_svg(&self) -> String {
        let mut d = String::new();
        for cmd in &self.commands {
            if !d.is_empty() {
                d.push(' ');
            }
            // Writing to a String cannot fail.
            let _ = match cmd {
                PathCommand::MoveTo(p) => write!(d, "M{},{}", p.x, p.y),
                PathCommand::LineTo(p) => write!(d, "L{},{}", p.x, p.y),
                PathCommand::CubicTo { c1, c2, to } => write!(
                    d,
                    "C{},{} {},{} {},{}",
                    c1.x, c1.y, c2.x, c2.y, to.x, to.y
                ),
            };
        }
        d
    }
}

/// Turn ordered points into a line or a cardinal-style spline.
///
/// `tension` is clamped to `[0, 1]`. With tension 0 or only two points every
/// pair is joined by a straight segment. Otherwise each pair `p1 -> p2` becomes
/// a cubic whose controls lean along the neighbouring points:
/// `c1 = p1 + (p2 - p0) * t/6` and `c2 = p2 - (p3 - p1) * t/6`, where missing
/// neighbours at the ends fall back to the endpoint itself.
pub fn interpolate(points: &[Point], tension: f64) -> CurvePath {
    if points.len() < 2 {
        return CurvePath::default();
    }
    let tension = if tension.is_nan() { 0.0 } else { tension.clamp(0.0, 1.0) };

    let mut commands = Vec::with_capacity(points.len());
    commands.push(PathCommand::MoveTo(points[0]));

    if tension == 0.0 || points.len() == 2 {
        commands.extend(points[1..].iter().copied().map(PathCommand::LineTo));
        return CurvePath { commands };
    }

    let lean = |d: f64| d * tension / 6.0;
    let last = points.len() - 1;
    for i in 0..last {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(last)];

        let c1 = p1.offset(lean(p2.x - p0.x), lean(p2.y - p0.y));
        let c2 = p2.offset(-lean(p3.x - p1.x), -lean(p3.y - p1.y));
        commands.push(PathCommand::CubicTo { c1, c2, to: p2 });
    }
    CurvePath { commands }
}
