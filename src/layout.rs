//! Tangent-circle packing for chained circular interior plots.
//!
//! Each displayed quantity gets one "unit": a big full-star circle plus a
//! small core-zoom circle. Units chain together so that consecutive circles
//! touch without overlapping, alternating which of the two tangent solutions
//! is taken so the ribbon zig-zags instead of spiraling. Once all units are
//! placed, the bounding box plus padding determines the figure size and the
//! affine map into normalized figure coordinates.

use serde::{Deserialize, Serialize};

/// A circle in abstract layout coordinates (not yet screen space).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl Circle {
    pub fn new(x: f64, y: f64, r: f64) -> Self {
        Self { x, y, r }
    }
}

/// Additive margins applied to a finished bounding box, in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pad {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Pad {
    pub fn scaled(self, factor: f64) -> Pad {
        Pad {
            left: self.left * factor,
            right: self.right * factor,
            bottom: self.bottom * factor,
            top: self.top * factor,
        }
    }
}

/// One plot unit: the big full-view circle and its small zoom circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPositions {
    pub big: Circle,
    pub small: Circle,
}

/// Radii used to generate a layout. The stored circle radii include
/// `r_pad` so the bounding box and tangency math share one extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub r_big: f64,
    pub r_small: f64,
    pub r_pad: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            r_big: 1.0,
            r_small: 0.70,
            r_pad: 0.02,
        }
    }
}

/// How a circle touches its base circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tangency {
    External,
    Internal,
}

/// Circles of radius `r_new` tangent to both `c1` and `c2`.
///
/// Solved by the two-circle-intersection construction: the new center must
/// lie at a fixed distance from each base center, so intersect those two
/// distance circles. Returns zero circles when the requested radius is
/// geometrically infeasible, one when the distance circles only touch, two
/// otherwise. The base circles must not be concentric.
pub fn tangent_circles(
    c1: &Circle,
    c2: &Circle,
    r_new: f64,
    touch1: Tangency,
    touch2: Tangency,
) -> Vec<Circle> {
    let desired = |r: f64, touch: Tangency| match touch {
        Tangency::External => r + r_new,
        Tangency::Internal => (r - r_new).abs(),
    };
    let d1 = desired(c1.r, touch1);
    let d2 = desired(c2.r, touch2);
    let dx = c2.x - c1.x;
    let dy = c2.y - c1.y;
    let dist = dx.hypot(dy);
    assert!(dist > 0.0, "tangent_circles: base circles are concentric");
    if dist > d1 + d2 + 1e-12 || dist < (d1 - d2).abs() - 1e-12 {
        return Vec::new();
    }
    let a = (d1 * d1 - d2 * d2 + dist * dist) / (2.0 * dist);
    let h = (d1 * d1 - a * a).max(0.0).sqrt();
    let xm = c1.x + a * dx / dist;
    let ym = c1.y + a * dy / dist;
    if h <= 1e-12 {
        // Distance circles are tangent themselves: a single solution on the
        // line between the centers.
        return vec![Circle::new(xm, ym, r_new)];
    }
    let rx = -dy * (h / dist);
    let ry = dx * (h / dist);
    vec![
        Circle::new(xm + rx, ym + ry, r_new),
        Circle::new(xm - rx, ym - ry, r_new),
    ]
}

/// Next unit in the chain: a big circle tangent to the previous unit's big
/// and small circles, then a small circle tangent to the previous big and
/// the new big. `parity` flips between the two tangent solutions each step,
/// producing the zig-zag.
pub fn calc_next_plot_positions(
    prev: &PlotPositions,
    parity: usize,
    params: &LayoutParams,
) -> Option<PlotPositions> {
    let bigs = tangent_circles(
        &prev.big,
        &prev.small,
        params.r_big + params.r_pad,
        Tangency::External,
        Tangency::External,
    );
    let big = *bigs.get(parity)?;
    let smalls = tangent_circles(
        &prev.big,
        &big,
        params.r_small + params.r_pad,
        Tangency::External,
        Tangency::External,
    );
    let small = *smalls.get(parity)?;
    Some(PlotPositions { big, small })
}

/// Bounding box of a layout in layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Bounds {
    fn of_circle(c: &Circle) -> Self {
        Self {
            left: c.x - c.r,
            right: c.x + c.r,
            bottom: c.y - c.r,
            top: c.y + c.r,
        }
    }

    fn include_circle(&mut self, c: &Circle) {
        self.left = self.left.min(c.x - c.r);
        self.right = self.right.max(c.x + c.r);
        self.bottom = self.bottom.min(c.y - c.r);
        self.top = self.top.max(c.y + c.r);
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}

/// How [`Layout::radius_to_fig_fraction`] maps a radius into figure space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadiusMode {
    /// Fraction of the smaller figure dimension (circular axes stay round).
    FitMin,
    /// Fraction of the figure width (horizontal bars).
    Width,
    /// Fraction of the figure height (vertical bars).
    Height,
}

/// Chained plot positions plus the one authoritative bounding box.
///
/// Lifecycle: seed with [`Layout::add_initial`], append the remaining units
/// with [`Layout::extend_positions`], apply padding last (so margins never
/// feed back into tangency math), then convert coordinates.
#[derive(Debug, Clone)]
pub struct Layout {
    pub params: LayoutParams,
    pub positions: Vec<PlotPositions>,
    bounds: Option<Bounds>,
}

impl Layout {
    pub fn new(params: LayoutParams) -> Self {
        Self {
            params,
            positions: Vec::new(),
            bounds: None,
        }
    }

    /// Seed with the first unit at explicit coordinates.
    pub fn add_initial(&mut self, x_big: f64, y_big: f64, x_small: f64, y_small: f64) {
        let pos = PlotPositions {
            big: Circle::new(x_big, y_big, self.params.r_big + self.params.r_pad),
            small: Circle::new(x_small, y_small, self.params.r_small + self.params.r_pad),
        };
        self.push_position(pos);
    }

    fn push_position(&mut self, pos: PlotPositions) {
        match &mut self.bounds {
            Some(b) => {
                b.include_circle(&pos.big);
                b.include_circle(&pos.small);
            }
            None => {
                let mut b = Bounds::of_circle(&pos.big);
                b.include_circle(&pos.small);
                self.bounds = Some(b);
            }
        }
        self.positions.push(pos);
    }

    /// Append `n_more` units to the chain, flipping parity each step. The
    /// bounding box grows incrementally and never shrinks. Stops early if
    /// the configured radii ever make the next tangency infeasible.
    pub fn extend_positions(&mut self, n_more: usize) {
        debug_assert!(!self.positions.is_empty(), "extend before add_initial");
        let Some(mut prev) = self.positions.last().copied() else {
            return;
        };
        for i in 0..n_more {
            let parity = i % 2;
            match calc_next_plot_positions(&prev, parity, &self.params) {
                Some(next) => {
                    self.push_position(next);
                    prev = next;
                }
                None => break,
            }
        }
    }

    /// Expand the bounding box by margins scaled by the big radius. Call
    /// once, after all units are placed.
    pub fn apply_padding(&mut self, pad: Pad) {
        let pad = pad.scaled(self.params.r_big);
        if let Some(b) = &mut self.bounds {
            b.left -= pad.left;
            b.right += pad.right;
            b.bottom -= pad.bottom;
            b.top += pad.top;
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn width_height(&self) -> Option<(f64, f64)> {
        self.bounds.map(|b| (b.width(), b.height()))
    }

    /// Map layout coordinates to normalized [0, 1] figure coordinates.
    pub fn layout_to_fig_coords(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let b = self.bounds?;
        Some(((x - b.left) / b.width(), (y - b.bottom) / b.height()))
    }

    /// Convert a radius in layout units to a figure-fraction diameter.
    pub fn radius_to_fig_fraction(&self, r: f64, mode: RadiusMode) -> Option<f64> {
        let (w, h) = self.width_height()?;
        let reference = match mode {
            RadiusMode::FitMin => w.min(h),
            RadiusMode::Width => w,
            RadiusMode::Height => h,
        };
        Some(2.0 * r / reference)
    }

    /// Figure size in inches such that the pre-padding interior height keeps
    /// a fixed physical size, with width following the final aspect ratio.
    /// `h_old` is the bounding-box height captured before `apply_padding`;
    /// circles then render at the same physical size no matter how many
    /// units are chained or how much margin was added.
    pub fn finalize_figsize_with_prepad(
        &self,
        h_old: f64,
        base_interior_height_in: f64,
    ) -> Option<(f64, f64)> {
        debug_assert!(h_old > 0.0, "pre-padding height must be positive");
        let (w, h) = self.width_height()?;
        let fig_h = base_interior_height_in * (h / h_old);
        let fig_w = (w / h) * fig_h;
        Some((fig_w, fig_h))
    }
}

/// Standard chain of `n_units` units: the first big circle at the origin
/// with its small circle directly below, then the zig-zag extension.
pub fn build_circle_layout(n_units: usize, params: LayoutParams) -> Layout {
    let mut layout = Layout::new(params);
    let y_small = -(params.r_big + params.r_small + 2.0 * params.r_pad);
    layout.add_initial(0.0, 0.0, 0.0, y_small);
    if n_units > 1 {
        layout.extend_positions(n_units - 1);
    }
    layout
}
