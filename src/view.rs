//! Visible-range and axis-to-pixel transforms shared by the tick, label,
//! and overlay engines.

/// Visible span of one log-scaled axis, in the caller's orientation.
///
/// `start`/`end` are the data values at the low-pixel and high-pixel screen
/// edges, so an inverted axis (the HR temperature axis runs hot to cold) has
/// `start > end`. Both bounds must be positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogAxisView {
    pub start: f64,
    pub end: f64,
    /// Axis length in pixels.
    pub px: f64,
}

impl LogAxisView {
    pub fn new(start: f64, end: f64, px: f64) -> Self {
        debug_assert!(start > 0.0 && end > 0.0, "log axis needs positive bounds");
        debug_assert!(start != end, "degenerate axis range");
        Self { start, end, px }
    }

    /// Lower bound after normalization.
    pub fn lo(&self) -> f64 {
        self.start.min(self.end)
    }

    /// Upper bound after normalization.
    pub fn hi(&self) -> f64 {
        self.start.max(self.end)
    }

    pub fn inverted(&self) -> bool {
        self.start > self.end
    }

    /// Visible length in log10 decades.
    pub fn log_span(&self) -> f64 {
        (self.hi() / self.lo()).log10()
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lo() && value <= self.hi()
    }

    /// Screen position (pixels from the `start` edge) of a data value.
    pub fn to_px(&self, value: f64) -> f64 {
        let fraction = (value / self.lo()).log10() / self.log_span();
        let fraction = if self.inverted() { 1.0 - fraction } else { fraction };
        fraction * self.px
    }
}

/// Visible rectangle of a log-log plot (HR diagram).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogViewRect {
    pub x: LogAxisView,
    pub y: LogAxisView,
}

impl LogViewRect {
    pub fn new(x: LogAxisView, y: LogAxisView) -> Self {
        Self { x, y }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x.contains(x) && self.y.contains(y)
    }
}
