/// Axis-aligned screen rectangle in pixels (y grows downward).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScreenRect {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl ScreenRect {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        ScreenRect { min, max }
    }

    /// Rectangle covering a `width x height` viewport anchored at the origin.
    pub fn from_size(size_px: [f64; 2]) -> Self {
        ScreenRect::new([0.0, 0.0], size_px)
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    /// Shrinks each edge by a fraction of the rectangle's own extent.
    pub fn inset_fraction(&self, frac_x: f64, frac_y: f64) -> Self {
        let dx = self.width() * frac_x;
        let dy = self.height() * frac_y;
        ScreenRect::new([self.min[0] + dx, self.min[1] + dy], [self.max[0] - dx, self.max[1] - dy])
    }

    /// Grows each edge outward by a fixed pixel amount.
    pub fn expand(&self, px: f64) -> Self {
        ScreenRect::new([self.min[0] - px, self.min[1] - px], [self.max[0] + px, self.max[1] + px])
    }

    /// Inclusive containment; non-finite points are never contained.
    pub fn contains(&self, p: [f64; 2]) -> bool {
        p[0] >= self.min[0] && p[0] <= self.max[0] && p[1] >= self.min[1] && p[1] <= self.max[1]
    }
}

#[cfg(test)]
mod tests {
    use super::ScreenRect;

    #[test]
    fn inset_keeps_interior() {
        let safe = ScreenRect::from_size([1000.0, 800.0]).inset_fraction(0.15, 0.15);
        assert_eq!(safe.min, [150.0, 120.0]);
        assert_eq!(safe.max, [850.0, 680.0]);
        assert!(safe.contains([500.0, 400.0]));
        assert!(safe.contains([150.0, 680.0]));
        assert!(!safe.contains([149.9, 400.0]));
    }

    #[test]
    fn expand_and_nan() {
        let loose = ScreenRect::from_size([100.0, 100.0]).expand(50.0);
        assert!(loose.contains([-50.0, 150.0]));
        assert!(!loose.contains([-50.1, 0.0]));
        assert!(!loose.contains([f64::NAN, 0.0]));
    }
}
