//! Axis-aligned rectangles and overlap measures.
//!
//! Rectangles are stored as origin plus size in `f64`. Extents are
//! standardized before any overlap computation, so a negative width or height
//! describes the same region as its mirrored positive counterpart.

/// Axis-aligned rectangle in normalized image coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a rectangle from a `(center_x, center_y, width, height)` row.
    pub fn from_center(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self {
            x: cx - width / 2.0,
            y: cy - height / 2.0,
            width,
            height,
        }
    }

    pub fn min_x(&self) -> f64 {
        self.x.min(self.x + self.width)
    }

    pub fn max_x(&self) -> f64 {
        self.x.max(self.x + self.width)
    }

    pub fn min_y(&self) -> f64 {
        self.y.min(self.y + self.height)
    }

    pub fn max_y(&self) -> f64 {
        self.y.max(self.y + self.height)
    }

    pub fn area(&self) -> f64 {
        (self.width * self.height).abs()
    }

    /// Returns the overlapping region, or `None` when the rectangles are
    /// disjoint. Rectangles that only share an edge yield a zero-area overlap.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.min_x().max(other.min_x());
        let y0 = self.min_y().max(other.min_y());
        let x1 = self.max_x().min(other.max_x());
        let y1 = self.max_y().min(other.max_y());
        if x1 < x0 || y1 < y0 {
            return None;
        }
        Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
    }

    /// Returns the smallest rectangle containing both inputs.
    pub fn enclosing(&self, other: &Rect) -> Rect {
        let x0 = self.min_x().min(other.min_x());
        let y0 = self.min_y().min(other.min_y());
        let x1 = self.max_x().max(other.max_x());
        let y1 = self.max_y().max(other.max_y());
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Scales a normalized rectangle into a frame of the given pixel size.
    pub fn to_pixels(&self, frame_width: f64, frame_height: f64) -> Rect {
        Rect::new(
            self.x * frame_width,
            self.y * frame_height,
            self.width * frame_width,
            self.height * frame_height,
        )
    }
}

/// Intersection over union of two rectangles.
///
/// The "union" is the area of the rectangle enclosing both inputs, not
/// `area(a) + area(b) - intersection`. For partially overlapping boxes this
/// gives a smaller value than textbook IoU; e.g. two 10x10 boxes offset by
/// (5, 5) score 25/225 rather than 25/175. Returns 0.0 for disjoint inputs
/// and whenever the enclosing area is zero.
///
/// The ratio is computed in `f64` and only the result is narrowed, so boxes
/// whose overlap is exactly a threshold such as 0.5 compare equal to it.
pub fn iou(a: &Rect, b: &Rect) -> f32 {
    let inter = match a.intersection(b) {
        Some(rect) => rect.width.max(0.0) * rect.height.max(0.0),
        None => return 0.0,
    };
    let union = a.enclosing(b).area();
    if union <= 0.0 || !union.is_finite() {
        return 0.0;
    }
    (inter / union) as f32
}

#[cfg(test)]
mod tests {
    use super::{iou, Rect};

    #[test]
    fn from_center_moves_origin_to_top_left() {
        let rect = Rect::from_center(0.5, 0.5, 0.2, 0.4);
        assert!((rect.x - 0.4).abs() < 1e-6);
        assert!((rect.y - 0.3).abs() < 1e-6);
        assert!((rect.width - 0.2).abs() < 1e-6);
        assert!((rect.height - 0.4).abs() < 1e-6);
    }

    #[test]
    fn negative_extents_are_standardized() {
        let flipped = Rect::new(10.0, 10.0, -10.0, -10.0);
        assert_eq!(flipped.min_x(), 0.0);
        assert_eq!(flipped.max_y(), 10.0);
        assert_eq!(flipped.area(), 100.0);
        let plain = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(iou(&flipped, &plain), 1.0);
    }

    #[test]
    fn edge_contact_has_zero_area_overlap() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(1.0, 0.0, 1.0, 1.0);
        let inter = a.intersection(&b).unwrap();
        assert_eq!(inter.width, 0.0);
        assert_eq!(iou(&a, &b), 0.0);
    }

    #[test]
    fn enclosing_covers_both_inputs() {
        let a = Rect::new(0.0, 0.0, 2.0, 1.0);
        let b = Rect::new(3.0, 4.0, 1.0, 1.0);
        assert_eq!(a.enclosing(&b), Rect::new(0.0, 0.0, 4.0, 5.0));
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn to_pixels_scales_each_axis() {
        let rect = Rect::new(0.25, 0.5, 0.5, 0.25);
        assert_eq!(rect.to_pixels(640.0, 480.0), Rect::new(160.0, 240.0, 320.0, 120.0));
    }

    #[test]
    fn concentric_half_width_box_is_exactly_half() {
        let wide = Rect::from_center(0.5, 0.5, 0.14, 0.4);
        let narrow = Rect::from_center(0.5, 0.5, 0.07, 0.4);
        assert_eq!(iou(&wide, &narrow), 0.5);
    }

    #[test]
    fn degenerate_pair_yields_zero() {
        let a = Rect::new(0.5, 0.5, 0.0, 0.0);
        assert_eq!(iou(&a, &a), 0.0);
        let b = Rect::new(0.7, 0.5, 0.0, 0.0);
        assert_eq!(iou(&a, &b), 0.0);
    }
}
