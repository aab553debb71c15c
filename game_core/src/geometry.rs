use glam::Vec2;

/// Axis-aligned rectangle described by its centre and full extent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub center: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        debug_assert!(size.x > 0.0 && size.y > 0.0, "body extent must be positive");
        Self { center, size }
    }

    pub fn left(&self) -> f32 {
        self.center.x - self.size.x / 2.0
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.size.x / 2.0
    }

    pub fn top(&self) -> f32 {
        self.center.y - self.size.y / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.center.y + self.size.y / 2.0
    }

    /// Inclusive AABB intersection
    pub fn overlaps(&self, other: &Body) -> bool {
        self.left() <= other.right()
            && self.right() >= other.left()
            && self.top() <= other.bottom()
            && self.bottom() >= other.top()
    }

    /// True when the horizontal spans overlap and one body's top edge lies
    /// exactly on the other's bottom edge.
    pub fn touches_vertically(&self, other: &Body) -> bool {
        let spans_overlap = self.left() <= other.right() && self.right() >= other.left();
        spans_overlap && (self.top() == other.bottom() || self.bottom() == other.top())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(x: f32, y: f32, w: f32, h: f32) -> Body {
        Body::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_edges_derive_from_center() {
        let b = body(100.0, 50.0, 20.0, 160.0);
        assert_eq!(b.left(), 90.0);
        assert_eq!(b.right(), 110.0);
        assert_eq!(b.top(), -30.0);
        assert_eq!(b.bottom(), 130.0);
    }

    #[test]
    fn test_overlap_is_inclusive() {
        let a = body(0.0, 0.0, 10.0, 10.0);
        let touching = body(10.0, 0.0, 10.0, 10.0);
        let apart = body(10.5, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&touching), "Shared edge counts as overlap");
        assert!(touching.overlaps(&a), "Overlap is symmetric");
        assert!(!a.overlaps(&apart));
    }

    #[test]
    fn test_overlap_requires_both_axes() {
        let a = body(0.0, 0.0, 10.0, 10.0);
        let below = body(0.0, 20.0, 10.0, 10.0);
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn test_touches_vertically_exact_edge() {
        let paddle = body(100.0, 100.0, 20.0, 160.0);
        // Ball resting exactly on top of the paddle
        let ball = body(100.0, -10.0, 60.0, 60.0);
        assert!(paddle.touches_vertically(&ball));
        assert!(ball.touches_vertically(&paddle));

        let near = body(100.0, -10.5, 60.0, 60.0);
        assert!(!paddle.touches_vertically(&near), "Only exact contact counts");
    }

    #[test]
    fn test_touches_vertically_needs_horizontal_overlap() {
        let paddle = body(100.0, 100.0, 20.0, 160.0);
        let ball = body(300.0, -10.0, 60.0, 60.0);
        assert!(!paddle.touches_vertically(&ball));
    }
}
