use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

use crate::orientation::Orientation;

/// A point, pointer delta or viewport offset in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Crop rectangle. `x`/`y` is the top-left corner and may be negative.
///
/// Width and height are signed while a resize is being computed; call
/// [`Rect::normalize`] to get the non-negative form.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f32 {
        (self.width * self.height).abs()
    }

    pub fn is_normalized(&self) -> bool {
        self.width >= 0.0 && self.height >= 0.0
    }

    /// Flips a negative width or height so the rectangle covers the same
    /// region with a non-negative size. Idempotent.
    pub fn normalize(self) -> Self {
        let mut rect = self;

        if rect.width < 0.0 {
            rect.x += rect.width;
            rect.width = rect.width.abs();
        }

        if rect.height < 0.0 {
            rect.y += rect.height;
            rect.height = rect.height.abs();
        }

        rect
    }

    /// Inclusive containment test on the normalized rectangle.
    pub fn contains(&self, point: Vec2) -> bool {
        let rect = self.normalize();
        point.x >= rect.x && point.x <= rect.right() && point.y >= rect.y && point.y <= rect.bottom()
    }
}

/// Applies a pointer delta to `rect`.
///
/// With no orientation the rectangle is translated. Otherwise each edge named
/// by the orientation follows the delta on its axis. The result is not
/// normalized.
pub fn resize_or_move(rect: Rect, orientation: Option<Orientation>, delta: Vec2) -> Rect {
    let mut next = rect;

    let Some(orientation) = orientation else {
        next.x += delta.x;
        next.y += delta.y;
        return next;
    };

    if orientation.has_west() {
        next.x += delta.x;
        next.width -= delta.x;
    }

    if orientation.has_north() {
        next.y += delta.y;
        next.height -= delta.y;
    }

    if orientation.has_east() {
        next.width += delta.x;
    }

    if orientation.has_south() {
        next.height += delta.y;
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<Rect> {
        vec![
            Rect::new(0.0, 0.0, 0.0, 0.0),
            Rect::new(10.0, 10.0, 50.0, 50.0),
            Rect::new(10.0, 10.0, -20.0, 55.0),
            Rect::new(-5.0, 3.0, 12.0, -7.0),
            Rect::new(4.0, -8.0, -16.0, -2.0),
        ]
    }

    #[test]
    fn test_se_drag_through_left_edge_flips() {
        let origin = Rect::new(10.0, 10.0, 50.0, 50.0);
        let raw = resize_or_move(origin, Some(Orientation::SouthEast), Vec2::new(-70.0, 5.0));
        assert_eq!(raw, Rect::new(10.0, 10.0, -20.0, 55.0));
        assert_eq!(raw.normalize(), Rect::new(-10.0, 10.0, 20.0, 55.0));
    }

    #[test]
    fn test_nw_drag_inward_needs_no_flip() {
        let origin = Rect::new(0.0, 0.0, 40.0, 40.0);
        let next = resize_or_move(origin, Some(Orientation::NorthWest), Vec2::new(5.0, 5.0));
        assert_eq!(next, Rect::new(5.0, 5.0, 35.0, 35.0));
        assert_eq!(next.normalize(), next);
    }

    #[test]
    fn test_edge_handles_only_touch_their_axis() {
        let origin = Rect::new(10.0, 20.0, 30.0, 40.0);
        let delta = Vec2::new(7.0, -3.0);

        assert_eq!(
            resize_or_move(origin, Some(Orientation::East), delta),
            Rect::new(10.0, 20.0, 37.0, 40.0)
        );
        assert_eq!(
            resize_or_move(origin, Some(Orientation::West), delta),
            Rect::new(17.0, 20.0, 23.0, 40.0)
        );
        assert_eq!(
            resize_or_move(origin, Some(Orientation::North), delta),
            Rect::new(10.0, 17.0, 30.0, 43.0)
        );
        assert_eq!(
            resize_or_move(origin, Some(Orientation::South), delta),
            Rect::new(10.0, 20.0, 30.0, 37.0)
        );
    }

    #[test]
    fn test_move_preserves_size() {
        let origin = Rect::new(3.0, 4.0, 25.0, 12.0);
        let moved = resize_or_move(origin, None, Vec2::new(-13.0, 8.5));
        assert_eq!(moved.width, origin.width);
        assert_eq!(moved.height, origin.height);
        assert_eq!(moved.position(), Vec2::new(-10.0, 12.5));
    }

    #[test]
    fn test_resize_or_move_is_linear_in_delta() {
        let origin = Rect::new(10.0, 10.0, 50.0, 50.0);
        let d1 = Vec2::new(12.0, -4.0);
        let d2 = Vec2::new(-30.0, 9.0);

        let mut orientations: Vec<Option<Orientation>> =
            Orientation::ALL.iter().copied().map(Some).collect();
        orientations.push(None);

        for orientation in orientations {
            let stepwise = resize_or_move(resize_or_move(origin, orientation, d1), orientation, d2);
            let once = resize_or_move(origin, orientation, d1 + d2);
            assert_eq!(stepwise, once, "orientation {orientation:?}");
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for rect in samples() {
            let once = rect.normalize();
            assert_eq!(once.normalize(), once);
            assert!(once.is_normalized());
        }
    }

    #[test]
    fn test_normalize_preserves_covered_region() {
        for rect in samples() {
            let normalized = rect.normalize();
            let (min_x, max_x) = (rect.x.min(rect.right()), rect.x.max(rect.right()));
            let (min_y, max_y) = (rect.y.min(rect.bottom()), rect.y.max(rect.bottom()));

            assert_eq!(normalized.x, min_x);
            assert_eq!(normalized.right(), max_x);
            assert_eq!(normalized.y, min_y);
            assert_eq!(normalized.bottom(), max_y);
            assert_eq!(normalized.area(), rect.area());
        }
    }

    #[test]
    fn test_contains_uses_normalized_bounds() {
        let rect = Rect::new(10.0, 10.0, -10.0, 10.0);
        assert!(rect.contains(Vec2::new(5.0, 15.0)));
        assert!(!rect.contains(Vec2::new(15.0, 15.0)));
    }

    #[test]
    fn test_rect_serializes_as_plain_fields() {
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0);
        let json = serde_json::to_string(&rect).unwrap();
        assert_eq!(json, r#"{"x":1.0,"y":2.0,"width":3.0,"height":4.0}"#);
    }
}
