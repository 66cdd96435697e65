use crate::entities::Rect;

/// Strict AABB overlap.  Rectangles that only share an edge do not collide.
pub fn is_colliding(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.width
        && a.x + a.width > b.x
        && a.y < b.y + b.height
        && a.y + a.height > b.y
}
