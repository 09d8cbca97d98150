//! Rectangular map bounds centered on the origin.

use organism_types::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned map bounds expressed as a half-extent around the origin.
///
/// A point is out of bounds when `|x| > half_extent.x` or
/// `|y| > half_extent.y`. Points exactly on the edge are inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    /// Half the map's width and height.
    pub half_extent: Vec2,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self::new(Vec2::new(100.0, 100.0))
    }
}

impl WorldBounds {
    /// Create bounds with the given half-extent.
    pub const fn new(half_extent: Vec2) -> Self {
        Self { half_extent }
    }

    /// Whether `x` alone is outside the horizontal extent.
    pub fn is_out_x(&self, position: Vec2) -> bool {
        position.x.abs() > self.half_extent.x
    }

    /// Whether `y` alone is outside the vertical extent.
    pub fn is_out_y(&self, position: Vec2) -> bool {
        position.y.abs() > self.half_extent.y
    }

    /// Whether `position` lies outside the map on either axis.
    pub fn is_out_of_bounds(&self, position: Vec2) -> bool {
        self.is_out_x(position) || self.is_out_y(position)
    }

    /// Whether `position` lies inside the map, edges included.
    pub fn contains(&self, position: Vec2) -> bool {
        !self.is_out_of_bounds(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_is_inside() {
        let bounds = WorldBounds::new(Vec2::new(10.0, 5.0));
        assert!(!bounds.is_out_of_bounds(Vec2::new(10.0, -5.0)));
        assert!(!bounds.is_out_of_bounds(Vec2::ZERO));
        assert!(bounds.contains(Vec2::new(-10.0, 5.0)));
    }

    #[test]
    fn either_axis_out_is_out() {
        let bounds = WorldBounds::new(Vec2::new(10.0, 5.0));
        assert!(bounds.is_out_of_bounds(Vec2::new(10.1, 0.0)));
        assert!(bounds.is_out_of_bounds(Vec2::new(0.0, -5.1)));
        assert!(bounds.is_out_x(Vec2::new(-11.0, 0.0)));
        assert!(!bounds.is_out_y(Vec2::new(-11.0, 0.0)));
    }
}
