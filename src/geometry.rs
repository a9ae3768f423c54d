/// Represents an immutable 2-dimensional position with floating point coordinates.
///
/// In the coordinate system used by this crate, the position of a `Widget` is the
/// location of its bottom-left corner, expressed in the coordinate space of the
/// host toolkit (typically the window or the parent widget).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Constructs and returns the position `(x, y)`
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Gets the `x`-coordinate of this position.
    pub fn get_x(&self) -> f32 {
        self.x
    }

    /// Gets the `y`-coordinate of this position.
    pub fn get_y(&self) -> f32 {
        self.y
    }

    /// Computes and returns the (Euclidean) distance from this position to the
    /// `other` position
    pub fn distance_to(&self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        f32::sqrt(dx * dx + dy * dy)
    }

    /// Tests if this position is 'nearly' equal to the other position. This is
    /// convenient for unit tests because floating point numbers can have rounding
    /// errors.
    ///
    /// Currently, two positions are considered nearly equal if their distance is
    /// smaller than 0.01
    pub fn nearly_equal(&self, other: Position) -> bool {
        self.distance_to(other) < 0.01
    }
}

/// Represents an immutable 2-dimensional size with floating point dimensions.
///
/// Sizes are never validated: negative widths and heights are silently accepted,
/// just like the rest of the geometry in this crate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    /// Constructs and returns the size `(width, height)`
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Gets the width of this size.
    pub fn get_width(&self) -> f32 {
        self.width
    }

    /// Gets the height of this size.
    pub fn get_height(&self) -> f32 {
        self.height
    }

    /// Tests if this size is 'nearly' equal to the other size, with the same
    /// tolerance as `Position::nearly_equal`.
    pub fn nearly_equal(&self, other: Size) -> bool {
        let dw = (other.width - self.width).abs();
        let dh = (other.height - self.height).abs();
        f32::sqrt(dw * dw + dh * dh) < 0.01
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_distance() {
        let x1 = 12.0;
        let y1 = -9.5;
        let x2 = x1 + 3.0;
        let y2 = y1 - 4.0;
        let position1 = Position::new(x1, y1);
        let position2 = Position::new(x2, y2);
        let distance = position1.distance_to(position2);

        // This should be true, even if rounding errors are made
        assert_eq!(distance, position2.distance_to(position1));

        // Some rounding errors are possible
        assert!(distance > 4.99 && distance < 5.01);
    }

    #[test]
    fn test_nearly_equal_position() {
        assert!(Position::new(10.0, 20.0).nearly_equal(Position::new(10.0001, 19.999)));
        assert!(!Position::new(10.0, 20.0).nearly_equal(Position::new(10.1, 19.9)));
        assert!(Position::new(-10.0, 20.0).nearly_equal(Position::new(-10.0001, 19.999)));
        assert!(!Position::new(-10.0, 20.0).nearly_equal(Position::new(-10.1, 19.9)));
    }

    #[test]
    fn test_nearly_equal_size() {
        assert!(Size::new(200.0, 100.0).nearly_equal(Size::new(200.0001, 99.999)));
        assert!(!Size::new(200.0, 100.0).nearly_equal(Size::new(200.1, 99.9)));

        // Negative sizes are not rejected anywhere, so they should compare as well
        assert!(Size::new(-5.0, -5.0).nearly_equal(Size::new(-5.0001, -4.999)));
    }
}
