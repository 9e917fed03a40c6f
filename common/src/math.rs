use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A two-dimensional vector. Used for positions as well as velocities,
/// accelerations and steering forces.
///
/// Arithmetic goes through the standard operators and returns new values;
/// the shape-changing operations (`normalize`, `set_length`, `set_angle`,
/// `truncate`, `reverse`, `zero`) mutate in place and hand back `&mut Self`
/// so they can be chained. Angles are radians throughout.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector2D {
    pub x: f32,
    pub y: f32,
}

impl Vector2D {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Zeroes out both components.
    pub fn zero(&mut self) -> &mut Self {
        self.x = 0.0;
        self.y = 0.0;
        self
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn length_sq(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(&self) -> f32 {
        self.length_sq().sqrt()
    }

    /// Rescales the vector along its current angle. A zero-length vector has
    /// angle 0 and rescales onto the positive x axis.
    pub fn set_length(&mut self, value: f32) -> &mut Self {
        let a = self.angle();
        self.x = a.cos() * value;
        self.y = a.sin() * value;
        self
    }

    /// The vector's angle in radians.
    pub fn angle(&self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Rotates the vector to the given radian angle, preserving its length.
    pub fn set_angle(&mut self, radians: f32) -> &mut Self {
        let len = self.length();
        self.x = radians.cos() * len;
        self.y = radians.sin() * len;
        self
    }

    /// Scales the vector to unit length. A zero-length vector has no
    /// direction to preserve and becomes the unit x axis.
    pub fn normalize(&mut self) -> &mut Self {
        let len = self.length();
        if len == 0.0 {
            self.x = 1.0;
            return self;
        }
        self.x /= len;
        self.y /= len;
        self
    }

    pub fn is_normalized(&self) -> bool {
        self.length() == 1.0
    }

    /// Clamps the length to at most `max`, preserving direction.
    pub fn truncate(&mut self, max: f32) -> &mut Self {
        self.set_length(max.min(self.length()))
    }

    /// Flips the vector's direction in place.
    pub fn reverse(&mut self) -> &mut Self {
        self.x = -self.x;
        self.y = -self.y;
        self
    }

    pub fn dot(&self, other: Vector2D) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// The angle in radians between two vectors. Non-unit inputs are
    /// normalized on copies; the originals are untouched.
    pub fn angle_between(v1: Vector2D, v2: Vector2D) -> f32 {
        let mut v1 = v1;
        let mut v2 = v2;
        if !v1.is_normalized() {
            v1.normalize();
        }
        if !v2.is_normalized() {
            v2.normalize();
        }
        v1.dot(v2).acos()
    }

    /// Which side of `reference` this vector's perpendicular lies on,
    /// as -1.0 or 1.0.
    pub fn sign(&self, reference: Vector2D) -> f32 {
        if self.perp().dot(reference) < 0.0 {
            -1.0
        } else {
            1.0
        }
    }

    /// The vector rotated 90 degrees counter-clockwise.
    pub fn perp(&self) -> Vector2D {
        Vector2D::new(-self.y, self.x)
    }

    /// Euclidean distance to `other`.
    pub fn dist(&self, other: Vector2D) -> f32 {
        self.dist_sq(other).sqrt()
    }

    pub fn dist_sq(&self, other: Vector2D) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }
}

impl Add for Vector2D {
    type Output = Vector2D;

    fn add(self, rhs: Vector2D) -> Vector2D {
        Vector2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2D {
    fn add_assign(&mut self, rhs: Vector2D) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2D {
    type Output = Vector2D;

    fn sub(self, rhs: Vector2D) -> Vector2D {
        Vector2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vector2D {
    fn sub_assign(&mut self, rhs: Vector2D) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vector2D {
    type Output = Vector2D;

    fn mul(self, value: f32) -> Vector2D {
        Vector2D::new(self.x * value, self.y * value)
    }
}

/// Division by zero is not guarded and propagates the IEEE result.
impl Div<f32> for Vector2D {
    type Output = Vector2D;

    fn div(self, value: f32) -> Vector2D {
        Vector2D::new(self.x / value, self.y / value)
    }
}

impl fmt::Display for Vector2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Uniformly distributed `f32` in `[min, max]`, drawn from the caller's rng
/// so simulations can be replayed from a seed.
pub fn rng_f32<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    rng.gen_range(min..=max)
}
