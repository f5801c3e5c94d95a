use num::traits::real::Real;
use num::{Num, NumCast};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A 3D vector generic over any numeric type, used for positions, velocities
/// and force components in the planet-centered inertial frame.
///
/// # Type Parameters
/// * `T` - The functionality for the vector depends on traits implemented by `T`.
#[derive(Debug, PartialEq, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Vec3D<T> {
    /// The x-component of the vector.
    x: T,
    /// The y-component of the vector.
    y: T,
    /// The z-component of the vector.
    z: T,
}

impl<T: Copy> Vec3D<T> {
    /// Creates a new vector with the given x, y and z components.
    pub const fn new(x: T, y: T, z: T) -> Self { Self { x, y, z } }

    /// Returns the x-component of the vector.
    pub const fn x(&self) -> T { self.x }

    /// Returns the y-component of the vector.
    pub const fn y(&self) -> T { self.y }

    /// Returns the z-component of the vector.
    pub const fn z(&self) -> T { self.z }
}

impl<T> Vec3D<T>
where T: Real + NumCast
{
    /// Computes the magnitude (absolute value) of the vector.
    pub fn abs(&self) -> T { (self.x.powi(2) + self.y.powi(2) + self.z.powi(2)).sqrt() }

    /// Creates a vector pointing from the current vector (`self`) to another vector (`other`).
    ///
    /// # Arguments
    /// * `other` - The target vector.
    ///
    /// # Returns
    /// A new vector representing the direction from `self` to `other`.
    pub fn to(&self, other: &Vec3D<T>) -> Vec3D<T> {
        Vec3D::new(other.x - self.x, other.y - self.y, other.z - self.z)
    }

    /// Normalizes the vector to have a magnitude of 1.
    /// If the magnitude is zero, the original vector is returned unmodified.
    pub fn normalize(self) -> Self {
        let magnitude = self.abs();
        if magnitude.is_zero() {
            self
        } else {
            Self::new(self.x / magnitude, self.y / magnitude, self.z / magnitude)
        }
    }

    /// Computes the Euclidean distance between the current vector and another vector.
    pub fn euclid_distance(&self, other: &Self) -> T { self.to(other).abs() }

    /// Computes the cross product `self × other`.
    ///
    /// # Arguments
    /// * `other` - The right-hand operand of the cross product.
    ///
    /// # Returns
    /// A new vector perpendicular to both operands.
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Removes the component of `self` parallel to `axis`, leaving only the
    /// part perpendicular to it. Returns the zero vector when `axis` is degenerate.
    pub fn reject_from(&self, axis: &Self) -> Self {
        let axis_mag = axis.abs();
        if axis_mag.is_zero() {
            return Self::zero();
        }
        let unit = axis.normalize();
        *self - unit * self.dot(&unit)
    }

    /// Rotates the vector about an arbitrary axis by a given angle in degrees,
    /// following the Rodrigues rotation formula.
    ///
    /// # Arguments
    /// * `axis` - The rotation axis; normalized internally. A zero axis leaves
    ///   the vector unmodified.
    /// * `angle_degrees` - The rotation angle, in degrees.
    pub fn rotate_about(&self, axis: &Self, angle_degrees: f64) -> Self {
        let axis_mag = axis.abs();
        if axis_mag.is_zero() {
            return *self;
        }
        let k = axis.normalize();
        let angle = T::from(angle_degrees.to_radians()).unwrap();
        let (sin, cos) = (angle.sin(), angle.cos());
        let one_minus_cos = T::one() - cos;
        *self * cos + k.cross(self) * sin + k * (k.dot(self) * one_minus_cos)
    }
}

impl<T: Num + NumCast + Copy> Vec3D<T> {
    /// Computes the dot product of the current vector with another vector.
    pub fn dot(&self, other: &Self) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Creates a zero vector.
    pub fn zero() -> Self { Self::new(T::zero(), T::zero(), T::zero()) }
}

impl<T: Num + NumCast> Add for Vec3D<T> {
    type Output = Vec3D<T>;

    fn add(self, rhs: Vec3D<T>) -> Self::Output {
        Self::Output { x: self.x + rhs.x, y: self.y + rhs.y, z: self.z + rhs.z }
    }
}

impl<T: Num + NumCast> Sub for Vec3D<T> {
    type Output = Vec3D<T>;

    fn sub(self, rhs: Vec3D<T>) -> Self::Output {
        Self::Output { x: self.x - rhs.x, y: self.y - rhs.y, z: self.z - rhs.z }
    }
}

impl<T, TMul> Mul<TMul> for Vec3D<T>
where
    T: Num + NumCast,
    TMul: Num + NumCast + Copy,
{
    type Output = Vec3D<T>;

    /// Implements the `*` operator for a `Vec3D` and a scalar.
    fn mul(self, rhs: TMul) -> Self::Output {
        Self::Output {
            x: self.x * T::from(rhs).unwrap(),
            y: self.y * T::from(rhs).unwrap(),
            z: self.z * T::from(rhs).unwrap(),
        }
    }
}

impl<T, TDiv> Div<TDiv> for Vec3D<T>
where
    T: Num + NumCast,
    TDiv: Num + NumCast + Copy,
{
    type Output = Vec3D<T>;

    /// Implements the `/` operator for a `Vec3D` and a scalar.
    fn div(self, rhs: TDiv) -> Self::Output {
        Self::Output {
            x: self.x / T::from(rhs).unwrap(),
            y: self.y / T::from(rhs).unwrap(),
            z: self.z / T::from(rhs).unwrap(),
        }
    }
}

impl<T: Num + NumCast + Neg<Output = T>> Neg for Vec3D<T> {
    type Output = Vec3D<T>;

    fn neg(self) -> Self::Output { Self::Output { x: -self.x, y: -self.y, z: -self.z } }
}

impl<T: Num + NumCast> From<(T, T, T)> for Vec3D<T> {
    /// Creates a `Vec3D` from a tuple of (x, y, z) values.
    fn from(tuple: (T, T, T)) -> Self {
        Vec3D { x: tuple.0, y: tuple.1, z: tuple.2 }
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Vec3D<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
