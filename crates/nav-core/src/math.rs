//! World-space vector, box, and view-angle helpers.
//!
//! Coordinates are engine units stored as `f32`.  Angles are degrees in the
//! engine's `[pitch, yaw, roll]` convention, where positive pitch looks down.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

// ── Vec3 ──────────────────────────────────────────────────────────────────────

/// A 3-component world-space vector.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Component access by axis (0 = x, 1 = y, anything else = z).
    #[inline]
    pub fn axis(self, axis: usize) -> f32 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    #[inline]
    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    #[inline]
    pub fn distance(self, other: Vec3) -> f32 {
        (self - other).length()
    }

    #[inline]
    pub fn distance_squared(self, other: Vec3) -> f32 {
        (self - other).length_squared()
    }

    /// Copy with the vertical component zeroed.
    #[inline]
    pub fn flattened(self) -> Vec3 {
        Vec3 { z: 0.0, ..self }
    }

    /// Length in the horizontal plane.
    #[inline]
    pub fn horizontal_length(self) -> f32 {
        self.flattened().length()
    }

    /// Unit vector plus the original length.  A zero vector stays zero and
    /// reports length 0.
    pub fn normalize_len(self) -> (Vec3, f32) {
        let len = self.length();
        if len <= 0.0 {
            return (Vec3::ZERO, 0.0);
        }
        (self * (1.0 / len), len)
    }

    #[inline]
    pub fn normalized(self) -> Vec3 {
        self.normalize_len().0
    }

    /// `true` when every component is finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// View angles `[pitch, yaw, 0]` that look along `self`.
    pub fn to_angles(self) -> [f32; 3] {
        let (pitch, yaw);
        if self.x == 0.0 && self.y == 0.0 {
            yaw = 0.0;
            pitch = if self.z > 0.0 { 90.0 } else { 270.0 };
        } else {
            let mut y = if self.x != 0.0 {
                self.y.atan2(self.x).to_degrees()
            } else if self.y > 0.0 {
                90.0
            } else {
                270.0
            };
            if y < 0.0 {
                y += 360.0;
            }
            yaw = y;

            let forward = (self.x * self.x + self.y * self.y).sqrt();
            let mut p = self.z.atan2(forward).to_degrees();
            if p < 0.0 {
                p += 360.0;
            }
            pitch = p;
        }
        [-pitch, yaw, 0.0]
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl From<[f32; 3]> for Vec3 {
    #[inline]
    fn from(v: [f32; 3]) -> Self {
        Vec3::new(v[0], v[1], v[2])
    }
}

impl std::fmt::Display for Vec3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1} {:.1} {:.1})", self.x, self.y, self.z)
    }
}

// ── Angles ────────────────────────────────────────────────────────────────────

/// Signed difference `a - b` wrapped into `(-180, 180]` degrees.
pub fn angle_delta(a: f32, b: f32) -> f32 {
    let mut d = (a - b).rem_euclid(360.0);
    if d > 180.0 {
        d -= 360.0;
    }
    d
}

// ── Aabb ──────────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box.  Both bounds are inclusive.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub mins: Vec3,
    pub maxs: Vec3,
}

impl Aabb {
    #[inline]
    pub const fn new(mins: Vec3, maxs: Vec3) -> Self {
        Self { mins, maxs }
    }

    /// Box built from two corners in any order; inverted axes are swapped.
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self {
            mins: Vec3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            maxs: Vec3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Absolute box of an entity: `origin + mins .. origin + maxs`.
    #[inline]
    pub fn around(origin: Vec3, mins: Vec3, maxs: Vec3) -> Self {
        Self::from_corners(origin + mins, origin + maxs)
    }

    /// Overlap test; touching faces count as overlapping.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !(self.maxs.x < other.mins.x
            || self.maxs.y < other.mins.y
            || self.maxs.z < other.mins.z
            || self.mins.x > other.maxs.x
            || self.mins.y > other.maxs.y
            || self.mins.z > other.maxs.z)
    }

    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.mins.x
            && p.y >= self.mins.y
            && p.z >= self.mins.z
            && p.x <= self.maxs.x
            && p.y <= self.maxs.y
            && p.z <= self.maxs.z
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.mins + self.maxs) * 0.5
    }
}
