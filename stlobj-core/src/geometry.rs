/// Geometry primitives carried through a conversion
use std::fmt;

/// A point or direction in 3D space.
///
/// Binary STL stores single precision; values are widened on read so that
/// a whole conversion runs in `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Narrow to the single-precision triple binary STL stores.
    pub fn to_f32_array(self) -> [f32; 3] {
        [self.x as f32, self.y as f32, self.z as f32]
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x as f64, y as f64, z as f64)
    }
}

/// Six decimal places, space separated: the layout both OBJ and ASCII STL use.
impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6} {:.6} {:.6}", self.x, self.y, self.z)
    }
}

/// One triangle of a mesh: a normal and three vertices in file winding order.
///
/// A facet is only ever built whole, so it always holds exactly three vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Facet {
    pub normal: Vector3,
    pub vertices: [Vector3; 3],
}

impl Facet {
    pub fn new(normal: Vector3, v1: Vector3, v2: Vector3, v3: Vector3) -> Self {
        Self {
            normal,
            vertices: [v1, v2, v3],
        }
    }
}
