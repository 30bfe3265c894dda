//! Affine transformation matrices as used by PDF content streams

/// Represents a PDF transformation matrix [a b c d e f]
/// where: x' = a*x + c*y + e, y' = b*x + d*y + f
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformMatrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for TransformMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl TransformMatrix {
    /// Identity matrix (no transformation)
    pub fn identity() -> Self {
        Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 }
    }

    /// Pure translation
    pub fn translation(tx: f32, ty: f32) -> Self {
        Self { e: tx, f: ty, ..Self::identity() }
    }

    /// Build from the six operands of `cm` or `Tm`, `None` if there are fewer
    pub fn from_operands(values: &[f32]) -> Option<Self> {
        match values {
            [a, b, c, d, e, f, ..] => Some(Self { a: *a, b: *b, c: *c, d: *d, e: *e, f: *f }),
            _ => None,
        }
    }

    /// `self × other`: apply `self` first, then `other`
    ///
    /// This is the order the PDF operators compose in, e.g. `cm` computes
    /// `M × CTM` and text rendering uses `Tm × CTM`.
    pub fn then(&self, other: &Self) -> Self {
        Self {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Map a point through the matrix
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (self.a * x + self.c * y + self.e, self.b * x + self.d * y + self.f)
    }

    /// Vertical scale factor, used to turn a font size into user-space height
    pub fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_then_scale() {
        let translate = TransformMatrix::translation(10.0, 20.0);
        let scale = TransformMatrix { a: 2.0, d: 2.0, ..TransformMatrix::identity() };

        // Translate in the scaled space: (0,0) -> (10,20) -> (20,40)
        assert_eq!(translate.then(&scale).apply(0.0, 0.0), (20.0, 40.0));
        // Scale in translated space: (0,0) -> (0,0) -> (10,20)
        assert_eq!(scale.then(&translate).apply(0.0, 0.0), (10.0, 20.0));
    }

    #[test]
    fn test_from_operands_requires_six_values() {
        assert!(TransformMatrix::from_operands(&[1.0, 0.0, 0.0, 1.0, 5.0]).is_none());
        let m = TransformMatrix::from_operands(&[1.0, 0.0, 0.0, -1.0, 0.0, 792.0]).unwrap();
        assert_eq!(m.apply(100.0, 10.0), (100.0, 782.0));
        assert!((m.vertical_scale() - 1.0).abs() < f32::EPSILON);
    }
}
