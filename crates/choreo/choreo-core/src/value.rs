//! Small value model for keyframed targets.
//!
//! Tracks animate scalars (blend weights, intensities), positions, and
//! rotations; everything richer belongs to the host engine.

use serde::{Deserialize, Serialize};

/// Discriminant for [`Value`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Float,
    Vec3,
    Quat,
}

impl ValueKind {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Vec3 => "vec3",
            Self::Quat => "quat",
        }
    }
}

/// A keyframeable value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Float(f32),
    Vec3([f32; 3]),
    /// Unit quaternion, [x, y, z, w]
    Quat([f32; 4]),
}

impl Value {
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Float(_) => ValueKind::Float,
            Self::Vec3(_) => ValueKind::Vec3,
            Self::Quat(_) => ValueKind::Quat,
        }
    }

    /// Linear interpolation between two values of the same kind.
    /// Quaternions use normalized lerp with shortest-arc correction.
    /// Returns `None` on kind mismatch.
    pub fn lerp(a: &Value, b: &Value, t: f32) -> Option<Value> {
        match (a, b) {
            (Value::Float(x), Value::Float(y)) => Some(Value::Float(x + (y - x) * t)),
            (Value::Vec3(x), Value::Vec3(y)) => Some(Value::Vec3([
                x[0] + (y[0] - x[0]) * t,
                x[1] + (y[1] - x[1]) * t,
                x[2] + (y[2] - x[2]) * t,
            ])),
            (Value::Quat(x), Value::Quat(y)) => Some(Value::Quat(nlerp(*x, *y, t))),
            _ => None,
        }
    }
}

/// Normalized lerp between unit quaternions, flipping `b` onto the shorter arc.
fn nlerp(a: [f32; 4], mut b: [f32; 4], t: f32) -> [f32; 4] {
    let dot = a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3];
    if dot < 0.0 {
        for c in &mut b {
            *c = -*c;
        }
    }
    let mut out = [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ];
    let norm = (out[0] * out[0] + out[1] * out[1] + out[2] * out[2] + out[3] * out[3]).sqrt();
    if norm > f32::EPSILON {
        for c in &mut out {
            *c /= norm;
        }
    } else {
        out = a;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_float_and_vec3() {
        let v = Value::lerp(&Value::Float(0.0), &Value::Float(10.0), 0.25).unwrap();
        assert_eq!(v, Value::Float(2.5));

        let v = Value::lerp(
            &Value::Vec3([0.0, 2.0, -10.0]),
            &Value::Vec3([4.0, 2.0, 10.0]),
            0.5,
        )
        .unwrap();
        assert_eq!(v, Value::Vec3([2.0, 2.0, 0.0]));
    }

    #[test]
    fn lerp_kind_mismatch() {
        assert!(Value::lerp(&Value::Float(0.0), &Value::Vec3([0.0; 3]), 0.5).is_none());
    }

    #[test]
    fn quat_nlerp_stays_unit() {
        let a = Value::Quat([0.0, 0.0, 0.0, 1.0]);
        let b = Value::Quat([0.0, 1.0, 0.0, 0.0]);
        if let Some(Value::Quat(q)) = Value::lerp(&a, &b, 0.5) {
            let n = (q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3]).sqrt();
            assert!((n - 1.0).abs() < 1e-4);
        } else {
            panic!("expected quat");
        }
    }
}
