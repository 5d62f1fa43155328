//! Angles between decoder coefficient vectors

use ndarray::ArrayView1;

/// Angle in degrees between two vectors
///
/// Returns NaN when either vector has zero norm.
pub fn angle_vecs(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    assert_eq!(a.len(), b.len(), "vectors must have the same length");
    let norm = (a.dot(&a) * b.dot(&b)).sqrt();
    if norm == 0.0 {
        return f64::NAN;
    }
    let cos = (a.dot(&b) / norm).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Circular mean of angles given in degrees, in (-180, 180]
pub fn mean_angle(degrees: &[f64]) -> f64 {
    if degrees.is_empty() {
        return f64::NAN;
    }
    let (sin, cos) = degrees.iter().fold((0.0, 0.0), |(s, c), d| {
        let r = d.to_radians();
        (s + r.sin(), c + r.cos())
    });
    sin.atan2(cos).to_degrees()
}
