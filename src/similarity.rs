/// Tolerance for accumulated rounding before a score counts as invalid.
const ROUNDING_SLACK: f64 = 1e-9;

/// Cosine similarity between two vectors, in `[-1, 1]`.
///
/// This is a best-effort scoring primitive, not a correctness-critical
/// path: mismatched lengths, empty inputs, zero norms, and numerical
/// anomalies (NaN, out-of-range results) all score `0.0` instead of
/// panicking. Safe to call with adversarial vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for i in 0..a.len() {
        dot += f64::from(a[i]) * f64::from(b[i]);
        norm_a += f64::from(a[i]) * f64::from(a[i]);
        norm_b += f64::from(b[i]) * f64::from(b[i]);
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return 0.0;
    }

    let sim = dot / denom;
    if sim.is_nan() || sim < -1.0 - ROUNDING_SLACK || sim > 1.0 + ROUNDING_SLACK {
        return 0.0;
    }

    sim.clamp(-1.0, 1.0) as f32
}
