use std::fmt::Debug;

/// Threshold under which a negative component is kept.
/// `-1 / 10^scale`, with scale coerced to at least 1.
#[inline]
pub fn noise_threshold(scale: i32) -> f64 {
    let scale = scale.max(1);
    -1.0 / 10f64.powi(scale)
}

/// Zero a negative component that is not below the threshold
#[inline]
fn suppress(value: f64, threshold: Option<f64>) -> f64 {
    match threshold {
        Some(t) if value < 0.0 && value >= t => 0.0,
        _ => value,
    }
}

/// Cosine similarity
/// cosθ = A・B / (|A||B|)
///
/// With `scale` set, tiny negative components (SVD round-off) of both
/// vectors are zeroed before the dot product and the norms.
/// An undefined result (a zero norm) is reported as -1.
///
/// # Arguments
/// * `u`, `v` - vectors of equal length
/// * `scale` - decimal places of the noise threshold, `None` to disable
pub fn cosine(u: &[f64], v: &[f64], scale: Option<i32>) -> f64 {
    debug_assert_eq!(u.len(), v.len(), "cosine needs vectors of equal length");
    let threshold = scale.map(noise_threshold);
    let mut dot = 0_f64;
    let mut norm_u = 0_f64;
    let mut norm_v = 0_f64;
    for (&a, &b) in u.iter().zip(v.iter()) {
        let a = suppress(a, threshold);
        let b = suppress(b, threshold);
        dot += a * b;
        norm_u += a * a;
        norm_v += b * b;
    }
    let val = dot / (norm_u.sqrt() * norm_v.sqrt());
    if val.is_nan() {
        -1.0
    } else {
        val
    }
}

/// Map a cosine in [-1, 1] to a confidence in [0, 1]
#[inline]
pub fn confidence(cosine: f64) -> f64 {
    ((cosine + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Scores of one query against every document
pub struct Hits<K> {
    /// (document key, score)
    pub list: Vec<(K, f64)>,
}

impl<K> Hits<K> {
    pub fn new(list: Vec<(K, f64)>) -> Self {
        Hits { list }
    }

    /// Sort by descending score, ties keep document order
    pub fn sort_by_score(&mut self) -> &mut Self {
        self.list.retain(|(_, s)| !s.is_nan());
        self.list.sort_by(|a, b| b.1.total_cmp(&a.1));
        self
    }

    pub fn scores(&self) -> impl Iterator<Item = f64> + '_ {
        self.list.iter().map(|(_, s)| *s)
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl<K> Debug for Hits<K>
where
    K: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            writeln!(f, "Hits [")?;
            for (key, score) in &self.list {
                writeln!(f, "    {:?}: {:.6}", key, score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_reduced_vectors() {
        let q = [-0.2140, -0.1821];
        let d1 = [-0.4945, 0.6492];
        let d2 = [-0.6458, -0.7194];
        let d3 = [-0.5817, 0.2469];
        assert!((cosine(&q, &d1, Some(4)) - -0.0541).abs() < 0.001);
        assert!((cosine(&q, &d2, Some(4)) - 0.9910).abs() < 0.001);
        assert!((cosine(&q, &d3, Some(4)) - 0.4478).abs() < 0.001);
    }

    #[test]
    fn zero_norm_maps_to_minus_one() {
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 2.0], None), -1.0);
        assert_eq!(cosine(&[], &[], Some(4)), -1.0);
    }

    #[test]
    fn threshold_component_is_zeroed_but_below_is_kept() {
        let t = noise_threshold(4);
        // exactly at the threshold: suppressed, vector becomes zero
        assert_eq!(cosine(&[t], &[1.0], Some(4)), -1.0);
        // just below the threshold: genuine negative weight
        let below = t - 1e-9;
        assert!(cosine(&[below], &[1.0], Some(4)) < -0.99);
        assert!(cosine(&[below, 0.0], &[-1.0, 0.0], Some(4)) > 0.99);
        assert!(cosine(&[t, 0.0], &[-1.0, 0.0], Some(4)) == -1.0);
    }

    #[test]
    fn suppression_applies_to_both_vectors() {
        let tiny = -0.00005;
        // without suppression the tiny components matter
        let raw = cosine(&[tiny, 1.0], &[1.0, tiny], None);
        let cleaned = cosine(&[tiny, 1.0], &[1.0, tiny], Some(4));
        assert!(raw < 0.0);
        assert_eq!(cleaned, 0.0);
    }

    #[test]
    fn scale_is_coerced_to_one() {
        assert_eq!(noise_threshold(0), -0.1);
        assert_eq!(noise_threshold(-5), -0.1);
        assert_eq!(noise_threshold(3), -1.0 / 1000.0);
    }

    #[test]
    fn confidence_is_remapped_into_unit_range() {
        assert_eq!(confidence(-1.0), 0.0);
        assert_eq!(confidence(1.0), 1.0);
        assert_eq!(confidence(0.0), 0.5);
    }

    #[test]
    fn hits_sort_descending() {
        let mut hits = Hits::new(vec![(0usize, 0.2), (1, 0.9), (2, 0.2), (3, -0.4)]);
        hits.sort_by_score();
        let keys: Vec<usize> = hits.list.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![1, 0, 2, 3]);
    }
}
