/// Indices of the `k` most probable classes, most probable first.
///
/// Returns `min(k, probs.len())` distinct indices. Equal probabilities keep
/// the lower index first; NaN sorts last.
pub fn top_k(probs: &[f32], k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..probs.len()).collect();
    order.sort_by(|&a, &b| {
        let (pa, pb) = (probs[a], probs[b]);
        match (pa.is_nan(), pb.is_nan()) {
            (true, true) => a.cmp(&b),
            (true, false) => std::cmp::Ordering::Greater,
            (false, true) => std::cmp::Ordering::Less,
            (false, false) => pb.total_cmp(&pa).then(a.cmp(&b)),
        }
    });
    order.truncate(k);
    order
}
