/// Orders scores by repeatedly taking the current maximum until it is
/// negative. Ties go to the lower index.
///
/// Returns `(index, score)` pairs, highest score first. Negative scores
/// (small clusters) never appear.
pub fn rank(scores: &[f64]) -> Vec<(usize, f64)> {
    let mut remaining = scores.to_vec();
    let mut order = Vec::new();
    loop {
        let Some((index, value)) = first_max(&remaining) else {
            break;
        };
        if value < 0.0 {
            break;
        }
        order.push((index, value));
        remaining[index] = -1.0;
    }
    order
}

fn first_max(values: &[f64]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        if best.is_none_or(|(_, b)| v > b) {
            best = Some((i, v));
        }
    }
    best
}
