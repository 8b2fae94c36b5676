// Delta chains: the wire stores each value after the first as the signed
// difference from its predecessor; the first value is relative to zero.
// Arithmetic is wrapping so that arbitrary (even hostile) chains stay
// defined and fold/unfold remain exact inverses over all of i64.

/// Fold absolute values into a delta chain.
pub fn fold(values: &[i64]) -> Vec<i64> {
    let mut prev = 0i64;
    values
        .iter()
        .map(|&v| {
            let d = v.wrapping_sub(prev);
            prev = v;
            d
        })
        .collect()
}

/// Unfold a delta chain back into absolute values via running cumulative sum.
pub fn unfold(deltas: &[i64]) -> Vec<i64> {
    let mut acc = 0i64;
    deltas
        .iter()
        .map(|&d| {
            acc = acc.wrapping_add(d);
            acc
        })
        .collect()
}
