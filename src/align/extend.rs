/// 不允许空位的延伸：逐位比较参考窗口与 read，错配数超过 max_mismatches 时提前放弃。
/// 窗口越界同样返回 None。
pub fn extend_ungapped(
    reference: &[u8],
    seq: &[u8],
    ref_pos: usize,
    max_mismatches: usize,
) -> Option<usize> {
    let window = reference.get(ref_pos..ref_pos.checked_add(seq.len())?)?;
    let mut mismatches = 0usize;
    for (&r, &q) in window.iter().zip(seq) {
        if r != q {
            mismatches += 1;
            if mismatches > max_mismatches {
                return None;
            }
        }
    }
    Some(mismatches)
}

pub fn hamming_distance(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).filter(|(x, y)| x != y).count()
}
