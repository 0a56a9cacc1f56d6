use crate::util::dna::SENTINEL;

/// 根据后缀数组构建 BWT。
/// BWT[i] = text[SA[i] - 1]，SA[i] == 0 时为哨兵。
pub fn build_bwt(text: &[u8], sa: &[u32]) -> Vec<u8> {
    let mut bwt = Vec::with_capacity(sa.len());
    for &p in sa {
        let i = p as usize;
        let prev = if i == 0 { SENTINEL } else { text[i - 1] };
        bwt.push(prev);
    }
    bwt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::sa::build_sa;

    #[test]
    fn bwt_of_banana_like_text() {
        // ACAA$ -> 1 2 1 1 0
        let text = [1u8, 2, 1, 1, 0];
        let sa = build_sa(&text);
        assert_eq!(sa, vec![4, 3, 2, 0, 1]);
        // 前驱：A A C $ A
        assert_eq!(build_bwt(&text, &sa), vec![1, 1, 2, 0, 1]);
    }

    #[test]
    fn bwt_empty() {
        assert!(build_bwt(&[], &[]).is_empty());
    }
}
