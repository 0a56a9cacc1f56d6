/// 构建后缀数组（倍增法）。
/// 输入为数值化的文本（0:$,1:A,2:C,3:G,4:T），末尾应为唯一的哨兵 0。
/// 每轮以 (rank[i], rank[i+k]) 为键做两趟稳定计数排序（LSD 基数排序），
/// 越界的第二键记为最小值，因此哨兵的最小性在所有比较中占优。
pub fn build_sa(text: &[u8]) -> Vec<u32> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }
    let mut sa: Vec<usize> = (0..n).collect();
    let mut rank: Vec<usize> = text.iter().map(|&b| b as usize).collect();
    let mut tmp: Vec<usize> = vec![0; n];
    let mut order: Vec<usize> = vec![0; n];

    let mut k = 1usize;
    while k < n {
        // 第二键：rank[i+k] + 1，越界为 0
        let buckets = rank.iter().copied().max().unwrap_or(0) + 2;
        let second = |i: usize| if i + k < n { rank[i + k] + 1 } else { 0 };
        counting_sort(&sa, &mut order, buckets, second);
        counting_sort(&order, &mut sa, buckets, |i| rank[i]);

        tmp[sa[0]] = 0;
        for i in 1..n {
            let a = sa[i - 1];
            let b = sa[i];
            let prev = (rank[a], second(a));
            let curr = (rank[b], second(b));
            tmp[b] = tmp[a] + usize::from(curr != prev);
        }

        std::mem::swap(&mut rank, &mut tmp);
        if rank[sa[n - 1]] == n - 1 {
            break;
        }
        k <<= 1;
    }

    sa.into_iter().map(|x| x as u32).collect()
}

/// 稳定计数排序：按 key 将 src 排入 dst，同键保持 src 中的相对顺序
fn counting_sort(src: &[usize], dst: &mut [usize], buckets: usize, key: impl Fn(usize) -> usize) {
    let mut start = vec![0usize; buckets + 1];
    for &i in src {
        start[key(i) + 1] += 1;
    }
    for b in 1..=buckets {
        start[b] += start[b - 1];
    }
    for &i in src {
        let slot = &mut start[key(i)];
        dst[*slot] = i;
        *slot += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_sa(text: &[u8]) -> Vec<u32> {
        let n = text.len();
        let mut suffixes: Vec<(usize, &[u8])> = (0..n).map(|i| (i, &text[i..])).collect();
        suffixes.sort_by(|a, b| a.1.cmp(b.1));
        suffixes.into_iter().map(|(i, _)| i as u32).collect()
    }

    fn make_text(len: usize, seed: u32) -> Vec<u8> {
        let mut x: u32 = seed;
        let mut v = Vec::with_capacity(len + 1);
        for _ in 0..len {
            x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            v.push(((x >> 16) % 4) as u8 + 1);
        }
        v.push(0);
        v
    }

    #[test]
    fn sa_empty() {
        assert!(build_sa(&[]).is_empty());
    }

    #[test]
    fn sa_sentinel_only() {
        assert_eq!(build_sa(&[0]), vec![0]);
    }

    #[test]
    fn sa_basic() {
        // 文本：A C G T $  -> 1 2 3 4 0
        let text = [1u8, 2, 3, 4, 0];
        assert_eq!(build_sa(&text), vec![4, 0, 1, 2, 3]);
    }

    #[test]
    fn sa_repeated_characters() {
        // AAAA$
        let text = [1u8, 1, 1, 1, 0];
        assert_eq!(build_sa(&text), vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn sa_matches_naive_on_small_random_texts() {
        for len in 0..=40 {
            for seed in [7u32, 1_234_567, 99] {
                let text = make_text(len, seed);
                let msg = format!("mismatch on len={} seed={}", len, seed);
                assert_eq!(build_sa(&text), naive_sa(&text), "{}", msg);
            }
        }
    }

    #[test]
    fn sa_is_permutation() {
        let text = make_text(500, 42);
        let mut sa = build_sa(&text);
        sa.sort_unstable();
        assert!(sa.iter().enumerate().all(|(i, &p)| p as usize == i));
    }
}
