/// 字母表大小：{0:$, 1:A, 2:C, 3:G, 4:T}
pub const SIGMA: usize = 5;

/// 哨兵编码，字典序小于所有碱基
pub const SENTINEL: u8 = 0;
pub const SENTINEL_CHAR: u8 = b'$';

/// 碱基字符按编码顺序排列，BASES[code - 1]
pub const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// 严格编码：仅接受大写 ACGT 与 `$`，其余返回 None
#[inline]
pub fn to_alphabet(b: u8) -> Option<u8> {
    match b {
        b'$' => Some(SENTINEL),
        b'A' => Some(1),
        b'C' => Some(2),
        b'G' => Some(3),
        b'T' => Some(4),
        _ => None,
    }
}

#[inline]
pub fn from_alphabet(a: u8) -> u8 {
    match a {
        0 => SENTINEL_CHAR,
        1 => b'A',
        2 => b'C',
        3 => b'G',
        4 => b'T',
        _ => b'N',
    }
}

/// 编码碱基模式串；遇到字母表外符号返回 None（哨兵同样不可出现在模式中）
pub fn encode_pattern(pattern: &[u8]) -> Option<Vec<u8>> {
    pattern
        .iter()
        .map(|&b| to_alphabet(b).filter(|&c| c != SENTINEL))
        .collect()
}

/// 大写化，保留其它字节原样
pub fn normalize_seq(seq: &[u8]) -> Vec<u8> {
    seq.iter().map(u8::to_ascii_uppercase).collect()
}

#[inline]
pub fn complement(base: u8) -> u8 {
    match base.to_ascii_uppercase() {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' => b'A',
        _ => b'N',
    }
}

pub fn revcomp(seq: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(seq.len());
    for &b in seq.iter().rev() {
        out.push(complement(b));
    }
    out
}

/// 转换（A<->G, C<->T）
#[inline]
pub fn is_transition(reference: u8, alt: u8) -> bool {
    matches!(
        (reference, alt),
        (b'A', b'G') | (b'G', b'A') | (b'C', b'T') | (b'T', b'C')
    )
}

#[inline]
pub fn base_index(base: u8) -> Option<usize> {
    match base {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revcomp_is_case_insensitive_and_uppercases() {
        assert_eq!(revcomp(b"aacGT"), b"ACGTT");
        assert_eq!(revcomp(b"ANT"), b"ANT");
    }

    #[test]
    fn encode_pattern_rejects_sentinel_and_unknown() {
        assert_eq!(encode_pattern(b"ACGT"), Some(vec![1, 2, 3, 4]));
        assert_eq!(encode_pattern(b"AC$"), None);
        assert_eq!(encode_pattern(b"ACN"), None);
        assert_eq!(encode_pattern(b"acgt"), None);
    }

    #[test]
    fn transitions() {
        assert!(is_transition(b'C', b'T'));
        assert!(!is_transition(b'C', b'A'));
    }
}
