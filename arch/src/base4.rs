//! Radix-4 letter encoding: digit 0..=3 is written as `a`..=`d`, most
//! significant digit first.

const DIGITS: [char; 4] = ['a', 'b', 'c', 'd'];

fn digit(v: u32) -> char {
    DIGITS[(v & 3) as usize]
}

/// Fixed-width encoding. Digits beyond `width` are dropped.
pub fn encode(value: u32, width: usize) -> String {
    (0..width)
        .rev()
        .map(|i| digit(value.checked_shr(2 * i as u32).unwrap_or(0)))
        .collect()
}

/// Shortest encoding without leading `a`s. Zero is `"a"`.
pub fn encode_var(value: u32) -> String {
    let mut width = 1;
    while width < 16 && value >> (2 * width) != 0 {
        width += 1;
    }
    encode(value, width)
}

pub fn decode(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 16 {
        return None;
    }
    s.chars().try_fold(0u32, |acc, c| {
        let d = DIGITS.iter().position(|x| *x == c)? as u32;
        Some((acc << 2) | d)
    })
}

/// Largest value representable in `width` letters.
pub fn max_value(width: usize) -> u32 {
    match width {
        0 => 0,
        w if w >= 16 => u32::MAX,
        w => (1 << (2 * w)) - 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed() {
        assert_eq!(encode(0, 4), "aaaa");
        assert_eq!(encode(100, 4), "bcba");
        assert_eq!(encode(255, 4), "dddd");
        assert_eq!(encode(0x3FF, 5), "ddddd");
        assert_eq!(encode(0b01_00_11_10_00, 5), "badca");
    }

    #[test]
    fn variable() {
        assert_eq!(encode_var(0), "a");
        assert_eq!(encode_var(3), "d");
        assert_eq!(encode_var(4), "ba");
        assert_eq!(encode_var(5), "bb");
        assert_eq!(encode_var(16), "baa");
    }

    #[test]
    fn roundtrip() {
        for width in 1..=5 {
            for v in 0..=max_value(width) {
                assert_eq!(decode(&encode(v, width)), Some(v));
            }
        }
    }

    #[test]
    fn reject() {
        assert_eq!(decode(""), None);
        assert_eq!(decode("abx"), None);
    }

    #[test]
    fn capacity() {
        assert_eq!(max_value(4), 255);
        assert_eq!(max_value(5), 1023);
    }
}
