//! Base64 VLQ encoding used by source map `mappings`.

const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const SHIFT: u32 = 5;
const MASK: u64 = (1 << SHIFT) - 1;
const CONTINUATION: u64 = 1 << SHIFT;

/// Append the VLQ encoding of `value` to `out`.
///
/// The sign goes in the lowest bit, then the magnitude is written in 5-bit
/// groups, least significant first, with bit 5 marking continuation.
pub fn encode_into(value: i64, out: &mut String) {
    let mut vlq = (value.unsigned_abs() << 1) | u64::from(value < 0);
    loop {
        let mut digit = vlq & MASK;
        vlq >>= SHIFT;
        if vlq > 0 {
            digit |= CONTINUATION;
        }
        out.push(char::from(BASE64[digit as usize]));
        if vlq == 0 {
            break;
        }
    }
}

pub fn encode(value: i64) -> String {
    let mut out = String::new();
    encode_into(value, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_zero() {
        assert_eq!(encode(0), "A");
    }

    #[test]
    fn test_small_values() {
        assert_eq!(encode(1), "C");
        assert_eq!(encode(-1), "D");
        assert_eq!(encode(2), "E");
        assert_eq!(encode(9), "S");
        assert_eq!(encode(11), "W");
        assert_eq!(encode(13), "a");
        assert_eq!(encode(15), "e");
    }

    #[test]
    fn test_continuation() {
        assert_eq!(encode(16), "gB");
        assert_eq!(encode(18), "kB");
        assert_eq!(encode(-16), "hB");
        assert_eq!(encode(1000), "w+B");
    }

    #[test]
    fn test_encode_into_appends() {
        let mut out = String::from("A");
        encode_into(5, &mut out);
        assert_eq!(out, "AK");
    }
}
