#![forbid(unsafe_code)]

//! Fixed-width `r || s` signature packing.
//!
//! XML-DSig (for DSA) and NIST-IR 7802 (for ECDSA) encode a signature pair
//! as the concatenation of two octet strings, each produced by I2OSP with
//! the same length `h`. There is no ASN.1 wrapping and no length prefix, so
//! the total length is always exactly `2h`.

use tyresta_core::Error;

/// Pack two big-endian unsigned integers into a `2 * half` byte buffer.
///
/// Leading zero bytes of `r` and `s` are ignored; what remains is
/// right-justified in its half and left-padded with zeros. Fails with
/// `InvalidSize` if either integer needs more than `half` bytes.
pub fn encode_components(r: &[u8], s: &[u8], half: usize) -> Result<Vec<u8>, Error> {
    if half == 0 {
        return Err(Error::InvalidSize("signature half-size is zero".into()));
    }
    let r = strip_leading_zeros(r);
    let s = strip_leading_zeros(s);
    if r.len() > half || s.len() > half {
        return Err(Error::InvalidSize(format!(
            "size(r)={} or size(s)={} > {half}",
            r.len(),
            s.len()
        )));
    }

    let mut out = vec![0u8; 2 * half];
    out[half - r.len()..half].copy_from_slice(r);
    out[2 * half - s.len()..].copy_from_slice(s);
    Ok(out)
}

/// Split a packed signature into its two `half`-byte big-endian fields.
pub fn decode_components(signature: &[u8], half: usize) -> Result<(&[u8], &[u8]), Error> {
    if half == 0 || signature.len() != 2 * half {
        return Err(Error::InvalidSize(format!(
            "invalid signature length {} ({} expected)",
            signature.len(),
            2 * half
        )));
    }
    Ok(signature.split_at(half))
}

/// Number of bytes needed to hold an integer of `bits` bits.
pub fn bytes_for_bits(bits: usize) -> usize {
    bits.div_ceil(8)
}

fn strip_leading_zeros(value: &[u8]) -> &[u8] {
    let start = value.iter().position(|&b| b != 0).unwrap_or(value.len());
    &value[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    fn unhex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    #[test]
    fn test_dss_appendix_example() {
        // Appendix 5 of the DSS standard, as quoted by XML-DSig section 6.4.1.
        let r = unhex("8BAC1AB66410435CB7181F95B16AB97C92B341C0");
        let s = unhex("41E2345F1F56DF2458F426D155B4BA2DB6DCD8C8");
        let packed = encode_components(&r, &s, 20).unwrap();
        let b64 = base64::engine::general_purpose::STANDARD.encode(&packed);
        assert_eq!(b64, "i6watmQQQ1y3GB+VsWq5fJKzQcBB4jRfH1bfJFj0JtFVtLotttzYyA==");
    }

    #[test]
    fn test_short_components_are_left_padded() {
        let packed = encode_components(&[0x01, 0x02], &[0xff], 4).unwrap();
        assert_eq!(packed, vec![0, 0, 0x01, 0x02, 0, 0, 0, 0xff]);

        let (r, s) = decode_components(&packed, 4).unwrap();
        assert_eq!(r, &[0, 0, 0x01, 0x02]);
        assert_eq!(s, &[0, 0, 0, 0xff]);
        assert_eq!(strip_leading_zeros(r), &[0x01, 0x02]);
        assert_eq!(strip_leading_zeros(s), &[0xff]);
    }

    #[test]
    fn test_redundant_leading_zeros_accepted() {
        // A provider may hand back a sign-padded encoding that is one byte wider.
        let packed = encode_components(&[0x00, 0x80, 0x01], &[0x00, 0x00, 0x7f], 2).unwrap();
        assert_eq!(packed, vec![0x80, 0x01, 0x00, 0x7f]);
    }

    #[test]
    fn test_zero_integer_encodes_as_zeros() {
        let packed = encode_components(&[0x00], &[], 3).unwrap();
        assert_eq!(packed, vec![0; 6]);
    }

    #[test]
    fn test_oversized_component_rejected() {
        let err = encode_components(&[1, 2, 3], &[1], 2).unwrap_err();
        assert!(matches!(err, Error::InvalidSize(_)));
        let err = encode_components(&[1], &[1, 2, 3], 2).unwrap_err();
        assert!(matches!(err, Error::InvalidSize(_)));
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let buf = [0u8; 41];
        assert!(matches!(
            decode_components(&buf, 20).unwrap_err(),
            Error::InvalidSize(_)
        ));
        assert!(matches!(
            decode_components(&buf[..39], 20).unwrap_err(),
            Error::InvalidSize(_)
        ));
        assert!(matches!(
            decode_components(&[], 0).unwrap_err(),
            Error::InvalidSize(_)
        ));
    }

    #[test]
    fn test_bytes_for_bits() {
        assert_eq!(bytes_for_bits(160), 20);
        assert_eq!(bytes_for_bits(256), 32);
        assert_eq!(bytes_for_bits(521), 66);
        assert_eq!(bytes_for_bits(1), 1);
    }
}
