#![forbid(unsafe_code)]

//! Base64 decode transform.
//!
//! Whitespace is skipped. Each push decodes the complete 4-character
//! quanta seen so far; the remainder is carried to the next push and must
//! be empty (or a padded quantum) by the last one.

use crate::klass::{TransformContext, TransformKlass, TransformOperation, TransformUsage};
use base64::Engine;
use tyresta_core::{algorithm, Error};

pub struct Base64Klass;

impl TransformKlass for Base64Klass {
    fn name(&self) -> &'static str {
        algorithm::NAME_BASE64
    }

    fn href(&self) -> &'static str {
        algorithm::BASE64
    }

    fn usage(&self) -> TransformUsage {
        TransformUsage::Other
    }

    fn new_context(&self) -> Result<Box<dyn TransformContext>, Error> {
        Ok(Box::new(Base64Ctx::default()))
    }
}

#[derive(Default)]
struct Base64Ctx {
    pending: Vec<u8>,
    padded: bool,
}

impl TransformContext for Base64Ctx {
    fn execute(
        &mut self,
        _operation: TransformOperation,
        input: &[u8],
        last: bool,
        output: &mut Vec<u8>,
    ) -> Result<usize, Error> {
        let engine = base64::engine::general_purpose::STANDARD;

        for &b in input.iter().filter(|b| !b.is_ascii_whitespace()) {
            if self.padded {
                return Err(Error::Base64("data after padding".into()));
            }
            self.pending.push(b);
            if self.pending.len() % 4 == 0 && b == b'=' {
                self.padded = true;
            }
        }

        let ready = if last {
            self.pending.len()
        } else {
            self.pending.len() / 4 * 4
        };
        if ready > 0 {
            let decoded = engine
                .decode(&self.pending[..ready])
                .map_err(|e| Error::Base64(format!("decode error: {e}")))?;
            output.extend_from_slice(&decoded);
            self.pending.drain(..ready);
        }
        Ok(input.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Transform;
    use std::sync::Arc;

    fn decode_in_chunks(text: &[u8], chunk: usize) -> Result<Vec<u8>, Error> {
        let mut t = Transform::new(Arc::new(Base64Klass), TransformOperation::Decrypt)?;
        let mut out = Vec::new();
        for piece in text.chunks(chunk) {
            t.push(piece, false)?;
            out.extend(t.take_output());
        }
        t.finish()?;
        out.extend(t.take_output());
        Ok(out)
    }

    #[test]
    fn test_decode_with_whitespace() {
        let out = decode_in_chunks(b"SGVs\nbG8g\r\n d29y bGQ=\n", 64).unwrap();
        assert_eq!(out, b"Hello world");
    }

    #[test]
    fn test_chunking_does_not_matter() {
        let text = b"VGhlIHF1aWNrIGJyb3duIGZveA==";
        for chunk in 1..text.len() {
            assert_eq!(decode_in_chunks(text, chunk).unwrap(), b"The quick brown fox");
        }
    }

    #[test]
    fn test_incomplete_tail_rejected() {
        assert!(matches!(decode_in_chunks(b"SGVsbG8", 3).unwrap_err(), Error::Base64(_)));
    }

    #[test]
    fn test_data_after_padding_rejected() {
        assert!(matches!(decode_in_chunks(b"QQ==QUJD", 2).unwrap_err(), Error::Base64(_)));
    }
}
