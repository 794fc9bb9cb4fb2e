#![forbid(unsafe_code)]

//! Key loading from PEM and DER (PKCS#8 private keys, SubjectPublicKeyInfo
//! public keys).

use crate::key::{Key, KeyData, KeyUsage};
use tyresta_core::Error;

/// Load a private key from PKCS#8 DER bytes.
///
/// Tries RSA, EC P-256, EC P-384 and DSA in that order.
pub fn load_pkcs8_der(der: &[u8]) -> Result<Key, Error> {
    use pkcs8::DecodePrivateKey;

    if let Ok(pk) = rsa::RsaPrivateKey::from_pkcs8_der(der) {
        let public = pk.to_public_key();
        return Ok(Key::new(
            KeyData::Rsa {
                private: Some(pk),
                public,
            },
            KeyUsage::Any,
        ));
    }

    if let Ok(sk) = p256::ecdsa::SigningKey::from_pkcs8_der(der) {
        let vk = *sk.verifying_key();
        return Ok(Key::new(
            KeyData::EcP256 {
                private: Some(sk),
                public: vk,
            },
            KeyUsage::Any,
        ));
    }

    if let Ok(sk) = p384::ecdsa::SigningKey::from_pkcs8_der(der) {
        let vk = *sk.verifying_key();
        return Ok(Key::new(
            KeyData::EcP384 {
                private: Some(sk),
                public: vk,
            },
            KeyUsage::Any,
        ));
    }

    {
        use pkcs8::der::Decode;
        if let Ok(pki) = pkcs8::PrivateKeyInfo::from_der(der) {
            if let Ok(sk) = dsa::SigningKey::try_from(pki) {
                let vk = sk.verifying_key().clone();
                return Ok(Key::new(
                    KeyData::Dsa {
                        private: Some(sk),
                        public: vk,
                    },
                    KeyUsage::Any,
                ));
            }
        }
    }

    Err(Error::Key(
        "unable to parse PKCS#8 DER private key (tried RSA, P-256, P-384, DSA)".into(),
    ))
}

/// Load a public key from SubjectPublicKeyInfo DER bytes.
pub fn load_spki_der(spki_der: &[u8]) -> Result<Key, Error> {
    use spki::DecodePublicKey;

    if let Ok(pk) = rsa::RsaPublicKey::from_public_key_der(spki_der) {
        return Ok(Key::new(
            KeyData::Rsa {
                private: None,
                public: pk,
            },
            KeyUsage::Verify,
        ));
    }

    if let Ok(vk) = p256::ecdsa::VerifyingKey::from_public_key_der(spki_der) {
        return Ok(Key::new(
            KeyData::EcP256 {
                private: None,
                public: vk,
            },
            KeyUsage::Verify,
        ));
    }

    if let Ok(vk) = p384::ecdsa::VerifyingKey::from_public_key_der(spki_der) {
        return Ok(Key::new(
            KeyData::EcP384 {
                private: None,
                public: vk,
            },
            KeyUsage::Verify,
        ));
    }

    {
        use pkcs8::der::Decode;
        if let Ok(spki_ref) = spki::SubjectPublicKeyInfoRef::from_der(spki_der) {
            if let Ok(vk) = dsa::VerifyingKey::try_from(spki_ref) {
                return Ok(Key::new(
                    KeyData::Dsa {
                        private: None,
                        public: vk,
                    },
                    KeyUsage::Verify,
                ));
            }
        }
    }

    Err(Error::Key(
        "unsupported public key algorithm in SubjectPublicKeyInfo".into(),
    ))
}

/// Load a key from PEM, dispatching on the label.
///
/// `PRIVATE KEY` is read as PKCS#8, `PUBLIC KEY` as SubjectPublicKeyInfo.
pub fn load_pem(pem_data: &[u8]) -> Result<Key, Error> {
    let (label, der_bytes) = pem_rfc7468::decode_vec(pem_data)
        .map_err(|e| Error::Key(format!("failed to decode PEM: {e}")))?;
    match label {
        "PRIVATE KEY" => load_pkcs8_der(&der_bytes),
        "PUBLIC KEY" => load_spki_der(&der_bytes),
        _ => Err(Error::Key(format!("unsupported PEM label: {label}"))),
    }
}

/// Load a key from a file, auto-detecting PEM or DER.
pub fn load_key_file(path: &std::path::Path) -> Result<Key, Error> {
    let data = std::fs::read(path)?;
    tracing::debug!(path = %path.display(), "loading key file");

    if data.starts_with(b"-----BEGIN") {
        return load_pem(&data);
    }
    if let Ok(key) = load_pkcs8_der(&data) {
        return Ok(key);
    }
    if let Ok(key) = load_spki_der(&data) {
        return Ok(key);
    }
    Err(Error::Key(format!(
        "unable to auto-detect key format from file: {}",
        path.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tyresta_core::KeyDataId;

    #[test]
    fn test_load_private_keys() {
        let cases: [(&[u8], KeyDataId); 5] = [
            (include_bytes!("../testdata/rsa1024-key.pem"), KeyDataId::Rsa),
            (include_bytes!("../testdata/dsa1024-key.pem"), KeyDataId::Dsa),
            (include_bytes!("../testdata/dsa2048-key.pem"), KeyDataId::Dsa),
            (include_bytes!("../testdata/ec-p256-key.pem"), KeyDataId::Ec),
            (include_bytes!("../testdata/ec-p384-key.pem"), KeyDataId::Ec),
        ];
        for (pem, id) in cases {
            let key = load_pem(pem).unwrap();
            assert_eq!(key.key_id(), id);
            assert!(key.has_private());
            assert_eq!(key.usage, KeyUsage::Any);
        }
    }

    #[test]
    fn test_load_public_keys() {
        let rsa = load_pem(include_bytes!("../testdata/rsa1024-pubkey.pem")).unwrap();
        assert!(matches!(rsa.data, KeyData::Rsa { private: None, .. }));
        let dsa = load_pem(include_bytes!("../testdata/dsa1024-pubkey.pem")).unwrap();
        assert!(matches!(dsa.data, KeyData::Dsa { private: None, .. }));
        let ec = load_pem(include_bytes!("../testdata/ec-p256-pubkey.pem")).unwrap();
        assert!(matches!(ec.data, KeyData::EcP256 { private: None, .. }));
        assert_eq!(ec.usage, KeyUsage::Verify);
    }

    #[test]
    fn test_p384_is_not_p256() {
        let key = load_pem(include_bytes!("../testdata/ec-p384-key.pem")).unwrap();
        assert!(matches!(key.data, KeyData::EcP384 { .. }));
        assert_eq!(key.to_signing_key().half_size(), Some(48));
    }

    #[test]
    fn test_load_der_file() {
        let (_, der) =
            pem_rfc7468::decode_vec(include_bytes!("../testdata/dsa1024-key.pem")).unwrap();
        let path = std::env::temp_dir().join(format!("tyresta-dsa-{}.der", std::process::id()));
        std::fs::write(&path, &der).unwrap();
        let key = load_key_file(&path);
        std::fs::remove_file(&path).unwrap();
        let key = key.unwrap();
        assert_eq!(key.key_id(), KeyDataId::Dsa);
        assert_eq!(key.to_signing_key().half_size(), Some(20));
    }

    #[test]
    fn test_unsupported_label() {
        let pem = b"-----BEGIN CERTIFICATE REQUEST-----\nAAAA\n-----END CERTIFICATE REQUEST-----\n";
        assert!(matches!(load_pem(pem).unwrap_err(), Error::Key(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_key_file(std::path::Path::new("/nonexistent/tyresta.pem")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
