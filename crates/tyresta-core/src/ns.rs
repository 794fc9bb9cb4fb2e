#![forbid(unsafe_code)]

//! XML namespace and element-name constants used by the XKMS layer.

/// XKMS 2.0 namespace
pub const XKMS: &str = "http://www.w3.org/2002/03/xkms#";

// ── RespondWith values ───────────────────────────────────────────────

pub mod respond_with {
    pub const KEY_NAME: &str = "KeyName";
    pub const KEY_VALUE: &str = "KeyValue";
    pub const PRIVATE_KEY: &str = "PrivateKey";
    pub const RETRIEVAL_METHOD: &str = "RetrievalMethod";
    pub const X509_CERT: &str = "X509Cert";
    pub const X509_CHAIN: &str = "X509Chain";
    pub const X509_CRL: &str = "X509CRL";
    pub const PGP: &str = "PGP";
    pub const SPKI: &str = "SPKI";
}

pub mod node {
    pub const RESPOND_WITH: &str = "RespondWith";
}
