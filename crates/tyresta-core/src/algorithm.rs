#![forbid(unsafe_code)]

//! Algorithm URI and name constants.
//!
//! Each `*` constant is the canonical URI that appears in `Algorithm`
//! attributes; each `NAME_*` constant is the short name a transform klass
//! is registered under. Lookups accept either form.

// ── Digest algorithms ────────────────────────────────────────────────

pub const SHA1: &str = "http://www.w3.org/2000/09/xmldsig#sha1";
pub const SHA224: &str = "http://www.w3.org/2001/04/xmldsig-more#sha224";
pub const SHA256: &str = "http://www.w3.org/2001/04/xmlenc#sha256";
pub const SHA384: &str = "http://www.w3.org/2001/04/xmldsig-more#sha384";
pub const SHA512: &str = "http://www.w3.org/2001/04/xmlenc#sha512";

pub const NAME_SHA1: &str = "sha1";
pub const NAME_SHA224: &str = "sha224";
pub const NAME_SHA256: &str = "sha256";
pub const NAME_SHA384: &str = "sha384";
pub const NAME_SHA512: &str = "sha512";

// ── RSA signature algorithms ─────────────────────────────────────────

pub const RSA_SHA1: &str = "http://www.w3.org/2000/09/xmldsig#rsa-sha1";
pub const RSA_SHA224: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha224";
pub const RSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256";
pub const RSA_SHA384: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha384";
pub const RSA_SHA512: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha512";

pub const NAME_RSA_SHA1: &str = "rsa-sha1";
pub const NAME_RSA_SHA224: &str = "rsa-sha224";
pub const NAME_RSA_SHA256: &str = "rsa-sha256";
pub const NAME_RSA_SHA384: &str = "rsa-sha384";
pub const NAME_RSA_SHA512: &str = "rsa-sha512";

// ── DSA signature algorithms ─────────────────────────────────────────

pub const DSA_SHA1: &str = "http://www.w3.org/2000/09/xmldsig#dsa-sha1";
pub const DSA_SHA256: &str = "http://www.w3.org/2009/xmldsig11#dsa-sha256";

pub const NAME_DSA_SHA1: &str = "dsa-sha1";
pub const NAME_DSA_SHA256: &str = "dsa-sha256";

// ── ECDSA signature algorithms ───────────────────────────────────────

pub const ECDSA_SHA1: &str = "http://www.w3.org/2001/04/xmldsig-more#ecdsa-sha1";
pub const ECDSA_SHA224: &str = "http://www.w3.org/2001/04/xmldsig-more#ecdsa-sha224";
pub const ECDSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#ecdsa-sha256";
pub const ECDSA_SHA384: &str = "http://www.w3.org/2001/04/xmldsig-more#ecdsa-sha384";
pub const ECDSA_SHA512: &str = "http://www.w3.org/2001/04/xmldsig-more#ecdsa-sha512";

pub const NAME_ECDSA_SHA1: &str = "ecdsa-sha1";
pub const NAME_ECDSA_SHA224: &str = "ecdsa-sha224";
pub const NAME_ECDSA_SHA256: &str = "ecdsa-sha256";
pub const NAME_ECDSA_SHA384: &str = "ecdsa-sha384";
pub const NAME_ECDSA_SHA512: &str = "ecdsa-sha512";

// ── Transform algorithms ─────────────────────────────────────────────

pub const BASE64: &str = "http://www.w3.org/2000/09/xmldsig#base64";
pub const NAME_BASE64: &str = "base64";

// ── KeyValue type URIs ───────────────────────────────────────────────

pub const RSA_KEY_VALUE: &str = "http://www.w3.org/2000/09/xmldsig#RSAKeyValue";
pub const DSA_KEY_VALUE: &str = "http://www.w3.org/2000/09/xmldsig#DSAKeyValue";
pub const EC_KEY_VALUE: &str = "http://www.w3.org/2009/xmldsig11#ECKeyValue";
