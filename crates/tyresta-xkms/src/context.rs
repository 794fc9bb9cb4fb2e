#![forbid(unsafe_code)]

//! XKMS server context.

use crate::respond_with::{self, RespondWithId};
use std::fmt;
use tyresta_core::Error;
use tyresta_keys::Key;

/// Fail `read_respond_with` on an unknown `RespondWith` value instead of
/// skipping it.
pub const FLAGS_STOP_ON_UNKNOWN_RESPOND_WITH: u32 = 0x0000_0001;

/// Which request the server is processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerMode {
    LocateRequest,
    ValidateRequest,
}

/// XKMS `ResultMajor` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MajorResult {
    #[default]
    Success = 0,
    VersionMismatch = 1,
    Sender = 2,
    Receiver = 3,
    Represent = 4,
    Pending = 5,
}

impl MajorResult {
    pub fn name(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::VersionMismatch => "VersionMismatch",
            Self::Sender => "Sender",
            Self::Receiver => "Receiver",
            Self::Represent => "Represent",
            Self::Pending => "Pending",
        }
    }
}

impl fmt::Display for MajorResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// XKMS `ResultMinor` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MinorResult {
    #[default]
    None = 0,
    NoMatch = 1,
    TooManyResponses = 2,
    Incomplete = 3,
    Failure = 4,
    Refused = 5,
    NoAuthentication = 6,
    MessageNotSupported = 7,
    UnknownResponseId = 8,
    NotSynchronous = 9,
}

impl MinorResult {
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::NoMatch => "NoMatch",
            Self::TooManyResponses => "TooManyResponses",
            Self::Incomplete => "Incomplete",
            Self::Failure => "Failure",
            Self::Refused => "Refused",
            Self::NoAuthentication => "NoAuthentication",
            Self::MessageNotSupported => "MessageNotSupported",
            Self::UnknownResponseId => "UnknownResponseId",
            Self::NotSynchronous => "NotSynchronous",
        }
    }
}

impl fmt::Display for MinorResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `ResponseMechanism` values the requestor accepts, as a bit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResponseMechanism(u32);

impl ResponseMechanism {
    /// The service may answer with `Pending`.
    pub const PENDING: Self = Self(0x0000_0001);
    /// The service may use the two-phase protocol (`Represent`).
    pub const REPRESENT: Self = Self(0x0000_0002);
    /// The response may carry `<RequestSignatureValue>`.
    pub const REQUEST_SIGNATURE_VALUE: Self = Self(0x0000_0004);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Parse a `ResponseMechanism` element value.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Pending" => Some(Self::PENDING),
            "Represent" => Some(Self::REPRESENT),
            "RequestSignatureValue" => Some(Self::REQUEST_SIGNATURE_VALUE),
            _ => None,
        }
    }
}

/// Server-side XKMS processing state.
///
/// Fields up to `enabled_respond_with` are user preferences and survive
/// [`reset`](Self::reset); the rest describe the current request and its
/// result.
#[derive(Debug, Default)]
pub struct XkmsServerCtx {
    pub flags: u32,
    pub flags2: u32,
    /// Accepted `RespondWith` values. Empty accepts every registered one.
    pub enabled_respond_with: Vec<RespondWithId>,

    pub keys: Vec<Key>,
    pub major_error: MajorResult,
    pub minor_error: MinorResult,
    pub request_id: Option<String>,
    pub service: Option<String>,
    pub nonce: Option<String>,
    pub original_request_id: Option<String>,
    pub pending_notification_mechanism: Option<String>,
    pub pending_notification_identifier: Option<String>,
    /// `None` when the request sets no `ResponseLimit`.
    pub response_limit: Option<u32>,
    pub response_mechanism: ResponseMechanism,
    pub mode: Option<ServerMode>,
    pub respond_with: Vec<RespondWithId>,
}

impl XkmsServerCtx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a result code. The first non-success major code sticks; the
    /// minor code always follows the latest call.
    pub fn set_error(&mut self, major: MajorResult, minor: MinorResult) {
        if major != MajorResult::Success && self.major_error == MajorResult::Success {
            self.major_error = major;
        }
        self.minor_error = minor;
        tracing::debug!(%major, %minor, "xkms result set");
    }

    /// Clear everything derived from the current request.
    pub fn reset(&mut self) {
        self.keys.clear();
        self.major_error = MajorResult::Success;
        self.minor_error = MinorResult::None;
        self.request_id = None;
        self.service = None;
        self.nonce = None;
        self.original_request_id = None;
        self.pending_notification_mechanism = None;
        self.pending_notification_identifier = None;
        self.response_limit = None;
        self.response_mechanism = ResponseMechanism::default();
        self.mode = None;
        self.respond_with.clear();
    }

    /// Copy the user preferences of `src` into `self`.
    pub fn copy_user_pref(&mut self, src: &XkmsServerCtx) {
        self.flags = src.flags;
        self.flags2 = src.flags2;
        self.enabled_respond_with = src.enabled_respond_with.clone();
    }

    /// Resolve the request's `RespondWith` values.
    ///
    /// Known values are appended to `respond_with` once each. Unknown values
    /// are skipped, unless [`FLAGS_STOP_ON_UNKNOWN_RESPOND_WITH`] is set; then
    /// the result becomes `Sender`/`MessageNotSupported` and an error is
    /// returned.
    pub fn read_respond_with<'a>(
        &mut self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), Error> {
        let enabled = if self.enabled_respond_with.is_empty() {
            respond_with::ids()?
        } else {
            self.enabled_respond_with.clone()
        };

        for name in names {
            let name = name.trim();
            let Some(id) = respond_with::find_by_name(&enabled, name) else {
                if self.flags & FLAGS_STOP_ON_UNKNOWN_RESPOND_WITH != 0 {
                    self.set_error(MajorResult::Sender, MinorResult::MessageNotSupported);
                    return Err(Error::UnknownAlgorithm(format!("RespondWith: {name}")));
                }
                tracing::debug!(name, "skipping unknown RespondWith");
                continue;
            };
            if respond_with::find(&self.respond_with, &id).is_none() {
                self.respond_with.push(id);
            }
        }
        Ok(())
    }

    /// Whether `name` was requested.
    pub fn responds_with(&self, name: &str) -> bool {
        respond_with::find_by_name(&self.respond_with, name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tyresta_core::ns::respond_with as rw;

    fn ctx() -> XkmsServerCtx {
        respond_with::init().unwrap();
        XkmsServerCtx::new()
    }

    #[test]
    fn test_read_respond_with_dedups() {
        let mut ctx = ctx();
        ctx.read_respond_with([rw::KEY_VALUE, rw::KEY_NAME, " KeyValue "])
            .unwrap();
        assert_eq!(ctx.respond_with.len(), 2);
        assert!(ctx.responds_with(rw::KEY_NAME));
        assert!(!ctx.responds_with(rw::PGP));
    }

    #[test]
    fn test_unknown_skipped_by_default() {
        let mut ctx = ctx();
        ctx.read_respond_with(["Bogus", rw::X509_CERT]).unwrap();
        assert_eq!(ctx.respond_with.len(), 1);
        assert_eq!(ctx.major_error, MajorResult::Success);
    }

    #[test]
    fn test_unknown_stops_when_flagged() {
        let mut ctx = ctx();
        ctx.flags |= FLAGS_STOP_ON_UNKNOWN_RESPOND_WITH;
        let err = ctx.read_respond_with(["Bogus"]).unwrap_err();
        assert!(matches!(err, Error::UnknownAlgorithm(_)));
        assert_eq!(ctx.major_error, MajorResult::Sender);
        assert_eq!(ctx.minor_error, MinorResult::MessageNotSupported);
    }

    #[test]
    fn test_enabled_list_restricts() {
        let mut ctx = ctx();
        let all = respond_with::ids().unwrap();
        ctx.enabled_respond_with = vec![respond_with::find_by_name(&all, rw::KEY_NAME).unwrap()];
        ctx.read_respond_with([rw::KEY_NAME, rw::PRIVATE_KEY]).unwrap();
        assert_eq!(ctx.respond_with.len(), 1);
    }

    #[test]
    fn test_set_error_first_major_sticks() {
        let mut ctx = XkmsServerCtx::new();
        ctx.set_error(MajorResult::Receiver, MinorResult::Failure);
        ctx.set_error(MajorResult::Sender, MinorResult::NoMatch);
        assert_eq!(ctx.major_error, MajorResult::Receiver);
        assert_eq!(ctx.minor_error, MinorResult::NoMatch);
        assert_eq!(ctx.major_error as i32, 3);
        assert_eq!(MinorResult::NotSynchronous as i32, 9);
    }

    #[test]
    fn test_reset_keeps_user_prefs() {
        let mut ctx = ctx();
        ctx.flags = 7;
        ctx.enabled_respond_with = respond_with::ids().unwrap();
        ctx.request_id = Some("req-1".into());
        ctx.response_limit = Some(5);
        ctx.mode = Some(ServerMode::LocateRequest);
        ctx.response_mechanism.insert(ResponseMechanism::PENDING);
        ctx.read_respond_with([rw::SPKI]).unwrap();
        ctx.set_error(MajorResult::Pending, MinorResult::None);

        ctx.reset();
        assert_eq!(ctx.flags, 7);
        assert_eq!(ctx.enabled_respond_with.len(), 9);
        assert!(ctx.request_id.is_none());
        assert!(ctx.response_limit.is_none());
        assert!(ctx.mode.is_none());
        assert!(ctx.respond_with.is_empty());
        assert_eq!(ctx.response_mechanism.bits(), 0);
        assert_eq!(ctx.major_error, MajorResult::Success);
    }

    #[test]
    fn test_copy_user_pref() {
        let mut src = ctx();
        src.flags = FLAGS_STOP_ON_UNKNOWN_RESPOND_WITH;
        src.flags2 = 2;
        src.nonce = Some("n".into());
        let mut dst = XkmsServerCtx::new();
        dst.copy_user_pref(&src);
        assert_eq!(dst.flags, src.flags);
        assert_eq!(dst.flags2, 2);
        assert!(dst.nonce.is_none());
    }

    #[test]
    fn test_response_mechanism() {
        let mut m = ResponseMechanism::default();
        m.insert(ResponseMechanism::from_name("Represent").unwrap());
        m.insert(ResponseMechanism::REQUEST_SIGNATURE_VALUE);
        assert!(m.contains(ResponseMechanism::REPRESENT));
        assert!(!m.contains(ResponseMechanism::PENDING));
        assert_eq!(m.bits(), 6);
        assert!(ResponseMechanism::from_name("Bogus").is_none());
    }
}
