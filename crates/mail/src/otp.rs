//! One-time-password verification mail.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::MailFormatter;

pub const OTP_SUBJECT: &str = "Your Verification Code";
pub const OTP_EXPIRY_MINUTES: u32 = 5;
pub const OTP_TEMPLATE: &str = "emails.otp";

/// Purpose of a verification code.
///
/// Anything outside the known set is kept verbatim and used as its own label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OtpType {
    Registration,
    Login,
    PasswordReset,
    EmailChange,
    Other(String),
}

impl OtpType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "registration" => Self::Registration,
            "login" => Self::Login,
            "password_reset" => Self::PasswordReset,
            "email_change" => Self::EmailChange,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Registration => "registration",
            Self::Login => "login",
            Self::PasswordReset => "password_reset",
            Self::EmailChange => "email_change",
            Self::Other(raw) => raw,
        }
    }

    /// Human-readable label shown in the mail.
    pub fn label(&self) -> &str {
        match self {
            Self::Registration => "Registration",
            Self::Login => "Login",
            Self::PasswordReset => "Password Reset",
            Self::EmailChange => "Email Change",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for OtpType {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl Serialize for OtpType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OtpType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// A verification code to be mailed. The code is not checked here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRequest {
    pub code: String,
    #[serde(rename = "type")]
    pub otp_type: OtpType,
}

impl OtpRequest {
    pub fn new(code: impl Into<String>, otp_type: impl Into<OtpType>) -> Self {
        Self {
            code: code.into(),
            otp_type: otp_type.into(),
        }
    }
}

/// Variables the OTP template receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpMailContext {
    pub code: String,
    #[serde(rename = "type")]
    pub otp_type: String,
    pub type_label: String,
    pub expiry_minutes: u32,
}

#[derive(Debug, Clone)]
pub struct OtpMailFormatter {
    request: OtpRequest,
}

impl OtpMailFormatter {
    pub fn new(request: OtpRequest) -> Self {
        Self { request }
    }
}

impl MailFormatter for OtpMailFormatter {
    type Context = OtpMailContext;

    fn subject(&self) -> String {
        OTP_SUBJECT.to_string()
    }

    fn template(&self) -> &'static str {
        OTP_TEMPLATE
    }

    fn context(&self) -> OtpMailContext {
        OtpMailContext {
            code: self.request.code.clone(),
            otp_type: self.request.otp_type.as_str().to_string(),
            type_label: self.request.otp_type.label().to_string(),
            expiry_minutes: OTP_EXPIRY_MINUTES,
        }
    }

    fn text_body(&self) -> String {
        format!(
            "Your {} verification code is {}.\nIt expires in {} minutes. If you did not request it, ignore this email.",
            self.request.otp_type.label(),
            self.request.code,
            OTP_EXPIRY_MINUTES,
        )
    }
}
