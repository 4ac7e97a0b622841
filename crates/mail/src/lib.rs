//! `facilityhub-mail` — transactional mail content and delivery seams.
//!
//! Formatting is pure. Delivery goes through [`MailTransport`]; the real SMTP
//! or API client lives outside this crate.

pub mod formatter;
pub mod otp;
pub mod transport;

pub use formatter::{MailFormatter, RenderedMail};
pub use otp::{OTP_EXPIRY_MINUTES, OTP_SUBJECT, OtpMailContext, OtpMailFormatter, OtpRequest, OtpType};
pub use transport::{LogTransport, MailError, MailTransport, OutboxTransport, SentMail};
