//! Issuing and checking one-time verification codes.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;

use facilityhub_core::TenantId;
use facilityhub_mail::{
    MailError, MailFormatter, MailTransport, OTP_EXPIRY_MINUTES, OtpMailFormatter, OtpRequest,
    OtpType, RenderedMail,
};

use crate::cache::{Cache, CacheError};

pub const OTP_TTL: Duration = Duration::from_secs(OTP_EXPIRY_MINUTES as u64 * 60);

#[derive(Debug, Error)]
pub enum OtpError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Mail(#[from] MailError),
}

/// Result of a successful issue. The code itself is never echoed to clients.
#[derive(Debug, Clone)]
pub struct IssuedOtp {
    pub email: String,
    pub otp_type: OtpType,
    pub mail: RenderedMail,
}

pub fn cache_key(tenant_id: TenantId, otp_type: &OtpType, email: &str) -> String {
    format!("otp:{tenant_id}:{}:{}", otp_type.as_str(), email.to_lowercase())
}

/// Six decimal digits, zero padded.
pub fn generate_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{:06}", rng.gen_range(0..1_000_000u32))
}

pub struct OtpIssuer {
    cache: Arc<dyn Cache>,
    transport: Arc<dyn MailTransport>,
}

impl OtpIssuer {
    pub fn new(cache: Arc<dyn Cache>, transport: Arc<dyn MailTransport>) -> Self {
        Self { cache, transport }
    }

    pub fn issue(
        &self,
        tenant_id: TenantId,
        email: &str,
        otp_type: OtpType,
    ) -> Result<IssuedOtp, OtpError> {
        let code = generate_code(&mut rand::thread_rng());
        self.issue_with_code(tenant_id, email, otp_type, code)
    }

    /// Store `code` and mail it. A new code replaces any pending one.
    pub fn issue_with_code(
        &self,
        tenant_id: TenantId,
        email: &str,
        otp_type: OtpType,
        code: String,
    ) -> Result<IssuedOtp, OtpError> {
        let key = cache_key(tenant_id, &otp_type, email);
        self.cache.put(&key, &code, OTP_TTL)?;

        let mail = OtpMailFormatter::new(OtpRequest::new(code, otp_type.clone())).render()?;
        self.transport.send(email, &mail)?;

        tracing::info!(tenant_id = %tenant_id, otp_type = otp_type.as_str(), "otp issued");

        Ok(IssuedOtp {
            email: email.to_string(),
            otp_type,
            mail,
        })
    }

    /// Check `code`; a match consumes it.
    pub fn verify(
        &self,
        tenant_id: TenantId,
        email: &str,
        otp_type: &OtpType,
        code: &str,
    ) -> Result<bool, OtpError> {
        let key = cache_key(tenant_id, otp_type, email);
        Ok(self.cache.take_if(&key, code)?)
    }
}
