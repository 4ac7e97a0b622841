use serde::Serialize;

use crate::MailError;

/// A fully rendered message, ready for a transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedMail {
    pub subject: String,
    /// Template identifier an HTML renderer would use.
    pub template: String,
    /// Variables handed to the template.
    pub context: serde_json::Value,
    /// Plain-text alternative body.
    pub text: String,
}

/// Produces the subject and body model of one kind of mail.
pub trait MailFormatter {
    type Context: Serialize;

    fn subject(&self) -> String;

    fn template(&self) -> &'static str;

    fn context(&self) -> Self::Context;

    fn text_body(&self) -> String;

    fn render(&self) -> Result<RenderedMail, MailError> {
        Ok(RenderedMail {
            subject: self.subject(),
            template: self.template().to_string(),
            context: serde_json::to_value(self.context())?,
            text: self.text_body(),
        })
    }
}
