use log::Level;

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // verbose console output while developing locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

pub const EMAILJS_SEND_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmailSettings {
    pub service_id: &'static str,
    pub template_id: &'static str,
    pub public_key: &'static str,
}

/// EmailJS credentials are baked in at build time, e.g.
/// `SENDA_EMAILJS_SERVICE_ID=... trunk build --release`. Without them signups
/// are only kept in the visitor's browser.
pub fn email_settings() -> Option<EmailSettings> {
    Some(EmailSettings {
        service_id: option_env!("SENDA_EMAILJS_SERVICE_ID")?,
        template_id: option_env!("SENDA_EMAILJS_TEMPLATE_ID")?,
        public_key: option_env!("SENDA_EMAILJS_PUBLIC_KEY")?,
    })
    .filter(|s| !s.service_id.is_empty() && !s.template_id.is_empty() && !s.public_key.is_empty())
}
