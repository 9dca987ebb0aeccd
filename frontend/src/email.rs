//! Waitlist notifications through the EmailJS REST API.

use gloo_net::http::Request;
use log::info;
use serde::Serialize;
use thiserror::Error;

use crate::components::waitlist::WaitlistSubmission;
use crate::config::{self, EmailSettings};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("email service is not configured")]
    NotConfigured,
    #[error("request failed: {0}")]
    Network(#[from] gloo_net::Error),
    #[error("email service responded with status {0}")]
    Status(u16),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TemplateParams {
    pub name: String,
    pub email: String,
    pub barriers: String,
    pub pricing: String,
    pub approach: String,
    pub modules: String,
}

#[derive(Debug, Serialize)]
pub struct EmailJsRequest<'a> {
    pub service_id: &'a str,
    pub template_id: &'a str,
    pub user_id: &'a str,
    pub template_params: TemplateParams,
}

impl TemplateParams {
    pub fn from_submission(submission: &WaitlistSubmission) -> Self {
        let answers = &submission.answers;
        Self {
            name: submission.name.trim().to_string(),
            email: submission.email.trim().to_string(),
            barriers: answers.barriers.join(", "),
            pricing: answers.pricing.clone().unwrap_or_default(),
            approach: answers.approach.clone().unwrap_or_default(),
            modules: answers.modules.join(", "),
        }
    }
}

pub fn build_request<'a>(
    settings: &'a EmailSettings,
    submission: &WaitlistSubmission,
) -> EmailJsRequest<'a> {
    EmailJsRequest {
        service_id: settings.service_id,
        template_id: settings.template_id,
        user_id: settings.public_key,
        template_params: TemplateParams::from_submission(submission),
    }
}

pub async fn send_signup(submission: &WaitlistSubmission) -> Result<(), DispatchError> {
    let settings = config::email_settings().ok_or(DispatchError::NotConfigured)?;
    let body = build_request(&settings, submission);

    let response = Request::post(config::EMAILJS_SEND_URL)
        .json(&body)?
        .send()
        .await?;

    if !response.ok() {
        return Err(DispatchError::Status(response.status()));
    }
    info!("Waitlist signup sent for {}", body.template_params.email);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::survey::SurveyAnswers;
    use serde_json::json;

    #[test]
    fn request_matches_emailjs_shape() {
        let settings = EmailSettings {
            service_id: "service_x",
            template_id: "template_y",
            public_key: "pk_z",
        };
        let submission = WaitlistSubmission {
            name: " Lucía ".to_string(),
            email: "lucia@example.com".to_string(),
            answers: SurveyAnswers {
                barriers: vec!["tiempo".into(), "dinero".into()],
                pricing: Some("5".into()),
                approach: None,
                modules: vec!["nutricion".into()],
            },
        };

        let body = serde_json::to_value(build_request(&settings, &submission)).unwrap();
        assert_eq!(
            body,
            json!({
                "service_id": "service_x",
                "template_id": "template_y",
                "user_id": "pk_z",
                "template_params": {
                    "name": "Lucía",
                    "email": "lucia@example.com",
                    "barriers": "tiempo, dinero",
                    "pricing": "5",
                    "approach": "",
                    "modules": "nutricion"
                }
            })
        );
    }
}
