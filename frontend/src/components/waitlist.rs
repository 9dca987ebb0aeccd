use std::rc::Rc;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use gloo_timers::callback::Timeout;
use log::{error, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::survey::{
    focus_question, AnswerChange, AnswerError, Field, QuestionKind, SurveyAccordion, SurveyAction,
    SurveyAnswers, SurveyModel, MODULE_LIMIT_MESSAGE, QUESTIONS,
};
use crate::components::toast::Toaster;
use crate::email::{send_signup, DispatchError};
use crate::storage::{LocalStore, StorageError, StorageKey};

/// Radio answers close their question a moment after the click.
const RADIO_COMPLETE_DELAY_MS: u32 = 300;

pub const SUCCESS_MESSAGE: &str = "¡Gracias! Te hemos agregado a la lista de espera.";
pub const FAILURE_MESSAGE: &str = "No pudimos registrarte. Inténtalo de nuevo en unos minutos.";

pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"))
        .is_match(email.trim())
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Por favor ingresa tu nombre")]
    MissingName,
    #[error("Por favor ingresa un email válido")]
    InvalidEmail,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WaitlistSubmission {
    pub name: String,
    pub email: String,
    #[serde(flatten)]
    pub answers: SurveyAnswers,
}

impl WaitlistSubmission {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(())
    }
}

/// What ends up in `senda_waitlist`, one entry per signup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignupRecord {
    #[serde(flatten)]
    pub submission: WaitlistSubmission,
    pub submitted_at: DateTime<Utc>,
}

/// Appends the signup, remembers the email and drops the survey draft.
/// Every step runs even when an earlier one fails, so a submitted survey
/// never comes back as a draft. Returns the number of stored signups, or
/// the first failure.
pub fn record_signup(
    store: &LocalStore,
    submission: &WaitlistSubmission,
    at: DateTime<Utc>,
) -> Result<usize, StorageError> {
    let pushed = store.push(
        StorageKey::Waitlist,
        SignupRecord {
            submission: submission.clone(),
            submitted_at: at,
        },
    );
    let remembered = store.set(StorageKey::WaitlistEmail, submission.email.trim());
    let cleared = store.remove(StorageKey::SurveyDraft);

    let count = pushed?;
    remembered?;
    cleared?;
    Ok(count)
}

fn is_answered(answers: &SurveyAnswers, field: Field) -> bool {
    match field {
        Field::Barriers => !answers.barriers.is_empty(),
        Field::Modules => !answers.modules.is_empty(),
        Field::Pricing => answers.pricing.is_some(),
        Field::Approach => answers.approach.is_some(),
    }
}

#[function_component(WaitlistForm)]
pub fn waitlist_form() -> Html {
    let store = use_context::<LocalStore>().unwrap_or_else(LocalStore::open);
    let toaster = use_context::<Toaster>();

    let model = use_reducer(|| SurveyModel::new(QUESTIONS.len()));
    let answers = {
        let store = store.clone();
        use_state(move || {
            store
                .get::<SurveyAnswers>(StorageKey::SurveyDraft)
                .unwrap_or_default()
        })
    };
    let name = use_state(String::new);
    let email = use_state(String::new);
    let submitting = use_state(|| false);

    // A restored draft keeps its progress.
    {
        let answers = answers.clone();
        let dispatcher = model.dispatcher();
        use_effect_with_deps(
            move |_| {
                for (index, question) in QUESTIONS.iter().enumerate() {
                    if is_answered(&answers, question.field) {
                        dispatcher.dispatch(SurveyAction::Complete(index));
                    }
                }
                || ()
            },
            (),
        );
    }

    let on_toggle = {
        let dispatcher = model.dispatcher();
        Callback::from(move |index: usize| dispatcher.dispatch(SurveyAction::Toggle(index)))
    };

    let on_next = {
        let dispatcher = model.dispatcher();
        Callback::from(move |index: usize| {
            dispatcher.dispatch(SurveyAction::Advance(index));
            let next = index + 1;
            if next < QUESTIONS.len() {
                Timeout::new(0, move || focus_question(next)).forget();
            }
        })
    };

    let on_change = {
        let answers = answers.clone();
        let store = store.clone();
        let toaster = toaster.clone();
        let dispatcher = model.dispatcher();
        Callback::from(move |change: AnswerChange| {
            let mut next = (*answers).clone();
            match next.set(change.field, &change.value, change.checked) {
                Ok(()) => {}
                Err(AnswerError::TooManyModules) => {
                    if let Some(toaster) = &toaster {
                        toaster.error(MODULE_LIMIT_MESSAGE);
                    }
                    return;
                }
            }

            let single = QUESTIONS
                .get(change.question)
                .map_or(false, |q| q.kind == QuestionKind::Single);
            if single && change.checked {
                let dispatcher = dispatcher.clone();
                let index = change.question;
                Timeout::new(RADIO_COMPLETE_DELAY_MS, move || {
                    dispatcher.dispatch(SurveyAction::Complete(index))
                })
                .forget();
            }

            // failures are logged by the store; the draft is a convenience
            let _ = store.set(StorageKey::SurveyDraft, &next);
            answers.set(next);
        })
    };

    let oninput_name = {
        let name = name.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            name.set(input.value());
        })
    };

    let oninput_email = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            email.set(input.value());
        })
    };

    let onsubmit = {
        let name = name.clone();
        let email = email.clone();
        let answers = answers.clone();
        let submitting = submitting.clone();
        let dispatcher = model.dispatcher();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *submitting {
                return;
            }

            let submission = WaitlistSubmission {
                name: (*name).clone(),
                email: (*email).clone(),
                answers: (*answers).clone(),
            };
            if let Err(e) = submission.validate() {
                if let Some(toaster) = &toaster {
                    toaster.error(e.to_string());
                }
                return;
            }

            submitting.set(true);
            let name = name.clone();
            let email = email.clone();
            let answers = answers.clone();
            let submitting = submitting.clone();
            let dispatcher = dispatcher.clone();
            let store = store.clone();
            let toaster = toaster.clone();
            spawn_local(async move {
                let outcome = match send_signup(&submission).await {
                    Err(DispatchError::NotConfigured) => {
                        warn!("Email service not configured, keeping signup locally only");
                        Ok(())
                    }
                    other => other,
                };

                match outcome {
                    Ok(()) => {
                        match record_signup(&store, &submission, Utc::now()) {
                            Ok(count) => info!("Stored waitlist signup #{}", count),
                            Err(e) => error!("Could not store waitlist signup: {}", e),
                        }
                        if let Some(toaster) = &toaster {
                            toaster.success(SUCCESS_MESSAGE);
                        }
                        name.set(String::new());
                        email.set(String::new());
                        answers.set(SurveyAnswers::default());
                        dispatcher.dispatch(SurveyAction::Reset);
                    }
                    Err(e) => {
                        error!("Waitlist signup failed: {}", e);
                        if let Some(toaster) = &toaster {
                            toaster.error(FAILURE_MESSAGE);
                        }
                    }
                }
                submitting.set(false);
            });
        })
    };

    html! {
        <section id="waitlist" class="waitlist-section">
            <style>
                {r#"
                .waitlist-section {
                    padding: 6rem 2rem;
                    background: linear-gradient(180deg, #fff 0%, rgba(168, 213, 186, 0.15) 100%);
                }
                .waitlist-container {
                    max-width: 720px;
                    margin: 0 auto;
                }
                .waitlist-form {
                    display: flex;
                    flex-direction: column;
                    gap: 1rem;
                }
                .waitlist-form input[type="text"],
                .waitlist-form input[type="email"] {
                    padding: 0.9rem 1rem;
                    border: 1px solid rgba(74, 124, 89, 0.3);
                    border-radius: 10px;
                    font-size: 1rem;
                }
                .waitlist-form button[type="submit"]:disabled {
                    opacity: 0.6;
                    cursor: wait;
                }
                @media (max-width: 768px) {
                    .waitlist-section {
                        padding: 4rem 1rem;
                    }
                }
                "#}
            </style>
            <div class="waitlist-container">
                <div class="section-header">
                    <h2>{"Únete a la lista de espera"}</h2>
                    <p>{"Cuéntanos un poco sobre ti y te avisaremos cuando SENDA esté lista."}</p>
                </div>
                <form id="waitlistForm" class="waitlist-form" {onsubmit}>
                    <input
                        id="waitlistName"
                        type="text"
                        placeholder="Tu nombre"
                        value={(*name).clone()}
                        oninput={oninput_name}
                    />
                    <input
                        id="waitlistEmail"
                        type="email"
                        placeholder="tu@email.com"
                        value={(*email).clone()}
                        oninput={oninput_email}
                    />
                    <SurveyAccordion
                        model={Rc::new((*model).clone())}
                        answers={(*answers).clone()}
                        {on_toggle}
                        {on_next}
                        {on_change}
                    />
                    <button type="submit" class="btn-cta" disabled={*submitting}>
                        if *submitting {
                            {"Enviando..."}
                        } else {
                            {"Unirme a la lista de espera"}
                        }
                    </button>
                </form>
            </div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryBackend, RejectingBackend};
    use chrono::TimeZone;
    use serde_json::Value;

    fn submission(name: &str, email: &str) -> WaitlistSubmission {
        WaitlistSubmission {
            name: name.to_string(),
            email: email.to_string(),
            answers: SurveyAnswers::default(),
        }
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("ana@senda.mx"));
        assert!(is_valid_email("  ana.perez@correo.example.com "));
        assert!(!is_valid_email("ana@senda"));
        assert!(!is_valid_email("ana senda@mx.com"));
        assert!(!is_valid_email("@senda.mx"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn validation_messages() {
        assert_eq!(
            submission("  ", "ana@senda.mx").validate(),
            Err(ValidationError::MissingName)
        );
        let err = submission("Ana", "ana@").validate().unwrap_err();
        assert_eq!(err.to_string(), "Por favor ingresa un email válido");
        assert!(submission("Ana", "ana@senda.mx").validate().is_ok());
    }

    #[test]
    fn record_signup_persists_and_clears_draft() {
        let store = LocalStore::with_backend(MemoryBackend::default());
        store
            .set(StorageKey::SurveyDraft, &SurveyAnswers::default())
            .unwrap();
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();

        let mut signup = submission("Ana", " ana@senda.mx ");
        signup.answers.pricing = Some("149".into());
        assert_eq!(record_signup(&store, &signup, at).unwrap(), 1);

        assert_eq!(
            store.get::<String>(StorageKey::WaitlistEmail).as_deref(),
            Some("ana@senda.mx")
        );
        assert_eq!(store.get::<Value>(StorageKey::SurveyDraft), None);

        let records: Vec<SignupRecord> = store.get(StorageKey::Waitlist).unwrap();
        assert_eq!(records[0].submitted_at, at);
        assert_eq!(records[0].submission.answers.pricing.as_deref(), Some("149"));

        let raw: Vec<Value> = store.get(StorageKey::Waitlist).unwrap();
        assert_eq!(raw[0]["name"], "Ana");
        assert_eq!(raw[0]["pricing"], "149");
    }

    #[test]
    fn record_signup_clears_draft_when_email_write_fails() {
        let store = LocalStore::with_backend(RejectingBackend::new(StorageKey::WaitlistEmail));
        store
            .set(StorageKey::SurveyDraft, &SurveyAnswers::default())
            .unwrap();
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();

        let result = record_signup(&store, &submission("Ana", "ana@senda.mx"), at);
        assert!(matches!(result, Err(StorageError::Backend(_))));

        let records: Vec<SignupRecord> = store.get(StorageKey::Waitlist).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(store.get::<Value>(StorageKey::SurveyDraft), None);
    }

    #[test]
    fn record_signup_reports_a_failed_append() {
        let store = LocalStore::with_backend(RejectingBackend::new(StorageKey::Waitlist));
        store
            .set(StorageKey::SurveyDraft, &SurveyAnswers::default())
            .unwrap();
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();

        assert!(record_signup(&store, &submission("Ana", "ana@senda.mx"), at).is_err());
        assert_eq!(
            store.get::<String>(StorageKey::WaitlistEmail).as_deref(),
            Some("ana@senda.mx")
        );
        assert_eq!(store.get::<Value>(StorageKey::SurveyDraft), None);
    }

    #[test]
    fn answered_fields() {
        let mut answers = SurveyAnswers::default();
        assert!(!is_answered(&answers, Field::Barriers));
        answers.set(Field::Approach, "guiado", true).unwrap();
        assert!(is_answered(&answers, Field::Approach));
        assert!(!is_answered(&answers, Field::Pricing));
    }
}
