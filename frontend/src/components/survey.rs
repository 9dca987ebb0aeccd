use std::collections::BTreeSet;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use web_sys::{HtmlInputElement, ScrollLogicalPosition};
use yew::prelude::*;

use crate::hero::controller::scroll_into_view;

pub const MAX_MODULES: usize = 3;
pub const MODULE_LIMIT_MESSAGE: &str = "Solo puedes seleccionar hasta 3 módulos";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionKind {
    /// Several answers, stored in a list.
    Multiple,
    /// One answer; choosing it completes the question.
    Single,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Barriers,
    Pricing,
    Approach,
    Modules,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Barriers => "barriers",
            Field::Pricing => "pricing",
            Field::Approach => "approach",
            Field::Modules => "modules",
        }
    }
}

pub struct Question {
    pub field: Field,
    pub kind: QuestionKind,
    pub title: &'static str,
    pub hint: Option<&'static str>,
    pub options: &'static [(&'static str, &'static str)],
}

pub const QUESTIONS: &[Question] = &[
    Question {
        field: Field::Barriers,
        kind: QuestionKind::Multiple,
        title: "¿Qué te impide cuidarte como te gustaría?",
        hint: Some("Marca todas las que apliquen"),
        options: &[
            ("tiempo", "Falta de tiempo"),
            ("motivacion", "Me cuesta mantener la motivación"),
            ("dinero", "Los gimnasios y nutricionistas son caros"),
            ("informacion", "Hay demasiada información contradictoria"),
        ],
    },
    Question {
        field: Field::Pricing,
        kind: QuestionKind::Single,
        title: "¿Cuánto pagarías al mes por Senda?",
        hint: None,
        options: &[
            ("0", "Solo la versión gratuita"),
            ("5", "Hasta 5 €"),
            ("10", "Hasta 10 €"),
            ("15", "Más de 10 €"),
        ],
    },
    Question {
        field: Field::Approach,
        kind: QuestionKind::Single,
        title: "¿Qué tipo de acompañamiento prefieres?",
        hint: None,
        options: &[
            ("ia", "Un asistente con IA disponible siempre"),
            ("humano", "Un profesional que revise mi progreso"),
            ("mixto", "Una mezcla de los dos"),
        ],
    },
    Question {
        field: Field::Modules,
        kind: QuestionKind::Multiple,
        title: "¿Qué módulos te interesan más?",
        hint: Some("Elige hasta 3"),
        options: &[
            ("entrenamiento", "Entrenamiento"),
            ("nutricion", "Nutrición"),
            ("meditacion", "Meditación"),
            ("sueno", "Sueño"),
            ("habitos", "Hábitos"),
        ],
    },
];

/// Which question is open and which ones are done.
#[derive(Clone, Debug, PartialEq)]
pub struct SurveyModel {
    total: usize,
    active: Option<usize>,
    completed: BTreeSet<usize>,
}

impl SurveyModel {
    /// All questions start closed.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            active: None,
            completed: BTreeSet::new(),
        }
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.active == Some(index)
    }

    pub fn is_completed(&self, index: usize) -> bool {
        self.completed.contains(&index)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Opens `index` and closes every other question, or closes it if it was
    /// already open.
    pub fn toggle(&mut self, index: usize) {
        if index >= self.total {
            return;
        }
        self.active = if self.is_open(index) { None } else { Some(index) };
    }

    pub fn mark_completed(&mut self, index: usize) -> bool {
        index < self.total && self.completed.insert(index)
    }

    /// "Siguiente": completes `index` and moves on. Returns the question that
    /// was opened, if any.
    pub fn advance(&mut self, index: usize) -> Option<usize> {
        self.mark_completed(index);
        let next = index + 1;
        self.active = (next < self.total).then_some(next);
        self.active
    }

    pub fn reset(&mut self) {
        self.completed.clear();
        self.active = (self.total > 0).then_some(0);
    }

    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed.len() as f64 / self.total as f64 * 100.0
    }

    pub fn progress_label(&self) -> String {
        format!("{} de {} completadas", self.completed.len(), self.total)
    }
}

pub enum SurveyAction {
    Toggle(usize),
    Advance(usize),
    Complete(usize),
    Reset,
}

impl Reducible for SurveyModel {
    type Action = SurveyAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            SurveyAction::Toggle(i) => next.toggle(i),
            SurveyAction::Advance(i) => {
                next.advance(i);
            }
            SurveyAction::Complete(i) => {
                if !next.mark_completed(i) {
                    return self;
                }
            }
            SurveyAction::Reset => next.reset(),
        }
        Rc::new(next)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyAnswers {
    pub barriers: Vec<String>,
    pub pricing: Option<String>,
    pub approach: Option<String>,
    pub modules: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnswerError {
    TooManyModules,
}

impl SurveyAnswers {
    pub fn is_selected(&self, field: Field, value: &str) -> bool {
        match field {
            Field::Barriers => self.barriers.iter().any(|v| v == value),
            Field::Modules => self.modules.iter().any(|v| v == value),
            Field::Pricing => self.pricing.as_deref() == Some(value),
            Field::Approach => self.approach.as_deref() == Some(value),
        }
    }

    /// Applies a checkbox/radio change. Checking a fourth module is refused.
    pub fn set(&mut self, field: Field, value: &str, checked: bool) -> Result<(), AnswerError> {
        match field {
            Field::Barriers => toggle_value(&mut self.barriers, value, checked),
            Field::Modules => {
                if checked && !self.is_selected(field, value) && self.modules.len() >= MAX_MODULES {
                    return Err(AnswerError::TooManyModules);
                }
                toggle_value(&mut self.modules, value, checked);
            }
            Field::Pricing => self.pricing = checked.then(|| value.to_string()),
            Field::Approach => self.approach = checked.then(|| value.to_string()),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self == &SurveyAnswers::default()
    }
}

fn toggle_value(list: &mut Vec<String>, value: &str, checked: bool) {
    let present = list.iter().any(|v| v == value);
    if checked && !present {
        list.push(value.to_string());
    } else if !checked {
        list.retain(|v| v != value);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnswerChange {
    pub question: usize,
    pub field: Field,
    pub value: String,
    pub checked: bool,
}

#[derive(Properties, PartialEq)]
pub struct SurveyAccordionProps {
    pub model: Rc<SurveyModel>,
    pub answers: SurveyAnswers,
    pub on_toggle: Callback<usize>,
    pub on_next: Callback<usize>,
    pub on_change: Callback<AnswerChange>,
}

pub fn question_dom_id(index: usize) -> String {
    format!("survey-question-{}", index)
}

/// Scrolls a freshly opened question to the middle of the viewport.
pub fn focus_question(index: usize) {
    if let Some(el) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(&question_dom_id(index)))
    {
        scroll_into_view(&el, ScrollLogicalPosition::Center);
    }
}

#[function_component(SurveyAccordion)]
pub fn survey_accordion(props: &SurveyAccordionProps) -> Html {
    let model = &props.model;

    html! {
        <div class="survey">
            <style>
                {r#"
                .survey-progress {
                    margin-bottom: 1.5rem;
                }
                .survey-progress-bar {
                    height: 6px;
                    background: rgba(74, 124, 89, 0.15);
                    border-radius: 3px;
                    overflow: hidden;
                }
                .survey-progress-fill {
                    height: 100%;
                    background: linear-gradient(90deg, var(--verde-bosque), var(--verde-agua));
                    transition: width 0.3s ease;
                }
                .survey-progress-text {
                    font-size: 0.85rem;
                    color: #666;
                    margin-top: 0.4rem;
                }
                .survey-question {
                    border: 1px solid rgba(74, 124, 89, 0.2);
                    border-radius: 12px;
                    margin-bottom: 0.75rem;
                    background: #fff;
                }
                .survey-question-header {
                    width: 100%;
                    display: flex;
                    justify-content: space-between;
                    align-items: center;
                    padding: 1rem 1.25rem;
                    background: none;
                    border: none;
                    font-size: 1rem;
                    text-align: left;
                    cursor: pointer;
                }
                .survey-question.completed .survey-question-header::after {
                    content: '✓';
                    color: var(--verde-bosque);
                }
                .survey-question-body {
                    display: none;
                    padding: 0 1.25rem 1.25rem;
                }
                .survey-question.active .survey-question-body {
                    display: block;
                }
                .survey-option {
                    display: flex;
                    gap: 0.6rem;
                    align-items: center;
                    padding: 0.35rem 0;
                }
                .survey-hint {
                    font-size: 0.85rem;
                    color: #777;
                }
                "#}
            </style>
            <div class="survey-progress">
                <div class="survey-progress-bar">
                    <div class="survey-progress-fill" style={format!("width: {}%;", model.percent())}></div>
                </div>
                <p class="survey-progress-text">{model.progress_label()}</p>
            </div>
            {
                QUESTIONS.iter().enumerate().map(|(index, question)| {
                    let onclick_header = {
                        let on_toggle = props.on_toggle.clone();
                        Callback::from(move |e: MouseEvent| {
                            e.prevent_default();
                            on_toggle.emit(index);
                        })
                    };
                    let onclick_next = {
                        let on_next = props.on_next.clone();
                        Callback::from(move |e: MouseEvent| {
                            e.prevent_default();
                            on_next.emit(index);
                        })
                    };
                    let input_type = match question.kind {
                        QuestionKind::Multiple => "checkbox",
                        QuestionKind::Single => "radio",
                    };
                    html! {
                        <div
                            id={question_dom_id(index)}
                            class={classes!(
                                "survey-question",
                                model.is_open(index).then_some("active"),
                                model.is_completed(index).then_some("completed"),
                            )}
                        >
                            <button type="button" class="survey-question-header" onclick={onclick_header}>
                                <span>{format!("{}. {}", index + 1, question.title)}</span>
                            </button>
                            <div class="survey-question-body">
                                if let Some(hint) = question.hint {
                                    <p class="survey-hint">{hint}</p>
                                }
                                {
                                    question.options.iter().map(|(value, label)| {
                                        let onchange = {
                                            let on_change = props.on_change.clone();
                                            let field = question.field;
                                            let limit_reached = field == Field::Modules
                                                && props.answers.modules.len() >= MAX_MODULES
                                                && !props.answers.is_selected(field, value);
                                            Callback::from(move |e: Event| {
                                                let input: HtmlInputElement = e.target_unchecked_into();
                                                let checked = input.checked();
                                                if limit_reached && checked {
                                                    input.set_checked(false);
                                                }
                                                on_change.emit(AnswerChange {
                                                    question: index,
                                                    field,
                                                    value: input.value(),
                                                    checked,
                                                });
                                            })
                                        };
                                        html! {
                                            <label class="survey-option">
                                                <input
                                                    type={input_type}
                                                    name={question.field.name()}
                                                    value={*value}
                                                    checked={props.answers.is_selected(question.field, value)}
                                                    {onchange}
                                                />
                                                <span>{*label}</span>
                                            </label>
                                        }
                                    }).collect::<Html>()
                                }
                                <button type="button" class="survey-next btn-secondary" onclick={onclick_next}>
                                    {"Siguiente"}
                                </button>
                            </div>
                        </div>
                    }
                }).collect::<Html>()
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_keeps_a_single_question_open() {
        let mut model = SurveyModel::new(4);
        assert_eq!(model.active(), None);
        model.toggle(1);
        assert!(model.is_open(1));
        model.toggle(2);
        assert!(model.is_open(2) && !model.is_open(1));
        model.toggle(2);
        assert_eq!(model.active(), None);
        model.toggle(9);
        assert_eq!(model.active(), None);
    }

    #[test]
    fn advance_completes_and_opens_next() {
        let mut model = SurveyModel::new(3);
        assert_eq!(model.advance(0), Some(1));
        assert!(model.is_completed(0));
        assert_eq!(model.advance(2), None);
        assert_eq!(model.active(), None);
        assert_eq!(model.progress_label(), "2 de 3 completadas");
    }

    #[test]
    fn completion_is_counted_once() {
        let mut model = SurveyModel::new(4);
        assert!(model.mark_completed(1));
        assert!(!model.mark_completed(1));
        model.advance(1);
        assert_eq!(model.completed_count(), 1);
        assert_eq!(model.percent(), 25.0);
    }

    #[test]
    fn reset_reopens_the_first_question() {
        let mut model = SurveyModel::new(4);
        model.advance(0);
        model.advance(1);
        model.reset();
        assert_eq!(model.completed_count(), 0);
        assert!(model.is_open(0));
        assert_eq!(SurveyModel::new(0).percent(), 0.0);
    }

    #[test]
    fn reducer_skips_redundant_completion() {
        let model = Rc::new(SurveyModel::new(2));
        let once = model.clone().reduce(SurveyAction::Complete(0));
        let twice = once.clone().reduce(SurveyAction::Complete(0));
        assert!(Rc::ptr_eq(&once, &twice));
    }

    #[test]
    fn module_selection_is_capped() {
        let mut answers = SurveyAnswers::default();
        for module in ["entrenamiento", "nutricion", "meditacion"] {
            answers.set(Field::Modules, module, true).unwrap();
        }
        assert_eq!(answers.set(Field::Modules, "sueno", true), Err(AnswerError::TooManyModules));
        // re-checking an already selected one is fine
        assert_eq!(answers.set(Field::Modules, "nutricion", true), Ok(()));
        answers.set(Field::Modules, "nutricion", false).unwrap();
        answers.set(Field::Modules, "sueno", true).unwrap();
        assert_eq!(answers.modules, vec!["entrenamiento", "meditacion", "sueno"]);
    }

    #[test]
    fn radio_answers_replace_each_other() {
        let mut answers = SurveyAnswers::default();
        assert!(answers.is_empty());
        answers.set(Field::Pricing, "5", true).unwrap();
        answers.set(Field::Pricing, "10", true).unwrap();
        assert!(answers.is_selected(Field::Pricing, "10"));
        assert!(!answers.is_selected(Field::Pricing, "5"));
        answers.set(Field::Barriers, "tiempo", true).unwrap();
        answers.set(Field::Barriers, "tiempo", true).unwrap();
        assert_eq!(answers.barriers, vec!["tiempo"]);
    }
}
