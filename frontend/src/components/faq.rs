use yew::prelude::*;

/// Clicking the open item closes it, clicking any other item opens that one
/// instead.
pub fn toggle_open(open: Option<usize>, clicked: usize) -> Option<usize> {
    if open == Some(clicked) {
        None
    } else {
        Some(clicked)
    }
}

pub const FAQ_ITEMS: &[(&str, &str)] = &[
    (
        "¿Cuándo estará disponible Senda?",
        "Estamos terminando la versión beta. Las personas en la lista de espera serán las primeras en probarla.",
    ),
    (
        "¿Necesito experiencia previa?",
        "No. Senda adapta cada plan a tu punto de partida, tanto si empiezas desde cero como si ya entrenas.",
    ),
    (
        "¿Habrá una versión gratuita?",
        "Sí. El plan gratuito incluye seguimiento de hábitos y rutinas básicas. Los planes de pago añaden acompañamiento personalizado.",
    ),
    (
        "¿Qué pasa con mis datos?",
        "Lo que escribes en esta página se guarda solo en tu navegador hasta que te unes a la lista. Puedes exportarlo o borrarlo desde el pie de página.",
    ),
];

#[derive(Properties, PartialEq)]
pub struct FaqItemProps {
    pub question: AttrValue,
    pub open: bool,
    pub on_toggle: Callback<()>,
    pub children: Children,
}

#[function_component(FaqItem)]
pub fn faq_item(props: &FaqItemProps) -> Html {
    let toggle = {
        let on_toggle = props.on_toggle.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            on_toggle.emit(());
        })
    };

    html! {
        <div class={classes!("faq-item", props.open.then_some("open"))}>
            <button class="faq-question" onclick={toggle}>
                <span class="question-text">{props.question.to_string()}</span>
                <span class="toggle-icon">{if props.open { "−" } else { "+" }}</span>
            </button>
            <div class="faq-answer">
                { for props.children.iter() }
            </div>
        </div>
    }
}

#[function_component(FaqSection)]
pub fn faq_section() -> Html {
    let open = use_state(|| None::<usize>);

    html! {
        <section id="faq" class="faq-section">
            <style>
                {r#"
                .faq-section {
                    padding: 6rem 2rem;
                    max-width: 800px;
                    margin: 0 auto;
                }
                .faq-item {
                    border-bottom: 1px solid rgba(74, 124, 89, 0.2);
                }
                .faq-question {
                    width: 100%;
                    display: flex;
                    justify-content: space-between;
                    align-items: center;
                    padding: 1.25rem 0;
                    background: none;
                    border: none;
                    font-size: 1.1rem;
                    text-align: left;
                    cursor: pointer;
                    color: inherit;
                }
                .faq-answer {
                    max-height: 0;
                    overflow: hidden;
                    transition: max-height 0.3s ease;
                }
                .faq-item.open .faq-answer {
                    max-height: 400px;
                    padding-bottom: 1.25rem;
                }
                "#}
            </style>
            <div class="section-header">
                <h2>{"Preguntas frecuentes"}</h2>
            </div>
            {
                FAQ_ITEMS.iter().enumerate().map(|(index, (question, answer))| {
                    let on_toggle = {
                        let open = open.clone();
                        Callback::from(move |_| open.set(toggle_open(*open, index)))
                    };
                    html! {
                        <FaqItem
                            question={*question}
                            open={*open == Some(index)}
                            {on_toggle}
                        >
                            <p>{*answer}</p>
                        </FaqItem>
                    }
                }).collect::<Html>()
            }
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_item_is_open() {
        let open = toggle_open(None, 1);
        assert_eq!(open, Some(1));
        let open = toggle_open(open, 3);
        assert_eq!(open, Some(3));
    }

    #[test]
    fn clicking_the_open_item_closes_it() {
        assert_eq!(toggle_open(Some(2), 2), None);
    }
}
