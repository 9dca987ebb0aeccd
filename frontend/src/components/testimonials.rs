use std::rc::Rc;

use yew::prelude::*;
use yew_hooks::prelude::*;

pub const AUTO_ADVANCE_MS: u32 = 5000;

pub struct Testimonial {
    pub quote: &'static str,
    pub author: &'static str,
    pub role: &'static str,
}

pub const TESTIMONIALS: &[Testimonial] = &[
    Testimonial {
        quote: "Por fin una app que entiende que no tengo dos horas al día para entrenar.",
        author: "Marta G.",
        role: "Enfermera, turnos de noche",
    },
    Testimonial {
        quote: "Las recetas se adaptan a lo que ya tengo en la nevera. Eso lo cambia todo.",
        author: "Javier R.",
        role: "Padre de dos",
    },
    Testimonial {
        quote: "Llevo tres meses sin saltarme una semana. Nunca me había pasado.",
        author: "Lucía P.",
        role: "Estudiante de máster",
    },
];

/// Index `delta` slides away from `current`, wrapping both ways.
pub fn wrap_slide(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as isize;
    (current as isize + delta).rem_euclid(len) as usize
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Slide(pub usize);

pub enum SlideAction {
    Next,
    Go(usize),
}

impl Reducible for Slide {
    type Action = SlideAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let next = match action {
            SlideAction::Next => wrap_slide(self.0, 1, TESTIMONIALS.len()),
            SlideAction::Go(index) => wrap_slide(index, 0, TESTIMONIALS.len()),
        };
        Rc::new(Slide(next))
    }
}

#[function_component(TestimonialsSection)]
pub fn testimonials_section() -> Html {
    let slide = use_reducer(Slide::default);
    let current = slide.0;

    {
        let dispatcher = slide.dispatcher();
        use_interval(move || dispatcher.dispatch(SlideAction::Next), AUTO_ADVANCE_MS);
    }

    html! {
        <section id="testimonials" class="testimonials-section">
            <style>
                {r#"
                .testimonials-section {
                    padding: 6rem 2rem;
                    background: rgba(168, 213, 186, 0.12);
                }
                .testimonials-carousel {
                    max-width: 720px;
                    margin: 0 auto;
                    text-align: center;
                }
                .testimonial-slide {
                    display: none;
                }
                .testimonial-slide.active {
                    display: block;
                    animation: fadeIn 0.5s ease;
                }
                .testimonial-card blockquote {
                    font-size: 1.35rem;
                    font-style: italic;
                    margin: 0 0 1rem;
                }
                .carousel-dots {
                    display: flex;
                    justify-content: center;
                    gap: 0.5rem;
                    margin-top: 2rem;
                }
                .carousel-dot {
                    width: 10px;
                    height: 10px;
                    border-radius: 50%;
                    border: none;
                    padding: 0;
                    background: rgba(74, 124, 89, 0.3);
                    cursor: pointer;
                }
                .carousel-dot.active {
                    background: var(--verde-bosque);
                }
                @keyframes fadeIn {
                    from { opacity: 0; }
                    to { opacity: 1; }
                }
                "#}
            </style>
            <div class="section-header">
                <h2>{"Lo que dicen quienes ya la prueban"}</h2>
            </div>
            <div class="testimonials-carousel">
                {
                    TESTIMONIALS.iter().enumerate().map(|(index, t)| html! {
                        <div class={classes!("testimonial-slide", "testimonial-card", (current == index).then_some("active"))}>
                            <blockquote>{format!("“{}”", t.quote)}</blockquote>
                            <p class="testimonial-author"><strong>{t.author}</strong>{" · "}{t.role}</p>
                        </div>
                    }).collect::<Html>()
                }
                <div class="carousel-dots">
                    {
                        (0..TESTIMONIALS.len()).map(|index| {
                            let onclick = {
                                let dispatcher = slide.dispatcher();
                                Callback::from(move |_: MouseEvent| dispatcher.dispatch(SlideAction::Go(index)))
                            };
                            html! {
                                <button
                                    class={classes!("carousel-dot", (current == index).then_some("active"))}
                                    aria-label={format!("Testimonio {}", index + 1)}
                                    {onclick}
                                ></button>
                            }
                        }).collect::<Html>()
                    }
                </div>
            </div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slides_wrap_around() {
        assert_eq!(wrap_slide(0, 1, 3), 1);
        assert_eq!(wrap_slide(2, 1, 3), 0);
        assert_eq!(wrap_slide(0, -1, 3), 2);
        assert_eq!(wrap_slide(4, 0, 0), 0);
    }

    #[test]
    fn reducer_advances_and_jumps() {
        let slide = Rc::new(Slide::default()).reduce(SlideAction::Next);
        assert_eq!(slide.0, 1);
        let slide = slide.reduce(SlideAction::Go(TESTIMONIALS.len() - 1));
        let slide = slide.reduce(SlideAction::Next);
        assert_eq!(slide.0, 0);
    }
}
