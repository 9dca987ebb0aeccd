use yew::prelude::*;

use crate::components::counter::AnimatedCounter;
use crate::components::data_controls::DataControls;
use crate::components::faq::FaqSection;
use crate::components::mockup::{use_cta_tracking, PhoneMockup};
use crate::components::pricing::PricingSection;
use crate::components::progress::{ProgressSidebar, ScrollProgressBar};
use crate::components::reveal::{use_lazy_images, use_scroll_reveal};
use crate::components::testimonials::TestimonialsSection;
use crate::components::waitlist::WaitlistForm;
use crate::hero::component::ScrollExpansionHero;
use crate::hero::controller::HeroHandle;

const FEATURES: &[(&str, &str, &str)] = &[
    ("🌱", "Hábitos que se quedan", "Pequeños objetivos diarios que crecen contigo en lugar de exigirte todo desde el primer día."),
    ("🏃", "Entrenamiento adaptativo", "Rutinas que se ajustan a tu tiempo, tu energía y el material que tienes a mano."),
    ("🥗", "Nutrición sin dietas", "Recetas y sugerencias basadas en lo que ya comes, sin contar calorías."),
    ("🧘", "Mente y descanso", "Meditaciones cortas y seguimiento del sueño para cerrar el círculo."),
];

const STEPS: &[(&str, &str)] = &[
    ("Cuéntanos tu punto de partida", "Un cuestionario breve sobre tus objetivos, tu rutina y lo que te ha frenado antes."),
    ("Recibe tu senda", "Un plan semanal con entrenamiento, comidas y descanso pensado para ti."),
    ("Avanza a tu ritmo", "Senda aprende de tus días buenos y malos y ajusta el camino sin culpa."),
];

const STATS: &[(u64, &str, &str)] = &[
    (12500, "+", "personas en la lista de espera"),
    (87, "%", "mantienen el hábito tras un mes"),
    (15, " min", "al día es todo lo que necesitas"),
];

#[function_component(Landing)]
pub fn landing() -> Html {
    let hero = use_state(HeroHandle::from_location);

    use_scroll_reveal();
    use_lazy_images();
    use_cta_tracking();

    html! {
        <ContextProvider<HeroHandle> context={(*hero).clone()}>
            <style>
                {r#"
                .landing-section {
                    padding: 6rem 2rem;
                }
                .section-header {
                    text-align: center;
                    max-width: 680px;
                    margin: 0 auto 3rem;
                }
                .section-header h2 {
                    font-size: clamp(1.8rem, 4vw, 2.6rem);
                    color: var(--verde-bosque);
                }
                .scroll-reveal, .scroll-reveal-stagger {
                    opacity: 0;
                    transform: translateY(30px);
                    transition: opacity 0.6s ease, transform 0.6s ease;
                }
                .scroll-reveal-stagger:nth-child(2) { transition-delay: 0.1s; }
                .scroll-reveal-stagger:nth-child(3) { transition-delay: 0.2s; }
                .scroll-reveal-stagger:nth-child(4) { transition-delay: 0.3s; }
                .scroll-reveal.revealed, .scroll-reveal-stagger.revealed {
                    opacity: 1;
                    transform: none;
                }
                .features-grid {
                    display: grid;
                    grid-template-columns: repeat(auto-fit, minmax(240px, 1fr));
                    gap: 2rem;
                    max-width: 1100px;
                    margin: 0 auto;
                }
                .feature-card {
                    padding: 2rem;
                    border-radius: 16px;
                    background: #fff;
                    box-shadow: 0 6px 24px rgba(0, 0, 0, 0.06);
                }
                .feature-icon {
                    font-size: 2rem;
                }
                .steps {
                    display: flex;
                    flex-direction: column;
                    gap: 2rem;
                    max-width: 760px;
                    margin: 0 auto;
                }
                .step {
                    display: flex;
                    gap: 1.5rem;
                    align-items: flex-start;
                }
                .step-number {
                    flex: 0 0 48px;
                    height: 48px;
                    border-radius: 50%;
                    display: flex;
                    align-items: center;
                    justify-content: center;
                    background: var(--verde-bosque);
                    color: #fff;
                    font-weight: 700;
                }
                .stats-grid {
                    display: grid;
                    grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
                    gap: 2rem;
                    max-width: 960px;
                    margin: 0 auto;
                    text-align: center;
                }
                .stat-item .counter {
                    font-size: 2.8rem;
                    font-weight: 700;
                    color: var(--verde-bosque);
                }
                .cta-section {
                    text-align: center;
                    background: var(--verde-bosque);
                    color: #fff;
                }
                .cta-section .section-header h2 {
                    color: #fff;
                }
                .landing-footer {
                    padding: 3rem 2rem;
                    display: flex;
                    flex-wrap: wrap;
                    justify-content: space-between;
                    gap: 1rem;
                    font-size: 0.9rem;
                    color: #666;
                }
                .footer-link {
                    background: none;
                    border: none;
                    color: inherit;
                    text-decoration: underline;
                    cursor: pointer;
                    margin-right: 1rem;
                }
                @media (max-width: 768px) {
                    .landing-section {
                        padding: 4rem 1rem;
                    }
                }
                "#}
            </style>
            <ScrollProgressBar />
            <ProgressSidebar />
            <ScrollExpansionHero
                media_src="/assets/senda-hero.jpg"
                background_src="/assets/senda-bosque.jpg"
                title_first="Tu senda"
                title_rest="hacia el bienestar"
                date="Próximamente 2025"
            >
                <div class="landing-section hero-intro">
                    <div class="section-header">
                        <h2>{"Bienestar a tu medida"}</h2>
                        <p>{"Senda combina entrenamiento, nutrición y descanso en un solo plan que se adapta a tu vida, no al revés."}</p>
                    </div>
                    <PhoneMockup />
                </div>
            </ScrollExpansionHero>

            <section id="features" class="landing-section features-section">
                <div class="section-header">
                    <h2>{"Todo lo que necesitas, nada que sobre"}</h2>
                </div>
                <div class="features-grid">
                    {
                        FEATURES.iter().map(|(icon, title, text)| html! {
                            <div class="feature-card">
                                <div class="feature-icon">{*icon}</div>
                                <h3>{*title}</h3>
                                <p>{*text}</p>
                            </div>
                        }).collect::<Html>()
                    }
                </div>
            </section>

            <section id="how" class="landing-section how-section">
                <div class="section-header">
                    <h2>{"Cómo funciona"}</h2>
                </div>
                <div class="steps">
                    {
                        STEPS.iter().enumerate().map(|(index, (title, text))| html! {
                            <div class="step">
                                <div class="step-number">{(index + 1).to_string()}</div>
                                <div>
                                    <h3>{*title}</h3>
                                    <p>{*text}</p>
                                </div>
                            </div>
                        }).collect::<Html>()
                    }
                </div>
            </section>

            <section class="landing-section stats-section">
                <div class="stats-grid">
                    {
                        STATS.iter().map(|(target, suffix, label)| html! {
                            <div class="stat-item">
                                <AnimatedCounter target={*target} suffix={*suffix} />
                                <p>{*label}</p>
                            </div>
                        }).collect::<Html>()
                    }
                </div>
            </section>

            <TestimonialsSection />
            <PricingSection />
            <FaqSection />
            <WaitlistForm />

            <section id="cta" class="landing-section cta-section">
                <div class="section-header">
                    <h2>{"Empieza tu senda"}</h2>
                    <p>{"Sé de las primeras personas en probarla."}</p>
                </div>
                <a href="#waitlist" class="btn-cta">{"Únete a la lista de espera"}</a>
            </section>

            <footer class="landing-footer">
                <span>{"© Senda · contacto@senda.app"}</span>
                <DataControls />
            </footer>
        </ContextProvider<HeroHandle>>
    }
}
