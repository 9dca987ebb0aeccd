use log::info;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::storage::{LocalStore, Preferences, StorageKey};

pub struct Plan {
    pub name: &'static str,
    pub tagline: &'static str,
    /// Euros per month on monthly billing.
    pub monthly: u32,
    /// Euros per month when paid yearly.
    pub yearly: u32,
    pub features: &'static [&'static str],
    pub highlighted: bool,
}

pub const PLANS: &[Plan] = &[
    Plan {
        name: "Semilla",
        tagline: "Para empezar a moverte",
        monthly: 0,
        yearly: 0,
        features: &["Seguimiento de hábitos", "Rutinas básicas", "Comunidad"],
        highlighted: false,
    },
    Plan {
        name: "Brote",
        tagline: "Tu plan, a tu ritmo",
        monthly: 9,
        yearly: 7,
        features: &[
            "Todo lo de Semilla",
            "Planes de entrenamiento adaptativos",
            "Recetas personalizadas",
        ],
        highlighted: true,
    },
    Plan {
        name: "Bosque",
        tagline: "Acompañamiento completo",
        monthly: 15,
        yearly: 12,
        features: &[
            "Todo lo de Brote",
            "Revisión mensual con un profesional",
            "Meditación y sueño guiados",
        ],
        highlighted: false,
    },
];

pub fn price_label(plan: &Plan, yearly: bool) -> String {
    let price = if yearly { plan.yearly } else { plan.monthly };
    if price == 0 {
        "Gratis".to_string()
    } else {
        format!("{} €/mes", price)
    }
}

/// Whole-year savings against monthly billing, if any.
pub fn yearly_savings(plan: &Plan) -> Option<u32> {
    let saved = plan.monthly.saturating_sub(plan.yearly) * 12;
    (saved > 0).then_some(saved)
}

#[function_component(PricingSection)]
pub fn pricing_section() -> Html {
    let store = use_context::<LocalStore>().unwrap_or_else(LocalStore::open);
    let yearly = {
        let store = store.clone();
        use_state(move || store.preferences().yearly_pricing)
    };

    let onchange = {
        let yearly = yearly.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let checked = input.checked();
            if store
                .update(StorageKey::Preferences, |p: &mut Preferences| p.yearly_pricing = checked)
                .is_ok()
            {
                info!("Pricing switched to {}", if checked { "yearly" } else { "monthly" });
            }
            yearly.set(checked);
        })
    };

    html! {
        <section id="pricing" class="pricing-section">
            <style>
                {r#"
                .pricing-section {
                    padding: 6rem 2rem;
                    text-align: center;
                }
                .pricing-switch {
                    display: inline-flex;
                    align-items: center;
                    gap: 0.75rem;
                    margin-bottom: 3rem;
                }
                .pricing-grid {
                    display: grid;
                    grid-template-columns: repeat(auto-fit, minmax(260px, 1fr));
                    gap: 2rem;
                    max-width: 1100px;
                    margin: 0 auto;
                }
                .pricing-card {
                    padding: 2.5rem 2rem;
                    border-radius: 20px;
                    background: #fff;
                    border: 1px solid rgba(74, 124, 89, 0.15);
                    text-align: left;
                }
                .pricing-card.highlighted {
                    border: 2px solid var(--verde-bosque);
                    box-shadow: 0 12px 40px rgba(74, 124, 89, 0.15);
                }
                .pricing-price {
                    font-size: 2rem;
                    font-weight: 700;
                    color: var(--verde-bosque);
                }
                .pricing-savings {
                    display: none;
                    font-size: 0.85rem;
                    color: var(--verde-agua);
                }
                .pricing-card.pricing-yearly .pricing-savings {
                    display: block;
                }
                "#}
            </style>
            <div class="section-header">
                <h2>{"Planes sencillos"}</h2>
                <p>{"Empieza gratis. Cambia de plan cuando quieras."}</p>
            </div>
            <label class="pricing-switch">
                <span>{"Mensual"}</span>
                <input type="checkbox" class="pricing-toggle" checked={*yearly} {onchange} />
                <span>{"Anual"}</span>
            </label>
            <div class="pricing-grid">
                {
                    PLANS.iter().map(|plan| html! {
                        <div class={classes!(
                            "pricing-card",
                            plan.highlighted.then_some("highlighted"),
                            yearly.then_some("pricing-yearly"),
                        )}>
                            <h3>{plan.name}</h3>
                            <p>{plan.tagline}</p>
                            <p class="pricing-price">{price_label(plan, *yearly)}</p>
                            if let Some(saved) = yearly_savings(plan) {
                                <p class="pricing-savings">{format!("Ahorras {} € al año", saved)}</p>
                            }
                            <ul>
                                { for plan.features.iter().map(|f| html! { <li>{*f}</li> }) }
                            </ul>
                            <a href="#waitlist" class="btn-primary">{"Quiero este plan"}</a>
                        </div>
                    }).collect::<Html>()
                }
            </div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_billing_period() {
        let brote = &PLANS[1];
        assert_eq!(price_label(brote, false), "9 €/mes");
        assert_eq!(price_label(brote, true), "7 €/mes");
        assert_eq!(price_label(&PLANS[0], true), "Gratis");
    }

    #[test]
    fn savings_only_for_paid_plans() {
        assert_eq!(yearly_savings(&PLANS[0]), None);
        assert_eq!(yearly_savings(&PLANS[1]), Some(24));
        assert_eq!(yearly_savings(&PLANS[2]), Some(36));
    }
}
