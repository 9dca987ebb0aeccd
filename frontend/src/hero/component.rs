use log::error;
use web_sys::HtmlElement;
use yew::prelude::*;

use super::controller::HeroHandle;

#[derive(Properties, PartialEq)]
pub struct ScrollExpansionHeroProps {
    pub media_src: AttrValue,
    pub background_src: AttrValue,
    pub title_first: AttrValue,
    pub title_rest: AttrValue,
    #[prop_or_default]
    pub date: Option<AttrValue>,
    #[prop_or(AttrValue::from("Desliza para descubrir"))]
    pub scroll_hint: AttrValue,
    /// Revealed once the media has (nearly) filled the viewport.
    #[prop_or_default]
    pub children: Children,
}

/// Hero markup plus the controller attachment. The controller comes from the
/// surrounding `ContextProvider<HeroHandle>`; without one the hero renders
/// statically.
#[function_component(ScrollExpansionHero)]
pub fn scroll_expansion_hero(props: &ScrollExpansionHeroProps) -> Html {
    let handle = use_context::<HeroHandle>();
    let container = use_node_ref();

    {
        let container = container.clone();
        use_effect_with_deps(
            move |handle: &Option<HeroHandle>| {
                let attached = match handle {
                    Some(handle) => match handle.attach(container.cast::<HtmlElement>()) {
                        Ok(()) => Some(handle.clone()),
                        Err(e) => {
                            error!("Scroll expansion hero disabled: {}", e);
                            None
                        }
                    },
                    None => {
                        error!("Scroll expansion hero rendered without a controller");
                        None
                    }
                };
                move || {
                    if let Some(handle) = attached {
                        handle.detach();
                    }
                }
            },
            handle,
        );
    }

    html! {
        <section id="hero" class="scroll-expansion-hero" ref={container}>
            <style>
                {r#"
                body.expansion-locked {
                    overflow: hidden;
                    touch-action: none;
                }
                .scroll-expansion-hero {
                    position: relative;
                    min-height: 100vh;
                    overflow-x: hidden;
                }
                .expansion-stage {
                    position: relative;
                    height: 100vh;
                    display: flex;
                    align-items: center;
                    justify-content: center;
                    overflow: hidden;
                }
                .expansion-background {
                    position: absolute;
                    inset: 0;
                    background-size: cover;
                    background-position: center;
                    z-index: 0;
                }
                .expansion-media-wrapper {
                    position: absolute;
                    top: 50%;
                    left: 50%;
                    transform: translate(-50%, -50%);
                    width: 300px;
                    height: 400px;
                    max-width: 95vw;
                    max-height: 85vh;
                    border-radius: 16px;
                    overflow: hidden;
                    box-shadow: 0 0 50px rgba(0, 0, 0, 0.3);
                    z-index: 1;
                }
                .expansion-media-wrapper img {
                    width: 100%;
                    height: 100%;
                    object-fit: cover;
                }
                .expansion-media-overlay {
                    position: absolute;
                    inset: 0;
                    background: rgba(0, 0, 0, 0.5);
                    opacity: 0.5;
                }
                .expansion-titles {
                    position: relative;
                    z-index: 2;
                    display: flex;
                    flex-direction: column;
                    align-items: center;
                    gap: 1rem;
                    color: #fff;
                    mix-blend-mode: difference;
                    pointer-events: none;
                }
                .expansion-titles h1 {
                    font-size: clamp(2.5rem, 8vw, 6rem);
                    margin: 0;
                }
                .expansion-date, .expansion-scroll-hint {
                    font-size: 1.1rem;
                    opacity: 0.85;
                }
                .expansion-initial-cta {
                    position: absolute;
                    bottom: 8vh;
                    left: 50%;
                    transform: translateX(-50%);
                    z-index: 3;
                }
                .expansion-content {
                    opacity: 0;
                    transform: translateY(30px);
                    transition: opacity 0.7s ease, transform 0.7s ease;
                    pointer-events: none;
                }
                .expansion-content.visible {
                    opacity: 1;
                    transform: none;
                    pointer-events: auto;
                }
                .scroll-expansion-hero.expanding .expansion-titles {
                    will-change: transform;
                }
                "#}
            </style>
            <div class="expansion-stage">
                <div
                    class="expansion-background"
                    style={format!("background-image: url('{}');", props.background_src)}
                ></div>
                <div class="expansion-media-wrapper">
                    <img src={props.media_src.clone()} alt="" loading="eager" />
                    <div class="expansion-media-overlay"></div>
                </div>
                <div class="expansion-titles">
                    if let Some(date) = &props.date {
                        <p class="expansion-date">{date.to_string()}</p>
                    }
                    <h1 class="expansion-title-first">{props.title_first.to_string()}</h1>
                    <h1 class="expansion-title-rest">{props.title_rest.to_string()}</h1>
                    <p class="expansion-scroll-hint">{props.scroll_hint.to_string()}</p>
                </div>
                <div class="expansion-initial-cta">
                    <a href="#waitlist" class="btn-cta">{"Únete a la lista de espera"}</a>
                </div>
            </div>
            <div class="expansion-content">
                { for props.children.iter() }
            </div>
        </section>
    }
}
