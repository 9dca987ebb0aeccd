use yew::prelude::*;
use yew_router::prelude::*;
use log::{info, warn};
use web_sys::MouseEvent;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

mod config;
mod email;
mod storage;
mod hero {
    pub mod input;
    pub mod state;
    pub mod render;
    pub mod frame;
    pub mod controller;
    pub mod component;
}
mod components {
    pub mod toast;
    pub mod survey;
    pub mod waitlist;
    pub mod faq;
    pub mod reveal;
    pub mod counter;
    pub mod progress;
    pub mod pricing;
    pub mod testimonials;
    pub mod data_controls;
    pub mod mockup;
}
mod pages {
    pub mod landing;
    pub mod not_found;
}

use components::toast::ToastProvider;
use pages::{landing::Landing, not_found::NotFound};
use storage::LocalStore;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Landing,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Landing => {
            info!("Rendering Landing page");
            html! { <Landing /> }
        },
        Route::NotFound => {
            info!("Rendering NotFound page");
            html! { <NotFound /> }
        },
    }
}

const NAV_LINKS: &[(&str, &str)] = &[
    ("#features", "Funciones"),
    ("#how", "Cómo funciona"),
    ("#pricing", "Precios"),
    ("#faq", "FAQ"),
];

/// Navbar reaction to the page scroll position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NavbarScroll {
    last: f64,
    pub scrolled: bool,
    pub hidden: bool,
}

impl NavbarScroll {
    pub const SCROLLED_AFTER_PX: f64 = 100.0;
    pub const HIDE_AFTER_PX: f64 = 500.0;

    /// Scrolling down past the hide threshold tucks the navbar away, any
    /// upward scroll brings it back.
    pub fn update(self, current: f64) -> Self {
        Self {
            last: current,
            scrolled: current > Self::SCROLLED_AFTER_PX,
            hidden: current > self.last && current > Self::HIDE_AFTER_PX,
        }
    }
}

#[function_component(Nav)]
pub fn nav() -> Html {
    let menu_open = use_state(|| false);
    let scroll = use_state(NavbarScroll::default);
    let tracker = use_mut_ref(NavbarScroll::default);

    {
        let scroll = scroll.clone();
        use_effect_with_deps(move |_| {
            let window = web_sys::window();

            let scroll_callback = Closure::wrap(Box::new(move || {
                let Some(current) = web_sys::window().and_then(|w| w.scroll_y().ok()) else {
                    return;
                };
                let next = tracker.borrow().update(current);
                let previous = std::mem::replace(&mut *tracker.borrow_mut(), next);
                if previous.scrolled != next.scrolled || previous.hidden != next.hidden {
                    scroll.set(next);
                }
            }) as Box<dyn FnMut()>);

            if let Some(window) = &window {
                if window
                    .add_event_listener_with_callback("scroll", scroll_callback.as_ref().unchecked_ref())
                    .is_err()
                {
                    warn!("Navbar scroll listener could not be installed");
                }
            }

            move || {
                if let Some(window) = window {
                    let _ = window.remove_event_listener_with_callback(
                        "scroll",
                        scroll_callback.as_ref().unchecked_ref(),
                    );
                }
            }
        }, ());
    }

    let toggle_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            menu_open.set(!*menu_open);
        })
    };

    // Links keep their default action; the hero controller handles the jump.
    let close_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_: MouseEvent| menu_open.set(false))
    };

    html! {
        <nav
            class={classes!("navbar", scroll.scrolled.then_some("navbar-scrolled"))}
            style={if scroll.hidden { "transform: translateY(-100%);" } else { "transform: translateY(0);" }}
        >
            <style>
                {r#"
                .navbar {
                    position: fixed;
                    top: 0;
                    left: 0;
                    right: 0;
                    z-index: 1000;
                    transition: transform 0.3s ease, background 0.3s ease, box-shadow 0.3s ease;
                }
                .navbar-scrolled {
                    background: rgba(255, 255, 255, 0.95);
                    box-shadow: 0 2px 20px rgba(0, 0, 0, 0.08);
                    backdrop-filter: blur(10px);
                }
                .navbar-content {
                    max-width: 1200px;
                    margin: 0 auto;
                    padding: 1rem 2rem;
                    display: flex;
                    align-items: center;
                    justify-content: space-between;
                }
                .navbar-logo {
                    font-weight: 700;
                    font-size: 1.4rem;
                    color: var(--verde-bosque);
                    text-decoration: none;
                }
                .navbar-menu {
                    display: flex;
                    gap: 2rem;
                    align-items: center;
                }
                .navbar-link {
                    color: inherit;
                    text-decoration: none;
                }
                .mobile-menu-toggle {
                    display: none;
                    flex-direction: column;
                    gap: 5px;
                    background: none;
                    border: none;
                    cursor: pointer;
                }
                .mobile-menu-toggle span {
                    width: 24px;
                    height: 2px;
                    background: var(--verde-bosque);
                    transition: transform 0.3s ease, opacity 0.3s ease;
                }
                .mobile-menu-toggle.active span:nth-child(1) {
                    transform: rotate(45deg) translate(5px, 5px);
                }
                .mobile-menu-toggle.active span:nth-child(2) {
                    opacity: 0;
                }
                .mobile-menu-toggle.active span:nth-child(3) {
                    transform: rotate(-45deg) translate(7px, -6px);
                }
                @media (max-width: 768px) {
                    .mobile-menu-toggle {
                        display: flex;
                    }
                    .navbar-menu {
                        display: none;
                        position: absolute;
                        top: 100%;
                        left: 0;
                        right: 0;
                        flex-direction: column;
                        padding: 1.5rem;
                        background: #fff;
                    }
                    .navbar-menu.active {
                        display: flex;
                    }
                }
                "#}
            </style>
            <div class="navbar-content">
                <Link<Route> to={Route::Landing} classes="navbar-logo">
                    {"senda"}
                </Link<Route>>

                <button
                    id="mobileMenuToggle"
                    class={classes!("mobile-menu-toggle", menu_open.then_some("active"))}
                    aria-label="Menú"
                    onclick={toggle_menu}
                >
                    <span></span>
                    <span></span>
                    <span></span>
                </button>
                <div class={classes!("navbar-menu", menu_open.then_some("active"))}>
                    {
                        NAV_LINKS.iter().map(|(href, label)| html! {
                            <a href={*href} class="navbar-link" onclick={close_menu.clone()}>{*label}</a>
                        }).collect::<Html>()
                    }
                    <a href="#waitlist" class="btn-cta navbar-link" onclick={close_menu.clone()}>
                        {"Lista de espera"}
                    </a>
                </div>
            </div>
        </nav>
    }
}

#[function_component]
fn App() -> Html {
    let store = use_memo(|_| LocalStore::open(), ());

    html! {
        <ContextProvider<LocalStore> context={(*store).clone()}>
            <ToastProvider>
                <BrowserRouter>
                    <Nav />
                    <Switch<Route> render={switch} />
                </BrowserRouter>
            </ToastProvider>
        </ContextProvider<LocalStore>>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    gloo_console::log!("%c¡Hola! 🌱", "font-size: 24px; color: #4A7C59; font-weight: bold;");
    gloo_console::log!("%ccontacto@senda.app", "font-size: 12px; color: #666;");

    info!("Starting application");
    yew::Renderer::<App>::new().render();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navbar_marks_scrolled_after_threshold() {
        let nav = NavbarScroll::default().update(50.0);
        assert!(!nav.scrolled);
        let nav = nav.update(150.0);
        assert!(nav.scrolled);
        assert!(!nav.hidden, "still above the hide threshold");
    }

    #[test]
    fn navbar_hides_on_downward_scroll_only() {
        let nav = NavbarScroll::default().update(600.0);
        assert!(nav.hidden);
        let nav = nav.update(700.0);
        assert!(nav.hidden);
        let nav = nav.update(650.0);
        assert!(!nav.hidden);
        assert!(nav.scrolled);
    }

    #[test]
    fn navbar_stays_visible_when_scroll_does_not_move() {
        let nav = NavbarScroll::default().update(800.0).update(800.0);
        assert!(!nav.hidden);
    }
}
