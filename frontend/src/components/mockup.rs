//! Phone mockup that leans toward the pointer, and the CTA click log.

use log::info;
use wasm_bindgen::JsCast;
use web_sys::{Element, MouseEvent};
use yew::prelude::*;
use yew_hooks::prelude::*;

/// Degrees of rotation at the window edges.
pub const MAX_TILT_DEG: f64 = 10.0;
pub const REST_TRANSFORM: &str = "perspective(1000px) rotateY(-5deg)";
pub const CTA_SELECTOR: &str = ".btn-primary, .btn-cta";

/// `(rotate_y, rotate_x)` in degrees for a pointer at `(client_x, client_y)`
/// inside a `width` x `height` window. Centered pointer means no tilt.
pub fn tilt(client_x: f64, client_y: f64, width: f64, height: f64) -> (f64, f64) {
    if !(width > 0.0 && height > 0.0) {
        return (0.0, 0.0);
    }
    let x = (client_x / width - 0.5) * 2.0 * MAX_TILT_DEG;
    let y = (client_y / height - 0.5) * 2.0 * MAX_TILT_DEG;
    (-x, y)
}

pub fn tilt_transform((rotate_y, rotate_x): (f64, f64)) -> String {
    format!(
        "perspective(1000px) rotateY({:.2}deg) rotateX({:.2}deg)",
        rotate_y, rotate_x
    )
}

/// Button text as it should appear in the log, `None` for empty buttons.
pub fn cta_label(text: &str) -> Option<String> {
    let label = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!label.is_empty()).then_some(label)
}

fn window_size() -> Option<(f64, f64)> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some((width, height))
}

#[function_component(PhoneMockup)]
pub fn phone_mockup() -> Html {
    let transform = use_state(|| REST_TRANSFORM.to_string());

    {
        let transform = transform.clone();
        use_event_with_window("mousemove", move |e: MouseEvent| {
            if let Some((width, height)) = window_size() {
                let angles = tilt(e.client_x() as f64, e.client_y() as f64, width, height);
                transform.set(tilt_transform(angles));
            }
        });
    }

    let on_leave = {
        let transform = transform.clone();
        Callback::from(move |_: MouseEvent| transform.set(REST_TRANSFORM.to_string()))
    };

    html! {
        <div
            class="phone-mockup"
            style={format!("transform: {};", *transform)}
            onmouseleave={on_leave}
        >
            <style>
                {r#"
                .phone-mockup {
                    width: 260px;
                    height: 520px;
                    margin: 2rem auto 0;
                    border-radius: 36px;
                    padding: 14px;
                    background: #1f2a22;
                    box-shadow: 0 30px 60px rgba(74, 124, 89, 0.25);
                    transition: transform 0.1s ease-out;
                }
                .phone-screen {
                    height: 100%;
                    border-radius: 24px;
                    background: var(--crema);
                    padding: 1.5rem 1rem;
                    display: flex;
                    flex-direction: column;
                    gap: 0.75rem;
                }
                .daily-card {
                    background: #fff;
                    border-radius: 12px;
                    padding: 0.75rem;
                    font-size: 0.85rem;
                    box-shadow: 0 2px 8px rgba(0, 0, 0, 0.05);
                }
                "#}
            </style>
            <div class="phone-screen">
                <strong>{"Hoy en tu senda"}</strong>
                <div class="daily-card">{"🏃 20 min de movilidad"}</div>
                <div class="daily-card">{"🥗 Bowl de quinoa y verduras"}</div>
                <div class="daily-card">{"🧘 5 min de respiración"}</div>
            </div>
        </div>
    }
}

/// Logs the label of every primary or CTA button the visitor clicks.
#[hook]
pub fn use_cta_tracking() {
    use_event_with_window("click", move |e: MouseEvent| {
        let Some(button) = e
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest(CTA_SELECTOR).ok().flatten())
        else {
            return;
        };
        if let Some(label) = button.text_content().as_deref().and_then(cta_label) {
            info!("CTA click: {}", label);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_pointer_does_not_tilt() {
        assert_eq!(tilt(600.0, 400.0, 1200.0, 800.0), (0.0, 0.0));
    }

    #[test]
    fn corners_reach_the_maximum() {
        let (rotate_y, rotate_x) = tilt(0.0, 0.0, 1200.0, 800.0);
        assert_eq!(rotate_y, MAX_TILT_DEG);
        assert_eq!(rotate_x, -MAX_TILT_DEG);

        let (rotate_y, rotate_x) = tilt(1200.0, 800.0, 1200.0, 800.0);
        assert_eq!(rotate_y, -MAX_TILT_DEG);
        assert_eq!(rotate_x, MAX_TILT_DEG);
    }

    #[test]
    fn empty_window_stays_flat() {
        assert_eq!(tilt(10.0, 10.0, 0.0, 800.0), (0.0, 0.0));
        assert_eq!(tilt(10.0, 10.0, 1200.0, f64::NAN), (0.0, 0.0));
    }

    #[test]
    fn transform_string() {
        assert_eq!(
            tilt_transform((-2.5, 1.0)),
            "perspective(1000px) rotateY(-2.50deg) rotateX(1.00deg)"
        );
    }

    #[test]
    fn cta_labels_are_trimmed() {
        assert_eq!(
            cta_label("\n   Únete a la   lista de espera \n").as_deref(),
            Some("Únete a la lista de espera")
        );
        assert_eq!(cta_label("   "), None);
    }
}
