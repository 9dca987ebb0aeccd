use web_sys::{Event, ScrollLogicalPosition};
use yew::prelude::*;
use yew_hooks::prelude::*;

use crate::hero::controller::{scroll_into_view, HeroHandle};

/// Sections the sidebar follows, in page order, with their dot labels.
pub const TRACKED_SECTIONS: &[(&str, &str)] = &[
    ("hero", "Inicio"),
    ("features", "Funciones"),
    ("how", "Cómo funciona"),
    ("testimonials", "Testimonios"),
    ("pricing", "Precios"),
    ("cta", "Únete"),
];

/// How far down the page we are, 0 to 100.
pub fn scroll_percent(scroll_top: f64, document_height: f64, viewport_height: f64) -> f64 {
    let scrollable = document_height - viewport_height;
    if !(scrollable > 0.0) || !scroll_top.is_finite() {
        return 0.0;
    }
    (scroll_top / scrollable * 100.0).clamp(0.0, 100.0)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionBox {
    /// Bounding rect top relative to the viewport.
    pub top: f64,
    pub height: f64,
}

/// The last section whose middle sits in the top half of the viewport
/// without being scrolled more than half its height past the top.
pub fn active_section(boxes: &[SectionBox], viewport_height: f64) -> usize {
    boxes
        .iter()
        .enumerate()
        .filter(|(_, b)| {
            let middle = b.top + b.height / 2.0;
            middle < viewport_height / 2.0 && middle > -b.height / 2.0
        })
        .map(|(i, _)| i)
        .last()
        .unwrap_or(0)
}

#[derive(Clone, Debug, PartialEq)]
struct PageProgress {
    percent: f64,
    active: &'static str,
}

impl Default for PageProgress {
    fn default() -> Self {
        Self {
            percent: 0.0,
            active: TRACKED_SECTIONS[0].0,
        }
    }
}

fn measure_percent() -> Option<f64> {
    let window = web_sys::window()?;
    let root = window.document()?.document_element()?;
    let scroll_top = window.scroll_y().ok()?;
    Some(scroll_percent(
        scroll_top,
        f64::from(root.scroll_height()),
        f64::from(root.client_height()),
    ))
}

fn measure() -> Option<PageProgress> {
    let window = web_sys::window()?;
    let document = window.document()?;
    let viewport_height = window.inner_height().ok()?.as_f64()?;

    let present: Vec<(&'static str, SectionBox)> = TRACKED_SECTIONS
        .iter()
        .filter_map(|(id, _)| {
            let rect = document.get_element_by_id(id)?.get_bounding_client_rect();
            Some((
                *id,
                SectionBox {
                    top: rect.top(),
                    height: rect.height(),
                },
            ))
        })
        .collect();
    let boxes: Vec<SectionBox> = present.iter().map(|(_, b)| *b).collect();

    Some(PageProgress {
        percent: measure_percent()?,
        active: present
            .get(active_section(&boxes, viewport_height))
            .map_or(TRACKED_SECTIONS[0].0, |(id, _)| *id),
    })
}

/// Thin bar along the top of the viewport.
#[function_component(ScrollProgressBar)]
pub fn scroll_progress_bar() -> Html {
    let percent = use_state(|| 0.0_f64);

    {
        let percent = percent.clone();
        use_event_with_window("scroll", move |_: Event| {
            if let Some(p) = measure_percent() {
                percent.set(p);
            }
        });
    }

    html! {
        <div
            class="scroll-progress"
            style={format!(
                "position: fixed; top: 0; left: 0; height: 3px; width: {}%; \
                 background: linear-gradient(90deg, var(--verde-bosque), var(--verde-agua)); \
                 z-index: 9999; transition: width 0.1s ease;",
                *percent
            )}
        ></div>
    }
}

/// Braided progress lines with one dot per tracked section. Dots jump
/// through the hero controller so a collapsed hero expands first.
#[function_component(ProgressSidebar)]
pub fn progress_sidebar() -> Html {
    let progress = use_state(PageProgress::default);
    let hero = use_context::<HeroHandle>();

    {
        let progress = progress.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(p) = measure() {
                    progress.set(p);
                }
                || ()
            },
            (),
        );
    }

    {
        let progress = progress.clone();
        use_event_with_window("scroll", move |_: Event| {
            if let Some(p) = measure() {
                if *progress != p {
                    progress.set(p);
                }
            }
        });
    }

    let line_height = format!("height: {}%;", progress.percent.min(100.0));

    html! {
        <nav class="progress-sidebar" aria-label="Progreso">
            <style>
                {r#"
                .progress-sidebar {
                    position: fixed;
                    right: 1.5rem;
                    top: 50%;
                    transform: translateY(-50%);
                    height: 60vh;
                    display: flex;
                    align-items: stretch;
                    z-index: 900;
                }
                .progress-lines {
                    position: relative;
                    width: 12px;
                    background: rgba(74, 124, 89, 0.1);
                    border-radius: 6px;
                }
                .progress-line {
                    position: absolute;
                    top: 0;
                    width: 2px;
                    background: var(--verde-bosque);
                    transition: height 0.1s linear;
                }
                .progress-line:nth-child(1) { left: 2px; }
                .progress-line:nth-child(2) { left: 5px; opacity: 0.7; }
                .progress-line:nth-child(3) { left: 8px; opacity: 0.4; }
                .progress-dots {
                    display: flex;
                    flex-direction: column;
                    justify-content: space-between;
                    margin-left: 0.5rem;
                }
                .progress-dot {
                    width: 12px;
                    height: 12px;
                    border-radius: 50%;
                    border: 2px solid var(--verde-bosque);
                    background: #fff;
                    padding: 0;
                    cursor: pointer;
                    transition: transform 0.2s ease, background 0.2s ease;
                }
                .progress-dot.active {
                    background: var(--verde-bosque);
                    transform: scale(1.3);
                }
                @media (max-width: 768px) {
                    .progress-sidebar {
                        display: none;
                    }
                }
                "#}
            </style>
            <div class="progress-lines">
                <div class="progress-line" style={line_height.clone()}></div>
                <div class="progress-line" style={line_height.clone()}></div>
                <div class="progress-line" style={line_height}></div>
            </div>
            <div class="progress-dots">
                {
                    TRACKED_SECTIONS.iter().map(|(id, label)| {
                        let onclick = {
                            let hero = hero.clone();
                            let id = *id;
                            Callback::from(move |_: MouseEvent| match &hero {
                                Some(hero) => {
                                    hero.navigate_to(id);
                                }
                                None => {
                                    if let Some(target) = web_sys::window()
                                        .and_then(|w| w.document())
                                        .and_then(|d| d.get_element_by_id(id))
                                    {
                                        scroll_into_view(&target, ScrollLogicalPosition::Start);
                                    }
                                }
                            })
                        };
                        html! {
                            <button
                                class={classes!("progress-dot", (progress.active == *id).then_some("active"))}
                                data-section={*id}
                                title={*label}
                                aria-label={*label}
                                {onclick}
                            ></button>
                        }
                    }).collect::<Html>()
                }
            </div>
        </nav>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_is_clamped() {
        assert_eq!(scroll_percent(0.0, 3000.0, 1000.0), 0.0);
        assert_eq!(scroll_percent(1000.0, 3000.0, 1000.0), 50.0);
        assert_eq!(scroll_percent(2500.0, 3000.0, 1000.0), 100.0);
        assert_eq!(scroll_percent(-40.0, 3000.0, 1000.0), 0.0);
    }

    #[test]
    fn short_pages_report_zero() {
        assert_eq!(scroll_percent(0.0, 800.0, 800.0), 0.0);
        assert_eq!(scroll_percent(10.0, 600.0, 800.0), 0.0);
        assert_eq!(scroll_percent(f64::NAN, 3000.0, 800.0), 0.0);
    }

    #[test]
    fn first_section_is_the_default() {
        let boxes = [
            SectionBox { top: 0.0, height: 1000.0 },
            SectionBox { top: 1000.0, height: 800.0 },
        ];
        assert_eq!(active_section(&boxes, 800.0), 0);
        assert_eq!(active_section(&[], 800.0), 0);
    }

    #[test]
    fn later_section_wins_once_its_middle_passes_the_center() {
        let boxes = [
            SectionBox { top: -900.0, height: 1000.0 },
            SectionBox { top: 100.0, height: 400.0 },
            SectionBox { top: 500.0, height: 800.0 },
        ];
        // middles: -400 (still above -500), 300 (< 400), 900
        assert_eq!(active_section(&boxes, 800.0), 1);
    }

    #[test]
    fn sections_scrolled_far_past_the_top_are_skipped() {
        let boxes = [
            SectionBox { top: -2000.0, height: 1000.0 },
            SectionBox { top: 600.0, height: 400.0 },
        ];
        assert_eq!(active_section(&boxes, 800.0), 0);
    }
}
