//! Viewport-triggered effects: reveal-on-scroll classes and lazy images.

use js_sys::Array;
use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};
use yew::prelude::*;

pub const REVEAL_THRESHOLD: f64 = 0.15;
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";
pub const REVEALED_CLASS: &str = "revealed";

/// Selector and the animation class it gets. Classes are added straight to
/// the DOM, so only elements whose `class` Yew never re-renders belong here:
/// the carousel and pricing cards toggle classes and are revealed through
/// their containers instead.
pub const REVEAL_TARGETS: &[(&str, &str)] = &[
    (".section-header", "scroll-reveal"),
    (".feature-card", "scroll-reveal-stagger"),
    (".daily-card", "scroll-reveal-stagger"),
    (".testimonials-carousel", "scroll-reveal"),
    (".stat-item", "scroll-reveal-stagger"),
    (".pricing-grid", "scroll-reveal"),
    (".step", "scroll-reveal"),
];


/// An IntersectionObserver that calls back for every element entering the
/// viewport. Disconnects when dropped.
pub struct VisibilityWatch {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl VisibilityWatch {
    pub fn new<F>(threshold: f64, root_margin: Option<&str>, mut on_visible: F) -> Result<Self, JsValue>
    where
        F: FnMut(&Element, &IntersectionObserver) + 'static,
    {
        let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                if entry.is_intersecting() {
                    on_visible(&entry.target(), &observer);
                }
            }
        }) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(threshold));
        if let Some(margin) = root_margin {
            options.set_root_margin(margin);
        }
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn observe(&self, element: &Element) {
        self.observer.observe(element);
    }
}

impl Drop for VisibilityWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document unavailable"))
}

fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, JsValue> {
    let nodes = document.query_selector_all(selector)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

fn start_reveal() -> Result<VisibilityWatch, JsValue> {
    let document = document()?;
    let watch = VisibilityWatch::new(REVEAL_THRESHOLD, Some(REVEAL_ROOT_MARGIN), |target, observer| {
        let _ = target.class_list().add_1(REVEALED_CLASS);
        observer.unobserve(target);
    })?;

    for (selector, class) in REVEAL_TARGETS {
        for element in query_all(&document, selector)? {
            element.class_list().add_1(class)?;
            watch.observe(&element);
        }
    }
    Ok(watch)
}

fn start_lazy_images() -> Result<VisibilityWatch, JsValue> {
    let document = document()?;
    let watch = VisibilityWatch::new(0.0, None, |image, observer| {
        if let Some(src) = image.get_attribute("data-src") {
            let _ = image.set_attribute("src", &src);
            let _ = image.remove_attribute("data-src");
        }
        observer.unobserve(image);
    })?;

    for image in query_all(&document, "img[data-src]")? {
        watch.observe(&image);
    }
    Ok(watch)
}

fn keep_while_mounted(name: &'static str, start: fn() -> Result<VisibilityWatch, JsValue>) -> impl FnOnce() + 'static {
    let watch = match start() {
        Ok(watch) => Some(watch),
        Err(e) => {
            warn!("{} disabled: {:?}", name, e);
            None
        }
    };
    move || drop(watch)
}

/// Tags the page's cards and headers for the reveal animation and marks them
/// `revealed` the first time they scroll into view. Call it from the component
/// that renders those elements.
#[hook]
pub fn use_scroll_reveal() {
    use_effect_with_deps(|_| keep_while_mounted("Scroll reveal", start_reveal), ());
}

/// Swaps `data-src` into `src` for images once they approach the viewport.
#[hook]
pub fn use_lazy_images() {
    use_effect_with_deps(|_| keep_while_mounted("Lazy images", start_lazy_images), ());
}
