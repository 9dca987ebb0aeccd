//! Binds the expansion state machine to the page.
//!
//! `HeroHandle` owns the state and, once attached, the cached hero elements
//! and every window/document listener. Input handlers update the state
//! synchronously and leave painting to the next animation frame. Listeners
//! only hold a `Weak` reference, so dropping the last handle (or calling
//! `detach`) releases everything.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use log::{debug, error, warn};
use thiserror::Error;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement, ScrollBehavior,
    ScrollIntoViewOptions, ScrollLogicalPosition, TouchEvent, WheelEvent, Window,
};

use super::frame::FrameGate;
use super::render::{self, DeviceClass, RenderFrame};
use super::state::{Effect, ExpansionState, Input};

pub const LOCK_CLASS: &str = "expansion-locked";
pub const JUMP_SCROLL_DELAY_MS: u32 = 300;

#[derive(Debug, Error)]
pub enum HeroError {
    #[error("no browser window available")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("scroll expansion container not found")]
    MissingContainer,
    #[error("controller is already attached")]
    AlreadyAttached,
    #[error("could not install `{0}` listener")]
    Listener(&'static str),
}

/// `"#como-funciona"` -> `Some("como-funciona")`. A bare `#` is not a section.
pub fn fragment_id(href: &str) -> Option<String> {
    let id = href.strip_prefix('#')?;
    if id.is_empty() {
        return None;
    }
    match urlencoding::decode(id) {
        Ok(decoded) => Some(decoded.into_owned()),
        Err(_) => Some(id.to_string()),
    }
}

pub fn scroll_into_view(target: &Element, block: ScrollLogicalPosition) {
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(block);
    target.scroll_into_view_with_scroll_into_view_options(&options);
}

fn hook(container: &Element, class: &str) -> Option<HtmlElement> {
    container
        .query_selector(&format!(".{}", class))
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

fn viewport_width(window: &Window) -> f64 {
    window
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .unwrap_or(FALLBACK_VIEWPORT_WIDTH)
}

const FALLBACK_VIEWPORT_WIDTH: f64 = 1024.0;

/// Element references, looked up once per attach.
struct HeroElements {
    container: HtmlElement,
    background: Option<HtmlElement>,
    media: Option<HtmlElement>,
    overlay: Option<HtmlElement>,
    leading: Vec<HtmlElement>,
    trailing: Vec<HtmlElement>,
    content: Option<HtmlElement>,
    cta: Option<HtmlElement>,
}

impl HeroElements {
    fn query(container: HtmlElement) -> Self {
        let leading = ["expansion-title-first", "expansion-date"]
            .iter()
            .filter_map(|class| hook(&container, class))
            .collect();
        let trailing = ["expansion-title-rest", "expansion-scroll-hint"]
            .iter()
            .filter_map(|class| hook(&container, class))
            .collect();
        Self {
            background: hook(&container, "expansion-background"),
            media: hook(&container, "expansion-media-wrapper"),
            overlay: hook(&container, "expansion-media-overlay"),
            content: hook(&container, "expansion-content"),
            cta: hook(&container, "expansion-initial-cta"),
            leading,
            trailing,
            container,
        }
    }

    fn paint(&self, frame: &RenderFrame) {
        fn set(el: &HtmlElement, property: &str, value: &str) {
            let _ = el.style().set_property(property, value);
        }

        if let Some(media) = &self.media {
            set(media, "width", &frame.width_px());
            set(media, "height", &frame.height_px());
        }
        if let Some(background) = &self.background {
            set(background, "opacity", &frame.background_opacity.to_string());
        }
        if let Some(overlay) = &self.overlay {
            set(overlay, "opacity", &frame.overlay_opacity.to_string());
        }
        let leading = frame.leading_transform();
        for el in &self.leading {
            set(el, "transform", &leading);
        }
        let trailing = frame.trailing_transform();
        for el in &self.trailing {
            set(el, "transform", &trailing);
        }
        let _ = self
            .container
            .class_list()
            .toggle_with_force("expanding", frame.expanding);
    }

    fn set_content_visible(&self, visible: bool) {
        if let Some(content) = &self.content {
            let classes = content.class_list();
            let _ = if visible {
                classes.add_1("visible")
            } else {
                classes.remove_1("visible")
            };
        }
        if let Some(cta) = &self.cta {
            let display = if visible { "none" } else { "block" };
            let _ = cta.style().set_property("display", display);
        }
    }
}

/// An installed listener. Dropping it removes it from its target.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn install(
        target: &EventTarget,
        event: &'static str,
        passive: bool,
        callback: Closure<dyn FnMut(Event)>,
    ) -> Result<Self, HeroError> {
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                event,
                callback.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|_| HeroError::Listener(event))?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

struct Attached {
    window: Window,
    document: Document,
    elements: HeroElements,
    frame_callback: Closure<dyn FnMut(f64)>,
    pending_jump: Option<Timeout>,
    _listeners: Vec<Listener>,
}

struct Inner {
    state: ExpansionState,
    device: DeviceClass,
    frame: FrameGate,
    attached: Option<Attached>,
}

/// Shared handle to the hero controller. Cheap to clone; handed to other
/// components through a Yew context.
#[derive(Clone)]
pub struct HeroHandle {
    inner: Rc<RefCell<Inner>>,
}

impl PartialEq for HeroHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl HeroHandle {
    pub fn new(state: ExpansionState) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                state,
                device: DeviceClass::Desktop,
                frame: FrameGate::default(),
                attached: None,
            })),
        }
    }

    /// Builds the initial state from the current URL fragment and scroll
    /// offset.
    pub fn from_location() -> Self {
        let (fragment, scroll_y) = web_sys::window()
            .map(|w| {
                (
                    w.location().hash().unwrap_or_default(),
                    w.scroll_y().unwrap_or(0.0),
                )
            })
            .unwrap_or_default();
        Self::new(ExpansionState::on_load(&fragment, scroll_y))
    }

    fn upgrade(weak: &Weak<RefCell<Inner>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    pub fn state(&self) -> ExpansionState {
        self.inner.borrow().state
    }

    pub fn progress(&self) -> f64 {
        self.inner.borrow().state.progress()
    }

    pub fn is_fully_expanded(&self) -> bool {
        self.inner.borrow().state.is_fully_expanded()
    }

    pub fn is_attached(&self) -> bool {
        self.inner.borrow().attached.is_some()
    }

    pub fn attach(&self, container: Option<HtmlElement>) -> Result<(), HeroError> {
        let container = container.ok_or(HeroError::MissingContainer)?;
        let window = web_sys::window().ok_or(HeroError::NoWindow)?;
        let document = window.document().ok_or(HeroError::NoDocument)?;
        if self.is_attached() {
            return Err(HeroError::AlreadyAttached);
        }

        let listeners = self.install_listeners(&window, &document)?;
        let weak = Rc::downgrade(&self.inner);
        let frame_callback = Closure::wrap(Box::new(move |_timestamp: f64| {
            if let Some(handle) = HeroHandle::upgrade(&weak) {
                handle.on_frame();
            }
        }) as Box<dyn FnMut(f64)>);

        {
            let mut inner = self.inner.borrow_mut();
            inner.device = DeviceClass::from_viewport_width(viewport_width(&window));
            inner.attached = Some(Attached {
                elements: HeroElements::query(container),
                window,
                document,
                frame_callback,
                pending_jump: None,
                _listeners: listeners,
            });
        }

        let state = self.state();
        self.set_scroll_lock(state.scroll_locked());
        self.with_elements(|elements| elements.set_content_visible(state.content_visible()));
        self.render_now();
        debug!("Scroll expansion hero attached at progress {}", state.progress());
        Ok(())
    }

    /// Removes every listener, cancels pending work and releases the lock.
    pub fn detach(&self) {
        let attached = {
            let mut inner = self.inner.borrow_mut();
            let pending = inner.frame.cancel();
            let attached = inner.attached.take();
            if let (Some(id), Some(attached)) = (pending, attached.as_ref()) {
                let _ = attached.window.cancel_animation_frame(id);
            }
            attached
        };
        if let Some(attached) = attached {
            if let Some(body) = attached.document.body() {
                let _ = body.class_list().remove_1(LOCK_CLASS);
            }
            debug!("Scroll expansion hero detached");
        }
    }

    /// Snap straight to the expanded state, as an anchor jump would.
    pub fn force_full_expansion(&self) {
        self.dispatch(Input::JumpToEnd, None);
    }

    /// Scrolls to the element with `section_id`, expanding the hero first
    /// when needed. Returns false when there is no such element.
    pub fn navigate_to(&self, section_id: &str) -> bool {
        let Some(target) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(section_id))
        else {
            return false;
        };

        if self.is_fully_expanded() {
            scroll_into_view(&target, ScrollLogicalPosition::Start);
            return true;
        }

        self.force_full_expansion();
        let timeout = Timeout::new(JUMP_SCROLL_DELAY_MS, move || {
            scroll_into_view(&target, ScrollLogicalPosition::Start);
        });
        match self.inner.borrow_mut().attached.as_mut() {
            // replacing an earlier jump cancels it
            Some(attached) => attached.pending_jump = Some(timeout),
            None => {
                timeout.forget();
            }
        }
        true
    }

    fn dispatch(&self, input: Input, event: Option<&Event>) {
        let effects = match self.inner.try_borrow_mut() {
            Ok(mut inner) => inner.state.apply(input),
            Err(_) => {
                warn!("Dropped hero input {:?} while the controller was busy", input);
                return;
            }
        };
        for effect in effects {
            self.perform(effect, event);
        }
    }

    fn perform(&self, effect: Effect, event: Option<&Event>) {
        match effect {
            Effect::PreventDefault => {
                if let Some(event) = event {
                    event.prevent_default();
                }
            }
            Effect::LockScroll => self.set_scroll_lock(true),
            Effect::UnlockScroll => self.set_scroll_lock(false),
            Effect::ResetScroll => {
                if let Some(attached) = self.inner.borrow().attached.as_ref() {
                    attached.window.scroll_to_with_x_and_y(0.0, 0.0);
                }
            }
            Effect::ShowContent => self.with_elements(|e| e.set_content_visible(true)),
            Effect::HideContent => self.with_elements(|e| e.set_content_visible(false)),
            Effect::Render => self.request_frame(),
            Effect::RenderNow => self.render_now(),
        }
    }

    fn with_elements(&self, f: impl FnOnce(&HeroElements)) {
        if let Some(attached) = self.inner.borrow().attached.as_ref() {
            f(&attached.elements);
        }
    }

    fn set_scroll_lock(&self, locked: bool) {
        let inner = self.inner.borrow();
        let Some(body) = inner.attached.as_ref().and_then(|a| a.document.body()) else {
            return;
        };
        let classes = body.class_list();
        let _ = if locked {
            classes.add_1(LOCK_CLASS)
        } else {
            classes.remove_1(LOCK_CLASS)
        };
    }

    fn request_frame(&self) {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        let Some(attached) = inner.attached.as_ref() else {
            return;
        };
        let scheduled = inner.frame.schedule(|| {
            attached
                .window
                .request_animation_frame(attached.frame_callback.as_ref().unchecked_ref())
        });
        if let Err(e) = scheduled {
            error!("requestAnimationFrame failed: {:?}", e);
        }
    }

    fn on_frame(&self) {
        self.inner.borrow_mut().frame.fire();
        self.render_now();
    }

    fn render_now(&self) {
        let inner = self.inner.borrow();
        if let Some(attached) = inner.attached.as_ref() {
            let frame = render::frame(inner.state.progress(), inner.device);
            attached.elements.paint(&frame);
        }
    }

    fn on_resize(&self, window: &Window) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.device = DeviceClass::from_viewport_width(viewport_width(window));
        }
        self.dispatch(Input::Resize, None);
    }

    fn on_anchor_click(&self, event: &Event) {
        let Some(anchor) = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest("a[href^='#']").ok().flatten())
        else {
            return;
        };
        let Some(section_id) = anchor.get_attribute("href").and_then(|h| fragment_id(&h)) else {
            return;
        };
        if self.navigate_to(&section_id) {
            event.prevent_default();
        }
    }

    fn install_listeners(
        &self,
        window: &Window,
        document: &Document,
    ) -> Result<Vec<Listener>, HeroError> {
        let mut listeners = Vec::with_capacity(7);

        let wheel = {
            let weak = Rc::downgrade(&self.inner);
            let window = window.clone();
            Closure::wrap(Box::new(move |event: Event| {
                let (Some(handle), Some(wheel)) =
                    (HeroHandle::upgrade(&weak), event.dyn_ref::<WheelEvent>())
                else {
                    return;
                };
                let input = Input::Wheel {
                    delta_y: wheel.delta_y(),
                    scroll_y: window.scroll_y().unwrap_or(0.0),
                };
                handle.dispatch(input, Some(&event));
            }) as Box<dyn FnMut(Event)>)
        };
        listeners.push(Listener::install(window, "wheel", false, wheel)?);

        let touch_start = {
            let weak = Rc::downgrade(&self.inner);
            Closure::wrap(Box::new(move |event: Event| {
                let (Some(handle), Some(y)) = (HeroHandle::upgrade(&weak), first_touch_y(&event))
                else {
                    return;
                };
                handle.dispatch(Input::TouchStart { y }, Some(&event));
            }) as Box<dyn FnMut(Event)>)
        };
        listeners.push(Listener::install(window, "touchstart", false, touch_start)?);

        let touch_move = {
            let weak = Rc::downgrade(&self.inner);
            let window = window.clone();
            Closure::wrap(Box::new(move |event: Event| {
                let (Some(handle), Some(y)) = (HeroHandle::upgrade(&weak), first_touch_y(&event))
                else {
                    return;
                };
                let input = Input::TouchMove {
                    y,
                    scroll_y: window.scroll_y().unwrap_or(0.0),
                };
                handle.dispatch(input, Some(&event));
            }) as Box<dyn FnMut(Event)>)
        };
        listeners.push(Listener::install(window, "touchmove", false, touch_move)?);

        let touch_end = {
            let weak = Rc::downgrade(&self.inner);
            Closure::wrap(Box::new(move |event: Event| {
                if let Some(handle) = HeroHandle::upgrade(&weak) {
                    handle.dispatch(Input::TouchEnd, Some(&event));
                }
            }) as Box<dyn FnMut(Event)>)
        };
        listeners.push(Listener::install(window, "touchend", true, touch_end)?);

        let scroll = {
            let weak = Rc::downgrade(&self.inner);
            Closure::wrap(Box::new(move |event: Event| {
                if let Some(handle) = HeroHandle::upgrade(&weak) {
                    handle.dispatch(Input::NativeScroll, Some(&event));
                }
            }) as Box<dyn FnMut(Event)>)
        };
        listeners.push(Listener::install(window, "scroll", true, scroll)?);

        let resize = {
            let weak = Rc::downgrade(&self.inner);
            let window = window.clone();
            Closure::wrap(Box::new(move |_event: Event| {
                if let Some(handle) = HeroHandle::upgrade(&weak) {
                    handle.on_resize(&window);
                }
            }) as Box<dyn FnMut(Event)>)
        };
        listeners.push(Listener::install(window, "resize", true, resize)?);

        let click = {
            let weak = Rc::downgrade(&self.inner);
            Closure::wrap(Box::new(move |event: Event| {
                if let Some(handle) = HeroHandle::upgrade(&weak) {
                    handle.on_anchor_click(&event);
                }
            }) as Box<dyn FnMut(Event)>)
        };
        listeners.push(Listener::install(document, "click", false, click)?);

        Ok(listeners)
    }
}

fn first_touch_y(event: &Event) -> Option<f64> {
    event
        .dyn_ref::<TouchEvent>()
        .and_then(|touch| touch.touches().get(0))
        .map(|touch| touch.client_y() as f64)
}
