use std::rc::Rc;

use gloo_timers::callback::Timeout;
use yew::prelude::*;

const SHOW_DELAY_MS: u32 = 100;
const VISIBLE_MS: u32 = 3000;
const FADE_OUT_MS: u32 = 300;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

impl ToastKind {
    fn class(&self) -> &'static str {
        match self {
            ToastKind::Info => "toast-info",
            ToastKind::Success => "toast-success",
            ToastKind::Error => "toast-error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub message: String,
    pub kind: ToastKind,
    pub shown: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToastList {
    toasts: Vec<Toast>,
}

pub enum ToastAction {
    Push(u32, String, ToastKind),
    Show(u32),
    Hide(u32),
    Remove(u32),
}

impl ToastList {
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }
}

impl Reducible for ToastList {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            ToastAction::Push(id, message, kind) => next.toasts.push(Toast {
                id,
                message,
                kind,
                shown: false,
            }),
            ToastAction::Show(id) | ToastAction::Hide(id) => {
                let shown = matches!(action, ToastAction::Show(_));
                match next.toasts.iter_mut().find(|t| t.id == id) {
                    Some(toast) if toast.shown != shown => toast.shown = shown,
                    _ => return self,
                }
            }
            ToastAction::Remove(id) => next.toasts.retain(|t| t.id != id),
        }
        Rc::new(next)
    }
}

/// Handed out through context; components call `info`, `success` or `error`.
#[derive(Clone, PartialEq)]
pub struct Toaster {
    push: Callback<(String, ToastKind)>,
}

impl Toaster {
    pub fn show(&self, message: impl Into<String>, kind: ToastKind) {
        self.push.emit((message.into(), kind));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(message, ToastKind::Info);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message, ToastKind::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message, ToastKind::Error);
    }
}

#[derive(Properties, PartialEq)]
pub struct ToastProviderProps {
    #[prop_or_default]
    pub children: Children,
}

#[function_component(ToastProvider)]
pub fn toast_provider(props: &ToastProviderProps) -> Html {
    let list = use_reducer(ToastList::default);
    let next_id = use_mut_ref(|| 0u32);

    let toaster = {
        let dispatcher = list.dispatcher();
        use_memo(
            move |_| Toaster {
                push: Callback::from(move |(message, kind): (String, ToastKind)| {
                    let id = {
                        let mut next = next_id.borrow_mut();
                        *next = next.wrapping_add(1);
                        *next
                    };
                    dispatcher.dispatch(ToastAction::Push(id, message, kind));
                    let d = dispatcher.clone();
                    Timeout::new(SHOW_DELAY_MS, move || d.dispatch(ToastAction::Show(id))).forget();
                    let d = dispatcher.clone();
                    Timeout::new(VISIBLE_MS, move || d.dispatch(ToastAction::Hide(id))).forget();
                    let d = dispatcher.clone();
                    Timeout::new(VISIBLE_MS + FADE_OUT_MS, move || {
                        d.dispatch(ToastAction::Remove(id))
                    })
                    .forget();
                }),
            },
            (),
        )
    };

    html! {
        <ContextProvider<Toaster> context={(*toaster).clone()}>
            <style>
                {r#"
                .toast-stack {
                    position: fixed;
                    bottom: 1.5rem;
                    right: 1.5rem;
                    display: flex;
                    flex-direction: column;
                    gap: 0.5rem;
                    z-index: 10000;
                }
                .toast {
                    padding: 0.9rem 1.25rem;
                    border-radius: 10px;
                    color: #fff;
                    box-shadow: 0 8px 24px rgba(0, 0, 0, 0.15);
                    opacity: 0;
                    transform: translateY(12px);
                    transition: opacity 0.3s ease, transform 0.3s ease;
                }
                .toast.toast-show {
                    opacity: 1;
                    transform: none;
                }
                .toast-info { background: #4a6fa5; }
                .toast-success { background: var(--verde-bosque); }
                .toast-error { background: #c0504d; }
                "#}
            </style>
            { for props.children.iter() }
            <div class="toast-stack" aria-live="polite">
                {
                    list.toasts().iter().map(|toast| html! {
                        <div key={toast.id} class={classes!("toast", toast.kind.class(), toast.shown.then_some("toast-show"))}>
                            {toast.message.clone()}
                        </div>
                    }).collect::<Html>()
                }
            </div>
        </ContextProvider<Toaster>>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_lifecycle() {
        let list = Rc::new(ToastList::default());
        let list = list.reduce(ToastAction::Push(7, "¡Gracias!".into(), ToastKind::Success));
        let id = list.toasts()[0].id;
        assert_eq!(id, 7);
        assert!(!list.toasts()[0].shown);

        let list = list.reduce(ToastAction::Show(id));
        assert!(list.toasts()[0].shown);
        let same = list.clone().reduce(ToastAction::Show(id));
        assert!(Rc::ptr_eq(&list, &same));

        let list = list.reduce(ToastAction::Hide(id));
        assert!(!list.toasts()[0].shown);
        let list = list.reduce(ToastAction::Remove(id));
        assert!(list.toasts().is_empty());
    }

    #[test]
    fn toaster_helpers_pick_their_kind() {
        let pushed = Rc::new(std::cell::RefCell::new(Vec::new()));
        let toaster = Toaster {
            push: {
                let pushed = pushed.clone();
                Callback::from(move |toast: (String, ToastKind)| pushed.borrow_mut().push(toast))
            },
        };
        toaster.info("Exportado");
        toaster.success("¡Gracias!");
        toaster.error("Ups");

        let kinds: Vec<ToastKind> = pushed.borrow().iter().map(|(_, kind)| *kind).collect();
        assert_eq!(kinds, [ToastKind::Info, ToastKind::Success, ToastKind::Error]);
        assert_eq!(ToastKind::Info.class(), "toast-info");
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let list = Rc::new(ToastList::default());
        let after = list.clone().reduce(ToastAction::Show(42));
        assert!(Rc::ptr_eq(&list, &after));
    }
}
