use std::rc::Rc;

use log::warn;
use web_sys::Element;
use yew::prelude::*;
use yew_hooks::prelude::*;

use super::reveal::VisibilityWatch;

pub const COUNT_DURATION_MS: u32 = 2000;
pub const COUNT_TICK_MS: u32 = 16;
const VISIBLE_THRESHOLD: f64 = 0.5;

/// Linear count from zero to `target`, one step per tick.
#[derive(Clone, Debug, PartialEq)]
pub struct CountUp {
    target: u64,
    step: f64,
    current: f64,
    running: bool,
}

pub enum CountAction {
    Start,
    Tick,
}

impl CountUp {
    pub fn new(target: u64, duration_ms: u32, tick_ms: u32) -> Self {
        let ticks = (f64::from(duration_ms) / f64::from(tick_ms.max(1))).max(1.0);
        Self {
            target,
            step: target as f64 / ticks,
            current: 0.0,
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_done(&self) -> bool {
        self.current >= self.target as f64
    }

    pub fn value(&self) -> u64 {
        if self.is_done() {
            self.target
        } else {
            self.current.floor() as u64
        }
    }

    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        self.current += self.step;
        if self.is_done() {
            self.current = self.target as f64;
            self.running = false;
        }
    }
}

impl Reducible for CountUp {
    type Action = CountAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            // counted only once
            CountAction::Start if self.running || self.current > 0.0 => return self,
            CountAction::Start => next.running = !next.is_done(),
            CountAction::Tick => next.tick(),
        }
        Rc::new(next)
    }
}

/// `12500` -> `"12.500"`.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

#[derive(Properties, PartialEq)]
pub struct AnimatedCounterProps {
    pub target: u64,
    #[prop_or_default]
    pub suffix: AttrValue,
}

#[function_component(AnimatedCounter)]
pub fn animated_counter(props: &AnimatedCounterProps) -> Html {
    let node = use_node_ref();
    let count = {
        let target = props.target;
        use_reducer(move || CountUp::new(target, COUNT_DURATION_MS, COUNT_TICK_MS))
    };

    {
        let node = node.clone();
        let dispatcher = count.dispatcher();
        use_effect_with_deps(
            move |_| {
                let watch = node.cast::<Element>().and_then(|element| {
                    let watch = VisibilityWatch::new(VISIBLE_THRESHOLD, None, move |target, observer| {
                        dispatcher.dispatch(CountAction::Start);
                        observer.unobserve(target);
                    });
                    match watch {
                        Ok(watch) => {
                            watch.observe(&element);
                            Some(watch)
                        }
                        Err(e) => {
                            warn!("Counter observer failed: {:?}", e);
                            None
                        }
                    }
                });
                move || drop(watch)
            },
            (),
        );
    }

    {
        let dispatcher = count.dispatcher();
        let millis = if count.is_running() { COUNT_TICK_MS } else { 0 };
        use_interval(move || dispatcher.dispatch(CountAction::Tick), millis);
    }

    html! {
        <span
            ref={node}
            class={classes!("counter", (!count.is_running() && count.is_done()).then_some("counted"))}
            data-target={props.target.to_string()}
        >
            {format!("{}{}", format_thousands(count.value()), props.suffix)}
        </span>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_dots() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1.000");
        assert_eq!(format_thousands(12500), "12.500");
        assert_eq!(format_thousands(1234567), "1.234.567");
    }

    #[test]
    fn counts_up_to_target_and_stops() {
        let mut count = Rc::new(CountUp::new(250, COUNT_DURATION_MS, COUNT_TICK_MS));
        assert_eq!(count.value(), 0);
        count = count.reduce(CountAction::Tick);
        assert_eq!(count.value(), 0, "ticks before start do nothing");

        count = count.reduce(CountAction::Start);
        assert!(count.is_running());
        count = count.reduce(CountAction::Tick);
        assert_eq!(count.value(), 2);

        for _ in 0..200 {
            count = count.reduce(CountAction::Tick);
        }
        assert_eq!(count.value(), 250);
        assert!(!count.is_running());
    }

    #[test]
    fn start_is_ignored_once_counting_began() {
        let count = Rc::new(CountUp::new(100, 160, 16)).reduce(CountAction::Start);
        let count = count.reduce(CountAction::Tick);
        let again = count.clone().reduce(CountAction::Start);
        assert!(Rc::ptr_eq(&count, &again));
        assert_eq!(count.value(), 10);
    }
}
