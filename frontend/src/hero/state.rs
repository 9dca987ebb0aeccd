//! Expansion state machine.
//!
//! `ExpansionState::transition` is the only place progress changes. It never
//! touches the DOM: it returns the next state plus a list of [`Effect`]s, and
//! the controller executes those against the page.

use super::input::{self, Gesture};

/// Below this, an animation running backwards hides the content panel again.
pub const CONTENT_HIDE_BELOW: f64 = 0.75;
/// Where a collapse gesture resumes the animation.
pub const COLLAPSE_RESUME_PROGRESS: f64 = 0.99;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Collapsed,
    Animating,
    Expanded,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Input {
    Wheel { delta_y: f64, scroll_y: f64 },
    TouchStart { y: f64 },
    TouchMove { y: f64, scroll_y: f64 },
    TouchEnd,
    NativeScroll,
    Resize,
    /// Anchor navigation or an explicit "expand now" request.
    JumpToEnd,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    PreventDefault,
    LockScroll,
    UnlockScroll,
    /// Force the document back to offset 0.
    ResetScroll,
    /// Content panel visible, initial call-to-action hidden.
    ShowContent,
    HideContent,
    /// Paint on the next animation frame.
    Render,
    /// Paint synchronously, skipping intermediate frames.
    RenderNow,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExpansionState {
    progress: f64,
    fully_expanded: bool,
    content_visible: bool,
    touch_anchor: Option<f64>,
}

impl Default for ExpansionState {
    fn default() -> Self {
        Self::collapsed()
    }
}

impl ExpansionState {
    pub fn collapsed() -> Self {
        Self {
            progress: 0.0,
            fully_expanded: false,
            content_visible: false,
            touch_anchor: None,
        }
    }

    /// Initial state for a page load. Arriving with a fragment (`/#pricing`)
    /// or a restored scroll offset skips the effect entirely.
    pub fn on_load(fragment: &str, scroll_y: f64) -> Self {
        let has_fragment = !fragment.is_empty() && fragment != "#";
        if has_fragment || scroll_y > 0.0 {
            Self {
                progress: 1.0,
                fully_expanded: true,
                content_visible: true,
                touch_anchor: None,
            }
        } else {
            Self::collapsed()
        }
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_fully_expanded(&self) -> bool {
        self.fully_expanded
    }

    pub fn is_animating(&self) -> bool {
        self.progress > 0.0 && self.progress < 1.0
    }

    pub fn content_visible(&self) -> bool {
        self.content_visible
    }

    pub fn scroll_locked(&self) -> bool {
        !self.fully_expanded
    }

    pub fn phase(&self) -> Phase {
        if self.fully_expanded {
            Phase::Expanded
        } else if self.progress > 0.0 {
            Phase::Animating
        } else {
            Phase::Collapsed
        }
    }

    pub fn transition(mut self, input: Input) -> (Self, Vec<Effect>) {
        let mut effects = Vec::new();
        match input {
            Input::Wheel { delta_y, scroll_y } => {
                let gesture = input::classify_wheel(delta_y, scroll_y, self.fully_expanded);
                self.apply_gesture(gesture, &mut effects);
            }
            Input::TouchStart { y } => self.touch_anchor = Some(y),
            Input::TouchMove { y, scroll_y } => {
                if let Some(anchor) = self.touch_anchor {
                    let gesture = input::classify_touch(anchor - y, scroll_y, self.fully_expanded);
                    if matches!(gesture, Gesture::Progress(_)) {
                        self.touch_anchor = Some(y);
                    }
                    self.apply_gesture(gesture, &mut effects);
                }
            }
            Input::TouchEnd => self.touch_anchor = None,
            Input::NativeScroll => {
                if !self.fully_expanded {
                    effects.push(Effect::ResetScroll);
                }
            }
            Input::Resize => effects.push(Effect::Render),
            Input::JumpToEnd => {
                if !self.fully_expanded {
                    self.progress = 1.0;
                    effects.push(Effect::RenderNow);
                    self.complete(&mut effects);
                }
            }
        }
        (self, effects)
    }

    pub fn apply(&mut self, input: Input) -> Vec<Effect> {
        let (next, effects) = self.transition(input);
        *self = next;
        effects
    }

    fn apply_gesture(&mut self, gesture: Gesture, effects: &mut Vec<Effect>) {
        match gesture {
            Gesture::Progress(delta) => {
                effects.push(Effect::PreventDefault);
                self.progress = (self.progress + delta).clamp(0.0, 1.0);
                effects.push(Effect::Render);
                if self.progress >= 1.0 {
                    self.complete(effects);
                } else if self.progress < CONTENT_HIDE_BELOW {
                    self.set_content(false, effects);
                }
            }
            Gesture::BeginCollapse => {
                self.fully_expanded = false;
                self.progress = COLLAPSE_RESUME_PROGRESS;
                effects.push(Effect::PreventDefault);
                effects.push(Effect::LockScroll);
                self.set_content(false, effects);
                effects.push(Effect::ResetScroll);
                effects.push(Effect::Render);
            }
            Gesture::Ignore => {}
        }
    }

    /// The only path that sets `fully_expanded`.
    fn complete(&mut self, effects: &mut Vec<Effect>) {
        self.progress = 1.0;
        self.fully_expanded = true;
        effects.push(Effect::UnlockScroll);
        self.set_content(true, effects);
    }

    fn set_content(&mut self, visible: bool, effects: &mut Vec<Effect>) {
        if self.content_visible != visible {
            self.content_visible = visible;
            effects.push(if visible { Effect::ShowContent } else { Effect::HideContent });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wheel(delta_y: f64) -> Input {
        Input::Wheel { delta_y, scroll_y: 0.0 }
    }

    #[test]
    fn starts_collapsed_and_locked() {
        let state = ExpansionState::on_load("", 0.0);
        assert_eq!(state.phase(), Phase::Collapsed);
        assert!(state.scroll_locked());
        assert!(!state.content_visible());
    }

    #[test]
    fn fragment_or_restored_scroll_starts_expanded() {
        for state in [
            ExpansionState::on_load("#pricing", 0.0),
            ExpansionState::on_load("", 420.0),
        ] {
            assert_eq!(state.phase(), Phase::Expanded);
            assert!(!state.scroll_locked());
            assert!(state.content_visible());
        }
        assert_eq!(ExpansionState::on_load("#", 0.0).phase(), Phase::Collapsed);
    }

    #[test]
    fn progress_stays_clamped_for_any_delta_sequence() {
        let mut state = ExpansionState::collapsed();
        let deltas = [
            -500.0, 300.0, 2_000.0, -10_000.0, 1e9, -1e9, 55.5, -3.25, 700.0, 700.0,
        ];
        for delta_y in deltas.iter().cycle().take(200) {
            state.apply(wheel(*delta_y));
            assert!((0.0..=1.0).contains(&state.progress()));
            if state.is_fully_expanded() {
                state.apply(wheel(-1.0));
            }
        }
        let mut touch = ExpansionState::collapsed();
        touch.apply(Input::TouchStart { y: 0.0 });
        for y in [-5_000.0, 5_000.0, -1.0, 10_000.0, -10_000.0] {
            touch.apply(Input::TouchMove { y, scroll_y: 0.0 });
            assert!((0.0..=1.0).contains(&touch.progress()));
        }
    }

    #[test]
    fn wheel_input_animates_and_prevents_native_scroll() {
        let (state, effects) = ExpansionState::collapsed().transition(wheel(100.0));
        assert_eq!(state.phase(), Phase::Animating);
        assert!(state.is_animating());
        assert_eq!(effects, vec![Effect::PreventDefault, Effect::Render]);
    }

    #[test]
    fn reaching_one_completes_and_unlocks() {
        let mut state = ExpansionState::collapsed();
        let mut seen = Vec::new();
        while !state.is_fully_expanded() {
            seen.extend(state.apply(wheel(120.0)));
        }
        assert_eq!(state.progress(), 1.0);
        assert!(!state.scroll_locked());
        assert!(seen.contains(&Effect::UnlockScroll));
        assert!(seen.contains(&Effect::ShowContent));
    }

    #[test]
    fn expanded_state_ignores_ordinary_scrolling() {
        let (mut state, _) = ExpansionState::collapsed().transition(Input::JumpToEnd);
        assert!(state.apply(wheel(80.0)).is_empty());
        assert!(state.apply(Input::Wheel { delta_y: -80.0, scroll_y: 900.0 }).is_empty());
        assert!(state.apply(Input::NativeScroll).is_empty());
        assert!(state.is_fully_expanded());
    }

    #[test]
    fn upward_wheel_at_top_resumes_collapse() {
        let (mut state, _) = ExpansionState::collapsed().transition(Input::JumpToEnd);
        let effects = state.apply(Input::Wheel { delta_y: -30.0, scroll_y: 3.0 });
        assert!((state.progress() - COLLAPSE_RESUME_PROGRESS).abs() < 1e-12);
        assert!(!state.is_fully_expanded());
        assert!(state.scroll_locked());
        assert_eq!(
            effects,
            vec![
                Effect::PreventDefault,
                Effect::LockScroll,
                Effect::HideContent,
                Effect::ResetScroll,
                Effect::Render,
            ]
        );
    }

    #[test]
    fn downward_swipe_at_top_resumes_collapse() {
        let (mut state, _) = ExpansionState::collapsed().transition(Input::JumpToEnd);
        state.apply(Input::TouchStart { y: 200.0 });
        let effects = state.apply(Input::TouchMove { y: 240.0, scroll_y: 0.0 });
        assert!(effects.contains(&Effect::LockScroll));
        assert_eq!(state.phase(), Phase::Animating);
    }

    #[test]
    fn content_hides_only_below_threshold() {
        let (mut state, _) = ExpansionState::collapsed().transition(Input::JumpToEnd);
        state.apply(wheel(-1.0));
        // 0.99 -> 0.8: still above the threshold, content was already hidden
        // by the collapse gesture and nothing new is emitted
        let effects = state.apply(wheel(-211.0));
        assert!(state.progress() > CONTENT_HIDE_BELOW);
        assert!(!effects.contains(&Effect::HideContent));
        assert!(!state.content_visible());
    }

    #[test]
    fn jump_to_end_completes_immediately() {
        let (mid, _) = ExpansionState::collapsed().transition(wheel(200.0));
        let (state, effects) = mid.transition(Input::JumpToEnd);
        assert_eq!(state.phase(), Phase::Expanded);
        assert_eq!(
            effects,
            vec![Effect::RenderNow, Effect::UnlockScroll, Effect::ShowContent]
        );
        let (again, effects) = state.transition(Input::JumpToEnd);
        assert_eq!(again, state);
        assert!(effects.is_empty());
    }

    #[test]
    fn native_scroll_is_pinned_while_locked() {
        let (_, effects) = ExpansionState::collapsed().transition(Input::NativeScroll);
        assert_eq!(effects, vec![Effect::ResetScroll]);
    }

    #[test]
    fn touch_requires_an_anchor_and_tracks_it() {
        let mut state = ExpansionState::collapsed();
        assert!(state.apply(Input::TouchMove { y: 100.0, scroll_y: 0.0 }).is_empty());

        state.apply(Input::TouchStart { y: 500.0 });
        state.apply(Input::TouchMove { y: 450.0, scroll_y: 0.0 });
        let after_first = state.progress();
        assert!((after_first - 0.25).abs() < 1e-12);

        // anchor moved to 450, so a second identical position adds nothing
        state.apply(Input::TouchMove { y: 450.0, scroll_y: 0.0 });
        assert_eq!(state.progress(), after_first);

        state.apply(Input::TouchEnd);
        assert!(state.apply(Input::TouchMove { y: 0.0, scroll_y: 0.0 }).is_empty());
    }

    #[test]
    fn fully_expanded_only_through_completion() {
        let mut state = ExpansionState::collapsed();
        for _ in 0..5 {
            state.apply(wheel(100.0));
            assert_eq!(state.is_fully_expanded(), state.progress() >= 1.0);
        }
        state.apply(wheel(-10_000.0));
        assert_eq!(state.progress(), 0.0);
        assert!(!state.is_fully_expanded());
    }
}
