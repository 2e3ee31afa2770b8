use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{
    InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState, PointerButtonEvent,
    PointerMoveEvent,
};

/// Pixels treated as one wheel line for high-precision scrolling.
const PIXELS_PER_LINE: f32 = 40.0;

/// Current input state for a single window.
///
/// Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,

    /// Pointer position in logical pixels; `None` while outside the window.
    pub pointer_pos: Option<(f32, f32)>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies an input event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Releases are not delivered while unfocused.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                // No delta on re-entry: the jump from the exit point is not motion.
                if let Some((px, py)) = self.pointer_pos {
                    frame.pointer_delta.0 += x - px;
                    frame.pointer_delta.1 += y - py;
                }
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key { key, state, modifiers, .. } => {
                self.modifiers = *modifiers;

                match state {
                    KeyState::Pressed => {
                        if self.keys_down.insert(*key) {
                            frame.keys_pressed.insert(*key);
                        }
                    }
                    KeyState::Released => {
                        if self.keys_down.remove(key) {
                            frame.keys_released.insert(*key);
                        }
                    }
                }
            }

            InputEvent::PointerButton(PointerButtonEvent { button, state, modifiers }) => {
                self.modifiers = *modifiers;

                match state {
                    MouseButtonState::Pressed => {
                        if self.buttons_down.insert(*button) {
                            frame.buttons_pressed.insert(*button);
                        }
                    }
                    MouseButtonState::Released => {
                        if self.buttons_down.remove(button) {
                            frame.buttons_released.insert(*button);
                        }
                    }
                }
            }

            InputEvent::MouseWheel { delta, modifiers } => {
                self.modifiers = *modifiers;
                frame.wheel_lines += delta.lines_y(PIXELS_PER_LINE);
            }
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseWheelDelta;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key { key, state, modifiers: Modifiers::default(), repeat: false }
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(PointerMoveEvent { x, y })
    }

    #[test]
    fn held_key_reports_press_once() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        s.apply_event(&mut f, key(Key::W, KeyState::Pressed));
        f.clear();
        s.apply_event(&mut f, key(Key::W, KeyState::Pressed));

        assert!(s.key_down(Key::W));
        assert!(!f.key_pressed(Key::W));
    }

    #[test]
    fn release_clears_held_key() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        s.apply_event(&mut f, key(Key::A, KeyState::Pressed));
        s.apply_event(&mut f, key(Key::A, KeyState::Released));

        assert!(!s.key_down(Key::A));
        assert!(f.keys_released.contains(&Key::A));
    }

    #[test]
    fn focus_loss_releases_everything() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        s.apply_event(&mut f, key(Key::S, KeyState::Pressed));
        s.apply_event(&mut f, InputEvent::Focused(false));
        assert!(s.keys_down.is_empty());
    }

    #[test]
    fn pointer_delta_accumulates_within_a_frame() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        s.apply_event(&mut f, moved(10.0, 10.0));
        assert_eq!(f.pointer_delta, (0.0, 0.0));

        s.apply_event(&mut f, moved(13.0, 8.0));
        s.apply_event(&mut f, moved(15.0, 9.0));
        assert_eq!(f.pointer_delta, (5.0, -1.0));

        f.clear();
        assert_eq!(f.pointer_delta, (0.0, 0.0));
    }

    #[test]
    fn reentry_does_not_produce_a_jump() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        s.apply_event(&mut f, moved(0.0, 0.0));
        s.apply_event(&mut f, InputEvent::PointerLeft);
        s.apply_event(&mut f, moved(500.0, 300.0));
        assert_eq!(f.pointer_delta, (0.0, 0.0));
    }

    #[test]
    fn wheel_sums_lines_and_pixels() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        let m = Modifiers::default();
        s.apply_event(&mut f, InputEvent::MouseWheel { delta: MouseWheelDelta::Line { x: 0.0, y: 1.0 }, modifiers: m });
        s.apply_event(&mut f, InputEvent::MouseWheel { delta: MouseWheelDelta::Pixel { x: 0.0, y: 80.0 }, modifiers: m });
        assert_eq!(f.wheel_lines, 3.0);
    }
}
