/// Edge state of a button across two consecutive frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonState {
    #[default]
    Up,
    Pressed,
    Held,
    Released,
}

impl ButtonState {
    pub fn from_raw_states(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => ButtonState::Pressed,
            (true, true) => ButtonState::Held,
            (true, false) => ButtonState::Released,
            (false, false) => ButtonState::Up,
        }
    }

    #[inline]
    pub fn is_down(self) -> bool {
        matches!(self, ButtonState::Pressed | ButtonState::Held)
    }

    #[inline]
    pub fn just_pressed(self) -> bool {
        self == ButtonState::Pressed
    }
}

/// Raw device snapshot for one frame, as read from the window backend.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub escape: bool,
    /// Pointer movement in pixels since the last frame.
    pub mouse_delta: (f32, f32),
    pub primary: bool,
    pub secondary: bool,
    /// Wheel notches; only the sign is used.
    pub scroll: i32,
}

/// Input handed to [`crate::PlayerController::update`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub raw: InputState,
    pub primary: ButtonState,
    pub secondary: ButtonState,
}

impl FrameInput {
    /// Input with no button history; a down button counts as freshly pressed.
    pub fn from_raw(raw: InputState) -> Self {
        Self {
            raw,
            primary: ButtonState::from_raw_states(false, raw.primary),
            secondary: ButtonState::from_raw_states(false, raw.secondary),
        }
    }
}

/// Remembers last frame's buttons so presses fire once.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputTracker {
    previous: InputState,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, raw: InputState) -> FrameInput {
        let out = FrameInput {
            raw,
            primary: ButtonState::from_raw_states(self.previous.primary, raw.primary),
            secondary: ButtonState::from_raw_states(self.previous.secondary, raw.secondary),
        };
        self.previous = raw;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_cover_all_pairs() {
        assert_eq!(ButtonState::from_raw_states(false, false), ButtonState::Up);
        assert_eq!(ButtonState::from_raw_states(false, true), ButtonState::Pressed);
        assert_eq!(ButtonState::from_raw_states(true, true), ButtonState::Held);
        assert_eq!(ButtonState::from_raw_states(true, false), ButtonState::Released);
    }

    #[test]
    fn press_fires_once_while_held() {
        let mut tracker = InputTracker::new();
        let down = InputState {
            secondary: true,
            ..Default::default()
        };
        let frames: Vec<_> = [down, down, down, InputState::default(), down]
            .into_iter()
            .map(|raw| tracker.update(raw).secondary)
            .collect();
        assert_eq!(
            frames,
            vec![
                ButtonState::Pressed,
                ButtonState::Held,
                ButtonState::Held,
                ButtonState::Released,
                ButtonState::Pressed,
            ]
        );
        assert_eq!(frames.iter().filter(|s| s.just_pressed()).count(), 2);
    }

    #[test]
    fn buttons_are_tracked_independently() {
        let mut tracker = InputTracker::new();
        tracker.update(InputState {
            primary: true,
            ..Default::default()
        });
        let f = tracker.update(InputState {
            primary: true,
            secondary: true,
            ..Default::default()
        });
        assert_eq!(f.primary, ButtonState::Held);
        assert_eq!(f.secondary, ButtonState::Pressed);
        assert!(f.primary.is_down());
    }
}
