//! Top-level mode state machine
//!
//! Screens are states; discrete UI events move between them. Anything not in
//! the table leaves the mode unchanged.

use crate::input::{InputSnapshot, Key};

/// Which screen is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    MainMenu,
    TrackSelect,
    TrackEditor,
    Race,
    Exit,
}

/// Discrete events raised by the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// "Play" on the main menu
    Play,
    /// "Create Track" on the main menu
    CreateTrack,
    /// A track was picked on the select screen and finalized as raceable
    TrackChosen,
    /// Back / Escape
    Back,
    /// The editor saved its track
    TrackSaved,
    /// Someone reached the lap target
    RaceFinished,
    /// "Exit" button or window close
    Quit,
}

impl Mode {
    /// Next mode after `event`
    pub fn on(self, event: UiEvent) -> Mode {
        use Mode::*;
        use UiEvent::*;

        let next = match (self, event) {
            (Exit, _) => Exit,
            (_, Quit) => Exit,

            (MainMenu, Play) => TrackSelect,
            (MainMenu, CreateTrack) => TrackEditor,

            (TrackSelect, TrackChosen) => Race,
            (TrackSelect, Back) => MainMenu,

            (TrackEditor, TrackSaved) => MainMenu,
            (TrackEditor, Back) => MainMenu,

            (Race, RaceFinished) => MainMenu,
            (Race, Back) => MainMenu,

            (mode, _) => mode,
        };

        if next != self {
            log::info!("Mode {:?} -> {:?} on {:?}", self, next, event);
        }
        next
    }

    /// Apply the per-tick quit and escape checks
    pub fn poll(self, input: &InputSnapshot) -> Mode {
        if input.quit {
            self.on(UiEvent::Quit)
        } else if input.is_pressed(Key::Escape) {
            self.on(UiEvent::Back)
        } else {
            self
        }
    }

    pub fn is_running(self) -> bool {
        self != Mode::Exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_through_race_and_back() {
        let mode = Mode::default()
            .on(UiEvent::Play)
            .on(UiEvent::TrackChosen)
            .on(UiEvent::RaceFinished);
        assert_eq!(mode, Mode::MainMenu);
    }

    #[test]
    fn test_quit_from_anywhere() {
        for mode in [Mode::MainMenu, Mode::TrackSelect, Mode::TrackEditor, Mode::Race] {
            assert_eq!(mode.on(UiEvent::Quit), Mode::Exit);
        }
        assert!(!Mode::Exit.is_running());
        assert_eq!(Mode::Exit.on(UiEvent::Play), Mode::Exit);
    }

    #[test]
    fn test_unlisted_events_are_ignored() {
        assert_eq!(Mode::MainMenu.on(UiEvent::TrackChosen), Mode::MainMenu);
        assert_eq!(Mode::Race.on(UiEvent::CreateTrack), Mode::Race);
        assert_eq!(Mode::TrackEditor.on(UiEvent::Play), Mode::TrackEditor);
    }

    #[test]
    fn test_poll_quit_and_escape() {
        let quit = InputSnapshot {
            quit: true,
            ..Default::default()
        };
        assert_eq!(Mode::Race.poll(&quit), Mode::Exit);
        assert_eq!(Mode::Race.poll(&InputSnapshot::with_keys(&[Key::Escape])), Mode::MainMenu);
        assert_eq!(Mode::Race.poll(&InputSnapshot::default()), Mode::Race);
    }

    #[test]
    fn test_editor_returns_to_menu() {
        assert_eq!(Mode::MainMenu.on(UiEvent::CreateTrack), Mode::TrackEditor);
        assert_eq!(Mode::TrackEditor.on(UiEvent::TrackSaved), Mode::MainMenu);
        assert_eq!(Mode::TrackEditor.on(UiEvent::Back), Mode::MainMenu);
    }
}
