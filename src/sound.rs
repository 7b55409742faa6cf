//! Sound effects
//!
//! The administrator picks one URL per sound event. Decoding and playback
//! belong to the host environment, reached through the [`SoundPlayer`]
//! trait; this module only decides what to play and how loud.

use enum_map::{Enum, EnumMap, enum_map};
use serde::{Deserialize, Serialize};

use crate::constants::sound::{DEFAULT_VOLUME, NONE};

/// Moments in the game that can play a sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SoundEvent {
    /// A team guessed a card
    CorrectGuess,
    /// The turn timer ran out
    TimeUp,
    /// A turn started
    GameStart,
    /// Any button press
    ButtonClick,
}

/// The configured URL for every sound event, `"none"` meaning muted
pub type SoundEffects = EnumMap<SoundEvent, String>;

/// The sound effects a fresh installation starts with
pub fn default_sound_effects() -> SoundEffects {
    enum_map! {
        SoundEvent::CorrectGuess => "/sounds/correct.mp3".to_owned(),
        SoundEvent::TimeUp => "/sounds/timeup.mp3".to_owned(),
        SoundEvent::GameStart => "/sounds/start.mp3".to_owned(),
        SoundEvent::ButtonClick => "/sounds/click.mp3".to_owned(),
    }
}

/// A named sound offered in the admin console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SoundPreset {
    /// Display name
    pub name: &'static str,
    /// Location of the audio file
    pub url: &'static str,
}

const fn preset(name: &'static str, url: &'static str) -> SoundPreset {
    SoundPreset { name, url }
}

const CORRECT_GUESS_PRESETS: [SoundPreset; 3] = [
    preset("Success Bell", "/sounds/success-bell.mp3"),
    preset("Celebration", "/sounds/celebration.mp3"),
    preset("Ding", "/sounds/ding.mp3"),
];
const TIME_UP_PRESETS: [SoundPreset; 3] = [
    preset("Buzzer", "/sounds/buzzer.mp3"),
    preset("Bell Ring", "/sounds/bell-ring.mp3"),
    preset("Alert", "/sounds/alert.mp3"),
];
const GAME_START_PRESETS: [SoundPreset; 3] = [
    preset("Whistle", "/sounds/whistle.mp3"),
    preset("Start Horn", "/sounds/start-horn.mp3"),
    preset("Chime", "/sounds/chime.mp3"),
];
const BUTTON_CLICK_PRESETS: [SoundPreset; 3] = [
    preset("Click", "/sounds/click.mp3"),
    preset("Pop", "/sounds/pop.mp3"),
    preset("Tap", "/sounds/tap.mp3"),
];

impl SoundEvent {
    /// Human readable name of the event
    pub fn label(self) -> &'static str {
        match self {
            Self::CorrectGuess => "Correct Guess",
            Self::TimeUp => "Time Up",
            Self::GameStart => "Game Start",
            Self::ButtonClick => "Button Click",
        }
    }

    /// The presets offered for this event
    pub fn presets(self) -> &'static [SoundPreset] {
        match self {
            Self::CorrectGuess => &CORRECT_GUESS_PRESETS,
            Self::TimeUp => &TIME_UP_PRESETS,
            Self::GameStart => &GAME_START_PRESETS,
            Self::ButtonClick => &BUTTON_CLICK_PRESETS,
        }
    }

    /// Names the sound configured at `url`: "No Sound", a preset name,
    /// or "Custom Sound" for anything else
    pub fn preset_name(self, url: &str) -> &'static str {
        if is_muted(url) {
            return "No Sound";
        }
        self.presets()
            .iter()
            .find(|preset| preset.url == url)
            .map_or("Custom Sound", |preset| preset.name)
    }
}

fn is_muted(url: &str) -> bool {
    url.is_empty() || url == NONE
}

/// Playback backend provided by the host environment
pub trait SoundPlayer {
    /// Plays the audio at `url` with `volume` in `[0, 1]`
    fn play(&self, url: &str, volume: f32);
}

/// Chooses and triggers sound effects at a master volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundBoard {
    volume: f32,
}

impl Default for SoundBoard {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
        }
    }
}

impl SoundBoard {
    /// Creates a board with the given master volume, clamped to `[0, 1]`
    pub fn new(volume: f32) -> Self {
        let mut board = Self::default();
        board.set_volume(volume);
        board
    }

    /// Current master volume
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Sets the master volume, clamped to `[0, 1]`; NaN mutes
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
    }

    /// Returns the URL to play for `event`, or `None` if it is muted
    pub fn url_for(effects: &SoundEffects, event: SoundEvent) -> Option<&str> {
        let url = effects[event].as_str();
        (!is_muted(url)).then_some(url)
    }

    /// Plays the sound for `event` if sound is enabled and the event is not muted
    ///
    /// Returns whether anything was played.
    pub fn trigger<P: SoundPlayer>(
        &self,
        event: SoundEvent,
        enabled: bool,
        effects: &SoundEffects,
        player: &P,
    ) -> bool {
        if !enabled {
            return false;
        }
        match Self::url_for(effects, event) {
            Some(url) => {
                tracing::debug!(?event, url, "playing sound effect");
                player.play(url, self.volume);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct RecordingPlayer {
        played: RefCell<Vec<(String, f32)>>,
    }

    impl SoundPlayer for RecordingPlayer {
        fn play(&self, url: &str, volume: f32) {
            self.played.borrow_mut().push((url.to_string(), volume));
        }
    }

    #[test]
    fn test_default_effects_serialize_camel_case() {
        let json = serde_json::to_value(default_sound_effects()).unwrap();
        assert_eq!(json["correctGuess"], "/sounds/correct.mp3");
        assert_eq!(json["buttonClick"], "/sounds/click.mp3");
    }

    #[test]
    fn test_preset_name() {
        assert_eq!(SoundEvent::TimeUp.preset_name("none"), "No Sound");
        assert_eq!(SoundEvent::TimeUp.preset_name("/sounds/buzzer.mp3"), "Buzzer");
        assert_eq!(
            SoundEvent::TimeUp.preset_name("https://example.com/x.mp3"),
            "Custom Sound"
        );
    }

    #[test]
    fn test_volume_is_clamped() {
        assert_eq!(SoundBoard::new(1.5).volume(), 1.0);
        assert_eq!(SoundBoard::new(-0.5).volume(), 0.0);
        assert_eq!(SoundBoard::new(f32::NAN).volume(), 0.0);
        assert_eq!(SoundBoard::default().volume(), DEFAULT_VOLUME);
    }

    #[test]
    fn test_trigger_plays_configured_url() {
        let player = RecordingPlayer::default();
        let board = SoundBoard::new(0.5);
        let effects = default_sound_effects();

        assert!(board.trigger(SoundEvent::CorrectGuess, true, &effects, &player));
        assert_eq!(
            player.played.borrow().as_slice(),
            &[("/sounds/correct.mp3".to_string(), 0.5)]
        );
    }

    #[test]
    fn test_trigger_respects_disabled_and_muted() {
        let player = RecordingPlayer::default();
        let board = SoundBoard::default();
        let mut effects = default_sound_effects();

        assert!(!board.trigger(SoundEvent::TimeUp, false, &effects, &player));

        effects[SoundEvent::TimeUp] = NONE.to_string();
        assert!(!board.trigger(SoundEvent::TimeUp, true, &effects, &player));
        assert!(player.played.borrow().is_empty());
    }
}
