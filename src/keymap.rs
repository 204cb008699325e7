use sdl2::{event::Event, keyboard::Keycode};

// host keys for the chip-8 keypad, laid out as:
//   1 2 3 C      1 2 3 4
//   4 5 6 D  ->  Q W E R
//   7 8 9 E      A S D F
//   A 0 B F      Z X C V
const KEYPAD: [(Keycode, u8); 16] = [
    (Keycode::Num1, 0x1),
    (Keycode::Num2, 0x2),
    (Keycode::Num3, 0x3),
    (Keycode::Num4, 0xC),
    (Keycode::Q, 0x4),
    (Keycode::W, 0x5),
    (Keycode::E, 0x6),
    (Keycode::R, 0xD),
    (Keycode::A, 0x7),
    (Keycode::S, 0x8),
    (Keycode::D, 0x9),
    (Keycode::F, 0xE),
    (Keycode::Z, 0xA),
    (Keycode::X, 0x0),
    (Keycode::C, 0xB),
    (Keycode::V, 0xF),
];

/// Actions to be executed by the application
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    EmulateKeyState(u8, bool),
    TogglePause,
    Quit,
}

fn keypad_key(keycode: Keycode) -> Option<u8> {
    KEYPAD
        .iter()
        .find(|(host, _)| *host == keycode)
        .map(|(_, key)| *key)
}

/// Translate an SDL2 event into an action to be executed by the app
pub fn translate_action(event: &Event) -> Option<Action> {
    match event {
        Event::Quit { .. } => Some(Action::Quit),
        Event::KeyDown {
            keycode: Some(Keycode::Escape),
            ..
        } => Some(Action::Quit),
        Event::KeyDown {
            keycode: Some(Keycode::Space),
            repeat: false,
            ..
        } => Some(Action::TogglePause),
        Event::KeyDown {
            keycode: Some(keycode),
            ..
        } => keypad_key(*keycode).map(|key| Action::EmulateKeyState(key, true)),
        Event::KeyUp {
            keycode: Some(keycode),
            ..
        } => keypad_key(*keycode).map(|key| Action::EmulateKeyState(key, false)),
        _ => None,
    }
}
