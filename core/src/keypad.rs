/// # Keypad
/// The 16-key hex keypad, queried by `EX9E` and `EXA1`
///
/// The core never polls hardware itself; the host hands in whatever tracks its
/// key state. Keys are `0x0..=0xF`.
pub trait Keypad {
    fn is_key_down(&self, key: u8) -> bool;
}

impl Keypad for [bool; 16] {
    fn is_key_down(&self, key: u8) -> bool {
        self[usize::from(key & 0xF)]
    }
}

/// Pressed status of keys 0..F for hosts that track presses and releases as events
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Keys {
    pressed: [bool; 16],
}

impl Keys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pressed status of key
    pub fn press(&mut self, key: u8) {
        self.pressed[usize::from(key & 0xF)] = true;
    }

    /// Unset the pressed status of key
    pub fn release(&mut self, key: u8) {
        self.pressed[usize::from(key & 0xF)] = false;
    }

    pub fn release_all(&mut self) {
        self.pressed = [false; 16];
    }
}

impl Keypad for Keys {
    fn is_key_down(&self, key: u8) -> bool {
        self.pressed.is_key_down(key)
    }
}
