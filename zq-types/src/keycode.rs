use serde::{Deserialize, Serialize};

/// Keycodes from the HID keyboard/keypad page, extended with the mouse key
/// range (0xCD..=0xDF) used by the keymap.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidKeyCode {
    /// Reserved, no-key.
    No = 0x00,
    ErrorRollover = 0x01,
    PostFail = 0x02,
    ErrorUndefined = 0x03,

    // Letters
    A = 0x04,
    B = 0x05,
    C = 0x06,
    D = 0x07,
    E = 0x08,
    F = 0x09,
    G = 0x0A,
    H = 0x0B,
    I = 0x0C,
    J = 0x0D,
    K = 0x0E,
    L = 0x0F,
    M = 0x10,
    N = 0x11,
    O = 0x12,
    P = 0x13,
    Q = 0x14,
    R = 0x15,
    S = 0x16,
    T = 0x17,
    U = 0x18,
    V = 0x19,
    W = 0x1A,
    X = 0x1B,
    Y = 0x1C,
    Z = 0x1D,

    // Number row
    Kc1 = 0x1E,
    Kc2 = 0x1F,
    Kc3 = 0x20,
    Kc4 = 0x21,
    Kc5 = 0x22,
    Kc6 = 0x23,
    Kc7 = 0x24,
    Kc8 = 0x25,
    Kc9 = 0x26,
    Kc0 = 0x27,

    Enter = 0x28,
    Escape = 0x29,
    Backspace = 0x2A,
    Tab = 0x2B,
    Space = 0x2C,
    Minus = 0x2D,
    Equal = 0x2E,
    LeftBracket = 0x2F,
    RightBracket = 0x30,
    Backslash = 0x31,
    NonusHash = 0x32,
    Semicolon = 0x33,
    Quote = 0x34,
    Grave = 0x35,
    Comma = 0x36,
    Dot = 0x37,
    Slash = 0x38,
    CapsLock = 0x39,

    // Function keys
    F1 = 0x3A,
    F2 = 0x3B,
    F3 = 0x3C,
    F4 = 0x3D,
    F5 = 0x3E,
    F6 = 0x3F,
    F7 = 0x40,
    F8 = 0x41,
    F9 = 0x42,
    F10 = 0x43,
    F11 = 0x44,
    F12 = 0x45,

    PrintScreen = 0x46,
    ScrollLock = 0x47,
    Pause = 0x48,
    Insert = 0x49,
    Home = 0x4A,
    PageUp = 0x4B,
    Delete = 0x4C,
    End = 0x4D,
    PageDown = 0x4E,
    Right = 0x4F,
    Left = 0x50,
    Down = 0x51,
    Up = 0x52,

    NumLock = 0x53,
    KpSlash = 0x54,
    KpAsterisk = 0x55,
    KpMinus = 0x56,
    KpPlus = 0x57,
    KpEnter = 0x58,
    Kp1 = 0x59,
    Kp2 = 0x5A,
    Kp3 = 0x5B,
    Kp4 = 0x5C,
    Kp5 = 0x5D,
    Kp6 = 0x5E,
    Kp7 = 0x5F,
    Kp8 = 0x60,
    Kp9 = 0x61,
    Kp0 = 0x62,
    KpDot = 0x63,
    NonusBackslash = 0x64,
    Application = 0x65,
    KbPower = 0x66,
    KpEqual = 0x67,

    F13 = 0x68,
    F14 = 0x69,
    F15 = 0x6A,
    F16 = 0x6B,
    F17 = 0x6C,
    F18 = 0x6D,
    F19 = 0x6E,
    F20 = 0x6F,
    F21 = 0x70,
    F22 = 0x71,
    F23 = 0x72,
    F24 = 0x73,

    Undo = 0x7A,
    Cut = 0x7B,
    Copy = 0x7C,
    Paste = 0x7D,
    Find = 0x7E,

    // Japanese layout keys used by the default keymap
    International1 = 0x87,
    International2 = 0x88,
    International3 = 0x89,
    Language1 = 0x90,
    Language2 = 0x91,

    // Consumer page keys, carried in the keyboard range for compatibility
    AudioMute = 0xA8,
    AudioVolUp = 0xA9,
    AudioVolDown = 0xAA,
    MediaNextTrack = 0xAB,
    MediaPrevTrack = 0xAC,
    MediaStop = 0xAD,
    MediaPlayPause = 0xAE,
    WwwSearch = 0xB4,
    WwwHome = 0xB5,
    WwwBack = 0xB6,
    WwwForward = 0xB7,
    WwwStop = 0xB8,
    WwwRefresh = 0xB9,
    WwwFavorites = 0xBA,

    // Mouse keys
    MouseUp = 0xCD,
    MouseDown = 0xCE,
    MouseLeft = 0xCF,
    MouseRight = 0xD0,
    MouseBtn1 = 0xD1,
    MouseBtn2 = 0xD2,
    MouseBtn3 = 0xD3,
    MouseBtn4 = 0xD4,
    MouseBtn5 = 0xD5,
    MouseBtn6 = 0xD6,
    MouseBtn7 = 0xD7,
    MouseBtn8 = 0xD8,
    MouseWheelUp = 0xD9,
    MouseWheelDown = 0xDA,
    MouseWheelLeft = 0xDB,
    MouseWheelRight = 0xDC,
    MouseAccel0 = 0xDD,
    MouseAccel1 = 0xDE,
    MouseAccel2 = 0xDF,

    // Modifiers
    LCtrl = 0xE0,
    LShift = 0xE1,
    LAlt = 0xE2,
    LGui = 0xE3,
    RCtrl = 0xE4,
    RShift = 0xE5,
    RAlt = 0xE6,
    RGui = 0xE7,
}

impl HidKeyCode {
    pub fn is_mouse_button(self) -> bool {
        HidKeyCode::MouseBtn1 <= self && self <= HidKeyCode::MouseBtn8
    }

    pub fn is_mouse_wheel(self) -> bool {
        HidKeyCode::MouseWheelUp <= self && self <= HidKeyCode::MouseWheelRight
    }

    pub fn is_mouse_movement(self) -> bool {
        HidKeyCode::MouseUp <= self && self <= HidKeyCode::MouseRight
    }

    pub fn is_mouse_accel(self) -> bool {
        HidKeyCode::MouseAccel0 <= self && self <= HidKeyCode::MouseAccel2
    }

    /// F1 to F12. The extended function keys F13-F24 are not included.
    pub fn is_function_key(self) -> bool {
        HidKeyCode::F1 <= self && self <= HidKeyCode::F12
    }

    /// Browser navigation keys, `WwwSearch` through `WwwFavorites`
    pub fn is_browser_key(self) -> bool {
        HidKeyCode::WwwSearch <= self && self <= HidKeyCode::WwwFavorites
    }
}

impl ::postcard::experimental::max_size::MaxSize for HidKeyCode {
    const POSTCARD_MAX_SIZE: usize = 1usize;
}
