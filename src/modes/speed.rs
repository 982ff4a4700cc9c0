/// Playback speed selected with the 1-4 keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speed {
    Slow,
    Normal,
    Fast,
    VeryFast,
}

impl Speed {
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Slow),
            2 => Some(Self::Normal),
            3 => Some(Self::Fast),
            4 => Some(Self::VeryFast),
            _ => None,
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            Self::Slow => 1,
            Self::Normal => 2,
            Self::Fast => 3,
            Self::VeryFast => 4,
        }
    }

    /// Rendered frames per simulation tick
    pub fn frames_per_tick(&self) -> u32 {
        match self {
            Self::Slow => 16,
            Self::Normal => 8,
            Self::Fast => 4,
            Self::VeryFast => 1,
        }
    }
}
