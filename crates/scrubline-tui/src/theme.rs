use ratatui::style::Color;
use scrubline_core::ControllerState;

/// Colors used by the demo widgets
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub grey0: Color,
    pub grey2: Color,

    // Palette colors
    pub red: Color,
    pub orange: Color,
    pub yellow: Color,
    pub green: Color,
    pub aqua: Color,

    // Semantic colors
    pub accent: Color,
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Gruvbox Material dark
        Self {
            bg0: Color::Rgb(0x28, 0x28, 0x28),
            bg1: Color::Rgb(0x32, 0x30, 0x2f),
            bg2: Color::Rgb(0x45, 0x40, 0x3d),
            fg0: Color::Rgb(0xd4, 0xbe, 0x98),
            grey0: Color::Rgb(0x7c, 0x6f, 0x64),
            grey2: Color::Rgb(0xa8, 0x99, 0x84),
            red: Color::Rgb(0xea, 0x69, 0x62),
            orange: Color::Rgb(0xe7, 0x8a, 0x4e),
            yellow: Color::Rgb(0xd8, 0xa6, 0x57),
            green: Color::Rgb(0xa9, 0xb6, 0x65),
            aqua: Color::Rgb(0x89, 0xb4, 0x82),
            accent: Color::Rgb(0x89, 0xb4, 0x82),
            warning: Color::Rgb(0xe7, 0x8a, 0x4e),
        }
    }
}

impl Theme {
    /// Badge color for a controller state
    pub fn state_color(&self, state: ControllerState) -> Color {
        match state {
            ControllerState::Idle => self.grey2,
            ControllerState::Active => self.yellow,
            ControllerState::Decaying => self.green,
            ControllerState::Destroyed => self.red,
        }
    }

    /// Rate readout color: baseline is neutral, fast forward warm, reverse cool
    pub fn rate_color(&self, rate: f64) -> Color {
        if (rate - 1.0).abs() < 0.05 {
            self.fg0
        } else if rate > 1.0 {
            self.orange
        } else {
            self.aqua
        }
    }
}
