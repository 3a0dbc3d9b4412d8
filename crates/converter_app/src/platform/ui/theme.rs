use comfy_table::Color;

/// Accent colours for tables, banners and the progress bar.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub accent: Color,
    pub success: Color,
    pub error: Color,
    /// Colour pair for the indicatif bar, `filled/empty`.
    pub bar: &'static str,
}

pub const LIGHT: Theme = Theme {
    accent: Color::Blue,
    success: Color::DarkGreen,
    error: Color::DarkRed,
    bar: "blue/white",
};

pub const DARK: Theme = Theme {
    accent: Color::Cyan,
    success: Color::Green,
    error: Color::Red,
    bar: "cyan/black",
};

impl Theme {
    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode {
            DARK
        } else {
            LIGHT
        }
    }

    pub fn label(dark_mode: bool) -> &'static str {
        if dark_mode {
            "dark"
        } else {
            "light"
        }
    }
}
