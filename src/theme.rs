use ratatui::style::Color;

/// All themeable colors in the application
#[derive(Clone, Debug)]
pub struct Theme {
    // JSON pretty-print
    pub json_key: Color,
    pub json_string: Color,
    pub json_number: Color,
    pub json_bool: Color,
    pub json_null: Color,
    pub json_bracket: Color,

    // Lines that are not JSON
    pub plain_text: Color,

    // Panel borders
    pub border_focused: Color,
    pub border_unfocused: Color,

    // Panel titles
    pub title: Color,

    // Container list rows
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub container_fg: Color,

    // Filter line
    pub filter_prefix: Color,
    pub filter_input_bg: Color,
    pub filter_input_fg: Color,

    // Help bar, scroll percentage, placeholders
    pub help: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

impl Theme {
    /// The default theme, 256-color palette
    pub fn default_theme() -> Self {
        Self {
            json_key: Color::Indexed(86),
            json_string: Color::Indexed(82),
            json_number: Color::Indexed(220),
            json_bool: Color::Indexed(213),
            json_null: Color::Indexed(245),
            json_bracket: Color::Indexed(250),

            plain_text: Color::Indexed(245),

            border_focused: Color::Indexed(212),
            border_unfocused: Color::Indexed(62),

            title: Color::Indexed(62),

            selected_bg: Color::Indexed(62),
            selected_fg: Color::Indexed(230),
            container_fg: Color::Indexed(252),

            filter_prefix: Color::Indexed(212),
            filter_input_bg: Color::Indexed(236),
            filter_input_fg: Color::Indexed(255),

            help: Color::Indexed(241),
        }
    }

    pub fn dracula() -> Self {
        Self {
            json_key: Color::Rgb(139, 233, 253),    // Cyan
            json_string: Color::Rgb(241, 250, 140), // Yellow
            json_number: Color::Rgb(189, 147, 249), // Purple
            json_bool: Color::Rgb(255, 121, 198),   // Pink
            json_null: Color::Rgb(98, 114, 164),    // Comment
            json_bracket: Color::Rgb(248, 248, 242),

            plain_text: Color::Rgb(98, 114, 164),

            border_focused: Color::Rgb(189, 147, 249),
            border_unfocused: Color::Rgb(68, 71, 90),

            title: Color::Rgb(255, 121, 198),

            selected_bg: Color::Rgb(68, 71, 90),
            selected_fg: Color::Rgb(80, 250, 123),
            container_fg: Color::Rgb(248, 248, 242),

            filter_prefix: Color::Rgb(255, 184, 108),
            filter_input_bg: Color::Rgb(40, 42, 54),
            filter_input_fg: Color::Rgb(248, 248, 242),

            help: Color::Rgb(98, 114, 164),
        }
    }

    pub fn monochrome() -> Self {
        Self {
            json_key: Color::Rgb(255, 255, 255),
            json_string: Color::Rgb(200, 200, 200),
            json_number: Color::Rgb(170, 170, 170),
            json_bool: Color::Rgb(230, 230, 230),
            json_null: Color::Rgb(120, 120, 120),
            json_bracket: Color::Rgb(140, 140, 140),

            plain_text: Color::Rgb(150, 150, 150),

            border_focused: Color::Rgb(200, 200, 200),
            border_unfocused: Color::Rgb(80, 80, 80),

            title: Color::Rgb(255, 255, 255),

            selected_bg: Color::Rgb(200, 200, 200),
            selected_fg: Color::Rgb(0, 0, 0),
            container_fg: Color::Rgb(180, 180, 180),

            filter_prefix: Color::Rgb(255, 255, 255),
            filter_input_bg: Color::Rgb(50, 50, 50),
            filter_input_fg: Color::Rgb(255, 255, 255),

            help: Color::Rgb(120, 120, 120),
        }
    }

    /// Get a theme by name
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "dracula" => Self::dracula(),
            "monochrome" | "mono" => Self::monochrome(),
            _ => Self::default_theme(),
        }
    }
}
