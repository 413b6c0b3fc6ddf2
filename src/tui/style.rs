use ratatui::style::{Color, Modifier, Style};

use crate::models::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStyle {
    pub icon: &'static str,
    pub color: Color,
}

/// Used for `Other` and for anything the service returns outside the known set.
pub const FALLBACK_STYLE: CategoryStyle = CategoryStyle {
    icon: "💰",
    color: Color::Gray,
};

impl CategoryStyle {
    pub fn for_category(category: &Category) -> CategoryStyle {
        match category {
            Category::Food => CategoryStyle {
                icon: "🍔",
                color: Color::LightRed,
            },
            Category::Transport => CategoryStyle {
                icon: "🚗",
                color: Color::Cyan,
            },
            Category::Shopping => CategoryStyle {
                icon: "🛍",
                color: Color::Magenta,
            },
            Category::Entertainment => CategoryStyle {
                icon: "🎮",
                color: Color::Yellow,
            },
            Category::Bills => CategoryStyle {
                icon: "💡",
                color: Color::Red,
            },
            Category::Health => CategoryStyle {
                icon: "🏥",
                color: Color::Green,
            },
            Category::Other | Category::Unrecognized(_) => FALLBACK_STYLE,
        }
    }
}

pub struct Theme {
    pub primary: Color,
    pub success: Color,
    pub error: Color,
    pub text: Color,
    pub muted: Color,
    pub highlight: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Magenta,
            success: Color::Green,
            error: Color::Red,
            text: Color::White,
            muted: Color::DarkGray,
            highlight: Color::Gray,
        }
    }
}

impl Theme {
    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn key_style(&self) -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn selected_style(&self) -> Style {
        Style::default().add_modifier(Modifier::REVERSED)
    }

    /// Input under the cursor, same look as a cell being edited.
    pub fn focused_style(&self) -> Style {
        Style::default().fg(Color::DarkGray).bg(self.highlight)
    }
}
