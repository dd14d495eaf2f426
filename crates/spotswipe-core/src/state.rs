//! UI-agnostic application state types
//!
//! Shared by any front end driving the session controller; nothing here
//! depends on a particular UI framework.

/// Top-level screen selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Landing,
    Home,
    Likes,
    Stats,
}

impl View {
    /// Screens reachable from the bottom navigation once inside the app.
    pub fn navigable() -> Vec<View> {
        vec![View::Home, View::Likes, View::Stats]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            View::Landing => "Welcome",
            View::Home => "Discover",
            View::Likes => "Likes",
            View::Stats => "Stats",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}
