//! Dispatcher settings with compiled defaults
//!
//! Settings are set in code through the [`App`](crate::application::App) builder;
//! nothing is read from files or the environment.

/// Application-wide dispatcher settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Application name, used in logs and by help renderers.
    pub name: String,
    pub usage: String,
    pub version: Option<String>,
    /// Recognize the implicit help flag on the application and its commands.
    pub help_enabled: bool,
    /// Names of the implicit help flag.
    pub help_names: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name: "app".to_string(),
            usage: String::new(),
            version: None,
            help_enabled: true,
            help_names: vec!["help".into(), "h".into()],
        }
    }
}

impl Settings {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn without_help(mut self) -> Self {
        self.help_enabled = false;
        self
    }
}
