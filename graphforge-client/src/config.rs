//! Client configuration

/// Database selection used when neither the client configuration nor the
/// statement picks one. `None` leaves the choice to the session provider.
pub const DEFAULT_DATABASE: Option<&str> = None;

/// Configuration for a [`GraphClient`](crate::GraphClient)
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Database acquired when a statement does not select one explicitly.
    /// `None` leaves the choice to the session provider.
    pub default_database: Option<String>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the database used when a statement does not select one
    pub fn with_default_database(mut self, name: impl Into<String>) -> Self {
        self.default_database = Some(name.into());
        self
    }
}
