/// Hosted backend used by released builds.
pub const PRODUCTION_BACKEND: &str = "https://spotswipe-backend.onrender.com";
/// Backend started locally with the server's dev profile.
pub const DEVELOPMENT_BACKEND: &str = "http://localhost:3000";

/// Environment variable selecting the deployment environment.
pub const ENV_VAR: &str = "SPOTSWIPE_ENV";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Development,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Development => "development",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Some(Environment::Production),
            "development" | "dev" | "local" => Some(Environment::Development),
            _ => None,
        }
    }

    /// Environment variable first, then the configured value, else production.
    pub fn detect(configured: Option<&str>) -> Self {
        std::env::var(ENV_VAR)
            .ok()
            .and_then(|v| Self::from_str(&v))
            .or_else(|| configured.and_then(Self::from_str))
            .unwrap_or_default()
    }
}

/// Base URL of the places backend for an environment.
pub fn resolve_backend_base(environment: Environment) -> &'static str {
    match environment {
        Environment::Production => PRODUCTION_BACKEND,
        Environment::Development => DEVELOPMENT_BACKEND,
    }
}
