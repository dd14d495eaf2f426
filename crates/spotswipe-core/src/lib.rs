pub mod auth;
pub mod backend;
pub mod config;
pub mod environment;
pub mod error;
pub mod place;
pub mod session;
pub mod state;
pub mod store;

// Re-export main types for convenience
pub use auth::AuthState;
pub use backend::{HttpBackend, LoginResponse, PlacesApi};
pub use config::Config;
pub use environment::{resolve_backend_base, Environment};
pub use error::{BackendError, SessionError, StoreError};
pub use place::{NewPlace, Place, Vote};
pub use session::SessionController;
pub use state::{Theme, View};
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
