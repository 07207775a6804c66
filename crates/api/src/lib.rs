//! Backend adapters for the learner portal: repository traits, the HTTP implementation,
//! an in-memory fake and session persistence.

pub mod config;
pub mod http;
pub mod repository;
pub mod session_store;

pub use config::{ApiConfig, ConfigError};
pub use http::HttpPortal;
pub use repository::{
    ApiError, AuthRepository, CourseRepository, FeedbackRepository, InMemoryPortal, LoginGrant,
    LoginRequest, Operation, Portal, ProfileRepository, ProfileUpdate, ProfileView,
    ReferenceRepository,
};
pub use session_store::{FileSessionStore, MemorySessionStore, SessionStore, SessionStoreError};
