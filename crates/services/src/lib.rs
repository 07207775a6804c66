#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth_service;
pub mod course_service;
pub mod error;
pub mod feedback_service;
pub mod profile_editor;
pub mod profile_service;
pub mod session;

pub use portal_core::Clock;

pub use app_services::{AppServices, PortalSettings};
pub use auth_service::AuthService;
pub use course_service::{CertificateSummary, CourseOverview, CourseService};
pub use error::{AppServicesError, AuthError, FeedbackError, FetchError, ProfileEditError};
pub use feedback_service::{FeedbackForm, FeedbackService};
pub use profile_editor::{EditMode, FormSection, ProfileEditor};
pub use profile_service::{AggregatedProfile, ProfileAggregator};
pub use session::SessionContext;
