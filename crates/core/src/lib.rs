#![forbid(unsafe_code)]

pub mod completion;
pub mod edit;
pub mod entitlements;
pub mod error;
pub mod model;
pub mod progress;
pub mod time;
pub mod wire;

pub use error::ValidationError;
pub use time::Clock;
