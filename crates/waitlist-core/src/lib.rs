//! Headless logic for the waitlist signup form: field state and validation,
//! the challenge-widget lifecycle, and submission orchestration.

pub mod config;
pub mod dismiss;
pub mod error;
pub mod fields;
pub mod mode;
pub mod payload;
pub mod submission;
pub mod transport;
pub mod validation;
pub mod verification;
pub mod widget;

pub use config::*;
pub use dismiss::*;
pub use error::*;
pub use fields::*;
pub use mode::*;
pub use payload::*;
pub use submission::*;
pub use transport::*;
pub use validation::*;
pub use verification::*;
pub use widget::*;
