pub mod alert;
pub mod direction;

pub use alert::{AlertKind, AlertPayload, AlertType};
pub use direction::*;
