//! Observability: request IDs and critical-error alerting.

mod alert;
mod request_id;

pub use alert::AlertLayer;
pub use request_id::{RequestId, RequestIdMiddleware};
