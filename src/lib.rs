pub mod config;
pub mod exception;
pub mod fault;
pub mod front;
pub mod handlers;
pub mod model;
pub mod param;
pub mod request;
pub mod response;
pub mod router;
pub mod util;

pub use config::Config;
pub use exception::{ApiError, ApiErrorBody, Exception};
pub use front::{Front, FrontConfig};
pub use model::{CalculationResult, Status};
pub use request::Request;
pub use response::{HandlerResult, Payload, Response};
pub use router::{Handler, Router};
