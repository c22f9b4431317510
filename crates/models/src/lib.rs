pub mod db;
pub mod errors;
pub mod service_request;
pub mod user;

pub use service_request::ServiceStatus;
pub use user::Role;
