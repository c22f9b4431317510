//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login and password recovery live here, together with the
//! credential store (`password`) and the token service (`token`).

pub mod domain;
pub mod errors;
pub mod password;
pub mod repo;
pub mod repository;
pub mod service;
pub mod token;

pub use service::AuthService;
pub use token::TokenService;
