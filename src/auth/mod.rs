//! Authentication: password hashing, bearer tokens, and the
//! register / login endpoints built on them.

pub mod handlers;
pub mod password;
mod service;
pub mod token;

pub use service::AuthService;
pub use token::{Claims, TokenService};
