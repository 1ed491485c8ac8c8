//! Authentication route handlers
//!
//! This module contains the session endpoints:
//! - Token refresh
//! - Logout
//! - Current session

pub mod logout;
pub mod refresh;
pub mod session;

pub use logout::logout;
pub use refresh::refresh_token;
pub use session::current_session;
