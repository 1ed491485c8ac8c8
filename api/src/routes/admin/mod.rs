//! Administrative endpoints, restricted to the admin role

pub mod cleanup;

pub use cleanup::run_cleanup;
