//! # IO Module
//!
//! Interface layer between the calendar page and the domain logic. Requests
//! arrive as JSON over HTTP, are translated into domain calls, and domain
//! errors are mapped back onto HTTP status codes.

pub mod rest;

pub use rest::*;
