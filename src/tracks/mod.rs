//! Track submission and per-user likes.

pub mod handlers;
