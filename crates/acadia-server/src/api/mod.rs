//! API types shared by all route handlers

pub mod response;
