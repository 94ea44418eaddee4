//! # Authentication Module
//!
//! Credential verification, JWT issuance and validation, the user service
//! that ties them together, and the middleware securing protected routes.

pub mod errors;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
