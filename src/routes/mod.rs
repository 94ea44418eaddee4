// # Routes Module
//
// HTTP route handlers, grouped by functionality.
//
// - `health`: liveness and readiness endpoints
// - `user`: profile lookup and login

/// Health check and monitoring endpoints
pub mod health;

/// User lookup and login endpoints
pub mod user;
