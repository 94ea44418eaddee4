//! # Database Module
//!
//! PostgreSQL integration using tokio-postgres with a deadpool connection pool.
//! Includes connection management, models, migrations, the credential store
//! trait and development seed data.

pub mod connection;
pub mod migrations;
pub mod models;
pub mod repository;
pub mod seed;

pub use connection::{DatabaseConfig, DatabaseConnection};
pub use models::UserRecord;
pub use repository::UserRepository;
