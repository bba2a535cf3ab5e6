//! Common library for the NFT marketplace services
//!
//! This crate provides the shared infrastructure used by the marketplace
//! API: PostgreSQL connection pooling, schema migrations and the database
//! error taxonomy.

pub mod database;
pub mod error;
