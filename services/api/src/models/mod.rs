//! Request, response and record models for the marketplace API

pub mod market;
pub mod nft;
pub mod user;
