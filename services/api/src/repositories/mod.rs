//! Repositories for database operations

pub mod nft;
pub mod user;

pub use nft::NftRepository;
pub use user::UserRepository;
