pub mod crypto;
pub mod database;
pub mod ipfs;
pub mod repositories;
pub mod storage;
