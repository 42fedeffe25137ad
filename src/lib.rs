pub mod compare;
pub mod config;
pub mod errors;
pub mod models;
pub mod removal;
pub mod storage;
pub mod utils;
pub mod web;
