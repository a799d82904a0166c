#![allow(async_fn_in_trait)]

pub mod backup;
pub mod catalog;
pub mod config;
pub mod default_colors;
pub mod error;
pub mod export;
pub mod identity;
pub mod library;
pub mod matcher;
pub mod recommend;
pub mod restore;
pub mod store;
pub mod traits;
pub mod types;
