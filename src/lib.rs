//! Terminal browser for a remote content catalog: free-text search, type
//! and sort filters, and windowed pagination over a REST content API.

pub mod browser;
pub mod client;
pub mod config;
pub mod models;
pub mod pages;
pub mod query;
