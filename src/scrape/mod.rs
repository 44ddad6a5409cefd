// src/scrape/mod.rs
mod filter;
mod scrape;

pub use filter::filter_recent;
pub use scrape::collect_firms;
