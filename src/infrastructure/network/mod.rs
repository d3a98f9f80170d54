//! Network infrastructure - live fetch implementations

mod http_fetcher;

pub use http_fetcher::HttpFetcher;
