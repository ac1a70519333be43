pub mod artifacts;
pub mod fetcher;
pub mod metrics;
pub mod providers;
