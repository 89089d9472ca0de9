pub mod collection;
pub mod request;
pub mod summary;

#[cfg(feature = "cli")]
pub mod batch;
#[cfg(feature = "cli")]
pub mod config;
#[cfg(feature = "cli")]
pub mod executor;
#[cfg(feature = "cli")]
pub mod logging;
#[cfg(feature = "cli")]
pub mod records;
