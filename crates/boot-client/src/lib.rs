//! Boot Client
//!
//! Client for the `/v1` JSON API of the boot server: selection, profile and
//! group management, and config blob storage.
//!
//! The client is configured with one or more `host:port` endpoints. Requests
//! go to the first endpoint that accepts a connection.
//!
//! # Example
//!
//! ```no_run
//! use boot_client::{BootClient, Config};
//! use boot_model::LabelSet;
//!
//! # async fn example() -> Result<(), boot_client::ClientError> {
//! let client = BootClient::new(Config::new(["bootd-1:8080", "bootd-2:8080"]))?;
//! let labels = LabelSet::from_query_pairs([("mac", "52:54:00:89:d8:10")]);
//! let profile = client.select_profile(&labels).await?;
//! println!("{} boots {}", labels, profile.id);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;

pub use client::BootClient;
pub use config::Config;
pub use error::ClientError;
