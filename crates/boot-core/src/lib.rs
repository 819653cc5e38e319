//! Boot Selection Core
//!
//! Decides which boot configuration a network-booting machine receives and
//! renders it in the script dialect of the requesting boot loader.
//!
//! # Flow
//!
//! 1. The transport builds a [`LabelSet`](boot_model::LabelSet) from the request
//! 2. [`select_group`] picks the first group whose selector the labels satisfy
//! 3. [`BootSelector`] loads the group's profile from a [`BootStore`](boot_store::BootStore)
//! 4. [`resolve`] exposes the profile's boot mode as a closed variant
//! 5. A [`Renderer`] ([`IpxeRenderer`], [`GrubRenderer`]) produces the script
//!
//! Matching and rendering are pure, synchronous functions of their inputs.
//! Storage I/O happens only in [`BootSelector`].
//!
//! # Example
//!
//! ```
//! use boot_core::{IpxeRenderer, Renderer, resolve, select_group};
//! use boot_model::{BootMode, Chain, Group, LabelSet, Profile};
//!
//! let groups = vec![Group {
//!     id: "default".to_string(),
//!     profile: "chained".to_string(),
//!     ..Default::default()
//! }];
//! let labels = LabelSet::from_query_pairs([("arch", "x86_64")]);
//! let group = select_group(&groups, &labels).unwrap();
//! assert_eq!(group.profile, "chained");
//!
//! let profile = Profile {
//!     id: "chained".to_string(),
//!     boot_mode: Some(BootMode::Chain(Chain { url: "http://x/boot.ipxe".to_string() })),
//!     ..Default::default()
//! };
//! let script = IpxeRenderer::new().render(resolve(&profile)).unwrap();
//! assert_eq!(script, "#!ipxe\nchain http://x/boot.ipxe\n");
//! ```

pub mod error;
pub mod matcher;
pub mod render;
pub mod resolver;
pub mod selector;

pub use error::*;
pub use matcher::*;
pub use render::*;
pub use resolver::*;
pub use selector::*;
