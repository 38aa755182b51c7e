//! Layer descriptors: the declarative input of the reconciler.
//!
//! A [`LayerDescriptor`] says *what* should be on the map: identity,
//! category, status, visibility and optional style overrides. It never
//! holds geometry; that is fetched on demand when the layer becomes visible.
//!
//! # Usage
//!
//! ```
//! use minemap::layer::{LayerCategory, LayerDescriptor, LayerId, LayerList, LayerStatus};
//!
//! let mut list = LayerList::new();
//! list.add(
//!     LayerDescriptor::new(1, LayerCategory::Deposit)
//!         .with_name("Gisements d'or")
//!         .with_status(LayerStatus::Active),
//! );
//! list.toggle_visibility(LayerId::new(1));
//! assert_eq!(list.visible_ids(), vec![LayerId::new(1)]);
//! ```

mod descriptor;
mod list;
mod types;

pub use descriptor::{DescriptorError, LayerDescriptor, LayerMetadata, UNTITLED};
pub use list::LayerList;
pub use types::{LayerCategory, LayerId, LayerStatus};
