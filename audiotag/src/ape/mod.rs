//! APE tag specific items
//!
//! `APE` tags are not tied to a single container. Here they are read and written
//! as the trailing tag of True Audio files, see [`crate::tta`].

pub(crate) mod constants;
pub(crate) mod header;
pub(crate) mod tag;

// Exports

pub use crate::picture::APE_PICTURE_TYPES;
pub use tag::ApeTag;
pub use tag::item::ApeItem;
