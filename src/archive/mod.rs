//! Export archive assembly
//!
//! Records are filed into review-status folders, named without collisions,
//! and written as a PiFF document followed by the normalized image:
//! - [`category`]: review-status folder of a record
//! - [`naming`]: base names and per-export collision suffixes
//! - [`document`]: PiFF document encoding
//! - [`normalize`]: JPEG/PNG sniffing and normalization
//! - [`source`]: reading images from their storage location
//! - [`builder`]: orchestration and zip writing

pub mod builder;
pub mod category;
pub mod document;
pub mod naming;
pub mod normalize;
pub mod source;

pub use builder::{ArchiveBuilder, ArchiveEntry, ArchiveWriter};
pub use category::Folder;
pub use document::{PIFF_EXTENSION, serialize_piff};
pub use naming::{NameAllocator, base_name};
pub use normalize::{ImageKind, NormalizedImage, normalize_image};
pub use source::{ImageSource, StorageReader};
