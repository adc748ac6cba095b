//! Foundation types for reading `.DS_Store` files.
//!
//! Every other crate in the workspace depends on `dsstore-types`.
//!
//! # Key Types
//!
//! - [`FourCc`]: four-byte field codes and value type tags
//! - [`FieldValue`]: one decoded value, closed over the wire types
//! - [`Record`]: all fields recorded for one filename
//! - [`TreeMetadata`]: header and master block summary
//! - [`FilePosition`], [`Point`], [`Bounds`]: icon layout data

pub mod code;
pub mod describe;
pub mod error;
pub mod metadata;
pub mod position;
pub mod record;
pub mod value;

pub use code::FourCc;
pub use describe::{field_name, format_value, is_size_field};
pub use error::{TypeError, TypeResult};
pub use metadata::TreeMetadata;
pub use position::{Bounds, FilePosition, Point, ICON_LOCATION_LEN};
pub use record::Record;
pub use value::{FieldValue, ValueKind};
