//! Value objects - Immutable objects defined by their attributes

mod content_type;
mod ids;

pub use content_type::{ContentType, ContentTypeInfo, UnknownContentType};
pub use ids::*;
