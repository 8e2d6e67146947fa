/// Host filesystem access: metadata, listing, canonicalisation, and the
/// platform-specific allocated-size lookups behind them.
pub mod allocation;
pub mod metadata;

pub use metadata::{is_dot_name, FileMetadata, MetadataProvider, StdMetadataProvider};
