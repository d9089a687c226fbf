pub mod boot;
pub mod types;

// convenience re-exports
pub use crate::resources::boot::{BootKind, Workload};
pub use crate::resources::types::{BootResource, BootSpec, ObjectMeta};
