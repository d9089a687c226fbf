pub mod error;
pub mod oc;
pub mod resources;
pub mod util;
