//! Infrastructure layer.

pub mod backend;
pub mod device;
pub mod store;

pub use self::{backend::Backend, device::Device, store::Store};
#[cfg(feature = "http")]
pub use self::backend::Http;
