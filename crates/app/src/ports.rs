//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod device_link;
pub mod driver;
pub mod registry;

pub use device_link::{DeviceConnector, DeviceKind, DeviceSession, SessionParams};
pub use driver::DeviceDriver;
pub use registry::{Filter, Record, RegistryClient, RegistryConnector, Table};
