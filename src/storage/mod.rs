//! Where the two image planes live
//!
//! - [`LocalStore`]: both planes as arrays inside the driver
//! - [`ExternalStore`]: both planes in an SPI SRAM sharing the panel's bus,
//!   for targets that can't spare the RAM

mod external;
mod local;
pub mod sram;

pub use self::external::ExternalStore;
pub use self::local::LocalStore;
pub use self::sram::Sram;
