//! Newtype wrappers for domain values.

pub mod id;
pub mod price;

pub use id::{ServiceId, ServiceIdError};
pub use price::{Price, PriceError, format_amount};
