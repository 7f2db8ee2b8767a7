// Application layer: validation and orchestration between the quotation
// engine and the record store.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
