mod course;
mod money;
mod quote;
mod record;
mod selection;

pub use course::*;
pub use money::*;
pub use quote::*;
pub use record::*;
pub use selection::*;
