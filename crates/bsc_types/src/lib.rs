//! bsc_types: The BrightScript type model.
//!
//! Types form a closed set of variants. Assignability and convertibility are
//! computed by matching on (source, target) pairs; anything not explicitly
//! allowed is not assignable.

mod function_type;
mod types;

pub use function_type::{FunctionType, FunctionTypeParameter};
pub use types::Type;
