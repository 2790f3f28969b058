//! Association resolve passes. Each pass borrows a dictionary and returns a
//! new one.

mod belongs_to;
mod many_to_many;


pub use belongs_to::{foreign_key_column, resolve_belongs_to};
pub use many_to_many::resolve_many_to_many;
