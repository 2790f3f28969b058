mod attribute;
mod collection;
mod dictionary;

pub use attribute::*;
pub use collection::*;
pub use dictionary::*;
