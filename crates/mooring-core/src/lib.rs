//! Query integrator for Mooring: in-memory joins, populate/grouping and the
//! alias-driven integrate step, plus the observability sink they report to.
#![warn(unreachable_pub)]

pub mod integrate;
pub mod join;
pub mod namespace;
pub mod obs;
pub mod populate;
pub mod row;
pub mod value;

#[cfg(test)]
pub(crate) mod test_support;

use thiserror::Error as ThisError;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors or metrics plumbing are re-exported here.
///

pub mod prelude {
    pub use crate::{
        integrate::{JoinInstruction, RowCache, integrate},
        join::{JoinRequest, Outer, inner_join, join, left_outer_join, try_join},
        namespace::Namespace,
        populate::{PopulateRequest, populate},
        row,
        row::Row,
        value::Value,
    };
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    IntegrateError(#[from] integrate::IntegrateError),

    #[error(transparent)]
    JoinError(#[from] join::JoinError),

    #[error(transparent)]
    PopulateError(#[from] populate::PopulateError),
}
