//! Extension traits

mod depot;
mod field;
mod result;

pub(crate) use depot::DepotExt as _;
pub(crate) use field::FieldExt as _;
pub(crate) use result::ResultExt as _;
