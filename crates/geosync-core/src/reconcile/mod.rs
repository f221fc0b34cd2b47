// crates/geosync-core/src/reconcile/mod.rs

//! # Reconcilers
//!
//! Map one parsed row onto a stored entity: look it up by natural key (or
//! start a new one), apply the kind's merge rule, and save.
//!
//! | kind    | natural key            | merge rule                         |
//! |---------|------------------------|------------------------------------|
//! | Country | `code2`                | overwrite every field, always save |
//! | Region  | (country, code)        | overwrite name, always save        |
//! | City    | (name, country)        | fill unset fields, save on change  |

mod cache;
mod city;
mod country;
mod region;

pub use cache::CountryCache;
pub use city::CityReconciler;
pub use country::CountryReconciler;
pub use region::RegionReconciler;

use crate::error::{GeoSyncError, Result};
use crate::filter::FilterRejection;
use crate::traits::EntityStore;
use std::str::FromStr;

/// What happened to one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Updated,
    Unchanged,
    Rejected(FilterRejection),
}

/// One reconciler per record kind.
pub trait Reconcile {
    fn reconcile<S: EntityStore + ?Sized>(&mut self, store: &mut S, items: &[String])
        -> Result<Outcome>;
}

/// `items[index]`, or a [`GeoSyncError::MalformedRecord`] naming the column.
pub(crate) fn field<'a>(items: &'a [String], index: usize, column: &str) -> Result<&'a str> {
    items.get(index).map(String::as_str).ok_or_else(|| {
        GeoSyncError::MalformedRecord(format!(
            "missing {column} (column {index}) in a row of {} fields",
            items.len()
        ))
    })
}

pub(crate) fn parse_field<T>(items: &[String], index: usize, column: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = field(items, index, column)?;
    raw.parse().map_err(|e| {
        GeoSyncError::MalformedRecord(format!("{column} {raw:?} (column {index}): {e}"))
    })
}
