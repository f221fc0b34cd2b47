use serde::{Deserialize, Serialize};

/// Simple aggregate statistics for the store.
///
/// Returned by [`crate::search::GeoSearch::stats`], these counts reflect the
/// rows currently held, including any an operator added by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbStats {
    pub countries: usize,
    pub regions: usize,
    pub cities: usize,
}
