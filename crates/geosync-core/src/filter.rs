// crates/geosync-core/src/filter.rs
//! Per-record admission checks for city rows.
//!
//! A [`CityFilter`] sees the raw field list of a city row before any entity
//! is looked up or built. Returning [`FilterRejection`] skips that row and
//! nothing else; the import carries on with the next one.
//!
//! ```rust
//! use geosync_core::filter::{CityFilters, FilterRejection};
//!
//! let mut filters = CityFilters::default();
//! filters.push(|items: &[String]| {
//!     if items.get(8).is_some_and(|cc| cc == "FR") {
//!         Ok(())
//!     } else {
//!         Err(FilterRejection::new("not in France"))
//!     }
//! });
//! ```
use std::collections::HashSet;
use std::fmt;

/// Column of the geonames feature code, e.g. `PPLA`.
pub const FEATURE_CODE_FIELD: usize = 7;
/// Column of the ISO2 country code.
pub const COUNTRY_CODE_FIELD: usize = 8;

/// Why a filter refused a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRejection {
    pub reason: String,
}

impl FilterRejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FilterRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

pub trait CityFilter {
    fn check(&self, items: &[String]) -> Result<(), FilterRejection>;
}

impl<F> CityFilter for F
where
    F: Fn(&[String]) -> Result<(), FilterRejection>,
{
    fn check(&self, items: &[String]) -> Result<(), FilterRejection> {
        self(items)
    }
}

/// Keeps populated places only: the feature code must contain `PPL`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PopulatedPlaces;

impl CityFilter for PopulatedPlaces {
    fn check(&self, items: &[String]) -> Result<(), FilterRejection> {
        match items.get(FEATURE_CODE_FIELD) {
            Some(code) if code.contains("PPL") => Ok(()),
            Some(code) => Err(FilterRejection::new(format!(
                "feature code {code} is not a populated place"
            ))),
            None => Err(FilterRejection::new("row has no feature code")),
        }
    }
}

/// Keeps rows whose country code is in the given set.
#[derive(Debug, Clone, Default)]
pub struct CountryAllowList {
    codes: HashSet<String>,
}

impl CountryAllowList {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            codes: codes
                .into_iter()
                .map(|c| c.as_ref().trim().to_ascii_uppercase())
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }
}

impl CityFilter for CountryAllowList {
    fn check(&self, items: &[String]) -> Result<(), FilterRejection> {
        match items.get(COUNTRY_CODE_FIELD) {
            Some(code) if self.codes.contains(code) => Ok(()),
            Some(code) => Err(FilterRejection::new(format!(
                "country {code} is not allowed"
            ))),
            None => Err(FilterRejection::new("row has no country code")),
        }
    }
}

/// Ordered list of filters applied to every city row.
///
/// The first rejection wins and later filters are not consulted.
/// [`CityFilters::default`] holds [`PopulatedPlaces`];
/// [`CityFilters::empty`] admits everything.
pub struct CityFilters {
    filters: Vec<Box<dyn CityFilter>>,
}

impl CityFilters {
    pub fn empty() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    pub fn push(&mut self, filter: impl CityFilter + 'static) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn with(mut self, filter: impl CityFilter + 'static) -> Self {
        self.push(filter);
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn check(&self, items: &[String]) -> Result<(), FilterRejection> {
        self.filters.iter().try_for_each(|f| f.check(items))
    }
}

impl Default for CityFilters {
    fn default() -> Self {
        Self::empty().with(PopulatedPlaces)
    }
}

impl fmt::Debug for CityFilters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CityFilters")
            .field("filters", &self.filters.len())
            .finish()
    }
}
