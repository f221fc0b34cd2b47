// crates/geosync-core/src/traits.rs
use crate::error::Result;
use crate::model::{City, Country, EntityId, Region};
use crate::text::fold_key;

/// Persistence boundary consumed by the reconcilers.
///
/// Lookups are by natural key only. `save_*` inserts when the entity has no
/// id yet (assigning one in place) and replaces the stored row otherwise.
/// Implementations must keep natural keys unique: saving a new entity whose
/// natural key already exists updates that row instead of adding a second.
pub trait EntityStore {
    fn find_country(&self, code2: &str) -> Result<Option<Country>>;
    fn find_region(&self, country_id: EntityId, code: &str) -> Result<Option<Region>>;
    fn find_city(&self, name: &str, country_id: EntityId) -> Result<Option<City>>;

    fn save_country(&mut self, country: &mut Country) -> Result<()>;
    fn save_region(&mut self, region: &mut Region) -> Result<()>;
    fn save_city(&mut self, city: &mut City) -> Result<()>;

    /// Make every save so far durable. Called once per imported source.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Accent- and case-insensitive matching on an entity's display name.
///
/// Both sides go through [`fold_key`], so "zuri" is found in "Zürich".
/// Implementors only supply [`NameMatch::name_str`].
///
/// # Examples
/// ```rust
/// use geosync_core::traits::NameMatch;
///
/// struct Landmark {
///     label: String,
/// }
///
/// impl NameMatch for Landmark {
///     fn name_str(&self) -> &str {
///         &self.label
///     }
/// }
///
/// let gate = Landmark { label: "Brandenburger Tor".into() };
/// assert!(gate.name_contains("TOR"));
/// assert!(gate.name_contains("burger"));
/// ```
pub trait NameMatch {
    fn name_str(&self) -> &str;

    #[inline]
    fn name_contains(&self, q: &str) -> bool {
        fold_key(self.name_str()).contains(&fold_key(q))
    }
}

impl NameMatch for Country {
    fn name_str(&self) -> &str {
        &self.name
    }
}

impl NameMatch for Region {
    fn name_str(&self) -> &str {
        &self.name
    }
}

impl NameMatch for City {
    fn name_str(&self) -> &str {
        &self.name
    }
}
