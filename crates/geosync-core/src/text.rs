// crates/geosync-core/src/text.rs
use unicode_normalization::UnicodeNormalization;

/// Lowercased ASCII transliteration, used as the comparison key for names.
///
/// Used by the read-side helpers only. Import never folds names; it stores
/// them exactly as the upstream file spells them.
///
/// # Examples
///
/// ```rust
/// use geosync_core::text::fold_key;
///
/// assert_eq!(fold_key("Łódź"), "lodz");
/// assert_eq!(fold_key("Straße"), "strasse");
/// ```
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

/// Normalizes an upstream "alternate names" column into the stored
/// `search_names` form.
///
/// The input is decomposed with NFKD and every non-ASCII code point is
/// dropped, so combining marks vanish and letters from non-Latin scripts
/// vanish entirely. The remainder is split on `,`, each part trimmed, empty
/// parts dropped, and the survivors re-joined with `,`.
///
/// Returns `None` when nothing survives, which leaves the city's
/// `search_names` unset and eligible on the next import.
///
/// ```rust
/// use geosync_core::text::normalize_search_names;
///
/// assert_eq!(
///     normalize_search_names("Córdoba, Cordova").as_deref(),
///     Some("Cordoba,Cordova")
/// );
/// assert_eq!(normalize_search_names("Москва"), None);
/// ```
pub fn normalize_search_names(raw: &str) -> Option<String> {
    let ascii: String = raw.nfkd().filter(char::is_ascii).collect();

    let joined = ascii
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(",");

    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}
