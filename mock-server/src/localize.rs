//! Localized user-facing messages, keyed by message id.

pub const DEFAULT_LOCALE: &str = "en-US";

const EN_US: &[(&str, &str)] = &[
    ("application_error", "An Application Error has occured."),
    ("invalid_station_id", "Invalid Station Id Or Missing"),
];

/// Translate `id` for `locale`. Unknown locales and ids fall back to the id
/// itself.
pub fn translate<'a>(locale: &str, id: &'a str) -> &'a str {
    let table = match locale {
        "en-US" => EN_US,
        _ => return id,
    };
    table.iter().find(|(key, _)| *key == id).map_or(id, |(_, text)| *text)
}

/// Translate `id` for the default locale.
pub fn t(id: &str) -> &str {
    translate(DEFAULT_LOCALE, id)
}
