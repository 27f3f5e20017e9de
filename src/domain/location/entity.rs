use serde::{Deserialize, Serialize};

use crate::domain::sheet::Record;
use crate::domain::slug::{normalize_slug, slugify, title_from_slug};

/// A city location page as the site renders it.
///
/// Every field is a display string; absent columns are `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub city: String,
    /// Two-letter state code
    pub state: String,
    pub state_name: String,
    pub county: String,
    pub population: String,
    pub annual_accidents: String,
    pub fatal_accidents: String,
    pub injury_accidents: String,
    pub dangerous_intersections: String,
    pub courthouse: String,
    pub courthouse_address: String,
    pub slug: String,
}

impl Location {
    /// Projects a Locations/Cities record onto the fixed field set.
    ///
    /// The slug comes from the slug column when present, otherwise it is
    /// derived from the city name.
    pub fn from_record(record: &Record) -> Self {
        let city = record.field_string(&["city", "city name", "name"]);
        let explicit_slug = record.field(&["slug", "city slug"]);
        let slug = if explicit_slug.is_empty() {
            slugify(&city)
        } else {
            normalize_slug(explicit_slug)
        };

        Self {
            state: record.field_string(&["state", "state code", "state abbreviation"]),
            state_name: record.field_string(&["state name", "statename", "state full name"]),
            county: record.field_string(&["county"]),
            population: record.field_string(&["population"]),
            annual_accidents: record.field_string(&[
                "annual accidents",
                "accidents per year",
                "accidents",
                "total accidents",
            ]),
            fatal_accidents: record.field_string(&["fatal accidents", "fatalities"]),
            injury_accidents: record.field_string(&["injury accidents", "injuries"]),
            dangerous_intersections: record.field_string(&[
                "dangerous intersections",
                "intersections",
                "top intersections",
            ]),
            courthouse: record.field_string(&["courthouse", "courthouse name"]),
            courthouse_address: record.field_string(&["courthouse address"]),
            city,
            slug,
        }
    }

    /// Whether the record carries enough to render a page
    pub fn is_usable(&self) -> bool {
        !self.city.is_empty() && !self.slug.is_empty()
    }

    /// The hardcoded location served when no live source is available
    pub fn fallback() -> Self {
        Self {
            city: "Prairie Ridge".to_string(),
            state: "CA".to_string(),
            state_name: "California".to_string(),
            county: "Kern County".to_string(),
            population: "48,500".to_string(),
            annual_accidents: "1,250".to_string(),
            fatal_accidents: "14".to_string(),
            injury_accidents: "610".to_string(),
            dangerous_intersections: "Main St & 5th Ave; Ridge Rd & Highway 99".to_string(),
            courthouse: "Prairie Ridge Superior Court".to_string(),
            courthouse_address: "100 Justice Way, Prairie Ridge, CA".to_string(),
            slug: "prairie-ridge".to_string(),
        }
    }

    /// A placeholder location built only from a slug
    pub fn synthetic(slug: &str) -> Self {
        let slug = normalize_slug(slug);

        Self {
            city: title_from_slug(&slug),
            slug,
            ..Default::default()
        }
    }

    /// Matches a state code or full state name, ignoring case
    pub fn in_state(&self, state: &str) -> bool {
        let state = state.trim();
        !state.is_empty()
            && (self.state.eq_ignore_ascii_case(state) || self.state_name.eq_ignore_ascii_case(state))
    }
}

/// How the location cache is allowed to reach its source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationEnvironment {
    /// Serving live traffic; fetches go to the configured source
    #[default]
    Runtime,
    /// Static generation; no network I/O, fallback data only
    Build,
}
