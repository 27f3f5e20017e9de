use serde::{Deserialize, Serialize};

use crate::domain::sheet::Record;
use crate::domain::slug::{normalize_slug, slugify};

/// Section name used for keypoints without one
pub const DEFAULT_KEYPOINT_SECTION: &str = "General";

/// A city as listed on the site
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub name: String,
    pub slug: String,
    /// State code as written in the sheet
    pub state: String,
    pub state_name: String,
    pub county: String,
    pub population: String,
    pub description: String,
}

impl City {
    pub fn from_record(record: &Record) -> Self {
        let name = record.field_string(&["city", "name", "city name"]);
        let explicit_slug = record.field(&["slug", "city slug"]);
        let slug = if explicit_slug.is_empty() {
            slugify(&name)
        } else {
            normalize_slug(explicit_slug)
        };

        Self {
            slug,
            state: record.field_string(&["state", "state code", "state abbreviation"]),
            state_name: record.field_string(&["state name", "statename"]),
            county: record.field_string(&["county"]),
            population: record.field_string(&["population"]),
            description: record.field_string(&["description", "summary", "intro"]),
            name,
        }
    }

    /// Case-insensitive match on the slug column, else on the hyphenated name
    pub fn matches_slug(&self, slug: &str) -> bool {
        let wanted = normalize_slug(slug);
        if wanted.is_empty() {
            return false;
        }

        self.slug.eq_ignore_ascii_case(&wanted) || slugify(&self.name) == wanted
    }

    /// Matches a state code, state name, or state slug
    pub fn in_state(&self, state: &str) -> bool {
        let state = state.trim();
        if state.is_empty() {
            return false;
        }

        self.state.eq_ignore_ascii_case(state)
            || self.state_name.eq_ignore_ascii_case(state)
            || (!self.state_name.is_empty() && slugify(&self.state_name) == slugify(state))
    }
}

/// A US state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub code: String,
    pub name: String,
    pub slug: String,
}

impl State {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            code: code.into(),
            slug: slugify(&name),
            name,
        }
    }

    /// Projects a States sheet record. Returns `None` without a code.
    pub fn from_record(record: &Record) -> Option<Self> {
        let code = record.field(&["code", "state code", "abbreviation", "state"]);
        if code.is_empty() {
            return None;
        }

        let name = record.field(&["name", "state name", "full name"]);
        let explicit_slug = record.field(&["slug", "state slug"]);

        let mut state = Self::new(code, name);
        if !explicit_slug.is_empty() {
            state.slug = normalize_slug(explicit_slug);
        }

        Some(state)
    }
}

/// One keypoint bullet on a city page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keypoint {
    pub section: String,
    pub title: String,
    pub content: String,
}

impl Keypoint {
    pub fn from_record(record: &Record) -> Self {
        let section = record.field(&["section", "category", "group"]);

        Self {
            section: if section.is_empty() {
                DEFAULT_KEYPOINT_SECTION.to_string()
            } else {
                section.to_string()
            },
            title: record.field_string(&["title", "keypoint", "heading"]),
            content: record.field_string(&["content", "description", "text", "body"]),
        }
    }
}

/// Keypoints sharing a section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeypointSection {
    pub section: String,
    pub points: Vec<Keypoint>,
}

/// Groups keypoints by section, keeping first-appearance order
pub fn group_keypoints(points: Vec<Keypoint>) -> Vec<KeypointSection> {
    let mut sections: Vec<KeypointSection> = Vec::new();

    for point in points {
        match sections.iter_mut().find(|s| s.section == point.section) {
            Some(section) => section.points.push(point),
            None => sections.push(KeypointSection {
                section: point.section.clone(),
                points: vec![point],
            }),
        }
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_slug_matching_is_case_insensitive() {
        let city = City::from_record(
            &Record::new()
                .with("City", "Los Angeles")
                .with("Slug", "los-angeles"),
        );

        assert!(city.matches_slug("Los-Angeles"));
        assert!(city.matches_slug("los-angeles"));
        assert!(!city.matches_slug("fresno"));
        assert!(!city.matches_slug(""));
    }

    #[test]
    fn test_city_matches_hyphenated_name_without_slug_column() {
        let city = City {
            name: "San Luis Obispo".to_string(),
            slug: "slo".to_string(),
            ..Default::default()
        };

        assert!(city.matches_slug("SLO"));
        assert!(city.matches_slug("san-luis-obispo"));
    }

    #[test]
    fn test_city_in_state() {
        let city = City {
            state: "CA".to_string(),
            state_name: "California".to_string(),
            ..Default::default()
        };

        assert!(city.in_state("ca"));
        assert!(city.in_state("CALIFORNIA"));
        assert!(city.in_state("california"));
        assert!(!city.in_state("new-york"));
    }

    #[test]
    fn test_state_from_record() {
        let state = State::from_record(
            &Record::new()
                .with("Code", "NY")
                .with("Name", "New York"),
        )
        .unwrap();

        assert_eq!(state.slug, "new-york");
        assert!(State::from_record(&Record::new().with("Name", "Nowhere")).is_none());
    }

    #[test]
    fn test_keypoint_defaults_section() {
        let point = Keypoint::from_record(&Record::new().with("Title", "Free consultation"));
        assert_eq!(point.section, DEFAULT_KEYPOINT_SECTION);
    }

    #[test]
    fn test_group_keypoints_preserves_order() {
        let point = |section: &str, title: &str| Keypoint {
            section: section.to_string(),
            title: title.to_string(),
            content: String::new(),
        };

        let grouped = group_keypoints(vec![
            point("Traffic", "I-5 congestion"),
            point("General", "Local office"),
            point("Traffic", "Highway 99"),
        ]);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].section, "Traffic");
        assert_eq!(grouped[0].points.len(), 2);
        assert_eq!(grouped[1].section, "General");
    }
}
