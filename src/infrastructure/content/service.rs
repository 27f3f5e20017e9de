//! Derived accessors over the content sheets

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::sheet::names;
use crate::domain::slug::normalize_slug;
use crate::domain::{
    first_success, group_keypoints, City, DomainError, Keypoint, KeypointSection, Location,
    Record, SheetStore, State,
};

/// Everything a city page needs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityPage {
    pub city: City,
    pub state: Option<State>,
    pub keypoints: Vec<KeypointSection>,
    pub practice_areas: Vec<Record>,
}

/// Read-only views of the content sheets: cities, states, keypoints and
/// practice areas.
#[derive(Debug)]
pub struct ContentService {
    store: Arc<dyn SheetStore>,
}

impl ContentService {
    pub fn new(store: Arc<dyn SheetStore>) -> Self {
        Self { store }
    }

    /// All cities, from `Cities` or else `Locations`
    async fn all_cities(&self) -> Result<Vec<City>, DomainError> {
        let result = first_success([names::CITIES, names::LOCATIONS], |sheet| async move {
            let cities: Vec<City> = self
                .store
                .fetch_sheet(sheet)
                .await?
                .iter()
                .map(City::from_record)
                .filter(|city| !city.name.is_empty())
                .collect();

            if cities.is_empty() {
                return Err(DomainError::not_found(format!("Sheet '{}' has no cities", sheet)));
            }
            Ok(cities)
        })
        .await;

        match result {
            Ok((_, cities)) => Ok(cities),
            Err(exhausted) if only_not_found(&exhausted.attempts) => Ok(Vec::new()),
            Err(exhausted) => Err(exhausted.into_last_error()),
        }
    }

    /// Cities, optionally restricted to a state given by code, name or slug
    pub async fn cities(
        &self,
        state: Option<&str>,
        state_slug: Option<&str>,
    ) -> Result<Vec<City>, DomainError> {
        let state = state.map(str::trim).filter(|s| !s.is_empty());
        let state_slug = state_slug.map(str::trim).filter(|s| !s.is_empty());

        Ok(self
            .all_cities()
            .await?
            .into_iter()
            .filter(|city| state.is_none_or(|s| city.in_state(s)))
            .filter(|city| state_slug.is_none_or(|s| city.in_state(s)))
            .collect())
    }

    /// City by slug.
    ///
    /// `Ok(None)` means the sheets were readable and no row matched; `Err`
    /// means no sheet could be read.
    pub async fn find_city(&self, slug: &str) -> Result<Option<City>, DomainError> {
        let wanted = normalize_slug(slug);
        if wanted.is_empty() {
            return Ok(None);
        }

        let result = first_success([names::CITIES, names::LOCATIONS], |sheet| {
            let wanted = wanted.clone();
            async move {
                self.store
                    .fetch_sheet(sheet)
                    .await?
                    .iter()
                    .map(City::from_record)
                    .find(|city| city.matches_slug(&wanted))
                    .ok_or_else(|| {
                        DomainError::not_found(format!("No city '{}' in sheet '{}'", wanted, sheet))
                    })
            }
        })
        .await;

        match result {
            Ok((sheet, city)) => {
                debug!(slug = %wanted, sheet = %sheet, "Found city");
                Ok(Some(city))
            }
            Err(exhausted) if any_not_found(&exhausted.attempts) => Ok(None),
            Err(exhausted) => Err(exhausted.into_last_error()),
        }
    }

    /// State a city belongs to.
    ///
    /// Resolved by exact code against the `States` sheet, else a code to name
    /// map built from `Locations`. `None` when neither knows the code.
    pub async fn state_for_city(&self, city: &City) -> Result<Option<State>, DomainError> {
        let code = city.state.trim();
        if code.is_empty() {
            return Ok(None);
        }

        let states_error = match self.store.fetch_sheet(names::STATES).await {
            Ok(records) => {
                if let Some(state) = records
                    .iter()
                    .filter_map(State::from_record)
                    .find(|state| state.code.trim() == code)
                {
                    return Ok(Some(state));
                }
                None
            }
            Err(e) => {
                debug!(error = %e, "States sheet unavailable, deriving from locations");
                Some(e)
            }
        };

        match self.store.fetch_sheet(names::LOCATIONS).await {
            Ok(records) => {
                let names_by_code: HashMap<String, String> = records
                    .iter()
                    .map(Location::from_record)
                    .filter(|l| !l.state.is_empty() && !l.state_name.is_empty())
                    .map(|l| (l.state, l.state_name))
                    .collect();

                Ok(names_by_code
                    .get(code)
                    .map(|name| State::new(code, name.as_str())))
            }
            Err(e) => match states_error {
                Some(_) => Err(e),
                None => Ok(None),
            },
        }
    }

    /// Keypoints for a city grouped by section; matched by slug, else by name
    pub async fn keypoints_for_city(
        &self,
        city: &City,
    ) -> Result<Vec<KeypointSection>, DomainError> {
        let records = self.store.fetch_sheet(names::KEYPOINTS).await?;

        let by_slug: Vec<&Record> = records
            .iter()
            .filter(|r| {
                let slug = r.field(&["city slug", "slug"]);
                !slug.is_empty() && normalize_slug(slug) == city.slug
            })
            .collect();

        let matched = if by_slug.is_empty() {
            records
                .iter()
                .filter(|r| {
                    let name = r.field(&["city", "city name"]);
                    !name.is_empty() && name.eq_ignore_ascii_case(&city.name)
                })
                .collect()
        } else {
            by_slug
        };

        let points = matched
            .into_iter()
            .map(Keypoint::from_record)
            .filter(|k| !k.title.is_empty() || !k.content.is_empty())
            .collect();

        Ok(group_keypoints(points))
    }

    /// Practice areas exactly as the sheet lists them
    pub async fn practice_areas(&self) -> Result<Vec<Record>, DomainError> {
        Ok(self
            .store
            .fetch_sheet(names::PRACTICE_AREAS)
            .await?
            .into_iter()
            .filter(|r| !r.is_blank())
            .collect())
    }

    /// City page data. Only the city lookup can fail; the rest degrades to
    /// empty values.
    pub async fn city_page(&self, slug: &str) -> Result<Option<CityPage>, DomainError> {
        let Some(city) = self.find_city(slug).await? else {
            return Ok(None);
        };

        let (state, keypoints, practice_areas) = futures::join!(
            self.state_for_city(&city),
            self.keypoints_for_city(&city),
            self.practice_areas(),
        );

        let state = state.unwrap_or_else(|e| {
            warn!(city = %city.slug, error = %e, "Failed to resolve state");
            None
        });
        let keypoints = keypoints.unwrap_or_else(|e| {
            warn!(city = %city.slug, error = %e, "Failed to load keypoints");
            Vec::new()
        });
        let practice_areas = practice_areas.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load practice areas");
            Vec::new()
        });

        Ok(Some(CityPage {
            city,
            state,
            keypoints,
            practice_areas,
        }))
    }
}

fn only_not_found(attempts: &[(String, DomainError)]) -> bool {
    attempts
        .iter()
        .all(|(_, e)| matches!(e, DomainError::NotFound { .. }))
}

fn any_not_found(attempts: &[(String, DomainError)]) -> bool {
    attempts
        .iter()
        .any(|(_, e)| matches!(e, DomainError::NotFound { .. }))
}
