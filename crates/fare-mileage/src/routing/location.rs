use serde::{Deserialize, Serialize};

/// Resolved city or airport as published in the location reference data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Loc {
    pub code: String,
    /// Multi-transport city the location belongs to; empty for a city row.
    #[serde(default)]
    pub city: String,
    pub nation: String,
    #[serde(default)]
    pub state: String,
    pub area: String,
    #[serde(default)]
    pub sub_area: String,
}

impl Loc {
    pub fn city_row(code: &str, nation: &str, area: &str) -> Self {
        Self {
            code: code.to_string(),
            nation: nation.to_string(),
            area: area.to_string(),
            ..Self::default()
        }
    }

    pub fn airport_row(code: &str, city: &str, nation: &str, area: &str) -> Self {
        Self {
            city: city.to_string(),
            ..Self::city_row(code, nation, area)
        }
    }

    /// City code used for mileage lookups: the owning city for an airport.
    pub fn city_code(&self) -> &str {
        if self.city.is_empty() {
            &self.code
        } else {
            &self.city
        }
    }

    pub fn is_in_area(&self, area: &str) -> bool {
        self.area == area
    }
}

/// Granularity of a [`LocKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocType {
    #[serde(rename = "C")]
    City,
    #[serde(rename = "P")]
    Airport,
    #[serde(rename = "N")]
    Nation,
    #[serde(rename = "S")]
    State,
    #[serde(rename = "A")]
    Area,
    #[serde(rename = "*")]
    SubArea,
}

/// Typed reference to a geographic location set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocKey {
    #[serde(rename = "type")]
    pub loc_type: LocType,
    pub code: String,
}

impl LocKey {
    pub fn new(loc_type: LocType, code: &str) -> Self {
        Self {
            loc_type,
            code: code.to_string(),
        }
    }

    pub fn city(code: &str) -> Self {
        Self::new(LocType::City, code)
    }

    pub fn nation(code: &str) -> Self {
        Self::new(LocType::Nation, code)
    }

    pub fn area(code: &str) -> Self {
        Self::new(LocType::Area, code)
    }

    pub fn contains(&self, loc: &Loc) -> bool {
        match self.loc_type {
            LocType::City => loc.code == self.code || loc.city_code() == self.code,
            LocType::Airport => loc.code == self.code,
            LocType::Nation => loc.nation == self.code,
            LocType::State => !loc.state.is_empty() && loc.state == self.code,
            LocType::Area => loc.area == self.code,
            LocType::SubArea => !loc.sub_area.is_empty() && loc.sub_area == self.code,
        }
    }
}

/// An absent key places no restriction on the location.
pub(crate) fn key_admits(key: Option<&LocKey>, loc: &Loc) -> bool {
    key.map_or(true, |key| key.contains(loc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_key_matches_airports_of_the_city() {
        let jfk = Loc::airport_row("JFK", "NYC", "US", "1");
        assert!(LocKey::city("NYC").contains(&jfk));
        assert!(!LocKey::new(LocType::Airport, "LGA").contains(&jfk));
        assert!(LocKey::nation("US").contains(&jfk));
        assert!(LocKey::area("1").contains(&jfk));
    }

    #[test]
    fn empty_state_never_matches() {
        let lon = Loc::city_row("LON", "GB", "2");
        assert!(!LocKey::new(LocType::State, "").contains(&lon));
        assert!(key_admits(None, &lon));
    }
}
