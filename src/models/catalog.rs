use std::collections::HashMap;
use std::str::FromStr;

use super::jersey::Jersey;
use errors::Error;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    All,
    Available,
    OutOfStock,
}

impl Default for Availability {
    fn default() -> Self {
        Availability::All
    }
}

impl FromStr for Availability {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(Availability::All),
            "available" => Ok(Availability::Available),
            "out-of-stock" => Ok(Availability::OutOfStock),
            other => Err(Error::invalid_input("availability", format!("unknown filter '{}'", other))),
        }
    }
}

/// Catalog filters, all optional. `"all"` behaves like an absent filter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub league: Option<String>,
    pub team: Option<String>,
    pub availability: Availability,
    pub featured: Option<bool>,
}

fn meaningful(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != "all")
}

impl CatalogQuery {
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, Error> {
        let availability = match params.get("availability") {
            Some(v) => v.trim().parse()?,
            None => Availability::All,
        };
        let featured = match params.get("featured").map(|v| v.trim()) {
            None | Some("") => None,
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(other) => return Err(Error::invalid_input("featured", format!("expected true or false, got '{}'", other))),
        };

        Ok(Self {
            search: meaningful(params.get("search")).map(|s| s.to_lowercase()),
            league: meaningful(params.get("league")),
            team: meaningful(params.get("team")),
            availability,
            featured,
        })
    }

    pub fn matches(&self, jersey: &Jersey) -> bool {
        if let Some(ref search) = self.search {
            let hit = [&jersey.name, &jersey.team, &jersey.league]
                .iter()
                .any(|field| field.to_lowercase().contains(search.as_str()));
            if !hit {
                return false;
            }
        }

        if let Some(ref league) = self.league {
            if &jersey.league != league {
                return false;
            }
        }

        if let Some(ref team) = self.team {
            if &jersey.team != team {
                return false;
            }
        }

        match self.availability {
            Availability::Available if !jersey.is_available => return false,
            Availability::OutOfStock if jersey.is_available => return false,
            _ => {}
        }

        if let Some(featured) = self.featured {
            if jersey.is_featured != featured {
                return false;
            }
        }

        true
    }

    /// Keeps matching jerseys, preserving the incoming order
    pub fn apply(&self, jerseys: Vec<Jersey>) -> Vec<Jersey> {
        jerseys.into_iter().filter(|jersey| self.matches(jersey)).collect()
    }
}

/// Filter options offered to the catalog page
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogFacets {
    pub leagues: Vec<String>,
    pub teams: Vec<String>,
}

impl CatalogFacets {
    /// Distinct values in first-seen order
    pub fn collect(jerseys: &[Jersey]) -> Self {
        let mut facets = CatalogFacets::default();
        for jersey in jerseys {
            if !facets.leagues.contains(&jersey.league) {
                facets.leagues.push(jersey.league.clone());
            }
            if !facets.teams.contains(&jersey.team) {
                facets.teams.push(jersey.team.clone());
            }
        }
        facets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use models::common::JerseyId;

    fn jersey(name: &str, team: &str, league: &str, is_available: bool) -> Jersey {
        let now = Utc::now();
        Jersey {
            id: JerseyId::new(),
            name: name.to_string(),
            team: team.to_string(),
            league: league.to_string(),
            season: "2024/25".to_string(),
            price_naira: 20000.0,
            description: None,
            image_url: None,
            sizes: vec![],
            available_sizes: vec![],
            stock_quantity: 3,
            is_available,
            is_featured: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn catalog() -> Vec<Jersey> {
        vec![
            jersey("Home Kit", "Arsenal", "Premier League", true),
            jersey("Away Kit", "Arsenal", "Premier League", false),
            jersey("Home Kit", "Real Madrid", "La Liga", true),
        ]
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn search_is_case_insensitive_over_name_team_and_league() {
        let query = CatalogQuery::from_params(&params(&[("search", "MADRID")])).unwrap();
        let found = query.apply(catalog());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].team, "Real Madrid");

        let query = CatalogQuery::from_params(&params(&[("search", "league")])).unwrap();
        assert_eq!(query.apply(catalog()).len(), 2);
    }

    #[test]
    fn all_means_no_filter() {
        let query = CatalogQuery::from_params(&params(&[("league", "all"), ("team", "all"), ("availability", "all")])).unwrap();
        assert_eq!(query, CatalogQuery::default());
        assert_eq!(query.apply(catalog()).len(), 3);
    }

    #[test]
    fn availability_filters() {
        let available = CatalogQuery::from_params(&params(&[("availability", "available")])).unwrap();
        assert_eq!(available.apply(catalog()).len(), 2);

        let out = CatalogQuery::from_params(&params(&[("availability", "out-of-stock"), ("team", "Arsenal")])).unwrap();
        let found = out.apply(catalog());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Away Kit");

        assert!(CatalogQuery::from_params(&params(&[("availability", "soon")])).is_err());
    }

    #[test]
    fn facets_keep_first_seen_order() {
        let facets = CatalogFacets::collect(&catalog());
        assert_eq!(facets.leagues, vec!["Premier League", "La Liga"]);
        assert_eq!(facets.teams, vec!["Arsenal", "Real Madrid"]);
    }
}
