use chrono::prelude::*;
use validator::Validate;

use super::common::*;
use errors::Error;

pub const DEFAULT_SIZES: &[&str] = &["S", "M", "L", "XL", "XXL"];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Jersey {
    pub id: JerseyId,
    pub name: String,
    pub team: String,
    pub league: String,
    pub season: String,
    pub price_naira: f64,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub sizes: Vec<String>,
    pub available_sizes: Vec<String>,
    pub stock_quantity: i32,
    pub is_available: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Jersey {
    /// Fails with `Unavailable` when the jersey cannot be bought
    pub fn ensure_available(&self) -> Result<(), Error> {
        if self.is_available {
            Ok(())
        } else {
            Err(Error::Unavailable)
        }
    }

    /// Resolves the requested size against the offered ones.
    /// Nothing can be picked while no size is available.
    pub fn resolve_size(&self, size: &str) -> Result<String, Error> {
        if self.available_sizes.is_empty() {
            return Err(Error::invalid_input("size", format!("no sizes are available for {}", self.name)));
        }

        let size = size.trim();
        if size.is_empty() {
            return Err(Error::invalid_input("size", "Please select a size"));
        }

        self.available_sizes
            .iter()
            .find(|offered| offered.eq_ignore_ascii_case(size))
            .cloned()
            .ok_or_else(|| Error::invalid_input("size", format!("size {} is not available for {}", size, self.name)))
    }
}

/// Jersey fields shown next to cart lines and wishlist entries
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JerseySummary {
    pub id: JerseyId,
    pub name: String,
    pub team: String,
    pub league: String,
    pub price_naira: f64,
    pub image_url: Option<String>,
    pub is_available: bool,
}

impl<'a> From<&'a Jersey> for JerseySummary {
    fn from(v: &'a Jersey) -> Self {
        Self {
            id: v.id,
            name: v.name.clone(),
            team: v.team.clone(),
            league: v.league.clone(),
            price_naira: v.price_naira,
            image_url: v.image_url.clone(),
            is_available: v.is_available,
        }
    }
}

/// Sizes as typed in the admin form (`"S, M, L"`) or as a JSON array
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SizeList {
    List(Vec<String>),
    Csv(String),
}

impl SizeList {
    pub fn into_sizes(self) -> Vec<String> {
        let raw = match self {
            SizeList::List(sizes) => sizes,
            SizeList::Csv(s) => s.split(',').map(|s| s.to_string()).collect(),
        };

        let mut out: Vec<String> = vec![];
        for size in raw {
            let size = size.trim().to_string();
            if !size.is_empty() && !out.contains(&size) {
                out.push(size);
            }
        }
        out
    }
}

fn default_sizes() -> Vec<String> {
    DEFAULT_SIZES.iter().map(|s| s.to_string()).collect()
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct JerseyPayload {
    #[validate(length(min = "1", max = "200", message = "Jersey name is required"))]
    pub name: String,
    #[validate(length(min = "1", max = "100", message = "Team is required"))]
    pub team: String,
    #[validate(length(min = "1", max = "100", message = "League is required"))]
    pub league: String,
    #[validate(length(min = "1", max = "20", message = "Season is required"))]
    pub season: String,
    pub price_naira: f64,
    #[validate(length(max = "2000", message = "Description is too long"))]
    pub description: Option<String>,
    #[validate(length(max = "500", message = "Image url is too long"))]
    pub image_url: Option<String>,
    pub sizes: Option<SizeList>,
    pub available_sizes: Option<SizeList>,
    pub stock_quantity: Option<i32>,
    pub is_available: Option<bool>,
    pub is_featured: Option<bool>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewJersey {
    pub id: JerseyId,
    pub name: String,
    pub team: String,
    pub league: String,
    pub season: String,
    pub price_naira: f64,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub sizes: Vec<String>,
    pub available_sizes: Vec<String>,
    pub stock_quantity: i32,
    pub is_available: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

fn check_price(price: f64) -> Result<f64, Error> {
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(Error::invalid_input("price_naira", "price must be a non-negative number"))
    }
}

fn check_stock(stock: i32) -> Result<i32, Error> {
    if stock >= 0 {
        Ok(stock)
    } else {
        Err(Error::invalid_input("stock_quantity", "stock cannot be negative"))
    }
}

impl JerseyPayload {
    /// Trims, validates and fills in defaults
    pub fn into_new_jersey(self) -> Result<NewJersey, Error> {
        let payload = JerseyPayload {
            name: self.name.trim().to_string(),
            team: self.team.trim().to_string(),
            league: self.league.trim().to_string(),
            season: self.season.trim().to_string(),
            description: non_blank(self.description),
            image_url: non_blank(self.image_url),
            ..self
        };
        payload.validate().map_err(Error::Validate)?;

        let sizes = payload
            .sizes
            .map(SizeList::into_sizes)
            .filter(|sizes| !sizes.is_empty())
            .unwrap_or_else(default_sizes);
        // Everything listed is in stock until an admin says otherwise.
        let available_sizes = payload
            .available_sizes
            .map(SizeList::into_sizes)
            .unwrap_or_else(|| sizes.clone());

        Ok(NewJersey {
            id: JerseyId::new(),
            name: payload.name,
            team: payload.team,
            league: payload.league,
            season: payload.season,
            price_naira: check_price(payload.price_naira)?,
            description: payload.description,
            image_url: payload.image_url,
            sizes,
            available_sizes,
            stock_quantity: check_stock(payload.stock_quantity.unwrap_or(0))?,
            is_available: payload.is_available.unwrap_or(true),
            is_featured: payload.is_featured.unwrap_or(false),
            created_at: Utc::now(),
        })
    }
}

impl From<NewJersey> for Jersey {
    fn from(v: NewJersey) -> Self {
        Self {
            id: v.id,
            name: v.name,
            team: v.team,
            league: v.league,
            season: v.season,
            price_naira: v.price_naira,
            description: v.description,
            image_url: v.image_url,
            sizes: v.sizes,
            available_sizes: v.available_sizes,
            stock_quantity: v.stock_quantity,
            is_available: v.is_available,
            is_featured: v.is_featured,
            created_at: v.created_at,
            updated_at: v.created_at,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct JerseyUpdatePayload {
    #[validate(length(min = "1", max = "200", message = "Jersey name is required"))]
    pub name: Option<String>,
    #[validate(length(min = "1", max = "100", message = "Team is required"))]
    pub team: Option<String>,
    #[validate(length(min = "1", max = "100", message = "League is required"))]
    pub league: Option<String>,
    #[validate(length(min = "1", max = "20", message = "Season is required"))]
    pub season: Option<String>,
    pub price_naira: Option<f64>,
    #[validate(length(max = "2000", message = "Description is too long"))]
    pub description: Option<String>,
    #[validate(length(max = "500", message = "Image url is too long"))]
    pub image_url: Option<String>,
    pub sizes: Option<SizeList>,
    pub available_sizes: Option<SizeList>,
    pub stock_quantity: Option<i32>,
    pub is_available: Option<bool>,
    pub is_featured: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct JerseyUpdateData {
    pub name: Option<String>,
    pub team: Option<String>,
    pub league: Option<String>,
    pub season: Option<String>,
    pub price_naira: Option<f64>,
    /// `Some(None)` clears the column
    pub description: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub sizes: Option<Vec<String>>,
    pub available_sizes: Option<Vec<String>>,
    pub stock_quantity: Option<i32>,
    pub is_available: Option<bool>,
    pub is_featured: Option<bool>,
}

impl JerseyUpdatePayload {
    pub fn into_update_data(self) -> Result<JerseyUpdateData, Error> {
        let trim = |v: Option<String>| v.map(|s| s.trim().to_string());
        let payload = JerseyUpdatePayload {
            name: trim(self.name),
            team: trim(self.team),
            league: trim(self.league),
            season: trim(self.season),
            description: trim(self.description),
            image_url: trim(self.image_url),
            ..self
        };
        payload.validate().map_err(Error::Validate)?;

        Ok(JerseyUpdateData {
            name: payload.name,
            team: payload.team,
            league: payload.league,
            season: payload.season,
            price_naira: match payload.price_naira {
                Some(price) => Some(check_price(price)?),
                None => None,
            },
            description: payload.description.map(|s| non_blank(Some(s))),
            image_url: payload.image_url.map(|s| non_blank(Some(s))),
            sizes: payload.sizes.map(SizeList::into_sizes),
            available_sizes: payload.available_sizes.map(SizeList::into_sizes),
            stock_quantity: match payload.stock_quantity {
                Some(stock) => Some(check_stock(stock)?),
                None => None,
            },
            is_available: payload.is_available,
            is_featured: payload.is_featured,
        })
    }
}

impl JerseyUpdateData {
    pub fn apply(&self, jersey: &mut Jersey) {
        if let Some(ref v) = self.name {
            jersey.name = v.clone();
        }
        if let Some(ref v) = self.team {
            jersey.team = v.clone();
        }
        if let Some(ref v) = self.league {
            jersey.league = v.clone();
        }
        if let Some(ref v) = self.season {
            jersey.season = v.clone();
        }
        if let Some(v) = self.price_naira {
            jersey.price_naira = v;
        }
        if let Some(ref v) = self.description {
            jersey.description = v.clone();
        }
        if let Some(ref v) = self.image_url {
            jersey.image_url = v.clone();
        }
        if let Some(ref v) = self.sizes {
            jersey.sizes = v.clone();
        }
        if let Some(ref v) = self.available_sizes {
            jersey.available_sizes = v.clone();
        }
        if let Some(v) = self.stock_quantity {
            jersey.stock_quantity = v;
        }
        if let Some(v) = self.is_available {
            jersey.is_available = v;
        }
        if let Some(v) = self.is_featured {
            jersey.is_featured = v;
        }
        jersey.updated_at = Utc::now();
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct JerseyFilter {
    pub id: Option<JerseyId>,
    pub ids: Option<Vec<JerseyId>>,
    pub is_available: Option<bool>,
    pub is_featured: Option<bool>,
}

impl From<JerseyId> for JerseyFilter {
    fn from(id: JerseyId) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct JerseyUpdater {
    pub filter: JerseyFilter,
    pub data: JerseyUpdateData,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> JerseyPayload {
        JerseyPayload {
            name: " Home Kit ".to_string(),
            team: "Super Eagles".to_string(),
            league: "International".to_string(),
            season: "2024/25".to_string(),
            price_naira: 25000.0,
            description: Some("   ".to_string()),
            image_url: None,
            sizes: None,
            available_sizes: None,
            stock_quantity: None,
            is_available: None,
            is_featured: None,
        }
    }

    #[test]
    fn new_jersey_gets_defaults() {
        let jersey = payload().into_new_jersey().unwrap();

        assert_eq!(jersey.name, "Home Kit");
        assert_eq!(jersey.description, None);
        assert_eq!(jersey.sizes, vec!["S", "M", "L", "XL", "XXL"]);
        assert_eq!(jersey.available_sizes, jersey.sizes);
        assert_eq!(jersey.stock_quantity, 0);
        assert!(jersey.is_available);
        assert!(!jersey.is_featured);
    }

    #[test]
    fn sizes_accept_comma_lists_and_arrays() {
        assert_eq!(
            SizeList::Csv("S, M,, L , M".to_string()).into_sizes(),
            vec!["S", "M", "L"]
        );
        assert_eq!(
            SizeList::List(vec!["XL".to_string(), " XXL ".to_string()]).into_sizes(),
            vec!["XL", "XXL"]
        );

        let parsed: SizeList = ::serde_json::from_str(r#""S, M""#).unwrap();
        assert_eq!(parsed, SizeList::Csv("S, M".to_string()));
        let parsed: SizeList = ::serde_json::from_str(r#"["S","M"]"#).unwrap();
        assert_eq!(parsed, SizeList::List(vec!["S".to_string(), "M".to_string()]));
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut p = payload();
        p.name = "   ".to_string();

        match p.into_new_jersey() {
            Err(Error::Validate(errors)) => assert!(errors.field_errors().contains_key("name")),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut p = payload();
        p.price_naira = -1.0;

        match p.into_new_jersey() {
            Err(Error::InvalidInput { field, .. }) => assert_eq!(field, "price_naira"),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn size_resolution_is_case_insensitive() {
        let mut jersey: Jersey = payload().into_new_jersey().unwrap().into();
        jersey.available_sizes = vec!["M".to_string(), "XL".to_string()];

        assert_eq!(jersey.resolve_size(" xl ").unwrap(), "XL");
        assert!(jersey.resolve_size("S").is_err());
        assert!(jersey.resolve_size("").is_err());

        jersey.available_sizes.clear();
        assert!(jersey.resolve_size("S").is_err());
    }

    #[test]
    fn update_clears_blank_description() {
        let data = JerseyUpdatePayload {
            description: Some(" ".to_string()),
            price_naira: Some(30000.0),
            ..Default::default()
        }.into_update_data()
            .unwrap();

        assert_eq!(data.description, Some(None));
        assert_eq!(data.price_naira, Some(30000.0));
        assert_eq!(data.name, None);
    }
}
