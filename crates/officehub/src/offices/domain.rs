use serde::{Deserialize, Serialize};

/// Identifier wrapper for office listings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct OfficeId(pub i64);

/// Stored office listing. Photos hold relative storage paths produced by the
/// photo store, never the inbound data URIs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeRecord {
    pub id: OfficeId,
    pub name: String,
    pub address: String,
    pub options: String,
    pub description: String,
    pub area: f64,
    pub price: f64,
    pub active: bool,
    pub photos: Vec<String>,
}

/// Create/update request body; `photos` carries base64 data URIs that are
/// decoded and stored before the record references them.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeDraft {
    pub name: String,
    pub address: String,
    pub options: String,
    pub description: String,
    pub area: f64,
    pub price: f64,
    #[serde(default)]
    pub photos: Vec<String>,
}

/// Field changes applied to an existing office; photos travel separately.
#[derive(Debug, Clone, Default)]
pub struct OfficeChanges {
    pub name: Option<String>,
    pub address: Option<String>,
    pub options: Option<String>,
    pub description: Option<String>,
    pub area: Option<f64>,
    pub price: Option<f64>,
    pub active: Option<bool>,
}

impl From<&OfficeDraft> for OfficeChanges {
    fn from(draft: &OfficeDraft) -> Self {
        Self {
            name: Some(draft.name.clone()),
            address: Some(draft.address.clone()),
            options: Some(draft.options.clone()),
            description: Some(draft.description.clone()),
            area: Some(draft.area),
            price: Some(draft.price),
            active: None,
        }
    }
}

/// Range criteria for the office search endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeSearch {
    pub min_area: f64,
    pub max_area: f64,
    pub min_price: f64,
    pub max_price: f64,
}

impl OfficeSearch {
    pub fn matches(&self, office: &OfficeRecord) -> bool {
        office.area >= self.min_area
            && office.area <= self.max_area
            && office.price >= self.min_price
            && office.price <= self.max_price
    }
}

/// Lowercase and strip separators so name search matches the way the
/// original normalized its queries.
pub fn normalize_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '-' && *c != ' ')
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn office(area: f64, price: f64) -> OfficeRecord {
        OfficeRecord {
            id: OfficeId(1),
            name: "Loft A".to_string(),
            address: "Main St 1".to_string(),
            options: String::new(),
            description: String::new(),
            area,
            price,
            active: true,
            photos: Vec::new(),
        }
    }

    #[test]
    fn search_bounds_are_inclusive() {
        let criteria = OfficeSearch {
            min_area: 20.0,
            max_area: 40.0,
            min_price: 100.0,
            max_price: 200.0,
        };
        assert!(criteria.matches(&office(20.0, 200.0)));
        assert!(!criteria.matches(&office(19.9, 150.0)));
        assert!(!criteria.matches(&office(30.0, 200.1)));
    }

    #[test]
    fn name_normalization_folds_case_and_separators() {
        assert_eq!(normalize_name("Down-Town HQ"), "downtownhq");
    }
}
