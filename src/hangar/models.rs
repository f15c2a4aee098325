//! Hangar inventory records.

use serde::{Deserialize, Deserializer, Serialize};

/// Kind of hangar item. Only CCUs take part in price resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HangarItemType {
    Ccu,
    Other(String),
}

impl From<String> for HangarItemType {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("ccu") {
            HangarItemType::Ccu
        } else {
            HangarItemType::Other(value)
        }
    }
}

impl From<HangarItemType> for String {
    fn from(value: HangarItemType) -> Self {
        match value {
            HangarItemType::Ccu => "ccu".to_string(),
            HangarItemType::Other(other) => other,
        }
    }
}

/// An owned upgrade credit (or other item) declared by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HangarItem {
    #[serde(rename = "type")]
    pub item_type: HangarItemType,
    pub from_ship: String,
    pub to_ship: String,
    /// What the user paid, in cents.
    pub price: i64,
    /// RSI account(s) holding the credit. Stored either as one tag or a list.
    #[serde(default, rename = "belongsTo", deserialize_with = "one_or_many")]
    pub owners: Vec<String>,
    /// Hangar pages where the credit can be found for redemption.
    #[serde(default)]
    pub page_ids: Vec<String>,
}

impl HangarItem {
    pub fn ccu(from_ship: &str, to_ship: &str, price: i64) -> Self {
        Self {
            item_type: HangarItemType::Ccu,
            from_ship: from_ship.to_string(),
            to_ship: to_ship.to_string(),
            price,
            owners: Vec::new(),
            page_ids: Vec::new(),
        }
    }

    pub fn is_ccu(&self) -> bool {
        self.item_type == HangarItemType::Ccu
    }

    /// Trimmed, case-insensitive match on both ship names.
    pub fn matches(&self, from_ship: &str, to_ship: &str) -> bool {
        names_match(&self.from_ship, from_ship) && names_match(&self.to_ship, to_ship)
    }

    pub fn belongs_to(&self, owner: &str) -> bool {
        self.owners.iter().any(|o| o == owner)
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(owner)) => vec![owner],
        Some(OneOrMany::Many(owners)) => owners,
        None => Vec::new(),
    })
}

pub(crate) fn names_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
