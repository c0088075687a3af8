use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of dwelling or land on offer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    House,
    Apartment,
    Townhouse,
    Land,
    Rural,
    Commercial,
}

impl PropertyType {
    pub const ALL: [PropertyType; 6] = [
        PropertyType::House,
        PropertyType::Apartment,
        PropertyType::Townhouse,
        PropertyType::Land,
        PropertyType::Rural,
        PropertyType::Commercial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::House => "house",
            PropertyType::Apartment => "apartment",
            PropertyType::Townhouse => "townhouse",
            PropertyType::Land => "land",
            PropertyType::Rural => "rural",
            PropertyType::Commercial => "commercial",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        PropertyType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| format!("unknown property type: {}", s))
    }
}

/// How the property is being offered
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Sale,
    Rent,
    Auction,
    #[serde(alias = "off-market", alias = "off_market")]
    Offmarket,
}

impl ListingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Sale => "sale",
            ListingType::Rent => "rent",
            ListingType::Auction => "auction",
            ListingType::Offmarket => "offmarket",
        }
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sale" => Ok(ListingType::Sale),
            "rent" => Ok(ListingType::Rent),
            "auction" => Ok(ListingType::Auction),
            "offmarket" | "off-market" | "off_market" => Ok(ListingType::Offmarket),
            _ => Err(format!("unknown listing type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Location information for a property
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Location {
    pub suburb: String,
    pub state: String,
    pub postcode: String,
    pub address: String,
    pub coordinates: Option<Coordinates>,
}

/// Physical features. Counts are optional because listings such as land or
/// commercial sites often omit them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Features {
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub car_spaces: Option<u32>,
    /// Land size in square metres
    pub land_size: Option<f64>,
    /// Floor area in square metres
    pub building_size: Option<f64>,
    pub extras: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RentalPeriod {
    Week,
    Month,
}

/// Shape of the asking price
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PriceKind {
    Fixed {
        amount: u64,
    },
    Range {
        #[serde(rename = "minAmount")]
        min_amount: u64,
        #[serde(rename = "maxAmount")]
        max_amount: u64,
    },
    Auction,
    Contact,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    #[serde(flatten)]
    pub kind: PriceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental_period: Option<RentalPeriod>,
}

impl Price {
    pub fn fixed(amount: u64) -> Self {
        Self {
            kind: PriceKind::Fixed { amount },
            rental_period: None,
        }
    }

    pub fn range(min_amount: u64, max_amount: u64) -> Self {
        Self {
            kind: PriceKind::Range {
                min_amount,
                max_amount,
            },
            rental_period: None,
        }
    }

    pub fn auction() -> Self {
        Self {
            kind: PriceKind::Auction,
            rental_period: None,
        }
    }

    pub fn contact() -> Self {
        Self {
            kind: PriceKind::Contact,
            rental_period: None,
        }
    }

    pub fn per(mut self, period: RentalPeriod) -> Self {
        self.rental_period = Some(period);
        self
    }

    /// Single amount used for price bound comparisons.
    ///
    /// Ranges are represented by their lower bound. Auction and
    /// contact-agent listings have no deterministic amount and return `None`.
    pub fn representative_amount(&self) -> Option<u64> {
        match self.kind {
            PriceKind::Fixed { amount } => Some(amount),
            PriceKind::Range { min_amount, .. } => Some(min_amount),
            PriceKind::Auction | PriceKind::Contact => None,
        }
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::contact()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PriceKind::Fixed { amount } => write!(f, "${}", group_thousands(amount))?,
            PriceKind::Range {
                min_amount,
                max_amount,
            } => write!(
                f,
                "${} - ${}",
                group_thousands(min_amount),
                group_thousands(max_amount)
            )?,
            PriceKind::Auction => return f.write_str("Auction"),
            PriceKind::Contact => return f.write_str("Contact agent"),
        }
        match self.rental_period {
            Some(RentalPeriod::Week) => f.write_str(" /week"),
            Some(RentalPeriod::Month) => f.write_str(" /month"),
            None => Ok(()),
        }
    }
}

fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Agent {
    pub name: String,
    pub agency: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Media {
    pub images: Vec<String>,
    pub floor_plan: Option<String>,
    pub video: Option<String>,
}

/// Core property data model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub listing_type: ListingType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub features: Features,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub media: Media,
    #[serde(default)]
    pub agent: Option<Agent>,
    #[serde(default)]
    pub premium: bool,
    #[serde(default)]
    pub listed_at: Option<DateTime<Utc>>,
}
