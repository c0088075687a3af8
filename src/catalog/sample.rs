use crate::catalog::traits::{CatalogError, CatalogQuery, CatalogSource};
use crate::models::{
    Agent, Coordinates, Features, ListingType, Location, Media, Price, Property, PropertyType,
    RentalPeriod,
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tracing::info;

/// Built-in demo listings used when no catalog file is configured
#[derive(Debug, Default, Clone)]
pub struct SampleCatalog;

impl SampleCatalog {
    pub fn new() -> Self {
        Self
    }

    /// Get the sample properties in catalog order
    pub fn properties() -> Vec<Property> {
        vec![
            listing(
                "melb-fitzroy-1",
                PropertyType::House,
                ListingType::Sale,
                "Restored Victorian terrace",
                ("Fitzroy", "VIC", "3065", "14 Gore Street"),
                (Some(3), Some(2)),
                Price::fixed(1_450_000),
            ),
            listing(
                "melb-richmond-2",
                PropertyType::Apartment,
                ListingType::Rent,
                "Light-filled apartment near the river",
                ("Richmond", "VIC", "3121", "8/220 Swan Street"),
                (Some(2), Some(1)),
                Price::range(550, 600).per(RentalPeriod::Week),
            ),
            Property {
                premium: true,
                ..listing(
                    "syd-paddington-3",
                    PropertyType::Townhouse,
                    ListingType::Auction,
                    "Architect designed townhouse",
                    ("Paddington", "NSW", "2021", "5 Glenmore Road"),
                    (Some(4), Some(3)),
                    Price::auction(),
                )
            },
            listing(
                "bris-newfarm-4",
                PropertyType::Apartment,
                ListingType::Sale,
                "Riverside apartment with views",
                ("New Farm", "QLD", "4005", "12/45 Merthyr Road"),
                (Some(1), Some(1)),
                Price::range(620_000, 680_000),
            ),
            Property {
                features: Features {
                    land_size: Some(40_000.0),
                    ..Features::default()
                },
                ..listing(
                    "tas-huon-5",
                    PropertyType::Rural,
                    ListingType::Offmarket,
                    "Apple orchard with creek frontage",
                    ("Huonville", "TAS", "7109", "210 Wilmot Road"),
                    (None, None),
                    Price::contact(),
                )
            },
            Property {
                premium: true,
                ..listing(
                    "per-cottesloe-6",
                    PropertyType::Land,
                    ListingType::Offmarket,
                    "Ocean view building block",
                    ("Cottesloe", "WA", "6011", "3 Marine Parade"),
                    (None, None),
                    Price::fixed(2_100_000),
                )
            },
            listing(
                "adl-norwood-7",
                PropertyType::Commercial,
                ListingType::Rent,
                "Street-front retail tenancy",
                ("Norwood", "SA", "5067", "160 The Parade"),
                (None, Some(1)),
                Price::fixed(4_200).per(RentalPeriod::Month),
            ),
        ]
    }
}

fn listing(
    id: &str,
    property_type: PropertyType,
    listing_type: ListingType,
    title: &str,
    (suburb, state, postcode, address): (&str, &str, &str, &str),
    (bedrooms, bathrooms): (Option<u32>, Option<u32>),
    price: Price,
) -> Property {
    Property {
        id: id.to_string(),
        property_type,
        listing_type,
        title: title.to_string(),
        description: format!("{} in {}, {}.", title, suburb, state),
        location: Location {
            suburb: suburb.to_string(),
            state: state.to_string(),
            postcode: postcode.to_string(),
            address: address.to_string(),
            coordinates: suburb_centre(suburb),
        },
        features: Features {
            bedrooms,
            bathrooms,
            ..Features::default()
        },
        price,
        media: Media::default(),
        agent: Some(Agent {
            name: "Sam Taylor".to_string(),
            agency: "Scout Realty".to_string(),
            phone: None,
            email: Some("sam@scoutrealty.example".to_string()),
        }),
        premium: false,
        listed_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single(),
    }
}

/// Approximate centre of each sample suburb
fn suburb_centre(suburb: &str) -> Option<Coordinates> {
    let (latitude, longitude) = match suburb {
        "Fitzroy" => (-37.7984, 144.9784),
        "Richmond" => (-37.8183, 144.9980),
        "Paddington" => (-33.8847, 151.2265),
        "New Farm" => (-27.4670, 153.0490),
        "Huonville" => (-43.0310, 147.0480),
        "Cottesloe" => (-31.9950, 115.7580),
        "Norwood" => (-34.9210, 138.6300),
        _ => return None,
    };
    Some(Coordinates {
        latitude,
        longitude,
    })
}

#[async_trait]
impl CatalogSource for SampleCatalog {
    async fn fetch(&self, query: &CatalogQuery) -> Result<Vec<Property>, CatalogError> {
        info!("📋 Serving built-in sample listings");
        Ok(query.apply(Self::properties()))
    }

    fn source_name(&self) -> &'static str {
        "Sample"
    }
}
