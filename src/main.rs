use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use property_scout::{
    CatalogQuery, CatalogSource, Config, FavoritesStore, FileStorage, FilterCriteria,
    JsonFileCatalog, ListingType, Property, PropertyType, PropertyViews, SampleCatalog,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "property-scout",
    version,
    about = "Browse property listings and keep a list of favorites"
)]
struct Cli {
    /// JSON catalog to browse instead of the configured one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List properties matching the given filters
    List(FilterArgs),
    /// Show a single property
    Show { id: String },
    /// List favorited properties
    Favorites,
    /// Flip the favorite mark on a property
    Toggle { id: String },
    /// Mark a property as favorite
    Add { id: String },
    /// Remove a property from favorites
    Remove { id: String },
    /// Write the filtered listing to a JSON file
    Export {
        path: PathBuf,
        #[command(flatten)]
        filters: FilterArgs,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Free text matched against suburb, state, postcode and title
    #[arg(short, long, default_value = "")]
    search: String,
    /// Property type (repeatable)
    #[arg(long = "type")]
    types: Vec<PropertyType>,
    /// Listing type (repeatable)
    #[arg(long = "listing")]
    listings: Vec<ListingType>,
    #[arg(long)]
    min_beds: Option<u32>,
    #[arg(long)]
    max_beds: Option<u32>,
    #[arg(long)]
    min_baths: Option<u32>,
    #[arg(long)]
    max_baths: Option<u32>,
    #[arg(long)]
    min_price: Option<u64>,
    #[arg(long)]
    max_price: Option<u64>,
    /// Exact suburb name (repeatable)
    #[arg(long = "suburb")]
    suburbs: Vec<String>,
    /// State code (repeatable)
    #[arg(long = "state")]
    states: Vec<String>,
    /// Only premium listings
    #[arg(long, conflicts_with = "off_market")]
    premium: bool,
    /// Only off-market listings
    #[arg(long)]
    off_market: bool,
}

impl FilterArgs {
    fn query(&self) -> CatalogQuery {
        if self.premium {
            CatalogQuery::Premium
        } else if self.off_market {
            CatalogQuery::OffMarket
        } else {
            CatalogQuery::All
        }
    }

    fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new()
            .with_search(self.search.clone())
            .with_property_types(self.types.iter().copied())
            .with_listing_types(self.listings.iter().copied())
            .with_bedrooms(self.min_beds, self.max_beds)
            .with_bathrooms(self.min_baths, self.max_baths)
            .with_price(self.min_price, self.max_price)
            .with_suburbs(self.suburbs.iter().cloned())
            .with_states(self.states.iter().cloned())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(path) = cli.catalog {
        config.catalog_path = Some(path);
    }

    let source: Box<dyn CatalogSource> = match &config.catalog_path {
        Some(path) => Box::new(JsonFileCatalog::new(path)),
        None => Box::new(SampleCatalog::new()),
    };
    info!("🏠 Property Scout - {} catalog", source.source_name());

    let storage = Arc::new(FileStorage::new(&config.data_dir));
    let favorites = Arc::new(FavoritesStore::load(storage, config.favorites_options()).await);
    let views = PropertyViews::new(Arc::clone(&favorites));

    match cli.command {
        Command::List(filters) => {
            views.replace_catalog(fetch(source.as_ref(), &filters.query()).await?);
            views.set_criteria(filters.criteria());

            let properties = views.filtered();
            info!(
                "✅ {} of {} properties match ({} active filters)",
                properties.len(),
                views.catalog().len(),
                views.active_filter_count()
            );
            print_properties(&properties, &views);
        }
        Command::Show { id } => {
            let found = fetch(source.as_ref(), &CatalogQuery::ById(id.clone())).await?;
            match found.first() {
                Some(property) => print_details(property, views.is_favorite(&property.id)),
                None => println!("No property with id {}", id),
            }
        }
        Command::Favorites => {
            views.replace_catalog(fetch(source.as_ref(), &CatalogQuery::All).await?);
            let properties = views.favorite_properties();
            info!(
                "⭐ {} favorites, {} in the current catalog",
                views.favorite_count(),
                properties.len()
            );
            print_properties(&properties, &views);
        }
        Command::Toggle { id } => {
            if views.toggle_favorite(&id) {
                println!("★ Added {} to favorites", id);
            } else {
                println!("☆ Removed {} from favorites", id);
            }
        }
        Command::Add { id } => {
            if favorites.add(&id) {
                println!("★ Added {} to favorites", id);
            } else {
                println!("{} is already a favorite", id);
            }
        }
        Command::Remove { id } => {
            if favorites.remove(&id) {
                println!("☆ Removed {} from favorites", id);
            } else {
                println!("{} was not a favorite", id);
            }
        }
        Command::Export { path, filters } => {
            views.replace_catalog(fetch(source.as_ref(), &filters.query()).await?);
            views.set_criteria(filters.criteria());

            let properties = views.filtered();
            let json = serde_json::to_string_pretty(&properties)?;
            tokio::fs::write(&path, json)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("💾 Saved {} properties to {}", properties.len(), path.display());
        }
    }

    favorites.flush().await;

    Ok(())
}

async fn fetch(source: &dyn CatalogSource, query: &CatalogQuery) -> Result<Vec<Property>> {
    source
        .fetch(query)
        .await
        .with_context(|| format!("Failed to fetch {} catalog", source.source_name()))
}

fn print_properties(properties: &[Property], views: &PropertyViews) {
    for (i, property) in properties.iter().enumerate() {
        let star = if views.is_favorite(&property.id) { " ★" } else { "" };
        println!("{}. {} ({}){}", i + 1, property.title, property.price, star);
        println!("   {}", summary(property));
        println!(
            "   {}, {} {} {}",
            property.location.address,
            property.location.suburb,
            property.location.state,
            property.location.postcode
        );
        println!("   ID: {}", property.id);
        println!();
    }
}

fn print_details(property: &Property, favorite: bool) {
    println!("{}{}", property.title, if favorite { " ★" } else { "" });
    println!("   {}", summary(property));
    println!("   Price: {}", property.price);
    println!(
        "   Address: {}, {} {} {}",
        property.location.address,
        property.location.suburb,
        property.location.state,
        property.location.postcode
    );
    if !property.features.extras.is_empty() {
        println!("   Features: {}", property.features.extras.join(", "));
    }
    if let Some(agent) = &property.agent {
        println!("   Agent: {} ({})", agent.name, agent.agency);
    }
    if !property.description.is_empty() {
        println!("   {}", property.description);
    }
    println!("   ID: {}", property.id);
}

fn summary(property: &Property) -> String {
    let mut parts = vec![format!("{} for {}", property.property_type, property.listing_type)];
    if let Some(beds) = property.features.bedrooms {
        parts.push(format!("{} bed", beds));
    }
    if let Some(baths) = property.features.bathrooms {
        parts.push(format!("{} bath", baths));
    }
    parts.join(", ")
}
