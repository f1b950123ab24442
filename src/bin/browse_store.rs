use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use artfund::catalog::{Catalog, FilterKind};
use artfund::config;
use artfund::store::Storefront;

#[derive(Debug, Parser)]
#[command(author, version, about = "List store artworks with filters and sorting")]
struct Args {
    /// Path to YAML config file; the built-in catalog is used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Price range such as 200-500 or 500+
    #[arg(long)]
    price: Option<String>,

    /// painting, drawing, digital, photography or sculpture
    #[arg(long)]
    category: Option<String>,

    /// featured, price-low, price-high or newest
    #[arg(long, default_value = "featured")]
    sort: String,

    /// Show details for one artwork
    #[arg(long)]
    quick_view: Option<String>,

    /// Installment plan (months) to add to the cart from the quick view
    #[arg(long, requires = "quick_view")]
    installment: Option<u32>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let catalog = match &args.config {
        Some(path) => config::load(Some(path))?.catalog()?,
        None => Catalog::sample(),
    };

    let mut store = Storefront::new(catalog);
    if let Some(price) = &args.price {
        store.toggle_filter(FilterKind::Price, price);
    }
    if let Some(category) = &args.category {
        store.toggle_filter(FilterKind::Category, category);
    }
    store.set_sort(&args.sort);

    let visible = store.visible();
    println!("{} artwork(s), sorted by {}", visible.len(), store.sort().label());
    for a in visible {
        println!(
            "{:>4}  {:<20} {:<18} ${:>6}  {}",
            a.id,
            a.title,
            a.artist,
            a.price,
            a.category.label()
        );
    }

    let Some(id) = &args.quick_view else {
        return Ok(());
    };
    let artwork = store.open_quick_view(id)?;
    println!();
    println!("{} by {}", artwork.title, artwork.artist);
    println!("  ${}  |  {}  |  {}", artwork.price, artwork.medium, artwork.dimensions);
    println!("  {}", artwork.description);
    for plan in &artwork.installment_options {
        println!("  {} months: ${}/mo", plan.months, plan.monthly_payment);
    }

    if let Some(months) = args.installment {
        store.select_installment(months)?;
        let line = store.add_to_cart()?;
        println!(
            "Added to cart: artwork {} on {} x ${}",
            line.artwork_id, line.months, line.monthly_payment
        );
    }
    Ok(())
}
