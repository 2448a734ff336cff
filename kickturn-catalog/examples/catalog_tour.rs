//! Catalog Tour Example
//!
//! Demonstrates the kickturn serving flow end to end:
//! 1. Seed an in-memory store with a small catalog
//! 2. Stand up the cache-first catalog index
//! 3. List, page, and search the approved catalog
//! 4. Apply a mutation and watch the cache refresh
//!
//! The mock store stands in for the real backing store; everything else is
//! exactly what a deployment runs.

use std::sync::Arc;
use std::time::Duration;

use kickturn_catalog::{CatalogCache, CatalogConfig, CatalogIndex};
use kickturn_core::{
    new_user_id, FilterSpec, GeoPoint, KickturnResult, Mutation, SkillLevel, Spot, SpotKind,
    SpotKindFilter, SpotSize,
};
use kickturn_store::MockSpotStore;

#[tokio::main(flavor = "current_thread")]
async fn main() -> KickturnResult<()> {
    println!("=== kickturn Catalog Tour ===\n");

    // Step 1: Configure the read layer
    let config = CatalogConfig::new()
        .with_all_spots_ttl(Duration::from_secs(300))
        .with_page_ttl(Duration::from_secs(60))
        .with_fetch_timeout(Duration::from_secs(2));
    println!("✓ Configuration created");
    println!("  Full-listing TTL: {:?}", config.all_spots_ttl);
    println!("  Fetch timeout: {:?}", config.fetch_timeout);

    // Step 2: Seed the store
    let store = Arc::new(MockSpotStore::new());
    store.seed(seed_spots());
    println!("\n✓ Store seeded (in-memory mock)");
    println!("  Records: {}", store.spot_count());

    // Step 3: Stand up the catalog index
    let cache = Arc::new(CatalogCache::new());
    let catalog = CatalogIndex::new(Arc::clone(&store), cache, config)?;
    println!("\n✓ Catalog index ready");

    // Step 4: List the approved catalog
    let all = catalog.list_all().await?;
    println!("\n✓ Approved catalog listed: {} spots", all.len());
    for (i, spot) in all.iter().enumerate() {
        println!("  {}. {} ({}, {})", i + 1, spot.title, spot.kind, spot.size);
    }

    // Step 5: Page through it
    let page = catalog.list_page(1, 2).await?;
    println!("\n✓ Page 1 fetched: {} spots", page.len());

    // Step 6: Search street spots near the city center
    let origin = GeoPoint::new(32.0853, 34.7818);
    let spec = FilterSpec::new()
        .with_kind(SpotKindFilter::Street)
        .with_distance(origin, 10.0);
    let nearby = catalog.search(&spec).await?;
    println!("\n✓ Street spots within 10 km: {}", nearby.len());
    for spot in &nearby {
        println!("  - {}", spot.title);
    }

    // Step 7: Apply a mutation and refresh
    let stats = catalog.cache_stats();
    println!(
        "\n✓ Cache stats before mutation: {} hits, {} misses, {} entries",
        stats.hits, stats.misses, stats.entry_count
    );

    let newcomer = Spot::new(
        "Harbor Ledges",
        GeoPoint::new(32.0980, 34.7741),
        SpotSize::Small,
        SpotKind::Street,
        new_user_id(),
    )
    .with_description("Smooth marble ledges along the promenade")
    .with_approved(true);
    let newcomer_id = newcomer.spot_id;
    store.insert_spot(newcomer);

    let removed = catalog.invalidate_on_mutation(&Mutation::created(newcomer_id));
    println!("\n✓ Mutation applied, {} cache entries dropped", removed);

    let refreshed = catalog.list_all().await?;
    println!("✓ Catalog refreshed: {} spots", refreshed.len());

    // Step 8: Ranked views
    let top = catalog.list_top_rated(3).await?;
    println!("\n✓ Top rated:");
    for spot in &top {
        println!("  {:.1} - {}", spot.rating_average, spot.title);
    }

    println!("\n=== Tour Complete ===");
    println!("Reads ride the cache; mutations invalidate before acknowledgment.");

    Ok(())
}

/// A handful of approved spots around Tel Aviv.
fn seed_spots() -> Vec<Spot> {
    vec![
        Spot::new(
            "Galit Skatepark",
            GeoPoint::new(32.0751, 34.7900),
            SpotSize::Large,
            SpotKind::Park,
            new_user_id(),
        )
        .with_description("Concrete bowl and street plaza by the park")
        .with_tags(vec!["bowl".to_string(), "plaza".to_string()])
        .with_levels(vec![SkillLevel::Intermediate, SkillLevel::Advanced])
        .with_rating(4.6, 58)
        .with_approved(true),
        Spot::new(
            "Rothschild Rails",
            GeoPoint::new(32.0664, 34.7748),
            SpotSize::Medium,
            SpotKind::Street,
            new_user_id(),
        )
        .with_description("Round rails and flat ground on the boulevard")
        .with_tags(vec!["rails".to_string(), "flat".to_string()])
        .with_levels(vec![SkillLevel::Beginner, SkillLevel::Intermediate])
        .with_rating(4.1, 23)
        .with_approved(true),
        Spot::new(
            "Yarkon Banks",
            GeoPoint::new(32.1093, 34.8366),
            SpotSize::Small,
            SpotKind::Street,
            new_user_id(),
        )
        .with_description("Brick banks under the bridge, rough but fun")
        .with_tags(vec!["banks".to_string()])
        .with_levels(vec![SkillLevel::Advanced])
        .with_rating(3.7, 11)
        .with_approved(true),
        Spot::new(
            "Carmel Bowl",
            GeoPoint::new(32.7940, 34.9896),
            SpotSize::Large,
            SpotKind::Park,
            new_user_id(),
        )
        .with_description("Deep bowl up north, worth the drive")
        .with_tags(vec!["bowl".to_string(), "vert".to_string()])
        .with_levels(vec![SkillLevel::Advanced])
        .with_rating(4.8, 74)
        .with_approved(true),
    ]
}
