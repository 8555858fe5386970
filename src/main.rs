use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

mod catalog;
mod db;
mod draw;
mod error;
mod location;
mod models;
mod report;
mod slots;
mod stats;
mod store;
mod transfer;
mod view;

use catalog::Catalog;
use models::{CatchEvent, CatchRequest, GroupProgress, SpeciesRecord};
use slots::FileSlots;
use store::CollectionStore;
use view::{RarityFilter, SortOrder};

const DEFAULT_DATA_DIR: &str = ".critterdex";
const BAR_WIDTH: usize = 20;

#[derive(Parser)]
#[command(name = "critterdex")]
#[command(
    about = "Catch animals, build your collection, and track your progress",
    long_about = None
)]
struct Cli {
    /// Where the collection is persisted
    #[arg(long, value_enum, default_value_t = StoreKind::File, global = true)]
    store: StoreKind,
    /// Directory for the file store (defaults to $CRITTERDEX_HOME or ./.critterdex)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    File,
    Postgres,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the Postgres schema
    InitDb,
    /// Load a week of sample catches
    Seed,
    /// Throw a ball and see what you catch
    #[command(group(
        ArgGroup::new("place")
            .args(["address", "street"])
            .multiple(false)
    ))]
    Catch {
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        street: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        nickname: Option<String>,
        /// Seed the draw for a reproducible catch
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List caught animals
    List {
        #[arg(long, default_value = "recent")]
        sort: SortOrder,
        #[arg(long, default_value = "all")]
        rarity: RarityFilter,
    },
    /// List every species in the catalog
    Species,
    /// Show the card for one species
    Show { species_id: u32 },
    /// Release a caught animal back into the wild
    Release { id: String },
    /// Give a caught animal a nickname (omit the name to clear it)
    Rename { id: String, nickname: Option<String> },
    /// Release every animal
    Reset {
        #[arg(long)]
        yes: bool,
    },
    /// Print collection progress and achievements
    Progress,
    /// Print where animals were caught
    Map {
        #[arg(long, allow_negative_numbers = true, requires = "user_lon")]
        user_lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true, requires = "user_lat")]
        user_lon: Option<f64>,
    },
    /// Generate a markdown progress report
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Import catches from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Export the collection to a CSV file
    Export {
        #[arg(long, default_value = "collection.csv")]
        csv: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let catalog = Catalog::builtin();
    catalog.validate().context("builtin catalog is inconsistent")?;

    match cli.command {
        Commands::InitDb => {
            let pool = db::connect(&database_url()?).await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        command => {
            let store = open_store(cli.store, cli.data_dir).await?;
            run(command, &store, &catalog).await?;
        }
    }

    Ok(())
}

async fn run(command: Commands, store: &CollectionStore, catalog: &Catalog) -> anyhow::Result<()> {
    match command {
        Commands::InitDb => {
            bail!("init-db does not operate on a collection");
        }
        Commands::Seed => {
            let demo = transfer::demo_catches(catalog, Utc::now())?;
            let count = demo.len();
            store.append_all(demo).await?;
            println!("Seeded {count} catches.");
        }
        Commands::Catch {
            lat,
            lon,
            address,
            street,
            city,
            region,
            nickname,
            seed,
        } => {
            let address = address.or_else(|| {
                location::format_address(street.as_deref(), city.as_deref(), region.as_deref())
            });
            let request = CatchRequest {
                latitude: lat,
                longitude: lon,
                address,
                nickname,
            };
            let mut rng = match seed {
                Some(seed) => ChaCha8Rng::seed_from_u64(seed),
                None => ChaCha8Rng::from_entropy(),
            };

            let caught = store.catch(catalog, &mut rng, &request).await?;
            println!(
                "Gotcha! {} {} ({}) was caught!",
                caught.animal.emoji,
                caught.display_name(),
                caught.animal.rarity
            );
            println!("  {}", caught.animal.description);
            println!("  id: {}", caught.id);
            match &caught.location {
                Some(location) => println!("  at {}", describe_place(location)),
                None => println!("  no location recorded"),
            }
        }
        Commands::List { sort, rarity } => {
            let collection = store.read_all().await;
            if collection.is_empty() {
                println!("No animals yet. Go catch some!");
                return Ok(());
            }

            let shown = view::arrange(&collection, rarity, sort);
            let noun = if shown.len() == 1 { "animal" } else { "animals" };
            println!("{} {} (sorted by {}):", shown.len(), noun, sort);
            for event in &shown {
                println!("- {}", describe_catch(event));
            }
        }
        Commands::Species => {
            let caught = stats::caught_ids(&store.read_all().await);
            for rarity in models::Rarity::ALL {
                let odds =
                    f64::from(draw::weight_of(rarity)) / f64::from(draw::total_weight()) * 100.0;
                println!("{} ({:.0}% per catch)", rarity, odds);
                for record in catalog.of_rarity(rarity) {
                    let mark = if caught.contains(&record.id) { "x" } else { " " };
                    println!(
                        "  [{}] #{:02} {} {} ({})",
                        mark, record.id, record.emoji, record.name, record.category
                    );
                }
            }
        }
        Commands::Show { species_id } => {
            let Some(record) = catalog.get(species_id) else {
                bail!("no species with id {species_id}");
            };
            print_card(record);
        }
        Commands::Release { id } => {
            if store.delete_by_id(&id).await? {
                println!("Released {id}. Bye bye!");
            } else {
                println!("No catch with id {id}.");
            }
        }
        Commands::Rename { id, nickname } => {
            let updated = store.set_nickname(&id, nickname).await?;
            println!("{} is now called {}.", updated.animal.name, updated.display_name());
        }
        Commands::Reset { yes } => {
            if !yes {
                println!("This releases ALL animals and cannot be undone. Re-run with --yes.");
                return Ok(());
            }
            store.clear().await?;
            println!("Collection reset.");
        }
        Commands::Progress => {
            let collection = store.read_all().await;
            print_progress(&collection, catalog);
        }
        Commands::Map { user_lat, user_lon } => {
            let collection = store.read_all().await;
            let region = stats::map_region(&collection, user_lat.zip(user_lon));
            println!(
                "Region: {:.4}, {:.4} (span {:.4} x {:.4})",
                region.latitude, region.longitude, region.latitude_delta, region.longitude_delta
            );

            let located: Vec<&CatchEvent> = collection
                .iter()
                .filter(|event| event.location.is_some())
                .collect();
            if located.is_empty() {
                println!("No locations yet. Catch animals with location tracking to map them.");
            } else {
                let noun = if located.len() == 1 { "location" } else { "locations" };
                println!("{} {} mapped:", located.len(), noun);
                for event in located {
                    println!("- {}", describe_catch(event));
                }
            }
        }
        Commands::Report { out } => {
            let collection = store.read_all().await;
            let report = report::build_report(&collection, catalog, Utc::now());
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
        Commands::Import { csv } => {
            let imported = transfer::import_csv(store, catalog, &csv).await?;
            println!("Imported {imported} catches from {}.", csv.display());
        }
        Commands::Export { csv } => {
            let collection = store.read_all().await;
            let written = transfer::export_csv(&collection, &csv)?;
            println!("Exported {written} catches to {}.", csv.display());
        }
    }

    Ok(())
}

fn database_url() -> anyhow::Result<String> {
    std::env::var("DATABASE_URL").context("DATABASE_URL must be set to use the Postgres store")
}

async fn open_store(
    kind: StoreKind,
    data_dir: Option<PathBuf>,
) -> anyhow::Result<CollectionStore> {
    match kind {
        StoreKind::File => {
            let root = data_dir
                .or_else(|| std::env::var_os("CRITTERDEX_HOME").map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
            let slots = FileSlots::new(root);
            info!("using file store at {}", slots.root().display());
            Ok(CollectionStore::new(slots))
        }
        StoreKind::Postgres => {
            let pool = db::connect(&database_url()?).await?;
            Ok(CollectionStore::new(db::PgSlots::new(pool)))
        }
    }
}

fn describe_place(location: &models::Location) -> String {
    match &location.address {
        Some(address) => format!(
            "{} ({:.4}, {:.4})",
            address, location.latitude, location.longitude
        ),
        None => format!("{:.4}, {:.4}", location.latitude, location.longitude),
    }
}

fn describe_catch(event: &CatchEvent) -> String {
    let place = event
        .location
        .as_ref()
        .map(describe_place)
        .unwrap_or_else(|| "unknown location".to_string());
    format!(
        "{} {} [{}, {}] caught {} at {} (id {})",
        event.animal.emoji,
        event.display_name(),
        event.animal.rarity,
        event.animal.category,
        event.caught_at.format("%b %e, %Y %H:%M"),
        place,
        event.id
    )
}

fn bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn print_group<K: std::fmt::Display>(group: &GroupProgress<K>) {
    println!(
        "  {:<10} {} {}/{}",
        group.key.to_string(),
        bar(group.percent()),
        group.caught,
        group.total
    );
}

fn print_progress(collection: &[CatchEvent], catalog: &Catalog) {
    let progress = stats::progress_percent(collection, catalog);
    println!(
        "Pokédex progress: {:.1}% ({}/{} species)",
        progress,
        stats::unique_species_count(collection),
        catalog.len()
    );
    println!("  {}", bar(progress));
    println!(
        "Total caught: {}   With location: {}",
        collection.len(),
        stats::located_count(collection)
    );

    println!();
    println!("By rarity:");
    for group in stats::rarity_breakdown(collection, catalog) {
        print_group(&group);
    }

    println!();
    println!("By type:");
    for group in stats::category_breakdown(collection, catalog) {
        print_group(&group);
    }

    println!();
    println!("Achievements:");
    for achievement in stats::achievements(collection, catalog) {
        let icon = if achievement.unlocked { achievement.icon } else { "🔒" };
        println!("  {} {} - {}", icon, achievement.title, achievement.description);
    }

    let missing = stats::missing_by_rarity(collection, catalog);
    println!();
    if missing.is_empty() {
        println!("Gotta catch 'em all? You did!");
    } else {
        println!("Still to find:");
        for (rarity, records) in missing {
            let names: Vec<&str> = records.iter().map(|record| record.name.as_str()).collect();
            println!("  {} ({}): {}", rarity, records.len(), names.join(", "));
        }
    }
}

fn print_card(record: &SpeciesRecord) {
    println!("#{:02} {} {}", record.id, record.emoji, record.name);
    println!("  {}", record.species);
    println!(
        "  {} ({}) / {} ({})",
        record.rarity,
        record.rarity.badge_color(),
        record.category,
        record.category.color()
    );
    println!("  Habitat: {}", record.habitat);
    println!("  {}", record.description);

    let labels = ["SPD", "STR", "CUTE", "INT", "STL"];
    for (label, value) in labels.iter().zip(record.stats.values()) {
        println!("  {:<4} {} {}", label, bar(f64::from(value)), value);
    }
    println!("  Total {}", record.stat_total());
    println!(
        "  Colors {} / {} / {}",
        record.colors.primary, record.colors.secondary, record.colors.accent
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_scale_and_clamp() {
        assert_eq!(bar(0.0).chars().filter(|c| *c == '█').count(), 0);
        assert_eq!(bar(50.0).chars().filter(|c| *c == '█').count(), 10);
        assert_eq!(bar(250.0).chars().filter(|c| *c == '█').count(), BAR_WIDTH);
        assert_eq!(bar(37.0).chars().count(), BAR_WIDTH);
    }

    #[test]
    fn cli_parses_catch_with_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "critterdex", "catch", "--lat", "-33.86", "--lon", "151.2", "--seed", "9",
        ])
        .unwrap();
        match cli.command {
            Commands::Catch { lat, lon, seed, .. } => {
                assert_eq!(lat, Some(-33.86));
                assert_eq!(lon, Some(151.2));
                assert_eq!(seed, Some(9));
            }
            _ => panic!("expected catch"),
        }
        assert_eq!(cli.store, StoreKind::File);
    }

    #[test]
    fn cli_rejects_address_with_street_parts() {
        let parsed = Cli::try_parse_from([
            "critterdex", "catch", "--address", "Somewhere", "--street", "1 Main St",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn cli_parses_list_options() {
        let cli = Cli::try_parse_from([
            "critterdex", "--store", "postgres", "list", "--sort", "rarity", "--rarity", "epic",
        ])
        .unwrap();
        assert_eq!(cli.store, StoreKind::Postgres);
        match cli.command {
            Commands::List { sort, rarity } => {
                assert_eq!(sort, SortOrder::Rarity);
                assert_eq!(rarity, RarityFilter::Only(models::Rarity::Epic));
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn describe_catch_mentions_place_and_id() {
        let event = store::tests::located(store::tests::event("abc", 16, 0), -33.5, 151.25);
        let line = describe_catch(&event);
        assert!(line.contains("Fox [rare, mammal]"));
        assert!(line.contains("-33.5000, 151.2500"));
        assert!(line.ends_with("(id abc)"));
    }
}
