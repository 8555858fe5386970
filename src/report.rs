use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::catalog::Catalog;
use crate::models::CatchEvent;
use crate::stats;
use crate::view::{self, RarityFilter, SortOrder};

const RECENT_LIMIT: usize = 5;

pub fn build_report(
    collection: &[CatchEvent],
    catalog: &Catalog,
    generated_at: DateTime<Utc>,
) -> String {
    let mut output = String::new();
    let unique = stats::unique_species_count(collection);

    let _ = writeln!(output, "# Critterdex Progress Report");
    let _ = writeln!(output, "Generated {}", generated_at.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "- Progress: {}/{} species ({:.1}%)",
        unique,
        catalog.len(),
        stats::progress_percent(collection, catalog)
    );
    let _ = writeln!(output, "- Total catches: {}", collection.len());
    let _ = writeln!(
        output,
        "- Catches with location: {}",
        stats::located_count(collection)
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## By Rarity");
    for group in stats::rarity_breakdown(collection, catalog) {
        let _ = writeln!(
            output,
            "- {}: {}/{} ({:.0}%)",
            group.key,
            group.caught,
            group.total,
            group.percent()
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## By Type");
    for group in stats::category_breakdown(collection, catalog) {
        let _ = writeln!(
            output,
            "- {}: {}/{}",
            group.key, group.caught, group.total
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Achievements");
    for achievement in stats::achievements(collection, catalog) {
        let mark = if achievement.unlocked { "x" } else { " " };
        let _ = writeln!(
            output,
            "- [{}] {} {}: {}",
            mark, achievement.icon, achievement.title, achievement.description
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Still Missing");
    let missing = stats::missing_by_rarity(collection, catalog);
    if missing.is_empty() {
        let _ = writeln!(output, "Every species has been caught.");
    } else {
        for (rarity, records) in missing {
            let names: Vec<String> = records
                .iter()
                .map(|record| format!("{} {}", record.emoji, record.name))
                .collect();
            let _ = writeln!(
                output,
                "- {} ({} to find): {}",
                rarity,
                records.len(),
                names.join(", ")
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Catches");
    let recent = view::arrange(collection, RarityFilter::All, SortOrder::Recent);
    if recent.is_empty() {
        let _ = writeln!(output, "No animals caught yet.");
    } else {
        for event in recent.iter().take(RECENT_LIMIT) {
            let place = event
                .location
                .as_ref()
                .map(|location| {
                    location.address.clone().unwrap_or_else(|| {
                        format!("{:.4}, {:.4}", location.latitude, location.longitude)
                    })
                })
                .unwrap_or_else(|| "unknown location".to_string());
            let _ = writeln!(
                output,
                "- {} {} ({}) on {} at {}",
                event.animal.emoji,
                event.display_name(),
                event.animal.rarity,
                event.caught_at.format("%Y-%m-%d"),
                place
            );
        }
    }

    output
}
