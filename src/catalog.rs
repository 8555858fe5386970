use std::collections::HashSet;

use crate::draw;
use crate::error::{DexError, Result};
use crate::models::{Category, Palette, Rarity, SpeciesRecord, Stats};

/// The fixed set of species a catch can produce.
#[derive(Debug, Clone)]
pub struct Catalog {
    species: Vec<SpeciesRecord>,
}

impl Catalog {
    pub fn new(species: Vec<SpeciesRecord>) -> Self {
        Self { species }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_species())
    }

    pub fn species(&self) -> &[SpeciesRecord] {
        &self.species
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&SpeciesRecord> {
        self.species.iter().find(|record| record.id == id)
    }

    pub fn of_rarity(&self, rarity: Rarity) -> Vec<&SpeciesRecord> {
        self.species
            .iter()
            .filter(|record| record.rarity == rarity)
            .collect()
    }

    pub fn of_category(&self, category: Category) -> Vec<&SpeciesRecord> {
        self.species
            .iter()
            .filter(|record| record.category == category)
            .collect()
    }

    /// Rejects catalogs the draw cannot serve or whose records are malformed.
    pub fn validate(&self) -> Result<()> {
        for (rarity, weight) in draw::RARITY_WEIGHTS {
            if weight > 0 && self.of_rarity(rarity).is_empty() {
                return Err(DexError::configuration(format!(
                    "rarity tier `{rarity}` has weight {weight} but no species"
                )));
            }
        }

        let mut seen = HashSet::new();
        for record in &self.species {
            if !seen.insert(record.id) {
                return Err(DexError::configuration(format!(
                    "duplicate species id {}",
                    record.id
                )));
            }
            if record.stats.values().iter().any(|value| *value > 100) {
                return Err(DexError::configuration(format!(
                    "species {} ({}) has a stat above 100",
                    record.id, record.name
                )));
            }
        }

        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
fn species(
    id: u32,
    name: &str,
    scientific: &str,
    category: Category,
    rarity: Rarity,
    habitat: &str,
    description: &str,
    stats: [u8; 5],
    colors: [&str; 3],
    emoji: &str,
) -> SpeciesRecord {
    let [speed, strength, cuteness, intelligence, stealth] = stats;
    let [primary, secondary, accent] = colors;
    SpeciesRecord {
        id,
        name: name.to_string(),
        species: scientific.to_string(),
        category,
        rarity,
        habitat: habitat.to_string(),
        description: description.to_string(),
        stats: Stats {
            speed,
            strength,
            cuteness,
            intelligence,
            stealth,
        },
        colors: Palette {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
            accent: accent.to_string(),
        },
        emoji: emoji.to_string(),
    }
}

fn builtin_species() -> Vec<SpeciesRecord> {
    vec![
        // common
        species(
            1,
            "Sparrow",
            "Passer domesticus",
            Category::Bird,
            Rarity::Common,
            "Urban areas, gardens",
            "A cheerful little bird commonly seen hopping around parks and streets.",
            [70, 20, 65, 40, 50],
            ["#8B7355", "#D4C4B0", "#4A4A4A"],
            "🐦",
        ),
        species(
            2,
            "Pigeon",
            "Columba livia",
            Category::Bird,
            Rarity::Common,
            "Cities, parks",
            "The urban warrior. Masters of navigation and masters of stealing your lunch.",
            [55, 25, 35, 60, 30],
            ["#708090", "#C0C0C0", "#9370DB"],
            "🕊️",
        ),
        species(
            3,
            "Squirrel",
            "Sciurus carolinensis",
            Category::Mammal,
            Rarity::Common,
            "Parks, forests, backyards",
            "Hyperactive acrobat with an obsession for nuts and causing chaos.",
            [85, 15, 80, 65, 60],
            ["#8B4513", "#D2691E", "#F5DEB3"],
            "🐿️",
        ),
        species(
            4,
            "Ant",
            "Formicidae",
            Category::Insect,
            Rarity::Common,
            "Everywhere",
            "Tiny but mighty. Can carry 50x their body weight and never skips leg day.",
            [40, 95, 20, 70, 80],
            ["#2F1810", "#4A2C23", "#8B0000"],
            "🐜",
        ),
        species(
            5,
            "Butterfly",
            "Papilionoidea",
            Category::Insect,
            Rarity::Common,
            "Gardens, meadows",
            "Nature's flying artwork. Starts life as a caterpillar, ends as a masterpiece.",
            [45, 5, 90, 15, 40],
            ["#FF6B6B", "#FFE66D", "#4ECDC4"],
            "🦋",
        ),
        species(
            6,
            "Ladybug",
            "Coccinellidae",
            Category::Insect,
            Rarity::Common,
            "Gardens, fields",
            "Adorable polka-dotted beetle. Lucky charm and aphid destroyer.",
            [30, 10, 95, 20, 45],
            ["#DC143C", "#000000", "#FFD700"],
            "🐞",
        ),
        species(
            7,
            "Robin",
            "Erithacus rubecula",
            Category::Bird,
            Rarity::Common,
            "Gardens, woodlands",
            "The friendly garden companion with a beautiful orange-red breast.",
            [65, 15, 85, 45, 55],
            ["#CD853F", "#FF6347", "#F5F5DC"],
            "🐦",
        ),
        species(
            8,
            "House Spider",
            "Tegenaria domestica",
            Category::Arachnid,
            Rarity::Common,
            "Homes, buildings",
            "Eight-legged roommate. Catches flies for free, just wants appreciation.",
            [50, 25, 15, 35, 90],
            ["#3D2914", "#5C4033", "#8B8378"],
            "🕷️",
        ),
        // uncommon
        species(
            9,
            "Rabbit",
            "Oryctolagus cuniculus",
            Category::Mammal,
            Rarity::Uncommon,
            "Meadows, gardens",
            "Fluffy hopping machine. Ears like satellite dishes, nose always twitching.",
            [80, 20, 95, 50, 70],
            ["#D2B48C", "#FFFFFF", "#FFB6C1"],
            "🐰",
        ),
        species(
            10,
            "Hedgehog",
            "Erinaceus europaeus",
            Category::Mammal,
            Rarity::Uncommon,
            "Gardens, hedgerows",
            "Spiky ball of adorableness. Rolls into a ball when scared, loves slugs.",
            [25, 30, 90, 40, 65],
            ["#8B7355", "#D4C4B0", "#2F1810"],
            "🦔",
        ),
        species(
            11,
            "Frog",
            "Rana temporaria",
            Category::Amphibian,
            Rarity::Uncommon,
            "Ponds, wetlands",
            "Slimy jumper with a musical croak. Catches flies with lightning-fast tongue.",
            [65, 20, 70, 35, 75],
            ["#228B22", "#90EE90", "#FFD700"],
            "🐸",
        ),
        species(
            12,
            "Dragonfly",
            "Anisoptera",
            Category::Insect,
            Rarity::Uncommon,
            "Near water, wetlands",
            "Ancient aerial predator. Can fly backwards, sideways, and hover like a helicopter.",
            [95, 15, 60, 30, 55],
            ["#4169E1", "#00CED1", "#9370DB"],
            "🪰",
        ),
        species(
            13,
            "Raccoon",
            "Procyon lotor",
            Category::Mammal,
            Rarity::Uncommon,
            "Forests, suburbs",
            "Trash panda extraordinaire. Masked bandit with surprisingly dexterous hands.",
            [55, 45, 75, 85, 80],
            ["#696969", "#000000", "#D3D3D3"],
            "🦝",
        ),
        species(
            14,
            "Blue Jay",
            "Cyanocitta cristata",
            Category::Bird,
            Rarity::Uncommon,
            "Forests, parks",
            "Loud and proud bird with stunning blue feathers. The gossip of the forest.",
            [70, 30, 75, 75, 35],
            ["#4169E1", "#FFFFFF", "#000000"],
            "🐦",
        ),
        species(
            15,
            "Gecko",
            "Gekkonidae",
            Category::Reptile,
            Rarity::Uncommon,
            "Warm climates, houses",
            "Wall-climbing ninja. Can lick its own eyeballs. Yes, really.",
            [60, 15, 80, 45, 85],
            ["#9ACD32", "#FFD700", "#FF6347"],
            "🦎",
        ),
        // rare
        species(
            16,
            "Fox",
            "Vulpes vulpes",
            Category::Mammal,
            Rarity::Rare,
            "Forests, urban edges",
            "Cunning and beautiful. Plays, pounces, and looks majestic doing it.",
            [85, 50, 85, 90, 90],
            ["#FF4500", "#FFFFFF", "#2F1810"],
            "🦊",
        ),
        species(
            17,
            "Owl",
            "Strigiformes",
            Category::Bird,
            Rarity::Rare,
            "Forests, barns",
            "Silent night hunter. Can rotate head 270 degrees. Gives sage advice.",
            [70, 55, 80, 95, 95],
            ["#8B7355", "#FFFAF0", "#FFD700"],
            "🦉",
        ),
        species(
            18,
            "Deer",
            "Cervidae",
            Category::Mammal,
            Rarity::Rare,
            "Forests, meadows",
            "Graceful forest dweller. Majestic antlers on the males, bambi eyes on all.",
            [90, 55, 90, 60, 75],
            ["#CD853F", "#FFFAF0", "#8B4513"],
            "🦌",
        ),
        species(
            19,
            "Hummingbird",
            "Trochilidae",
            Category::Bird,
            Rarity::Rare,
            "Gardens, tropical areas",
            "Tiny helicopter bird. Wings beat 80 times per second. Lives on sugar highs.",
            [100, 5, 95, 50, 60],
            ["#00FF7F", "#FF1493", "#4169E1"],
            "🐦",
        ),
        species(
            20,
            "Seahorse",
            "Hippocampus",
            Category::Fish,
            Rarity::Rare,
            "Coastal waters",
            "Tiny ocean unicorn. Males give birth. Worst swimmers but best vibes.",
            [10, 5, 90, 30, 70],
            ["#FF6B6B", "#FFE66D", "#4ECDC4"],
            "🐠",
        ),
        species(
            21,
            "Chameleon",
            "Chamaeleonidae",
            Category::Reptile,
            Rarity::Rare,
            "Tropical forests",
            "Color-changing master of disguise. Eyes move independently. Ultimate spy.",
            [20, 15, 75, 60, 100],
            ["#32CD32", "#FFD700", "#9370DB"],
            "🦎",
        ),
        // epic
        species(
            22,
            "Wolf",
            "Canis lupus",
            Category::Mammal,
            Rarity::Epic,
            "Wilderness, forests",
            "Pack leader of legends. Loyal, powerful, and howls at the moon dramatically.",
            [85, 85, 70, 90, 80],
            ["#696969", "#FFFFFF", "#1C1C1C"],
            "🐺",
        ),
        species(
            23,
            "Eagle",
            "Aquila chrysaetos",
            Category::Bird,
            Rarity::Epic,
            "Mountains, cliffs",
            "Sky ruler with razor-sharp vision. Can spot a mouse from 2 miles away.",
            [95, 80, 60, 85, 70],
            ["#8B4513", "#FFD700", "#FFFAF0"],
            "🦅",
        ),
        species(
            24,
            "Octopus",
            "Octopoda",
            Category::Fish,
            Rarity::Epic,
            "Ocean depths",
            "Eight-armed genius. Changes color, solves puzzles, escapes aquariums.",
            [50, 60, 65, 100, 90],
            ["#FF6B6B", "#9370DB", "#4169E1"],
            "🐙",
        ),
        species(
            25,
            "Peacock",
            "Pavo cristatus",
            Category::Bird,
            Rarity::Epic,
            "Forests, parks",
            "Walking art gallery. Tail feathers are nature's ultimate flex.",
            [45, 35, 85, 55, 20],
            ["#4169E1", "#00FF7F", "#FFD700"],
            "🦚",
        ),
        species(
            26,
            "Polar Bear",
            "Ursus maritimus",
            Category::Mammal,
            Rarity::Epic,
            "Arctic regions",
            "Arctic apex predator. Looks cuddly but can outswim most fish.",
            [60, 100, 75, 70, 65],
            ["#FFFAFA", "#F0F8FF", "#000000"],
            "🐻‍❄️",
        ),
        // legendary
        species(
            27,
            "Snow Leopard",
            "Panthera uncia",
            Category::Mammal,
            Rarity::Legendary,
            "Mountain peaks",
            "Ghost of the mountains. So elusive, even scientists rarely see one.",
            [90, 85, 90, 85, 100],
            ["#C0C0C0", "#FFFFFF", "#2F2F2F"],
            "🐆",
        ),
        species(
            28,
            "Phoenix Firefly",
            "Lampyridae ignis",
            Category::Insect,
            Rarity::Legendary,
            "Enchanted meadows",
            "Mythical glowing insect. Said to grant wishes to those who catch it.",
            [70, 10, 100, 80, 85],
            ["#FF4500", "#FFD700", "#FF6347"],
            "✨",
        ),
        species(
            29,
            "Blue Whale",
            "Balaenoptera musculus",
            Category::Mammal,
            Rarity::Legendary,
            "Deep oceans",
            "Largest creature ever. Heart is the size of a car. Songs travel 1000 miles.",
            [45, 100, 70, 90, 30],
            ["#4169E1", "#87CEEB", "#191970"],
            "🐋",
        ),
        species(
            30,
            "Golden Dragon Lizard",
            "Draco aureus",
            Category::Reptile,
            Rarity::Legendary,
            "Hidden temples",
            "Ancient mystical reptile. Scales shimmer like gold. Extremely rare.",
            [80, 70, 85, 95, 90],
            ["#FFD700", "#FF4500", "#8B0000"],
            "🐉",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 30);
        catalog.validate().expect("builtin catalog validates");
    }

    #[test]
    fn builtin_tier_sizes() {
        let catalog = Catalog::builtin();
        let sizes: Vec<usize> = Rarity::ALL
            .iter()
            .map(|rarity| catalog.of_rarity(*rarity).len())
            .collect();
        assert_eq!(sizes, vec![8, 7, 6, 5, 4]);
    }

    #[test]
    fn ids_are_one_through_n() {
        let catalog = Catalog::builtin();
        for (index, record) in catalog.species().iter().enumerate() {
            assert_eq!(record.id as usize, index + 1);
        }
        assert_eq!(catalog.get(27).map(|r| r.name.as_str()), Some("Snow Leopard"));
        assert!(catalog.get(31).is_none());
    }

    #[test]
    fn validate_rejects_empty_weighted_tier() {
        let species: Vec<SpeciesRecord> = Catalog::builtin()
            .species()
            .iter()
            .filter(|record| record.rarity != Rarity::Legendary)
            .cloned()
            .collect();
        let err = Catalog::new(species).validate().unwrap_err();
        assert!(matches!(err, DexError::Configuration(_)));
        assert!(err.to_string().contains("legendary"));
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let mut species = Catalog::builtin().species().to_vec();
        species[1].id = 1;
        let err = Catalog::new(species).validate().unwrap_err();
        assert!(err.to_string().contains("duplicate species id 1"));
    }

    #[test]
    fn validate_rejects_out_of_range_stats() {
        let mut species = Catalog::builtin().species().to_vec();
        species[0].stats.speed = 101;
        assert!(Catalog::new(species).validate().is_err());
    }

    #[test]
    fn every_category_is_represented() {
        let catalog = Catalog::builtin();
        for category in Category::ALL {
            assert!(
                !catalog.of_category(category).is_empty(),
                "no species for {category}"
            );
        }
    }
}
