//! Crop catalog
//!
//! An explicit catalog object replaces module level crop tables: it is built
//! once, passed by reference to the calculators and extended at runtime when
//! a custom crop is looked up.

use std::collections::{BTreeSet, HashMap, HashSet};

use rust_decimal::Decimal;

use crate::error::{PlanningError, PlanningResult};
use crate::models::{normalize_name, CropCategory, CropDefinition};

/// Built-in crop row. Yields are in grams per plant to keep decimals exact.
struct BuiltinCrop {
    id: &'static str,
    name: &'static str,
    icon: &'static str,
    category: CropCategory,
    kcal_per_kg: i64,
    yield_per_plant_g: i64,
    sow: &'static [u32],
    harvest: &'static [u32],
}

/// Crops shipped with the planner, tuned for a temperate northern climate
const BUILTIN_CROPS: &[BuiltinCrop] = &[
    BuiltinCrop {
        id: "potato",
        name: "Potato",
        icon: "🥔",
        category: CropCategory::Root,
        kcal_per_kg: 770,
        yield_per_plant_g: 1000,
        sow: &[4, 5],
        harvest: &[7, 8, 9],
    },
    BuiltinCrop {
        id: "tomato",
        name: "Tomato",
        icon: "🍅",
        category: CropCategory::Vegetable,
        kcal_per_kg: 180,
        yield_per_plant_g: 2500,
        sow: &[3, 4],
        harvest: &[8, 9],
    },
    BuiltinCrop {
        id: "carrot",
        name: "Carrot",
        icon: "🥕",
        category: CropCategory::Root,
        kcal_per_kg: 410,
        yield_per_plant_g: 80,
        sow: &[4, 5, 6],
        harvest: &[7, 8, 9, 10],
    },
    BuiltinCrop {
        id: "onion",
        name: "Onion",
        icon: "🧅",
        category: CropCategory::Vegetable,
        kcal_per_kg: 400,
        yield_per_plant_g: 150,
        sow: &[4, 5],
        harvest: &[8, 9],
    },
    BuiltinCrop {
        id: "cabbage",
        name: "Cabbage",
        icon: "🥬",
        category: CropCategory::Vegetable,
        kcal_per_kg: 250,
        yield_per_plant_g: 1500,
        sow: &[3, 4, 5],
        harvest: &[8, 9, 10],
    },
    BuiltinCrop {
        id: "kale",
        name: "Kale",
        icon: "🥬",
        category: CropCategory::Vegetable,
        kcal_per_kg: 490,
        yield_per_plant_g: 1000,
        sow: &[3, 4, 5],
        harvest: &[7, 8, 9, 10, 11],
    },
    BuiltinCrop {
        id: "bush_beans",
        name: "Bush beans",
        icon: "🫘",
        category: CropCategory::Legume,
        kcal_per_kg: 310,
        yield_per_plant_g: 250,
        sow: &[5, 6],
        harvest: &[7, 8, 9],
    },
    BuiltinCrop {
        id: "peas",
        name: "Peas",
        icon: "🫛",
        category: CropCategory::Legume,
        kcal_per_kg: 810,
        yield_per_plant_g: 150,
        sow: &[4, 5],
        harvest: &[7, 8],
    },
    BuiltinCrop {
        id: "zucchini",
        name: "Zucchini",
        icon: "🥒",
        category: CropCategory::Vegetable,
        kcal_per_kg: 170,
        yield_per_plant_g: 4000,
        sow: &[4, 5],
        harvest: &[7, 8, 9],
    },
    BuiltinCrop {
        id: "pumpkin",
        name: "Pumpkin",
        icon: "🎃",
        category: CropCategory::Vegetable,
        kcal_per_kg: 260,
        yield_per_plant_g: 6000,
        sow: &[4, 5],
        harvest: &[9, 10],
    },
    BuiltinCrop {
        id: "lettuce",
        name: "Lettuce",
        icon: "🥗",
        category: CropCategory::Vegetable,
        kcal_per_kg: 150,
        yield_per_plant_g: 300,
        sow: &[3, 4, 5, 6, 7],
        harvest: &[5, 6, 7, 8, 9],
    },
    BuiltinCrop {
        id: "beetroot",
        name: "Beetroot",
        icon: "🫜",
        category: CropCategory::Root,
        kcal_per_kg: 430,
        yield_per_plant_g: 200,
        sow: &[5, 6],
        harvest: &[8, 9, 10],
    },
    BuiltinCrop {
        id: "garlic",
        name: "Garlic",
        icon: "🧄",
        category: CropCategory::Vegetable,
        kcal_per_kg: 1490,
        yield_per_plant_g: 50,
        sow: &[9, 10],
        harvest: &[7, 8],
    },
    BuiltinCrop {
        id: "strawberry",
        name: "Strawberry",
        icon: "🍓",
        category: CropCategory::Berry,
        kcal_per_kg: 320,
        yield_per_plant_g: 300,
        sow: &[5, 8],
        harvest: &[6, 7],
    },
    BuiltinCrop {
        id: "dill",
        name: "Dill",
        icon: "🌿",
        category: CropCategory::Herb,
        kcal_per_kg: 430,
        yield_per_plant_g: 50,
        sow: &[5, 6],
        harvest: &[7, 8],
    },
    BuiltinCrop {
        id: "sweet_corn",
        name: "Sweet corn",
        icon: "🌽",
        category: CropCategory::Grain,
        kcal_per_kg: 860,
        yield_per_plant_g: 300,
        sow: &[5],
        harvest: &[8, 9],
    },
];

impl BuiltinCrop {
    fn to_definition(&self) -> CropDefinition {
        CropDefinition {
            id: self.id.to_string(),
            display_name: self.name.to_string(),
            icon: self.icon.to_string(),
            category: self.category,
            kcal_per_kg: Decimal::from(self.kcal_per_kg),
            yield_per_plant_kg: Decimal::new(self.yield_per_plant_g, 3),
            sow_months: self.sow.iter().copied().collect::<BTreeSet<u32>>(),
            harvest_months: self.harvest.iter().copied().collect::<BTreeSet<u32>>(),
            custom: false,
        }
    }
}

/// Lookup table from crop id to its agronomic constants
#[derive(Debug, Clone, Default)]
pub struct CropCatalog {
    crops: Vec<CropDefinition>,
    index: HashMap<String, usize>,
    /// Normalized ids that collided with an existing name, mapped to the
    /// canonical id they resolved to
    aliases: HashMap<String, String>,
}

impl CropCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding the built-in crop table
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for row in BUILTIN_CROPS {
            let definition = row.to_definition();
            catalog.index.insert(definition.id.clone(), catalog.crops.len());
            catalog.crops.push(definition);
        }
        catalog
    }

    /// Built-in table extended with previously registered custom crops
    pub fn with_custom(
        custom: impl IntoIterator<Item = CropDefinition>,
    ) -> PlanningResult<Self> {
        let mut catalog = Self::builtin();
        for mut definition in custom {
            definition.custom = true;
            catalog.register(definition)?;
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.crops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }

    pub fn contains(&self, crop_id: &str) -> bool {
        self.resolve(crop_id).is_some()
    }

    /// All entries in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &CropDefinition> {
        self.crops.iter()
    }

    /// Entries registered at runtime
    pub fn custom_crops(&self) -> impl Iterator<Item = &CropDefinition> {
        self.crops.iter().filter(|crop| crop.custom)
    }

    /// Resolve a crop id. Exact ids win, then collision aliases, then a
    /// case-insensitive match on id or display name.
    pub fn get(&self, crop_id: &str) -> PlanningResult<&CropDefinition> {
        self.resolve(crop_id)
            .map(|position| &self.crops[position])
            .ok_or_else(|| PlanningError::UnknownCrop(crop_id.to_string()))
    }

    /// Find an entry whose display name matches under trim and case folding
    pub fn find_by_name(&self, name: &str) -> Option<&CropDefinition> {
        let key = normalize_name(name);
        self.crops.iter().find(|crop| crop.name_key() == key)
    }

    /// Insert or overwrite a definition and return the canonical id.
    ///
    /// A definition whose name collides with an existing entry is not
    /// inserted: the existing entry wins and the incoming id becomes an
    /// alias for it.
    pub fn register(&mut self, definition: CropDefinition) -> PlanningResult<String> {
        definition.validate()?;

        if let Some(existing) = self.find_by_name(&definition.display_name) {
            let canonical = existing.id.clone();
            if definition.id != canonical && !self.index.contains_key(&definition.id) {
                self.aliases
                    .insert(normalize_name(&definition.id), canonical.clone());
            }
            return Ok(canonical);
        }

        let id = definition.id.clone();
        match self.index.get(&id) {
            Some(&position) => self.crops[position] = definition,
            None => {
                self.index.insert(id.clone(), self.crops.len());
                self.crops.push(definition);
            }
        }
        Ok(id)
    }

    /// Entries whose id is not in `excluding`, in catalog order
    pub fn list_available(&self, excluding: &HashSet<String>) -> Vec<&CropDefinition> {
        self.crops
            .iter()
            .filter(|crop| !excluding.contains(&crop.id))
            .collect()
    }

    fn resolve(&self, crop_id: &str) -> Option<usize> {
        if let Some(&position) = self.index.get(crop_id) {
            return Some(position);
        }

        let key = normalize_name(crop_id);
        if let Some(canonical) = self.aliases.get(&key) {
            return self.index.get(canonical).copied();
        }

        self.crops
            .iter()
            .position(|crop| normalize_name(&crop.id) == key)
            .or_else(|| self.crops.iter().position(|crop| crop.name_key() == key))
    }
}
