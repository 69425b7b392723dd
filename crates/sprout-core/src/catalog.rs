//! # Shop Catalog & Skin Assets
//!
//! The immutable cosmetics catalog and the 4-stage skin asset table.
//!
//! Both are defined once at process start and never mutated at runtime.
//! Catalog ORDER is part of the weekly-discount contract (the rotation
//! indexes into the filtered sequence), so the catalog is an ordered
//! sequence, not a map.

use crate::stage::Stage;
use crate::types::{ItemKind, Rarity, ShopItem, VisualKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// CATALOG
// =============================================================================

/// An ordered, immutable sequence of shop items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    items: Vec<ShopItem>,
}

impl Catalog {
    /// Build a catalog from an ordered item sequence.
    #[must_use]
    pub fn from_items(items: Vec<ShopItem>) -> Self {
        Self { items }
    }

    /// Look up an item by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ShopItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Iterate items in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ShopItem> {
        self.items.iter()
    }

    /// Number of items in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The builtin catalog shipped with the engine.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_items(builtin_items())
    }
}

/// Shorthand constructor for builtin entries.
fn item(
    id: &str,
    name: &str,
    description: &str,
    price: u64,
    kind: ItemKind,
    category: Option<&str>,
    value: &str,
    icon: &str,
    rarity: Option<Rarity>,
) -> ShopItem {
    ShopItem {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price,
        kind,
        category: category.map(str::to_string),
        value: value.to_string(),
        icon: icon.to_string(),
        rarity,
    }
}

#[rustfmt::skip]
fn builtin_items() -> Vec<ShopItem> {
    use ItemKind::*;
    use Rarity::*;
    vec![
        // Themes
        item("theme_midnight", "Midnight", "Deep slate theme for night owls", 150, Theme, None, "midnight", "icons/theme_midnight.svg", None),
        item("theme_meadow", "Meadow", "Soft greens on warm paper", 200, Theme, None, "meadow", "icons/theme_meadow.svg", None),
        // Chart skins
        item("chart_neon", "Neon Charts", "Glowing lines for your spending charts", 120, ChartSkin, None, "neon", "icons/chart_neon.svg", None),
        item("chart_pastel", "Pastel Charts", "Easy-on-the-eyes pastel series", 100, ChartSkin, None, "pastel", "icons/chart_pastel.svg", None),
        // Titles
        item("title_saver", "Seedling Saver", "Shown under your profile name", 80, Title, None, "Seedling Saver", "icons/title_saver.svg", None),
        item("title_tycoon", "Budget Tycoon", "For those who never overspend", 250, Title, None, "Budget Tycoon", "icons/title_tycoon.svg", Some(Rare)),
        // Frames
        item("frame_leaf", "Leaf Frame", "A ring of leaves around your avatar", 90, Frame, None, "leaf", "icons/frame_leaf.svg", None),
        item("frame_gold", "Gold Frame", "Polished gold avatar ring", 300, Frame, None, "gold", "icons/frame_gold.svg", Some(Rare)),
        // Personas
        item("persona_sage", "Sage", "A calm mentor voice for the assistant", 400, Persona, None, "sage", "icons/persona_sage.svg", Some(Legendary)),
        // Banners
        item("banner_sunrise", "Sunrise", "Profile banner", 130, Banner, None, "sunrise", "icons/banner_sunrise.svg", None),
        // Savings skins — plants
        item("default", "Sprout", "The classic starter plant", 0, SavingsSkin, Some("plant"), "default", "icons/skin_default.svg", None),
        item("sunflower", "Sunflower", "Turns to face your deposits", 100, SavingsSkin, Some("plant"), "sunflower", "icons/skin_sunflower.svg", None),
        item("cactus", "Cactus", "Thrives even on a tight budget", 100, SavingsSkin, Some("plant"), "cactus", "icons/skin_cactus.svg", None),
        item("bonsai", "Bonsai", "Patience, miniaturized", 250, SavingsSkin, Some("plant"), "bonsai", "icons/skin_bonsai.svg", Some(Rare)),
        item("lotus", "Lotus", "Blooms above the waterline", 250, SavingsSkin, Some("plant"), "lotus", "icons/skin_lotus.svg", Some(Rare)),
        item("sakura", "Sakura", "Petals fall as the balance grows", 600, SavingsSkin, Some("plant"), "sakura", "icons/skin_sakura.svg", Some(Legendary)),
        // Savings skins — pets
        item("pet_default", "Hatchling", "The classic starter pet", 0, SavingsSkin, Some("pet"), "pet_default", "icons/skin_pet_default.svg", None),
        item("turtle", "Turtle", "Slow and steady wins the goal", 150, SavingsSkin, Some("pet"), "turtle", "icons/skin_turtle.svg", None),
        item("pet_hamster", "Hamster", "Hoards every coin you save", 150, SavingsSkin, Some("pet"), "pet_hamster", "icons/skin_hamster.svg", None),
        item("swan", "Swan", "Glides over your growing balance", 250, SavingsSkin, Some("pet"), "swan", "icons/skin_swan.svg", Some(Rare)),
        item("fox", "Fox", "Clever with every rupiah", 250, SavingsSkin, Some("pet"), "fox", "icons/skin_fox.svg", Some(Rare)),
        item("jellyfish", "Jellyfish", "Drifts upward with your savings", 600, SavingsSkin, Some("pet"), "jellyfish", "icons/skin_jellyfish.svg", Some(Legendary)),
        item("robot", "Robot", "Compounds interest, beeps politely", 600, SavingsSkin, Some("pet"), "robot", "icons/skin_robot.svg", Some(Legendary)),
        item("dragon", "Dragon", "Sits on the hoard it helped you build", 1200, SavingsSkin, Some("pet"), "dragon", "icons/skin_dragon.svg", Some(Mythical)),
    ]
}

// =============================================================================
// SKIN ASSETS
// =============================================================================

/// Mapping from skin id to its 4 ordered evolution-stage image references.
///
/// Missing keys fall back to the named default entry for the goal's
/// visual kind (`"default"` for plants, `"pet_default"` for pets).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkinAssets {
    stages: BTreeMap<String, [String; 4]>,
}

impl SkinAssets {
    /// Build the asset table shipped with the engine.
    #[must_use]
    pub fn builtin() -> Self {
        let skins = [
            "default",
            "sunflower",
            "cactus",
            "bonsai",
            "lotus",
            "sakura",
            "pet_default",
            "turtle",
            "pet_hamster",
            "swan",
            "fox",
            "jellyfish",
            "robot",
            "dragon",
        ];
        let mut stages = BTreeMap::new();
        for skin in skins {
            stages.insert(
                skin.to_string(),
                [1u8, 2, 3, 4].map(|n| format!("assets/skins/{skin}/stage{n}.png")),
            );
        }
        Self { stages }
    }

    /// Build from an explicit mapping (e.g. loaded by the app layer).
    #[must_use]
    pub fn from_map(stages: BTreeMap<String, [String; 4]>) -> Self {
        Self { stages }
    }

    /// The 4 stage refs for a skin, falling back to the visual's default.
    #[must_use]
    pub fn stage_refs(&self, skin_id: &str, visual: VisualKind) -> Option<&[String; 4]> {
        self.stages
            .get(skin_id)
            .or_else(|| self.stages.get(visual.default_skin_id()))
    }

    /// The image ref for one skin at one stage.
    #[must_use]
    pub fn stage_asset(&self, skin_id: &str, visual: VisualKind, stage: Stage) -> Option<&str> {
        self.stage_refs(skin_id, visual)
            .map(|refs| refs[stage.asset_index()].as_str())
    }
}

impl Default for SkinAssets {
    fn default() -> Self {
        Self::builtin()
    }
}

// =============================================================================
// TESTS
// =============================================================================
