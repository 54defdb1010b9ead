//! Cosmetics shop
//!
//! Button skins restyle the target; arena themes restyle the play surface.
//! Built-in items are always owned and can never be bought.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which equip slot an item goes into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    ButtonSkin,
    ArenaTheme,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::ButtonSkin => "button_skin",
            ItemKind::ArenaTheme => "arena_theme",
        }
    }
}

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShopItem {
    pub id: &'static str,
    pub kind: ItemKind,
    pub name: &'static str,
    pub cost: u64,
    pub built_in: bool,
    /// Style hook for the presentation layer
    pub effect_class: &'static str,
    /// Empty when the item has no artwork
    pub image_src: &'static str,
    /// Artwork scale (percent) on the target
    pub game_image_scale: u32,
    /// Artwork scale (percent) on the shop card
    pub shop_image_scale: u32,
    pub description: &'static str,
}

/// A titled group of items
#[derive(Debug, Clone, Serialize)]
pub struct ShopCategory {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub items: &'static [ShopItem],
}

const fn skin(
    id: &'static str,
    name: &'static str,
    cost: u64,
    image_src: &'static str,
    game_image_scale: u32,
    shop_image_scale: u32,
    description: &'static str,
) -> ShopItem {
    ShopItem {
        id,
        kind: ItemKind::ButtonSkin,
        name,
        cost,
        built_in: false,
        effect_class: "",
        image_src,
        game_image_scale,
        shop_image_scale,
        description,
    }
}

const fn theme(
    id: &'static str,
    name: &'static str,
    cost: u64,
    effect_class: &'static str,
    description: &'static str,
) -> ShopItem {
    ShopItem {
        id,
        kind: ItemKind::ArenaTheme,
        name,
        cost,
        built_in: false,
        effect_class,
        image_src: "",
        game_image_scale: 100,
        shop_image_scale: 100,
        description,
    }
}

const fn built_in(mut item: ShopItem) -> ShopItem {
    item.built_in = true;
    item
}

/// Skin equipped when nothing (valid) is stored
pub const DEFAULT_BUTTON_SKIN_ID: &str = "skin_button";
/// Theme equipped when nothing (valid) is stored
pub const DEFAULT_ARENA_THEME_ID: &str = "theme_default";

static BUTTON_SKINS: [ShopItem; 10] = [
    built_in(skin(
        "skin_button",
        "Classic",
        0,
        "/button.png",
        120,
        105,
        "Clean button finish.",
    )),
    skin(
        "skin_neon",
        "Neon Pulse",
        25,
        "/neoncircle.avif",
        115,
        100,
        "Electric ring core that pops against dark arenas.",
    ),
    skin(
        "skin_fireball",
        "Fireball",
        30,
        "/fireball.png",
        160,
        130,
        "Molten flame orb with high-contrast impact energy.",
    ),
    skin("skin_cd", "CD", 30, "/cd.png", 100, 90, "A shiny compact disc."),
    skin("skin_earth", "Earth", 30, "/earth.png", 110, 100, "The whole planet, clickable."),
    skin("skin_melon", "Melon", 30, "/melon.png", 105, 90, "A juicy slice of melon."),
    skin("skin_moon", "Moon", 30, "/moon.png", 105, 95, "A cratered full moon."),
    skin("skin_wheel", "Wheel", 30, "/wheel.png", 115, 105, "A spinning wheel."),
    skin(
        "skin_xboxbutton",
        "Xbox",
        30,
        "/xboxbutton.png",
        105,
        95,
        "A familiar controller face button.",
    ),
    skin(
        "skin_coin",
        "Gold Token",
        999,
        "/coin.png",
        140,
        130,
        "Classic arcade token style with metallic shine.",
    ),
];

static ARENA_THEMES: [ShopItem; 4] = [
    built_in(theme(
        "theme_default",
        "Classic Arena",
        0,
        "theme-default",
        "Balanced training arena with subtle focus lighting.",
    )),
    theme(
        "theme_sunset",
        "Sunset Grid",
        40,
        "theme-sunset",
        "Warm dusk sky over a glowing retro horizon grid.",
    ),
    theme(
        "theme_forest",
        "Forest Glow",
        45,
        "theme-forest",
        "Misty woodland tones with bioluminescent highlights.",
    ),
    theme(
        "theme_arcade",
        "Arcade Night",
        999,
        "theme-arcade",
        "Synthwave-inspired night lane with neon lane lines.",
    ),
];

static CATEGORIES: [ShopCategory; 2] = [
    ShopCategory {
        id: "button_skins",
        title: "Button Skins",
        description: "Cosmetic styles for the main click target.",
        items: &BUTTON_SKINS,
    },
    ShopCategory {
        id: "arena_themes",
        title: "Arena Themes",
        description: "Background/theme swaps for the game arena.",
        items: &ARENA_THEMES,
    },
];

/// Catalog grouped for display
pub fn categories() -> &'static [ShopCategory] {
    &CATEGORIES
}

/// Every item, skins first
pub fn items() -> impl Iterator<Item = &'static ShopItem> {
    CATEGORIES.iter().flat_map(|c| c.items.iter())
}

pub fn find_item(id: &str) -> Option<&'static ShopItem> {
    items().find(|item| item.id == id)
}

/// Why a purchase or equip was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShopError {
    UnknownItem(String),
    /// Built-in items are free and always owned
    BuiltIn,
    AlreadyOwned,
    NotEnoughCoins { cost: u64, coins: u64 },
    NotOwned,
}

impl fmt::Display for ShopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownItem(id) => write!(f, "no shop item '{}'", id),
            Self::BuiltIn => write!(f, "built-in items cannot be purchased"),
            Self::AlreadyOwned => write!(f, "item is already owned"),
            Self::NotEnoughCoins { cost, coins } => {
                write!(f, "item costs {} coins, you have {}", cost, coins)
            }
            Self::NotOwned => write!(f, "item is not owned"),
        }
    }
}

impl std::error::Error for ShopError {}

impl ShopItem {
    pub fn is_owned(&self, owned_ids: &[String]) -> bool {
        self.built_in || owned_ids.iter().any(|id| id == self.id)
    }

    /// Check every purchase rule without changing anything
    pub fn check_purchase(&self, coins: u64, owned_ids: &[String]) -> Result<(), ShopError> {
        if self.built_in {
            return Err(ShopError::BuiltIn);
        }
        if owned_ids.iter().any(|id| id == self.id) {
            return Err(ShopError::AlreadyOwned);
        }
        if coins < self.cost {
            return Err(ShopError::NotEnoughCoins {
                cost: self.cost,
                coins,
            });
        }
        Ok(())
    }

    pub fn can_purchase(&self, coins: u64, owned_ids: &[String]) -> bool {
        self.check_purchase(coins, owned_ids).is_ok()
    }

    /// Price tag text
    pub fn cost_label(&self) -> String {
        if self.cost == 0 {
            "Free".to_string()
        } else {
            format!("{} coins", self.cost)
        }
    }
}

/// Card state for one item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemStatus {
    pub is_owned: bool,
    pub can_afford: bool,
    pub is_equipped: bool,
}

impl ItemStatus {
    pub fn for_item(
        item: &ShopItem,
        coins: u64,
        owned_ids: &[String],
        equipped_button_skin: &str,
        equipped_arena_theme: &str,
    ) -> Self {
        let equipped_id = match item.kind {
            ItemKind::ButtonSkin => equipped_button_skin,
            ItemKind::ArenaTheme => equipped_arena_theme,
        };
        Self {
            is_owned: item.is_owned(owned_ids),
            can_afford: coins >= item.cost,
            is_equipped: item.id == equipped_id,
        }
    }

    /// Card button text
    pub fn action_label(&self) -> &'static str {
        match (self.is_owned, self.is_equipped) {
            (true, true) => "Equipped",
            (true, false) => "Equip",
            (false, _) => "Buy",
        }
    }

    /// Whether the card button is disabled
    pub fn action_disabled(&self) -> bool {
        if self.is_owned {
            self.is_equipped
        } else {
            !self.can_afford
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_catalog_ids_unique_and_defaults_built_in() {
        let mut ids: Vec<&str> = items().map(|i| i.id).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
        assert_eq!(total, 14);

        let skin = find_item(DEFAULT_BUTTON_SKIN_ID).unwrap();
        assert!(skin.built_in && skin.kind == ItemKind::ButtonSkin);
        let theme = find_item(DEFAULT_ARENA_THEME_ID).unwrap();
        assert!(theme.built_in && theme.kind == ItemKind::ArenaTheme);
    }

    #[test]
    fn test_purchase_rules() {
        let neon = find_item("skin_neon").unwrap();
        assert_eq!(neon.check_purchase(25, &[]), Ok(()));
        assert_eq!(
            neon.check_purchase(24, &[]),
            Err(ShopError::NotEnoughCoins { cost: 25, coins: 24 })
        );
        assert_eq!(
            neon.check_purchase(100, &owned(&["skin_neon"])),
            Err(ShopError::AlreadyOwned)
        );

        let classic = find_item("skin_button").unwrap();
        assert_eq!(classic.check_purchase(1000, &[]), Err(ShopError::BuiltIn));
    }

    #[test]
    fn test_item_status_and_labels() {
        let forest = find_item("theme_forest").unwrap();
        let status = ItemStatus::for_item(forest, 10, &[], "skin_button", "theme_default");
        assert_eq!(status.action_label(), "Buy");
        assert!(status.action_disabled());

        let status = ItemStatus::for_item(
            forest,
            10,
            &owned(&["theme_forest"]),
            "skin_button",
            "theme_forest",
        );
        assert!(status.is_owned && status.is_equipped);
        assert_eq!(status.action_label(), "Equipped");

        let classic = find_item("theme_default").unwrap();
        let status = ItemStatus::for_item(classic, 0, &[], "skin_button", "theme_forest");
        assert_eq!(status.action_label(), "Equip");
        assert!(!status.action_disabled());
    }

    #[test]
    fn test_skin_id_never_matches_theme_slot() {
        let neon = find_item("skin_neon").unwrap();
        let status = ItemStatus::for_item(neon, 0, &[], "skin_button", "skin_neon");
        assert!(!status.is_equipped);
    }

    #[test]
    fn test_cost_label() {
        assert_eq!(find_item("skin_button").unwrap().cost_label(), "Free");
        assert_eq!(find_item("skin_coin").unwrap().cost_label(), "999 coins");
    }
}
