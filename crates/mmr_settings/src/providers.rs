//! External tables the setting catalog is built from.
//!
//! Locations, logic tricks, cosmetic palettes and sound effects belong to
//! other parts of the randomizer. The catalog only sees them through the
//! [`Providers`] trait; [`ProviderTables`] is a plain-data implementation
//! that can be loaded from JSON.

use crate::choice::ChoiceSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// In-game hooks whose sound effect can be replaced.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundHook {
    HpLow,
    TatlOverworld,
    TatlEnemy,
    MenuCursor,
    MenuSelect,
    HorseNeigh,
    Nightfall,
    HoverBoots,
}

impl SoundHook {
    pub const ALL: [SoundHook; 8] = [
        SoundHook::HpLow,
        SoundHook::TatlOverworld,
        SoundHook::TatlEnemy,
        SoundHook::MenuCursor,
        SoundHook::MenuSelect,
        SoundHook::HorseNeigh,
        SoundHook::Nightfall,
        SoundHook::HoverBoots,
    ];

    /// Key used in provider tables.
    pub fn key(self) -> &'static str {
        match self {
            SoundHook::HpLow => "hp_low",
            SoundHook::TatlOverworld => "tatl_overworld",
            SoundHook::TatlEnemy => "tatl_enemy",
            SoundHook::MenuCursor => "menu_cursor",
            SoundHook::MenuSelect => "menu_select",
            SoundHook::HorseNeigh => "horse_neigh",
            SoundHook::Nightfall => "nightfall",
            SoundHook::HoverBoots => "hover_boots",
        }
    }
}

/// A logic trick the player may allow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicTrick {
    /// Text shown in the editor.
    pub gui_text: String,
    /// Flag name used by the logic files.
    pub name: String,
    pub tooltip: String,
}

impl LogicTrick {
    /// Editor tooltip: the trick text, a blank line, then the description,
    /// every line trimmed.
    pub fn tooltip_text(&self) -> String {
        let text = format!("{}\n\n{}", self.gui_text, self.tooltip);
        text.lines()
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }
}

/// Source of the external tables used to build the catalog.
pub trait Providers {
    /// Location names, in table order.
    fn locations(&self) -> &[String];
    fn logic_tricks(&self) -> &[LogicTrick];
    fn tunic_colors(&self) -> &[String];
    fn tatl_colors(&self) -> &[String];
    fn sword_colors(&self) -> &[String];
    /// Choices for a sound hook; must contain the `default` key.
    fn sound_choices(&self, hook: SoundHook) -> ChoiceSet;
}

/// One sound-effect option of a hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundChoice {
    pub key: String,
    pub label: String,
}

/// Plain-data provider tables.
///
/// Missing sections fall back to the built-in defaults, which only carry
/// the entries the catalog's own defaults refer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderTables {
    pub locations: Vec<String>,
    pub logic_tricks: Vec<LogicTrick>,
    pub tunic_colors: Vec<String>,
    pub tatl_colors: Vec<String>,
    pub sword_colors: Vec<String>,
    /// Extra sound options per hook key, appended after the generic ones.
    pub sounds: BTreeMap<String, Vec<SoundChoice>>,
}

impl ProviderTables {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

impl Default for ProviderTables {
    fn default() -> Self {
        Self {
            locations: Vec::new(),
            logic_tricks: vec![LogicTrick {
                gui_text: "CT Tingle Balloon with Sword".to_string(),
                name: "logic_tingle_balloon_jumpslash".to_string(),
                tooltip: "Allow Tingle's balloon to be popped from\n\
                          jump-slashing from the tree in North Clock Town."
                    .to_string(),
            }],
            tunic_colors: strings(&[
                "Random Choice",
                "Completely Random",
                "Kokiri Green",
                "Goron Red",
                "Zora Blue",
                "Custom Color",
            ]),
            tatl_colors: strings(&[
                "Random Choice",
                "Completely Random",
                "White",
                "Yellow",
                "Light Blue",
                "Green",
                "Custom Color",
            ]),
            sword_colors: strings(&[
                "Random Choice",
                "Completely Random",
                "Rainbow",
                "White",
                "Red",
                "Green",
                "Blue",
                "Custom Color",
            ]),
            sounds: BTreeMap::new(),
        }
    }
}

impl Providers for ProviderTables {
    fn locations(&self) -> &[String] {
        &self.locations
    }

    fn logic_tricks(&self) -> &[LogicTrick] {
        &self.logic_tricks
    }

    fn tunic_colors(&self) -> &[String] {
        &self.tunic_colors
    }

    fn tatl_colors(&self) -> &[String] {
        &self.tatl_colors
    }

    fn sword_colors(&self) -> &[String] {
        &self.sword_colors
    }

    fn sound_choices(&self, hook: SoundHook) -> ChoiceSet {
        let mut choices = ChoiceSet::new()
            .with("default", "Default")
            .with("completely-random", "Completely Random")
            .with("random-ear-safe", "Random Ear-Safe")
            .with("random-choice", "Random Choice")
            .with("none", "None");
        for sound in self.sounds.get(hook.key()).into_iter().flatten() {
            choices = choices.with(sound.key.as_str(), sound.label.as_str());
        }
        choices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::SettingValue;

    #[test]
    fn test_trick_tooltip_lines_are_trimmed() {
        let trick = LogicTrick {
            gui_text: "Some Trick".into(),
            name: "logic_some_trick".into(),
            tooltip: "   First line\n      second line   \n".into(),
        };
        assert_eq!(trick.tooltip_text(), "Some Trick\n\nFirst line\nsecond line");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tables = ProviderTables::from_json(
            r#"{
                "locations": ["Clock Tower", "Romani Ranch"],
                "sounds": {"hp_low": [{"key": "cucco", "label": "Cucco"}]}
            }"#,
        )
        .unwrap();
        assert_eq!(tables.locations().len(), 2);
        assert!(tables.tatl_colors().iter().any(|color| color == "White"));

        let low_hp = tables.sound_choices(SoundHook::HpLow);
        assert_eq!(low_hp.key_at(0), Some(&SettingValue::from("default")));
        assert!(low_hp.contains(&"cucco".into()));
        assert!(!tables.sound_choices(SoundHook::Nightfall).contains(&"cucco".into()));
    }

    #[test]
    fn test_hook_keys_match_serde_names() {
        for hook in SoundHook::ALL {
            let json = serde_json::to_string(&hook).unwrap();
            assert_eq!(json, format!("\"{}\"", hook.key()));
        }
    }
}
