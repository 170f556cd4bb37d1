//! The randomizer's setting table.
//!
//! Declaration order here is the registry order, and therefore the bit
//! layout of settings strings. Appending is fine; anything else needs a
//! `SCHEMA_VERSION` bump.

use crate::assignment::Assignment;
use crate::choice::ChoiceSet;
use crate::descriptor::{
    bounded, checkbutton, color, combobox, flag, integer, item_list, scale, text,
    SettingDescriptor,
};
use crate::providers::{Providers, SoundHook};
use crate::registration_error::RegistrationError;
use crate::registry::Registry;
use crate::value::SettingValue;

/// Build the registry from the built-in declarations and the given tables.
pub fn build_registry(providers: &dyn Providers) -> Result<Registry, RegistrationError> {
    let mut builder = Registry::builder();
    builder.register_all(rom_settings())?;
    builder.register_all(world_settings(providers))?;
    builder.register_all(cosmetic_settings(providers))?;
    Ok(builder.build())
}

/// No rom is written for patch-only or spoiler-only output.
fn rom_output_disabled(settings: &Assignment) -> bool {
    matches!(settings.get_str("compress_rom"), Some("None") | Some("Patch"))
}

fn rom_settings() -> Vec<SettingDescriptor> {
    vec![
        flag("check_version", "Checks if you are on the latest version."),
        text(
            "checked_version",
            "",
            "Suppress version warnings if checked_version is less than the current version.",
        ),
        text("rom", "", "Path to an MM 1.0 rom to use as a base."),
        text("output_dir", "", "Path to output directory for rom generation."),
        text("output_file", "", "File name base to use for all generated files."),
        text("seed", "", "Define seed number to generate."),
        text("patch_file", "", "Path to a patch file."),
        flag("cosmetics_only", "Patched file will only have cosmetics applied."),
        integer(
            "count",
            1,
            "Batch generate multiple seeds with the same settings. A given --seed \
             seeds the first one and derives the rest.",
        ),
        bounded(
            "world_count",
            1,
            31,
            1,
            "Number of players in a multiworld seed. Generation time grows quickly.",
        )
        .shared()
        .packed(5),
        integer(
            "player_num",
            1,
            "World to generate when there are multiple worlds.",
        )
        .depends_on(|settings| rom_output_disabled(settings).then_some(SettingValue::Int(1))),
        checkbutton("create_spoiler", "Output a spoiler file.", "Create Spoiler Log")
            .gui_group("rom_tab")
            .tooltip("Enabling this will change the seed.")
            .default_value(true)
            .shared(),
        checkbutton(
            "create_cosmetics_log",
            "Output a cosmetics log.",
            "Create Cosmetics Log",
        )
        .gui_group("rom_tab")
        .default_value(true)
        .depends_on(|settings| rom_output_disabled(settings).then_some(SettingValue::Bool(false))),
        combobox(
            "compress_rom",
            ChoiceSet::new()
                .with("True", "Compressed [Stable]")
                .with("False", "Uncompressed [Crashes]")
                .with("Patch", "Patch File")
                .with("None", "No Output"),
            "True",
            "Output type. True compresses the rom, False leaves it uncompressed, \
             Patch writes a patch file and None only writes the spoiler log.",
        )
        .radio(true)
        .gui_text("Output Type")
        .gui_group("rom_tab")
        .tooltip(
            "Compressed output is strongly recommended; uncompressed roms crash \
             frequently outside real hardware.\n\
             Patch files carry the patched data without the rom itself.",
        ),
    ]
}

fn world_settings(providers: &dyn Providers) -> Vec<SettingDescriptor> {
    let locations = ChoiceSet::from_keys(providers.locations().iter().cloned());
    let tricks = providers
        .logic_tricks()
        .iter()
        .fold(ChoiceSet::new(), |set, trick| {
            set.with(trick.name.as_str(), trick.gui_text.as_str())
        });

    vec![
        checkbutton(
            "start_second_cycle",
            "Start on the second cycle, in human form with the Ocarina of Time.",
            "Start Second Cycle",
        )
        .gui_group("skip")
        .tooltip(
            "When off, the Ocarina of Time has to be found before the third night. \
             It is guaranteed to be in or around Clock Town.",
        )
        .default_value(true)
        .shared(),
        combobox(
            "moon",
            ChoiceSet::new()
                .with("normal", "Default Behavior")
                .with("fast", "Only need Oath to Order")
                .with("open", "Moon always accessible"),
            "normal",
            "Requirements to reach the Moon: normal needs the four Remains, the \
             Ocarina and the Oath to Order; fast needs only the Ocarina and the Oath; \
             open goes straight to the Moon on the third night.",
        )
        .gui_text("Moon access")
        .gui_group("skip")
        .shared(),
        combobox(
            "logic_rules",
            ChoiceSet::new()
                .with("trickless", "Trickless")
                .with("glitchless", "Glitchless")
                .with("none", "No Logic"),
            "glitchless",
            "Rules the logic uses to determine accessibility.",
        )
        .gui_text("Logic Rules")
        .gui_group("world")
        .shared(),
        checkbutton(
            "all_reachable",
            "When disabled, only check that the game is beatable.",
            "All Locations Reachable",
        )
        .gui_group("world")
        .default_value(true)
        .shared(),
        checkbutton(
            "one_item_per_dungeon",
            "Each dungeon has exactly one major item, not counting dungeon items.",
            "Dungeons Have One Major Item",
        )
        .gui_group("world")
        .shared(),
        checkbutton(
            "trials_random",
            "Random number of trials to clear before fighting Majora.",
            "Random Number of Remains Trials",
        )
        .gui_group("skip")
        .shared(),
        scale(
            "trials",
            0,
            4,
            1,
            4,
            "Number of randomly selected trials to clear before fighting Majora.",
        )
        .gui_group("skip")
        .tooltip("If hints are enabled, they point at the required trials.")
        .depends_on(|settings| {
            (settings.get_bool("trials_random") == Some(true)).then_some(SettingValue::Int(0))
        })
        .shared(),
        checkbutton(
            "no_epona_race",
            "Epona's Song summons Epona without passing Romani's test.",
            "Skip Epona Test",
        )
        .gui_group("convenience")
        .shared(),
        checkbutton(
            "fast_chests",
            "Every chest opens with the short animation.",
            "Fast Chest Cutscenes",
        )
        .gui_group("convenience")
        .default_value(true)
        .shared(),
        checkbutton(
            "free_scarecrow",
            "Pulling out the ocarina near a scarecrow spot spawns Pierre.",
            "Free Scarecrow's Song",
        )
        .gui_group("convenience")
        .shared(),
        checkbutton(
            "start_with_fast_travel",
            "Start with the Song of Soaring and owl statues unlocked.",
            "Start with Fast Travel",
        )
        .gui_group("convenience")
        .shared(),
        checkbutton(
            "start_with_rupees",
            "Start with a full wallet.",
            "Start with Max Rupees",
        )
        .gui_group("convenience")
        .shared(),
        checkbutton(
            "shuffle_song_items",
            "Songs are shuffled with all items instead of among themselves.",
            "Shuffle Songs with Items",
        )
        .gui_group("shuffle")
        .default_value(true)
        .shared(),
        combobox(
            "shopsanity",
            ChoiceSet::new()
                .with("off", "Off")
                .with("0", "Shuffled Shops (0 Items)")
                .with("1", "Shuffled Shops (1 Items)")
                .with("2", "Shuffled Shops (2 Items)")
                .with("3", "Shuffled Shops (3 Items)")
                .with("4", "Shuffled Shops (4 Items)")
                .with("random", "Shuffled Shops (Random)"),
            "off",
            "Shop contents are randomized and N non-shop items are added to every shop.",
        )
        .gui_text("Shopsanity")
        .gui_group("shuffle")
        .shared(),
        combobox(
            "shuffle_mapcompass",
            ChoiceSet::new()
                .with("remove", "Maps/Compasses: Remove")
                .with("startwith", "Maps/Compasses: Start With")
                .with("dungeon", "Maps/Compasses: Dungeon Only")
                .with("keysanity", "Maps/Compasses: Anywhere"),
            "dungeon",
            "Map and compass placement rules.",
        )
        .gui_text("Shuffle Dungeon Items")
        .gui_group("shuffle")
        .shared(),
        combobox(
            "shuffle_smallkeys",
            ChoiceSet::new()
                .with("remove", "Small Keys: Remove (Keysy)")
                .with("dungeon", "Small Keys: Dungeon Only")
                .with("keysanity", "Small Keys: Anywhere (Keysanity)"),
            "dungeon",
            "Small key placement rules.",
        )
        .gui_group("shuffle")
        .shared(),
        combobox(
            "shuffle_bosskeys",
            ChoiceSet::new()
                .with("remove", "Boss Keys: Remove (Keysy)")
                .with("dungeon", "Boss Keys: Dungeon Only")
                .with("keysanity", "Boss Keys: Anywhere (Keysanity)"),
            "dungeon",
            "Boss key placement rules.",
        )
        .gui_group("shuffle")
        .shared(),
        item_list(
            "disabled_locations",
            locations,
            "Locations that will never be required to beat the game.",
        )
        .gui_text("Exclude Locations")
        .gui_group("logic_tab")
        .tooltip(
            "Major items can still appear at excluded locations, but they will \
             never be required to beat the game.",
        )
        .shared(),
        item_list(
            "allowed_tricks",
            tricks,
            "Logic tricks the logic may expect to beat the game.",
        )
        .gui_text("Enable Tricks")
        .gui_group("logic_tab")
        .shared(),
        combobox(
            "logic_lens",
            ChoiceSet::new()
                .with("all", "Required Everywhere")
                .with("darunia", "Darunia's Ghost"),
            "all",
            "Where the logic expects the Lens of Truth.",
        )
        .gui_group("tricks")
        .shared(),
        checkbutton(
            "ocarina_songs",
            "Randomize the notes of every ocarina song.",
            "Randomize Ocarina Song Notes",
        )
        .gui_group("other")
        .shared(),
        checkbutton(
            "correct_chest_sizes",
            "Chest size reflects whether the contents are a major item.",
            "Chest Size Matches Contents",
        )
        .gui_group("other")
        .shared(),
        checkbutton(
            "clearer_hints",
            "Hints name items and locations plainly.",
            "Clearer Hints",
        )
        .gui_group("other")
        .shared(),
        combobox(
            "hints",
            ChoiceSet::new()
                .with("none", "No Hints")
                .with("mask", "Hints; Need Mask of Truth")
                .with("always", "Hints; Need Nothing"),
            "mask",
            "Gossip stone hint requirements.",
        )
        .gui_text("Gossip Stones")
        .gui_group("other")
        .shared(),
        combobox(
            "hint_dist",
            ChoiceSet::new()
                .with("useless", "Useless")
                .with("balanced", "Balanced")
                .with("strong", "Strong")
                .with("very_strong", "Very Strong")
                .with("tournament", "Tournament"),
            "balanced",
            "Hint distribution.",
        )
        .gui_text("Hint Distribution")
        .gui_group("other")
        .shared(),
        combobox(
            "text_shuffle",
            ChoiceSet::new()
                .with("none", "No Text Shuffled")
                .with("except_hints", "Shuffled except Hints and Keys")
                .with("complete", "All Text Shuffled"),
            "none",
            "Shuffle in-game text.",
        )
        .gui_text("Text Shuffle")
        .gui_group("other")
        .shared(),
        combobox(
            "item_pool_value",
            ChoiceSet::new()
                .with("plentiful", "Plentiful")
                .with("balanced", "Balanced")
                .with("scarce", "Scarce")
                .with("minimal", "Minimal"),
            "balanced",
            "Adds or removes upgrades from the item pool.",
        )
        .gui_text("Item Pool")
        .gui_group("other")
        .shared(),
        combobox(
            "damage_multiplier",
            ChoiceSet::new()
                .with("half", "Half")
                .with("normal", "Normal")
                .with("double", "Double")
                .with("quadruple", "Quadruple")
                .with("ohko", "One Hit KO"),
            "normal",
            "Multiplier applied to damage taken.",
        )
        .gui_text("Damage Multiplier")
        .gui_group("other")
        .shared(),
    ]
}

fn sfx(
    name: &str,
    hook: SoundHook,
    gui_text: &str,
    group: &str,
    providers: &dyn Providers,
) -> SettingDescriptor {
    combobox(
        name,
        providers.sound_choices(hook),
        "default",
        format!("Sound effect used for the {gui_text} hook."),
    )
    .gui_text(gui_text)
    .gui_group(group)
}

fn cosmetic_settings(providers: &dyn Providers) -> Vec<SettingDescriptor> {
    let tunic = |name: &str, gui_text: &str| {
        color(
            name,
            providers.tunic_colors().iter().cloned(),
            "Kokiri Green",
            format!("Color of {gui_text}. Use 'Custom (#RRGGBB)' for a custom color."),
        )
        .gui_text(gui_text)
        .gui_group("tunic_colors")
    };
    let tatl = |name: &str, gui_text: &str, default: &str| {
        color(
            name,
            providers.tatl_colors().iter().cloned(),
            default,
            format!("Color of Tatl ({gui_text}). Use 'Custom (#RRGGBB)' for a custom color."),
        )
        .gui_text(gui_text)
        .gui_group("tatl_colors")
    };
    let sword = |name: &str, gui_text: &str| {
        color(
            name,
            providers.sword_colors().iter().cloned(),
            "White",
            format!("Sword trail {gui_text}. Use 'Custom (#RRGGBB)' for a custom color."),
        )
        .gui_text(gui_text)
        .gui_group("sword_trails")
    };

    vec![
        combobox(
            "default_targeting",
            ChoiceSet::new().with("hold", "Hold").with("switch", "Switch"),
            "hold",
            "Default Z-targeting mode.",
        )
        .gui_text("Default Targeting Option")
        .gui_group("cosmetic"),
        combobox(
            "background_music",
            ChoiceSet::new()
                .with("normal", "Normal")
                .with("off", "No Music")
                .with("random", "Random"),
            "normal",
            "Background music behavior.",
        )
        .gui_text("Background Music")
        .gui_group("sfx"),
        checkbutton(
            "display_dpad",
            "Show the D-Pad item shortcuts on the HUD.",
            "Display D-Pad HUD",
        )
        .gui_group("cosmetic")
        .default_value(true),
        tunic("kokiri_color", "Kokiri Tunic"),
        tunic("deku_color", "Deku Form"),
        tunic("goron_color", "Goron Form"),
        tunic("zora_color", "Zora Form"),
        tatl("tatl_color_default", "Tatl Idle", "White"),
        tatl("tatl_color_enemy", "Tatl Targeting Enemy", "Yellow"),
        tatl("tatl_color_npc", "Tatl Targeting NPC", "Light Blue"),
        tatl("tatl_color_prop", "Tatl Targeting Prop", "Green"),
        combobox(
            "sword_trail_duration",
            ChoiceSet::new()
                .with(4i64, "Default")
                .with(10i64, "Long")
                .with(15i64, "Very Long")
                .with(20i64, "Lightsaber"),
            4i64,
            "Duration of the sword trail.",
        )
        .gui_text("Sword Trail Duration")
        .gui_group("sword_trails"),
        sword("sword_trail_color_inner", "Inner Color"),
        sword("sword_trail_color_outer", "Outer Color"),
        sfx("sfx_low_hp", SoundHook::HpLow, "Low HP", "sfx", providers),
        sfx(
            "sfx_tatl_overworld",
            SoundHook::TatlOverworld,
            "Tatl Overworld",
            "npc_sfx",
            providers,
        ),
        sfx("sfx_tatl_enemy", SoundHook::TatlEnemy, "Tatl Enemy", "npc_sfx", providers),
        sfx("sfx_menu_cursor", SoundHook::MenuCursor, "Menu Cursor", "menu_sfx", providers),
        sfx("sfx_menu_select", SoundHook::MenuSelect, "Menu Select", "menu_sfx", providers),
        sfx("sfx_horse_neigh", SoundHook::HorseNeigh, "Horse", "sfx", providers),
        sfx("sfx_nightfall", SoundHook::Nightfall, "Nightfall", "sfx", providers),
        sfx("sfx_hover_boots", SoundHook::HoverBoots, "Hover Boots", "sfx", providers),
        combobox(
            "sfx_ocarina",
            ChoiceSet::new()
                .with("ocarina", "Default")
                .with("random-choice", "Random Choice")
                .with("flute", "Flute")
                .with("harp", "Harp")
                .with("whistle", "Whistle")
                .with("malon", "Malon")
                .with("grind-organ", "Grind Organ"),
            "ocarina",
            "Instrument sound of the ocarina.",
        )
        .gui_text("Ocarina")
        .gui_group("sfx"),
    ]
}
