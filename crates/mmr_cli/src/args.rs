//! Command-line surface generated from the setting registry.

use anyhow::{Context, Result};
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use mmr_settings::{Assignment, Codec, ProviderTables, Registry};
use std::path::PathBuf;

pub const TABLES: &str = "tables";
pub const SETTINGS: &str = "settings";
pub const SETTINGS_STRING: &str = "settings_string";
pub const SCHEMA_VERSION: &str = "schema_version";
pub const OUTPUT: &str = "output";

/// What the tool prints once the settings are resolved.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Output {
    SettingsString,
    Json,
    Both,
}

impl Output {
    fn from_arg(value: &str) -> Self {
        match value {
            "json" => Output::Json,
            "both" => Output::Both,
            _ => Output::SettingsString,
        }
    }
}

/// Provider tables named by `--tables`, or the built-in ones.
pub fn load_tables(matches: &ArgMatches) -> Result<ProviderTables> {
    let Some(path) = matches.get_one::<PathBuf>(TABLES) else {
        return Ok(ProviderTables::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read provider tables {}", path.display()))?;
    ProviderTables::from_json(&json)
        .with_context(|| format!("failed to parse provider tables {}", path.display()))
}

/// One `--<name>` per setting plus the tool's own options.
///
/// Provider tables only change choice sets, never setting names, so the
/// command built from the stock registry parses any `--tables` input.
pub fn build_command(registry: &Registry) -> Command {
    let mut command = Command::new("mmr-settings")
        .version(mmr_settings::VERSION)
        .about("Validate randomizer settings and convert them to and from settings strings.")
        .arg(
            Arg::new(TABLES)
                .long(TABLES)
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .help("JSON file with locations, logic tricks, palettes and sound tables."),
        )
        .arg(
            Arg::new(SETTINGS)
                .long(SETTINGS)
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .help("JSON file with setting values; missing settings use their defaults."),
        )
        .arg(
            Arg::new(SETTINGS_STRING)
                .long(SETTINGS_STRING)
                .value_name("STRING")
                .help("Load shared settings from a settings string. Other arguments override it."),
        )
        .arg(
            Arg::new(SCHEMA_VERSION)
                .long(SCHEMA_VERSION)
                .value_name("VERSION")
                .value_parser(clap::value_parser!(u32))
                .requires(SETTINGS_STRING)
                .help("Schema version the settings string was made with; rejected if it differs."),
        )
        .arg(
            Arg::new(OUTPUT)
                .long(OUTPUT)
                .value_parser(["string", "json", "both"])
                .default_value("string")
                .help("Print the settings string, the full settings as JSON, or both."),
        );

    for descriptor in registry.iter() {
        let name = descriptor.name().to_string();
        let cli = descriptor.cli();
        let arg = Arg::new(name.clone())
            .long(name)
            .help(cli.help.clone());
        let arg = if cli.flag {
            arg.action(ArgAction::SetTrue)
        } else {
            arg.value_name("VALUE").action(ArgAction::Set)
        };
        command = command.arg(arg);
    }
    command
}

/// Starting assignment: the `--settings` file if given, else defaults.
fn base_assignment(registry: &Registry, matches: &ArgMatches) -> Result<Assignment> {
    let Some(path) = matches.get_one::<PathBuf>(SETTINGS) else {
        return Ok(registry.defaults());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read settings {}", path.display()))?;
    let partial = Assignment::from_json(&json)
        .with_context(|| format!("failed to parse settings {}", path.display()))?;
    registry
        .resolve(&partial)
        .with_context(|| format!("invalid settings in {}", path.display()))
}

/// Resolve the full assignment from parsed arguments.
///
/// Precedence, lowest first: defaults or `--settings`, then
/// `--settings_string`, then individual setting arguments. Dependencies
/// are an editor concern and are not applied here.
pub fn resolve_settings(registry: &Registry, matches: &ArgMatches) -> Result<Assignment> {
    let mut settings = base_assignment(registry, matches)?;

    if let Some(settings_string) = matches.get_one::<String>(SETTINGS_STRING) {
        let codec = Codec::current(registry);
        let decoded = match matches.get_one::<u32>(SCHEMA_VERSION) {
            Some(version) => codec.decode_string_versioned(settings_string, *version),
            None => codec.decode_string(settings_string),
        }
        .context("failed to decode settings string")?;
        tracing::debug!(settings = decoded.len(), "loaded settings string");
        settings.merge(&decoded);
    }

    for descriptor in registry.iter() {
        let name = descriptor.name();
        if matches.value_source(name) != Some(ValueSource::CommandLine) {
            continue;
        }
        if descriptor.cli().flag {
            settings.set(name, matches.get_flag(name));
            continue;
        }
        let Some(raw) = matches.get_one::<String>(name) else {
            continue;
        };
        match registry.validate(name, raw) {
            Ok(value) => {
                settings.set(name, value);
            }
            Err(err) => {
                tracing::warn!(setting = name, value = %raw, "rejected argument");
                return Err(err).with_context(|| format!("invalid value for --{name}"));
            }
        }
    }

    tracing::info!(settings = settings.len(), "resolved settings");
    Ok(settings)
}

pub fn output(matches: &ArgMatches) -> Output {
    matches
        .get_one::<String>(OUTPUT)
        .map_or(Output::SettingsString, |value| Output::from_arg(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mmr_settings::{build_registry, SettingValue, SettingsError};

    fn registry() -> Registry {
        build_registry(&ProviderTables::default()).unwrap()
    }

    fn parse(registry: &Registry, args: &[&str]) -> ArgMatches {
        let argv = std::iter::once("mmr-settings").chain(args.iter().copied());
        build_command(registry).try_get_matches_from(argv).unwrap()
    }

    #[test]
    fn test_command_is_well_formed() {
        build_command(&registry()).debug_assert();
    }

    #[test]
    fn test_no_arguments_gives_defaults() {
        let registry = registry();
        let matches = parse(&registry, &[]);
        let settings = resolve_settings(&registry, &matches).unwrap();
        assert_eq!(settings, registry.defaults());
        assert_eq!(output(&matches), Output::SettingsString);
    }

    #[test]
    fn test_arguments_are_validated() {
        let registry = registry();
        let matches = parse(
            &registry,
            &[
                "--fast_chests",
                "no",
                "--shuffle_smallkeys",
                "keysanity",
                "--trials",
                "2",
                "--cosmetics_only",
                "--output",
                "both",
            ],
        );
        let settings = resolve_settings(&registry, &matches).unwrap();
        assert_eq!(settings.get_bool("fast_chests"), Some(false));
        assert_eq!(settings.get_str("shuffle_smallkeys"), Some("keysanity"));
        assert_eq!(settings.get_int("trials"), Some(2));
        assert_eq!(settings.get_bool("cosmetics_only"), Some(true));
        assert_eq!(output(&matches), Output::Both);
    }

    #[test]
    fn test_rejected_argument_reports_setting() {
        let registry = registry();
        let matches = parse(&registry, &["--hints", "sometimes"]);
        let err = resolve_settings(&registry, &matches).unwrap_err();
        assert!(err.to_string().contains("--hints"));
        assert!(matches!(
            err.downcast_ref::<SettingsError>(),
            Some(SettingsError::InvalidChoice { name, value }) if name == "hints" && value == "sometimes"
        ));
    }

    #[test]
    fn test_settings_string_is_overridden_by_arguments() {
        let registry = registry();
        let codec = Codec::current(&registry);
        let mut shared = registry.defaults();
        shared.set("moon", "open");
        shared.set("hints", "always");
        let settings_string = codec.encode_string(&shared).unwrap();

        let matches = parse(
            &registry,
            &["--settings_string", settings_string.as_str(), "--hints", "none"],
        );
        let settings = resolve_settings(&registry, &matches).unwrap();
        assert_eq!(settings.get_str("moon"), Some("open"));
        assert_eq!(settings.get_str("hints"), Some("none"));
    }

    #[test]
    fn test_dependencies_do_not_touch_arguments() {
        let registry = registry();
        let matches = parse(
            &registry,
            &["--trials_random", "true", "--trials", "3", "--compress_rom", "None"],
        );
        let settings = resolve_settings(&registry, &matches).unwrap();
        assert_eq!(settings.get("trials"), Some(&SettingValue::Int(3)));
        assert_eq!(settings.get_bool("create_cosmetics_log"), Some(true));
    }

    #[test]
    fn test_settings_string_version_mismatch() {
        let registry = registry();
        let settings_string = Codec::current(&registry)
            .encode_string(&registry.defaults())
            .unwrap();
        let current = mmr_settings::SCHEMA_VERSION.to_string();
        let next = (mmr_settings::SCHEMA_VERSION + 1).to_string();

        let matches = parse(
            &registry,
            &["--settings_string", settings_string.as_str(), "--schema_version", current.as_str()],
        );
        assert_eq!(resolve_settings(&registry, &matches).unwrap(), registry.defaults());

        let matches = parse(
            &registry,
            &["--settings_string", settings_string.as_str(), "--schema_version", next.as_str()],
        );
        let err = resolve_settings(&registry, &matches).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SettingsError>(),
            Some(SettingsError::SchemaVersion { .. })
        ));
    }

    #[test]
    fn test_tables_default_to_builtin() {
        let registry = registry();
        let matches = parse(&registry, &["--moon", "open"]);
        assert_eq!(load_tables(&matches).unwrap(), ProviderTables::default());
    }

    #[test]
    fn test_missing_tables_file_is_reported() {
        let registry = registry();
        let matches = parse(&registry, &["--tables", "/nonexistent/mmr-tables.json"]);
        let err = load_tables(&matches).unwrap_err();
        assert!(err.to_string().contains("failed to read provider tables"));
    }
}
