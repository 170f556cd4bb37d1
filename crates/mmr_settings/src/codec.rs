//! Compact bit encoding of shared settings.
//!
//! A [`Schema`] is a versioned, ordered list of setting names. Encoding
//! walks it in order and appends, for every shared setting:
//! - `Index`: the position of the chosen key in the choice set, in
//!   `bit_width` bits
//! - `Unsigned`: the integer value itself, in `bit_width` bits
//! - `ItemList`: `index + 1` of each selected item in `bit_width`-bit
//!   chunks, ascending, closed by an all-zeros chunk. When more than half
//!   of the table is selected the unselected items are written instead,
//!   closed by an all-ones chunk.
//!
//! Non-shared settings and settings without a layout never produce bits.

use crate::assignment::Assignment;
use crate::bits::{BitReader, BitString};
use crate::choice::ChoiceSet;
use crate::descriptor::{BitLayout, Constraint, SettingDescriptor};
use crate::error::{MismatchReason, SettingsError};
use crate::registry::Registry;
use crate::text;
use crate::value::SettingValue;
use serde::{Deserialize, Serialize};

/// Version of the built-in bit layout. Bump whenever shared settings are
/// added, removed, reordered or change their choices.
pub const SCHEMA_VERSION: u32 = 1;

/// Versioned, ordered list of the settings making up a bit layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    version: u32,
    settings: Vec<String>,
}

impl Schema {
    pub fn new<I, S>(version: u32, settings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            version,
            settings: settings.into_iter().map(Into::into).collect(),
        }
    }

    /// Every shared setting of `registry`, in registry order.
    pub fn current(registry: &Registry) -> Self {
        Self::new(
            SCHEMA_VERSION,
            registry.shared().map(|descriptor| descriptor.name()),
        )
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Fail unless bits recorded under `found` were laid out by this schema.
    ///
    /// Bit strings carry no version of their own, so this only helps callers
    /// that store the version next to the settings string.
    pub fn check_version(&self, found: u32) -> Result<(), SettingsError> {
        if found != self.version {
            return Err(SettingsError::SchemaVersion {
                expected: self.version,
                found,
            });
        }
        Ok(())
    }

    pub fn settings(&self) -> &[String] {
        &self.settings
    }

    /// Sum of the bit widths of the fixed-size settings; item lists count
    /// their terminator chunk only.
    pub fn min_bits(&self, registry: &Registry) -> Result<usize, SettingsError> {
        let mut total = 0;
        for name in &self.settings {
            let descriptor = registry.get(name)?;
            if descriptor.is_encoded() {
                total += descriptor.bit_width() as usize;
            }
        }
        Ok(total)
    }
}

/// Encoder/decoder binding a schema to the registry it refers to.
pub struct Codec<'r> {
    registry: &'r Registry,
    schema: Schema,
}

impl<'r> Codec<'r> {
    pub fn new(registry: &'r Registry, schema: Schema) -> Self {
        Self { registry, schema }
    }

    /// Codec for the registry's own shared settings.
    pub fn current(registry: &'r Registry) -> Self {
        Self::new(registry, Schema::current(registry))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Encode the shared settings of `values`. Missing values fall back to
    /// their defaults.
    pub fn encode(&self, values: &Assignment) -> Result<BitString, SettingsError> {
        let mut bits = BitString::new();
        for descriptor in self.encoded_descriptors() {
            let descriptor = descriptor?;
            let value = values
                .get(descriptor.name())
                .unwrap_or_else(|| descriptor.default());
            descriptor.check(value)?;
            match descriptor.layout() {
                BitLayout::Index => encode_index(descriptor, value, &mut bits)?,
                BitLayout::Unsigned => encode_unsigned(descriptor, value, &mut bits)?,
                BitLayout::ItemList => encode_items(descriptor, value, &mut bits)?,
                BitLayout::Omitted => {}
            }
        }
        tracing::debug!(
            schema = self.schema.version,
            bits = bits.len(),
            "encoded shared settings"
        );
        Ok(bits)
    }

    /// Decode shared settings from `bits`.
    ///
    /// Bits left over after the last setting are ignored; they are the
    /// padding added when packing into a settings string.
    pub fn decode(&self, bits: &BitString) -> Result<Assignment, SettingsError> {
        let mut reader = bits.reader();
        let mut values = Assignment::new();
        for descriptor in self.encoded_descriptors() {
            let descriptor = descriptor?;
            let value = match descriptor.layout() {
                BitLayout::Index => decode_index(descriptor, &mut reader)?,
                BitLayout::Unsigned => decode_unsigned(descriptor, &mut reader)?,
                BitLayout::ItemList => decode_items(descriptor, &mut reader)?,
                BitLayout::Omitted => continue,
            };
            values.set(descriptor.name(), value);
        }
        tracing::debug!(
            schema = self.schema.version,
            consumed = reader.position(),
            padding = reader.remaining(),
            "decoded shared settings"
        );
        Ok(values)
    }

    /// Encode and pack into a settings string.
    pub fn encode_string(&self, values: &Assignment) -> Result<String, SettingsError> {
        self.encode(values).map(|bits| text::to_settings_string(&bits))
    }

    /// Unpack a settings string and decode it.
    pub fn decode_string(&self, settings_string: &str) -> Result<Assignment, SettingsError> {
        self.decode(&text::from_settings_string(settings_string)?)
    }

    /// Like [`Self::decode_string`], for a string stored together with the
    /// schema version it was encoded under.
    pub fn decode_string_versioned(
        &self,
        settings_string: &str,
        version: u32,
    ) -> Result<Assignment, SettingsError> {
        self.schema.check_version(version)?;
        self.decode_string(settings_string)
    }

    fn encoded_descriptors(
        &self,
    ) -> impl Iterator<Item = Result<&'r SettingDescriptor, SettingsError>> + '_ {
        let registry = self.registry;
        self.schema
            .settings
            .iter()
            .map(move |name| registry.get(name))
            .filter(|descriptor| match descriptor {
                Ok(descriptor) => descriptor.is_encoded(),
                Err(_) => true,
            })
    }
}

fn choices_of(descriptor: &SettingDescriptor) -> &ChoiceSet {
    static EMPTY: ChoiceSet = ChoiceSet::EMPTY;
    descriptor.choices().unwrap_or(&EMPTY)
}

fn read(
    descriptor: &SettingDescriptor,
    reader: &mut BitReader<'_>,
    width: u32,
) -> Result<u64, SettingsError> {
    reader
        .read_uint(width)
        .ok_or_else(|| SettingsError::SchemaMismatch {
            name: descriptor.name().to_string(),
            reason: MismatchReason::Truncated {
                needed: width,
                available: reader.remaining(),
            },
        })
}

fn index_out_of_range(descriptor: &SettingDescriptor, index: u64, choices: usize) -> SettingsError {
    SettingsError::SchemaMismatch {
        name: descriptor.name().to_string(),
        reason: MismatchReason::IndexOutOfRange { index, choices },
    }
}

fn encode_index(
    descriptor: &SettingDescriptor,
    value: &SettingValue,
    bits: &mut BitString,
) -> Result<(), SettingsError> {
    let index = choices_of(descriptor).index_of(value).ok_or_else(|| {
        SettingsError::InvalidChoice {
            name: descriptor.name().to_string(),
            value: value.to_string(),
        }
    })?;
    bits.push_uint(index as u64, descriptor.bit_width());
    Ok(())
}

fn decode_index(
    descriptor: &SettingDescriptor,
    reader: &mut BitReader<'_>,
) -> Result<SettingValue, SettingsError> {
    let choices = choices_of(descriptor);
    let index = read(descriptor, reader, descriptor.bit_width())?;
    usize::try_from(index)
        .ok()
        .and_then(|index| choices.key_at(index))
        .cloned()
        .ok_or_else(|| index_out_of_range(descriptor, index, choices.len()))
}

fn encode_unsigned(
    descriptor: &SettingDescriptor,
    value: &SettingValue,
    bits: &mut BitString,
) -> Result<(), SettingsError> {
    let width = descriptor.bit_width();
    let max = max_for_width(width);
    let number = value.as_int().unwrap_or_default();
    let fits = u64::try_from(number).is_ok_and(|number| number <= max);
    if !fits {
        return Err(SettingsError::OutOfRange {
            name: descriptor.name().to_string(),
            value: number.to_string(),
            min: 0,
            max: i64::try_from(max).unwrap_or(i64::MAX),
            step: 1,
        });
    }
    bits.push_uint(number as u64, width);
    Ok(())
}

fn decode_unsigned(
    descriptor: &SettingDescriptor,
    reader: &mut BitReader<'_>,
) -> Result<SettingValue, SettingsError> {
    let raw = read(descriptor, reader, descriptor.bit_width())?;
    let value = i64::try_from(raw).unwrap_or(i64::MAX);
    if let Constraint::Bounded { min, max } = descriptor.constraint() {
        if value < *min || value > *max {
            return Err(SettingsError::SchemaMismatch {
                name: descriptor.name().to_string(),
                reason: MismatchReason::ValueOutOfRange { value },
            });
        }
    }
    Ok(SettingValue::Int(value))
}

fn encode_items(
    descriptor: &SettingDescriptor,
    value: &SettingValue,
    bits: &mut BitString,
) -> Result<(), SettingsError> {
    let choices = choices_of(descriptor);
    let width = descriptor.bit_width();

    // `check` has already made the list ascending and free of repeats.
    let mut selected = Vec::new();
    for item in value.as_list().unwrap_or_default() {
        let index = choices
            .index_of(&SettingValue::Str(item.clone()))
            .ok_or_else(|| SettingsError::InvalidChoice {
                name: descriptor.name().to_string(),
                value: item.clone(),
            })?;
        selected.push(index);
    }

    let inverted = selected.len() * 2 > choices.len();
    if inverted {
        selected = (0..choices.len())
            .filter(|index| selected.binary_search(index).is_err())
            .collect();
    }

    for index in selected {
        bits.push_uint(index as u64 + 1, width);
    }
    let terminator = if inverted { max_for_width(width) } else { 0 };
    bits.push_uint(terminator, width);
    Ok(())
}

fn decode_items(
    descriptor: &SettingDescriptor,
    reader: &mut BitReader<'_>,
) -> Result<SettingValue, SettingsError> {
    let choices = choices_of(descriptor);
    let width = descriptor.bit_width();
    let all_ones = max_for_width(width);

    let mut listed = Vec::new();
    let inverted = loop {
        let chunk = read(descriptor, reader, width)?;
        if chunk == 0 {
            break false;
        }
        if chunk == all_ones {
            break true;
        }
        let index = chunk - 1;
        if index >= choices.len() as u64 {
            return Err(index_out_of_range(descriptor, index, choices.len()));
        }
        listed.push(index as usize);
    };
    listed.sort_unstable();
    listed.dedup();

    let items = (0..choices.len())
        .filter(|index| listed.binary_search(index).is_ok() != inverted)
        .filter_map(|index| choices.key_at(index))
        .map(ToString::to_string)
        .collect();
    Ok(SettingValue::List(items))
}

fn max_for_width(width: u32) -> u64 {
    if width >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{bounded, checkbutton, combobox, item_list, scale, text};

    fn registry() -> Registry {
        let mut builder = Registry::builder();
        builder
            .register_all([
                text("seed", "", "help").shared(),
                checkbutton("fast_chests", "help", "Fast Chests")
                    .default_value(true)
                    .shared(),
                combobox(
                    "shuffle_mapcompass",
                    ChoiceSet::new()
                        .with("remove", "Remove")
                        .with("dungeon", "Dungeon Only")
                        .with("keysanity", "Anywhere"),
                    "dungeon",
                    "help",
                )
                .shared(),
                scale("trials", 0, 4, 1, 4, "help").shared(),
                combobox(
                    "default_targeting",
                    ChoiceSet::new().with("hold", "Hold").with("switch", "Switch"),
                    "hold",
                    "help",
                ),
                combobox("single", ChoiceSet::new().with("only", "Only"), "only", "help").shared(),
            ])
            .unwrap();
        builder.build()
    }

    fn list_registry() -> Registry {
        let mut builder = Registry::builder();
        builder
            .register_all([
                bounded("world_count", 1, 31, 1, "help").shared().packed(5),
                item_list(
                    "disabled_locations",
                    ChoiceSet::from_keys(["a", "b", "c", "d", "e"]),
                    "help",
                )
                .shared(),
            ])
            .unwrap();
        builder.build()
    }

    #[test]
    fn test_dungeon_encodes_as_01() {
        let mut builder = Registry::builder();
        builder
            .register(
                combobox(
                    "shuffle_smallkeys",
                    ChoiceSet::new()
                        .with("remove", "Remove")
                        .with("dungeon", "Dungeon Only")
                        .with("keysanity", "Anywhere"),
                    "remove",
                    "help",
                )
                .shared(),
            )
            .unwrap();
        let registry = builder.build();
        let codec = Codec::current(&registry);

        let values: Assignment = [("shuffle_smallkeys", "dungeon")].into_iter().collect();
        let bits = codec.encode(&values).unwrap();
        assert_eq!(bits.to_string(), "01");
        assert_eq!(codec.decode(&bits).unwrap(), values);
    }

    #[test]
    fn test_layout_follows_schema_order_and_skips_non_shared() {
        let registry = registry();
        let codec = Codec::current(&registry);
        assert_eq!(codec.schema().min_bits(&registry).unwrap(), 1 + 2 + 3);

        let values: Assignment = [
            ("fast_chests", SettingValue::Bool(false)),
            ("shuffle_mapcompass", "keysanity".into()),
            ("trials", SettingValue::Int(3)),
            ("default_targeting", "switch".into()),
        ]
        .into_iter()
        .collect();
        // checkbutton choices are declared true-first, so false is index 1
        assert_eq!(codec.encode(&values).unwrap().to_string(), "110011");
    }

    #[test]
    fn test_round_trip_every_choice() {
        let registry = registry();
        let codec = Codec::current(&registry);
        for fast_chests in [true, false] {
            for mapcompass in ["remove", "dungeon", "keysanity"] {
                for trials in 0..=4i64 {
                    let values: Assignment = [
                        ("fast_chests", SettingValue::Bool(fast_chests)),
                        ("shuffle_mapcompass", mapcompass.into()),
                        ("trials", SettingValue::Int(trials)),
                        ("single", "only".into()),
                    ]
                    .into_iter()
                    .collect();
                    let bits = codec.encode(&values).unwrap();
                    assert_eq!(bits.len(), 6);
                    assert_eq!(codec.encode(&values).unwrap(), bits);
                    assert_eq!(codec.decode(&bits).unwrap(), values);
                }
            }
        }
    }

    #[test]
    fn test_missing_values_use_defaults() {
        let registry = registry();
        let codec = Codec::current(&registry);
        let decoded = codec.decode(&codec.encode(&Assignment::new()).unwrap()).unwrap();
        assert_eq!(decoded.get_bool("fast_chests"), Some(true));
        assert_eq!(decoded.get_str("shuffle_mapcompass"), Some("dungeon"));
        assert_eq!(decoded.get_int("trials"), Some(4));
        assert_eq!(decoded.get_str("single"), Some("only"));
        assert!(!decoded.contains("seed"));
        assert!(!decoded.contains("default_targeting"));
    }

    #[test]
    fn test_truncated_bits_are_rejected() {
        let registry = registry();
        let codec = Codec::current(&registry);
        let bits = codec.encode(&Assignment::new()).unwrap();
        let truncated: BitString = bits.as_slice()[..bits.len() - 1].iter().copied().collect();
        assert!(matches!(
            codec.decode(&truncated),
            Err(SettingsError::SchemaMismatch {
                reason: MismatchReason::Truncated { needed: 3, available: 2 },
                ..
            })
        ));
        assert!(matches!(
            codec.decode(&BitString::new()),
            Err(SettingsError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_index_past_choices_is_rejected() {
        let registry = registry();
        let codec = Codec::current(&registry);
        // mapcompass index 3 does not exist
        let bits: BitString = "011000".parse().unwrap();
        let err = codec.decode(&bits).unwrap_err();
        assert_eq!(
            err,
            SettingsError::SchemaMismatch {
                name: "shuffle_mapcompass".into(),
                reason: MismatchReason::IndexOutOfRange { index: 3, choices: 3 },
            }
        );
        // trials index 7 does not exist either
        let bits: BitString = "001111".parse().unwrap();
        assert!(matches!(
            codec.decode(&bits),
            Err(SettingsError::SchemaMismatch { name, .. }) if name == "trials"
        ));
    }

    #[test]
    fn test_trailing_padding_is_ignored() {
        let registry = registry();
        let codec = Codec::current(&registry);
        let mut bits = codec.encode(&Assignment::new()).unwrap();
        bits.push_uint(0, 4);
        assert_eq!(
            codec.decode(&bits).unwrap(),
            codec.decode(&codec.encode(&Assignment::new()).unwrap()).unwrap()
        );
    }

    #[test]
    fn test_unknown_schema_setting() {
        let registry = registry();
        let codec = Codec::new(&registry, Schema::new(2, ["fast_chests", "bombchus_in_logic"]));
        assert!(matches!(
            codec.decode(&"1".parse().unwrap()),
            Err(SettingsError::UnknownSetting { name }) if name == "bombchus_in_logic"
        ));
        assert!(matches!(
            codec.encode(&Assignment::new()),
            Err(SettingsError::UnknownSetting { .. })
        ));
    }

    #[test]
    fn test_invalid_encode_input() {
        let registry = registry();
        let codec = Codec::current(&registry);
        let values: Assignment = [("shuffle_mapcompass", "everywhere")].into_iter().collect();
        assert!(matches!(
            codec.encode(&values),
            Err(SettingsError::InvalidChoice { .. })
        ));
        let values: Assignment = [("trials", "four")].into_iter().collect();
        assert!(matches!(
            codec.encode(&values),
            Err(SettingsError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_packed_integer_and_item_lists() {
        let registry = list_registry();
        let codec = Codec::current(&registry);

        let cases: [(i64, &[&str], &str); 4] = [
            // 5 bits of world count, then 3-bit item chunks
            (1, &[], "00001000"),
            (3, &["b", "d"], "00011010100000"),
            // more than half selected: the complement is listed, closed by 111
            (31, &["a", "b", "c", "e"], "11111100111"),
            (2, &["a", "b", "c", "d", "e"], "00010111"),
        ];
        for (worlds, items, expected) in cases {
            let values: Assignment = [
                ("world_count", SettingValue::Int(worlds)),
                (
                    "disabled_locations",
                    SettingValue::List(items.iter().map(|item| item.to_string()).collect()),
                ),
            ]
            .into_iter()
            .collect();
            let bits = codec.encode(&values).unwrap();
            assert_eq!(bits.to_string(), expected);
            assert_eq!(codec.decode(&bits).unwrap(), values);
        }
    }

    #[test]
    fn test_schema_version_is_checked() {
        let registry = registry();
        let codec = Codec::current(&registry);
        let settings_string = codec.encode_string(&registry.defaults()).unwrap();

        assert_eq!(codec.schema().check_version(SCHEMA_VERSION), Ok(()));
        assert_eq!(
            codec.decode_string_versioned(&settings_string, SCHEMA_VERSION),
            codec.decode_string(&settings_string)
        );
        assert_eq!(
            codec.decode_string_versioned(&settings_string, SCHEMA_VERSION + 1),
            Err(SettingsError::SchemaVersion {
                expected: SCHEMA_VERSION,
                found: SCHEMA_VERSION + 1,
            })
        );

        let older = Codec::new(&registry, Schema::new(0, ["fast_chests"]));
        assert!(matches!(
            older.schema().check_version(SCHEMA_VERSION),
            Err(SettingsError::SchemaVersion { expected: 0, .. })
        ));
    }

    #[test]
    fn test_out_of_order_item_list() {
        let registry = list_registry();
        let codec = Codec::current(&registry);
        let unordered: Assignment = [(
            "disabled_locations",
            SettingValue::List(vec!["d".into(), "b".into()]),
        )]
        .into_iter()
        .collect();
        assert!(matches!(
            codec.encode(&unordered),
            Err(SettingsError::UnorderedList { .. })
        ));

        let values = registry.resolve(&unordered).unwrap();
        assert_eq!(
            values.get("disabled_locations"),
            Some(&SettingValue::List(vec!["b".into(), "d".into()]))
        );
        let bits = codec.encode(&values).unwrap();
        assert_eq!(bits.to_string(), "00001010100000");
        assert_eq!(codec.decode(&bits).unwrap(), values);
    }

    #[test]
    fn test_item_list_decode_rejects_unknown_index() {
        let registry = list_registry();
        let codec = Codec::current(&registry);
        // chunk 110 is item index 5, past the five-entry table
        let bits: BitString = "00001110000".parse().unwrap();
        assert!(matches!(
            codec.decode(&bits),
            Err(SettingsError::SchemaMismatch {
                reason: MismatchReason::IndexOutOfRange { index: 5, choices: 5 },
                ..
            })
        ));
        // run never terminated
        let bits: BitString = "00001010".parse().unwrap();
        assert!(matches!(
            codec.decode(&bits),
            Err(SettingsError::SchemaMismatch {
                reason: MismatchReason::Truncated { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_packed_integer_out_of_range() {
        let registry = list_registry();
        let codec = Codec::current(&registry);
        let values: Assignment = [("world_count", SettingValue::Int(40))].into_iter().collect();
        assert!(matches!(
            codec.encode(&values),
            Err(SettingsError::OutOfRange { .. })
        ));
        // zero worlds fits in five bits but is not a valid world count
        let bits: BitString = "00000000".parse().unwrap();
        assert!(matches!(
            codec.decode(&bits),
            Err(SettingsError::SchemaMismatch {
                reason: MismatchReason::ValueOutOfRange { value: 0 },
                ..
            })
        ));
    }
}
