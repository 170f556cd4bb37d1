//! The setting registry: ordered, name-indexed and immutable once built.

use crate::assignment::Assignment;
use crate::choice::bit_width_for;
use crate::descriptor::{BitLayout, Constraint, SettingDescriptor};
use crate::error::SettingsError;
use crate::registration_error::RegistrationError;
use crate::value::SettingValue;
use std::collections::HashMap;

/// Collects descriptors and checks their invariants before freezing them
/// into a [`Registry`].
#[derive(Default)]
pub struct RegistryBuilder {
    descriptors: Vec<SettingDescriptor>,
    name_lookup: HashMap<String, usize>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: SettingDescriptor) -> Result<(), RegistrationError> {
        let name_key = descriptor.name().to_string();
        if self.name_lookup.contains_key(&name_key) {
            return Err(RegistrationError::DuplicateName { name: name_key });
        }

        check_default(&descriptor)?;
        check_bit_width(&descriptor)?;

        tracing::debug!(
            setting = %name_key,
            bits = descriptor.bit_width(),
            shared = descriptor.is_shared(),
            "registered setting"
        );

        self.name_lookup.insert(name_key, self.descriptors.len());
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Register a batch of descriptors in order.
    pub fn register_all<I>(&mut self, descriptors: I) -> Result<(), RegistrationError>
    where
        I: IntoIterator<Item = SettingDescriptor>,
    {
        for descriptor in descriptors {
            self.register(descriptor)?;
        }
        Ok(())
    }

    pub fn build(self) -> Registry {
        let registry = Registry {
            descriptors: self.descriptors,
            name_lookup: self.name_lookup,
        };
        tracing::info!(
            settings = registry.len(),
            shared = registry.shared().count(),
            "settings registry ready"
        );
        registry
    }
}

fn check_default(descriptor: &SettingDescriptor) -> Result<(), RegistrationError> {
    let default = descriptor.default();
    if default.value_type() != descriptor.value_type() {
        return Err(RegistrationError::DefaultTypeMismatch {
            name: descriptor.name().to_string(),
            expected: descriptor.value_type(),
            actual: default.value_type(),
        });
    }

    let not_in_choices = || RegistrationError::DefaultNotInChoices {
        name: descriptor.name().to_string(),
        default: default.to_string(),
    };

    match (descriptor.constraint(), descriptor.choices()) {
        (Constraint::Items, Some(choices)) => {
            let items = default.as_list().unwrap_or_default();
            if items
                .iter()
                .any(|item| !choices.contains(&SettingValue::Str(item.clone())))
            {
                return Err(not_in_choices());
            }
        }
        (Constraint::Bounded { min, max }, _) => {
            let value = default.as_int().unwrap_or_default();
            if value < *min || value > *max {
                return Err(not_in_choices());
            }
        }
        (_, Some(choices)) => {
            if !choices.contains(default) {
                return Err(not_in_choices());
            }
        }
        (_, None) => {}
    }
    Ok(())
}

fn check_bit_width(descriptor: &SettingDescriptor) -> Result<(), RegistrationError> {
    let choice_count = descriptor.choices().map_or(0, |choices| choices.len());
    let required = match (descriptor.layout(), descriptor.constraint()) {
        (BitLayout::Index, _) => bit_width_for(choice_count),
        (BitLayout::ItemList, _) => bit_width_for(choice_count + 2),
        (BitLayout::Unsigned, Constraint::Bounded { max, .. }) => {
            u64::BITS - (*max).max(0).unsigned_abs().leading_zeros()
        }
        (BitLayout::Unsigned, _) | (BitLayout::Omitted, _) => 0,
    };
    if descriptor.bit_width() < required {
        return Err(RegistrationError::BitWidthTooSmall {
            name: descriptor.name().to_string(),
            required,
            declared: descriptor.bit_width(),
        });
    }
    Ok(())
}

/// Immutable, ordered collection of setting descriptors.
///
/// Registry order defines the bit layout of the compact encoding.
pub struct Registry {
    descriptors: Vec<SettingDescriptor>,
    name_lookup: HashMap<String, usize>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Look up a descriptor by name.
    pub fn get(&self, name: &str) -> Result<&SettingDescriptor, SettingsError> {
        self.name_lookup
            .get(name)
            .and_then(|index| self.descriptors.get(*index))
            .ok_or_else(|| SettingsError::UnknownSetting {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_lookup.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &SettingDescriptor> {
        self.descriptors.iter()
    }

    /// Shared descriptors in registration order.
    pub fn shared(&self) -> impl Iterator<Item = &SettingDescriptor> {
        self.descriptors
            .iter()
            .filter(|descriptor| descriptor.is_shared())
    }

    /// Parse and validate a raw (command-line or editor) value.
    pub fn validate(&self, name: &str, raw: &str) -> Result<SettingValue, SettingsError> {
        self.get(name)?.validate(raw)
    }

    /// Every setting at its default value.
    pub fn defaults(&self) -> Assignment {
        self.descriptors
            .iter()
            .map(|descriptor| (descriptor.name(), descriptor.default().clone()))
            .collect()
    }

    /// Check every entry of `partial` and fill the missing ones from
    /// defaults. Item lists come back in table order without repeats.
    /// Fails on the first unknown or invalid entry.
    pub fn resolve(&self, partial: &Assignment) -> Result<Assignment, SettingsError> {
        let mut resolved = self.defaults();
        for (name, value) in partial.iter() {
            resolved.set(name, self.get(name)?.normalize(value)?);
        }
        Ok(resolved)
    }

    /// Forced values of every dependency for the given assignment, in
    /// registry order.
    pub fn overrides(&self, assignment: &Assignment) -> Vec<(String, SettingValue)> {
        self.descriptors
            .iter()
            .filter_map(|descriptor| {
                descriptor
                    .forced_value(assignment)
                    .map(|value| (descriptor.name().to_string(), value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choice::ChoiceSet;
    use crate::descriptor::{bounded, checkbutton, combobox, item_list, text};

    fn sample() -> Registry {
        let mut builder = Registry::builder();
        builder
            .register_all([
                text("rom", "", "Path to the base rom."),
                checkbutton("fast_chests", "help", "Fast Chests")
                    .default_value(true)
                    .shared(),
                combobox(
                    "shuffle_smallkeys",
                    ChoiceSet::new()
                        .with("remove", "Remove")
                        .with("dungeon", "Dungeon Only")
                        .with("keysanity", "Anywhere"),
                    "dungeon",
                    "help",
                )
                .shared(),
            ])
            .unwrap();
        builder.build()
    }

    #[test]
    fn test_lookup_and_order() {
        let registry = sample();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("fast_chests").unwrap().bit_width(), 1);
        let shared: Vec<&str> = registry.shared().map(|d| d.name()).collect();
        assert_eq!(shared, vec!["fast_chests", "shuffle_smallkeys"]);
    }

    #[test]
    fn test_unknown_setting() {
        let registry = sample();
        assert_eq!(
            registry.get("nope").unwrap_err(),
            SettingsError::UnknownSetting { name: "nope".into() }
        );
        assert!(matches!(
            registry.validate("nope", "1"),
            Err(SettingsError::UnknownSetting { .. })
        ));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut builder = Registry::builder();
        builder.register(text("seed", "", "help")).unwrap();
        let err = builder.register(text("seed", "", "help")).unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateName { name } if name == "seed"));
    }

    #[test]
    fn test_default_must_be_a_choice() {
        let mut builder = Registry::builder();
        let err = builder
            .register(combobox(
                "moon",
                ChoiceSet::new().with("normal", "Normal").with("open", "Open"),
                "fast",
                "help",
            ))
            .unwrap_err();
        assert!(matches!(err, RegistrationError::DefaultNotInChoices { .. }));
    }

    #[test]
    fn test_default_type_must_match() {
        let mut builder = Registry::builder();
        let err = builder
            .register(text("count", "", "help").default_value(3i64))
            .unwrap_err();
        assert!(matches!(err, RegistrationError::DefaultTypeMismatch { .. }));
    }

    #[test]
    fn test_packed_width_must_fit_maximum() {
        let mut builder = Registry::builder();
        let err = builder
            .register(bounded("world_count", 1, 255, 1, "help").shared().packed(5))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::BitWidthTooSmall { required: 8, declared: 5, .. }
        ));
        builder
            .register(bounded("world_count", 1, 31, 1, "help").shared().packed(5))
            .unwrap();
    }

    #[test]
    fn test_resolve_fills_defaults_and_checks_values() {
        let registry = sample();
        let partial: Assignment = [("shuffle_smallkeys", "keysanity")].into_iter().collect();
        let resolved = registry.resolve(&partial).unwrap();
        assert_eq!(resolved.get_str("shuffle_smallkeys"), Some("keysanity"));
        assert_eq!(resolved.get_bool("fast_chests"), Some(true));
        assert_eq!(resolved.get_str("rom"), Some(""));

        let bad: Assignment = [("shuffle_smallkeys", "everywhere")].into_iter().collect();
        assert!(matches!(
            registry.resolve(&bad),
            Err(SettingsError::InvalidChoice { .. })
        ));

        let unknown: Assignment = [("bombchus_in_logic", true)].into_iter().collect();
        assert!(matches!(
            registry.resolve(&unknown),
            Err(SettingsError::UnknownSetting { .. })
        ));
    }

    #[test]
    fn test_resolve_puts_item_lists_in_table_order() {
        let mut builder = Registry::builder();
        builder
            .register(
                item_list(
                    "disabled_locations",
                    ChoiceSet::from_keys(["Clock Tower", "Romani Ranch", "Great Bay"]),
                    "help",
                )
                .shared(),
            )
            .unwrap();
        let registry = builder.build();

        let partial: Assignment = [(
            "disabled_locations",
            vec!["Great Bay".to_string(), "Clock Tower".to_string(), "Great Bay".to_string()],
        )]
        .into_iter()
        .collect();
        let resolved = registry.resolve(&partial).unwrap();
        assert_eq!(
            resolved.get("disabled_locations"),
            Some(&SettingValue::List(vec!["Clock Tower".into(), "Great Bay".into()]))
        );
    }
}
