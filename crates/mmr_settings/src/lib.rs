//! MMR Settings
//!
//! Declarative settings schema for the randomizer:
//! - Setting descriptors and the immutable registry built from them
//! - Raw value validation (CLI / editor input)
//! - Compact bit codec and settings-string packing for shared settings
//! - Dependency overrides and widget metadata for settings editors

pub mod assignment;
pub mod bits;
pub mod catalog;
pub mod choice;
pub mod codec;
pub mod descriptor;
pub mod error;
pub mod gui;
pub mod providers;
pub mod registration_error;
pub mod registry;
pub mod text;
pub mod validate;
pub mod value;

pub use assignment::Assignment;
pub use bits::{BitReader, BitString};
pub use catalog::build_registry;
pub use choice::{bit_width_for, Choice, ChoiceSet};
pub use codec::{Codec, Schema, SCHEMA_VERSION};
pub use descriptor::{BitLayout, CliParams, Constraint, Dependency, SettingDescriptor};
pub use error::{MismatchReason, SettingsError};
pub use gui::{GuiParams, WidgetKind};
pub use providers::{LogicTrick, ProviderTables, Providers, SoundHook};
pub use registration_error::RegistrationError;
pub use registry::{Registry, RegistryBuilder};
pub use value::{SettingValue, ValueType};

/// Crate version, reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
