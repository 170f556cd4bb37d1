//! Setting descriptors and the builders that declare common shapes.
//!
//! A descriptor is one flat record; checkbuttons, dropdowns and scales
//! are just different builders filling in its fields.

use crate::assignment::Assignment;
use crate::choice::{bit_width_for, ChoiceSet};
use crate::gui::{GuiParams, WidgetKind};
use crate::value::{SettingValue, ValueType};
use std::fmt;
use std::sync::Arc;

/// Pure function of the current assignment that may force a value.
///
/// `None` means "no override". Evaluated on demand by editors only; it
/// never affects validation or encoding.
pub type Dependency = Arc<dyn Fn(&Assignment) -> Option<SettingValue> + Send + Sync>;

/// How a setting is laid out in the compact bit string.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BitLayout {
    /// Not part of the compact encoding.
    Omitted,
    /// Index of the chosen key in the choice set.
    Index,
    /// Integer value stored as-is.
    Unsigned,
    /// Self-terminated run of item indexes (see `codec`).
    ItemList,
}

/// Rule applied to raw and typed values of a setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Any value of the setting's type.
    Free,
    /// Boolean literal tokens.
    Boolean,
    /// One of the choice keys.
    Member,
    /// Integer on the `min..=max` grid at `step`.
    Grid { min: i64, max: i64, step: i64 },
    /// Integer within `min..=max`.
    Bounded { min: i64, max: i64 },
    /// Palette entry or a `Custom (#RRGGBB)` escape.
    Color,
    /// List whose items are all choice keys.
    Items,
}

/// Command-line binding of a setting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliParams {
    pub help: String,
    /// `store_true` switch taking no value.
    pub flag: bool,
}

/// Immutable description of one setting.
#[derive(Clone)]
pub struct SettingDescriptor {
    name: String,
    value_type: ValueType,
    choices: Option<ChoiceSet>,
    default: SettingValue,
    bit_width: u32,
    layout: BitLayout,
    shared: bool,
    constraint: Constraint,
    cli: CliParams,
    gui: Option<GuiParams>,
    dependency: Option<Dependency>,
}

impl SettingDescriptor {
    fn new(
        name: impl Into<String>,
        value_type: ValueType,
        default: SettingValue,
        constraint: Constraint,
        help: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value_type,
            choices: None,
            default,
            bit_width: 0,
            layout: BitLayout::Omitted,
            shared: false,
            constraint,
            cli: CliParams {
                help: help.into(),
                flag: false,
            },
            gui: None,
            dependency: None,
        }
    }

    fn with_choices(mut self, choices: ChoiceSet) -> Self {
        self.bit_width = choices.bit_width();
        self.layout = BitLayout::Index;
        self.choices = Some(choices);
        self
    }

    /// Mark the setting as affecting world generation.
    pub fn shared(mut self) -> Self {
        self.shared = true;
        self
    }

    pub fn default_value(mut self, default: impl Into<SettingValue>) -> Self {
        self.default = default.into();
        self
    }

    /// Store an integer setting directly in `bits` bits.
    pub fn packed(mut self, bits: u32) -> Self {
        self.bit_width = bits;
        self.layout = BitLayout::Unsigned;
        self
    }

    pub fn gui_text(mut self, text: impl Into<String>) -> Self {
        self.gui_mut().text = Some(text.into());
        self
    }

    pub fn gui_group(mut self, group: impl Into<String>) -> Self {
        self.gui_mut().group = Some(group.into());
        self
    }

    pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.gui_mut().tooltip = Some(tooltip.into());
        self
    }

    /// Show a dropdown as a row of radio buttons.
    pub fn radio(mut self, horizontal: bool) -> Self {
        let gui = self.gui_mut();
        gui.widget = WidgetKind::Radiobutton;
        gui.horizontal = horizontal;
        self
    }

    pub fn depends_on<F>(mut self, dependency: F) -> Self
    where
        F: Fn(&Assignment) -> Option<SettingValue> + Send + Sync + 'static,
    {
        self.dependency = Some(Arc::new(dependency));
        self
    }

    fn gui_mut(&mut self) -> &mut GuiParams {
        self.gui.get_or_insert_with(|| GuiParams::new(WidgetKind::Entry))
    }

    fn with_gui(mut self, widget: WidgetKind) -> Self {
        self.gui = Some(GuiParams::new(widget));
        self
    }

    /// Unique setting name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn choices(&self) -> Option<&ChoiceSet> {
        self.choices.as_ref()
    }

    pub fn default(&self) -> &SettingValue {
        &self.default
    }

    /// Bits used in the compact encoding (per item for item lists).
    pub fn bit_width(&self) -> u32 {
        self.bit_width
    }

    pub fn layout(&self) -> BitLayout {
        self.layout
    }

    pub fn is_shared(&self) -> bool {
        self.shared
    }

    /// Whether the setting contributes bits to the compact encoding.
    pub fn is_encoded(&self) -> bool {
        self.shared && self.layout != BitLayout::Omitted
    }

    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    pub fn cli(&self) -> &CliParams {
        &self.cli
    }

    pub fn gui(&self) -> Option<&GuiParams> {
        self.gui.as_ref()
    }

    pub fn has_dependency(&self) -> bool {
        self.dependency.is_some()
    }

    /// Evaluate the dependency against `assignment`. Never cached.
    pub fn forced_value(&self, assignment: &Assignment) -> Option<SettingValue> {
        self.dependency
            .as_ref()
            .and_then(|dependency| dependency(assignment))
    }
}

impl fmt::Debug for SettingDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingDescriptor")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("choices", &self.choices)
            .field("default", &self.default)
            .field("bit_width", &self.bit_width)
            .field("layout", &self.layout)
            .field("shared", &self.shared)
            .field("constraint", &self.constraint)
            .field("cli", &self.cli)
            .field("gui", &self.gui)
            .field("dependency", &self.dependency.is_some())
            .finish()
    }
}

/// Boolean setting shown as a checkbox. Defaults to unchecked.
pub fn checkbutton(
    name: impl Into<String>,
    help: impl Into<String>,
    gui_text: impl Into<String>,
) -> SettingDescriptor {
    let choices = ChoiceSet::new()
        .with(true, "checked")
        .with(false, "unchecked");
    SettingDescriptor::new(
        name,
        ValueType::Bool,
        SettingValue::Bool(false),
        Constraint::Boolean,
        help,
    )
    .with_choices(choices)
    .with_gui(WidgetKind::Checkbutton)
    .gui_text(gui_text)
}

/// Enumerated setting shown as a dropdown.
pub fn combobox(
    name: impl Into<String>,
    choices: ChoiceSet,
    default: impl Into<SettingValue>,
    help: impl Into<String>,
) -> SettingDescriptor {
    let default = default.into();
    let value_type = default.value_type();
    SettingDescriptor::new(name, value_type, default, Constraint::Member, help)
        .with_choices(choices)
        .with_gui(WidgetKind::Combobox)
}

/// Integer slider over `min..=max` at `step`.
pub fn scale(
    name: impl Into<String>,
    min: i64,
    max: i64,
    step: i64,
    default: i64,
    help: impl Into<String>,
) -> SettingDescriptor {
    SettingDescriptor::new(
        name,
        ValueType::Int,
        SettingValue::Int(default),
        Constraint::Grid { min, max, step },
        help,
    )
    .with_choices(ChoiceSet::range(min, max, step))
    .with_gui(WidgetKind::Scale { min, max, step })
}

/// Command-line switch (`store_true`), off by default.
pub fn flag(name: impl Into<String>, help: impl Into<String>) -> SettingDescriptor {
    let mut descriptor = SettingDescriptor::new(
        name,
        ValueType::Bool,
        SettingValue::Bool(false),
        Constraint::Boolean,
        help,
    );
    descriptor.cli.flag = true;
    descriptor
}

/// Free-form text (paths, seeds).
pub fn text(
    name: impl Into<String>,
    default: impl Into<String>,
    help: impl Into<String>,
) -> SettingDescriptor {
    SettingDescriptor::new(
        name,
        ValueType::Str,
        SettingValue::Str(default.into()),
        Constraint::Free,
        help,
    )
}

/// Unconstrained integer.
pub fn integer(name: impl Into<String>, default: i64, help: impl Into<String>) -> SettingDescriptor {
    SettingDescriptor::new(
        name,
        ValueType::Int,
        SettingValue::Int(default),
        Constraint::Free,
        help,
    )
}

/// Integer within `min..=max`.
pub fn bounded(
    name: impl Into<String>,
    min: i64,
    max: i64,
    default: i64,
    help: impl Into<String>,
) -> SettingDescriptor {
    SettingDescriptor::new(
        name,
        ValueType::Int,
        SettingValue::Int(default),
        Constraint::Bounded { min, max },
        help,
    )
}

/// List of items drawn from an external table, picked in a search box.
///
/// Each selected item costs `ceil(log2(items + 2))` bits when shared; the
/// two extra codes are the run terminators.
pub fn item_list(
    name: impl Into<String>,
    items: ChoiceSet,
    help: impl Into<String>,
) -> SettingDescriptor {
    let mut descriptor = SettingDescriptor::new(
        name,
        ValueType::List,
        SettingValue::List(Vec::new()),
        Constraint::Items,
        help,
    )
    .with_gui(WidgetKind::SearchBox);
    descriptor.bit_width = bit_width_for(items.len() + 2);
    descriptor.layout = BitLayout::ItemList;
    descriptor.choices = Some(items);
    descriptor
}

/// Color picked from a palette, or a custom `Custom (#RRGGBB)` value.
pub fn color<I, S>(
    name: impl Into<String>,
    palette: I,
    default: impl Into<String>,
    help: impl Into<String>,
) -> SettingDescriptor
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut descriptor = SettingDescriptor::new(
        name,
        ValueType::Str,
        SettingValue::Str(default.into()),
        Constraint::Color,
        help,
    )
    .with_gui(WidgetKind::Combobox);
    descriptor.choices = Some(ChoiceSet::from_keys(palette));
    descriptor
}
