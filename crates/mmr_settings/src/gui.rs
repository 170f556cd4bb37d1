//! Widget metadata for settings editors.
//!
//! Nothing here renders anything; it gives an editor the grouping, widget
//! kind and enabled state it needs to draw the settings form.

use crate::assignment::Assignment;
use crate::descriptor::SettingDescriptor;
use crate::providers::{LogicTrick, Providers};
use crate::registry::Registry;
use crate::value::SettingValue;
use serde::Serialize;

/// Kind of widget an editor should use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WidgetKind {
    Checkbutton,
    Combobox,
    Radiobutton,
    Scale { min: i64, max: i64, step: i64 },
    SearchBox,
    Entry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuiParams {
    pub widget: WidgetKind,
    pub text: Option<String>,
    pub group: Option<String>,
    pub tooltip: Option<String>,
    pub horizontal: bool,
}

impl GuiParams {
    pub fn new(widget: WidgetKind) -> Self {
        Self {
            widget,
            text: None,
            group: None,
            tooltip: None,
            horizontal: false,
        }
    }
}

/// Settings sharing one editor frame, in registry order.
#[derive(Debug)]
pub struct GuiGroup<'r> {
    pub name: &'r str,
    pub settings: Vec<&'r SettingDescriptor>,
}

/// Group every setting that has a widget, groups in first-appearance order.
///
/// Widgets without a group land in `"ungrouped"`.
pub fn layout(registry: &Registry) -> Vec<GuiGroup<'_>> {
    let mut groups: Vec<GuiGroup<'_>> = Vec::new();
    for descriptor in registry.iter() {
        let Some(gui) = descriptor.gui() else {
            continue;
        };
        let name = gui.group.as_deref().unwrap_or("ungrouped");
        match groups.iter_mut().find(|group| group.name == name) {
            Some(group) => group.settings.push(descriptor),
            None => groups.push(GuiGroup {
                name,
                settings: vec![descriptor],
            }),
        }
    }
    groups
}

/// Current state of one widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetState {
    pub name: String,
    pub value: SettingValue,
    /// False when a dependency forces the value and the widget is grayed out.
    pub enabled: bool,
}

/// Resolve the value and enabled flag of every setting for `assignment`.
///
/// Forced values come from the dependencies evaluated against the
/// assignment as given; the assignment itself is left untouched.
pub fn widget_states(registry: &Registry, assignment: &Assignment) -> Vec<WidgetState> {
    registry
        .iter()
        .map(|descriptor| match descriptor.forced_value(assignment) {
            Some(value) => WidgetState {
                name: descriptor.name().to_string(),
                value,
                enabled: false,
            },
            None => WidgetState {
                name: descriptor.name().to_string(),
                value: assignment
                    .get(descriptor.name())
                    .cloned()
                    .unwrap_or_else(|| descriptor.default().clone()),
                enabled: true,
            },
        })
        .collect()
}

/// Tooltip of an allowed-tricks entry, looked up by flag name or by the
/// text shown in the search box.
pub fn trick_tooltip(providers: &dyn Providers, entry: &str) -> Option<String> {
    providers
        .logic_tricks()
        .iter()
        .find(|trick| trick.name == entry || trick.gui_text == entry)
        .map(LogicTrick::tooltip_text)
}
