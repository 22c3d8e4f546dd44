//! Placement of auxiliary panels around the calendar body.
//!
//! Plugins are declared in order, each anchored to one side of the widget.
//! Resolution turns the declared list into plain [`SlotAssignment`] values that
//! tell the rendering layer where a panel goes and which of its borders touch
//! a neighbor.

use crate::consts::BORDER_CLASS_PREFIX;
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Side of the widget a plugin is anchored to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[display(fmt = "top")]
    Top,
    #[display(fmt = "bottom")]
    Bottom,
    #[display(fmt = "left")]
    Left,
    #[default]
    #[display(fmt = "right")]
    Right,
}

impl Position {
    /// Top and bottom panels stack around the whole widget; left and right
    /// panels sit beside the calendar body.
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    pub fn border_class(self) -> String {
        format!("{BORDER_CLASS_PREFIX}{self}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PluginError {
    #[error("Unknown plugin position: {0}")]
    UnknownPosition(String),
}

impl FromStr for Position {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(PluginError::UnknownPosition(other.to_owned())),
        }
    }
}

/// A declared plugin. Its order is its index in the declared list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginDescriptor {
    pub position: Position,
    pub disabled: bool,
}

impl PluginDescriptor {
    pub const fn at(position: Position) -> Self {
        Self {
            position,
            disabled: false,
        }
    }

    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// Which adjacent anchors of a panel are occupied by another active element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Neighbors {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Neighbors {
    const fn is_full(self) -> bool {
        self.top && self.bottom && self.left && self.right
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotAssignment {
    pub order: usize,
    pub position: Position,
    pub neighbors: Neighbors,
}

/// Borders drawn by one container, one per occupied anchor, in order of first
/// declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BorderSet(Vec<Position>);

impl BorderSet {
    fn collect(plugins: &[PluginDescriptor], vertical: bool) -> Self {
        let mut positions = Vec::new();
        for plugin in plugins.iter().filter(|p| !p.disabled) {
            if plugin.position.is_vertical() == vertical && !positions.contains(&plugin.position) {
                positions.push(plugin.position);
            }
        }
        Self(positions)
    }

    pub fn contains(&self, position: Position) -> bool {
        self.0.contains(&position)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Space separated class tokens, e.g. `rmdp-border-top rmdp-border-bottom`
    pub fn class_name(&self) -> String {
        self.0.iter().map(|p| p.border_class()).collect::<Vec<_>>().join(" ")
    }
}

/// Result of one resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotLayout {
    /// Borders of the outer container, from top/bottom panels
    pub outer_borders: BorderSet,
    /// Borders of the calendar body, from left/right panels
    pub inner_borders: BorderSet,
    /// One entry per enabled plugin, in declaration order
    pub assignments: Vec<SlotAssignment>,
}

impl SlotLayout {
    pub fn at(&self, position: Position) -> impl Iterator<Item = &SlotAssignment> {
        self.assignments.iter().filter(move |a| a.position == position)
    }

    pub fn assignment(&self, order: usize) -> Option<&SlotAssignment> {
        self.assignments.iter().find(|a| a.order == order)
    }
}

/// Assigns every enabled plugin to its anchor and computes its neighbors.
pub fn resolve_slots(plugins: &[PluginDescriptor]) -> SlotLayout {
    let outer_borders = BorderSet::collect(plugins, true);
    let inner_borders = BorderSet::collect(plugins, false);

    let assignments = plugins
        .iter()
        .enumerate()
        .filter(|(_, plugin)| !plugin.disabled)
        .map(|(order, plugin)| SlotAssignment {
            order,
            position: plugin.position,
            neighbors: neighbors_of(plugins, order, plugin.position, &outer_borders),
        })
        .collect();

    SlotLayout {
        outer_borders,
        inner_borders,
        assignments,
    }
}

fn neighbors_of(
    plugins: &[PluginDescriptor],
    order: usize,
    position: Position,
    outer_borders: &BorderSet,
) -> Neighbors {
    let mut neighbors = Neighbors::default();

    for (other, plugin) in plugins.iter().enumerate() {
        if plugin.disabled {
            continue;
        }
        if neighbors.is_full() {
            break;
        }

        let same_edge = plugin.position == position;
        if position.is_vertical() {
            neighbors.top |= same_edge && other < order;
            neighbors.bottom |= same_edge && other > order;
        } else {
            neighbors.top |= outer_borders.contains(Position::Top);
            neighbors.bottom |= outer_borders.contains(Position::Bottom);
            neighbors.left |= same_edge && other < order;
            neighbors.right |= same_edge && other > order;
        }
    }

    neighbors
}
