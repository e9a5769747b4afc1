use std::fmt::Write;

use serde::Serialize;

use crate::catalog::{Catalog, SystemId};
use crate::route::Route;

/// Presentation style for turning an [`ItinerarySummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItineraryRenderMode {
    PlainText,
    /// Compact listing suitable for pasting into an in-game note.
    Note,
}

/// Step taken during traversal of a planned itinerary.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ItineraryStep {
    pub index: usize,
    pub id: SystemId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faction: Option<String>,
    /// Seconds from the route start to this step.
    pub travel_time: f64,
    /// Seconds spent on the hop arriving at this step.
    pub hop_time: f64,
}

impl ItineraryStep {
    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unknown>")
    }
}

/// Structured representation of a flattened route that higher-level
/// consumers can serialise or render.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ItinerarySummary {
    /// The stop list rendered as "A > B > C".
    pub itinerary: String,
    pub hops: usize,
    pub total_time: f64,
    /// False when the last sync recorded a pathing failure; `steps` then
    /// holds the valid prefix only.
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub steps: Vec<ItineraryStep>,
}

impl ItinerarySummary {
    /// Resolve a route's flattened path against the catalog.
    pub fn from_route(catalog: &Catalog, route: &Route) -> Self {
        let nodes = route.current_route();
        let mut steps = Vec::with_capacity(nodes.len());
        let mut previous_time = 0.0;
        for (index, node) in nodes.iter().enumerate() {
            let system = catalog.system(node.system);
            steps.push(ItineraryStep {
                index,
                id: node.system,
                name: system.map(|system| system.name.clone()),
                faction: system
                    .and_then(|system| system.faction)
                    .and_then(|faction| catalog.faction(faction))
                    .map(|faction| faction.name.clone()),
                travel_time: node.travel_time,
                hop_time: node.travel_time - previous_time,
            });
            previous_time = node.travel_time;
        }

        Self {
            itinerary: route.to_string(),
            hops: steps.len().saturating_sub(1),
            total_time: route.total_time(),
            complete: route.last_error().is_none(),
            status: route.last_error().map(|error| error.to_string()),
            steps,
        }
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: ItineraryRenderMode) -> String {
        match mode {
            ItineraryRenderMode::PlainText => self.render_plain(),
            ItineraryRenderMode::Note => self.render_note(),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Route: {} ({} hops, {})",
            self.itinerary,
            self.hops,
            format_duration(self.total_time)
        );
        for step in &self.steps {
            let faction = step
                .faction
                .as_deref()
                .map(|name| format!(" [{name}]"))
                .unwrap_or_default();
            let _ = writeln!(
                buffer,
                "{:>3}: {} ({}){} +{}",
                step.index,
                step.display_name(),
                step.id,
                faction,
                format_duration(step.hop_time)
            );
        }
        if let Some(status) = &self.status {
            let _ = writeln!(buffer, "No route possible: {status}");
        }
        buffer
    }

    fn render_note(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(buffer, "{}", self.itinerary);
        for step in &self.steps {
            let _ = writeln!(buffer, "{}", step.display_name());
        }
        if let Some(status) = &self.status {
            let _ = writeln!(buffer, "(incomplete: {status})");
        }
        buffer
    }
}

/// Render a duration in seconds as a compact `1h 02m 03s` style string.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.round().max(0.0) as i64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m {secs:02}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs:02}s")
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(0.0), "0s");
        assert_eq!(format_duration(59.4), "59s");
        assert_eq!(format_duration(75.0), "1m 15s");
        assert_eq!(format_duration(3723.0), "1h 02m 03s");
    }
}
