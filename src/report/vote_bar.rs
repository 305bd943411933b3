//! Consensus vote bar
//!
//! Pure computation over a voting session already fetched from the backend:
//! counts, rounded percentages and the position of the threshold marker on a
//! fixed-width bar. Nothing here talks to the bridge.

use std::collections::BTreeMap;

use console::style;
use serde_json::Value;

use crate::bridge::Data;

/// Default bar width in characters
pub const DEFAULT_BAR_WIDTH: usize = 40;

const FILLED: char = '█';
const EMPTY: char = '░';
const MARKER: char = '┃';

/// Tally of one voting session
#[derive(Debug, Clone, PartialEq)]
pub struct VoteTally {
    votes: BTreeMap<String, bool>,
    threshold: f64,
    bar_width: usize,
}

impl VoteTally {
    /// Build a tally. A zero bar width is bumped to one character.
    pub fn new(votes: BTreeMap<String, bool>, threshold: f64, bar_width: usize) -> Self {
        Self {
            votes,
            threshold,
            bar_width: bar_width.max(1),
        }
    }

    /// Read `{ votes: {participant: bool}, threshold: number }` from a
    /// `swarm.consensus` payload.
    pub fn from_data(data: &Data, bar_width: usize) -> Result<Self, String> {
        let votes = match data.get("votes") {
            Some(Value::Object(map)) => map
                .iter()
                .map(|(participant, vote)| match vote {
                    Value::Bool(b) => Ok((participant.clone(), *b)),
                    other => Err(format!(
                        "vote of `{}` must be a boolean, got {}",
                        participant, other
                    )),
                })
                .collect::<Result<BTreeMap<_, _>, _>>()?,
            Some(Value::Null) | None => BTreeMap::new(),
            Some(other) => return Err(format!("`votes` must be a mapping, got {}", other)),
        };

        let threshold = data
            .get("threshold")
            .and_then(Value::as_f64)
            .ok_or_else(|| "`threshold` must be a number".to_string())?;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(format!("threshold {} is outside [0, 1]", threshold));
        }

        Ok(Self::new(votes, threshold, bar_width))
    }

    pub fn votes(&self) -> &BTreeMap<String, bool> {
        &self.votes
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn bar_width(&self) -> usize {
        self.bar_width
    }

    pub fn yes_count(&self) -> usize {
        self.votes.values().filter(|&&v| v).count()
    }

    pub fn no_count(&self) -> usize {
        self.votes.len() - self.yes_count()
    }

    pub fn total(&self) -> usize {
        self.votes.len()
    }

    /// `round(100 * yes / total)`, 0 when nobody voted
    pub fn yes_percent(&self) -> u32 {
        percent(self.yes_count(), self.total())
    }

    /// `round(100 * no / total)`, 0 when nobody voted
    pub fn no_percent(&self) -> u32 {
        percent(self.no_count(), self.total())
    }

    /// `round(threshold * bar_width)`, clamped to `[0, bar_width - 1]`
    pub fn marker_index(&self) -> usize {
        let raw = (self.threshold * self.bar_width as f64).round().max(0.0) as usize;
        raw.min(self.bar_width - 1)
    }

    /// Whether the yes share has reached the threshold
    pub fn reaches_threshold(&self) -> bool {
        let total = self.total();
        total > 0 && self.yes_count() as f64 / total as f64 >= self.threshold
    }

    /// Number of filled cells: the yes share of the bar width
    pub fn filled_cells(&self) -> usize {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        let cells = (self.yes_count() as f64 / total as f64 * self.bar_width as f64).round();
        (cells as usize).min(self.bar_width)
    }

    /// Plain-text bar with the threshold marker in place
    pub fn bar(&self) -> String {
        let filled = self.filled_cells();
        let marker = self.marker_index();
        (0..self.bar_width)
            .map(|i| {
                if i == marker {
                    MARKER
                } else if i < filled {
                    FILLED
                } else {
                    EMPTY
                }
            })
            .collect()
    }

    /// Print the tally with a colored bar
    pub fn display(&self, title: &str) {
        println!();
        println!(
            "    {} {}",
            style("🗳").cyan(),
            style(title.to_uppercase()).white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());

        let bar: String = self
            .bar()
            .chars()
            .map(|c| match c {
                FILLED => style(c).green().to_string(),
                MARKER => style(c).yellow().bold().to_string(),
                _ => style(c).dim().to_string(),
            })
            .collect();
        println!("    {}", bar);
        println!(
            "    {} yes ({}%)  {} no ({}%)  threshold {:.0}%",
            style(self.yes_count()).green().bold(),
            self.yes_percent(),
            style(self.no_count()).red().bold(),
            self.no_percent(),
            self.threshold * 100.0
        );

        let verdict = if self.reaches_threshold() {
            style("threshold reached").green()
        } else {
            style("threshold not reached").yellow()
        };
        println!("    {}", verdict);

        for (participant, vote) in &self.votes {
            let mark = if *vote {
                style("yes").green()
            } else {
                style("no").red()
            };
            println!("      {} {:<24} {}", style("•").dim(), participant, mark);
        }
    }
}

fn percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        0
    } else {
        (100.0 * count as f64 / total as f64).round() as u32
    }
}
