use std::collections::BTreeMap;

use crate::record::PostalCode;

pub const SEPARATOR: &str =
    "-----------------------------------------------------------------------------------------------";

/// Ordering applied when printing a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortOrder {
    /// Input order
    None,
    Zip,
    /// State, then ZIP within a state
    State,
}

/// ZIP codes at the four compass extremes of one state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateExtremes {
    pub state: String,
    pub east: u32,
    pub west: u32,
    pub north: u32,
    pub south: u32,
}

#[derive(Debug, Clone, Default)]
pub struct PostalList {
    items: Vec<PostalCode>,
}

impl PostalList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: PostalCode) {
        self.items.push(item);
    }

    /// Linear scan, first match wins.
    pub fn find_by_zip(&self, zip: u32) -> Option<&PostalCode> {
        self.items.iter().find(|item| item.zip == zip)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in the requested order. The list itself is left untouched.
    pub fn sorted(&self, order: SortOrder) -> Vec<&PostalCode> {
        let mut sorted: Vec<&PostalCode> = self.items.iter().collect();
        match order {
            SortOrder::None => {}
            SortOrder::Zip => sorted.sort_by_key(|item| item.zip),
            SortOrder::State => sorted.sort_by(|a, b| a.state.cmp(&b.state).then(a.zip.cmp(&b.zip))),
        }
        sorted
    }

    /// One table row per item, each followed by a separator line.
    pub fn format_table(&self, order: SortOrder) -> String {
        let mut out = String::new();
        for item in self.sorted(order) {
            out.push_str(&item.format_row());
            out.push('\n');
            out.push_str(SEPARATOR);
            out.push('\n');
        }
        out
    }

    /// Easternmost (greatest longitude), westernmost (least longitude),
    /// northernmost and southernmost ZIP per state, states in alphabetical
    /// order. Ties keep the earliest item.
    pub fn state_extremes(&self) -> Vec<StateExtremes> {
        let mut by_state: BTreeMap<&str, [&PostalCode; 4]> = BTreeMap::new();

        for item in &self.items {
            let slot = by_state.entry(item.state.as_str()).or_insert([item; 4]);
            let [east, west, north, south] = slot;
            if item.longitude > east.longitude {
                *east = item;
            }
            if item.longitude < west.longitude {
                *west = item;
            }
            if item.latitude > north.latitude {
                *north = item;
            }
            if item.latitude < south.latitude {
                *south = item;
            }
        }

        by_state
            .into_iter()
            .map(|(state, [east, west, north, south])| StateExtremes {
                state: state.to_string(),
                east: east.zip,
                west: west.zip,
                north: north.zip,
                south: south.zip,
            })
            .collect()
    }
}
