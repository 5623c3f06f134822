// ABOUTME: HorseRecord, the fixed-shape output of one scraped fact sheet.
// ABOUTME: All seven keys are always present; missing facts stay as empty strings.

use serde::{Deserialize, Serialize};

/// Record keys in their canonical column order.
pub const RECORD_KEYS: [&str; 7] = ["Name", "Gains", "Courues", "Victoires", "Placés", "Sexe", "Age"];

/// The fact-table keys (every record key except `Name`).
pub const FACT_KEYS: [&str; 6] = ["Gains", "Courues", "Victoires", "Placés", "Sexe", "Age"];

/// One horse's normalized facts.
///
/// Serde names follow the column headers, so the struct reads back from the
/// record CSV as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorseRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Gains")]
    pub gains: String,
    #[serde(rename = "Courues")]
    pub courues: String,
    #[serde(rename = "Victoires")]
    pub victoires: String,
    #[serde(rename = "Placés")]
    pub places: String,
    #[serde(rename = "Sexe")]
    pub sexe: String,
    #[serde(rename = "Age")]
    pub age: String,
}

impl HorseRecord {
    /// A record with every field empty and the given display name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Looks up a field by its record key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.slot(key).map(String::as_str)
    }

    /// Sets a field by its record key. Returns false for keys outside the record.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        match self.slot_mut(key) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Field values in `RECORD_KEYS` order.
    pub fn values(&self) -> [&str; 7] {
        [
            &self.name,
            &self.gains,
            &self.courues,
            &self.victoires,
            &self.places,
            &self.sexe,
            &self.age,
        ]
    }

    /// Mutable access to the six fact fields, paired with their keys.
    pub fn facts_mut(&mut self) -> [(&'static str, &mut String); 6] {
        [
            ("Gains", &mut self.gains),
            ("Courues", &mut self.courues),
            ("Victoires", &mut self.victoires),
            ("Placés", &mut self.places),
            ("Sexe", &mut self.sexe),
            ("Age", &mut self.age),
        ]
    }

    fn slot(&self, key: &str) -> Option<&String> {
        match key {
            "Name" => Some(&self.name),
            "Gains" => Some(&self.gains),
            "Courues" => Some(&self.courues),
            "Victoires" => Some(&self.victoires),
            "Placés" => Some(&self.places),
            "Sexe" => Some(&self.sexe),
            "Age" => Some(&self.age),
            _ => None,
        }
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "Name" => Some(&mut self.name),
            "Gains" => Some(&mut self.gains),
            "Courues" => Some(&mut self.courues),
            "Victoires" => Some(&mut self.victoires),
            "Placés" => Some(&mut self.places),
            "Sexe" => Some(&mut self.sexe),
            "Age" => Some(&mut self.age),
            _ => None,
        }
    }
}
