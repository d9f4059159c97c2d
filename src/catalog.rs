//! Instrument catalog.
//!
//! The static list of tracked surgical instruments, grouped by category,
//! plus short descriptions for the most common ones.

use crate::models::{CatalogEntry, CategoryListing};
use std::collections::HashMap;

const CAUTERY: &str = "Cautery Instruments";
const FORCEPS: &str = "Forceps and Retractors";
const SCISSORS: &str = "Specialty Scissors";
const NEEDLE_DRIVERS: &str = "Needle Drivers & Others";

const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    (
        CAUTERY,
        &[
            "Monopolar Hook",
            "Monopolar Spatula",
            "Mini Cautery Hook",
            "Mini Cautery Spatula",
            "Harmonic Scalpel",
            "Xpert Seal",
            "SeliCut Pro",
        ],
    ),
    (
        FORCEPS,
        &[
            "Maryland Bipolar Forceps",
            "Fenestrated Bipolar Forceps",
            "Black Diamond Micro Forceps",
            "DeBakey Forceps",
            "Prograsp Forceps",
            "Tenaculum Forceps",
            "Grasping Retractor",
            "Long Tip Forceps",
            "Cadiere Forceps",
            "Atrial Retractor Short Right",
            "Atrial Retractor Dual Blade",
            "Resano Forceps",
            "Cardiac Stabilizer",
            "Cardiac Bipolar Forceps",
            "Small Grasping Retractor",
            "Cobra Forceps",
            "Cardiac Probe Grasper",
            "Tipup Fenestrated Retractor",
            "Long Bipolar Grasper",
            "Mini Grasper",
            "Mini Bipolar Forceps",
            "Fine Tissue Forceps",
            "Maryland Dissector",
        ],
    ),
    (
        SCISSORS,
        &[
            "Potts Scissors",
            "Round Tip Scissors",
            "Monopolar Curved Scissors",
            "Curved Cold Scissors",
            "Mini Curved Scissor",
        ],
    ),
    (
        NEEDLE_DRIVERS,
        &[
            "Large Needle Driver",
            "Mega Needle Driver",
            "Micro Needle Driver",
            "Ultra Needle Driver",
            "Sevana Cut Needle Driver",
            "Super SeVana(TM) Cut Needle Driver",
            "Small Titanium Clip Applier",
            "Small Polymer Clip Applier",
            "Extra Titanium Clip Applier",
            "Medium Titanium Clip Applier",
            "Medium Polymer Clip Applier",
            "Large Polymer Clip Applier",
            "Multifire Stapler 60",
            "Multifire Stapler 45",
            "Knife",
            "Coronary_Connector",
        ],
    ),
];

const DEFAULT_DESCRIPTIONS: &[(&str, &str)] = &[
    ("Monopolar Hook", "Precision cutting & coagulation"),
    ("Maryland Bipolar Forceps", "Gentle tissue handling with bipolar capability"),
    ("Fenestrated Bipolar Forceps", "Fenestrated design for improved depth perception"),
    ("Potts Scissors", "Angled blades for precise cutting in tight spaces"),
    ("Large Needle Driver", "Heavy-duty suturing instrument"),
    ("Black Diamond Micro Forceps", "Diamond-coated for superior grip"),
    ("Harmonic Scalpel", "Ultrasonic cutting and coagulation device"),
    ("Prograsp Forceps", "Advanced grasping instrument with self-centering design"),
    ("Cardiac Stabilizer", "Specialized cardiac procedure instrument"),
    ("Micro Needle Driver", "Precision micro-suturing instrument"),
    ("Small Titanium Clip Applier", "Titanium clip application system"),
];

/// What the catalog documents about one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstrumentInfo<'a> {
    pub description: &'a str,
    pub category: &'a str,
}

/// Instruments grouped by category, in display order.
#[derive(Debug, Clone)]
pub struct InstrumentCatalog {
    categories: Vec<(String, Vec<String>)>,
    descriptions: HashMap<String, String>,
}

impl Default for InstrumentCatalog {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES
                .iter()
                .map(|(name, items)| {
                    (
                        name.to_string(),
                        items.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
                    )
                })
                .collect(),
            descriptions: DEFAULT_DESCRIPTIONS
                .iter()
                .map(|(label, desc)| (label.to_string(), desc.to_string()))
                .collect(),
        }
    }
}

impl InstrumentCatalog {
    /// Category names in display order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|(name, _)| name.as_str())
    }

    /// All instruments, flattened in category order.
    pub fn instruments(&self) -> Vec<String> {
        self.categories
            .iter()
            .flat_map(|(_, items)| items.iter().cloned())
            .collect()
    }

    /// Category containing `instrument`, if any.
    pub fn category_of(&self, instrument: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|(_, items)| items.iter().any(|i| i == instrument))
            .map(|(name, _)| name.as_str())
    }

    /// Short description for a documented instrument.
    pub fn description(&self, instrument: &str) -> Option<&str> {
        self.descriptions.get(instrument).map(String::as_str)
    }

    /// Description and category of a documented instrument.
    pub fn metadata(&self, instrument: &str) -> Option<InstrumentInfo<'_>> {
        Some(InstrumentInfo {
            description: self.description(instrument)?,
            category: self.category_of(instrument)?,
        })
    }

    /// Number of instruments across all categories.
    pub fn len(&self) -> usize {
        self.categories.iter().map(|(_, items)| items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if `label` names an instrument or a category.
    pub fn is_known(&self, label: &str) -> bool {
        self.category_names().any(|name| name == label) || self.category_of(label).is_some()
    }

    /// The catalog as report sections, descriptions attached.
    pub fn categories(&self) -> Vec<CategoryListing> {
        self.categories
            .iter()
            .map(|(name, items)| CategoryListing {
                name: name.clone(),
                instruments: items
                    .iter()
                    .map(|label| CatalogEntry {
                        name: label.clone(),
                        description: self.description(label).map(str::to_string),
                    })
                    .collect(),
            })
            .collect()
    }
}
