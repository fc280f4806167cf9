use serde::{Deserialize, Serialize};

/// One of the five tracked macro columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Macro {
    Calories,
    Fat,
    Carbohydrate,
    Sugar,
    Protein,
}

impl Macro {
    pub const ALL: [Macro; 5] = [
        Macro::Calories,
        Macro::Fat,
        Macro::Carbohydrate,
        Macro::Sugar,
        Macro::Protein,
    ];

    /// Label used in the diary, the product table header and oracle replies.
    pub fn label(self) -> &'static str {
        match self {
            Macro::Calories => "ккал",
            Macro::Fat => "жири",
            Macro::Carbohydrate => "вуглеводи",
            Macro::Sugar => "цукри",
            Macro::Protein => "білки",
        }
    }
}

/// Per-100g macro values.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct MacroProfile {
    pub calories: f64,
    pub fat: f64,
    pub carbohydrate: f64,
    pub sugar: f64,
    pub protein: f64,
}

impl MacroProfile {
    pub fn get(&self, nutrient: Macro) -> f64 {
        match nutrient {
            Macro::Calories => self.calories,
            Macro::Fat => self.fat,
            Macro::Carbohydrate => self.carbohydrate,
            Macro::Sugar => self.sugar,
            Macro::Protein => self.protein,
        }
    }

    /// Values for `weight_g` grams of the product.
    pub fn scaled(&self, weight_g: f64) -> MacroProfile {
        let factor = weight_g / 100.0;
        MacroProfile {
            calories: self.calories * factor,
            fat: self.fat * factor,
            carbohydrate: self.carbohydrate * factor,
            sugar: self.sugar * factor,
            protein: self.protein * factor,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KnownProduct {
    pub name: String,
    pub profile: MacroProfile,
    /// Canonical serving weight in grams, when the table declares one.
    pub weight_g: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRecord {
    pub name: String,
    pub profile: MacroProfile,
    pub weight_g: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScaledRecord {
    pub record: ResolvedRecord,
    pub actual: MacroProfile,
}

impl From<ResolvedRecord> for ScaledRecord {
    fn from(record: ResolvedRecord) -> Self {
        let actual = record.profile.scaled(record.weight_g);
        Self { record, actual }
    }
}

/// Sum of the actual values over every scaled record of a run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TotalsSummary {
    pub totals: MacroProfile,
}

impl TotalsSummary {
    pub fn get(&self, nutrient: Macro) -> f64 {
        self.totals.get(nutrient)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Macro, f64)> + '_ {
        Macro::ALL.into_iter().map(|m| (m, self.get(m)))
    }
}
