use serde::Serialize;
use std::path::Path;

use crate::error::Result;
use crate::models::{ScaledRecord, TotalsSummary};

pub const TOTALS_ROW_NAME: &str = "Разом";

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Prints the recognized products and the totals.
pub fn render_report(scaled: &[ScaledRecord], totals: &TotalsSummary) {
    if scaled.is_empty() {
        println!("Жодного продукту не розпізнано.");
        return;
    }

    let width = scaled
        .iter()
        .map(|s| s.record.name.chars().count())
        .max()
        .unwrap_or(10)
        .max(5);

    println!();
    println!("=== Розпізнаний список продуктів ===");
    println!();
    println!(
        "{:>3}  {:<width$} {:>7} | {:>8} {:>7} {:>7} {:>7} {:>7}",
        "#", "назва", "вага", "ккал", "жири", "вуглев.", "цукри", "білки",
        width = width
    );
    for (i, item) in scaled.iter().enumerate() {
        let a = &item.actual;
        println!(
            "{:>3}. {:<width$} {:>6.0}г | {:>8.2} {:>7.2} {:>7.2} {:>7.2} {:>7.2}",
            i + 1,
            item.record.name,
            item.record.weight_g,
            a.calories,
            a.fat,
            a.carbohydrate,
            a.sugar,
            a.protein,
            width = width
        );
    }

    println!();
    println!("--- Сумарні значення на всі продукти ---");
    for (nutrient, value) in totals.iter() {
        println!("{:<10} {:>10.2}", nutrient.label(), round2(value));
    }
    println!();
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "назва")]
    name: &'a str,
    #[serde(rename = "ккал")]
    calories: Option<f64>,
    #[serde(rename = "жири")]
    fat: Option<f64>,
    #[serde(rename = "вуглеводи")]
    carbohydrate: Option<f64>,
    #[serde(rename = "цукри")]
    sugar: Option<f64>,
    #[serde(rename = "білки")]
    protein: Option<f64>,
    #[serde(rename = "вага")]
    weight_g: Option<f64>,
    #[serde(rename = "ккал_факт")]
    calories_actual: f64,
    #[serde(rename = "жири_факт")]
    fat_actual: f64,
    #[serde(rename = "вуглеводи_факт")]
    carbohydrate_actual: f64,
    #[serde(rename = "цукри_факт")]
    sugar_actual: f64,
    #[serde(rename = "білки_факт")]
    protein_actual: f64,
}

/// Writes one row per scaled record followed by a totals row.
pub fn export_csv(path: &Path, scaled: &[ScaledRecord], totals: &TotalsSummary) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    for item in scaled {
        let p = &item.record.profile;
        let a = &item.actual;
        writer.serialize(ExportRow {
            name: &item.record.name,
            calories: Some(p.calories),
            fat: Some(p.fat),
            carbohydrate: Some(p.carbohydrate),
            sugar: Some(p.sugar),
            protein: Some(p.protein),
            weight_g: Some(item.record.weight_g),
            calories_actual: a.calories,
            fat_actual: a.fat,
            carbohydrate_actual: a.carbohydrate,
            sugar_actual: a.sugar,
            protein_actual: a.protein,
        })?;
    }

    let t = &totals.totals;
    writer.serialize(ExportRow {
        name: TOTALS_ROW_NAME,
        calories: None,
        fat: None,
        carbohydrate: None,
        sugar: None,
        protein: None,
        weight_g: None,
        calories_actual: t.calories,
        fat_actual: t.fat,
        carbohydrate_actual: t.carbohydrate,
        sugar_actual: t.sugar,
        protein_actual: t.protein,
    })?;

    writer.flush()?;
    Ok(())
}
