use async_trait::async_trait;
use food_diary::log_processor::{process_food_log, read_food_log};
use food_diary::models::{Macro, MacroProfile};
use food_diary::oracle::{NutritionOracle, OracleError};
use food_diary::products::load_known_products;
use food_diary::resolver::ProductResolver;
use food_diary::totals::compute_totals;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// Answers from a fixed map; unknown names fail like an unreachable backend.
struct MapOracle {
    answers: HashMap<String, MacroProfile>,
    calls: Mutex<Vec<String>>,
}

impl MapOracle {
    fn new(answers: &[(&str, MacroProfile)]) -> Self {
        Self {
            answers: answers
                .iter()
                .map(|(name, profile)| (name.to_string(), *profile))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl NutritionOracle for MapOracle {
    async fn lookup(&self, product_name: &str) -> Result<Option<MacroProfile>, OracleError> {
        self.calls.lock().unwrap().push(product_name.to_string());
        self.answers
            .get(product_name)
            .copied()
            .map(Some)
            .ok_or_else(|| OracleError::Malformed("no numbers in reply".to_string()))
    }
}

fn products_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "назва,ккал,жири,вуглеводи,цукри,білки,вага").unwrap();
    writeln!(file, "банан,89,0.3,22.8,12.2,1.1,118").unwrap();
    writeln!(file, "Гречка варена,92,0.6,20,0.9,3.4,").unwrap();
    writeln!(file, "Гречка сира,313,2.5,62,0.9,12.6,").unwrap();
    file.flush().unwrap();
    file
}

fn unknown_profile() -> MacroProfile {
    MacroProfile {
        calories: 200.0,
        fat: 10.0,
        carbohydrate: 20.0,
        sugar: 5.0,
        protein: 8.0,
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[tokio::test]
async fn test_structured_line_scenario() {
    let csv = products_csv();
    let table = load_known_products(csv.path()).unwrap();
    let oracle = MapOracle::new(&[]);
    let resolver = ProductResolver::new(&table, &oracle);

    let lines = ["яблуко 150 ккал жири:0.3г вуглеводи:14г цукри:10г білки:0.4г 150г"];
    let records = process_food_log(&lines, &resolver).await;

    assert_eq!(records.len(), 1);
    let apple = &records[0];
    assert_eq!(apple.name, "яблуко");
    assert_eq!(
        apple.profile,
        MacroProfile {
            calories: 150.0,
            fat: 0.3,
            carbohydrate: 14.0,
            sugar: 10.0,
            protein: 0.4,
        }
    );
    assert_eq!(apple.weight_g, 150.0);
    assert!(oracle.calls().is_empty());
}

#[tokio::test]
async fn test_table_weight_overrides_diary_weight() {
    let csv = products_csv();
    let table = load_known_products(csv.path()).unwrap();
    let oracle = MapOracle::new(&[]);
    let resolver = ProductResolver::new(&table, &oracle);

    let records = process_food_log(&["банан 120"], &resolver).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].weight_g, 118.0);
    assert_eq!(records[0].profile.calories, 89.0);
}

#[tokio::test]
async fn test_oracle_fallback_defaults_to_100g() {
    let csv = products_csv();
    let table = load_known_products(csv.path()).unwrap();
    let oracle = MapOracle::new(&[("невідомий продукт", unknown_profile())]);
    let resolver = ProductResolver::new(&table, &oracle);

    let records = process_food_log(&["Невідомий продукт"], &resolver).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "невідомий продукт");
    assert_eq!(records[0].weight_g, 100.0);
    assert_eq!(records[0].profile, unknown_profile());
    assert_eq!(oracle.calls(), vec!["невідомий продукт"]);
}

#[tokio::test]
async fn test_blank_lines_contribute_nothing() {
    let csv = products_csv();
    let table = load_known_products(csv.path()).unwrap();
    let oracle = MapOracle::new(&[]);
    let resolver = ProductResolver::new(&table, &oracle);

    let records = process_food_log(&["", "    ", "\t"], &resolver).await;
    assert!(records.is_empty());
    assert!(oracle.calls().is_empty());

    let (scaled, totals) = compute_totals(&records);
    assert!(scaled.is_empty());
    assert!(totals.iter().all(|(_, value)| value == 0.0));
}

#[tokio::test]
async fn test_oracle_failure_skips_only_that_line() {
    let csv = products_csv();
    let table = load_known_products(csv.path()).unwrap();
    let oracle = MapOracle::new(&[]);
    let resolver = ProductResolver::new(&table, &oracle);

    let lines = ["кавун 300", "гречка 200"];
    let records = process_food_log(&lines, &resolver).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Гречка варена");
    assert_eq!(records[0].weight_g, 200.0);
    assert_eq!(oracle.calls(), vec!["кавун"]);
}

#[tokio::test]
async fn test_every_miss_calls_the_oracle() {
    let csv = products_csv();
    let table = load_known_products(csv.path()).unwrap();
    let oracle = MapOracle::new(&[("хумус", unknown_profile())]);
    let resolver = ProductResolver::new(&table, &oracle);

    let records = process_food_log(&["хумус 50", "хумус 30г"], &resolver).await;
    let weights: Vec<f64> = records.iter().map(|r| r.weight_g).collect();
    assert_eq!(weights, vec![50.0, 30.0]);
    assert_eq!(oracle.calls(), vec!["хумус", "хумус"]);
}

#[tokio::test]
async fn test_header_only_table_sends_everything_to_oracle() {
    let mut csv = NamedTempFile::new().unwrap();
    writeln!(csv, "назва,ккал,жири,вуглеводи,цукри,білки,вага").unwrap();
    csv.flush().unwrap();

    let table = load_known_products(csv.path()).unwrap();
    assert!(table.is_empty());
    let oracle = MapOracle::new(&[("банан", unknown_profile())]);
    let resolver = ProductResolver::new(&table, &oracle);

    let lines = [
        "банан 120",
        "яблуко 52 ккал жири:0.2г вуглеводи:14г цукри:10г білки:0.3г 200г",
    ];
    let records = process_food_log(&lines, &resolver).await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "банан");
    assert_eq!(records[0].weight_g, 120.0);
    assert_eq!(records[0].profile, unknown_profile());
    assert_eq!(records[1].name, "яблуко");
    assert_eq!(oracle.calls(), vec!["банан"]);
}

#[tokio::test]
async fn test_zero_diary_weight_keeps_table_weight() {
    let csv = products_csv();
    let table = load_known_products(csv.path()).unwrap();
    let oracle = MapOracle::new(&[]);
    let resolver = ProductResolver::new(&table, &oracle);

    let records = process_food_log(&["банан 0"], &resolver).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "банан");
    assert_eq!(records[0].weight_g, 118.0);
    assert!(oracle.calls().is_empty());
}

#[tokio::test]
async fn test_full_diary_totals() {
    let csv = products_csv();
    let table = load_known_products(csv.path()).unwrap();
    let oracle = MapOracle::new(&[("хумус", unknown_profile())]);
    let resolver = ProductResolver::new(&table, &oracle);

    let mut diary = NamedTempFile::new().unwrap();
    writeln!(diary, "яблуко 52 ккал жири:0.2г вуглеводи:14г цукри:10г білки:0.3г 200г").unwrap();
    writeln!(diary).unwrap();
    writeln!(diary, "Банан 90").unwrap();
    writeln!(diary, "гречка варена 150г").unwrap();
    writeln!(diary, "хумус 50").unwrap();
    writeln!(diary, "кавун").unwrap();
    diary.flush().unwrap();

    let lines = read_food_log(diary.path()).await.unwrap();
    let records = process_food_log(&lines, &resolver).await;
    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["яблуко", "банан", "Гречка варена", "хумус"]);

    let (scaled, totals) = compute_totals(&records);
    assert_eq!(scaled.len(), 4);
    for item in &scaled {
        for nutrient in Macro::ALL {
            assert!(approx(
                item.actual.get(nutrient),
                item.record.profile.get(nutrient) * item.record.weight_g / 100.0
            ));
        }
    }

    let expected_kcal = 52.0 * 2.0 + 89.0 * 1.18 + 92.0 * 1.5 + 200.0 * 0.5;
    assert!(approx(totals.get(Macro::Calories), expected_kcal));
    let expected_protein = 0.3 * 2.0 + 1.1 * 1.18 + 3.4 * 1.5 + 8.0 * 0.5;
    assert!(approx(totals.get(Macro::Protein), expected_protein));
}
