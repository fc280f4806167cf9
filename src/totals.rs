use crate::models::{MacroProfile, ResolvedRecord, ScaledRecord, TotalsSummary};

/// Scales every record to its effective weight and sums each macro column.
///
/// No rounding happens here; the report rounds for display.
pub fn compute_totals(records: &[ResolvedRecord]) -> (Vec<ScaledRecord>, TotalsSummary) {
    let scaled: Vec<ScaledRecord> = records.iter().cloned().map(ScaledRecord::from).collect();

    let mut totals = MacroProfile::default();
    for item in &scaled {
        macro_rules! add_actual {
            ($field:ident) => {
                totals.$field += item.actual.$field;
            };
        }
        add_actual!(calories);
        add_actual!(fat);
        add_actual!(carbohydrate);
        add_actual!(sugar);
        add_actual!(protein);
    }

    (scaled, TotalsSummary { totals })
}
