// ABOUTME: Normalizer merging raw fact pairs into a HorseRecord and cleaning field values.
// ABOUTME: Cleaning maps the "-" placeholder to "0" and strips the "ans" and "€" units.

use tracing::debug;

use crate::detail::FactPair;
use crate::record::HorseRecord;

const PLACEHOLDER: &str = "-";
const AGE_UNIT: &str = "ans";
const CURRENCY: &str = "€";

/// Record key for a label: its first whitespace-delimited token.
///
/// `"Gains actuel"` is keyed as `Gains`.
pub fn record_key(label: &str) -> &str {
    label.split_whitespace().next().unwrap_or("")
}

/// Merges pairs into `record` by key. Later pairs overwrite earlier ones;
/// labels whose key is not a record field are ignored.
pub fn merge(record: &mut HorseRecord, pairs: impl IntoIterator<Item = FactPair>) {
    for pair in pairs {
        let key = record_key(&pair.label);
        if key == "Name" || !record.set(key, pair.value) {
            debug!(label = %pair.label.trim(), "label does not map to a record field");
        }
    }
}

/// Cleans every fact field of `record` in place. The name is left untouched.
pub fn clean(record: &mut HorseRecord) {
    for (_, value) in record.facts_mut() {
        clean_value(value);
    }
}

/// Cleans one value until no rule applies any more.
///
/// Each step applies the first matching rule:
/// 1. exactly `-` becomes `0`
/// 2. otherwise every `ans` is removed
/// 3. otherwise every `€` is removed
///
/// Repeating to a fixed point makes the pass idempotent even for inputs
/// like `-ans` (→ `-` → `0`).
pub fn clean_value(value: &mut String) {
    while let Some(next) = clean_step(value) {
        *value = next;
    }
}

fn clean_step(value: &str) -> Option<String> {
    if value == PLACEHOLDER {
        Some("0".to_string())
    } else if value.contains(AGE_UNIT) {
        Some(value.replace(AGE_UNIT, ""))
    } else if value.contains(CURRENCY) {
        Some(value.replace(CURRENCY, ""))
    } else {
        None
    }
}

/// Builds a cleaned record from a name and the page's fact pairs.
pub fn normalize(name: impl Into<String>, pairs: impl IntoIterator<Item = FactPair>) -> HorseRecord {
    let mut record = HorseRecord::named(name);
    merge(&mut record, pairs);
    clean(&mut record);
    record
}
