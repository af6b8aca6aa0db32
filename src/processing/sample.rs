//! Synthetic equipment records for demo flows.
//!
//! Values are random, so nothing consistency-sensitive should be built on them.

use rand::Rng;

use crate::types::EquipmentRecord;

/// Number of records in a generated sample batch.
pub const SAMPLE_SIZE: usize = 25;

/// Source label recorded in history for sample batches.
pub const SAMPLE_LABEL: &str = "sample_equipment_data.csv";

const EQUIPMENT_TYPES: [&str; 6] = [
    "Pump",
    "Reactor",
    "Heat Exchanger",
    "Distillation Column",
    "Compressor",
    "Separator",
];

const PREFIXES: [&str; 5] = ["Primary", "Secondary", "Auxiliary", "Main", "Backup"];

/// Generate [`SAMPLE_SIZE`] records using the thread-local RNG.
pub fn generate_sample() -> Vec<EquipmentRecord> {
    generate_sample_with(&mut rand::thread_rng(), SAMPLE_SIZE)
}

/// Generate `n` records from `rng`.
///
/// Names are `<prefix> <type> <NNN>`; the zero-padded index keeps them unique within the batch
/// regardless of which prefix and type were drawn. Numbers are rounded to 2 decimals from
/// flowrate `[100, 1100)`, pressure `[1, 51)` and temperature `[20, 320)`.
pub fn generate_sample_with<R: Rng>(rng: &mut R, n: usize) -> Vec<EquipmentRecord> {
    (1..=n)
        .map(|i| {
            let equipment_type = EQUIPMENT_TYPES[rng.gen_range(0..EQUIPMENT_TYPES.len())];
            let prefix = PREFIXES[rng.gen_range(0..PREFIXES.len())];
            EquipmentRecord {
                id: format!("eq-{i}"),
                equipment_name: format!("{prefix} {equipment_type} {i:03}"),
                equipment_type: equipment_type.to_string(),
                flowrate: round2(rng.gen_range(100.0..1100.0)),
                pressure: round2(rng.gen_range(1.0..51.0)),
                temperature: round2(rng.gen_range(20.0..320.0)),
            }
        })
        .collect()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{generate_sample, generate_sample_with, EQUIPMENT_TYPES, SAMPLE_SIZE};

    #[test]
    fn batches_have_fixed_size_and_unique_names() {
        for _ in 0..2 {
            let batch = generate_sample();
            assert_eq!(batch.len(), SAMPLE_SIZE);
            let names: HashSet<&str> = batch.iter().map(|r| r.equipment_name.as_str()).collect();
            assert_eq!(names.len(), SAMPLE_SIZE);
        }
    }

    #[test]
    fn values_stay_in_range_with_two_decimals() {
        let mut rng = StdRng::seed_from_u64(7);
        for r in generate_sample_with(&mut rng, 500) {
            assert!((100.0..=1100.0).contains(&r.flowrate));
            assert!((1.0..=51.0).contains(&r.pressure));
            assert!((20.0..=320.0).contains(&r.temperature));
            assert!(((r.flowrate * 100.0).round() - r.flowrate * 100.0).abs() < 1e-6);
            assert!(EQUIPMENT_TYPES.contains(&r.equipment_type.as_str()));
        }
    }

    #[test]
    fn names_embed_type_and_padded_index() {
        let mut rng = StdRng::seed_from_u64(1);
        let batch = generate_sample_with(&mut rng, 12);
        assert!(batch[0].equipment_name.ends_with(" 001"));
        assert!(batch[11].equipment_name.ends_with(" 012"));
        assert!(batch[0].equipment_name.contains(&batch[0].equipment_type));
        assert_eq!(batch[11].id, "eq-12");
    }

    #[test]
    fn same_seed_same_batch() {
        let a = generate_sample_with(&mut StdRng::seed_from_u64(42), 5);
        let b = generate_sample_with(&mut StdRng::seed_from_u64(42), 5);
        assert_eq!(a, b);
    }
}
