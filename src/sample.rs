//! Demo data generation.

use crate::models::{TestResult, TestStatus};
use chrono::NaiveDate;
use rand::Rng;

/// Instruments the generator draws from.
pub const SAMPLE_INSTRUMENTS: [&str; 4] = [
    "Monopolar Hook",
    "Maryland Bipolar Forceps",
    "Potts Scissors",
    "Large Needle Driver",
];

/// Default number of generated records.
pub const SAMPLE_COUNT: usize = 20;

/// First id used for generated records.
pub const SAMPLE_START_ID: u64 = 100;

const PASS_PROBABILITY: f64 = 0.7;

/// Generate `count` random February 2026 records with ids from `start_id`.
pub fn generate<R: Rng>(rng: &mut R, count: usize, start_id: u64) -> Vec<TestResult> {
    (start_id..)
        .take(count)
        .map(|id| {
            let instrument = SAMPLE_INSTRUMENTS[rng.gen_range(0..SAMPLE_INSTRUMENTS.len())];
            let status = if rng.gen_bool(PASS_PROBABILITY) {
                TestStatus::Passed
            } else {
                TestStatus::Failed
            };
            let day = rng.gen_range(1..=28);

            TestResult {
                id,
                instrument: instrument.to_string(),
                status,
                date: NaiveDate::from_ymd_opt(2026, 2, day),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FilterWindow;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let records = generate(&mut rng, SAMPLE_COUNT, SAMPLE_START_ID);

        assert_eq!(records.len(), SAMPLE_COUNT);
        assert_eq!(records[0].id, 100);
        assert_eq!(records[SAMPLE_COUNT - 1].id, 119);

        let february = FilterWindow::new(2026, 1);
        for record in &records {
            assert!(record.date.is_some_and(|d| february.contains(d)));
            assert!(SAMPLE_INSTRUMENTS.contains(&record.instrument.as_str()));
            assert_ne!(record.status, TestStatus::Pending);
        }
    }

    #[test]
    fn test_generate_is_reproducible_with_seed() {
        let first = generate(&mut StdRng::seed_from_u64(42), 10, 1);
        let second = generate(&mut StdRng::seed_from_u64(42), 10, 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_generate_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate(&mut rng, 0, 1).is_empty());
    }
}
