//! Summary aggregation over [`EquipmentRecord`]s.

use std::collections::BTreeMap;

use crate::types::{EquipmentRecord, Summary};

/// The numeric columns of an [`EquipmentRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Metric {
    Flowrate,
    Pressure,
    Temperature,
}

impl Metric {
    const ALL: [Metric; 3] = [Metric::Flowrate, Metric::Pressure, Metric::Temperature];

    fn value(self, record: &EquipmentRecord) -> f64 {
        match self {
            Metric::Flowrate => record.flowrate,
            Metric::Pressure => record.pressure,
            Metric::Temperature => record.temperature,
        }
    }
}

/// Compute the [`Summary`] of a record set.
///
/// An empty slice yields [`Summary::empty`]. The type distribution is keyed by the record's type
/// verbatim (the empty string is a valid key), so its counts always add up to `total_count`.
///
/// ```
/// use equipment_data_pipeline::processing::summarize;
/// use equipment_data_pipeline::types::EquipmentRecord;
///
/// let records = vec![
///     EquipmentRecord::new("eq-1", "Pump A", "Pump", 100.0, 5.0, 20.0),
///     EquipmentRecord::new("eq-2", "Pump B", "Pump", 200.0, 7.0, 40.0),
/// ];
/// let s = summarize(&records);
/// assert_eq!(s.total_count, 2);
/// assert_eq!(s.avg_flowrate, 150.0);
/// assert_eq!(s.type_distribution["Pump"], 2);
/// ```
pub fn summarize(records: &[EquipmentRecord]) -> Summary {
    let [flow, pressure, temp] = Metric::ALL.map(|m| MetricStats::collect(records, m));
    let (Some(flow), Some(pressure), Some(temp)) = (flow, pressure, temp) else {
        return Summary::empty();
    };

    let mut type_distribution: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        *type_distribution.entry(record.equipment_type.clone()).or_insert(0) += 1;
    }

    Summary {
        total_count: records.len(),
        avg_flowrate: flow.mean(),
        avg_pressure: pressure.mean(),
        avg_temperature: temp.mean(),
        min_flowrate: flow.min,
        max_flowrate: flow.max,
        min_pressure: pressure.min,
        max_pressure: pressure.max,
        min_temperature: temp.min,
        max_temperature: temp.max,
        type_distribution,
    }
}

#[derive(Debug, Clone, Copy)]
struct MetricStats {
    count: usize,
    sum: f64,
    min: f64,
    max: f64,
}

impl MetricStats {
    fn collect(records: &[EquipmentRecord], metric: Metric) -> Option<Self> {
        let (first, rest) = records.split_first()?;
        let v0 = metric.value(first);
        let init = Self {
            count: 1,
            sum: v0,
            min: v0,
            max: v0,
        };
        Some(rest.iter().fold(init, |acc, r| {
            let v = metric.value(r);
            Self {
                count: acc.count + 1,
                sum: acc.sum + v,
                min: pick(acc.min, v, |a, b| b < a),
                max: pick(acc.max, v, |a, b| b > a),
            }
        }))
    }

    fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

// NaN is sticky so it propagates like it does through the sum.
fn pick(current: f64, candidate: f64, better: impl Fn(f64, f64) -> bool) -> f64 {
    if current.is_nan() || candidate.is_nan() {
        f64::NAN
    } else if better(current, candidate) {
        candidate
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::summarize;
    use crate::types::{EquipmentRecord, Summary};

    fn rec(name: &str, ty: &str, f: f64, p: f64, t: f64) -> EquipmentRecord {
        EquipmentRecord::new(format!("id-{name}"), name, ty, f, p, t)
    }

    fn mixed() -> Vec<EquipmentRecord> {
        vec![
            rec("a", "Pump", 100.0, 5.0, 20.0),
            rec("b", "Reactor", 300.0, 1.0, 80.0),
            rec("c", "Pump", 200.0, 9.0, 50.0),
            rec("d", "", 0.0, 3.0, 10.0),
        ]
    }

    #[test]
    fn empty_input_yields_zero_summary() {
        let s = summarize(&[]);
        assert_eq!(s, Summary::empty());
        assert_eq!(s.total_count, 0);
        assert_eq!(s.avg_flowrate, 0.0);
        assert_eq!(s.max_temperature, 0.0);
        assert!(s.type_distribution.is_empty());
    }

    #[test]
    fn computes_mean_min_max_per_metric() {
        let s = summarize(&mixed());
        assert_eq!(s.total_count, 4);
        assert_eq!(s.avg_flowrate, 150.0);
        assert_eq!(s.min_flowrate, 0.0);
        assert_eq!(s.max_flowrate, 300.0);
        assert_eq!(s.avg_pressure, 4.5);
        assert_eq!(s.min_pressure, 1.0);
        assert_eq!(s.max_pressure, 9.0);
        assert_eq!(s.avg_temperature, 40.0);
        assert_eq!(s.min_temperature, 10.0);
        assert_eq!(s.max_temperature, 80.0);
    }

    #[test]
    fn distribution_counts_types_verbatim_and_sums_to_total() {
        let mut records = mixed();
        records.push(rec("e", "pump", 1.0, 1.0, 1.0));
        let s = summarize(&records);

        assert_eq!(s.type_distribution.get("Pump"), Some(&2));
        assert_eq!(s.type_distribution.get("pump"), Some(&1));
        assert_eq!(s.type_distribution.get(""), Some(&1));
        assert_eq!(s.distribution_total(), s.total_count);
    }

    #[test]
    fn distribution_sum_matches_count_across_sizes() {
        let types = ["Pump", "Valve", "", "Reactor"];
        for n in 1..40 {
            let records: Vec<EquipmentRecord> = (0..n)
                .map(|i| rec(&i.to_string(), types[i % types.len()], i as f64, 1.0, 2.0))
                .collect();
            let s = summarize(&records);
            assert_eq!(s.distribution_total(), n);
            assert_eq!(s.total_count, n);
        }
    }

    #[test]
    fn single_record_min_equals_max() {
        let s = summarize(&[rec("a", "Pump", 100.0, 5.0, 20.0)]);
        assert_eq!(s.min_flowrate, s.max_flowrate);
        assert_eq!(s.min_pressure, s.max_pressure);
        assert_eq!(s.min_temperature, s.max_temperature);
        assert_eq!(s.avg_flowrate, 100.0);
    }

    #[test]
    fn nan_propagates_into_statistics() {
        let records = vec![
            rec("a", "Pump", 1.0, 1.0, 1.0),
            rec("b", "Pump", f64::NAN, 1.0, 1.0),
        ];
        let s = summarize(&records);
        assert!(s.avg_flowrate.is_nan());
        assert!(s.min_flowrate.is_nan());
        assert!(s.max_flowrate.is_nan());
        assert_eq!(s.avg_pressure, 1.0);
    }
}
