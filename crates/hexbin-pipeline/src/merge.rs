//! Ordered merge of per-chunk results.

use crate::record::HexRecord;

/// Concatenate chunk outputs in chunk-index order, whatever order the
/// workers finished in.
pub fn merge(mut outputs: Vec<(usize, Vec<HexRecord>)>) -> Vec<HexRecord> {
    outputs.sort_by_key(|(index, _)| *index);

    let total = outputs.iter().map(|(_, records)| records.len()).sum();
    let mut merged = Vec::with_capacity(total);
    for (_, records) in outputs {
        merged.extend(records);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_tiler::{to_polygon, HexCell};

    fn record(lat: f64) -> HexRecord {
        let cell = HexCell::containing(lat, 10.0, 6).unwrap();
        HexRecord::new(to_polygon(cell), Some(lat))
    }

    #[test]
    fn test_completion_order_does_not_matter() {
        let outputs = vec![
            (2, vec![record(5.0)]),
            (0, vec![record(1.0), record(2.0)]),
            (1, vec![]),
            (3, vec![record(6.0)]),
        ];

        let means: Vec<f64> = merge(outputs).iter().filter_map(HexRecord::mean).collect();
        assert_eq!(means, vec![1.0, 2.0, 5.0, 6.0]);
    }

    #[test]
    fn test_empty() {
        assert!(merge(Vec::new()).is_empty());
    }
}
