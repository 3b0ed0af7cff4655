use super::{LevelValues, StageEntry, ValueCalculator};

/// Reference reduction policy.
///
/// A level's value is the span between its first stage (start) and its last
/// stage (end). When the start measurement carries merged child values, the
/// span is the longest child span (never below zero); otherwise it is the
/// node's own `end - start`. A missing start or end yields zero. The phase
/// total is the sum of its level values.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCalculator;

impl ValueCalculator for DefaultCalculator {
    fn level_value(&self, entries: &[StageEntry<'_>]) -> i64 {
        let (Some(first), Some(last)) = (entries.first(), entries.last()) else {
            return 0;
        };

        let (Some(start), Some(end)) = (first.measurement, last.measurement) else {
            return 0;
        };

        let start_children = start.child_values();
        if start_children.is_empty() {
            return end.own_value().saturating_sub(start.own_value());
        }

        start_children
            .iter()
            .filter_map(|(id, start_value)| end.child_value(id).map(|end_value| end_value.saturating_sub(*start_value)))
            .fold(0, i64::max)
    }

    fn phase_value(&self, levels: &LevelValues<'_>) -> i64 {
        levels.iter().fold(0_i64, |total, (_, value)| total.saturating_add(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Measurement;
    use crate::schema::Stage;
    use std::collections::BTreeMap;

    fn stages() -> [Stage; 2] {
        [Stage::new("Start", true), Stage::new("End", true)]
    }

    fn composite(values: &[(&str, i64)]) -> Measurement {
        Measurement::Composite(values.iter().map(|(id, v)| ((*id).into(), *v)).collect::<BTreeMap<_, _>>())
    }

    #[test]
    fn test_own_delta() {
        let [start, end] = stages();
        let a = Measurement::Leaf(10);
        let b = Measurement::Leaf(25);
        let entries = [StageEntry::new(&start, Some(&a)), StageEntry::new(&end, Some(&b))];
        assert_eq!(DefaultCalculator.level_value(&entries), 15);
    }

    #[test]
    fn test_max_child_delta() {
        let [start, end] = stages();
        let a = composite(&[("A", 0), ("B", 5)]);
        let b = composite(&[("A", 90), ("B", 10)]);
        let entries = [StageEntry::new(&start, Some(&a)), StageEntry::new(&end, Some(&b))];
        assert_eq!(DefaultCalculator.level_value(&entries), 90);
    }

    #[test]
    fn test_child_deltas_floor_at_zero() {
        let [start, end] = stages();
        let a = composite(&[("A", 50)]);
        let b = composite(&[("A", 20)]);
        let entries = [StageEntry::new(&start, Some(&a)), StageEntry::new(&end, Some(&b))];
        assert_eq!(DefaultCalculator.level_value(&entries), 0);
    }

    #[test]
    fn test_child_missing_from_end_is_skipped() {
        let [start, end] = stages();
        let a = composite(&[("A", 0), ("B", 0)]);
        let b = composite(&[("B", 7)]);
        let entries = [StageEntry::new(&start, Some(&a)), StageEntry::new(&end, Some(&b))];
        assert_eq!(DefaultCalculator.level_value(&entries), 7);
    }

    #[test]
    fn test_absent_start_or_end_is_zero() {
        let [start, end] = stages();
        let a = Measurement::Leaf(10);
        assert_eq!(DefaultCalculator.level_value(&[StageEntry::new(&start, None), StageEntry::new(&end, Some(&a))]), 0);
        assert_eq!(DefaultCalculator.level_value(&[StageEntry::new(&start, Some(&a)), StageEntry::new(&end, None)]), 0);
        assert_eq!(DefaultCalculator.level_value(&[]), 0);
    }

    #[test]
    fn test_phase_value_sums_levels() {
        let levels: LevelValues<'_> = [("One", 3), ("Two", 4), ("Three", 5)].into_iter().collect();
        assert_eq!(DefaultCalculator.phase_value(&levels), 12);
        assert_eq!(DefaultCalculator.phase_value(&LevelValues::new()), 0);
    }
}
