use compact_str::CompactString;
use core::fmt;
use std::collections::BTreeMap;

static NO_CHILDREN: BTreeMap<CompactString, i64> = BTreeMap::new();

/// A raw value recorded at one (phase, level, stage) key of a node.
///
/// Leaves are set directly by the caller. Composites only ever come out of a
/// merge and hold one raw value per child identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Measurement {
    Leaf(i64),
    Composite(BTreeMap<CompactString, i64>),
}

impl Measurement {
    /// The node's own raw value. Composites have none and report zero.
    #[must_use]
    pub const fn own_value(&self) -> i64 {
        match self {
            Self::Leaf(value) => *value,
            Self::Composite(_) => 0,
        }
    }

    #[must_use]
    pub fn child_values(&self) -> &BTreeMap<CompactString, i64> {
        match self {
            Self::Leaf(_) => &NO_CHILDREN,
            Self::Composite(values) => values,
        }
    }

    #[must_use]
    pub fn child_value(&self, child: &str) -> Option<i64> {
        self.child_values().get(child).copied()
    }

    #[must_use]
    pub const fn is_composite(&self) -> bool {
        matches!(self, Self::Composite(_))
    }

    /// Smallest and largest raw value held by this measurement.
    #[must_use]
    pub fn bounds(&self) -> Option<(i64, i64)> {
        match self {
            Self::Leaf(value) => Some((*value, *value)),
            Self::Composite(values) => {
                let min = values.values().min()?;
                let max = values.values().max()?;
                Some((*min, *max))
            }
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(value) => write!(f, "{value}"),
            Self::Composite(values) if values.is_empty() => write!(f, "{}", self.own_value()),
            Self::Composite(values) => {
                write!(f, "{}, (", self.own_value())?;
                for (i, (child, value)) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{child}={value}")?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composite() -> Measurement {
        Measurement::Composite([("B".into(), 5), ("A".into(), 0)].into_iter().collect())
    }

    #[test]
    fn test_leaf_display() {
        assert_eq!(Measurement::Leaf(90).to_string(), "90");
    }

    #[test]
    fn test_composite_display_orders_children() {
        assert_eq!(composite().to_string(), "0, (A=0, B=5)");
    }

    #[test]
    fn test_leaf_has_no_children() {
        let leaf = Measurement::Leaf(7);
        assert!(leaf.child_values().is_empty());
        assert_eq!(leaf.child_value("A"), None);
        assert_eq!(leaf.own_value(), 7);
        assert!(!leaf.is_composite());
    }

    #[test]
    fn test_composite_lookup() {
        let m = composite();
        assert_eq!(m.own_value(), 0);
        assert_eq!(m.child_value("B"), Some(5));
        assert_eq!(m.bounds(), Some((0, 5)));
        assert_eq!(Measurement::Composite(BTreeMap::new()).to_string(), "0");
        assert_eq!(Measurement::Composite(BTreeMap::new()).bounds(), None);
    }
}
