//! OGC filter expressions over a single feature attribute.

use serde::{Deserialize, Serialize};
use sld_common::ClassValue;

/// Binary comparison operators of the OGC Filter Encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOp {
    EqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
}

impl ComparisonOp {
    /// Element name inside the `ogc:` namespace.
    pub fn element_name(&self) -> &'static str {
        match self {
            ComparisonOp::EqualTo => "ogc:PropertyIsEqualTo",
            ComparisonOp::GreaterThan => "ogc:PropertyIsGreaterThan",
            ComparisonOp::GreaterThanOrEqualTo => "ogc:PropertyIsGreaterThanOrEqualTo",
            ComparisonOp::LessThan => "ogc:PropertyIsLessThan",
            ComparisonOp::LessThanOrEqualTo => "ogc:PropertyIsLessThanOrEqualTo",
        }
    }

    fn holds(&self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            ComparisonOp::EqualTo => ordering == Equal,
            ComparisonOp::GreaterThan => ordering == Greater,
            ComparisonOp::GreaterThanOrEqualTo => ordering != Less,
            ComparisonOp::LessThan => ordering == Less,
            ComparisonOp::LessThanOrEqualTo => ordering != Greater,
        }
    }
}

/// A rule filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Compare {
        op: ComparisonOp,
        property: String,
        literal: ClassValue,
    },
    And(Vec<Filter>),
}

impl Filter {
    pub fn compare(op: ComparisonOp, property: impl Into<String>, literal: ClassValue) -> Self {
        Filter::Compare {
            op,
            property: property.into(),
            literal,
        }
    }

    /// `property == value`.
    pub fn equal_to(property: impl Into<String>, value: ClassValue) -> Self {
        Self::compare(ComparisonOp::EqualTo, property, value)
    }

    /// `lower <= property < upper`, or `lower <= property <= upper` when
    /// `inclusive_upper` is set.
    pub fn within(property: impl Into<String>, lower: f64, upper: f64, inclusive_upper: bool) -> Self {
        let property = property.into();
        let upper_op = if inclusive_upper {
            ComparisonOp::LessThanOrEqualTo
        } else {
            ComparisonOp::LessThan
        };
        Filter::And(vec![
            Self::compare(
                ComparisonOp::GreaterThanOrEqualTo,
                property.clone(),
                ClassValue::Number(lower),
            ),
            Self::compare(upper_op, property, ClassValue::Number(upper)),
        ])
    }

    /// Evaluate the filter against the value of its (single) attribute.
    ///
    /// Numbers compare numerically; text compares for equality only, or
    /// lexically for ordering operators.
    pub fn matches(&self, value: &ClassValue) -> bool {
        match self {
            Filter::Compare { op, literal, .. } => {
                let ordering = match (value, literal) {
                    (ClassValue::Number(a), ClassValue::Number(b)) => a.partial_cmp(b),
                    (ClassValue::Text(a), ClassValue::Text(b)) => Some(a.cmp(b)),
                    (ClassValue::Number(a), ClassValue::Text(b))
                    | (ClassValue::Text(b), ClassValue::Number(a)) => {
                        let numeric = b.trim().parse::<f64>().ok();
                        let ord = numeric.and_then(|b| a.partial_cmp(&b));
                        // Keep operand order: the text side may have been the value.
                        if matches!(value, ClassValue::Text(_)) {
                            ord.map(|o| o.reverse())
                        } else {
                            ord
                        }
                    }
                };
                ordering.map(|o| op.holds(o)).unwrap_or(false)
            }
            Filter::And(filters) => filters.iter().all(|f| f.matches(value)),
        }
    }
}
