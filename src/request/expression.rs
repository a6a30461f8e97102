//! Filter expression tree
//!
//! Tagged variant produced by the external parser and consumed once per
//! request by the predicate compiler.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryOperator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    And,
    Or,
}

impl BinaryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::Eq => "eq",
            BinaryOperator::Ne => "ne",
            BinaryOperator::Gt => "gt",
            BinaryOperator::Ge => "ge",
            BinaryOperator::Lt => "lt",
            BinaryOperator::Le => "le",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
        }
    }

    /// Returns true for value comparisons
    pub fn is_comparison(&self) -> bool {
        !matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }

    /// Operator with its operands swapped: `5 lt age` is `age gt 5`
    pub fn mirrored(&self) -> BinaryOperator {
        match self {
            BinaryOperator::Gt => BinaryOperator::Lt,
            BinaryOperator::Ge => BinaryOperator::Le,
            BinaryOperator::Lt => BinaryOperator::Gt,
            BinaryOperator::Le => BinaryOperator::Ge,
            other => *other,
        }
    }
}

/// Filter expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expression {
    Binary {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Not {
        operand: Box<Expression>,
    },
    /// Property reference; more than one element walks into a complex property
    Member {
        path: Vec<String>,
    },
    Literal {
        value: Value,
    },
    /// Function call such as `contains(title,'x')`
    Method {
        name: String,
        #[serde(default)]
        args: Vec<Expression>,
    },
}

impl Expression {
    pub fn member(name: impl Into<String>) -> Self {
        Expression::Member {
            path: vec![name.into()],
        }
    }

    pub fn member_path<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Expression::Member {
            path: path.into_iter().map(Into::into).collect(),
        }
    }

    pub fn literal(value: Value) -> Self {
        Expression::Literal { value }
    }

    pub fn binary(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `field op literal`
    pub fn compare(field: impl Into<String>, op: BinaryOperator, value: Value) -> Self {
        Self::binary(op, Self::member(field), Self::literal(value))
    }

    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self::compare(field, BinaryOperator::Eq, value)
    }

    pub fn and(left: Expression, right: Expression) -> Self {
        Self::binary(BinaryOperator::And, left, right)
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Self::binary(BinaryOperator::Or, left, right)
    }

    pub fn not(operand: Expression) -> Self {
        Expression::Not {
            operand: Box::new(operand),
        }
    }

    /// Short tag used in diagnostics
    pub fn tag(&self) -> &'static str {
        match self {
            Expression::Binary { .. } => "binary",
            Expression::Not { .. } => "not",
            Expression::Member { .. } => "member",
            Expression::Literal { .. } => "literal",
            Expression::Method { .. } => "method",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mirrored_operators() {
        assert_eq!(BinaryOperator::Lt.mirrored(), BinaryOperator::Gt);
        assert_eq!(BinaryOperator::Ge.mirrored(), BinaryOperator::Le);
        assert_eq!(BinaryOperator::Eq.mirrored(), BinaryOperator::Eq);
    }

    #[test]
    fn test_is_comparison() {
        assert!(BinaryOperator::Ne.is_comparison());
        assert!(!BinaryOperator::Or.is_comparison());
    }

    #[test]
    fn test_deserialize_tree() {
        let expr: Expression = serde_json::from_value(json!({
            "type": "binary",
            "op": "and",
            "left": {
                "type": "binary", "op": "eq",
                "left": {"type": "member", "path": ["name"]},
                "right": {"type": "literal", "value": null}
            },
            "right": {
                "type": "not",
                "operand": {
                    "type": "method", "name": "contains",
                    "args": [{"type": "member", "path": ["title"]}]
                }
            }
        }))
        .unwrap();

        let expected = Expression::and(
            Expression::eq("name", json!(null)),
            Expression::not(Expression::Method {
                name: "contains".into(),
                args: vec![Expression::member("title")],
            }),
        );
        assert_eq!(expr, expected);
    }
}
