//! Predicate compiler
//!
//! One recursive function with a case per expression tag. Field references
//! are resolved through the schema accessor; the keyword variant is chosen
//! from the model, never by the caller.

use serde_json::Value;

use super::errors::{PlannerError, PlannerResult};
use super::query::{RangeBounds, SearchQuery};
use crate::model::{EntityType, PrimitiveType, PropertyKind, SchemaAccessor};
use crate::request::{BinaryOperator, Expression};

/// A member reference resolved against the entity type
#[derive(Debug, Clone, PartialEq)]
struct ResolvedField {
    /// Backing document path
    field: String,
    /// Path used for exact-match and range predicates
    exact: String,
    is_id: bool,
    is_boolean: bool,
}

/// Compiles filter expressions into search predicates
pub struct PredicateCompiler<'a, M: SchemaAccessor> {
    model: &'a M,
    entity_type: &'a EntityType,
    id_field: &'a str,
    keyword_suffix: &'a str,
}

impl<'a, M: SchemaAccessor> PredicateCompiler<'a, M> {
    pub fn new(
        model: &'a M,
        entity_type: &'a EntityType,
        id_field: &'a str,
        keyword_suffix: &'a str,
    ) -> Self {
        Self {
            model,
            entity_type,
            id_field,
            keyword_suffix,
        }
    }

    /// Compiles one expression node
    pub fn compile(&self, expr: &Expression) -> PlannerResult<SearchQuery> {
        match expr {
            Expression::Binary { op, left, right } => match op {
                BinaryOperator::And => Ok(SearchQuery::all_of(vec![
                    self.compile(left)?,
                    self.compile(right)?,
                ])),
                BinaryOperator::Or => Ok(SearchQuery::any_of(vec![
                    self.compile(left)?,
                    self.compile(right)?,
                ])),
                _ => self.compile_comparison(*op, left, right),
            },
            Expression::Not { operand } => Ok(SearchQuery::not(self.compile(operand)?)),
            Expression::Member { path } => {
                let resolved = self.resolve(path)?;
                if resolved.is_boolean {
                    Ok(SearchQuery::term(resolved.exact, Value::Bool(true)))
                } else {
                    Err(PlannerError::unsupported_expression(format!(
                        "Member '{}' is not a boolean expression",
                        path.join("/")
                    )))
                }
            }
            Expression::Literal { .. } => Err(PlannerError::unsupported_expression(
                "Literal is not a boolean expression",
            )),
            Expression::Method { name, .. } => Err(PlannerError::unsupported_expression(
                format!("Method '{}' is not supported", name),
            )),
        }
    }

    fn compile_comparison(
        &self,
        op: BinaryOperator,
        left: &Expression,
        right: &Expression,
    ) -> PlannerResult<SearchQuery> {
        // Normalise to `member op literal`
        let (path, value, op) = match (left, right) {
            (Expression::Member { path }, Expression::Literal { value }) => (path, value, op),
            (Expression::Literal { value }, Expression::Member { path }) => {
                (path, value, op.mirrored())
            }
            _ => {
                return Err(PlannerError::unsupported_expression(format!(
                    "Comparison '{}' between {} and {} is not supported",
                    op.as_str(),
                    left.tag(),
                    right.tag()
                )))
            }
        };

        let resolved = self.resolve(path)?;
        match op {
            BinaryOperator::Eq => self.equality(&resolved, value),
            BinaryOperator::Ne => {
                if resolved.is_id {
                    Ok(SearchQuery::not(self.equality(&resolved, value)?))
                } else if value.is_null() {
                    Ok(SearchQuery::exists(resolved.field))
                } else {
                    Ok(SearchQuery::not(SearchQuery::term(
                        resolved.exact,
                        value.clone(),
                    )))
                }
            }
            _ => self.range(&resolved, op, value),
        }
    }

    fn equality(&self, resolved: &ResolvedField, value: &Value) -> PlannerResult<SearchQuery> {
        if resolved.is_id {
            let id = match value {
                Value::Null => {
                    return Err(PlannerError::invalid_value(
                        &resolved.field,
                        "Id value can not be null",
                    ))
                }
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                other => {
                    return Err(PlannerError::invalid_value(
                        &resolved.field,
                        format!("Id value must be a string or number, got {}", other),
                    ))
                }
            };
            return Ok(SearchQuery::ids(None, vec![id]));
        }

        if value.is_null() {
            // Absent fields are how the store represents null
            Ok(SearchQuery::not(SearchQuery::exists(&resolved.field)))
        } else {
            Ok(SearchQuery::term(&resolved.exact, value.clone()))
        }
    }

    fn range(
        &self,
        resolved: &ResolvedField,
        op: BinaryOperator,
        value: &Value,
    ) -> PlannerResult<SearchQuery> {
        if resolved.is_id {
            return Err(PlannerError::unsupported_expression(format!(
                "Range comparison '{}' on the identifier is not supported",
                op.as_str()
            )));
        }
        if value.is_null() {
            return Err(PlannerError::invalid_value(
                &resolved.field,
                format!("Range comparison '{}' against null", op.as_str()),
            ));
        }

        let bound = Some(value.clone());
        let bounds = match op {
            BinaryOperator::Gt => RangeBounds {
                gt: bound,
                ..Default::default()
            },
            BinaryOperator::Ge => RangeBounds {
                gte: bound,
                ..Default::default()
            },
            BinaryOperator::Lt => RangeBounds {
                lt: bound,
                ..Default::default()
            },
            BinaryOperator::Le => RangeBounds {
                lte: bound,
                ..Default::default()
            },
            other => {
                return Err(PlannerError::unsupported_expression(format!(
                    "Operator '{}' is not a comparison",
                    other.as_str()
                )))
            }
        };
        Ok(SearchQuery::range(&resolved.exact, bounds))
    }

    fn resolve(&self, path: &[String]) -> PlannerResult<ResolvedField> {
        let (head, rest) = path
            .split_first()
            .ok_or_else(|| PlannerError::unsupported_expression("Empty member path"))?;
        let property = self.entity_type.property(head).ok_or_else(|| {
            PlannerError::unsupported_expression(format!(
                "Unknown property '{}' on '{}'",
                head, self.entity_type.name
            ))
        })?;

        if rest.is_empty() {
            let field = property.field().to_string();
            let exact = if self.model.needs_keyword(self.entity_type, head) {
                format!("{}{}", field, self.keyword_suffix)
            } else {
                field.clone()
            };
            return Ok(ResolvedField {
                is_id: field == self.id_field,
                is_boolean: property.kind == PropertyKind::Primitive
                    && property.primitive == Some(PrimitiveType::Boolean),
                exact,
                field,
            });
        }

        if property.kind != PropertyKind::Complex {
            return Err(PlannerError::unsupported_expression(format!(
                "Property '{}' has no sub-properties",
                head
            )));
        }
        let field = format!("{}.{}", property.field(), rest.join("."));
        Ok(ResolvedField {
            exact: field.clone(),
            field,
            is_id: false,
            is_boolean: false,
        })
    }
}
