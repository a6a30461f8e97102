//! Query assembler
//!
//! Walks the resource path left to right and folds every segment into one
//! composed query rooted at the terminal entity set. Navigation boundaries
//! become parent/child joins; key predicates become identifier restrictions.
//!
//! Direction rule, for a segment followed by a navigation:
//! - to-many navigation: the segment's type is the parent (`has_parent`)
//! - to-one navigation: the segment's type is the child (`has_child`)
//!
//! Joins nest, so every restriction collected so far ends up inside the join
//! that leads to the next segment.

use super::errors::{PlannerError, PlannerResult};
use super::query::SearchQuery;
use crate::model::{
    EntitySet, EntityType, ModelError, PropertyKind, SchemaAccessor,
};
use crate::request::ResourceSegment;

/// Frozen output of assembly: conjunction of join/identifier clauses tagged
/// with the terminal index and document type
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedQuery {
    index: String,
    doc_type: String,
    clauses: Vec<SearchQuery>,
}

impl ComposedQuery {
    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    pub fn clauses(&self) -> &[SearchQuery] {
        &self.clauses
    }

    /// Single query node equivalent to the clause conjunction
    pub fn query(&self) -> SearchQuery {
        match self.clauses.len() {
            0 => SearchQuery::MatchAll,
            1 => self.clauses[0].clone(),
            _ => SearchQuery::filter_all(self.clauses.clone()),
        }
    }
}

/// Mutable accumulator used while walking the path
#[derive(Debug, Default)]
struct QueryBuilder {
    pending: Option<SearchQuery>,
    clauses: Vec<SearchQuery>,
}

impl QueryBuilder {
    /// Current segment is the parent of the next one
    fn add_parent_query(&mut self, doc_type: &str, ids: Vec<String>) {
        let inner = self.restriction(doc_type, ids);
        self.pending = Some(SearchQuery::has_parent(doc_type, inner));
    }

    /// Current segment is the child of the next one
    fn add_child_query(&mut self, doc_type: &str, ids: Vec<String>) {
        let inner = self.restriction(doc_type, ids);
        self.pending = Some(SearchQuery::has_child(doc_type, inner));
    }

    /// Terminal segment
    fn add_ids_query(&mut self, doc_type: &str, ids: Vec<String>) {
        let query = self.restriction(doc_type, ids);
        if !query.is_match_all() {
            self.clauses.push(query);
        }
    }

    fn restriction(&mut self, doc_type: &str, ids: Vec<String>) -> SearchQuery {
        let mut parts = Vec::with_capacity(2);
        if !ids.is_empty() {
            parts.push(SearchQuery::ids(Some(doc_type), ids));
        }
        if let Some(pending) = self.pending.take() {
            parts.push(pending);
        }
        match parts.len() {
            0 => SearchQuery::MatchAll,
            1 => parts.remove(0),
            _ => SearchQuery::filter_all(parts),
        }
    }

    fn build(self, terminal: &EntitySet) -> ComposedQuery {
        ComposedQuery {
            index: terminal.index.clone(),
            doc_type: terminal.doc_type().to_string(),
            clauses: self.clauses,
        }
    }
}

/// Result of walking a resource path
#[derive(Debug, Clone)]
pub struct AssembledPath<'a> {
    pub query: ComposedQuery,
    /// Entity set the response rows belong to
    pub entity_set: &'a EntitySet,
    pub entity_type: &'a EntityType,
    /// Trailing primitive property, when the path selects a scalar
    pub scalar: Option<&'a str>,
}

/// Builds the composed join/identifier query for a resource path
pub struct QueryAssembler<'a, M: SchemaAccessor> {
    model: &'a M,
}

impl<'a, M: SchemaAccessor> QueryAssembler<'a, M> {
    pub fn new(model: &'a M) -> Self {
        Self { model }
    }

    pub fn assemble(&self, path: &'a [ResourceSegment]) -> PlannerResult<AssembledPath<'a>> {
        // 1. Composite keys are rejected before anything else is resolved
        for segment in path {
            if segment.keys().len() > 1 {
                return Err(PlannerError::composite_key(segment.name()));
            }
        }

        // 2. Root must be an entity set
        let root_name = match path.first() {
            Some(ResourceSegment::EntitySet { name, .. }) => name,
            Some(_) => {
                return Err(PlannerError::unsupported_resource(
                    "Only EntitySet is supported",
                ))
            }
            None => return Err(PlannerError::unsupported_resource("Empty resource path")),
        };

        // 3. Split off the trailing primitive property
        let (traversal, scalar) = match path.split_last() {
            Some((ResourceSegment::PrimitiveProperty { name }, rest)) => (rest, Some(name.as_str())),
            _ => (path, None),
        };

        // 4. Resolve the entity set reached by every traversal segment
        let root = self
            .model
            .entity_set(root_name)
            .ok_or_else(|| ModelError::unknown_entity_set(root_name))?;
        let mut sets: Vec<&'a EntitySet> = vec![root];
        let mut to_many: Vec<bool> = vec![false];
        for segment in &traversal[1..] {
            match segment {
                ResourceSegment::Navigation { name, .. } => {
                    let current = sets[sets.len() - 1];
                    let (nav, target) = self.model.navigation_target(current, name)?;
                    sets.push(target);
                    to_many.push(nav.is_collection());
                }
                other => {
                    return Err(PlannerError::unsupported_resource(format!(
                        "Unsupported resource segment '{}' of kind {}",
                        other.name(),
                        other.kind_name()
                    )))
                }
            }
        }

        // 5. Fold segments into joins
        let mut builder = QueryBuilder::default();
        let last = traversal.len() - 1;
        for (i, segment) in traversal.iter().enumerate() {
            let doc_type = sets[i].doc_type();
            let ids: Vec<String> = segment.keys().iter().map(|k| k.value()).collect();
            if i == last {
                builder.add_ids_query(doc_type, ids);
            } else if to_many[i + 1] {
                builder.add_parent_query(doc_type, ids);
            } else {
                builder.add_child_query(doc_type, ids);
            }
        }

        // 6. Tag with the terminal set
        let entity_set = sets[last];
        let entity_type = self.model.entity_type_of(entity_set)?;
        if let Some(name) = scalar {
            let property = entity_type
                .property(name)
                .ok_or_else(|| ModelError::unknown_property(&entity_type.name, name))?;
            if property.kind != PropertyKind::Primitive {
                return Err(PlannerError::unsupported_resource(format!(
                    "Property '{}' is not primitive",
                    name
                )));
            }
        }

        Ok(AssembledPath {
            query: builder.build(entity_set),
            entity_set,
            entity_type,
            scalar,
        })
    }
}
