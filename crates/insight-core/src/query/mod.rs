//! Query pipeline.
//!
//! A query document flows through these stages:
//!
//! 1. [`parser`] checks the document's shape and builds a [`Query`].
//! 2. [`resolver`] finds the one dataset the query references.
//! 3. [`validator`] checks every reference against that dataset's schema and
//!    produces a [`QueryPlan`].
//! 4. [`engine::evaluate`] filters, groups, aggregates, projects and orders.

pub mod aggregate;
pub mod ast;
pub mod budget;
pub mod context;
pub mod engine;
pub mod filter;
pub mod parser;
pub mod projection;
pub mod resolver;
pub mod sort;
pub mod validator;

pub use aggregate::{AggregateEngine, Group, GroupRecord};
pub use ast::{ApplyRule, Comparator, FilterNode, LogicOp, Options, OrderSpec, Query, Transformations};
pub use budget::{ResultBudget, DEFAULT_MAX_ROWS};
pub use context::QueryContext;
pub use engine::{evaluate, QueryEngine};
pub use filter::{FilterEvaluator, StringPattern};
pub use parser::{parse_query, parse_query_str};
pub use projection::{Projector, ResultRow};
pub use sort::{Direction, ResultSorter, SortSpec};
pub use validator::{Aggregate, ApplyToken, Column, ColumnSource, GroupPlan, QueryPlan};
