//! Parsed query representation.
//!
//! These types hold the query exactly as written: field references are still
//! qualified (`<dataset>_<field>`) and names such as apply tokens and sort
//! directions are not yet checked. See [`super::validator`] for the checked
//! form.

/// Logical connective of a `Logic` filter node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
}

impl LogicOp {
    /// Query keyword for this connective.
    pub fn keyword(&self) -> &'static str {
        match self {
            LogicOp::And => "AND",
            LogicOp::Or => "OR",
        }
    }
}

/// Numeric comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Lt,
    Gt,
    Eq,
}

impl Comparator {
    /// Query keyword for this operator.
    pub fn keyword(&self) -> &'static str {
        match self {
            Comparator::Lt => "LT",
            Comparator::Gt => "GT",
            Comparator::Eq => "EQ",
        }
    }

    /// Apply the operator as `actual <op> bound`.
    pub fn compare(&self, actual: f64, bound: f64) -> bool {
        match self {
            Comparator::Lt => actual < bound,
            Comparator::Gt => actual > bound,
            Comparator::Eq => actual == bound,
        }
    }
}

/// A node of the WHERE predicate tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    /// Empty WHERE: every row matches.
    All,
    /// AND / OR over a non-empty list of children.
    Logic {
        op: LogicOp,
        children: Vec<FilterNode>,
    },
    /// LT / GT / EQ against a numeric field.
    Compare {
        op: Comparator,
        field: String,
        value: f64,
    },
    /// IS against a string field, with optional leading/trailing `*`.
    Match { field: String, pattern: String },
    /// NOT of a single child.
    Not(Box<FilterNode>),
}

impl FilterNode {
    /// Create an AND node.
    pub fn and(children: Vec<FilterNode>) -> Self {
        FilterNode::Logic {
            op: LogicOp::And,
            children,
        }
    }

    /// Create an OR node.
    pub fn or(children: Vec<FilterNode>) -> Self {
        FilterNode::Logic {
            op: LogicOp::Or,
            children,
        }
    }

    /// Create a comparison node.
    pub fn compare(op: Comparator, field: impl Into<String>, value: f64) -> Self {
        FilterNode::Compare {
            op,
            field: field.into(),
            value,
        }
    }

    /// Create a string match node.
    pub fn is(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        FilterNode::Match {
            field: field.into(),
            pattern: pattern.into(),
        }
    }

    /// Create a negation node.
    pub fn not(child: FilterNode) -> Self {
        FilterNode::Not(Box::new(child))
    }

    /// Visit every field reference in this tree, depth first.
    pub fn for_each_field<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        match self {
            FilterNode::All => {}
            FilterNode::Logic { children, .. } => {
                for child in children {
                    child.for_each_field(f);
                }
            }
            FilterNode::Compare { field, .. } | FilterNode::Match { field, .. } => f(field),
            FilterNode::Not(child) => child.for_each_field(f),
        }
    }
}

/// One APPLY entry: `{key: {token: field}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyRule {
    pub key: String,
    pub token: String,
    pub field: String,
}

impl ApplyRule {
    pub fn new(
        key: impl Into<String>,
        token: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            token: token.into(),
            field: field.into(),
        }
    }
}

/// The TRANSFORMATIONS block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformations {
    pub group: Vec<String>,
    pub apply: Vec<ApplyRule>,
}

/// ORDER as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderSpec {
    /// Single key, ascending.
    Field(String),
    /// Multiple keys with a shared direction.
    Keys { dir: String, keys: Vec<String> },
}

impl OrderSpec {
    /// Keys in comparison order.
    pub fn keys(&self) -> Vec<&str> {
        match self {
            OrderSpec::Field(field) => vec![field.as_str()],
            OrderSpec::Keys { keys, .. } => keys.iter().map(String::as_str).collect(),
        }
    }
}

/// The OPTIONS block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub columns: Vec<String>,
    pub order: Option<OrderSpec>,
}

/// A parsed query document.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub filter: FilterNode,
    pub options: Options,
    pub transformations: Option<Transformations>,
}

impl Query {
    /// Every field-like reference in the query: WHERE leaves, COLUMNS, ORDER
    /// keys, GROUP entries and APPLY fields, in that order.
    pub fn references(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        self.filter.for_each_field(&mut |field| refs.push(field));
        refs.extend(self.options.columns.iter().map(String::as_str));
        if let Some(order) = &self.options.order {
            refs.extend(order.keys());
        }
        if let Some(transformations) = &self.transformations {
            refs.extend(transformations.group.iter().map(String::as_str));
            refs.extend(transformations.apply.iter().map(|rule| rule.field.as_str()));
        }
        refs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparator() {
        assert!(Comparator::Lt.compare(1.0, 2.0));
        assert!(!Comparator::Lt.compare(2.0, 2.0));
        assert!(Comparator::Gt.compare(97.5, 90.0));
        assert!(Comparator::Eq.compare(90.0, 90.0));
        assert!(!Comparator::Eq.compare(90.01, 90.0));
    }

    #[test]
    fn test_references_cover_every_clause() {
        let query = Query {
            filter: FilterNode::and(vec![
                FilterNode::compare(Comparator::Gt, "sections_avg", 90.0),
                FilterNode::not(FilterNode::is("sections_dept", "cp*")),
            ]),
            options: Options {
                columns: vec!["sections_dept".into(), "maxPass".into()],
                order: Some(OrderSpec::Keys {
                    dir: "DOWN".into(),
                    keys: vec!["maxPass".into()],
                }),
            },
            transformations: Some(Transformations {
                group: vec!["sections_dept".into()],
                apply: vec![ApplyRule::new("maxPass", "MAX", "sections_pass")],
            }),
        };

        assert_eq!(
            query.references(),
            vec![
                "sections_avg",
                "sections_dept",
                "sections_dept",
                "maxPass",
                "maxPass",
                "sections_dept",
                "sections_pass",
            ]
        );
    }
}
