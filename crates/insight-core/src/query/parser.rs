//! Structural validation of query documents.
//!
//! Turns a JSON document into a [`Query`], rejecting anything with the wrong
//! shape: missing or mistyped blocks, unknown keys, filter nodes without
//! exactly one key, malformed APPLY rules. Field names are not interpreted
//! here.

use serde_json::{Map, Value as Json};

use super::ast::{
    ApplyRule, Comparator, FilterNode, LogicOp, Options, OrderSpec, Query, Transformations,
};
use crate::error::{Error, Result};

const WHERE: &str = "WHERE";
const OPTIONS: &str = "OPTIONS";
const TRANSFORMATIONS: &str = "TRANSFORMATIONS";
const COLUMNS: &str = "COLUMNS";
const ORDER: &str = "ORDER";
const GROUP: &str = "GROUP";
const APPLY: &str = "APPLY";
const ORDER_DIR: &str = "dir";
const ORDER_KEYS: &str = "keys";

/// Parse a query from JSON text. Malformed JSON is a structural error.
pub fn parse_query_str(text: &str) -> Result<Query> {
    let document: Json = serde_json::from_str(text)
        .map_err(|e| Error::structural(format!("query is not valid JSON: {}", e)))?;
    parse_query(&document)
}

/// Parse a query document.
pub fn parse_query(document: &Json) -> Result<Query> {
    let root = as_object(document, "query")?;

    if let Some(key) = root
        .keys()
        .find(|k| !matches!(k.as_str(), WHERE | OPTIONS | TRANSFORMATIONS))
    {
        return Err(Error::structural(format!(
            "unexpected top-level key '{}'",
            key
        )));
    }

    let where_block = required_object(root, WHERE, "query")?;
    let options_block = required_object(root, OPTIONS, "query")?;

    let filter = if where_block.is_empty() {
        FilterNode::All
    } else {
        parse_filter(where_block)?
    };
    let options = parse_options(options_block)?;
    let transformations = match root.get(TRANSFORMATIONS) {
        Some(value) => Some(parse_transformations(as_object(value, TRANSFORMATIONS)?)?),
        None => None,
    };

    Ok(Query {
        filter,
        options,
        transformations,
    })
}

/// Parse a single (non-root) filter node.
fn parse_filter(node: &Map<String, Json>) -> Result<FilterNode> {
    let (key, body) = single_entry(node, "filter")?;

    match key.as_str() {
        "AND" => parse_logic(LogicOp::And, body),
        "OR" => parse_logic(LogicOp::Or, body),
        "LT" => parse_compare(Comparator::Lt, body),
        "GT" => parse_compare(Comparator::Gt, body),
        "EQ" => parse_compare(Comparator::Eq, body),
        "IS" => {
            let (field, pattern) = single_entry(as_object(body, "IS")?, "IS")?;
            let pattern = pattern
                .as_str()
                .ok_or_else(|| Error::structural(format!("IS value for '{}' must be a string", field)))?;
            Ok(FilterNode::is(field.as_str(), pattern))
        }
        "NOT" => {
            let child = parse_filter(as_object(body, "NOT")?)?;
            Ok(FilterNode::not(child))
        }
        other => Err(Error::structural(format!("unknown filter key '{}'", other))),
    }
}

fn parse_logic(op: LogicOp, body: &Json) -> Result<FilterNode> {
    let items = body.as_array().ok_or_else(|| {
        Error::structural(format!("{} must be an array of filters", op.keyword()))
    })?;
    if items.is_empty() {
        return Err(Error::structural(format!(
            "{} must contain at least one filter",
            op.keyword()
        )));
    }

    let children = items
        .iter()
        .map(|item| parse_filter(as_object(item, op.keyword())?))
        .collect::<Result<Vec<_>>>()?;

    Ok(FilterNode::Logic { op, children })
}

fn parse_compare(op: Comparator, body: &Json) -> Result<FilterNode> {
    let (field, value) = single_entry(as_object(body, op.keyword())?, op.keyword())?;
    let value = value.as_f64().ok_or_else(|| {
        Error::structural(format!(
            "{} value for '{}' must be a number",
            op.keyword(),
            field
        ))
    })?;
    Ok(FilterNode::compare(op, field.as_str(), value))
}

fn parse_options(options: &Map<String, Json>) -> Result<Options> {
    if let Some(key) = options
        .keys()
        .find(|k| !matches!(k.as_str(), COLUMNS | ORDER))
    {
        return Err(Error::structural(format!("unexpected OPTIONS key '{}'", key)));
    }

    let columns = options
        .get(COLUMNS)
        .ok_or_else(|| Error::structural("OPTIONS is missing COLUMNS"))?;
    let columns = string_list(columns, COLUMNS)?;

    let order = match options.get(ORDER) {
        Some(order) => Some(parse_order(order)?),
        None => None,
    };

    Ok(Options { columns, order })
}

fn parse_order(order: &Json) -> Result<OrderSpec> {
    match order {
        Json::String(field) => Ok(OrderSpec::Field(field.clone())),
        Json::Object(spec) => {
            if let Some(key) = spec
                .keys()
                .find(|k| !matches!(k.as_str(), ORDER_DIR | ORDER_KEYS))
            {
                return Err(Error::structural(format!("unexpected ORDER key '{}'", key)));
            }
            let dir = spec
                .get(ORDER_DIR)
                .ok_or_else(|| Error::structural("ORDER is missing dir"))?
                .as_str()
                .ok_or_else(|| Error::structural("ORDER dir must be a string"))?;
            let keys = spec
                .get(ORDER_KEYS)
                .ok_or_else(|| Error::structural("ORDER is missing keys"))?;
            Ok(OrderSpec::Keys {
                dir: dir.to_string(),
                keys: string_list(keys, "ORDER keys")?,
            })
        }
        _ => Err(Error::structural("ORDER must be a string or an object")),
    }
}

fn parse_transformations(block: &Map<String, Json>) -> Result<Transformations> {
    if let Some(key) = block
        .keys()
        .find(|k| !matches!(k.as_str(), GROUP | APPLY))
    {
        return Err(Error::structural(format!(
            "unexpected TRANSFORMATIONS key '{}'",
            key
        )));
    }

    let group = block
        .get(GROUP)
        .ok_or_else(|| Error::structural("TRANSFORMATIONS is missing GROUP"))?;
    let group = string_list(group, GROUP)?;

    let apply = block
        .get(APPLY)
        .ok_or_else(|| Error::structural("TRANSFORMATIONS is missing APPLY"))?
        .as_array()
        .ok_or_else(|| Error::structural("APPLY must be an array"))?
        .iter()
        .map(parse_apply_rule)
        .collect::<Result<Vec<_>>>()?;

    Ok(Transformations { group, apply })
}

fn parse_apply_rule(rule: &Json) -> Result<ApplyRule> {
    let (key, body) = single_entry(as_object(rule, "APPLY rule")?, "APPLY rule")?;
    let (token, field) = single_entry(as_object(body, key)?, key)?;
    let field = field.as_str().ok_or_else(|| {
        Error::structural(format!("field of apply rule '{}' must be a string", key))
    })?;
    Ok(ApplyRule::new(key.as_str(), token.as_str(), field))
}

/// A non-empty array of strings.
fn string_list(value: &Json, what: &str) -> Result<Vec<String>> {
    let items = value
        .as_array()
        .ok_or_else(|| Error::structural(format!("{} must be an array", what)))?;
    if items.is_empty() {
        return Err(Error::structural(format!("{} must not be empty", what)));
    }
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| Error::structural(format!("{} entries must be strings", what)))
        })
        .collect()
}

fn as_object<'a>(value: &'a Json, what: &str) -> Result<&'a Map<String, Json>> {
    value
        .as_object()
        .ok_or_else(|| Error::structural(format!("{} must be an object", what)))
}

fn required_object<'a>(
    parent: &'a Map<String, Json>,
    key: &str,
    what: &str,
) -> Result<&'a Map<String, Json>> {
    let value = parent
        .get(key)
        .ok_or_else(|| Error::structural(format!("{} is missing {}", what, key)))?;
    as_object(value, key)
}

/// The only entry of an object that must have exactly one key.
fn single_entry<'a>(object: &'a Map<String, Json>, what: &str) -> Result<(&'a String, &'a Json)> {
    let mut entries = object.iter();
    match (entries.next(), entries.next()) {
        (Some(entry), None) => Ok(entry),
        _ => Err(Error::structural(format!(
            "{} must have exactly one key, found {}",
            what,
            object.len()
        ))),
    }
}
