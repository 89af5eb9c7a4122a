// conform/src/strict.rs
//
// Strict-mode lint run before compilation. The validator library silently ignores
// keywords it does not know, so a typo such as `"requried"` would make a schema
// accept everything. This walk rejects such schemas up front.

use serde_json::{Map, Value};
use std::fmt;

use crate::config::{Draft, ValidatorOptions};

const CORE: &[&str] = &[
    "$schema", "$ref", "title", "description", "default", "type", "enum", "format",
    "multipleOf", "maximum", "exclusiveMaximum", "minimum", "exclusiveMinimum",
    "maxLength", "minLength", "pattern",
    "items", "maxItems", "minItems", "uniqueItems",
    "maxProperties", "minProperties", "required", "properties", "patternProperties",
    "additionalProperties", "dependencies", "definitions",
    "allOf", "anyOf", "oneOf", "not",
];
const DRAFT4_ONLY: &[&str] = &["id"];
const SINCE_DRAFT6: &[&str] = &["$id", "const", "contains", "propertyNames", "examples"];
// `$defs` is accepted for draft 7 too, as Ajv does
const SINCE_DRAFT7: &[&str] = &[
    "$comment", "if", "then", "else", "readOnly", "writeOnly", "contentMediaType", "contentEncoding",
    "$defs",
];
const SINCE_2019_09: &[&str] = &[
    "$anchor", "$vocabulary", "dependentRequired", "dependentSchemas",
    "maxContains", "minContains", "unevaluatedItems", "unevaluatedProperties",
    "deprecated", "contentSchema",
];
const ONLY_2019_09: &[&str] = &["$recursiveRef", "$recursiveAnchor"];
const SINCE_2020_12: &[&str] = &["prefixItems", "$dynamicRef", "$dynamicAnchor"];
const BEFORE_2020_12: &[&str] = &["additionalItems"];

/// Keywords whose value is a map from names to subschemas.
const SCHEMA_MAPS: &[&str] = &["properties", "patternProperties", "$defs", "definitions", "dependentSchemas"];
/// Keywords whose value is an array of subschemas.
const SCHEMA_ARRAYS: &[&str] = &["allOf", "anyOf", "oneOf", "prefixItems"];
/// Keywords whose value is a single subschema.
const SCHEMA_SINGLES: &[&str] = &[
    "not", "if", "then", "else", "contains", "additionalProperties", "propertyNames",
    "unevaluatedItems", "unevaluatedProperties", "additionalItems", "contentSchema",
];

fn is_known(draft: Draft, keyword: &str) -> bool {
    let rank = draft_rank(draft);
    CORE.contains(&keyword)
        || (rank == 4 && DRAFT4_ONLY.contains(&keyword))
        || (rank >= 6 && SINCE_DRAFT6.contains(&keyword))
        || (rank >= 7 && SINCE_DRAFT7.contains(&keyword))
        || (rank >= 2019 && SINCE_2019_09.contains(&keyword))
        || (rank == 2019 && ONLY_2019_09.contains(&keyword))
        || (rank >= 2020 && SINCE_2020_12.contains(&keyword))
        || (rank < 2020 && BEFORE_2020_12.contains(&keyword))
}

fn draft_rank(draft: Draft) -> u16 {
    match draft {
        Draft::Draft4 => 4,
        Draft::Draft6 => 6,
        Draft::Draft7 => 7,
        Draft::Draft201909 => 2019,
        Draft::Draft202012 => 2020,
    }
}

/// One strict-mode problem, located by a `#`-rooted JSON Pointer into the schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrictIssue {
    pub pointer: String,
    pub message: String,
}

impl fmt::Display for StrictIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.pointer, self.message)
    }
}

/// Lint `schema` according to `opts`. Returns an empty list when strict mode is off.
pub fn lint(schema: &Value, opts: &ValidatorOptions) -> Vec<StrictIssue> {
    let mut out = Vec::new();
    if opts.strict || opts.strict_required {
        walk(schema, "#".to_string(), opts, &mut out);
    }
    out
}

fn walk(schema: &Value, pointer: String, opts: &ValidatorOptions, out: &mut Vec<StrictIssue>) {
    let Value::Object(map) = schema else { return };

    if opts.strict_required {
        check_required(map, &pointer, out);
    }

    for (key, value) in map {
        if opts.strict && !is_known(opts.draft, key) {
            out.push(StrictIssue { pointer: pointer.clone(), message: format!("unknown keyword {:?}", key) });
            continue;
        }
        let here = format!("{}/{}", pointer, escape(key));
        let k = key.as_str();
        if SCHEMA_MAPS.contains(&k) {
            if let Value::Object(children) = value {
                for (name, sub) in children {
                    walk(sub, format!("{}/{}", here, escape(name)), opts, out);
                }
            }
        } else if SCHEMA_ARRAYS.contains(&k) {
            walk_array(value, &here, opts, out);
        } else if SCHEMA_SINGLES.contains(&k) {
            walk(value, here, opts, out);
        } else if k == "items" {
            // array form is the pre-2020 tuple syntax
            match value {
                Value::Array(_) => walk_array(value, &here, opts, out),
                _ => walk(value, here, opts, out),
            }
        } else if k == "dependencies" {
            // values are either property lists or subschemas
            if let Value::Object(children) = value {
                for (name, sub) in children.iter().filter(|(_, v)| v.is_object()) {
                    walk(sub, format!("{}/{}", here, escape(name)), opts, out);
                }
            }
        }
    }
}

fn walk_array(value: &Value, pointer: &str, opts: &ValidatorOptions, out: &mut Vec<StrictIssue>) {
    if let Value::Array(items) = value {
        for (i, sub) in items.iter().enumerate() {
            walk(sub, format!("{}/{}", pointer, i), opts, out);
        }
    }
}

fn check_required(map: &Map<String, Value>, pointer: &str, out: &mut Vec<StrictIssue>) {
    let Some(Value::Array(required)) = map.get("required") else { return };
    let props = map.get("properties").and_then(Value::as_object);
    for name in required.iter().filter_map(Value::as_str) {
        if !props.is_some_and(|p| p.contains_key(name)) {
            out.push(StrictIssue {
                pointer: format!("{}/required", pointer),
                message: format!("required property {:?} is not defined in \"properties\"", name),
            });
        }
    }
}

fn escape(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}
