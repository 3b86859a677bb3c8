//! Query classifier
//!
//! Table lookups deciding whether a method reads, writes, or administers, and
//! whether an aggregation pipeline contains a stage that writes its output to
//! a collection.

use crate::parser::command::{ParsedQuery, QueryType};
use crate::parser::value::TypedValue;

/// Admin method produced by `show dbs` / `show databases`
pub const SHOW_DATABASES: &str = "showDatabases";

/// Admin method produced by `show collections` / `show tables`
pub const SHOW_COLLECTIONS: &str = "showCollections";

/// Admin method produced by `use <name>`
pub const USE_DATABASE: &str = "use";

/// Collection methods that only read
pub const READ_METHODS: &[&str] = &[
    "find",
    "findOne",
    "aggregate",
    "countDocuments",
    "estimatedDocumentCount",
    "count",
    "distinct",
    "getIndexes",
    "stats",
];

/// Collection methods that modify data or indexes
pub const WRITE_METHODS: &[&str] = &[
    "insertOne",
    "insertMany",
    "updateOne",
    "updateMany",
    "replaceOne",
    "deleteOne",
    "deleteMany",
    "findOneAndUpdate",
    "findOneAndReplace",
    "findOneAndDelete",
    "bulkWrite",
    "createIndex",
    "createIndexes",
    "dropIndex",
    "dropIndexes",
    "drop",
    "renameCollection",
    "insert",
    "update",
    "remove",
    "findAndModify",
];

/// Database-scoped methods (`db.<method>()`)
pub const ADMIN_METHODS: &[&str] = &["getName", "stats", "getCollectionNames", "dropDatabase"];

/// Admin methods that are safe to run in read-only mode
pub const READONLY_ADMIN_METHODS: &[&str] = &[
    SHOW_DATABASES,
    SHOW_COLLECTIONS,
    USE_DATABASE,
    "getName",
    "stats",
    "getCollectionNames",
];

/// Aggregation stages that write results to a collection
pub const WRITE_STAGES: &[&str] = &["$out", "$merge"];

/// Classify a method name
///
/// # Arguments
/// * `collection_scoped` - Whether the call targets a collection
///   (`db.<coll>.<method>`) rather than the database (`db.<method>`)
/// * `method` - Method name
///
/// # Returns
/// * `QueryType` - `Read`, `Write` or `Unknown` for collection methods,
///   `Admin` or `Unknown` for database methods
pub fn classify_method(collection_scoped: bool, method: &str) -> QueryType {
    if collection_scoped {
        if READ_METHODS.contains(&method) {
            QueryType::Read
        } else if WRITE_METHODS.contains(&method) {
            QueryType::Write
        } else {
            QueryType::Unknown
        }
    } else if ADMIN_METHODS.contains(&method) {
        QueryType::Admin
    } else {
        QueryType::Unknown
    }
}

/// Check whether a query is safe to run in read-only mode
///
/// True for reads and for admin commands in [`READONLY_ADMIN_METHODS`].
/// Aggregations count as reads here; callers veto pipelines that
/// [`is_read_only_aggregation`] cannot confirm.
pub fn is_readonly_safe(query: &ParsedQuery) -> bool {
    match query.query_type {
        QueryType::Read => true,
        QueryType::Admin => READONLY_ADMIN_METHODS.contains(&query.method_name()),
        QueryType::Write | QueryType::Unknown => false,
    }
}

/// Check whether an aggregation argument contains a write stage
///
/// # Arguments
/// * `value` - A materialized `aggregate` argument: either the pipeline
///   array or a single stage object passed on its own
///
/// # Returns
/// * `bool` - True if any stage has a `$out` or `$merge` key, wherever it
///   appears in the pipeline
pub fn has_write_stage(value: &TypedValue) -> bool {
    match value.as_array() {
        Some(stages) => stages.iter().any(is_write_stage),
        None => is_write_stage(value),
    }
}

fn is_write_stage(stage: &TypedValue) -> bool {
    WRITE_STAGES.iter().any(|name| stage.contains_key(name))
}

/// Check whether a query is an aggregation with a write stage in any argument
pub fn is_writing_aggregation(query: &ParsedQuery) -> bool {
    query.method_name() == "aggregate" && query.args.iter().any(has_write_stage)
}

/// Check whether a query is an aggregation that provably does not write
///
/// Fails closed: the pipeline must be an array of stage objects (or stage
/// objects passed as separate arguments) with no write stage. Arguments
/// that fell back to raw text, or stages of any other shape, are not
/// accepted. Non-aggregate queries return false.
pub fn is_read_only_aggregation(query: &ParsedQuery) -> bool {
    if query.method_name() != "aggregate" {
        return false;
    }

    let (stages, rest): (&[TypedValue], &[TypedValue]) = match query.args.split_first() {
        None => return true,
        Some((TypedValue::Array(stages), options)) => (stages.as_slice(), options),
        Some((TypedValue::Object(_), _)) => (query.args.as_slice(), &[][..]),
        Some(_) => return false,
    };

    stages
        .iter()
        .all(|stage| stage.as_object().is_some() && !is_write_stage(stage))
        && !rest.iter().any(has_write_stage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::materializer::materialize;

    fn query(query_type: QueryType, method: &str) -> ParsedQuery {
        ParsedQuery {
            query_type,
            collection: None,
            method: Some(method.to_string()),
            args: Vec::new(),
        }
    }

    fn pipeline(text: &str) -> TypedValue {
        materialize(text).remove(0)
    }

    #[test]
    fn test_classify_collection_methods() {
        assert_eq!(classify_method(true, "find"), QueryType::Read);
        assert_eq!(classify_method(true, "aggregate"), QueryType::Read);
        assert_eq!(classify_method(true, "insertOne"), QueryType::Write);
        assert_eq!(classify_method(true, "drop"), QueryType::Write);
        assert_eq!(classify_method(true, "frobnicate"), QueryType::Unknown);
        assert_eq!(classify_method(true, "dropDatabase"), QueryType::Unknown);
    }

    #[test]
    fn test_legacy_and_bulk_index_writes() {
        for method in [
            "insert",
            "update",
            "remove",
            "findAndModify",
            "createIndexes",
            "dropIndexes",
            "renameCollection",
        ] {
            assert_eq!(classify_method(true, method), QueryType::Write, "{method}");
        }

        let query = crate::parser::translate("db.users.remove({})");
        assert_eq!(query.query_type, QueryType::Write);
        assert!(!is_readonly_safe(&query));
    }

    #[test]
    fn test_classify_database_methods() {
        assert_eq!(classify_method(false, "getName"), QueryType::Admin);
        assert_eq!(classify_method(false, "dropDatabase"), QueryType::Admin);
        assert_eq!(classify_method(false, "find"), QueryType::Unknown);
    }

    #[test]
    fn test_write_methods_never_readonly() {
        for method in WRITE_METHODS {
            assert_eq!(classify_method(true, method), QueryType::Write, "{method}");
            assert!(!READONLY_ADMIN_METHODS.contains(method), "{method}");
            assert!(!is_readonly_safe(&query(QueryType::Write, method)));
        }
    }

    #[test]
    fn test_read_and_write_tables_disjoint() {
        for method in READ_METHODS {
            assert!(!WRITE_METHODS.contains(method), "{method}");
        }
    }

    #[test]
    fn test_readonly_admin() {
        assert!(is_readonly_safe(&query(QueryType::Admin, SHOW_DATABASES)));
        assert!(is_readonly_safe(&query(QueryType::Admin, SHOW_COLLECTIONS)));
        assert!(is_readonly_safe(&query(QueryType::Admin, USE_DATABASE)));
        assert!(is_readonly_safe(&query(QueryType::Admin, "stats")));
        assert!(!is_readonly_safe(&query(QueryType::Admin, "dropDatabase")));
        assert!(!is_readonly_safe(&ParsedQuery::unknown()));
        assert!(is_readonly_safe(&query(QueryType::Read, "find")));
    }

    #[test]
    fn test_write_stage_any_position() {
        assert!(has_write_stage(&pipeline("[{$out: 'r'}]")));
        assert!(has_write_stage(&pipeline(
            "[{$match: {a: 1}}, {$group: {_id: '$a'}}, {$merge: {into: 'r'}}]"
        )));
        assert!(has_write_stage(&pipeline(
            "[{$out: 'r'}, {$match: {}}]"
        )));
    }

    #[test]
    fn test_no_write_stage() {
        assert!(!has_write_stage(&pipeline("[{$match: {status: '$out'}}]")));
        assert!(!has_write_stage(&pipeline("[]")));
        assert!(!has_write_stage(&TypedValue::Text("[{$out: 'r'}]".to_string())));
    }

    #[test]
    fn test_single_stage_argument() {
        assert!(has_write_stage(&pipeline("{$out: 'r'}")));
        assert!(has_write_stage(&pipeline("{$merge: {into: 'r'}}")));
        assert!(!has_write_stage(&pipeline("{$match: {}}")));
    }

    #[test]
    fn test_is_writing_aggregation() {
        let mut agg = query(QueryType::Read, "aggregate");
        agg.args = materialize("[{$match: {}}, {$out: 'r'}]");
        assert!(is_writing_aggregation(&agg));

        agg.args = materialize("[{$match: {}}]");
        assert!(!is_writing_aggregation(&agg));

        agg.args = materialize("{$match: {}}, {$out: 'r'}");
        assert!(is_writing_aggregation(&agg));

        let mut find = query(QueryType::Read, "find");
        find.args = materialize("[{$out: 'r'}]");
        assert!(!is_writing_aggregation(&find));
    }

    #[test]
    fn test_read_only_aggregation_fails_closed() {
        let mut agg = query(QueryType::Read, "aggregate");
        for (args, expected) in [
            ("", true),
            ("[]", true),
            ("[{$match: {a: 1}}, {$group: {_id: '$a'}}]", true),
            ("[{$match: {}}], {allowDiskUse: true}", true),
            ("{$match: {}}, {$limit: 5}", true),
            ("[{$match: {}}, {$out: 'r'}]", false),
            ("{$match: {}}, {$out: 'r'}", false),
            ("{$merge: {into: 'r'}}", false),
            ("[{$match: {}}, 'text']", false),
            ("'[{$out: 1}]'", false),
            ("[{$match: {}}, {$out: 'r'}", false),
        ] {
            agg.args = materialize(args);
            assert_eq!(is_read_only_aggregation(&agg), expected, "args: {args}");
        }

        assert!(!is_read_only_aggregation(&query(QueryType::Read, "find")));
    }
}
