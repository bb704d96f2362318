//! Tests for query-record parsing, ported from the log samples the
//! database engine actually emits.

use chrono_tz::Asia::Tokyo;

use super::*;

fn sample_line() -> String {
    [
        "2020-01-01 12:00:00 UTC:100.100.100.100(10000):client_name:[10000]:LOG:  \
         duration: 1234.567 ms plan:",
        "\tQuery Text: SELECT * FROM \"TEST\" WHERE (\"id\" IN ($1))",
        "\tGather  (cost=10.00..100.00 rows=20 width=50)\n\tWorkers Planned: 2\n\t->  \
         Parallel Seq Scan on task_logs  (cost=10.00..100.00 rows=20 width=50)",
    ]
    .join("\n")
}

#[test]
fn parse_query_log_extracts_every_field() {
    let (record, identify_info) = parse_query_log(&sample_line(), Tokyo).expect("parse");

    assert_eq!(record.executed_at, "2020-01-01 21:00:00  (Asia/Tokyo)");
    assert_eq!(record.client_ip, "100.100.100.100");
    assert_eq!(record.duration_seconds, 1.23);
    assert_eq!(record.query_type, QueryType::Select);
    assert_eq!(record.explain_cost, "10.00..100.00");
    assert_eq!(
        record.explain_text,
        "```Gather  (cost=10.00..100.00 rows=20 width=50)\n\tWorkers Planned: 2\n\t->  \
         Parallel Seq Scan on task_logs  (cost=10.00..100.00 rows=20 width=50)```"
    );
    assert!(record.query_text.starts_with("```"));
    assert!(record.query_text.ends_with("```"));
    assert!(record.query_text.contains("SELECT"));
    assert!(record.query_text.contains("\"TEST\""));
    assert!(record.query_text.contains("$1"));
    assert_eq!(
        identify_info,
        "2020-01-01 12:00:00 UTC:100.100.100.100(10000):client_name:[10000]"
    );
}

#[test]
fn parse_query_log_tolerates_leading_sql_comment() {
    let line = sample_line().replace(
        "Query Text: SELECT",
        "Query Text: /* sample comment */\nSELECT",
    );
    let (record, _) = parse_query_log(&line, Tokyo).expect("parse");

    // The comment belongs to the query text; the plan still starts at the
    // first (cost= line.
    assert!(record.query_text.contains("sample comment"));
    assert!(record.query_text.contains("SELECT"));
    assert!(record.explain_text.starts_with("```Gather  (cost=10.00..100.00"));
    assert_eq!(record.explain_cost, "10.00..100.00");
}

#[test]
fn duration_is_milliseconds_rounded_to_two_decimals() {
    assert_eq!(
        extract_duration_seconds("duration: 1234.567 ms plan:").expect("duration"),
        1.23
    );
    assert_eq!(
        extract_duration_seconds("duration: 1999.999 ms plan:").expect("duration"),
        2.0
    );
    assert_eq!(
        extract_duration_seconds("duration: 5.0 ms plan:").expect("duration"),
        0.01
    );
}

#[test]
fn query_type_detection_is_priority_ordered() {
    assert_eq!(
        detect_query_type("SELECT * FROM t WHERE c = 'INSERT'"),
        QueryType::Select
    );
    assert_eq!(detect_query_type("INSERT INTO t VALUES (1)"), QueryType::Insert);
    assert_eq!(detect_query_type("UPDATE t SET c = 1"), QueryType::Update);
    assert_eq!(detect_query_type("DELETE FROM t"), QueryType::Delete);
    assert_eq!(detect_query_type("VACUUM t"), QueryType::Unknown);
}

#[test]
fn reformatted_query_still_carries_placeholders_for_substitution() {
    let (record, _) = parse_query_log(&sample_line(), Tokyo).expect("parse");
    let parameter_line =
        "2020-01-01 12:00:00 UTC:100.100.100.100(10000):client_name:[10000]:DETAIL:  \
         parameters: $1 = '105'";

    let substituted =
        crate::parameters::substitute_parameters(parameter_line, &record.query_text)
            .expect("substitute");
    // Reformatting must leave the placeholder intact so the parameter
    // record can still bind it.
    assert!(substituted.contains("'105'"));
    assert!(!substituted.contains("$1"));
    assert!(substituted.contains("SELECT"));
}

#[test]
fn parse_query_log_fails_fast_on_missing_plan() {
    let line = "2020-01-01 12:00:00 UTC:100.100.100.100(10000):app:[1]:LOG:  \
                duration: 10.0 ms plan:\n\tQuery Text: SELECT 1";
    let error = parse_query_log(line, Tokyo).expect_err("no plan boundary");
    assert!(matches!(error, ParseError::MissingField("query text")));
}

#[test]
fn parse_query_log_fails_fast_on_missing_duration() {
    let line = sample_line().replace(" ms ", " ");
    let error = parse_query_log(&line, Tokyo).expect_err("no duration unit");
    assert!(matches!(error, ParseError::MissingField("duration")));
}
