// Integration tests for Random Matchmaker

use actix_web::{http::StatusCode, test, web, App};
use chrono::{TimeZone, Utc};
use random_matchmaker::core::historical_pairs;
use random_matchmaker::models::{ErrorResponse, HealthResponse, MakeMatchesResponse};
use random_matchmaker::routes::{configure_routes, AppState};
use random_matchmaker::runner::{self, RunFiles};
use random_matchmaker::{tables, MatchError, MatchParams, Matchmaker, Pair, RunError};
use serde_json::json;
use std::collections::HashSet;
use std::fs;

const REGISTRATIONS: &str = "\
first name,last name,gender,email
Al,Adams,male,al@example.org
Bo,Brown,male,bo@example.org
Cal,Cole,male,cal@example.org
Cy,Clark,female,cy@example.org
Di,Dunn,female,di@example.org
Ev,Evans,female,ev@example.org
Fay,Ford,female,fay@example.org
Sam,Stone,unspecified,sam@example.org
";

#[::core::prelude::v1::test]
fn test_integration_three_runs_never_repeat() {
    let dir = tempfile::tempdir().unwrap();
    let registration_file = dir.path().join("registrations.csv");
    let history_file = dir.path().join("history.csv");
    let output_file = dir.path().join("output.csv");
    let deny_file = dir.path().join("deny.csv");
    fs::write(&registration_file, REGISTRATIONS).unwrap();
    fs::write(&deny_file, "first name,last name,gender\nFay,Ford,female\nBo,Brown,female\n").unwrap();

    let registrations = tables::read_people(&registration_file).unwrap();
    let deny_list = tables::read_people(&deny_file).unwrap();

    for (run, seed) in [11u64, 12, 13].iter().enumerate() {
        let history = tables::read_history(&history_file).unwrap();
        assert_eq!(history.len(), run * 3);

        let matchmaker = Matchmaker::new(MatchParams {
            seed: Some(*seed),
            ..MatchParams::default()
        });
        let report = matchmaker
            .make_matches(&registrations, &history, Some(&deny_list))
            .unwrap();

        // Fay is denied; the gender-mismatched deny row for Bo excludes nobody
        assert_eq!(report.pairs.len(), 3, "run {}", run);
        assert!(!report.budget_exhausted, "run {}", run);
        assert!(report.pairs.iter().all(|p| p.female_first_name != "Fay"));
        assert!(report.diagnostics.iter().any(|d| d.starts_with("Sam Stone")));

        let past = historical_pairs(&history);
        assert!(report.pairs.iter().all(|p| !past.contains(p)), "run {} repeated a pair", run);

        tables::write_pairs(&output_file, &report.pairs).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 3, 1 + run as u32, 18, 0, 0).unwrap();
        tables::append_history(&history_file, &tables::stamp_pairs(&report.pairs, at)).unwrap();
    }

    let history = tables::read_history(&history_file).unwrap();
    assert_eq!(history.len(), 9);
    assert_eq!(historical_pairs(&history).len(), 9);
    assert_eq!(history[0].date, "2024-03-01 18:00:00.000000");

    let output = fs::read_to_string(&output_file).unwrap();
    assert_eq!(output.lines().count(), 4);
    assert!(output.starts_with("male first name,male last name,female first name,female last name"));
}

#[::core::prelude::v1::test]
fn test_integration_reads_existing_history_with_foreign_dates() {
    let dir = tempfile::tempdir().unwrap();
    let history_file = dir.path().join("history.csv");
    fs::write(
        &history_file,
        "date,male first name,male last name,female first name,female last name\n\
         2023-02-14 19:00:00.123456,Al,Adams,Cy,Clark\n\
         not a date,Bo,Brown,Di,Dunn\n",
    )
    .unwrap();

    let history = tables::read_history(&history_file).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].date, "not a date");
    assert_eq!(history[1].pair.female_first_name, "Di");
}

#[::core::prelude::v1::test]
fn test_run_creates_history_and_prints_notices() {
    let dir = tempfile::tempdir().unwrap();
    let files = RunFiles {
        registrations: dir.path().join("registrations.csv"),
        history: dir.path().join("history.csv"),
        output: dir.path().join("output.csv"),
        deny_list: None,
    };
    fs::write(&files.registrations, REGISTRATIONS).unwrap();
    assert!(!files.history.exists());

    let at = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
    let params = MatchParams { seed: Some(3), ..MatchParams::default() };
    let mut out = Vec::new();
    let report = runner::run(&files, params, true, at, &mut out).unwrap();
    assert_eq!(report.pairs.len(), 3);

    let printed = String::from_utf8(out).unwrap();
    let mut lines = printed.lines();
    assert_eq!(lines.next(), Some("Sam Stone has unrecognized gender \"unspecified\" and will be excluded."));
    assert!(lines.next().unwrap().starts_with("male first name"));
    assert_eq!(lines.count(), 3);

    let output = fs::read_to_string(&files.output).unwrap();
    let expected: Vec<String> = report
        .pairs
        .iter()
        .map(|p| format!("{},{},{},{}", p.male_first_name, p.male_last_name, p.female_first_name, p.female_last_name))
        .collect();
    assert_eq!(output.lines().skip(1).collect::<Vec<_>>(), expected);

    let history = tables::read_history(&files.history).unwrap();
    assert_eq!(history.len(), 3);
    assert!(history.iter().all(|r| r.date == "2024-06-01 09:00:00.000000"));
    assert_eq!(history.into_iter().map(|r| r.pair).collect::<Vec<_>>(), report.pairs);
}

#[::core::prelude::v1::test]
fn test_run_failure_leaves_files_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let files = RunFiles {
        registrations: dir.path().join("registrations.csv"),
        history: dir.path().join("history.csv"),
        output: dir.path().join("output.csv"),
        deny_list: None,
    };
    fs::write(&files.registrations, "first name,last name,gender\nAl,Adams,male\n").unwrap();

    let mut out = Vec::new();
    let err = runner::run(&files, MatchParams::default(), false, Utc::now(), &mut out).unwrap_err();
    assert!(matches!(
        err,
        RunError::Match(MatchError::InsufficientParticipants { .. })
    ));
    assert!(out.is_empty());
    assert!(!files.output.exists());
    assert!(tables::read_history(&files.history).unwrap().is_empty());
}

fn app_state() -> AppState {
    AppState {
        matchmaker: Matchmaker::new(MatchParams::default()),
    }
}

#[actix_web::test]
async fn test_health_endpoint() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp: HealthResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp.status, "healthy");
}

#[actix_web::test]
async fn test_make_matches_endpoint() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state()))
            .configure(configure_routes),
    )
    .await;

    let body = json!({
        "registrations": [
            {"firstName": "A", "lastName": "A", "gender": "male"},
            {"firstName": "B", "lastName": "B", "gender": "male"},
            {"firstName": "C", "lastName": "C", "gender": "female"},
            {"firstName": "D", "lastName": "D", "gender": "female"}
        ],
        "history": [
            {"date": "2023-01-01", "maleFirstName": "A", "maleLastName": "A", "femaleFirstName": "C", "femaleLastName": "C"},
            {"date": "2023-01-01", "maleFirstName": "B", "maleLastName": "B", "femaleFirstName": "D", "femaleLastName": "D"}
        ],
        "maxIterations": 50,
        "seed": 7
    });

    let req = test::TestRequest::post().uri("/api/v1/matches").set_json(&body).to_request();
    let resp: MakeMatchesResponse = test::call_and_read_body_json(&app, req).await;

    assert!(!resp.budget_exhausted);
    assert!(!resp.run_id.is_empty());
    let pairs: HashSet<(String, String)> = resp
        .pairs
        .iter()
        .map(|p: &Pair| (p.male_first_name.clone(), p.female_first_name.clone()))
        .collect();
    let expected: HashSet<(String, String)> =
        [("A".to_string(), "D".to_string()), ("B".to_string(), "C".to_string())].into_iter().collect();
    assert_eq!(pairs, expected);
}

#[actix_web::test]
async fn test_make_matches_endpoint_errors() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state()))
            .configure(configure_routes),
    )
    .await;

    // Only males registered
    let req = test::TestRequest::post()
        .uri("/api/v1/matches")
        .set_json(json!({"registrations": [{"firstName": "A", "lastName": "A", "gender": "male"}]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.message, "Not enough eligible female participants");

    // Threshold outside (0, 1]
    let req = test::TestRequest::post()
        .uri("/api/v1/matches")
        .set_json(json!({
            "registrations": [{"firstName": "A", "lastName": "A", "gender": "male"}],
            "threshold": 1.5
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Empty registrations fail request validation
    let req = test::TestRequest::post()
        .uri("/api/v1/matches")
        .set_json(json!({"registrations": []}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Malformed JSON goes through the JSON error handler
    let req = test::TestRequest::post()
        .uri("/api/v1/matches")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
