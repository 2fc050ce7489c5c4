//! Flowsheet client against a mock flowsheet service
//!
//! The mock server stands in for the servlets: it checks the form bodies and
//! the automation key, and answers with the 302 redirects the real service
//! sends.

use std::time::Duration;

use autodj_core::ShowId;
use flowsheet_client::{DjIdentity, FlowsheetClient, FlowsheetError, API_KEY_HEADER};
use mockito::{Matcher, Server};
use rstest::rstest;

const KEY: &str = "test-key";

fn client(server: &Server) -> FlowsheetClient {
    FlowsheetClient::with_timeout(server.url(), KEY, Duration::from_secs(2))
}

#[test]
fn test_start_show_parses_redirect() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/playlists/startRadioShow")
        .match_header(API_KEY_HEADER, KEY)
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(
            "djID=0&djName=Auto+DJ&djHandle=AutoDJ&showName=Auto+DJ&startingHour=1705345200000",
        )
        .with_status(302)
        .with_header(
            "Location",
            "/playlists/flowsheet?mode=modifyFlowsheet&radioShowID=123",
        )
        .create();

    let show = client(&server).start_show(1_705_345_200_000).unwrap();

    assert_eq!(show.get(), 123);
    mock.assert();
}

#[test]
fn test_start_show_with_custom_identity() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/playlists/startRadioShow")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("djID=7".to_string()),
            Matcher::Regex("djName=Night\\+Bot".to_string()),
            Matcher::Regex("showName=After\\+Hours".to_string()),
        ]))
        .with_status(302)
        .with_header("Location", "/playlists/flowsheet?radioShowID=8")
        .create();

    let identity = DjIdentity {
        dj_id: "7".to_string(),
        dj_name: "Night Bot".to_string(),
        dj_handle: "nightbot".to_string(),
        show_name: "After Hours".to_string(),
    };
    let show = client(&server)
        .with_identity(identity)
        .start_show(3_600_000)
        .unwrap();

    assert_eq!(show.get(), 8);
    mock.assert();
}

#[test]
fn test_start_show_without_location_fails() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/playlists/startRadioShow")
        .with_status(302)
        .create();

    let err = client(&server).start_show(3_600_000).unwrap_err();
    assert!(matches!(err, FlowsheetError::MissingLocation));
}

#[test]
fn test_start_show_with_bad_location_fails() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/playlists/startRadioShow")
        .with_status(302)
        .with_header("Location", "/playlists/flowsheet?mode=view")
        .create();

    match client(&server).start_show(3_600_000) {
        Err(FlowsheetError::MissingShowId(location)) => {
            assert_eq!(location, "/playlists/flowsheet?mode=view")
        }
        other => panic!("expected MissingShowId, got {:?}", other),
    }
}

#[rstest]
#[case::ok_page(200)]
#[case::forbidden(403)]
#[case::server_error(500)]
fn test_non_redirect_status_is_an_error(#[case] status: usize) {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/playlists/finishRadioShow")
        .with_status(status)
        .with_body("nope")
        .create();

    let err = client(&server)
        .end_show(ShowId::new(42).unwrap())
        .unwrap_err();
    match err {
        FlowsheetError::UnexpectedStatus(code) => assert_eq!(usize::from(code), status),
        other => panic!("expected UnexpectedStatus, got {:?}", other),
    }
}

#[test]
fn test_add_entry_encodes_track_fields() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/playlists/flowsheetEntryAdd")
        .match_header(API_KEY_HEADER, KEY)
        .match_body(
            "radioShowID=42&workingHour=1705345200000&artistName=Sonic+Youth\
             &songTitle=Teen+Age+Riot&releaseTitle=Daydream+Nation%2FDeluxe\
             &releaseType=otherRelease&autoBreakpoint=true",
        )
        .with_status(302)
        .with_header("Location", "/playlists/flowsheet?radioShowID=42")
        .create();

    client(&server)
        .add_entry(
            ShowId::new(42).unwrap(),
            1_705_345_200_000,
            "Sonic Youth",
            "Teen Age Riot",
            "Daydream Nation/Deluxe",
        )
        .unwrap();

    mock.assert();
}

#[test]
fn test_add_entry_encodes_non_ascii_and_reserved_bytes() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/playlists/flowsheetEntryAdd")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(
            "radioShowID=7&workingHour=1705345200000&artistName=Sigur+R%C3%B3s\
             &songTitle=Hopp%C3%ADpolla+%7E+live&releaseTitle=A+%26+B%3DC\
             &releaseType=otherRelease&autoBreakpoint=true",
        )
        .with_status(302)
        .with_header("Location", "/playlists/flowsheet?radioShowID=7")
        .create();

    client(&server)
        .add_entry(
            ShowId::new(7).unwrap(),
            1_705_345_200_000,
            "Sigur Rós",
            "Hoppípolla ~ live",
            "A & B=C",
        )
        .unwrap();

    mock.assert();
}

#[test]
fn test_end_show_confirms_signoff() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/playlists/finishRadioShow")
        .match_body("radioShowID=42&mode=signoffConfirm")
        .with_status(302)
        .with_header("Location", "/playlists/")
        .create();

    client(&server).end_show(ShowId::new(42).unwrap()).unwrap();

    mock.assert();
}

#[test]
fn test_unreachable_service_is_a_network_error() {
    // Nothing listens on port 9 of the loopback interface.
    let client = FlowsheetClient::with_timeout("http://127.0.0.1:9", KEY, Duration::from_secs(1));
    let err = client.end_show(ShowId::new(1).unwrap()).unwrap_err();
    assert!(matches!(err, FlowsheetError::Network(_)));
}
