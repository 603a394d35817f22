use crate::client::{status_error, WatchError};
use crate::config::WatchConfig;
use crate::notify::NotificationBoard;
use crate::render;
use crate::screen::Screen;
use crate::tracker::CriticalTracker;
use chrono::Utc;
use farmsense_common::types::{Alert, AlertKind, AnimalRecord, EnrichedAnimal, Severity};
use std::time::{Duration, Instant};

fn animal(id: &str, critical: bool) -> EnrichedAnimal {
    let record = AnimalRecord {
        id: id.to_string(),
        display_id: format!("C-{id}"),
        reproductive_stage: Some("lactating".into()),
        pregnancy_status: None,
        health_condition: Some("healthy".into()),
        activity_level: None,
        last_insemination_date: None,
        days_since_insemination: None,
        postpartum_days: None,
        temperature_c: Some(41.2),
        heart_rate_bpm: Some(88.0),
        respiration_bpm: None,
        milk_yield_liters: Some(22.5),
        estrus_detected: Some(false),
        last_updated: Utc::now(),
    };
    let alerts = if critical {
        vec![Alert {
            kind: AlertKind::CriticalCondition,
            message: "Critical condition".into(),
            severity: Severity::Danger,
        }]
    } else {
        Vec::new()
    };
    EnrichedAnimal::new(record, alerts, critical)
}

fn ids(list: Vec<&EnrichedAnimal>) -> Vec<String> {
    list.into_iter().map(|a| a.record.id.clone()).collect()
}

#[test]
fn tracker_reports_only_new_critical_ids() {
    let mut tracker = CriticalTracker::new();

    let poll = vec![animal("1", true), animal("2", false)];
    assert_eq!(ids(tracker.observe(&poll)), vec!["1"]);

    // Same set again: nothing new
    assert!(tracker.observe(&poll).is_empty());

    let poll = vec![animal("1", true), animal("2", true)];
    assert_eq!(ids(tracker.observe(&poll)), vec!["2"]);

    // Animal 1 leaves and comes back
    let poll = vec![animal("1", false), animal("2", true)];
    assert!(tracker.observe(&poll).is_empty());
    let poll = vec![animal("1", true), animal("2", true)];
    assert_eq!(ids(tracker.observe(&poll)), vec!["1"]);
    assert_eq!(tracker.critical_ids().len(), 2);
}

#[test]
fn board_replaces_and_expires() {
    let start = Instant::now();
    let mut board = NotificationBoard::new(Duration::from_secs(10));

    assert!(board.show("1", "first", start).is_none());
    let replaced = board
        .show("2", "second", start + Duration::from_secs(3))
        .expect("first notification is replaced");
    assert_eq!(replaced.animal_id, "1");
    assert_eq!(board.current().unwrap().text, "second");

    // Dismiss timer restarts with the replacement
    assert!(board.expire(start + Duration::from_secs(12)).is_none());
    let dismissed = board
        .expire(start + Duration::from_secs(13))
        .expect("expires after ten seconds");
    assert_eq!(dismissed.animal_id, "2");
    assert!(board.current().is_none());
    assert!(board.dismiss().is_none());
}

#[test]
fn popup_and_card_text() {
    let a = animal("7", true);

    let popup = render::critical_popup(&a);
    assert!(popup.contains("CRITICAL CONDITION ALERT"));
    assert!(popup.contains("Cow C-7"));
    assert!(popup.contains("41.2°C"));
    assert!(popup.contains("88 BPM"));

    let card = render::card(&a);
    assert!(card.starts_with("Cow C-7 (!)"));
    assert!(card.contains("[danger] Critical condition"));
    assert!(card.contains("Alert: Critical"));
    assert!(card.contains("Milk: 22.5 L"));
}

#[test]
fn details_show_every_field() {
    let a = animal("3", false);
    let text = render::details(&a);
    assert!(text.starts_with("Cow C-3 - Full Details"));
    assert!(!text.contains("Active Alerts"));
    assert!(text.contains("Reproductive Stage"));
    assert!(text.contains("lactating"));
    assert!(text.contains("Pregnancy Status        N/A"));
    assert!(text.contains("Estrus Detected         No"));
    assert!(text.contains("Alert Level             Normal"));
}

#[test]
fn empty_dashboard_message() {
    assert_eq!(
        render::dashboard(&[]),
        "No animal data found in the database.\n"
    );
    let two = render::dashboard(&[animal("1", false), animal("2", false)]);
    assert_eq!(two.matches("Cow C-").count(), 2);
}

#[test]
fn status_error_prefers_server_message() {
    match status_error(500, br#"{"error":"database unavailable"}"#) {
        WatchError::Status { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "database unavailable");
        }
        other => panic!("unexpected error: {other}"),
    }
    let err = status_error(502, b"Bad Gateway\n");
    assert_eq!(err.to_string(), "server returned 502: Bad Gateway");
    assert_eq!(
        render::error_line(&err),
        "Error loading animal data: server returned 502: Bad Gateway"
    );
}

#[test]
fn config_defaults_and_base_url() {
    let config: WatchConfig = toml::from_str("").unwrap();
    assert_eq!(config.poll_interval_ms, 500);
    assert_eq!(config.notification_dismiss_secs, 10);
    assert_eq!(config.base_url(), "http://127.0.0.1:8080");

    let config: WatchConfig = toml::from_str("server_endpoint = \"farm.local:9000/\"").unwrap();
    assert_eq!(config.base_url(), "http://farm.local:9000");
}

#[test]
fn dashboard_redraws_after_a_failed_poll() {
    let mut screen = Screen::new();
    let herd = vec![animal("1", false), animal("2", false)];
    let err = status_error(503, b"Service Unavailable");

    assert!(screen.on_poll(&herd).is_some());
    assert!(screen.on_poll(&herd).is_none());

    let line = screen.on_error(&err).expect("first failure is shown");
    assert!(line.starts_with("Error loading animal data"));
    assert!(screen.on_error(&err).is_none());

    // Same herd as before the outage, still drawn again
    let redrawn = screen.on_poll(&herd).expect("dashboard replaces the error");
    assert_eq!(redrawn, render::dashboard(&herd));
    assert!(screen.on_poll(&herd).is_none());

    // A new outage is reported again
    assert!(screen.on_error(&err).is_some());
}
