//! Plain-text rendering of the herd dashboard.

use farmsense_common::types::EnrichedAnimal;
use std::fmt::Write;

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or("N/A")
}

fn num<T: ToString>(value: Option<T>, unit: &str) -> String {
    match value {
        Some(v) => format!("{}{unit}", v.to_string()),
        None => "N/A".to_string(),
    }
}

fn yes_no(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "Yes",
        Some(false) => "No",
        None => "N/A",
    }
}

fn alert_lines(out: &mut String, animal: &EnrichedAnimal, indent: &str) {
    for alert in &animal.alerts {
        let _ = writeln!(out, "{indent}[{}] {}", alert.severity, alert.message);
    }
}

/// Summary card shown in the dashboard grid.
pub fn card(animal: &EnrichedAnimal) -> String {
    let r = &animal.record;
    let mut out = String::new();
    let marker = if animal.is_critical { " (!)" } else { "" };
    let _ = writeln!(out, "Cow {}{marker}", r.display_id);
    alert_lines(&mut out, animal, "  ");
    let _ = writeln!(
        out,
        "  Health: {} | Alert: {} | Milk: {} | Temp: {}",
        or_na(r.health_condition.as_deref()),
        animal.alert_level,
        num(r.milk_yield_liters, " L"),
        num(r.temperature_c, "°C"),
    );
    out
}

/// Full record view, the terminal counterpart of the details modal.
pub fn details(animal: &EnrichedAnimal) -> String {
    let r = &animal.record;
    let mut out = String::new();
    let _ = writeln!(out, "Cow {} - Full Details", r.display_id);
    if !animal.alerts.is_empty() {
        let _ = writeln!(out, "Active Alerts");
        alert_lines(&mut out, animal, "  ");
    }
    let rows: [(&str, String); 12] = [
        ("Reproductive Stage", or_na(r.reproductive_stage.as_deref()).to_string()),
        ("Last Insemination Date", num(r.last_insemination_date, "")),
        ("Days Since Insemination", num(r.days_since_insemination, "")),
        ("Postpartum Days", num(r.postpartum_days, "")),
        ("Pregnancy Status", or_na(r.pregnancy_status.as_deref()).to_string()),
        ("Heart Rate", num(r.heart_rate_bpm, " BPM")),
        ("Respiration", num(r.respiration_bpm, " BPM")),
        ("Activity Level", or_na(r.activity_level.as_deref()).to_string()),
        ("Estrus Detected", yes_no(r.estrus_detected).to_string()),
        ("Health Condition", or_na(r.health_condition.as_deref()).to_string()),
        ("Alert Level", animal.alert_level.to_string()),
        ("Milk Yield", num(r.milk_yield_liters, " L")),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "  {label:<24}{value}");
    }
    let _ = writeln!(out, "  {:<24}{}", "Temperature", num(r.temperature_c, "°C"));
    out
}

/// Text of the popup raised when an animal becomes critical.
pub fn critical_popup(animal: &EnrichedAnimal) -> String {
    let r = &animal.record;
    let mut out = String::new();
    let _ = writeln!(out, "*** CRITICAL CONDITION ALERT ***");
    let _ = writeln!(
        out,
        "Cow {} is in critical condition and requires immediate attention!",
        r.display_id
    );
    let _ = writeln!(out, "  Temperature:    {}", num(r.temperature_c, "°C"));
    let _ = writeln!(out, "  Heart Rate:     {}", num(r.heart_rate_bpm, " BPM"));
    let _ = writeln!(out, "  Current Status: CRITICAL");
    let _ = writeln!(out, "URGENT: Immediate veterinary treatment required!");
    out
}

/// Every card, or the empty-herd message.
pub fn dashboard(animals: &[EnrichedAnimal]) -> String {
    if animals.is_empty() {
        return "No animal data found in the database.\n".to_string();
    }
    animals.iter().map(card).collect::<Vec<_>>().join("\n")
}

pub fn error_line(err: &dyn std::fmt::Display) -> String {
    format!("Error loading animal data: {err}")
}
