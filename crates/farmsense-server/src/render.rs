use farmsense_common::types::AnimalRecord;
use std::fmt::Write;

const COLUMNS: [&str; 13] = [
    "Cow ID",
    "Reproductive Stage",
    "Last Insemination Date",
    "Days Since Insemination",
    "Postpartum Days",
    "Pregnancy Status",
    "Temperature (°C)",
    "Heart Rate (BPM)",
    "Respiration (BPM)",
    "Activity Level",
    "Milk Yield (Liters)",
    "Estrus Detected",
    "Health Condition",
];

/// Escapes text for use inside HTML element content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn text(value: Option<&str>) -> String {
    value.map(escape_html).unwrap_or_default()
}

fn display<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn cells(record: &AnimalRecord) -> [String; 13] {
    [
        escape_html(&record.display_id),
        text(record.reproductive_stage.as_deref()),
        display(record.last_insemination_date),
        display(record.days_since_insemination),
        display(record.postpartum_days),
        text(record.pregnancy_status.as_deref()),
        display(record.temperature_c),
        display(record.heart_rate_bpm),
        display(record.respiration_bpm),
        text(record.activity_level.as_deref()),
        display(record.milk_yield_liters),
        match record.estrus_detected {
            Some(true) => "Yes".to_string(),
            Some(false) => "No".to_string(),
            None => String::new(),
        },
        text(record.health_condition.as_deref()),
    ]
}

/// Renders the plain herd table served at `GET /animals`.
pub fn animals_table(records: &[AnimalRecord]) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>FarmSense - Animals</title>\n<style>\n\
         table { border-collapse: collapse; width: 100%; }\n\
         th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }\n\
         th { background-color: #f2f2f2; }\n\
         </style>\n</head>\n<body>\n<h1>Animals in the FarmSense database</h1>\n<table>\n<tr>",
    );
    for column in COLUMNS {
        let _ = write!(html, "<th>{column}</th>");
    }
    html.push_str("</tr>\n");

    for record in records {
        html.push_str("<tr>");
        for cell in cells(record) {
            let _ = write!(html, "<td>{cell}</td>");
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</table>\n</body>\n</html>\n");
    html
}
