use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static JSON_FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json\s*(\{.*?\})\s*```").expect("valid fence regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostData {
    pub component: String,
    pub new_deployment: f64,
    pub existing_canalization: f64,
    pub cost_reduction: f64,
    pub cost_reduction_percent: f64,
    pub time_reduction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub new_deployment: f64,
    pub existing_canalization: f64,
    pub cost_reduction: f64,
    pub cost_reduction_percent: f64,
    pub time_reduction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryLink {
    pub id: u32,
    pub title: String,
    pub link: String,
}

/// Cost comparison returned by the feasibility model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableData {
    pub cost_data: Vec<CostData>,
    pub totals: Totals,
    #[serde(default)]
    pub regulatory_links: Vec<RegulatoryLink>,
}

/// Pulls the first fenced ```json block out of a model reply.
///
/// Model output is not always strict JSON (trailing commas, comments), so a
/// json5 parse is tried when serde_json rejects the block.
pub fn extract_table_data(reply: &str) -> Option<TableData> {
    let block = JSON_FENCE_RE.captures(reply)?.get(1)?.as_str();
    match serde_json::from_str::<TableData>(block) {
        Ok(data) => Some(data),
        Err(strict_err) => match json5::from_str::<TableData>(block) {
            Ok(data) => Some(data),
            Err(err) => {
                log::warn!("discarding cost table: {strict_err}; lenient parse: {err}");
                None
            }
        },
    }
}

const HEADERS: [&str; 6] = [
    "Cost Component",
    "New Deployment (£)",
    "Using Existing Canalization (£)",
    "Cost Reduction (£)",
    "Cost Reduction (%)",
    "Time Reduction (%)",
];

pub const ESTIMATE_NOTE: &str =
    "Note: The above figures are estimated and may vary based on specific project conditions.";

/// Renders the comparison as an aligned plain-text table with a total row.
pub fn format_cost_table(data: &TableData) -> String {
    let mut rows: Vec<[String; 6]> = data
        .cost_data
        .iter()
        .map(|row| {
            [
                row.component.clone(),
                format_amount(row.new_deployment),
                format_amount(row.existing_canalization),
                format_amount(row.cost_reduction),
                format!("{:.2}", row.cost_reduction_percent),
                row.time_reduction.to_string(),
            ]
        })
        .collect();
    let totals = &data.totals;
    rows.push([
        "Total".to_string(),
        format_amount(totals.new_deployment),
        format_amount(totals.existing_canalization),
        format_amount(totals.cost_reduction),
        format!("{:.2}", totals.cost_reduction_percent),
        totals.time_reduction.to_string(),
    ]);

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out.push_str(ESTIMATE_NOTE);
    out.push('\n');

    if !data.regulatory_links.is_empty() {
        out.push_str("\nRegulatory links:\n");
        for link in &data.regulatory_links {
            out.push_str(&format!("  {}. {} <{}>\n", link.id, link.title, link.link));
        }
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let mut parts = Vec::with_capacity(cells.len());
    for (idx, cell) in cells.iter().enumerate() {
        let pad = widths[idx].saturating_sub(cell.chars().count());
        if idx == 0 {
            parts.push(format!("{cell}{}", " ".repeat(pad)));
        } else {
            parts.push(format!("{}{cell}", " ".repeat(pad)));
        }
    }
    out.push_str(parts.join(" | ").trim_end());
    out.push('\n');
}

/// Groups the integer part with commas and keeps up to two decimals.
fn format_amount(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let negative = rounded < 0.0;
    let abs = rounded.abs();
    let whole = abs.trunc() as u64;
    let cents = ((abs - abs.trunc()) * 100.0).round() as u64;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if cents > 0 {
        let frac = format!("{cents:02}");
        out.push('.');
        out.push_str(frac.trim_end_matches('0'));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"## 1. Cost Optimization Analysis

Connecting through the existing canalization avoids most trenching.

```json
{
  "costData": [
    {"component": "Materials", "newDeployment": 12000, "existingCanalization": 9000,
     "costReduction": 3000, "costReductionPercent": 25, "timeReduction": 10},
    {"component": "Labor", "newDeployment": 48000.5, "existingCanalization": 20000,
     "costReduction": 28000.5, "costReductionPercent": 58.334, "timeReduction": 40}
  ],
  "totals": {"newDeployment": 60000.5, "existingCanalization": 29000,
             "costReduction": 31000.5, "costReductionPercent": 51.67, "timeReduction": 35},
  "regulatoryLinks": [
    {"id": 1, "title": "Llei General de Telecomunicacions", "link": "https://www.boe.es/"}
  ]
}
```

## 2. Regional Connectivity Improvements
"#;

    #[test]
    fn extracts_fenced_table() {
        let data = extract_table_data(REPLY).unwrap();
        assert_eq!(data.cost_data.len(), 2);
        assert_eq!(data.cost_data[1].component, "Labor");
        assert_eq!(data.totals.existing_canalization, 29000.0);
        assert_eq!(data.regulatory_links[0].id, 1);
    }

    #[test]
    fn tolerates_trailing_commas() {
        let reply = "```json\n{\"costData\": [], \"totals\": {\"newDeployment\": 1, \"existingCanalization\": 1, \"costReduction\": 0, \"costReductionPercent\": 0, \"timeReduction\": 0,},}\n```";
        let data = extract_table_data(reply).unwrap();
        assert!(data.cost_data.is_empty());
        assert!(data.regulatory_links.is_empty());
    }

    #[test]
    fn missing_or_broken_block_is_none() {
        assert_eq!(extract_table_data("no table here"), None);
        assert_eq!(extract_table_data("```json\n{\"costData\": 3}\n```"), None);
    }

    #[test]
    fn formats_table_with_total_row() {
        let table = format_cost_table(&extract_table_data(REPLY).unwrap());
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].starts_with("Cost Component"));
        assert!(lines[2].starts_with("Materials"));
        assert!(lines[2].contains("12,000"));
        assert!(lines[3].contains("48,000.5"));
        assert!(lines[3].contains("58.33"));
        assert!(lines[4].starts_with("Total"));
        assert!(table.contains(ESTIMATE_NOTE));
        assert!(table.contains("1. Llei General de Telecomunicacions <https://www.boe.es/>"));
    }

    #[test]
    fn time_reduction_is_printed_as_given() {
        let data = TableData {
            cost_data: vec![CostData {
                component: "Permits".to_string(),
                new_deployment: 1000.0,
                existing_canalization: 800.0,
                cost_reduction: 200.0,
                cost_reduction_percent: 20.0,
                time_reduction: 1250.125,
            }],
            totals: Totals {
                new_deployment: 1000.0,
                existing_canalization: 800.0,
                cost_reduction: 200.0,
                cost_reduction_percent: 20.0,
                time_reduction: 12.5,
            },
            regulatory_links: Vec::new(),
        };
        let table = format_cost_table(&data);
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[2].ends_with(" 1250.125"));
        assert!(!lines[2].contains("1,250"));
        assert!(lines[3].ends_with(" 12.5"));
    }

    #[test]
    fn amount_grouping() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(999.0), "999");
        assert_eq!(format_amount(1234567.25), "1,234,567.25");
        assert_eq!(format_amount(-1500.5), "-1,500.5");
    }
}
