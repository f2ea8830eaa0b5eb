//! Caller-side formatting of record history lines for prompts

use chrono::NaiveDate;

/// `- 2024-05-15: Hay, 8.5 kg` with an optional `, Notes: ..` suffix.
///
/// Pass `Some(notes)` (or `Some(None)` for "None") when the prompt
/// should carry notes; the feeding-plan prompt leaves them out.
pub fn feeding_line(
  date: NaiveDate
, feed_type: &str
, quantity_kg: f64
, notes: Option<Option<&str>>
) -> String
{   let mut line = format!(
      "- {}: {}, {} kg",
      date.format("%Y-%m-%d"),
      feed_type,
      quantity_kg
    );
    if let Some(notes) = notes
    {   line.push_str(", Notes: ");
        line.push_str(non_empty(notes).unwrap_or("None"));
    }
    line
}

/// `- 2024-05-15: Weight 600 kg, Temp 38.6 C, Behavior: Active, Notes: None`
pub fn health_line(
  date: NaiveDate
, weight_kg: Option<f64>
, temperature_celsius: Option<f64>
, behavior: &str
, notes: Option<&str>
) -> String
{   format!(
      "- {}: Weight {} kg, Temp {} C, Behavior: {}, Notes: {}",
      date.format("%Y-%m-%d"),
      or_na(weight_kg),
      or_na(temperature_celsius),
      behavior,
      non_empty(notes).unwrap_or("None")
    )
}

fn or_na(value: Option<f64>) -> String
{   value
      .map(|v| v.to_string())
      .unwrap_or_else(|| "N/A".to_string())
}

fn non_empty(text: Option<&str>) -> Option<&str>
{   text.filter(|t| !t.trim().is_empty())
}
