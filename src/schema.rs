//! Typed views over feature payloads
//!
//! The assistant returns whatever object the model produced. Callers
//! that need guaranteed fields convert with `TryFrom<&StructuredResult>`,
//! which fails on an error result or on a payload missing required
//! fields.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;
use crate::request::StructuredResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feeding
{   pub feed_type: String
  , pub quantity_kg: f64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySchedule
{   pub day: u32
  , #[serde(default)]
    pub date: Option<String>
  , #[serde(default)]
    pub feedings: Vec<Feeding>
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingPlan
{   pub animal_tag_id: String
  , #[serde(default)]
    pub plan_start_date: Option<String>
  , pub daily_schedule: Vec<DailySchedule>
  , #[serde(default)]
    pub notes: Option<String>
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity
{   #[serde(alias = "low", alias = "LOW")]
    Low
  , #[serde(alias = "medium", alias = "MEDIUM")]
    Medium
  , #[serde(alias = "high", alias = "HIGH")]
    High
}

impl fmt::Display for Severity
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   let s = match self
        {   Severity::Low => "Low"
          , Severity::Medium => "Medium"
          , Severity::High => "High"
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly
{   pub description: String
  , #[serde(default)]
    pub potential_cause: Option<String>
  , pub severity: Severity
  , #[serde(default)]
    pub data_points_of_concern: Vec<String>
}

impl Anomaly
{   /// Alert text as shown to farm staff
    pub fn alert_message(&self) -> String
    {   match self.potential_cause.as_deref()
        {   Some(cause) if !cause.trim().is_empty() => {
              format!("{} Potential cause: {}", self.description, cause)
            }
          , _ => self.description.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport
{   pub animal_tag_id: String
  , #[serde(default)]
    pub anomalies_detected: Vec<Anomaly>
  , #[serde(default)]
    pub overall_assessment: Option<String>
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSummary
{   pub animal_tag_id: String
  , #[serde(default)]
    pub summary_period_start: Option<String>
  , #[serde(default)]
    pub summary_period_end: Option<String>
  , #[serde(default)]
    pub feeding_summary: Option<String>
  , #[serde(default)]
    pub weight_trend: Option<String>
  , #[serde(default)]
    pub temperature_trend: Option<String>
  , #[serde(default)]
    pub behavior_summary: Option<String>
  , pub overall_status: String
  , #[serde(default)]
    pub recommendations: Vec<String>
}

fn typed<T>(result: &StructuredResult) -> Result<T, Error>
where T: serde::de::DeserializeOwned
{   match result
    {   StructuredResult::Payload(map) => {
          serde_json::from_value(Value::Object(map.clone()))
            .map_err(|e| Error::ParseError(e.to_string()))
        }
      , StructuredResult::Error(err) => Err(Error::Other(err.error.clone()))
    }
}

impl TryFrom<&StructuredResult> for FeedingPlan
{   type Error = Error;

    fn try_from(result: &StructuredResult) -> Result<Self, Error>
    {   typed(result)
    }
}

impl TryFrom<&StructuredResult> for AnomalyReport
{   type Error = Error;

    fn try_from(result: &StructuredResult) -> Result<Self, Error>
    {   typed(result)
    }
}

impl TryFrom<&StructuredResult> for HealthSummary
{   type Error = Error;

    fn try_from(result: &StructuredResult) -> Result<Self, Error>
    {   typed(result)
    }
}
