//! Prompt text for the three assistant features
//!
//! The wording, including the literal JSON example in each prompt, is
//! the contract with the hosted model. Changing it changes what the
//! model returns.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identity of the animal a prompt is about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalProfile
{   pub tag_id: String
  , pub species: String
  , pub breed: Option<String>
  , /// Human readable, e.g. "3.5 years (1277 days)"
    pub age: String
}

impl AnimalProfile
{   pub fn new(
      tag_id: impl Into<String>
    , species: impl Into<String>
    , breed: Option<String>
    , age: impl Into<String>
    ) -> Self
    {   AnimalProfile
        {   tag_id: tag_id.into()
          , species: species.into()
          , breed
          , age: age.into()
        }
    }

    fn breed_or_unknown(&self) -> &str
    {   match self.breed.as_deref().map(str::trim)
        {   Some(breed) if !breed.is_empty() => breed
          , _ => "Unknown"
        }
    }
}

/// Inputs for a 7-day feeding plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingPlanFacts
{   pub animal: AnimalProfile
  , pub weight_kg: Option<f64>
  , /// Pre-formatted lines, see [`crate::history`]
    pub feeding_history: Vec<String>
  , pub available_feed_types: Vec<String>
  , pub plan_start_date: NaiveDate
}

/// Inputs for anomaly detection over recent records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyFacts
{   pub animal: AnimalProfile
  , pub feeding_history: Vec<String>
  , pub health_history: Vec<String>
}

/// Inputs for a whole-history health summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSummaryFacts
{   pub animal: AnimalProfile
  , pub feeding_history: Vec<String>
  , pub health_history: Vec<String>
  , /// ISO date, or "N/A" when there are no records
    pub summary_period_start: String
  , pub summary_period_end: String
}

fn lines_or(lines: &[String], empty: &str) -> String
{   if lines.is_empty()
    {   empty.to_string()
    } else
    {   lines.join("\n")
    }
}

pub fn feeding_plan_prompt(facts: &FeedingPlanFacts) -> String
{   let animal = &facts.animal;
    let weight = facts.weight_kg
      .map(|w| w.to_string())
      .unwrap_or_else(|| "Unknown".to_string());
    let history = lines_or(
      &facts.feeding_history,
      "No recent feeding history available."
    );
    let feed_types = if facts.available_feed_types.is_empty()
    {   "Generic Feed, Hay, Grain".to_string()
    } else
    {   facts.available_feed_types.join(", ")
    };

    format!(
r#"You are an AI Farm Assistant specializing in livestock nutrition.
For a {species} (breed: {breed}) that is {age} old, currently weighs {weight} kg, and has the following feeding history for the past 7 days:
{history}

Available feed types include: {feed_types}

Generate a suggested daily feeding plan for the next 7 days, optimizing for healthy growth/maintenance. Provide quantities in kg for each feed type per day. Consider general nutritional needs for this type of animal.

Output the plan in a structured JSON format like:
{{
  "animal_tag_id": "{tag_id}",
  "plan_start_date": "{start}",
  "daily_schedule": [
    {{ "day": 1, "date": "YYYY-MM-DD", "feedings": [{{"feed_type": "Type A", "quantity_kg": Z}}, {{"feed_type": "Type B", "quantity_kg": W}}]}},
    ... (for 7 days)
  ],
  "notes": "General recommendations..."
}}

IMPORTANT: Your response must be valid JSON with no text or comments outside the JSON object.
"#,
      species = animal.species,
      breed = animal.breed_or_unknown(),
      age = animal.age,
      weight = weight,
      history = history,
      feed_types = feed_types,
      tag_id = animal.tag_id,
      start = facts.plan_start_date.format("%Y-%m-%d"),
    )
}

pub fn anomaly_prompt(facts: &AnomalyFacts) -> String
{   let animal = &facts.animal;
    let feeding = lines_or(
      &facts.feeding_history,
      "No recent feeding logs available."
    );
    let health = lines_or(
      &facts.health_history,
      "No recent health records available."
    );

    format!(
r#"You are an AI Farm Assistant specializing in animal health monitoring.
For a {species} (breed: {breed}) with animal ID {tag_id}, age {age}, consider the following data from the last 14 days:

Feeding Logs:
{feeding}

Health Records:
{health}

Analyze this data for any unusual patterns or potential health concerns. Look for things like:
- Significant unexplained decrease/increase in food consumption.
- Weight loss despite adequate feeding.
- Consistently high/low temperature.
- Reported lethargy or unusual behavior changes.
- Deviations from expected norms for this animal type.

If anomalies are found, describe each anomaly, its potential cause, and suggest a severity level (Low, Medium, High).
Output in JSON format:
{{
  "animal_tag_id": "{tag_id}",
  "anomalies_detected": [
    {{
      "description": "Sudden 20% decrease in feed intake over the last 3 days.",
      "potential_cause": "Possible illness, dental issue, or stress.",
      "severity": "Medium",
      "data_points_of_concern": ["Date X: Behavior noted", "Date Y: Weight drop"]
    }}
  ],
  "overall_assessment": "Some concerns noted, further observation recommended."
}}

If no significant anomalies, return an empty anomalies_detected list and a positive assessment.

IMPORTANT: Your response must be valid JSON with no text or comments outside the JSON object.
"#,
      species = animal.species,
      breed = animal.breed_or_unknown(),
      tag_id = animal.tag_id,
      age = animal.age,
      feeding = feeding,
      health = health,
    )
}

pub fn health_summary_prompt(facts: &HealthSummaryFacts) -> String
{   let animal = &facts.animal;
    let feeding = lines_or(
      &facts.feeding_history,
      "No feeding logs available."
    );
    let health = lines_or(
      &facts.health_history,
      "No health records available."
    );

    format!(
r#"You are an AI Farm Assistant.
For animal ID {tag_id}, a {species} (breed: {breed}) aged {age}, provide a concise health and feeding summary based on the following data:

All Feeding Logs:
{feeding}

All Health Records:
{health}

Summarize key trends in feeding, weight, temperature, and behavior. Highlight any periods of concern or improvement. Provide an overall health status indication.
Output in JSON format:
{{
  "animal_tag_id": "{tag_id}",
  "summary_period_start": "{start}",
  "summary_period_end": "{end}",
  "feeding_summary": "Average daily intake X kg. Consistent feed types. [Any notable changes].",
  "weight_trend": "Weight has [increased/decreased/stayed stable] from X kg to Y kg. [Comment on trend].",
  "temperature_trend": "Temperatures generally stable around X C. [Any notable spikes/dips].",
  "behavior_summary": "Behavior mostly [e.g., active]. [Any reported issues and their resolution/status].",
  "overall_status": "Good / Fair / Needs Monitoring / Concern",
  "recommendations": ["Continue current feeding plan.", "Monitor X more closely."]
}}

IMPORTANT: Your response must be valid JSON with no text or comments outside the JSON object.
"#,
      tag_id = animal.tag_id,
      species = animal.species,
      breed = animal.breed_or_unknown(),
      age = animal.age,
      feeding = feeding,
      health = health,
      start = facts.summary_period_start,
      end = facts.summary_period_end,
    )
}
