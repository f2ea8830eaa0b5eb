use std::collections::HashMap;

use chrono::NaiveDate;
use herd_assist::config::{API_KEY_VAR, DEFAULT_API_BASE, FALLBACK_API_KEY_VAR};
use herd_assist::history::{feeding_line, health_line};
use herd_assist::prompts::{AnimalProfile, FeedingPlanFacts};
use herd_assist::schema::{AnomalyReport, Severity};
use herd_assist::{AssistantConfig, FarmAssistant, StructuredResult};
use serde_json::json;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String>
{   let map: HashMap<String, String> = vars
      .iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect();
    move |key| map.get(key).cloned()
}

/// Get API key from environment
fn get_api_key() -> Option<String>
{   std::env::var(API_KEY_VAR)
      .or_else(|_| std::env::var(FALLBACK_API_KEY_VAR))
      .ok()
}

#[test]
fn test_config_defaults()
{   let config = AssistantConfig::from_lookup(lookup(&[]));
    assert!(!config.has_credential());
    assert_eq!(config.api_base, DEFAULT_API_BASE);
    assert_eq!(config.preferred_models[0], "gemini-1.5-flash-latest");
    assert_eq!(config.generation.temperature, 0.2);
    assert_eq!(config.generation.max_output_tokens, 2048);
    assert_eq!(config.retry.max_retries, 2);
}

#[test]
fn test_config_reads_fallback_key_and_overrides()
{   let config = AssistantConfig::from_lookup(lookup(&[
      (API_KEY_VAR, "  "),
      (FALLBACK_API_KEY_VAR, "fallback-key"),
      ("HERD_ASSIST_API_BASE", "http://localhost:8080/v1beta/"),
      ("HERD_ASSIST_MODELS", "gemini-2.0-flash, ,gemini-pro"),
      ("HERD_ASSIST_TIMEOUT_SECS", "not-a-number"),
    ]));

    assert_eq!(config.api_key.as_deref(), Some("fallback-key"));
    assert_eq!(config.api_base, "http://localhost:8080/v1beta");
    assert_eq!(config.preferred_models, vec!["gemini-2.0-flash", "gemini-pro"]);
    assert_eq!(config.timeout_secs, 60);
}

#[test]
fn test_config_never_serializes_key()
{   let config = AssistantConfig::default().with_api_key("secret");
    let value = serde_json::to_value(&config).unwrap();
    assert!(value.get("api_key").is_none());
    assert!(!value.to_string().contains("secret"));
}

#[test]
fn test_history_lines()
{   let date = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
    assert_eq!(
      feeding_line(date, "Hay", 8.5, None),
      "- 2024-05-15: Hay, 8.5 kg"
    );
    assert_eq!(
      feeding_line(date, "Hay", 8.5, Some(Some(""))),
      "- 2024-05-15: Hay, 8.5 kg, Notes: None"
    );
    assert_eq!(
      health_line(date, Some(600.0), None, "Active", None),
      "- 2024-05-15: Weight 600 kg, Temp N/A C, Behavior: Active, Notes: None"
    );
}

#[test]
fn test_severity_missing_fails_typed_view()
{   let result = herd_assist::extract(&json!({
      "animal_tag_id": "GOAT-7",
      "anomalies_detected": [{"description": "Limping"}]
    }).to_string());

    assert!(!result.is_error());
    assert!(AnomalyReport::try_from(&result).is_err());

    let result = herd_assist::extract(&json!({
      "animal_tag_id": "GOAT-7",
      "anomalies_detected": [{"description": "Limping", "severity": "low"}]
    }).to_string());
    let report = AnomalyReport::try_from(&result).unwrap();
    assert_eq!(report.anomalies_detected[0].severity, Severity::Low);
    assert_eq!(report.anomalies_detected[0].alert_message(), "Limping");
}

#[tokio::test]
#[ignore]
async fn test_live_generate_and_extract()
{   if get_api_key().is_none()
    {   println!("Skipping test: {} not set in environment", API_KEY_VAR);
        return;
    }

    let assistant = FarmAssistant::from_env().await.unwrap();
    assert!(assistant.is_configured());

    let outcome = assistant.client()
      .generate(
        "Generate a JSON object with information about a cow named Bessie. Include age, weight, and breed.",
        None
      )
      .await;
    println!("Response: {}", outcome);

    let result = herd_assist::extract(&outcome.into_text());
    println!("Extracted: {}", result.to_value());
    assert!(!result.is_error());
}

#[tokio::test]
#[ignore]
async fn test_live_feeding_plan()
{   if get_api_key().is_none()
    {   println!("Skipping test: {} not set in environment", API_KEY_VAR);
        return;
    }

    let assistant = FarmAssistant::from_env().await.unwrap();
    let start = NaiveDate::from_ymd_opt(2024, 5, 22).unwrap();
    let facts = FeedingPlanFacts
    {   animal: AnimalProfile::new("COW-TEST-001", "Cow", Some("Holstein".to_string()), "3.5 years (1277 days)")
      , weight_kg: Some(600.0)
      , feeding_history: vec![]
      , available_feed_types: vec!["Hay".to_string(), "Silage".to_string()]
      , plan_start_date: start
    };

    match assistant.generate_feeding_plan(&facts).await
    {   StructuredResult::Payload(plan) => {
          println!("Plan: {}", serde_json::Value::Object(plan.clone()));
          assert_eq!(plan.get("animal_tag_id"), Some(&json!("COW-TEST-001")));
        }
      , StructuredResult::Error(err) => {
          println!("Failed: {:?}", err);
        }
    }
}

#[test]
fn test_connect_without_key_is_not_configured()
{   let assistant = tokio_test::block_on(
      FarmAssistant::connect(&AssistantConfig::default())
    ).unwrap();

    assert!(!assistant.is_configured());
    let outcome = tokio_test::block_on(
      assistant.client().generate("Say hello", None)
    );
    assert!(outcome.is_failure());
}
