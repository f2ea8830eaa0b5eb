//! Smoke test against the hosted model.
//!
//! ```text
//! herd-assist-probe [PROMPT]          generate + normalize one prompt
//! herd-assist-probe --feeding-plan    run a sample feeding plan request
//! ```

use chrono::{Duration, Local};
use log::info;

use herd_assist::history::feeding_line;
use herd_assist::prompts::{AnimalProfile, FeedingPlanFacts};
use herd_assist::{FarmAssistant, StructuredResult};

const SAMPLE_PROMPT: &str = "Generate a JSON object with information about a cow named Bessie. Include age, weight, and breed.";

fn print_result(result: &StructuredResult)
{   match serde_json::to_string_pretty(result)
    {   Ok(text) => println!("{}", text)
      , Err(e) => eprintln!("Could not render result: {}", e)
    }
}

fn sample_feeding_facts() -> FeedingPlanFacts
{   let today = Local::now().date_naive();
    let first = today - Duration::days(7);
    let feeding_history = first
      .iter_days()
      .take(7)
      .enumerate()
      .map(|(i, date)| {
        if i % 2 == 0
        {   feeding_line(date, "Hay", 8.5, Some(None))
        } else
        {   feeding_line(date, "Grain Mix", 4.2, Some(None))
        }
      })
      .collect();

    FeedingPlanFacts
    {   animal: AnimalProfile::new(
          "COW-TEST-001",
          "Cow",
          Some("Holstein".to_string()),
          "3.5 years (1277 days)"
        )
      , weight_kg: Some(600.0)
      , feeding_history
      , available_feed_types: vec![
          "Hay".to_string(),
          "Grain Mix".to_string(),
          "Silage".to_string(),
          "Pasture".to_string(),
        ]
      , plan_start_date: today
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>>
{   env_logger::init();

    let assistant = FarmAssistant::from_env().await?;
    info!("Assistant configured: {}", assistant.is_configured());

    let arg = std::env::args().nth(1);
    match arg.as_deref()
    {   Some("--feeding-plan") => {
          let result = assistant
            .generate_feeding_plan(&sample_feeding_facts())
            .await;
          print_result(&result);
        }
      , other => {
          let prompt = other.unwrap_or(SAMPLE_PROMPT);
          let outcome = assistant.client().generate(prompt, None).await;
          println!("Response from model:\n{}\n", outcome);
          let result = herd_assist::extract(&outcome.into_text());
          println!("Extracted JSON result:");
          print_result(&result);
        }
    }

    Ok(())
}
