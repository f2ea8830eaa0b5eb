#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use herd_assist::error::Error;
use herd_assist::providers::ModelTransport;
use herd_assist::request::GenerationRequest;
use tokio::time::Instant;

/// Transport that replays scripted answers and records every call
pub struct ScriptedTransport
{   models: Result<Vec<String>, Error>
  , probe_ok: Vec<String>
  , probe_error: Option<Error>
  , replies: Mutex<VecDeque<Result<String, Error>>>
  , pub list_calls: Mutex<usize>
  , pub probe_calls: Mutex<Vec<String>>
  , pub requests: Mutex<Vec<(String, GenerationRequest)>>
  , pub call_times: Mutex<Vec<Instant>>
}

impl ScriptedTransport
{   pub fn new() -> Self
    {   ScriptedTransport
        {   models: Ok(vec![])
          , probe_ok: vec![]
          , probe_error: None
          , replies: Mutex::new(VecDeque::new())
          , list_calls: Mutex::new(0)
          , probe_calls: Mutex::new(vec![])
          , requests: Mutex::new(vec![])
          , call_times: Mutex::new(vec![])
        }
    }

    pub fn with_models(mut self, models: &[&str]) -> Self
    {   self.models = Ok(models.iter().map(|m| m.to_string()).collect());
        self
    }

    pub fn with_listing_error(mut self, error: Error) -> Self
    {   self.models = Err(error);
        self
    }

    pub fn with_probe_ok(mut self, models: &[&str]) -> Self
    {   self.probe_ok = models.iter().map(|m| m.to_string()).collect();
        self
    }

    /// Error returned by probes of models not in the ok list;
    /// defaults to `ModelNotFound`
    pub fn with_probe_error(mut self, error: Error) -> Self
    {   self.probe_error = Some(error);
        self
    }

    pub fn with_replies(
      self
    , replies: Vec<Result<String, Error>>
    ) -> Self
    {   *self.replies.lock().unwrap() = replies.into();
        self
    }

    pub fn with_reply(self, text: &str) -> Self
    {   self.with_replies(vec![Ok(text.to_string())])
    }

    pub fn generate_calls(&self) -> usize
    {   self.requests.lock().unwrap().len()
    }

    pub fn list_calls(&self) -> usize
    {   *self.list_calls.lock().unwrap()
    }

    pub fn probes(&self) -> Vec<String>
    {   self.probe_calls.lock().unwrap().clone()
    }

    pub fn times(&self) -> Vec<Instant>
    {   self.call_times.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<(String, GenerationRequest)>
    {   self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ModelTransport for ScriptedTransport
{   async fn list_models(&self) -> Result<Vec<String>, Error>
    {   *self.list_calls.lock().unwrap() += 1;
        self.models.clone()
    }

    async fn probe_model(&self, model: &str) -> Result<(), Error>
    {   self.probe_calls.lock().unwrap().push(model.to_string());
        if self.probe_ok.iter().any(|m| m == model)
        {   Ok(())
        } else
        {   Err(self.probe_error.clone().unwrap_or_else(|| {
              Error::ModelNotFound(model.to_string())
            }))
        }
    }

    async fn generate(
      &self
    , model: &str
    , request: &GenerationRequest
    ) -> Result<String, Error>
    {   self.call_times.lock().unwrap().push(Instant::now());
        self.requests
          .lock()
          .unwrap()
          .push((model.to_string(), request.clone()));
        self.replies
          .lock()
          .unwrap()
          .pop_front()
          .unwrap_or_else(|| {
            Err(Error::HttpError("no scripted reply".to_string()))
          })
    }
}

pub fn feeding_plan_reply(tag_id: &str, days: usize) -> String
{   let schedule: Vec<String> = (1..=days)
      .map(|day| {
        format!(
          r#"    {{ "day": {day}, "date": "2024-05-{date:02}", "feedings": [{{"feed_type": "Hay", "quantity_kg": 8.5}}, {{"feed_type": "Grain Mix", "quantity_kg": 4.2}}]}}"#,
          day = day,
          date = 21 + day
        )
      })
      .collect();

    format!(
      "Here is the plan you asked for:\n```json\n{{\n  \"animal_tag_id\": \"{}\",\n  \"plan_start_date\": \"2024-05-22\",\n  \"daily_schedule\": [\n{}\n  ],\n  \"notes\": \"Keep fresh water available.\"\n}}\n```\nLet me know if you need changes.",
      tag_id,
      schedule.join(",\n")
    )
}
