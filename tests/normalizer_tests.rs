use herd_assist::normalizer::{
  bound_braces, drop_comment_lines, extract, strip_comments, strip_fence,
  Normalizer, PARSE_FAILURE_MESSAGE
};
use herd_assist::request::{ErrorResult, StructuredResult};
use serde_json::{json, Value};

fn payload(result: StructuredResult) -> Value
{   match result
    {   StructuredResult::Payload(map) => Value::Object(map)
      , StructuredResult::Error(err) => {
          panic!("expected payload, got error: {:?}", err)
        }
    }
}

#[test]
fn test_json_fence_returns_object_exactly()
{   let raw = "```json\n{\"animal\": {\"tag\": \"COW-1\", \"weights\": [600, 602.5]}, \"ok\": true, \"note\": null}\n```";
    assert_eq!(
      payload(extract(raw)),
      json!({
        "animal": {"tag": "COW-1", "weights": [600, 602.5]},
        "ok": true,
        "note": null
      })
    );
}

#[test]
fn test_prose_around_object_is_discarded()
{   let raw = "Here you go:\n{\"a\":1}\nEnjoy!";
    assert_eq!(payload(extract(raw)), json!({"a": 1}));
}

#[test]
fn test_line_and_block_comments_are_stripped()
{   let raw = "// comment\n{\"a\": 1 /* note */}";
    assert_eq!(payload(extract(raw)), json!({"a": 1}));
}

#[test]
fn test_irrecoverable_text_keeps_original()
{   let raw = "{a: , b:}";
    let result = Normalizer::strict().extract(raw);
    assert_eq!(
      result,
      StructuredResult::Error(ErrorResult
      {   error: PARSE_FAILURE_MESSAGE.to_string()
        , raw_response: Some(raw.to_string())
      })
    );
    assert_eq!(
      result.to_value(),
      json!({"error": "Failed to parse AI response", "raw_response": "{a: , b:}"})
    );
}

#[test]
fn test_irrecoverable_text_with_default_normalizer()
{   let raw = "```json\n{a: , b:}\n``` sorry";
    match extract(raw)
    {   StructuredResult::Error(err) => {
          assert_eq!(err.error, PARSE_FAILURE_MESSAGE);
          assert_eq!(err.raw_response.as_deref(), Some(raw));
        }
      , other => panic!("expected error, got {:?}", other)
    }
}

#[test]
fn test_extract_is_idempotent()
{   let inputs = [
      "```json\n{\"a\": [1, 2]}\n```",
      "nonsense without braces",
      "{\"a\": 1, // trailing\n \"b\": 2}",
    ];
    for raw in inputs
    {   assert_eq!(extract(raw), extract(raw));
    }
}

#[test]
fn test_error_marker_is_passed_through()
{   let raw = "Error generating AI response: HTTP error: connection reset";
    assert_eq!(
      extract(raw),
      StructuredResult::Error(ErrorResult
      {   error: raw.to_string()
        , raw_response: None
      })
    );
}

#[test]
fn test_non_object_json_is_a_failure()
{   let raw = "[1, 2, 3]";
    assert!(extract(raw).is_error());
}

#[test]
fn test_strip_fence_prefers_json_tag()
{   let text = "```\nnot this\n```\nbut ```json\n{\"x\": 1}\n``` this";
    assert_eq!(strip_fence(text), "{\"x\": 1}");
}

#[test]
fn test_strip_fence_generic_drops_language_tag()
{   assert_eq!(strip_fence("```JSON\n{\"x\": 1}\n```"), "{\"x\": 1}");
    assert_eq!(strip_fence("```\n{\"x\": 1}\n```"), "{\"x\": 1}");
    assert_eq!(strip_fence("no fences {}"), "no fences {}");
}

#[test]
fn test_strip_fence_unclosed_runs_to_end()
{   assert_eq!(strip_fence("```json\n{\"x\": 1}\n"), "{\"x\": 1}");
}

#[test]
fn test_bound_braces()
{   assert_eq!(bound_braces("ok: {\"a\": {\"b\": 1}} done"), "{\"a\": {\"b\": 1}}");
    assert_eq!(bound_braces("} backwards {"), "} backwards {");
    assert_eq!(bound_braces("no braces"), "no braces");
}

#[test]
fn test_strip_comments_leaves_strings_alone()
{   let text = "{\"url\": \"https://example.org/a\", // gone\n \"pat\": \"/* kept */\" /* gone */}";
    assert_eq!(
      strip_comments(text),
      "{\"url\": \"https://example.org/a\", \n \"pat\": \"/* kept */\" }"
    );
}

#[test]
fn test_strip_comments_handles_escaped_quotes()
{   let text = r#"{"q": "say \"//hi\"", "n": 1} // end"#;
    assert_eq!(strip_comments(text), r#"{"q": "say \"//hi\"", "n": 1} "#);
}

#[test]
fn test_strip_comments_ignores_apostrophes()
{   assert_eq!(
      strip_comments("it's {\"a\": 1} // tail"),
      "it's {\"a\": 1} "
    );
    assert_eq!(
      strip_comments("{\"note\": \"cow's feed\", /* gone */ \"n\": 1}"),
      "{\"note\": \"cow's feed\",  \"n\": 1}"
    );
}

#[test]
fn test_drop_comment_lines()
{   let text = "{\n  \"a\": 1, /* half\n  \"b\": 2\n}";
    assert_eq!(drop_comment_lines(text), "{\n  \"b\": 2\n}");
}

#[test]
fn test_line_drop_recovers_unterminated_block_comment()
{   let raw = "{\n  \"a\": 1, /* unterminated\n  \"b\": 2\n}";
    assert_eq!(
      payload(Normalizer::strict().extract(raw)),
      json!({"b": 2})
    );
}

#[cfg(feature = "permissive")]
#[test]
fn test_permissive_pass_accepts_json5()
{   let raw = "{animal: 'COW-1', feeds: ['Hay', 'Grain',],}";
    assert_eq!(
      payload(Normalizer::new().extract(raw)),
      json!({"animal": "COW-1", "feeds": ["Hay", "Grain"]})
    );
    assert!(Normalizer::strict().extract(raw).is_error());
}

#[cfg(feature = "permissive")]
#[test]
fn test_permissive_pass_reads_comments_in_single_quoted_input()
{   let raw = "{animal: 'COW-1', // tag\n feeds: ['Hay // long stem', 'Grain',], /* done */}";
    assert_eq!(
      payload(Normalizer::new().extract(raw)),
      json!({"animal": "COW-1", "feeds": ["Hay // long stem", "Grain"]})
    );
}

#[test]
fn test_structured_result_serializes_as_mapping()
{   let ok = extract("{\"a\": 1}");
    assert_eq!(serde_json::to_value(&ok).unwrap(), json!({"a": 1}));

    let err = StructuredResult::error("Error: Gemini API not properly configured.");
    assert_eq!(
      serde_json::to_value(&err).unwrap(),
      json!({"error": "Error: Gemini API not properly configured."})
    );
}
