use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

use skywatch::assistant::{
    chat_prompt, itinerary_prompt, Assistant, ChatRole, CompletionError, TextCompletionService,
    Unconfigured, EMPTY_REPLY, FALLBACK_REPLY,
};
use skywatch::catalog::{seed, Dataset};
use skywatch::LocationMetric;

enum Script {
    Reply(&'static str),
    NetworkDown,
    ProviderError,
}

struct FakeCompletion {
    script: Script,
    prompts: Mutex<Vec<String>>,
}

impl FakeCompletion {
    fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextCompletionService for FakeCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.script {
            Script::Reply(text) => Ok(text.to_string()),
            Script::NetworkDown => Err(CompletionError::Request("connection refused".to_string())),
            Script::ProviderError => Err(CompletionError::Provider("quota exceeded".to_string())),
        }
    }
}

fn jashpur() -> LocationMetric {
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 20, 0, 0).unwrap();
    seed(Dataset::Observatories, now)
        .into_iter()
        .find(|l| l.id == "jashpur")
        .unwrap()
}

#[tokio::test]
async fn starts_with_greeting() {
    let assistant = Assistant::new(FakeCompletion::new(Script::Reply("hi")), "Chhattisgarh");
    let history = assistant.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].role, ChatRole::Assistant);
    assert!(history[0].text.contains("Chhattisgarh"));
}

#[tokio::test]
async fn ask_records_question_and_reply() {
    let fake = FakeCompletion::new(Script::Reply("  Look for Saturn tonight.  "));
    let assistant = Assistant::new(fake.clone(), "Chhattisgarh");

    let reply = assistant.ask("What can I see?", &jashpur()).await;
    assert_eq!(reply.as_deref(), Some("Look for Saturn tonight."));

    let history = assistant.history();
    assert_eq!(history.len(), 3);
    assert_eq!(history[1].role, ChatRole::User);
    assert_eq!(history[1].text, "What can I see?");
    assert_eq!(history[2].text, "Look for Saturn tonight.");

    let prompts = fake.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Jashpur Hills"));
    assert!(prompts[0].contains("\"What can I see?\""));
}

#[tokio::test]
async fn network_failure_yields_fallback_text() {
    let assistant = Assistant::new(FakeCompletion::new(Script::NetworkDown), "Chhattisgarh");
    let reply = assistant.ask("Is it clear?", &jashpur()).await;
    assert_eq!(reply.as_deref(), Some(FALLBACK_REPLY));
    assert_eq!(assistant.history()[2].text, FALLBACK_REPLY);
}

#[tokio::test]
async fn provider_error_yields_fallback_text() {
    let assistant = Assistant::new(FakeCompletion::new(Script::ProviderError), "Chhattisgarh");
    assert_eq!(assistant.itinerary(&jashpur()).await, FALLBACK_REPLY);
}

#[tokio::test]
async fn unconfigured_service_yields_fallback_text() {
    let assistant = Assistant::new(Unconfigured, "Chhattisgarh");
    assert_eq!(
        assistant.ask("Hello?", &jashpur()).await.as_deref(),
        Some(FALLBACK_REPLY)
    );
}

#[tokio::test]
async fn empty_completion_yields_no_response_text() {
    let assistant = Assistant::new(FakeCompletion::new(Script::Reply("   ")), "Chhattisgarh");
    assert_eq!(assistant.itinerary(&jashpur()).await, EMPTY_REPLY);
}

#[tokio::test]
async fn blank_question_is_ignored() {
    let fake = FakeCompletion::new(Script::Reply("unused"));
    let assistant = Assistant::new(fake.clone(), "Chhattisgarh");
    assert!(assistant.ask("   ", &jashpur()).await.is_none());
    assert_eq!(assistant.history().len(), 1);
    assert!(fake.prompts().is_empty());
}

#[tokio::test]
async fn itinerary_prompt_carries_sky_context() {
    let fake = FakeCompletion::new(Script::Reply("- Orion\n- Jupiter\n- Pleiades"));
    let assistant = Assistant::new(fake.clone(), "Chhattisgarh");
    let plan = assistant.itinerary(&jashpur()).await;
    assert!(plan.starts_with("- Orion"));

    let prompts = fake.prompts();
    assert!(prompts[0].contains("Jashpur Hills, Chhattisgarh"));
    assert!(prompts[0].contains("Bortle Scale 2"));
    assert!(prompts[0].contains("Cloud Cover 5%"));
}

#[test]
fn prompt_builders() {
    let chat = chat_prompt("Chhattisgarh", "Mainpat", "When is moonrise?");
    assert!(chat.contains("Chhattisgarh SkyWatch"));
    assert!(chat.contains("Mainpat"));
    assert!(chat.contains("max 2 sentences"));

    let plan = itinerary_prompt("Chhattisgarh", &jashpur());
    assert!(plan.contains("under 80 words"));
}

// Chat prompts wait for the gate; everything else answers at once.
struct GatedCompletion {
    gate: Arc<Notify>,
}

#[async_trait]
impl TextCompletionService for GatedCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        if prompt.contains("User Question") {
            self.gate.notified().await;
            return Ok("Saturn rises after nine.".to_string());
        }
        Ok("- Orion".to_string())
    }
}

#[tokio::test]
async fn itinerary_completes_while_a_chat_is_pending() {
    let gate = Arc::new(Notify::new());
    let assistant = Arc::new(Assistant::new(
        GatedCompletion { gate: gate.clone() },
        "Chhattisgarh",
    ));

    let chat = tokio::spawn({
        let assistant = assistant.clone();
        async move { assistant.ask("Is Saturn up?", &jashpur()).await }
    });
    while assistant.history().len() < 2 {
        tokio::task::yield_now().await;
    }

    let plan = tokio::time::timeout(Duration::from_secs(5), assistant.itinerary(&jashpur()))
        .await
        .expect("itinerary blocked behind the pending chat");
    assert_eq!(plan, "- Orion");
    assert!(!chat.is_finished());

    gate.notify_one();
    assert_eq!(
        chat.await.unwrap().as_deref(),
        Some("Saturn rises after nine.")
    );
    let history = assistant.history();
    assert_eq!(history.len(), 3);
    assert_eq!(history[2].text, "Saturn rises after nine.");
}

#[tokio::test]
async fn history_is_readable_during_a_pending_chat() {
    let gate = Arc::new(Notify::new());
    let assistant = Arc::new(Assistant::new(
        GatedCompletion { gate: gate.clone() },
        "Chhattisgarh",
    ));

    let chat = tokio::spawn({
        let assistant = assistant.clone();
        async move { assistant.ask("Any meteors?", &jashpur()).await }
    });
    while assistant.history().len() < 2 {
        tokio::task::yield_now().await;
    }
    assert_eq!(assistant.history()[1].text, "Any meteors?");

    gate.notify_one();
    chat.await.unwrap();
    assert_eq!(assistant.history().len(), 3);
}
