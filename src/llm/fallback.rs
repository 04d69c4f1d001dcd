//! Fallback intent classification
//!
//! Consulted only when pattern extraction cannot classify an utterance. The
//! service rewrites the utterance into a plain command the extractor already
//! understands, or gives up.

use tokio::runtime::Runtime;

use crate::core::error::Result;
use crate::llm::client::LlmClient;

/// Reply meaning "no confident guess"
const NO_GUESS: &str = "NONE";

/// Best-guess rewriting of an utterance into a command line
pub trait IntentService: Send + Sync {
    /// Return a normalized command, or `None` when there is no guess
    fn classify(&self, utterance: &str) -> Option<String>;
}

/// `IntentService` backed by a chat-completion endpoint
///
/// Blocks on a private runtime, so it must not be called from inside
/// another tokio runtime.
pub struct LlmIntentService {
    client: LlmClient,
    runtime: Runtime,
}

impl LlmIntentService {
    pub fn new(client: LlmClient) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self { client, runtime })
    }

    async fn ask(&self, utterance: &str) -> Result<String> {
        let user_prompt = format!("USER SAID:\n{}\n\nCommand:", utterance);
        self.client.complete(CLASSIFY_SYSTEM_PROMPT, &user_prompt).await
    }
}

impl IntentService for LlmIntentService {
    fn classify(&self, utterance: &str) -> Option<String> {
        let budget = self.client.timeout();
        let outcome = self
            .runtime
            .block_on(async { tokio::time::timeout(budget, self.ask(utterance)).await });

        match outcome {
            Ok(Ok(response)) => {
                let command = extract_command(&response);
                tracing::debug!(?command, model = self.client.model(), "fallback classified");
                command
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "fallback service failed");
                None
            }
            Err(_) => {
                tracing::warn!(?budget, "fallback service timed out");
                None
            }
        }
    }
}

/// Pull a single command line out of a model response
///
/// Takes the first non-empty line, drops quoting and a leading `command:`
/// label. `NONE` means the model declined.
pub fn extract_command(response: &str) -> Option<String> {
    let line = response.lines().map(str::trim).find(|l| !l.is_empty())?;

    let mut command = line.trim_matches(|c| c == '`' || c == '"' || c == '\'').trim();
    if let Some((label, rest)) = command.split_once(':') {
        if label.trim().eq_ignore_ascii_case("command") {
            command = rest.trim();
        }
    }
    let command = command.trim_matches(|c| c == '`' || c == '"' || c == '\'').trim();

    if command.is_empty() || command.eq_ignore_ascii_case(NO_GUESS) {
        None
    } else {
        Some(command.to_string())
    }
}

/// System prompt for fallback classification
const CLASSIFY_SYSTEM_PROMPT: &str = r#"You rewrite requests for a desktop assistant into one plain command.
Reply with exactly one line and nothing else.

COMMANDS YOU MAY USE:
- create folder <name> on <location>
- create file <name> in <location>
- delete <name> from <location>
- copy <name> to <location>
- move <name> to <location>
- rename <name> to <new name>
- paste in <location>
- open <application>
- open <location>
- go to <website>
- close <application>
- take a screenshot
- volume up | volume down | mute
- play | pause | next | previous
- <number> plus|minus|times|divided by <number>

Locations: desktop, downloads, documents, music, pictures, videos, library.
Join several commands with " and then ".
If the request is not one of these, reply NONE.

Examples:
"could you make me a new directory called invoices on the desktop" -> create folder invoices on desktop
"fire up spotify" -> open spotify
"how much is twelve times 3" -> 12 times 3
"what's the weather like" -> NONE
"#;
