//! Scene generation client.
//!
//! Sends a dream transcript to a structured-output generation endpoint and
//! parses the response into a [`SceneDescription`]. Transport and shape
//! failures are retried with exponential backoff up to the attempt ceiling;
//! after that the caller gets a terminal `RetriesExhausted`.

use serde_json::{json, Value};
use url::Url;

use crate::net::retry::{backoff_delay, RetryTimer, ThreadTimer, MAX_ATTEMPTS};
use crate::net::FetchEvents;
use crate::scene::SceneDescription;

/// Structured-generation endpoint. The API key is appended as a query
/// parameter at request time.
pub const API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-preview-05-20:generateContent";

/// Error during a scene fetch.
#[derive(Debug, Clone)]
pub enum FetchError {
    /// Network/endpoint failure: connection error or non-success status.
    Transport(String),
    /// Response arrived but its required structure is missing or malformed.
    Shape(String),
    /// Terminal: every attempt failed.
    RetriesExhausted { attempts: u32 },
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "transport error: {}", msg),
            FetchError::Shape(msg) => write!(f, "malformed response: {}", msg),
            FetchError::RetriesExhausted { attempts } => {
                write!(f, "analysis failed after {} attempts", attempts)
            }
        }
    }
}

/// Transport seam for the generation call.
///
/// Production is [`HttpTransport`]; tests script a fake to exercise the
/// retry/backoff path without a network.
pub trait SceneTransport {
    /// Issue one generation request, returning the parsed response body.
    fn generate(&mut self, payload: &Value) -> Result<Value, FetchError>;
}

/// Blocking HTTP transport against the real endpoint.
pub struct HttpTransport {
    api_key: String,
}

impl HttpTransport {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

impl SceneTransport for HttpTransport {
    fn generate(&mut self, payload: &Value) -> Result<Value, FetchError> {
        let mut endpoint = Url::parse(API_URL)
            .map_err(|e| FetchError::Transport(format!("Invalid endpoint: {}", e)))?;
        endpoint.query_pairs_mut().append_pair("key", &self.api_key);

        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| FetchError::Transport(format!("Client error: {}", e)))?;

        let response = client
            .post(endpoint)
            .json(payload)
            .send()
            .map_err(|e| FetchError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Transport(format!(
                "HTTP error: status {}",
                status.as_u16()
            )));
        }

        response
            .json::<Value>()
            .map_err(|e| FetchError::Shape(format!("Response body is not JSON: {}", e)))
    }
}

/// Build the generation payload: the transcript plus a response-shape
/// constraint requiring exactly the five scene fields.
pub fn build_payload(transcript: &str) -> Value {
    let system_prompt = "You are a creative dream analyzer. Based on the user's dream \
        transcript, generate a structured JSON object for visualization. Ensure \
        'primaryColor' is a valid hex code (e.g., #FFFFFF).";
    let user_query = format!(
        "Analyze this dream transcript and generate the structured JSON scene object: \"{}\"",
        transcript
    );

    json!({
        "contents": [{ "parts": [{ "text": user_query }] }],
        "systemInstruction": { "parts": [{ "text": system_prompt }] },
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "sceneTitle": {
                        "type": "STRING",
                        "description": "A concise, evocative title for the dream."
                    },
                    "dominantMood": {
                        "type": "STRING",
                        "description": "The primary emotion or feeling of the dream (e.g., Calm, Anxious, Joyful, Mysterious)."
                    },
                    "primaryObject": {
                        "type": "STRING",
                        "description": "The most significant or visually striking object or element in the dream."
                    },
                    "primaryColor": {
                        "type": "STRING",
                        "description": "A hex color code relevant to the mood or object (e.g., #FF6AC1 for joyful, #301E67 for mysterious)."
                    },
                    "animationType": {
                        "type": "STRING",
                        "description": "One of these animation types based on the mood: 'Particles', 'Swirl', 'Mist', 'Comet', 'Vortex'."
                    }
                },
                "required": ["sceneTitle", "dominantMood", "primaryObject", "primaryColor", "animationType"]
            }
        }
    })
}

/// Extract the scene document from a response body and validate its shape.
pub fn parse_scene(body: &Value) -> Result<SceneDescription, FetchError> {
    let text = body
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .ok_or_else(|| FetchError::Shape("response content is empty".to_string()))?;

    serde_json::from_str(text)
        .map_err(|e| FetchError::Shape(format!("scene document invalid: {}", e)))
}

/// Resilient scene-fetch orchestrator: one logical call, internal retries.
pub struct SceneFetcher<T: SceneTransport, W: RetryTimer> {
    transport: T,
    timer: W,
}

impl SceneFetcher<HttpTransport, ThreadTimer> {
    /// Fetcher against the real endpoint, sleeping the worker thread
    /// between retries.
    pub fn http(api_key: impl Into<String>) -> Self {
        Self::new(HttpTransport::new(api_key), ThreadTimer)
    }
}

impl<T: SceneTransport, W: RetryTimer> SceneFetcher<T, W> {
    pub fn new(transport: T, timer: W) -> Self {
        Self { transport, timer }
    }

    /// Fetch a validated scene description for `transcript`.
    ///
    /// Transcript content is the caller's responsibility — empty or
    /// whitespace-only text is passed through unchanged. Transport and
    /// shape failures are retried with exponential backoff; after
    /// [`MAX_ATTEMPTS`] total attempts the error is terminal.
    pub fn fetch_scene(
        &mut self,
        transcript: &str,
        events: &mut dyn FetchEvents,
    ) -> Result<SceneDescription, FetchError> {
        let payload = build_payload(transcript);
        let mut failed = 0u32;

        loop {
            events.on_status(&format!(
                "Analyzing dream (attempt {} of {})...",
                failed + 1,
                MAX_ATTEMPTS
            ));

            let result = self
                .transport
                .generate(&payload)
                .and_then(|body| parse_scene(&body));

            match result {
                Ok(scene) => {
                    log::info!(
                        "Scene analysis complete: mood {}, animation {}",
                        scene.dominant_mood,
                        scene.animation_type
                    );
                    events.on_complete(&scene);
                    return Ok(scene);
                }
                Err(err) => {
                    failed += 1;
                    log::warn!("Attempt {}/{} failed: {}", failed, MAX_ATTEMPTS, err);

                    if failed >= MAX_ATTEMPTS {
                        let terminal = FetchError::RetriesExhausted { attempts: failed };
                        events.on_failure(&terminal);
                        return Err(terminal);
                    }

                    let delay = backoff_delay(failed);
                    events.on_status(&format!(
                        "Analysis failed, retrying in {} s...",
                        delay.as_secs()
                    ));
                    self.timer.wait(delay);
                }
            }
        }
    }
}
