//! Bank taunts
//!
//! The bank heckles the player with a random line every 10 seconds, each
//! shown for 5 seconds. Lines come from a `TauntProvider`; any failure falls
//! back to the built-in list so the cycle never goes quiet.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gap between taunts (ms)
pub const TAUNT_INTERVAL_MS: f64 = 10_000.0;
/// How long a taunt stays on screen (ms)
pub const TAUNT_DISPLAY_MS: f64 = 5_000.0;
/// Default number of lines requested from a provider
pub const DEFAULT_TAUNT_COUNT: usize = 10;

/// In-game lines used when no provider is available
pub const BUILT_IN_TAUNTS: [&str; 10] = [
    "Your bass drops are weak!",
    "Jah can't help you now, Rastaman!",
    "We own the soundwaves, Rastaman!",
    "Sound can't crack steel vaults, dread!",
    "Keep jammin' — we still run di world!",
    "You chant freedom, we print money!",
    "We've got your soul in a loan agreement, star.",
    "Keep dreamin', Rasta. Babylon builds the system!",
    "You playing roots. We playing futures!",
    "Them soundwaves? Low frequency!",
];

/// Lines the generation service pads with when the model comes up short
pub const SERVICE_FALLBACK_TAUNTS: [&str; 10] = [
    "Your soundwaves are weak!",
    "The bank laughs at your efforts!",
    "You can't touch our money!",
    "Give up, Rastaman!",
    "Our vault is impenetrable!",
    "Money talks, soundwaves walk!",
    "Your reggae beats can't stop our greed!",
    "We own the system, you own nothing!",
    "Try harder, little Rastaman!",
    "Your waves are just noise to us!",
];

/// Taunt generation failures
#[derive(Debug, Error)]
pub enum TauntError {
    #[error("completion backend failed: {0}")]
    Backend(String),
    #[error("invalid taunt request: {0}")]
    BadRequest(#[from] serde_json::Error),
}

/// Source of taunt lines
pub trait TauntProvider {
    fn taunts(&mut self, count: usize) -> Result<Vec<String>, TauntError>;
}

/// Always returns the built-in list
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltInTaunts;

impl TauntProvider for BuiltInTaunts {
    fn taunts(&mut self, _count: usize) -> Result<Vec<String>, TauntError> {
        Ok(BUILT_IN_TAUNTS.iter().map(|s| s.to_string()).collect())
    }
}

/// A chat message sent to a completion backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Language-model chat completion seam
pub trait CompletionBackend {
    fn complete(
        &mut self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, TauntError>;
}

/// Sampling temperature for taunt generation
pub const TAUNT_TEMPERATURE: f32 = 0.8;
/// Token budget for taunt generation
pub const TAUNT_MAX_TOKENS: u32 = 500;

/// Prompt asking for `count` taunts as a JSON array
pub fn prompt_messages(count: usize) -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            role: "system".to_string(),
            content: format!(
                "You are a corrupt, evil bank building in a retro arcade game. Generate taunting \
                 phrases that a bank would say to a Rastaman character who is shooting soundwaves \
                 at you. Make the taunts:\n\
                 - Short and punchy (under 15 words)\n\
                 - Arrogant and dismissive\n\
                 - Related to money, banking, or corruption\n\
                 - In the style of 1980s arcade game villains\n\
                 - Slightly humorous but menacing\n\n\
                 Return exactly {count} taunts as a JSON array of strings."
            ),
        },
        ChatMessage {
            role: "user".to_string(),
            content: format!(
                "Generate {count} taunts for a corrupt bank building in a retro arcade game."
            ),
        },
    ]
}

/// Clean one line of a free-text completion: drop `1. ` numbering at the very
/// start of the line and a leading/trailing quote, then trim
fn clean_line(line: &str) -> String {
    let mut s = line;
    let digits = s.len() - s.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 && s[digits..].starts_with('.') {
        s = s[digits + 1..].trim_start();
    }
    let s = s.strip_prefix(['"', '\'']).unwrap_or(s);
    let s = s.strip_suffix(['"', '\'']).unwrap_or(s);
    s.trim().to_string()
}

/// Turn a completion into exactly `count` lines where possible: a JSON array
/// is taken as-is, anything else is split into lines. Short results are
/// padded from `SERVICE_FALLBACK_TAUNTS`.
pub fn parse_completion(content: &str, count: usize) -> Vec<String> {
    let mut taunts: Vec<String> = match serde_json::from_str::<serde_json::Value>(content) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        _ => content
            .lines()
            .map(clean_line)
            .filter(|line| !line.is_empty())
            .collect(),
    };

    if taunts.len() < count {
        let missing = count - taunts.len();
        taunts.extend(
            SERVICE_FALLBACK_TAUNTS
                .iter()
                .take(missing)
                .map(|s| s.to_string()),
        );
    }
    taunts.truncate(count);
    taunts
}

/// Taunts backed by a completion model
pub struct GeneratedTaunts<B: CompletionBackend> {
    backend: B,
}

impl<B: CompletionBackend> GeneratedTaunts<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

impl<B: CompletionBackend> TauntProvider for GeneratedTaunts<B> {
    fn taunts(&mut self, count: usize) -> Result<Vec<String>, TauntError> {
        let content =
            self.backend
                .complete(&prompt_messages(count), TAUNT_TEMPERATURE, TAUNT_MAX_TOKENS)?;
        Ok(parse_completion(&content, count))
    }
}

/// Request body for the taunt endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TauntRequest {
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_count() -> usize {
    DEFAULT_TAUNT_COUNT
}

/// Response body for the taunt endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TauntResponse {
    pub taunts: Vec<String>,
}

/// Serve a taunt request. Never fails: any error answers with the full
/// service fallback list.
pub fn handle_taunt_request<P: TauntProvider>(provider: &mut P, body: &str) -> TauntResponse {
    let result = serde_json::from_str::<TauntRequest>(body)
        .map_err(TauntError::from)
        .and_then(|req| provider.taunts(req.count));
    match result {
        Ok(taunts) => TauntResponse { taunts },
        Err(e) => {
            log::warn!("Error generating taunts: {e}");
            TauntResponse {
                taunts: SERVICE_FALLBACK_TAUNTS.iter().map(|s| s.to_string()).collect(),
            }
        }
    }
}

/// Load lines from a provider, falling back to the built-in list
pub fn load_taunts(provider: &mut dyn TauntProvider, count: usize) -> Vec<String> {
    match provider.taunts(count) {
        Ok(taunts) if !taunts.is_empty() => taunts,
        Ok(_) => {
            log::warn!("Taunt provider returned nothing, using built-in taunts");
            BUILT_IN_TAUNTS.iter().map(|s| s.to_string()).collect()
        }
        Err(e) => {
            log::warn!("Taunt provider failed ({e}), using built-in taunts");
            BUILT_IN_TAUNTS.iter().map(|s| s.to_string()).collect()
        }
    }
}

/// Timed rotation of taunts during a round
#[derive(Debug, Clone)]
pub struct TauntCycle {
    taunts: Vec<String>,
    rng: Pcg32,
    running: bool,
    current: Option<usize>,
    shown_at_ms: f64,
    next_at_ms: f64,
}

impl TauntCycle {
    pub fn new(taunts: Vec<String>, seed: u64) -> Self {
        let taunts = if taunts.is_empty() {
            BUILT_IN_TAUNTS.iter().map(|s| s.to_string()).collect()
        } else {
            taunts
        };
        Self {
            taunts,
            rng: Pcg32::seed_from_u64(seed),
            running: false,
            current: None,
            shown_at_ms: 0.0,
            next_at_ms: 0.0,
        }
    }

    /// Start (or restart) the rotation; the first line shows immediately
    pub fn start(&mut self, now_ms: f64) {
        self.running = true;
        self.show_random(now_ms);
    }

    /// Stop the rotation and clear the current line
    pub fn stop(&mut self) {
        self.running = false;
        self.current = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance timers; returns the line currently on screen
    pub fn update(&mut self, now_ms: f64) -> Option<&str> {
        if !self.running {
            return None;
        }
        if now_ms >= self.next_at_ms {
            self.show_random(now_ms);
        } else if self.current.is_some() && now_ms - self.shown_at_ms >= TAUNT_DISPLAY_MS {
            self.current = None;
        }
        self.current()
    }

    pub fn current(&self) -> Option<&str> {
        self.current.map(|i| self.taunts[i].as_str())
    }

    fn show_random(&mut self, now_ms: f64) {
        self.current = Some(self.rng.random_range(0..self.taunts.len()));
        self.shown_at_ms = now_ms;
        self.next_at_ms = now_ms + TAUNT_INTERVAL_MS;
    }
}
