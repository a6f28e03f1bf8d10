//! Scripted providers for handler tests. Each replies from a queue; an
//! `Err` entry or an exhausted queue fails the call.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::*;

type Script = Mutex<VecDeque<Result<String, String>>>;

fn script(replies: Vec<Result<&str, &str>>) -> Script {
    Mutex::new(
        replies
            .into_iter()
            .map(|r| r.map(str::to_string).map_err(str::to_string))
            .collect(),
    )
}

fn next(provider: &'static str, replies: &Script) -> Result<String, LlmError> {
    match replies.lock().unwrap().pop_front() {
        Some(Ok(text)) => Ok(text),
        Some(Err(message)) => Err(LlmError::Api {
            provider,
            status: 503,
            message,
        }),
        None => Err(LlmError::EmptyContent { provider }),
    }
}

pub struct ScriptedGemini {
    replies: Script,
    pub requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedGemini {
    pub fn new(replies: Vec<Result<&str, &str>>) -> Arc<Self> {
        Arc::new(Self {
            replies: script(replies),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedGemini {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        next("Gemini", &self.replies)
    }
}

pub struct ScriptedChat {
    name: &'static str,
    replies: Script,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedChat {
    pub fn new(name: &'static str, replies: Vec<Result<&str, &str>>) -> Arc<Self> {
        Arc::new(Self {
            name,
            replies: script(replies),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for ScriptedChat {
    fn provider(&self) -> &'static str {
        self.name
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        next(self.name, &self.replies)
    }
}

pub struct ScriptedTranscriber {
    replies: Script,
    pub clips: Mutex<Vec<AudioClip>>,
}

impl ScriptedTranscriber {
    pub fn new(replies: Vec<Result<&str, &str>>) -> Arc<Self> {
        Arc::new(Self {
            replies: script(replies),
            clips: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn transcribe(&self, clip: AudioClip) -> Result<String, LlmError> {
        self.clips.lock().unwrap().push(clip);
        next("OpenAI", &self.replies)
    }
}
