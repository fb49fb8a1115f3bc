//! Scripted [`TextService`] for exercising stages without a network.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{
    GenerationRequest, JUDGE_SYSTEM, REVISION_SYSTEM, STORYTELLER_SYSTEM, ServiceError, TextService,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    Draft,
    Judge,
    Revise,
}

type Reply = Result<String, ServiceError>;

/// Replays queued replies per stage, recognised by the system instruction.
///
/// When a queue has one reply left it is repeated for every later call.
#[derive(Default)]
pub(crate) struct ScriptedService {
    drafts: Mutex<VecDeque<String>>,
    verdicts: Mutex<VecDeque<Reply>>,
    revisions: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<(Stage, GenerationRequest)>>,
}

impl ScriptedService {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn draft(self, text: &str) -> Self {
        self.drafts.lock().unwrap().push_back(text.to_string());
        self
    }

    pub(crate) fn verdict(self, raw: &str) -> Self {
        self.verdicts.lock().unwrap().push_back(Ok(raw.to_string()));
        self
    }

    pub(crate) fn verdict_error(self, error: ServiceError) -> Self {
        self.verdicts.lock().unwrap().push_back(Err(error));
        self
    }

    pub(crate) fn revision(self, text: &str) -> Self {
        self.revisions.lock().unwrap().push_back(text.to_string());
        self
    }

    pub(crate) fn count(&self, stage: Stage) -> usize {
        self.calls.lock().unwrap().iter().filter(|(s, _)| *s == stage).count()
    }

    pub(crate) fn requests(&self, stage: Stage) -> Vec<GenerationRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| *s == stage)
            .map(|(_, r)| r.clone())
            .collect()
    }

    fn next<T: Clone>(queue: &Mutex<VecDeque<T>>) -> Option<T> {
        let mut queue = queue.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

fn clone_reply(reply: &Reply) -> Reply {
    match reply {
        Ok(text) => Ok(text.clone()),
        Err(e) => Err(ServiceError::Transport(e.to_string())),
    }
}

#[async_trait]
impl TextService for ScriptedService {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ServiceError> {
        let system = request.system_text().unwrap_or_default();
        let stage = match system.as_str() {
            STORYTELLER_SYSTEM => Stage::Draft,
            JUDGE_SYSTEM => Stage::Judge,
            REVISION_SYSTEM => Stage::Revise,
            other => panic!("unexpected system prompt: {}", other),
        };
        self.calls.lock().unwrap().push((stage, request.clone()));

        let missing = || ServiceError::InvalidResponse(format!("no scripted reply for {:?}", stage));
        match stage {
            Stage::Draft => Self::next(&self.drafts).ok_or_else(missing),
            Stage::Revise => Self::next(&self.revisions).ok_or_else(missing),
            Stage::Judge => {
                let mut queue = self.verdicts.lock().unwrap();
                let reply = if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().map(clone_reply)
                };
                reply.unwrap_or_else(|| Err(missing()))
            }
        }
    }
}
