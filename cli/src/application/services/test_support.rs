//! Shared test helpers for distribution service tests.
//!
//! `ScriptedRunner` answers each action kind from a per-kind reply queue
//! (the last reply repeats) and records every call. `RecordingSink` keeps
//! emitted events.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use wslhub_common::Event;

use crate::application::ports::{ActionOutput, ActionRunner, EventSink};
use crate::domain::{ActionKind, DistroError, WslAction, sanitize};

enum Reply {
    Ok(Vec<u8>),
    Fail(Vec<u8>),
}

#[derive(Default)]
pub(crate) struct ScriptedRunner {
    script: Mutex<HashMap<ActionKind, VecDeque<Reply>>>,
    calls: Mutex<Vec<(ActionKind, Vec<String>)>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, kind: ActionKind, reply: Reply) -> Self {
        self.script
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .entry(kind)
            .or_default()
            .push_back(reply);
        self
    }

    /// Successful exit with `output`.
    pub fn on(self, kind: ActionKind, output: &str) -> Self {
        self.push(kind, Reply::Ok(output.as_bytes().to_vec()))
    }

    /// Non-zero exit with `output`.
    pub fn fail(self, kind: ActionKind, output: &str) -> Self {
        self.push(kind, Reply::Fail(output.as_bytes().to_vec()))
    }

    pub fn calls(&self) -> Vec<ActionKind> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .map(|(k, _)| *k)
            .collect()
    }

    pub fn args_of(&self, kind: ActionKind) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, a)| a.clone())
            .collect()
    }

    fn next_reply(&self, kind: ActionKind) -> Option<(bool, Vec<u8>)> {
        let mut script = self
            .script
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let queue = script.get_mut(&kind)?;
        let reply = if queue.len() > 1 {
            queue.pop_front()?
        } else {
            match queue.front()? {
                Reply::Ok(b) => Reply::Ok(b.clone()),
                Reply::Fail(b) => Reply::Fail(b.clone()),
            }
        };
        Some(match reply {
            Reply::Ok(b) => (true, b),
            Reply::Fail(b) => (false, b),
        })
    }
}

impl ActionRunner for ScriptedRunner {
    async fn run_action(&self, action: WslAction<'_>) -> ActionOutput {
        let kind = action.kind();
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((kind, action.args()));
        match self.next_reply(kind) {
            None => ActionOutput::ok(kind, Vec::new()),
            Some((true, raw)) => ActionOutput::ok(kind, raw),
            Some((false, raw)) => ActionOutput {
                kind,
                error: Some(DistroError::ProcessExecution {
                    action: kind.name(),
                    status: "exit code 1".to_string(),
                    output: sanitize(&raw),
                }),
                raw,
            },
        }
    }
}

#[derive(Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(event);
    }
}
