//! Team ID generation
//!
//! The store asks an injected generator for candidate IDs and re-rolls on
//! collision, so tests can script the exact sequence of IDs handed out.

use rand::Rng;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::types::TEAM_ID_LENGTH;

/// Uppercase alphanumerics, the same alphabet teams type back in
const CODE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Source of candidate team IDs (8 chars of `[A-Z0-9]`)
pub trait TeamIdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Production generator backed by the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTeamIdGenerator;

impl TeamIdGenerator for RandomTeamIdGenerator {
    fn next_id(&self) -> String {
        let mut rng = rand::rng();
        (0..TEAM_ID_LENGTH)
            .map(|_| CODE_CHARS[rng.random_range(0..CODE_CHARS.len())] as char)
            .collect()
    }
}

/// Hands out a fixed list of IDs in order, then falls back to random ones.
#[derive(Debug, Default)]
pub struct ScriptedTeamIdGenerator {
    ids: Mutex<VecDeque<String>>,
}

impl ScriptedTeamIdGenerator {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: Mutex::new(ids.into_iter().map(Into::into).collect()),
        }
    }
}

impl TeamIdGenerator for ScriptedTeamIdGenerator {
    fn next_id(&self) -> String {
        let scripted = match self.ids.lock() {
            Ok(mut ids) => ids.pop_front(),
            Err(poisoned) => poisoned.into_inner().pop_front(),
        };
        scripted.unwrap_or_else(|| RandomTeamIdGenerator.next_id())
    }
}
