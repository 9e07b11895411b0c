/// Hook trait and registry.
///
/// Hooks run sequentially in registration order. Each sees the payload as
/// left by the previous one.
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::types::{HookPayload, HookPhase, HookResult};

// ---------------------------------------------------------------------------
// Hook trait
// ---------------------------------------------------------------------------

/// A filter that observes, and optionally replaces, one intermediate value.
#[async_trait]
pub trait Hook: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Run the hook. Return `HookResult::pass()` to leave the payload alone.
    async fn run(&self, payload: &HookPayload) -> Result<HookResult>;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

type HookBox = Arc<dyn Hook>;
type PhaseMap = HashMap<HookPhase, Vec<HookBox>>;

/// Thread-safe registry of hooks organized by phase.
#[derive(Default, Clone)]
pub struct HookRegistry {
    hooks: Arc<RwLock<PhaseMap>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook to run at a specific phase.
    pub async fn register(&self, phase: HookPhase, hook: Arc<dyn Hook>) {
        let mut map = self.hooks.write().await;
        map.entry(phase).or_default().push(hook);
    }

    /// Number of hooks registered for a phase.
    pub async fn count(&self, phase: HookPhase) -> usize {
        self.hooks.read().await.get(&phase).map_or(0, Vec::len)
    }

    /// Run every hook registered for the payload's phase and return the
    /// final payload.
    pub async fn run(&self, payload: HookPayload) -> HookPayload {
        let phase = payload.phase();
        let map = self.hooks.read().await;
        let Some(chain) = map.get(&phase) else {
            return payload;
        };

        let mut current = payload;
        for hook in chain.iter() {
            debug!("[Hooks] Running {} for phase {:?}", hook.name(), phase);
            match hook.run(&current).await {
                Ok(HookResult { modified: Some(next) }) => {
                    if next.phase() == phase {
                        current = next;
                    } else {
                        warn!(
                            "[Hooks] {} returned a {:?} payload for phase {:?}; ignored",
                            hook.name(),
                            next.phase(),
                            phase
                        );
                    }
                }
                Ok(HookResult { modified: None }) => {}
                Err(e) => {
                    // Errors in hooks are non-fatal
                    warn!("[Hooks] {} returned error: {}", hook.name(), e);
                }
            }
        }
        current
    }
}
