//! Evaluation context: the handler, config, and call-depth counter threaded
//! through every expression/statement evaluator call. Bundled into one
//! struct so evaluator signatures don't grow a new parameter every time the
//! ambient stack gains a tunable.

use std::cell::Cell;

use quillc_util::diagnostic::Handler;
use quillc_util::Span;

use crate::config::SemanticConfig;
use crate::error::{SemError, SemResult};

pub struct Ctx<'a> {
    pub handler: &'a Handler,
    pub config: &'a SemanticConfig,
    call_depth: Cell<usize>,
}

/// Decrements the call-depth counter when a function call's scope is
/// exited, including via an early `?` return.
pub struct CallGuard<'a, 'b> {
    ctx: &'b Ctx<'a>,
}

impl<'a, 'b> Drop for CallGuard<'a, 'b> {
    fn drop(&mut self) {
        self.ctx.call_depth.set(self.ctx.call_depth.get() - 1);
    }
}

impl<'a> Ctx<'a> {
    pub fn new(handler: &'a Handler, config: &'a SemanticConfig) -> Self {
        Self { handler, config, call_depth: Cell::new(0) }
    }

    /// Checks and increments the call-depth counter; the returned guard
    /// decrements it again when the call's frame is torn down. Checked
    /// against `SemanticConfig::max_call_depth` before entering the new
    /// scope.
    pub fn enter_call<'b>(&'b self, span: Span) -> SemResult<CallGuard<'a, 'b>> {
        let depth = self.call_depth.get() + 1;
        if let Some(limit) = self.config.max_call_depth {
            if depth > limit {
                return Err(SemError::CallDepthExceeded { limit, span });
            }
        }
        self.call_depth.set(depth);
        Ok(CallGuard { ctx: self })
    }
}
