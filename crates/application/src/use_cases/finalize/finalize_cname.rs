use super::chain_state::ChainState;
use super::records::{cname_target, flatten_answers, terminal_answers};
use crate::ports::{FinalizeMetrics, LookupRequest, UpstreamLookup};
use ferrous_finalize_domain::{FinalizeConfig, FinalizeOutcome};
use hickory_proto::op::Message;
use hickory_proto::rr::{Name, Record, RecordType};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

/// Walks the alias chain of a CNAME-first response down to its A/AAAA
/// records and flattens them under the question name.
///
/// Every chain failure keeps the response exactly as it arrived.
pub struct FinalizeCnameUseCase {
    upstream: Arc<dyn UpstreamLookup>,
    metrics: Arc<dyn FinalizeMetrics>,
    config: FinalizeConfig,
}

impl FinalizeCnameUseCase {
    pub fn new(
        upstream: Arc<dyn UpstreamLookup>,
        metrics: Arc<dyn FinalizeMetrics>,
        config: FinalizeConfig,
    ) -> Self {
        Self {
            upstream,
            metrics,
            config,
        }
    }

    pub fn config(&self) -> FinalizeConfig {
        self.config
    }

    /// Returns the first CNAME target when `response` should be finalized.
    fn applicable_target(response: &Message) -> Option<Name> {
        if response
            .queries()
            .first()
            .is_some_and(|q| q.query_type() == RecordType::CNAME)
        {
            debug!("Request is a CNAME type question, skipping");
            return None;
        }

        let target = response.answers().first().and_then(cname_target);
        if target.is_none() {
            debug!("Response has no answer or does not start with a CNAME");
        }
        target
    }

    pub async fn execute(&self, request: &LookupRequest, response: &mut Message) -> FinalizeOutcome {
        let Some(first_target) = Self::applicable_target(response) else {
            return FinalizeOutcome::NotApplicable;
        };

        self.metrics.inc_requests(&request.server);
        let start = Instant::now();

        let owner = request
            .query_name
            .clone()
            .unwrap_or_else(|| first_target.clone());

        debug!(
            name = %owner,
            target = %first_target,
            record_type = ?request.query_type,
            force_resolve = self.config.force_resolve,
            max_depth = self.config.max_depth,
            "Finalizing CNAME"
        );

        let mut state = ChainState::new(first_target);
        let outcome = self
            .walk_chain(request, &owner, response.answers(), &mut state)
            .await;

        if state.should_commit() {
            debug!(answers = state.accumulated.len(), name = %owner, "Finalized answer");
            *response.answers_mut() = std::mem::take(&mut state.accumulated);
        } else if !state.success {
            debug!(outcome = %outcome, "Finalization failed; returning original answer");
        } else {
            debug!(outcome = %outcome, "Finalization produced no answers; returning original answer");
        }

        self.metrics.observe_duration(&request.server, start.elapsed());
        outcome
    }

    async fn walk_chain(
        &self,
        request: &LookupRequest,
        owner: &Name,
        original: &[Record],
        state: &mut ChainState,
    ) -> FinalizeOutcome {
        let server = request.server.as_ref();
        let existing = terminal_answers(original);

        loop {
            let hops = state.depth;

            if state.depth_exhausted(self.config.max_depth) {
                self.metrics.inc_max_depth_reached(server);
                error!(
                    max_depth = self.config.max_depth,
                    target = %state.current_target,
                    "Max depth reached for resolving CNAME records"
                );
                return FinalizeOutcome::MaxDepthReached { hops };
            }

            if state.is_visited(&state.current_target) {
                self.metrics.inc_circular_references(server);
                error!(
                    target = %state.current_target,
                    "Detected circular reference in CNAME chain, target already processed"
                );
                return FinalizeOutcome::CircularReference { hops };
            }

            if !existing.is_empty() {
                if !self.config.force_resolve {
                    debug!(count = existing.len(), "Using terminal A/AAAA from original answer");
                    state.accumulated.extend(flatten_answers(&existing, owner));
                    return FinalizeOutcome::AdoptedExisting {
                        answers: state.accumulated.len(),
                    };
                }
                debug!(
                    count = existing.len(),
                    "force_resolve enabled; ignoring terminal A/AAAA in original answer"
                );
            }

            debug!(
                target = %state.current_target,
                record_type = ?request.query_type,
                "Trying to resolve CNAME target"
            );

            let lookup = match self
                .upstream
                .lookup(request, &state.current_target, request.query_type)
                .await
            {
                Ok(lookup) => lookup,
                Err(e) => {
                    self.metrics.inc_upstream_errors(server);
                    state.fail();
                    error!(target = %state.current_target, error = %e, "Failed to lookup CNAME target from upstream");
                    return FinalizeOutcome::UpstreamError { hops };
                }
            };

            debug!(
                rcode = ?lookup.response_code(),
                answers = lookup.answers().len(),
                "Lookup response"
            );

            let Some(first) = lookup.answers().first() else {
                self.metrics.inc_dangling_aliases(server);
                state.fail();
                error!(target = %state.current_target, rcode = ?lookup.response_code(), "Received no answer from upstream");
                return FinalizeOutcome::DanglingAlias { hops };
            };

            match first.record_type() {
                RecordType::CNAME => match cname_target(first) {
                    Some(next) => {
                        debug!(from = %state.current_target, to = %next, "Following CNAME");
                        state.advance(next);
                    }
                    None => {
                        self.metrics.inc_upstream_errors(server);
                        state.fail();
                        error!(target = %state.current_target, "Upstream returned CNAME without target");
                        return FinalizeOutcome::UnsupportedType { hops };
                    }
                },
                RecordType::A | RecordType::AAAA => {
                    state
                        .accumulated
                        .extend(flatten_answers(lookup.answers(), owner));
                    state.success = true;
                    return FinalizeOutcome::Finalized {
                        answers: state.accumulated.len(),
                        hops,
                    };
                }
                other => {
                    self.metrics.inc_upstream_errors(server);
                    state.fail();
                    error!(
                        target = %state.current_target,
                        record_type = ?other,
                        "Upstream server returned unsupported type for CNAME question"
                    );
                    return FinalizeOutcome::UnsupportedType { hops };
                }
            }
        }
    }
}
