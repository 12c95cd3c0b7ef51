use tracing::trace;

use crate::{
    errors::{
        diagnostics::{Diagnostic, ErrorsObserver},
        errors::SemaError,
    },
    Span,
};

use super::{
    functions::FunctionId,
    registry::Registry,
    sema_nodes::ExprNode,
    types::TypeId,
};

const EXACT_MATCH: u32 = 3;
const REFERENCE_MATCH: u32 = 2;
const BASE_MATCH: u32 = 1;

/// Picks the best overload for a call.
pub struct OverloadResolution<'a> {
    registry: &'a Registry,
    errs: &'a dyn ErrorsObserver,
    name: &'a str,
    span: &'a Span,
}

impl<'a> OverloadResolution<'a> {
    pub fn new(
        registry: &'a Registry,
        errs: &'a dyn ErrorsObserver,
        name: &'a str,
        span: &'a Span,
    ) -> Self {
        OverloadResolution {
            registry,
            errs,
            name,
            span,
        }
    }

    /// How well an argument of type `arg` binds to a parameter of type
    /// `param`, `None` when it does not bind at all.
    pub fn score(registry: &Registry, param: TypeId, arg: TypeId) -> Option<u32> {
        let arg_type = registry.ty(arg);
        let param_decayed = registry.decayed(param);

        if arg_type.is_designated_initializer() {
            return registry
                .ty(param_decayed)
                .is_class()
                .then_some(REFERENCE_MATCH);
        }

        if registry.same_type(param, arg) {
            return Some(EXACT_MATCH);
        }

        let arg_decayed = registry.decayed(arg);
        if registry.same_type(param_decayed, arg_decayed) {
            return Some(REFERENCE_MATCH);
        }

        if registry.is_derived_from(arg_decayed, param_decayed) {
            return Some(BASE_MATCH);
        }

        None
    }

    /// Total score of a candidate, `None` when it is not viable.
    fn candidate_score(&self, function: FunctionId, args: &[ExprNode]) -> Option<u32> {
        let params = self.registry.function(function).params();
        if params.len() != args.len() {
            return None;
        }

        params
            .iter()
            .zip(args)
            .map(|(param, arg)| Self::score(self.registry, param.ty, arg.ty))
            .sum()
    }

    /// Chooses among `lookup` (groups of candidates, innermost scope first).
    /// The first scope with a viable candidate decides.
    pub fn choose(&self, lookup: &[Vec<FunctionId>], args: &[ExprNode]) -> Option<FunctionId> {
        for candidates in lookup {
            let scored: Vec<(FunctionId, u32)> = candidates
                .iter()
                .filter_map(|f| self.candidate_score(*f, args).map(|score| (*f, score)))
                .collect();

            let Some(best) = scored.iter().map(|(_, score)| *score).max() else {
                continue;
            };

            let winners: Vec<FunctionId> = scored
                .iter()
                .filter(|(_, score)| *score == best)
                .map(|(f, _)| *f)
                .collect();

            if winners.len() == 1 {
                trace!(name = self.name, score = best, "overload chosen");
                return Some(winners[0]);
            }

            self.errs.notify_error(Diagnostic::error(
                SemaError::AmbiguousCall {
                    name: String::from(self.name),
                },
                self.span.clone(),
            ));
            for candidate in winners {
                self.errs.notify_error(Diagnostic::note(
                    SemaError::CandidateFunction,
                    self.registry.function(candidate).signature.span.clone(),
                ));
            }
            return None;
        }

        self.errs.notify_error(Diagnostic::error(
            SemaError::NoMatchingFunction {
                name: String::from(self.name),
            },
            self.span.clone(),
        ));
        None
    }
}
