//! Interceptor that removes mutants one matcher recognizes as equivalent.

use super::matchers::EquivalenceMatcher;
use super::window::InstructionWindow;
use crate::analyzers::mutation::intercept::MutationInterceptor;
use crate::analyzers::mutation::MutationDetails;
use crate::bytecode::ClassTree;
use crate::core::Result;

/// Filters mutants that `M` proves equivalent.
///
/// Mutants from mutators outside `M`'s family are kept without looking at the
/// class, so they never fail on an unknown location.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReturnValueFilter<M> {
    matcher: M,
}

impl<M: EquivalenceMatcher> ReturnValueFilter<M> {
    pub fn new(matcher: M) -> Self {
        Self { matcher }
    }
}

impl<M: EquivalenceMatcher> MutationInterceptor for ReturnValueFilter<M> {
    fn name(&self) -> &'static str {
        self.matcher.name()
    }

    fn is_filtered(&self, class: &ClassTree, mutation: &MutationDetails) -> Result<bool> {
        if !self.matcher.accepts(mutation.mutator()) {
            return Ok(false);
        }

        let method = class.resolve(mutation.location())?;
        let window = InstructionWindow::at(method, mutation.instruction_index());
        Ok(self.matcher.matches(&window))
    }
}
