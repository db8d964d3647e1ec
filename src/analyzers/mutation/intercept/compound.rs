//! Composition of several interceptors into one.

use super::MutationInterceptor;
use crate::analyzers::mutation::MutationDetails;
use crate::bytecode::ClassTree;
use crate::core::Result;

/// Several interceptors acting as one.
///
/// Every child judges the original batch on its own and a mutation is removed
/// when any child filters it. Children never re-admit anything, so the result
/// does not depend on child order or batch order.
pub struct CompoundInterceptor {
    name: &'static str,
    children: Vec<Box<dyn MutationInterceptor>>,
}

impl CompoundInterceptor {
    /// Compose `children` into a single filter.
    pub fn new(children: Vec<Box<dyn MutationInterceptor>>) -> Self {
        Self::named("compound", children)
    }

    /// Compose `children` under a name of your choosing.
    pub fn named(name: &'static str, children: Vec<Box<dyn MutationInterceptor>>) -> Self {
        Self { name, children }
    }

    /// Names of the children, in order.
    pub fn child_names(&self) -> Vec<&'static str> {
        self.children.iter().map(|c| c.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl MutationInterceptor for CompoundInterceptor {
    fn name(&self) -> &'static str {
        self.name
    }

    fn begin(&mut self, class: &ClassTree) {
        for child in &mut self.children {
            child.begin(class);
        }
    }

    fn is_filtered(&self, class: &ClassTree, mutation: &MutationDetails) -> Result<bool> {
        for child in &self.children {
            if child.is_filtered(class, mutation)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn filtered_by(
        &self,
        class: &ClassTree,
        mutation: &MutationDetails,
    ) -> Result<Option<&'static str>> {
        for child in &self.children {
            if let Some(name) = child.filtered_by(class, mutation)? {
                return Ok(Some(name));
            }
        }
        Ok(None)
    }

    fn end(&mut self) {
        for child in &mut self.children {
            child.end();
        }
    }
}
