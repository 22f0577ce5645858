use crate::error::{ActionError, ReferenceError};
use crate::registry::{ContainerResource, ResourceId, ResourceLookup};
use ahash::AHashSet;
use tracing::debug;

/// Refuses instance nodes that would make a container contain itself.
///
/// Starting from the candidate container, every instance node found in a
/// saved item list is resolved and searched in turn. Reaching the current
/// container means the new instance would close a cycle. A visited set keyed
/// by container id makes the walk terminate even when unrelated containers
/// already reference each other.
pub struct CycleGuard<'a> {
    resources: &'a dyn ResourceLookup,
}

impl<'a> CycleGuard<'a> {
    pub fn new(resources: &'a dyn ResourceLookup) -> Self {
        Self { resources }
    }

    /// Checks that instantiating `candidate` inside `current` is acyclic.
    ///
    /// With no current container (an unsaved scratch graph) nothing can
    /// refer back, but the walk still runs so unresolvable nested containers
    /// are reported.
    pub fn check(
        &self,
        current: Option<&ResourceId>,
        candidate: &ContainerResource,
    ) -> Result<(), ActionError> {
        if current == Some(&candidate.id) {
            return Err(ActionError::CyclicDependency {
                container: candidate.name.clone(),
            });
        }

        let mut visited: AHashSet<&ResourceId> = AHashSet::new();
        let mut stack: Vec<&ContainerResource> = vec![candidate];

        while let Some(container) = stack.pop() {
            if !visited.insert(&container.id) {
                continue;
            }
            for instance in container.snapshot.instances() {
                if current == Some(&instance) {
                    debug!(container = %container.id, "instance of current container found");
                    return Err(ActionError::CyclicDependency {
                        container: container.name.clone(),
                    });
                }
                let nested = self
                    .resources
                    .container(&instance)
                    .ok_or_else(|| ReferenceError::UnknownContainer(instance.to_string()))?;
                stack.push(nested);
            }
        }
        Ok(())
    }
}
