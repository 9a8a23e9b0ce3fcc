use gatehouse_core::{Group, PendingGroupAssignment, Username};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningStep {
    IdentityCreated,
    GroupAssigned,
}

/// Two-step provisioning: create an identity, then put it in its group.
///
/// The provider offers no transaction spanning both steps. The workflow
/// records what completed so a failure after the first step leaves a
/// [`PendingGroupAssignment`] behind instead of a silently group-less user.
#[derive(Debug, Clone)]
pub struct ProvisioningWorkflow {
    username: Username,
    group: Group,
    completed: Vec<ProvisioningStep>,
}

impl ProvisioningWorkflow {
    pub fn new(username: Username, group: Group) -> Self {
        Self {
            username,
            group,
            completed: Vec::with_capacity(2),
        }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn complete(&mut self, step: ProvisioningStep) {
        if !self.completed.contains(&step) {
            self.completed.push(step);
        }
    }

    pub fn completed(&self) -> &[ProvisioningStep] {
        &self.completed
    }

    pub fn is_complete(&self) -> bool {
        self.completed.contains(&ProvisioningStep::IdentityCreated)
            && self.completed.contains(&ProvisioningStep::GroupAssigned)
    }

    /// The marker to persist when the identity exists without its group.
    pub fn pending_assignment(&self) -> Option<PendingGroupAssignment> {
        let stranded = self.completed.contains(&ProvisioningStep::IdentityCreated)
            && !self.completed.contains(&ProvisioningStep::GroupAssigned);

        stranded.then(|| PendingGroupAssignment {
            username: self.username.clone(),
            group: self.group,
            recorded_at: chrono::Utc::now().timestamp(),
        })
    }
}
