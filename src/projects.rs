//! Project list session. Small sibling of [`crate::board`]: same
//! mutate-then-reload shape, minus the filter pipeline.

use crate::Confirmation;
use crate::error::ClientError;
use crate::gateway::{ProjectDraft, StoreGateway};
use crate::model::{Project, ProjectId};

pub struct ProjectDirectory<G> {
    gateway: G,
    projects: Vec<Project>,
}

impl<G: StoreGateway> ProjectDirectory<G> {
    pub fn new(gateway: G) -> Self {
        ProjectDirectory {
            gateway,
            projects: Vec::new(),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == *id)
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.projects = self.gateway.list_projects().await?;
        Ok(())
    }

    pub async fn create(&mut self, draft: ProjectDraft) -> Result<ProjectId, ClientError> {
        if draft.name.trim().is_empty() {
            return Err(ClientError::Validation(
                "project name must not be empty".into(),
            ));
        }
        let created = self.gateway.create_project(draft).await?;
        self.load().await?;
        Ok(created.id)
    }

    pub async fn update(&mut self, id: &ProjectId, draft: ProjectDraft) -> Result<(), ClientError> {
        if draft.name.trim().is_empty() {
            return Err(ClientError::Validation(
                "project name must not be empty".into(),
            ));
        }
        self.gateway.update_project(id, draft).await?;
        self.load().await
    }

    /// Confirm-gated. Deleting a project unassigns its tasks on the server;
    /// it never deletes them.
    pub async fn delete(&mut self, id: &ProjectId, confirm: Confirmation) -> Result<(), ClientError> {
        if !confirm.is_confirmed() {
            return Ok(());
        }
        self.gateway.delete_project(id).await?;
        self.load().await
    }
}
