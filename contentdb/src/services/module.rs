//! Install/uninstall hook for the content table

use crate::database::Repository;
use crate::error::{ContentError, Result};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleAction {
    Install,
    Uninstall,
    /// Dump every row, deleted ones included, as JSON
    Export,
}

impl FromStr for ModuleAction {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "install" => Ok(ModuleAction::Install),
            "uninstall" => Ok(ModuleAction::Uninstall),
            "export" => Ok(ModuleAction::Export),
            other => Err(ContentError::Generic(format!(
                "Unknown module action: {}",
                other
            ))),
        }
    }
}

pub struct ContentModule {
    repo: Repository,
}

impl ContentModule {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Run a management action and return its message
    pub async fn manage(&self, action: ModuleAction) -> Result<String> {
        tracing::info!("Running content module action: {:?}", action);

        match action {
            ModuleAction::Install => {
                self.repo.create_table().await?;
                Ok("Successfully created the database tables for content.".to_string())
            }
            ModuleAction::Uninstall => {
                self.repo.drop_table().await?;
                Ok("Successfully dropped the database tables for content.".to_string())
            }
            ModuleAction::Export => {
                let rows = self.repo.export_content().await?;
                Ok(serde_json::to_string_pretty(&rows)?)
            }
        }
    }
}
