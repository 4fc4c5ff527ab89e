//! Rollout Core Library
//!
//! Packages build output into versioned archives, tracks which package
//! versions are installed on a machine, and drives install, update and
//! uninstall workflows through package scripts.

pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod installation;
pub mod interpreter;
pub mod manifest;
pub mod packaging;
pub mod program;
pub mod repository;
pub mod scripts;
pub mod version;

/// Re-exports of commonly used types
pub mod prelude {
    // Commands
    pub use crate::commands::{Command, CommandDescriptor, CommandProvider};
    pub use crate::interpreter::{CommandArguments, CommandInvocation, CommandLineArgumentInterpreter};

    // Installation
    pub use crate::installation::{
        Decision, DecisionReason, DeploymentType, InstallOutcome, InstallRequest,
        InstallationLogicProvider, InstallationStatusProvider, InstalledPackageInfo,
    };

    // Application
    pub use crate::context::{AppContext, ApplicationInformation};
    pub use crate::error::DeployError;
    pub use crate::manifest::{ManifestAccess, ManifestStore, PackageRecord};
    pub use crate::repository::{FolderRepository, PackageRepository, SourceRepositories};
    pub use crate::scripts::ScriptRunner;
    pub use crate::version::SemanticVersion;
}
