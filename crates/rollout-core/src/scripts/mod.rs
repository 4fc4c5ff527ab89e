//! Running package deployment scripts.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::error::DeployError;

pub const DEFAULT_SCRIPT_HOST: &str = "pwsh";
pub const DEFAULT_DEPLOY_SCRIPT: &str = "deploy.ps1";
pub const DEFAULT_REMOVE_SCRIPT: &str = "remove.ps1";

/// File names of the scripts looked up in a package folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptNames {
    pub deploy: String,
    pub remove: String,
}

impl Default for ScriptNames {
    fn default() -> Self {
        Self {
            deploy: DEFAULT_DEPLOY_SCRIPT.to_string(),
            remove: DEFAULT_REMOVE_SCRIPT.to_string(),
        }
    }
}

/// Executes a script file and waits for it to finish.
pub trait ScriptRunner {
    /// Run `script` in `working_dir`, passing each `(name, value)` pair as
    /// `-name value`.
    fn run(
        &self,
        script: &Path,
        working_dir: &Path,
        parameters: &[(&str, &str)],
    ) -> Result<(), DeployError>;
}

/// Runs scripts through a PowerShell host (`pwsh` or `powershell.exe`).
#[derive(Debug, Clone)]
pub struct PowerShellRunner {
    program: String,
}

impl PowerShellRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, script: &Path, working_dir: &Path, parameters: &[(&str, &str)]) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(["-NoProfile", "-NonInteractive", "-ExecutionPolicy", "Bypass", "-File"])
            .arg(script)
            .current_dir(working_dir);
        for (name, value) in parameters {
            command.arg(format!("-{name}")).arg(value);
        }
        command
    }
}

impl Default for PowerShellRunner {
    fn default() -> Self {
        Self::new(DEFAULT_SCRIPT_HOST)
    }
}

impl ScriptRunner for PowerShellRunner {
    fn run(
        &self,
        script: &Path,
        working_dir: &Path,
        parameters: &[(&str, &str)],
    ) -> Result<(), DeployError> {
        info!(script = %script.display(), host = %self.program, "Running script");
        let status = self
            .command(script, working_dir, parameters)
            .status()
            .map_err(|e| DeployError::ExternalProcess {
                program: self.program.clone(),
                detail: format!("could not start {}: {e}", script.display()),
            })?;

        if !status.success() {
            let code = status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "none (terminated by signal)".to_string());
            return Err(DeployError::ExternalProcess {
                program: self.program.clone(),
                detail: format!("{} exited with code {code}", script.display()),
            });
        }

        debug!(script = %script.display(), "Script finished");
        Ok(())
    }
}
