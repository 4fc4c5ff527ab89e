use std::io::Write;

use anyhow::Context;

use super::{Command, CommandDescriptor, flag, optional_version, required};
use crate::context::AppContext;
use crate::installation::{DeploymentType, InstallOutcome, InstallRequest};
use crate::interpreter::CommandArguments;

pub struct InstallCommand {
    ctx: AppContext,
    descriptor: CommandDescriptor,
}

impl InstallCommand {
    pub fn new(ctx: AppContext) -> Self {
        let descriptor = CommandDescriptor::builder("install")
            .required_arguments(&["Id", "Version", "DeploymentType", "Force"])
            .positional_arguments(&["Id", "Version", "DeploymentType"])
            .description("Install a package from the configured repositories")
            .usage("rollout install <Id> [<Version>] [<DeploymentType>] [-Force=true]")
            .argument("Id", "Package id")
            .argument("Version", "Version to install (default: latest available)")
            .argument("DeploymentType", "Full (default) or Update")
            .argument("Force", "Reinstall even if the same or a newer version is installed")
            .example("rollout install Web.Api", "Install the latest Web.Api")
            .example(
                "rollout install Web.Api 1.2.0 -Force=true",
                "Reinstall Web.Api 1.2.0 regardless of what is installed",
            )
            .build();
        Self { ctx, descriptor }
    }
}

impl Command for InstallCommand {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    fn execute(&self, arguments: &CommandArguments, out: &mut dyn Write) -> anyhow::Result<()> {
        let deployment_type = match arguments.get_non_blank("DeploymentType") {
            Some(text) => text.parse::<DeploymentType>()?,
            None => DeploymentType::Full,
        };
        run_install(&self.ctx, arguments, deployment_type, out)
    }
}

/// `install` with `DeploymentType=Update`: deploys over the installed
/// version instead of removing it first.
pub struct UpdateCommand {
    ctx: AppContext,
    descriptor: CommandDescriptor,
}

impl UpdateCommand {
    pub fn new(ctx: AppContext) -> Self {
        let descriptor = CommandDescriptor::builder("update")
            .alternative_names(&["upgrade"])
            .required_arguments(&["Id", "Version", "Force"])
            .positional_arguments(&["Id", "Version"])
            .description("Update an installed package without uninstalling it first")
            .usage("rollout update <Id> [<Version>] [-Force=true]")
            .argument("Id", "Package id")
            .argument("Version", "Version to deploy (default: latest available)")
            .argument("Force", "Deploy even if the same or a newer version is installed")
            .example("rollout update Web.Api", "Update Web.Api to the latest version")
            .build();
        Self { ctx, descriptor }
    }
}

impl Command for UpdateCommand {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    fn execute(&self, arguments: &CommandArguments, out: &mut dyn Write) -> anyhow::Result<()> {
        run_install(&self.ctx, arguments, DeploymentType::Update, out)
    }
}

fn run_install(
    ctx: &AppContext,
    arguments: &CommandArguments,
    deployment_type: DeploymentType,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let id = required(arguments, "Id")?;
    let request = InstallRequest::new(id)
        .version(optional_version(arguments, "Version")?)
        .deployment_type(deployment_type)
        .force(flag(arguments, "Force")?);

    let outcome = ctx
        .installer()?
        .install(&request)
        .with_context(|| format!("Failed to install {id}"))?;

    match outcome {
        InstallOutcome::Installed {
            version,
            folder,
            replaced,
        } => {
            writeln!(out, "✓ Installed {id} {version} ({deployment_type})")?;
            writeln!(out, "  Folder: {}", folder.display())?;
            if let Some(previous) = replaced {
                writeln!(out, "  Replaced {previous}")?;
            }
        }
        InstallOutcome::AlreadyInstalled {
            requested,
            installed,
            reason,
        } => match installed {
            Some(current) => {
                writeln!(out, "• {id} {current} is installed, skipping {requested}: {reason}")?
            }
            None => writeln!(out, "• Skipping {id} {requested}: {reason}")?,
        },
    }
    Ok(())
}
