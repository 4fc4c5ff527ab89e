use std::io::Write;

use anyhow::Context;

use super::{Command, CommandDescriptor, required};
use crate::context::AppContext;
use crate::installation::UninstallOutcome;
use crate::interpreter::CommandArguments;

pub struct UninstallCommand {
    ctx: AppContext,
    descriptor: CommandDescriptor,
}

impl UninstallCommand {
    pub fn new(ctx: AppContext) -> Self {
        let descriptor = CommandDescriptor::builder("uninstall")
            .alternative_names(&["remove"])
            .required_arguments(&["Id"])
            .positional_arguments(&["Id"])
            .description("Run a package's remove script and delete its folder")
            .usage("rollout uninstall <Id>")
            .argument("Id", "Package id")
            .example("rollout uninstall Web.Api", "Remove the installed Web.Api")
            .build();
        Self { ctx, descriptor }
    }
}

impl Command for UninstallCommand {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    fn execute(&self, arguments: &CommandArguments, out: &mut dyn Write) -> anyhow::Result<()> {
        let id = required(arguments, "Id")?;
        let outcome = self
            .ctx
            .uninstaller()
            .uninstall(id)
            .with_context(|| format!("Failed to uninstall {id}"))?;

        match outcome {
            UninstallOutcome::Removed { version, folder, .. } => {
                writeln!(out, "✓ Uninstalled {id} {version}")?;
                writeln!(out, "  Deleted {}", folder.display())?;
            }
            UninstallOutcome::StaleRecordRemoved { recorded_version } => {
                writeln!(
                    out,
                    "• {id} {recorded_version} had no package folder; removed it from the manifest"
                )?;
            }
        }
        Ok(())
    }
}
