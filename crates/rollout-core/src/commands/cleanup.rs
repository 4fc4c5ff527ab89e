use std::io::Write;

use anyhow::Context;

use super::{Command, CommandDescriptor};
use crate::context::AppContext;
use crate::interpreter::CommandArguments;

pub struct CleanupCommand {
    ctx: AppContext,
    descriptor: CommandDescriptor,
}

impl CleanupCommand {
    pub fn new(ctx: AppContext) -> Self {
        let descriptor = CommandDescriptor::builder("cleanup")
            .required_arguments(&["Id"])
            .positional_arguments(&["Id"])
            .description("Delete package folders that are not the installed version")
            .usage("rollout cleanup [<Id>]")
            .argument("Id", "Only clean up this package")
            .example("rollout cleanup", "Remove outdated folders of every package")
            .build();
        Self { ctx, descriptor }
    }
}

impl Command for CleanupCommand {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    fn execute(&self, arguments: &CommandArguments, out: &mut dyn Write) -> anyhow::Result<()> {
        let id = arguments.get_non_blank("Id").map(str::trim);
        let removed = self
            .ctx
            .cleaner()
            .cleanup(id)
            .context("Failed to clean up package folders")?;

        if removed.is_empty() {
            writeln!(out, "Nothing to clean up.")?;
            return Ok(());
        }
        for folder in &removed {
            writeln!(out, "✓ Deleted {}", folder.display())?;
        }
        Ok(())
    }
}
