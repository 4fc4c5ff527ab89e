use std::io::Write;

use super::{Command, CommandDescriptor};
use crate::context::AppContext;
use crate::installation::InstalledPackageInfo;
use crate::interpreter::CommandArguments;

pub struct StatusCommand {
    ctx: AppContext,
    descriptor: CommandDescriptor,
}

impl StatusCommand {
    pub fn new(ctx: AppContext) -> Self {
        let descriptor = CommandDescriptor::builder("status")
            .alternative_names(&["installationstatus", "list"])
            .required_arguments(&["Id"])
            .positional_arguments(&["Id"])
            .description("Show installed packages and their folders")
            .usage("rollout status [<Id>]")
            .argument("Id", "Only show this package")
            .example("rollout status", "Show every package in the manifest")
            .example("rollout list Web.Api", "Show the folders of Web.Api")
            .build();
        Self { ctx, descriptor }
    }
}

impl Command for StatusCommand {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    fn execute(&self, arguments: &CommandArguments, out: &mut dyn Write) -> anyhow::Result<()> {
        let status = self.ctx.status_provider();
        let infos = match arguments.get_non_blank("Id") {
            Some(id) => status.get_package_info_for(id.trim())?,
            None => status.get_package_info()?,
        };
        write_table(&infos, out)
    }
}

fn write_table(infos: &[InstalledPackageInfo], out: &mut dyn Write) -> anyhow::Result<()> {
    if infos.is_empty() {
        writeln!(out, "No installed packages.")?;
        return Ok(());
    }

    writeln!(out, "{:<30} {:<20} {:<10} Folder", "Id", "Version", "Installed")?;
    writeln!(out, "{}", "-".repeat(80))?;
    for info in infos {
        let installed = if info.is_installed { "yes" } else { "no" };
        writeln!(
            out,
            "{:<30} {:<20} {:<10} {}",
            info.id,
            info.version.to_string(),
            installed,
            info.folder.display()
        )?;
    }
    Ok(())
}
