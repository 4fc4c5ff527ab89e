use std::io::Write;
use std::path::Path;

use super::{Command, CommandDescriptor, required};
use crate::context::AppContext;
use crate::interpreter::CommandArguments;

pub struct SourcesCommand {
    ctx: AppContext,
    descriptor: CommandDescriptor,
}

impl SourcesCommand {
    pub fn new(ctx: AppContext) -> Self {
        let descriptor = CommandDescriptor::builder("sources")
            .alternative_names(&["repositories"])
            .required_arguments(&["Action", "Name", "Path"])
            .positional_arguments(&["Action", "Name", "Path"])
            .description("List or edit the package repositories")
            .usage("rollout sources [list|add|remove|reset] [<Name>] [<Path>]")
            .argument("Action", "list (default), add, remove or reset")
            .argument("Name", "Source name")
            .argument("Path", "Folder holding package archives")
            .example("rollout sources", "List configured sources")
            .example(
                "rollout sources add share //fileserver/packages",
                "Add a repository on a network share",
            )
            .example("rollout sources remove share", "Remove the 'share' source")
            .build();
        Self { ctx, descriptor }
    }
}

impl Command for SourcesCommand {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    fn execute(&self, arguments: &CommandArguments, out: &mut dyn Write) -> anyhow::Result<()> {
        let store = self.ctx.source_store();
        let action = arguments
            .get_non_blank("Action")
            .map(|a| a.trim().to_ascii_lowercase())
            .unwrap_or_else(|| "list".to_string());

        match action.as_str() {
            "list" => {
                let sources = store.list()?;
                if sources.is_empty() {
                    writeln!(out, "No repositories configured.")?;
                    writeln!(out, "Add one with: rollout sources add <Name> <Path>")?;
                    return Ok(());
                }
                writeln!(out, "{:<20} Path", "Name")?;
                writeln!(out, "{}", "-".repeat(60))?;
                for source in sources {
                    writeln!(out, "{:<20} {}", source.name, source.path.display())?;
                }
            }
            "add" => {
                let name = required(arguments, "Name")?;
                let path = Path::new(required(arguments, "Path")?);
                let source = store.add(name, path)?;
                writeln!(out, "✓ Added source '{}': {}", source.name, source.path.display())?;
            }
            "remove" => {
                let name = required(arguments, "Name")?;
                if store.remove(name)? {
                    writeln!(out, "✓ Removed source '{name}'")?;
                } else {
                    writeln!(out, "• No source named '{name}'")?;
                }
            }
            "reset" => {
                store.reset()?;
                writeln!(out, "✓ Removed all sources")?;
            }
            other => anyhow::bail!("Unknown sources action '{other}' (use list, add, remove or reset)"),
        }
        Ok(())
    }
}
