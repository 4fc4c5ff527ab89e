use std::io::Write;
use std::path::Path;

use anyhow::Context;

use super::{Command, CommandDescriptor, required};
use crate::context::AppContext;
use crate::interpreter::CommandArguments;
use crate::repository::FolderRepository;

pub struct PublishCommand {
    ctx: AppContext,
    descriptor: CommandDescriptor,
}

impl PublishCommand {
    pub fn new(ctx: AppContext) -> Self {
        let descriptor = CommandDescriptor::builder("publish")
            .alternative_names(&["push"])
            .required_arguments(&["PackagePath", "Repository"])
            .positional_arguments(&["PackagePath", "Repository"])
            .description("Copy a package archive into a configured repository")
            .usage("rollout publish <PackagePath> [<Repository>]")
            .argument("PackagePath", "Package archive to publish")
            .argument("Repository", "Source name (default: the first configured source)")
            .example(
                "rollout publish ./packages/Web.Api.1.2.0.15.zip share",
                "Publish to the source named 'share'",
            )
            .build();
        Self { ctx, descriptor }
    }

    fn target(&self, name: Option<&str>) -> anyhow::Result<FolderRepository> {
        let sources = self.ctx.repositories()?;
        let found = match name {
            Some(name) => sources
                .repositories()
                .iter()
                .find(|repository| repository.name().eq_ignore_ascii_case(name)),
            None => sources.repositories().first(),
        };

        match (found, name) {
            (Some(repository), _) => Ok(repository.clone()),
            (None, Some(name)) => anyhow::bail!("Unknown repository '{name}'"),
            (None, None) => {
                anyhow::bail!("No repositories configured; add one with 'rollout sources add'")
            }
        }
    }
}

impl Command for PublishCommand {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    fn execute(&self, arguments: &CommandArguments, out: &mut dyn Write) -> anyhow::Result<()> {
        let package_path = Path::new(required(arguments, "PackagePath")?);
        let repository = self.target(arguments.get_non_blank("Repository").map(str::trim))?;

        let dest = repository.publish(package_path).with_context(|| {
            format!(
                "Failed to publish {} to '{}'",
                package_path.display(),
                repository.name()
            )
        })?;

        writeln!(out, "✓ Published to '{}': {}", repository.name(), dest.display())?;
        Ok(())
    }
}
