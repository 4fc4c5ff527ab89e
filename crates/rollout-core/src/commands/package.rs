use std::io::Write;
use std::path::Path;

use anyhow::Context;

use super::{Command, CommandDescriptor, required};
use crate::context::AppContext;
use crate::interpreter::{CommandArguments, parse_build_properties};
use crate::version::SemanticVersion;

pub struct PackageCommand {
    ctx: AppContext,
    descriptor: CommandDescriptor,
}

impl PackageCommand {
    pub fn new(ctx: AppContext) -> Self {
        let descriptor = CommandDescriptor::builder("package")
            .alternative_names(&["pack"])
            .required_arguments(&["BuildOutput", "Id", "Version", "Properties"])
            .positional_arguments(&["BuildOutput", "Id", "Version"])
            .description("Package a build output folder as a versioned archive")
            .usage("rollout package <BuildOutput> <Id> <Version> [-Properties=\"Key=Value;...\"]")
            .argument("BuildOutput", "Folder with the files to deploy")
            .argument("Id", "Package id")
            .argument("Version", "Package version, e.g. 1.2.0.15 or 1.3.0-beta")
            .argument("Properties", "Metadata as Key=Value pairs separated by ';'")
            .example(
                "rollout package ./bin/Release Web.Api 1.2.0.15",
                "Create Web.Api.1.2.0.15.zip in the packaging folder",
            )
            .example(
                "rollout pack ./out Web.Api 1.3.0-beta -Properties=\"Branch=main;Commit=abc123\"",
                "Create a pre-release package with metadata",
            )
            .build();
        Self { ctx, descriptor }
    }
}

impl Command for PackageCommand {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    fn execute(&self, arguments: &CommandArguments, out: &mut dyn Write) -> anyhow::Result<()> {
        let build_output = Path::new(required(arguments, "BuildOutput")?);
        let id = required(arguments, "Id")?;
        let version = SemanticVersion::parse(required(arguments, "Version")?)?;
        let properties = arguments
            .get("Properties")
            .map(parse_build_properties)
            .unwrap_or_default();

        let path = self
            .ctx
            .package_builder()
            .build(build_output, id, &version, properties)
            .with_context(|| format!("Failed to package {id} {version}"))?;

        writeln!(out, "✓ Created package {}", path.display())?;
        Ok(())
    }
}
