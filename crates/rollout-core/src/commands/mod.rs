//! Commands and the registry that exposes them to the interpreter.
//!
//! Every command owns a [`CommandDescriptor`] describing its names and
//! argument schema, and receives its bound arguments as
//! [`CommandArguments`]. Output goes to the writer handed to `execute`;
//! failures are returned as `anyhow` errors with context attached.

pub mod cleanup;
pub mod descriptor;
pub mod help;
pub mod install;
pub mod package;
pub mod publish;
pub mod sources;
pub mod status;
pub mod uninstall;

use std::io::Write;

use crate::context::AppContext;
use crate::error::DeployError;
use crate::interpreter::CommandArguments;
use crate::version::SemanticVersion;

pub use cleanup::CleanupCommand;
pub use descriptor::{CommandDescriptor, CommandDescriptorBuilder, CommandExample};
pub use help::HelpCommand;
pub use install::{InstallCommand, UpdateCommand};
pub use package::PackageCommand;
pub use publish::PublishCommand;
pub use sources::SourcesCommand;
pub use status::StatusCommand;
pub use uninstall::UninstallCommand;

pub trait Command {
    fn descriptor(&self) -> &CommandDescriptor;

    fn execute(&self, arguments: &CommandArguments, out: &mut dyn Write) -> anyhow::Result<()>;
}

/// All registered commands. `help` is always first.
pub struct CommandProvider {
    commands: Vec<Box<dyn Command>>,
}

impl CommandProvider {
    pub fn new(ctx: &AppContext) -> Self {
        let mut commands: Vec<Box<dyn Command>> = vec![
            Box::new(InstallCommand::new(ctx.clone())),
            Box::new(UpdateCommand::new(ctx.clone())),
            Box::new(UninstallCommand::new(ctx.clone())),
            Box::new(StatusCommand::new(ctx.clone())),
            Box::new(CleanupCommand::new(ctx.clone())),
            Box::new(PackageCommand::new(ctx.clone())),
            Box::new(PublishCommand::new(ctx.clone())),
            Box::new(SourcesCommand::new(ctx.clone())),
        ];

        let help_descriptor = HelpCommand::descriptor_for();
        let mut descriptors = vec![help_descriptor.clone()];
        descriptors.extend(commands.iter().map(|command| command.descriptor().clone()));
        commands.insert(0, Box::new(HelpCommand::new(help_descriptor, descriptors)));

        Self { commands }
    }

    pub fn commands(&self) -> &[Box<dyn Command>] {
        &self.commands
    }

    pub fn help(&self) -> &dyn Command {
        self.commands[0].as_ref()
    }
}

impl std::fmt::Debug for CommandProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.commands.iter().map(|c| c.descriptor().name()).collect();
        f.debug_struct("CommandProvider").field("commands", &names).finish()
    }
}

/// Non-blank value of a mandatory argument.
pub(crate) fn required<'a>(
    arguments: &'a CommandArguments,
    name: &'static str,
) -> Result<&'a str, DeployError> {
    arguments
        .get_non_blank(name)
        .map(str::trim)
        .ok_or(DeployError::InvalidArgument {
            name,
            reason: "a value is required".to_string(),
        })
}

/// Boolean argument: `true/false/yes/no/1/0`, ignoring case. Unset and
/// valueless (`-Force`) arguments are `false`.
pub(crate) fn flag(arguments: &CommandArguments, name: &'static str) -> Result<bool, DeployError> {
    let Some(value) = arguments.get_non_blank(name) else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(DeployError::InvalidArgument {
            name,
            reason: format!("'{value}' is not a boolean (use true/false, yes/no or 1/0)"),
        }),
    }
}

pub(crate) fn optional_version(
    arguments: &CommandArguments,
    name: &'static str,
) -> Result<Option<SemanticVersion>, DeployError> {
    arguments
        .get_non_blank(name)
        .map(|text| SemanticVersion::parse(text.trim()))
        .transpose()
}
