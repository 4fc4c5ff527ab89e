//! Command-line interpretation.
//!
//! The first token selects a command (see [`name_matcher`]); the remaining
//! tokens are bound to the command's declared arguments, either by name
//! (`-Name=Value`) or by position in declaration order.

pub mod argument_name_matcher;
pub mod argument_parser;
pub mod arguments;
pub mod build_properties;
pub mod name_matcher;

use std::io::Write;

use tracing::debug;

use crate::commands::{Command, CommandDescriptor};

pub use argument_name_matcher::resolve_argument_name;
pub use argument_parser::{ParsedArgumentToken, parse_argument};
pub use arguments::{ArgumentMapBuilder, CommandArguments};
pub use build_properties::parse_build_properties;
pub use name_matcher::{find_command_index, match_command};

/// A selected command together with its bound arguments.
pub struct CommandInvocation<'a> {
    command: &'a dyn Command,
    arguments: CommandArguments,
}

impl<'a> CommandInvocation<'a> {
    pub fn command(&self) -> &'a dyn Command {
        self.command
    }

    pub fn arguments(&self) -> &CommandArguments {
        &self.arguments
    }

    pub fn execute(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        self.command.execute(&self.arguments, out)
    }
}

impl std::fmt::Debug for CommandInvocation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandInvocation")
            .field("command", &self.command.descriptor().name())
            .field("arguments", &self.arguments)
            .finish()
    }
}

pub struct CommandLineArgumentInterpreter<'a> {
    commands: &'a [Box<dyn Command>],
}

impl<'a> CommandLineArgumentInterpreter<'a> {
    pub fn new(commands: &'a [Box<dyn Command>]) -> Self {
        Self { commands }
    }

    /// Select and bind a command. `None` for an empty command line or when
    /// the first token is unknown or ambiguous.
    pub fn get_command<S: AsRef<str>>(&self, argv: &[S]) -> Option<CommandInvocation<'a>> {
        let (first, rest) = argv.split_first()?;

        let index = find_command_index(
            first.as_ref(),
            self.commands.iter().map(|command| command.descriptor()),
        )?;
        let command: &'a dyn Command = self.commands[index].as_ref();
        let arguments = bind_arguments(command.descriptor(), rest);

        debug!(command = command.descriptor().name(), ?arguments, "Bound command line");

        Some(CommandInvocation { command, arguments })
    }
}

/// Bind argument tokens to `descriptor`'s schema.
///
/// Named tokens overwrite the matching declared argument, or create an
/// unmapped entry. Positional tokens fill the next positional slot, in
/// declaration order, that no earlier token has filled. Surplus positional
/// values are added under their own text unless that key is already bound.
pub fn bind_arguments<S: AsRef<str>>(descriptor: &CommandDescriptor, tokens: &[S]) -> CommandArguments {
    let declared = descriptor.declared_arguments();
    let mut builder = ArgumentMapBuilder::new();
    for name in &declared {
        builder.declare(name);
    }

    let mut filled: Vec<String> = Vec::new();
    for token in tokens {
        let parsed = parse_argument(token.as_ref());
        if parsed.is_empty() {
            continue;
        }

        match parsed.name {
            Some(name) => {
                let resolved = resolve_argument_name(&name, declared.iter().copied());
                filled.push(resolved.clone());
                builder.set(resolved, parsed.value);
            }
            None => {
                let value = parsed.value.unwrap_or_default();
                let slot = descriptor
                    .positional_arguments()
                    .iter()
                    .find(|slot| !filled.iter().any(|name| name.eq_ignore_ascii_case(slot)));
                match slot {
                    Some(slot) => {
                        filled.push(slot.clone());
                        builder.set(slot.as_str(), Some(value));
                    }
                    None => {
                        builder.insert_if_absent(value.clone(), Some(value));
                    }
                }
            }
        }
    }

    builder.build()
}
