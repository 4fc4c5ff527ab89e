use std::io::Write;

use super::{Command, CommandDescriptor};
use crate::interpreter::{CommandArguments, match_command};

pub struct HelpCommand {
    descriptor: CommandDescriptor,
    commands: Vec<CommandDescriptor>,
}

impl HelpCommand {
    /// `commands` is every registered descriptor, including help's own.
    pub fn new(descriptor: CommandDescriptor, commands: Vec<CommandDescriptor>) -> Self {
        Self {
            descriptor,
            commands,
        }
    }

    pub fn descriptor_for() -> CommandDescriptor {
        CommandDescriptor::builder("help")
            .alternative_names(&["?"])
            .required_arguments(&["Command"])
            .positional_arguments(&["Command"])
            .description("Show the available commands or details for one command")
            .usage("rollout help [<Command>]")
            .argument("Command", "Name (or unambiguous prefix) of a command")
            .example("rollout help", "List all commands")
            .example("rollout help install", "Show how to use the install command")
            .build()
    }

    fn write_overview(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        writeln!(out, "Usage: rollout <command> [arguments]")?;
        writeln!(out)?;
        writeln!(out, "Commands:")?;
        for descriptor in &self.commands {
            writeln!(out, "  {:<12} {}", descriptor.name(), descriptor.description())?;
        }
        writeln!(out)?;
        writeln!(out, "Arguments are given by position or as -Name=Value.")?;
        writeln!(out, "Run 'rollout help <command>' for details.")?;
        Ok(())
    }

    fn write_details(descriptor: &CommandDescriptor, out: &mut dyn Write) -> anyhow::Result<()> {
        writeln!(out, "{}", descriptor.name())?;
        if !descriptor.alternative_names().is_empty() {
            writeln!(out, "  Aliases: {}", descriptor.alternative_names().join(", "))?;
        }
        writeln!(out)?;
        writeln!(out, "{}", descriptor.description())?;
        writeln!(out)?;
        writeln!(out, "Usage: {}", descriptor.usage())?;

        if !descriptor.argument_descriptions().is_empty() {
            writeln!(out)?;
            writeln!(out, "Arguments:")?;
            for (name, description) in descriptor.argument_descriptions() {
                writeln!(out, "  -{:<16} {}", name, description)?;
            }
        }

        if !descriptor.examples().is_empty() {
            writeln!(out)?;
            writeln!(out, "Examples:")?;
            for example in descriptor.examples() {
                writeln!(out, "  {}", example.command_line)?;
                writeln!(out, "      {}", example.description)?;
            }
        }
        Ok(())
    }
}

impl Command for HelpCommand {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    fn execute(&self, arguments: &CommandArguments, out: &mut dyn Write) -> anyhow::Result<()> {
        let Some(topic) = arguments.get_non_blank("Command") else {
            return self.write_overview(out);
        };

        match match_command(topic, &self.commands) {
            Some(descriptor) => Self::write_details(descriptor, out),
            None => {
                writeln!(out, "No help available for '{topic}'.")?;
                writeln!(out)?;
                self.write_overview(out)
            }
        }
    }
}
