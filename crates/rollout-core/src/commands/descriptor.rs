//! Static description of a command: names, argument schema and help text.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    name: String,
    alternative_names: Vec<String>,
    required_arguments: Vec<String>,
    positional_arguments: Vec<String>,
    description: String,
    usage: String,
    examples: Vec<CommandExample>,
    argument_descriptions: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandExample {
    pub command_line: String,
    pub description: String,
}

impl CommandDescriptor {
    pub fn builder(name: impl Into<String>) -> CommandDescriptorBuilder {
        CommandDescriptorBuilder {
            descriptor: CommandDescriptor {
                name: name.into(),
                alternative_names: Vec::new(),
                required_arguments: Vec::new(),
                positional_arguments: Vec::new(),
                description: String::new(),
                usage: String::new(),
                examples: Vec::new(),
                argument_descriptions: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alternative_names(&self) -> &[String] {
        &self.alternative_names
    }

    pub fn required_arguments(&self) -> &[String] {
        &self.required_arguments
    }

    pub fn positional_arguments(&self) -> &[String] {
        &self.positional_arguments
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn examples(&self) -> &[CommandExample] {
        &self.examples
    }

    pub fn argument_descriptions(&self) -> &[(String, String)] {
        &self.argument_descriptions
    }

    /// Required then positional argument names, without duplicates.
    pub fn declared_arguments(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self
            .required_arguments
            .iter()
            .chain(&self.positional_arguments)
        {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }
}

#[derive(Debug)]
pub struct CommandDescriptorBuilder {
    descriptor: CommandDescriptor,
}

impl CommandDescriptorBuilder {
    pub fn alternative_names(mut self, names: &[&str]) -> Self {
        self.descriptor
            .alternative_names
            .extend(names.iter().map(|n| n.to_string()));
        self
    }

    pub fn required_arguments(mut self, names: &[&str]) -> Self {
        self.descriptor
            .required_arguments
            .extend(names.iter().map(|n| n.to_string()));
        self
    }

    pub fn positional_arguments(mut self, names: &[&str]) -> Self {
        self.descriptor
            .positional_arguments
            .extend(names.iter().map(|n| n.to_string()));
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.descriptor.description = text.into();
        self
    }

    pub fn usage(mut self, text: impl Into<String>) -> Self {
        self.descriptor.usage = text.into();
        self
    }

    pub fn example(mut self, command_line: impl Into<String>, description: impl Into<String>) -> Self {
        self.descriptor.examples.push(CommandExample {
            command_line: command_line.into(),
            description: description.into(),
        });
        self
    }

    pub fn argument(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.descriptor
            .argument_descriptions
            .push((name.into(), description.into()));
        self
    }

    pub fn build(self) -> CommandDescriptor {
        self.descriptor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_arguments_merge_required_and_positional() {
        let descriptor = CommandDescriptor::builder("install")
            .required_arguments(&["Id", "Version", "Force"])
            .positional_arguments(&["Id", "Version", "DeploymentType"])
            .build();

        assert_eq!(
            descriptor.declared_arguments(),
            vec!["Id", "Version", "Force", "DeploymentType"]
        );
    }
}
