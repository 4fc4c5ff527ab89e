//! Resolves the first command-line token to a registered command.

use tracing::debug;

use crate::commands::CommandDescriptor;

type MatchRule = fn(&str, &CommandDescriptor) -> bool;

/// Rules in precedence order. A rule matching more than one command ends the
/// search, even if a later rule would have picked a single command.
const RULES: [(&str, MatchRule); 3] = [
    ("name", matches_name),
    ("alternative name", matches_alternative_name),
    ("name prefix", matches_name_prefix),
];

/// Position of the command `token` refers to, or `None` when nothing or
/// more than one command matches.
pub fn find_command_index<'a, I>(token: &str, candidates: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a CommandDescriptor>,
{
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    let candidates: Vec<&CommandDescriptor> = candidates.into_iter().collect();

    for (rule_name, rule) in RULES {
        let mut matches = candidates
            .iter()
            .enumerate()
            .filter(|(_, candidate)| rule(token, candidate))
            .map(|(index, _)| index);

        match (matches.next(), matches.next()) {
            (Some(index), None) => {
                debug!(token, rule = rule_name, command = %candidates[index].name(), "Matched command");
                return Some(index);
            }
            (Some(_), Some(_)) => {
                debug!(token, rule = rule_name, "Command token is ambiguous");
                return None;
            }
            (None, _) => {}
        }
    }

    None
}

/// Descriptor-only convenience over [`find_command_index`].
pub fn match_command<'a>(
    token: &str,
    candidates: &'a [CommandDescriptor],
) -> Option<&'a CommandDescriptor> {
    find_command_index(token, candidates).map(|index| &candidates[index])
}

fn matches_name(token: &str, candidate: &CommandDescriptor) -> bool {
    candidate.name().eq_ignore_ascii_case(token)
}

fn matches_alternative_name(token: &str, candidate: &CommandDescriptor) -> bool {
    candidate
        .alternative_names()
        .iter()
        .any(|alternative| alternative.eq_ignore_ascii_case(token))
}

fn matches_name_prefix(token: &str, candidate: &CommandDescriptor) -> bool {
    candidate
        .name()
        .get(..token.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(token))
}
