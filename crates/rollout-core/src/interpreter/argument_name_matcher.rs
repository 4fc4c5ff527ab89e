//! Maps user-typed argument names onto a command's declared names.

/// Declared name equal to `parsed_name` ignoring ASCII case, or
/// `parsed_name` unchanged when the command declares no such argument.
pub fn resolve_argument_name<'a, I>(parsed_name: &str, declared_names: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    declared_names
        .into_iter()
        .find(|declared| declared.eq_ignore_ascii_case(parsed_name))
        .map(str::to_string)
        .unwrap_or_else(|| parsed_name.to_string())
}
