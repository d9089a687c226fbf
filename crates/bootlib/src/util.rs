/// Characters that have to be backslash-escaped for an unquoted JSON document
/// to survive being passed through `sh -c "echo ..."`.
pub static SHELL_ESCAPED: &[char] = &['{', '}', '"'];

/// Backslash-escape a JSON document the way it appears in an `echo` command
/// line.  This is only used for display: nothing is ever run through a shell.
pub fn shell_escape_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len() * 2);
    for c in json.chars() {
        if SHELL_ESCAPED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Quote a single argument for display in a shell command line.  Arguments
/// made only of characters no shell treats specially are left bare.
pub fn shell_quote(arg: &str) -> String {
    let plain = |c: char| c.is_ascii_alphanumeric() || "@%+=:,./_-".contains(c);

    if !arg.is_empty() && arg.chars().all(plain) {
        arg.to_owned()
    } else {
        format!("'{quoted}'", quoted = arg.replace('\'', "'\\''"))
    }
}
