/// Split a pre-joined command line into arguments.
///
/// Whitespace separates arguments and double quotes group them. Inside
/// quotes `\"` is a literal quote; every other backslash is kept as is so
/// Windows paths survive.
pub fn split_args(command: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut started = false;

    for c in command.chars() {
        if escaped {
            if c != '"' {
                current.push('\\');
            }
            current.push(c);
            escaped = false;
            continue;
        }

        match c {
            '\\' if in_quotes => escaped = true,
            '"' => {
                in_quotes = !in_quotes;
                started = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if started {
                    args.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            c => {
                current.push(c);
                started = true;
            }
        }
    }

    if escaped {
        current.push('\\');
    }
    if started {
        args.push(current);
    }
    args
}

/// Join arguments into one command line that [`split_args`] reads back.
pub fn join_args<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|arg| {
            let arg = arg.as_ref();
            if !arg.is_empty() && !arg.contains(|c: char| c.is_whitespace() || c == '"') {
                arg.to_string()
            } else {
                format!("\"{}\"", arg.replace('"', "\\\""))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
