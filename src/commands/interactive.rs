//! Terminal prompts used by the interactive `new` command.
//!
//! Every prompt reads from stdin and writes to stdout. Input is generic over
//! `BufRead` internally so the parsing rules can be tested without a terminal.

use std::io::{self, BufRead, Write};

use crate::error::{HelperError, Result};

/// Ask a yes/no question. Only `y`/`Y` confirms.
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}? [y/N] ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Let the user pick one of `options` by number.
///
/// An empty answer picks `default` when there is one.
pub fn select_option(prompt: &str, options: &[&str], default: Option<usize>) -> Result<usize> {
    for (idx, option) in options.iter().enumerate() {
        println!("  [{idx}] {option}");
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    loop {
        match default {
            Some(idx) => print!("{} [0-{}] (default {}): ", prompt, options.len() - 1, idx),
            None => print!("{} [0-{}]: ", prompt, options.len() - 1),
        }
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(closed_input());
        }

        match parse_selection(&line, options.len(), default) {
            Some(idx) => return Ok(idx),
            None => println!(
                "Invalid input. Please enter a number between 0 and {}.",
                options.len() - 1
            ),
        }
    }
}

fn closed_input() -> HelperError {
    io::Error::new(io::ErrorKind::UnexpectedEof, "input closed").into()
}

fn parse_selection(line: &str, len: usize, default: Option<usize>) -> Option<usize> {
    let line = line.trim();
    if line.is_empty() {
        return default;
    }
    line.parse::<usize>().ok().filter(|idx| *idx < len)
}

/// Read a single line, falling back to `default` on an empty answer.
pub fn prompt_text(prompt: &str, default: Option<&str>) -> Result<String> {
    match default {
        Some(d) if !d.is_empty() => print!("{prompt} [{d}]: "),
        _ => print!("{prompt}: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Err(closed_input());
    }

    let input = input.trim();
    if input.is_empty()
        && let Some(d) = default
    {
        return Ok(d.to_string());
    }

    Ok(input.to_string())
}

/// Read several lines, finished by an empty line or end of input.
///
/// Fails when input is already closed before the first line.
pub fn prompt_multiline(prompt: &str) -> Result<String> {
    println!("{prompt} (finish with an empty line):");
    io::stdout().flush()?;

    let stdin = io::stdin();
    read_until_blank(&mut stdin.lock())
}

fn read_until_blank<R: BufRead>(input: &mut R) -> Result<String> {
    let mut lines = Vec::new();
    loop {
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            if lines.is_empty() {
                return Err(closed_input());
            }
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            break;
        }
        lines.push(line.to_string());
    }
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("1\n", 2, None), Some(1));
        assert_eq!(parse_selection("\n", 2, Some(0)), Some(0));
        assert_eq!(parse_selection("\n", 2, None), None);
        assert_eq!(parse_selection("5", 2, Some(0)), None);
        assert_eq!(parse_selection("x", 2, Some(0)), None);
    }

    #[test]
    fn test_multiline_stops_at_blank_line() {
        let mut input = Cursor::new("first step\r\nsecond step\n\nignored\n");
        assert_eq!(
            read_until_blank(&mut input).unwrap(),
            "first step\nsecond step"
        );
    }

    #[test]
    fn test_multiline_stops_at_eof() {
        let mut input = Cursor::new("only line");
        assert_eq!(read_until_blank(&mut input).unwrap(), "only line");
    }

    #[test]
    fn test_multiline_fails_on_closed_input() {
        let mut input = Cursor::new("");
        let err = read_until_blank(&mut input).unwrap_err();
        assert!(err.to_string().contains("input closed"));
    }

    #[test]
    fn test_multiline_blank_first_line_is_empty_answer() {
        let mut input = Cursor::new("\nnext\n");
        assert_eq!(read_until_blank(&mut input).unwrap(), "");
    }
}
