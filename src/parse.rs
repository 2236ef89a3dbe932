use anyhow::{Result, bail};

pub const MAX_ARGS: usize = 4;
pub const MAX_CMD_LEN: usize = 1024;
pub const MAX_PIPE_CMDS: usize = 4;
pub const MAX_SEQ_CMDS: usize = 4;
pub const MAX_COND_CMDS: usize = 5;

/// Which execution strategy owns a line. Exactly one applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dispatch {
    Conditional,
    Pipe,
    Redirect(RedirectMode),
    Background,
    Foreground,
    Sequential,
    WordCount,
    Concat,
    Simple,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RedirectMode {
    Input,     // <
    Overwrite, // >
    Append,    // >>
}

/// Separator between two conditional sub-commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Separator {
    And, // &&
    Or,  // ||
}

// Classification precedence is a contract: a line holding both `|` and `;`
// belongs to the pipe strategy, never the sequential one.
pub fn classify(line: &str) -> Dispatch {
    if line.contains("&&") || line.contains("||") {
        Dispatch::Conditional
    } else if line.contains('|') {
        Dispatch::Pipe
    } else if line.contains('>') {
        if line.contains(">>") {
            Dispatch::Redirect(RedirectMode::Append)
        } else {
            Dispatch::Redirect(RedirectMode::Overwrite)
        }
    } else if line.contains('<') {
        Dispatch::Redirect(RedirectMode::Input)
    } else if line.contains('+') {
        Dispatch::Background
    } else if line == "fore" {
        Dispatch::Foreground
    } else if line.contains(';') {
        Dispatch::Sequential
    } else if line.starts_with('#') {
        Dispatch::WordCount
    } else if line.contains('~') {
        Dispatch::Concat
    } else {
        Dispatch::Simple
    }
}

/// Bounded argument vector: between 1 and [`MAX_ARGS`] tokens, enforced at
/// construction so no spawn is ever attempted with an invalid arity.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgVec(Vec<String>);

impl ArgVec {
    pub fn new(tokens: Vec<String>) -> Result<Self> {
        if tokens.is_empty() || tokens.len() > MAX_ARGS {
            bail!("Invalid number of arguments. Maximum is {MAX_ARGS}.");
        }
        Ok(Self(tokens))
    }

    /// Tokenize a command on whitespace.
    pub fn parse(input: &str) -> Result<Self> {
        Self::new(input.split_whitespace().map(str::to_string).collect())
    }

    pub fn args(&self) -> &[String] {
        &self.0
    }

    pub fn program(&self) -> &str {
        &self.0[0]
    }
}

/// Split a line on a structural delimiter into trimmed, non-empty
/// sub-commands. The input is never mutated.
pub fn split_on(line: &str, delim: char) -> Vec<String> {
    line.split(delim)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Decompose a redirection line: leading tokens up to the first operator
/// token (one starting with `<` or `>`) form the argument vector, the single
/// token after it is the target filename.
pub fn split_redirect(line: &str) -> Result<(ArgVec, String)> {
    const ERR: &str = "Invalid arguments or no file specified for redirection.";

    let mut tokens = line.split_whitespace();
    let mut args = Vec::new();
    loop {
        match tokens.next() {
            Some(tok) if tok.starts_with('<') || tok.starts_with('>') => break,
            Some(tok) => args.push(tok.to_string()),
            None => bail!(ERR),
        }
    }
    let Some(filename) = tokens.next() else {
        bail!(ERR);
    };
    let args = ArgVec::new(args).map_err(|_| anyhow::anyhow!(ERR))?;
    Ok((args, filename.to_string()))
}

/// Decompose a background line: every token before a standalone `+` marker.
pub fn split_background(line: &str) -> Result<ArgVec> {
    let tokens = line
        .split_whitespace()
        .take_while(|tok| *tok != "+")
        .map(str::to_string)
        .collect();
    ArgVec::new(tokens)
}

/// Decompose a conditional line on runs of `&`/`|` characters. Each
/// separator is classified by the separator character immediately preceding
/// the sub-command that follows it, so `a && b || c` yields
/// `(["a", "b", "c"], [And, Or])`.
pub fn split_conditional(line: &str) -> (Vec<String>, Vec<Separator>) {
    let mut cmds = Vec::new();
    let mut seps = Vec::new();
    let mut cur = String::new();
    let mut last_sep = None;

    let mut finish = |cur: &mut String, last_sep: Option<char>| {
        let trimmed = cur.trim();
        if !trimmed.is_empty() {
            if !cmds.is_empty() {
                // A separator always precedes every sub-command but the first.
                seps.push(match last_sep {
                    Some('&') => Separator::And,
                    _ => Separator::Or,
                });
            }
            cmds.push(trimmed.to_string());
        }
        cur.clear();
    };

    for ch in line.chars() {
        if ch == '&' || ch == '|' {
            finish(&mut cur, last_sep);
            last_sep = Some(ch);
        } else {
            cur.push(ch);
        }
    }
    finish(&mut cur, last_sep);

    (cmds, seps)
}
