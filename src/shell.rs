use anyhow::{Context, Result, bail};

use crate::{
    fileops,
    jobs::JobStack,
    parse::{self, ArgVec, Dispatch, MAX_SEQ_CMDS, split_on},
    process_exec::{self, ChildIo, launch, wait_status},
    utils::error_message,
};

/// Main execution entry point: classify one trimmed, non-empty line and hand
/// it to exactly one strategy. Every error is recovered here or above; only
/// the exit keyword ends the interpreter.
pub fn exec(line: &str, jobs: &mut JobStack) -> Result<()> {
    match parse::classify(line) {
        Dispatch::Conditional => process_exec::run_conditional(line),
        Dispatch::Pipe => process_exec::run_pipe(line),
        Dispatch::Redirect(mode) => process_exec::run_redirect(line, mode),
        Dispatch::Background => process_exec::run_background(line, jobs),
        Dispatch::Foreground => process_exec::run_foreground(jobs),
        Dispatch::Sequential => run_sequential(line),
        Dispatch::WordCount => fileops::count_words(&line[1..]),
        Dispatch::Concat => fileops::concatenate(line),
        Dispatch::Simple => run_simple(line).map(|_| ()),
    }
}

/// Simple strategy: one synchronous child, inherited stdio. Returns the
/// child's exit status, -1 if it did not terminate normally.
pub fn run_simple(line: &str) -> Result<i32> {
    let args = ArgVec::parse(line)?;
    let pid = launch(&args, ChildIo::default()).context("fork in run_simple")?;
    Ok(wait_status(pid))
}

/// Sequential strategy: up to [`MAX_SEQ_CMDS`] sub-commands, each run as a
/// simple command. A failing or malformed sub-command never stops the rest.
fn run_sequential(line: &str) -> Result<()> {
    let cmds = split_on(line, ';');
    if cmds.len() > MAX_SEQ_CMDS {
        bail!("Error: Too many commands for sequential execution. Maximum is {MAX_SEQ_CMDS}.");
    }
    for cmd in &cmds {
        if let Err(e) = run_simple(cmd) {
            error_message(&format!("{e:#}"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn simple_returns_real_exit_status() {
        assert_eq!(run_simple("true").unwrap(), 0);
        assert_eq!(run_simple("false").unwrap(), 1);
        assert_eq!(run_simple("definitely-not-a-command-xyz").unwrap(), 127);
    }

    #[test]
    fn simple_rejects_bad_arity_without_spawning() {
        assert!(run_simple("").is_err());
        assert!(run_simple("a b c d e").is_err());
    }

    #[test]
    fn sequential_attempts_every_command() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        let line = format!(
            "touch {} ; definitely-not-a-command-xyz ; touch {}",
            first.display(),
            second.display()
        );
        run_sequential(&line).unwrap();
        assert!(first.exists());
        assert!(second.exists());
    }

    #[test]
    fn sequential_cap_is_four() {
        let err = run_sequential("a ; b ; c ; d ; e").unwrap_err();
        assert!(err.to_string().contains("Too many commands for sequential"));
    }

    #[test]
    fn exec_routes_word_count_past_the_sigil() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("words.txt");
        fs::write(&file, "one two three").unwrap();
        let mut jobs = JobStack::new();
        exec(&format!("#{}", file.display()), &mut jobs).unwrap();
    }
}
