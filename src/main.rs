mod builtins;
mod config;
mod fileops;
mod jobs;
mod parse;
mod process_exec;
mod prompt;
mod shell;
mod utils;

use reedline::{FileBackedHistory, Reedline, Signal};

use crate::{jobs::JobStack, parse::MAX_CMD_LEN, prompt::MinibashPrompt, utils::error_message};

fn main() {
    // [1] Load configuration and set up the prompt
    let cfg = config::init();
    let prompt = MinibashPrompt::new(cfg.prompt.clone());

    // [2] Line editor with file-backed history
    let history = Box::new(
        FileBackedHistory::with_file(1000, config::history_file_path())
            .unwrap_or_else(|_| FileBackedHistory::default()),
    );
    let mut editor = Reedline::create().with_history(history);

    // The interpreter itself shrugs off interrupt signals; children get the
    // default handlers restored before exec.
    unsafe {
        libc::signal(libc::SIGINT, libc::SIG_IGN);
        libc::signal(libc::SIGQUIT, libc::SIG_IGN);
    }

    // [3] The job stack is the only mutable interpreter state
    let mut jobs = JobStack::new();

    // [4] Startup commands go through the normal dispatch path
    for line in &cfg.startup {
        if let Err(e) = shell::exec(line, &mut jobs) {
            error_message(&format!("{e:#}"));
        }
    }

    // [5] Main prompt loop
    loop {
        match editor.read_line(&prompt) {
            Ok(Signal::Success(buf)) => {
                let line = buf.trim();
                if line.is_empty() {
                    continue;
                }
                if line.len() > MAX_CMD_LEN {
                    error_message(&format!(
                        "Command too long. Maximum is {MAX_CMD_LEN} characters."
                    ));
                    continue;
                }

                // Reserved keywords sit outside the operator grammar.
                match line {
                    "dter" => {
                        println!("Exiting minibash...");
                        break;
                    }
                    "help" => {
                        println!("{}", builtins::help());
                        continue;
                    }
                    _ => {}
                }

                if let Err(e) = shell::exec(line, &mut jobs) {
                    error_message(&format!("{e:#}"));
                }
            }
            // Ctrl+C abandons the current line and re-issues the prompt.
            Ok(Signal::CtrlC) => continue,
            Ok(Signal::CtrlD) => break,
            Err(e) => error_message(&format!("read error: {e}")),
        }
    }
}
