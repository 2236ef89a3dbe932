use std::{
    ffi::CString,
    fs::{File, OpenOptions},
    io::{self, Read, Write},
    os::fd::{AsRawFd, FromRawFd, RawFd},
    ptr,
};

use anyhow::{Context, Result, bail};
use libc::{
    SIG_DFL, SIGINT, SIGQUIT, STDERR_FILENO, STDIN_FILENO, STDOUT_FILENO, close, dup2, execvp,
    fork, pid_t, pipe, setsid, signal, waitpid,
};
use nu_ansi_term::Color;

use crate::{
    jobs::JobStack,
    parse::{
        ArgVec, MAX_COND_CMDS, MAX_PIPE_CMDS, RedirectMode, Separator, split_background,
        split_conditional, split_on, split_redirect,
    },
    utils::error_message,
};

/// How a child's standard streams are wired before its image is replaced.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChildIo {
    pub stdin: Option<RawFd>,
    pub stdout: Option<RawFd>,
    pub stderr: Option<RawFd>,
    pub new_session: bool,
}

/// Fork a child, rewire its standard descriptors per `io_spec`, and replace
/// its image with `args`. Returns the child's pid; fork failure is the only
/// error the caller sees. Rewiring or exec failure is fatal to the child
/// alone: it reports on stderr and exits (127 when the program could not be
/// executed, so exec failure stays distinct from ordinary command failure).
pub fn launch(args: &ArgVec, io_spec: ChildIo) -> io::Result<pid_t> {
    // Build the argv before forking; only exec runs in the child.
    let cstrs: Vec<CString> = args
        .args()
        .iter()
        .map(|a| CString::new(a.as_str()))
        .collect::<Result<_, _>>()?;
    let argv: Vec<*const libc::c_char> = cstrs
        .iter()
        .map(|c| c.as_ptr())
        .chain(std::iter::once(ptr::null()))
        .collect();

    match unsafe { fork() } {
        -1 => Err(io::Error::last_os_error()),
        0 => {
            unsafe {
                if io_spec.new_session {
                    setsid();
                }
                signal(SIGINT, SIG_DFL);
                signal(SIGQUIT, SIG_DFL);
            }

            let wiring = [
                (io_spec.stdin, STDIN_FILENO),
                (io_spec.stdout, STDOUT_FILENO),
                (io_spec.stderr, STDERR_FILENO),
            ];
            for (src, target) in wiring {
                if let Some(fd) = src
                    && unsafe { dup2(fd, target) } == -1
                {
                    child_fail(&format!("dup2 in launch: {}", io::Error::last_os_error()), 1);
                }
            }
            // Close the source descriptors once wired; stdout and stderr may
            // share one.
            let mut sources: Vec<RawFd> = wiring
                .iter()
                .filter_map(|(src, _)| *src)
                .filter(|fd| *fd > 2)
                .collect();
            sources.sort_unstable();
            sources.dedup();
            for fd in sources {
                unsafe { close(fd) };
            }

            unsafe { execvp(cstrs[0].as_ptr(), argv.as_ptr()) };
            child_fail(
                &format!("{}: {}", args.program(), io::Error::last_os_error()),
                127,
            );
        }
        pid => Ok(pid),
    }
}

fn child_fail(msg: &str, code: i32) -> ! {
    eprintln!("{}", Color::Red.bold().paint(msg));
    unsafe { libc::_exit(code) }
}

/// Wait for `pid` and map its termination to an exit status: the real status
/// for a normal exit, -1 otherwise.
pub fn wait_status(pid: pid_t) -> i32 {
    let mut status = 0;
    unsafe { waitpid(pid, &mut status, 0) };
    if libc::WIFEXITED(status) {
        libc::WEXITSTATUS(status)
    } else {
        -1
    }
}

fn create_pipe() -> io::Result<(RawFd, RawFd)> {
    let mut fds = [0; 2];
    if unsafe { pipe(fds.as_mut_ptr()) } == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok((fds[0], fds[1]))
}

/// Pipe strategy: up to [`MAX_PIPE_CMDS`] stages, built strictly left to
/// right. Every stage is tokenized before anything spawns, so a malformed
/// stage or an over-long pipeline runs zero children. The parent reaps each
/// stage before the next stage's pipe is consumed; the last stage inherits
/// the interpreter's stdout.
pub fn run_pipe(line: &str) -> Result<()> {
    let cmds = split_on(line, '|');
    if cmds.len() > MAX_PIPE_CMDS {
        bail!("Error: Too many commands for piping. Maximum is {MAX_PIPE_CMDS}.");
    }
    let stages: Vec<ArgVec> = cmds
        .iter()
        .map(|cmd| ArgVec::parse(cmd))
        .collect::<Result<_>>()?;

    let mut prev_read: Option<RawFd> = None;
    for (i, stage) in stages.iter().enumerate() {
        let is_last = i == stages.len() - 1;

        let pipe_fds = if is_last {
            None
        } else {
            match create_pipe() {
                Ok(fds) => Some(fds),
                Err(e) => {
                    if let Some(fd) = prev_read {
                        unsafe { close(fd) };
                    }
                    return Err(e).context("pipe in run_pipe");
                }
            }
        };

        let io_spec = ChildIo {
            stdin: prev_read,
            stdout: pipe_fds.map(|(_, write_fd)| write_fd),
            ..Default::default()
        };
        let pid = match launch(stage, io_spec) {
            Ok(pid) => pid,
            Err(e) => {
                if let Some(fd) = prev_read {
                    unsafe { close(fd) };
                }
                if let Some((read_fd, write_fd)) = pipe_fds {
                    unsafe {
                        close(read_fd);
                        close(write_fd);
                    }
                }
                return Err(e).context("fork in run_pipe");
            }
        };

        if let Some(fd) = prev_read {
            unsafe { close(fd) };
        }
        prev_read = pipe_fds.map(|(read_fd, write_fd)| {
            unsafe { close(write_fd) };
            read_fd
        });

        wait_status(pid);
    }
    Ok(())
}

/// Redirection strategy: the target file is opened in the parent, so an open
/// failure aborts before any spawn; the parent's descriptor closes when
/// `file` goes out of scope regardless of how the child fared.
pub fn run_redirect(line: &str, mode: RedirectMode) -> Result<()> {
    let (args, filename) = split_redirect(line)?;

    let file = match mode {
        RedirectMode::Input => OpenOptions::new().read(true).open(&filename),
        RedirectMode::Overwrite => OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&filename),
        RedirectMode::Append => OpenOptions::new().append(true).create(true).open(&filename),
    }
    .with_context(|| format!("open in run_redirect: {filename}"))?;

    let io_spec = match mode {
        RedirectMode::Input => ChildIo {
            stdin: Some(file.as_raw_fd()),
            ..Default::default()
        },
        RedirectMode::Overwrite | RedirectMode::Append => ChildIo {
            stdout: Some(file.as_raw_fd()),
            ..Default::default()
        },
    };

    let pid = launch(&args, io_spec).context("fork in run_redirect")?;
    wait_status(pid);
    Ok(())
}

/// Background strategy: spawn detached into its own session, push the pid
/// for a later `fore`, and return to the prompt without waiting. A full
/// stack is reported but the process keeps running untracked.
pub fn run_background(line: &str, jobs: &mut JobStack) -> Result<()> {
    let args = split_background(line)?;
    let pid = launch(
        &args,
        ChildIo {
            new_session: true,
            ..Default::default()
        },
    )
    .context("fork in run_background")?;

    if jobs.push(pid).is_err() {
        error_message("Background process stack overflow.");
    }
    println!("Process running in background with PID {pid}");
    Ok(())
}

/// Foreground strategy: recall the most recently backgrounded process and
/// block until it terminates.
pub fn run_foreground(jobs: &mut JobStack) -> Result<()> {
    let Some(pid) = jobs.pop() else {
        bail!("No background process found.");
    };
    wait_status(pid);
    println!("Process {pid} brought to foreground.");
    Ok(())
}

/// Conditional strategy: up to [`MAX_COND_CMDS`] sub-commands joined by
/// `&&`/`||`. An AND separator ends the whole chain when the left side
/// failed; an OR separator skips exactly the next sub-command when the left
/// side succeeded, after which evaluation resumes.
pub fn run_conditional(line: &str) -> Result<()> {
    run_conditional_to(line, &mut io::stdout()).map(|_| ())
}

fn run_conditional_to(line: &str, out: &mut impl Write) -> Result<i32> {
    let (cmds, seps) = split_conditional(line);
    if cmds.len() > MAX_COND_CMDS {
        bail!("Error: Too many commands for conditional execution. Maximum is {MAX_COND_CMDS}.");
    }

    let mut last_status = 0;
    let mut skip_next = false;
    for (i, cmd) in cmds.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }

        last_status = match ArgVec::parse(cmd) {
            Ok(args) => {
                let (status, output) = run_captured(&args)?;
                out.write_all(&output)
                    .context("write in run_conditional")?;
                status
            }
            Err(e) => {
                // Reported here instead of inside a doomed child; the chain
                // sees it as a failure either way.
                error_message(&e.to_string());
                -1
            }
        };

        if i < cmds.len() - 1 {
            match seps[i] {
                Separator::And if last_status != 0 => break,
                Separator::Or if last_status == 0 => skip_next = true,
                _ => {}
            }
        }
    }
    Ok(last_status)
}

/// Spawn one conditional sub-command with stdout and stderr merged into a
/// single pipe back to the parent; reap it, then drain what it wrote. The
/// child is reaped before the pipe is drained, so the captured output is
/// bounded by the kernel pipe buffer; a sub-command writing more than that
/// blocks and is never reaped.
fn run_captured(args: &ArgVec) -> Result<(i32, Vec<u8>)> {
    let (read_fd, write_fd) = create_pipe().context("pipe in run_conditional")?;

    let io_spec = ChildIo {
        stdout: Some(write_fd),
        stderr: Some(write_fd),
        ..Default::default()
    };
    let pid = match launch(args, io_spec) {
        Ok(pid) => pid,
        Err(e) => {
            unsafe {
                close(read_fd);
                close(write_fd);
            }
            return Err(e).context("fork in run_conditional");
        }
    };
    unsafe { close(write_fd) };

    let status = wait_status(pid);
    let mut output = Vec::new();
    let mut reader = unsafe { File::from_raw_fd(read_fd) };
    reader
        .read_to_end(&mut output)
        .context("read in run_conditional")?;
    Ok((status, output))
}
