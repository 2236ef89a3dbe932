/// Static usage text for the `help` keyword.
pub fn help() -> String {
    "\
Usage of minibash:
1. Normal Commands: Command with up to 4 arguments.
2. Special Commands: dter - Exit minibash. help - Print this help information.
3. Background Processes: Command ending with + to run in background. fore - Bring last background process to foreground.
4. Input/Output Redirection: < for input redirection. > for output redirection (overwrite). >> for output redirection (append).
5. Piping: Use | to pipe up to 4 commands.
6. Sequential Execution: Use ; to separate up to 4 commands.
7. Conditional Execution: Use && for AND and || for OR with up to 4 commands.
8. Word Count in File: Use # followed by filename.
9. Concatenate Files: Use ~ to concatenate up to 4 files."
        .to_string()
}
