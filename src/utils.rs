use nu_ansi_term::Color;

/// Report a user-visible error in bold red, the way every diagnostic of this
/// interpreter is surfaced.
pub fn error_message(msg: &str) {
    println!("{}", Color::Red.bold().paint(msg));
}
