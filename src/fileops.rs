use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::Path,
};

use anyhow::{Context, Result, bail};

use crate::parse::split_on;

pub const MAX_CAT_FILES: usize = 4;

const MISSING_FILE: &str = "File does not exist or is not accessible.";

/// Word-count utility (`#filename`): count whitespace-delimited words by
/// scanning the file's bytes.
pub fn count_words(filename: &str) -> Result<()> {
    let filename = filename.trim_start();
    if !Path::new(filename).exists() {
        bail!(MISSING_FILE);
    }
    let file = File::open(filename).context("open in count_words")?;
    let words = count_words_in(BufReader::new(file))?;
    println!("Word count: {words}");
    Ok(())
}

fn count_words_in(mut reader: impl BufRead) -> Result<usize> {
    let mut words = 0;
    let mut in_word = false;
    loop {
        let buf = reader.fill_buf().context("read in count_words")?;
        if buf.is_empty() {
            break;
        }
        for &byte in buf {
            if byte.is_ascii_whitespace() {
                in_word = false;
            } else if !in_word {
                in_word = true;
                words += 1;
            }
        }
        let consumed = buf.len();
        reader.consume(consumed);
    }
    Ok(words)
}

/// Concatenation utility (`a.txt ~ b.txt ...`): every file must carry the
/// `.txt` extension and exist before a single byte is written, then each is
/// streamed to stdout in argument order.
pub fn concatenate(line: &str) -> Result<()> {
    concatenate_to(line, &mut io::stdout())
}

fn concatenate_to(line: &str, out: &mut impl Write) -> Result<()> {
    let files = split_on(line, '~');
    if files.len() > MAX_CAT_FILES {
        bail!("Error: Too many files for concatenation. Maximum is {MAX_CAT_FILES}.");
    }

    for file in &files {
        if !file.ends_with(".txt") {
            bail!("Error: File is not a .txt file.");
        }
        if !Path::new(file).exists() {
            bail!("Error: {MISSING_FILE}");
        }
    }

    for file in &files {
        let mut reader = File::open(file).context("open in concatenate")?;
        io::copy(&mut reader, out).context("write in concatenate")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn counts_whitespace_delimited_words() {
        assert_eq!(count_words_in(&b""[..]).unwrap(), 0);
        assert_eq!(count_words_in(&b"one"[..]).unwrap(), 1);
        assert_eq!(count_words_in(&b"  one\ttwo\nthree  "[..]).unwrap(), 3);
        assert_eq!(count_words_in(&b"\n\n\t  \n"[..]).unwrap(), 0);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = count_words("no-such-file-anywhere.txt").unwrap_err();
        assert_eq!(err.to_string(), MISSING_FILE);
    }

    #[test]
    fn concatenates_in_argument_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "alpha\n").unwrap();
        fs::write(&b, "beta\n").unwrap();

        let mut out: Vec<u8> = Vec::new();
        concatenate_to(&format!("{} ~ {}", a.display(), b.display()), &mut out).unwrap();
        assert_eq!(out, b"alpha\nbeta\n");
    }

    #[test]
    fn rejects_non_txt_before_any_output() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.txt");
        let bad = dir.path().join("bad.log");
        fs::write(&good, "good\n").unwrap();
        fs::write(&bad, "bad\n").unwrap();

        let mut out: Vec<u8> = Vec::new();
        let err = concatenate_to(&format!("{} ~ {}", good.display(), bad.display()), &mut out)
            .unwrap_err();
        assert!(err.to_string().contains("not a .txt file"));
        assert!(out.is_empty());
    }

    #[test]
    fn rejects_missing_file_before_any_output() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.txt");
        fs::write(&good, "good\n").unwrap();
        let missing = dir.path().join("missing.txt");

        let mut out: Vec<u8> = Vec::new();
        let err = concatenate_to(&format!("{} ~ {}", good.display(), missing.display()), &mut out)
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
        assert!(out.is_empty());
    }

    #[test]
    fn concatenation_cap_is_four() {
        let err = concatenate_to("a.txt ~ b.txt ~ c.txt ~ d.txt ~ e.txt", &mut Vec::<u8>::new())
            .unwrap_err();
        assert!(err.to_string().contains("Too many files"));
    }
}
