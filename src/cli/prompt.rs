//! Interactive download confirmation

use std::io::{self, BufRead, Write};

use crate::app::models::MatchedFile;

use super::display::render_table;

/// Answer to the download prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
    List,
}

impl Confirmation {
    /// Parse a response; full words and their first letter are accepted
    pub fn parse(input: &str, allow_list: bool) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "y" | "yes" => Some(Self::Yes),
            "n" | "no" => Some(Self::No),
            "l" | "list" if allow_list => Some(Self::List),
            _ => None,
        }
    }
}

/// Ask on stdin/stdout whether to download `matches`
pub fn confirm_download(matches: &[MatchedFile<'_>]) -> io::Result<bool> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    confirm_with(&mut input, &mut output, matches)
}

/// Prompt until a valid answer is given; end of input counts as no
///
/// Choosing list prints the table and asks again without the list option.
pub fn confirm_with<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    matches: &[MatchedFile<'_>],
) -> io::Result<bool> {
    match ask(input, output, "\nProceed with download? [(y)es|(n)o|(l)ist]: ", true)? {
        Some(Confirmation::Yes) => Ok(true),
        Some(Confirmation::List) => {
            write!(output, "{}", render_table(matches))?;
            let answer = ask(input, output, "\nProceed with download? [(y)es|(n)o]: ", false)?;
            Ok(answer == Some(Confirmation::Yes))
        }
        Some(Confirmation::No) | None => Ok(false),
    }
}

fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    allow_list: bool,
) -> io::Result<Option<Confirmation>> {
    loop {
        write!(output, "{prompt}")?;
        output.flush()?;

        let mut response = String::new();
        if input.read_line(&mut response)? == 0 {
            return Ok(None);
        }

        if let Some(answer) = Confirmation::parse(&response, allow_list) {
            return Ok(Some(answer));
        }
    }
}
