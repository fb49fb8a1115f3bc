use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{Candidate, UserRequest};

pub const REQUEST_PROMPT: &str = "What kind of story do you want to hear? ";

/// Read an existing story to be judged
pub fn read_story_file(path: &Path) -> Result<Candidate> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    if text.trim().is_empty() {
        anyhow::bail!("Story file is empty: {:?}", path);
    }
    Ok(Candidate::new(text))
}

/// Ask for a story request on `output` and read one line from `input`
pub fn prompt_for_request<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<UserRequest> {
    write!(output, "{}", REQUEST_PROMPT)?;
    output.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read story request")?;

    let request = line.trim_end_matches(['\n', '\r']);
    UserRequest::new(request).context("A story request is required")
}
