//! Splits a raw input line into a [`CommandRequest`].
//!
//! Tokens are the literal whitespace-delimited substrings of the line; no
//! quoting, escaping, or globbing is performed. Four control tokens are
//! consumed out of the argument stream: `&` (background), `<` and `>`
//! (the following token becomes the redirection path), and `|` (marks
//! where the second pipeline stage begins).

/// One parsed input line, consumed by the dispatcher and then discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandRequest {
    pub args: Vec<String>,
    pub infile: Option<String>,
    pub outfile: Option<String>,
    pub background: bool,
    pub pipe_split: Option<usize>,
}

impl CommandRequest {
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Argument vector of the first (or only) pipeline stage.
    pub fn first_stage(&self) -> &[String] {
        match self.pipe_split {
            Some(split) => &self.args[..split],
            None => &self.args,
        }
    }

    /// Argument vector of the second pipeline stage, if the line had a pipe.
    pub fn second_stage(&self) -> Option<&[String]> {
        self.pipe_split.map(|split| &self.args[split..])
    }

    pub fn command_name(&self) -> Option<&str> {
        self.args.first().map(|s| s.as_str())
    }

    /// True when the request cannot be satisfied in-process: any
    /// redirection, pipe, or background flag forces a child process.
    pub fn needs_process(&self) -> bool {
        self.background
            || self.infile.is_some()
            || self.outfile.is_some()
            || self.pipe_split.is_some()
    }
}

/// Tokenizes a line into a request. A blank line yields an empty request.
///
/// Only the first `|` takes effect, and its split index is committed only
/// once a second-stage token actually follows, so both stage vectors are
/// non-empty whenever `pipe_split` is set. A `<` or `>` with no following
/// token leaves the corresponding path unset.
pub fn tokenize(line: &str) -> CommandRequest {
    let mut request = CommandRequest::default();
    let mut tokens = line.split_whitespace();
    let mut pipe_pending = false;

    while let Some(token) = tokens.next() {
        match token {
            "&" => request.background = true,
            "<" => request.infile = tokens.next().map(str::to_string),
            ">" => request.outfile = tokens.next().map(str::to_string),
            "|" => {
                if !request.args.is_empty() && request.pipe_split.is_none() {
                    pipe_pending = true;
                }
            }
            arg => {
                if pipe_pending {
                    request.pipe_split = Some(request.args.len());
                    pipe_pending = false;
                }
                request.args.push(arg.to_string());
            }
        }
    }

    request
}
