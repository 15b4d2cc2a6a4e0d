//! Command channel tokens
//!
//! Consumers steer playback with newline-terminated ASCII tokens. Unknown
//! tokens are not an error: the server ignores them so old clients and new
//! servers can coexist.

/// A playback-control command sent from a consumer to the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Resume playback
    Play,
    /// Hold the current position
    Pause,
    /// Step the tracked cursor back by the seek step
    Rewind,
    /// Step the tracked cursor forward by the seek step
    FastForward,
}

impl Command {
    /// Wire token for this command
    pub fn as_token(&self) -> &'static str {
        match self {
            Command::Play => "play",
            Command::Pause => "pause",
            Command::Rewind => "rewind",
            Command::FastForward => "fast-forward",
        }
    }

    /// Parse one line from the command channel
    ///
    /// Surrounding whitespace is tolerated. Returns `None` for unrecognized
    /// tokens, which callers ignore.
    pub fn parse(line: &str) -> Option<Command> {
        match line.trim() {
            "play" => Some(Command::Play),
            "pause" => Some(Command::Pause),
            "rewind" => Some(Command::Rewind),
            "fast-forward" => Some(Command::FastForward),
            _ => None,
        }
    }

    /// Encode this command as a newline-terminated wire line
    pub fn encode(&self) -> String {
        let mut line = String::with_capacity(self.as_token().len() + 1);
        line.push_str(self.as_token());
        line.push('\n');
        line
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_tokens() {
        assert_eq!(Command::parse("play"), Some(Command::Play));
        assert_eq!(Command::parse("pause"), Some(Command::Pause));
        assert_eq!(Command::parse("rewind"), Some(Command::Rewind));
        assert_eq!(Command::parse("fast-forward"), Some(Command::FastForward));
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        assert_eq!(Command::parse("  pause \r"), Some(Command::Pause));
        assert_eq!(Command::parse("play\n"), Some(Command::Play));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(Command::parse("stop"), None);
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("PLAY"), None);
    }

    #[test]
    fn test_encode_roundtrip() {
        for cmd in [
            Command::Play,
            Command::Pause,
            Command::Rewind,
            Command::FastForward,
        ] {
            let line = cmd.encode();
            assert!(line.ends_with('\n'));
            assert_eq!(Command::parse(&line), Some(cmd));
        }
    }
}
