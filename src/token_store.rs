//! Caches one access token per work directory.
//!
//! The file is `<work_dir>/auth` in `java.util.Properties` syntax.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::Local;
use tracing::{debug, info};

use crate::TokenPair;

pub const TOKEN_FILE_NAME: &str = "auth";
pub const ACCESS_TOKEN_KEY: &str = "twitter.oauth.accessToken";
pub const ACCESS_TOKEN_SECRET_KEY: &str = "twitter.oauth.accessTokenSecret";
const HEADER: &str = "Twitter access token";

#[derive(Debug, Clone)]
pub struct TokenStore {
    dir: PathBuf,
}

impl TokenStore {
    pub fn new<P: Into<PathBuf>>(work_dir: P) -> Self {
        TokenStore {
            dir: work_dir.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE_NAME)
    }

    /// Reads the cached pair. Any problem reading or parsing is a miss.
    pub fn load(&self) -> Option<TokenPair> {
        let path = self.path();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no cached access token");
                return None;
            }
        };
        let mut properties = parse_properties(&text);
        match (
            properties.remove(ACCESS_TOKEN_KEY),
            properties.remove(ACCESS_TOKEN_SECRET_KEY),
        ) {
            (Some(token), Some(secret)) if !token.is_empty() && !secret.is_empty() => {
                Some(TokenPair::new(token, secret))
            }
            _ => {
                debug!(path = %path.display(), "cached access token is incomplete");
                None
            }
        }
    }

    /// Overwrites the cache with `token`, creating the work directory if needed.
    pub fn save(&self, token: &TokenPair) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut text = String::new();
        text.push_str(&format!("#{}\n", HEADER));
        text.push_str(&format!(
            "#{}\n",
            Local::now().format("%a %b %d %H:%M:%S %Z %Y")
        ));
        for (key, value) in [
            (ACCESS_TOKEN_KEY, token.token.as_str()),
            (ACCESS_TOKEN_SECRET_KEY, token.secret.as_str()),
        ] {
            text.push_str(&escape(key, true));
            text.push('=');
            text.push_str(&escape(value, false));
            text.push('\n');
        }
        let path = self.path();
        fs::write(&path, text)?;
        info!(path = %path.display(), "wrote access token to work directory");
        Ok(())
    }
}

fn parse_properties(text: &str) -> HashMap<String, String> {
    logical_lines(text)
        .into_iter()
        .map(|line| split_entry(&line))
        .collect()
}

/// Joins continuation lines (odd number of trailing backslashes) and drops
/// blanks and comments.
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;
    for raw in text.lines() {
        let line = raw.trim_start();
        let mut current = match pending.take() {
            Some(prefix) => prefix,
            None => {
                if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                    continue;
                }
                String::new()
            }
        };
        let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
        if trailing % 2 == 1 {
            current.push_str(&line[..line.len() - 1]);
            pending = Some(current);
        } else {
            current.push_str(line);
            lines.push(current);
        }
    }
    if let Some(rest) = pending {
        lines.push(rest);
    }
    lines
}

fn split_entry(line: &str) -> (String, String) {
    let mut key_end = line.len();
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || c.is_whitespace() {
            key_end = i;
            break;
        }
    }
    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start();
    if rest.starts_with('=') || rest.starts_with(':') {
        rest = rest[1..].trim_start();
    }
    (unescape(key), unescape(rest))
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => out.push_str(&hex),
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn escape(s: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{c}' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod test {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("twitter"));
        let token = TokenPair::new("AT", "ATS");
        store.save(&token).unwrap();
        assert_eq!(store.load(), Some(token));
    }

    #[test]
    fn save_escapes_separators() {
        let dir = tempdir().unwrap();
        let store = TokenStore::new(dir.path());
        let token = TokenPair::new("12-ab=cd:ef", " lead\\ing #x");
        store.save(&token).unwrap();
        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with("#Twitter access token\n"));
        assert!(text.contains("twitter.oauth.accessToken=12-ab\\=cd\\:ef\n"));
        assert_eq!(store.load(), Some(token));
    }

    #[test]
    fn whitespace_token_survives_the_file() {
        let dir = tempdir().unwrap();
        let store = TokenStore::new(dir.path());
        for token in [TokenPair::new(" ", "ATS"), TokenPair::new("AT", "\t")] {
            store.save(&token).unwrap();
            assert_eq!(store.load(), Some(token));
        }
    }

    #[test]
    fn empty_value_is_a_miss() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(TOKEN_FILE_NAME),
            "twitter.oauth.accessToken=AT\ntwitter.oauth.accessTokenSecret=\n",
        )
        .unwrap();
        assert_eq!(TokenStore::new(dir.path()).load(), None);
    }

    #[test]
    fn save_overwrites_previous_token() {
        let dir = tempdir().unwrap();
        let store = TokenStore::new(dir.path());
        store.save(&TokenPair::new("old", "old-secret")).unwrap();
        store.save(&TokenPair::new("new", "new-secret")).unwrap();
        assert_eq!(store.load(), Some(TokenPair::new("new", "new-secret")));
    }

    #[test]
    fn missing_file_is_a_miss() {
        let dir = tempdir().unwrap();
        assert_eq!(TokenStore::new(dir.path()).load(), None);
    }

    #[test]
    fn incomplete_file_is_a_miss() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(TOKEN_FILE_NAME),
            "twitter.oauth.accessToken=AT\n",
        )
        .unwrap();
        assert_eq!(TokenStore::new(dir.path()).load(), None);
    }

    #[test]
    fn unreadable_file_is_a_miss() {
        let dir = tempdir().unwrap();
        // a directory in place of the file cannot be read as text
        fs::create_dir(dir.path().join(TOKEN_FILE_NAME)).unwrap();
        assert_eq!(TokenStore::new(dir.path()).load(), None);
    }

    #[test]
    fn reads_java_properties_conventions() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(TOKEN_FILE_NAME),
            "#Twitter access token\n\
             ! written by hand\n\
             \n\
             twitter.oauth.accessToken : 6253282-\\\n    abc\n\
             twitter.oauth.accessTokenSecret   s\\u0065cret\n",
        )
        .unwrap();
        assert_eq!(
            TokenStore::new(dir.path()).load(),
            Some(TokenPair::new("6253282-abc", "secret"))
        );
    }

    #[test]
    fn save_into_unwritable_location_fails() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let store = TokenStore::new(blocker.join("twitter"));
        assert!(store.save(&TokenPair::new("AT", "ATS")).is_err());
    }
}
