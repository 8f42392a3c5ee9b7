use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::MetadataError;

/// File written by the scanner into its working directory after uploading a report.
pub const REPORT_TASK_FILE: &str = "report-task.txt";

pub const TASK_ID_KEY: &str = "ceTaskId";
pub const SERVER_URL_KEY: &str = "serverUrl";
pub const PROJECT_KEY_KEY: &str = "projectKey";
pub const DASHBOARD_URL_KEY: &str = "dashboardUrl";

/// Key/value content of the report-task file. Always carries a task id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskMetadata {
    props: BTreeMap<String, String>,
}

impl TaskMetadata {
    pub fn default_path(work_dir: &Path) -> PathBuf {
        work_dir.join(REPORT_TASK_FILE)
    }

    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        let s = std::fs::read_to_string(path)?;
        Self::parse(&s)
    }

    pub fn parse(input: &str) -> Result<Self, MetadataError> {
        let props = parse_properties(input)?;
        match props.get(TASK_ID_KEY) {
            Some(id) if !id.is_empty() => Ok(Self { props }),
            _ => Err(MetadataError::MissingKey(TASK_ID_KEY)),
        }
    }

    pub fn task_id(&self) -> &str {
        // presence checked in parse()
        self.props.get(TASK_ID_KEY).map(String::as_str).unwrap_or_default()
    }

    pub fn server_url(&self) -> Option<&str> {
        self.get(SERVER_URL_KEY)
    }

    pub fn project_key(&self) -> Option<&str> {
        self.get(PROJECT_KEY_KEY)
    }

    pub fn dashboard_url(&self) -> Option<&str> {
        self.get(DASHBOARD_URL_KEY)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.props.get(key).map(String::as_str)
    }
}

/// Parses the subset of the Java properties format the scanner emits:
/// `key=value`, `key: value` and `key value` lines, `#`/`!` comments,
/// backslash line continuations and backslash escapes.
fn parse_properties(input: &str) -> Result<BTreeMap<String, String>, MetadataError> {
    let mut props = BTreeMap::new();
    let mut lines = input.lines().enumerate();

    while let Some((idx, raw)) = lines.next() {
        let mut logical = raw.trim_start().to_string();
        if logical.is_empty() || logical.starts_with('#') || logical.starts_with('!') {
            continue;
        }
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let (key, value) = split_entry(&logical);
        if key.is_empty() {
            return Err(MetadataError::Parse {
                line: idx + 1,
                reason: "entry has an empty key".into(),
            });
        }
        let parse_err = |reason| MetadataError::Parse {
            line: idx + 1,
            reason,
        };
        props.insert(unescape(key).map_err(parse_err)?, unescape(value).map_err(parse_err)?);
    }

    Ok(props)
}

fn ends_with_continuation(line: &str) -> bool {
    let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
    trailing % 2 == 1
}

fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (i, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '=' | ':' => return (&line[..i], line[i + 1..].trim_start()),
            c if c.is_whitespace() => {
                let rest = line[i..].trim_start();
                let rest = rest
                    .strip_prefix(|c: char| c == '=' || c == ':')
                    .map(str::trim_start)
                    .unwrap_or(rest);
                return (&line[..i], rest);
            }
            _ => {}
        }
    }
    (line, "")
}

fn unescape(s: &str) -> Result<String, String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => out.push(unicode_escape(&mut chars)?),
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

/// Decodes the four hex digits following `\u`.
fn unicode_escape(chars: &mut std::str::Chars<'_>) -> Result<char, String> {
    let digits: String = chars.by_ref().take(4).collect();
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!("malformed unicode escape \\u{digits}"));
    }
    u32::from_str_radix(&digits, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| format!("malformed unicode escape \\u{digits}"))
}
