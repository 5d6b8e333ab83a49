//! JSON-lines message input.

use std::io::{BufRead, BufReader};
use std::sync::Arc;

use anyhow::Context;
use floodlens_message::Message;
use floodlens_text::Pattern;

/// Reads one message per non-blank line of `path`.
pub fn read_messages(path: &str) -> anyhow::Result<Vec<Arc<Message>>> {
    let file = std::fs::File::open(path).with_context(|| format!("failed to open {path}"))?;
    let mut messages = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let msg: Message =
            serde_json::from_str(&line).with_context(|| format!("{path}:{}: invalid message", i + 1))?;
        messages.push(Arc::new(msg));
    }
    Ok(messages)
}

/// Drops all-clear bulletins such as "0 Flood Warnings in force".
pub fn drop_false_alarms(messages: Vec<Arc<Message>>) -> Vec<Arc<Message>> {
    let before = messages.len();
    let kept: Vec<_> = messages
        .into_iter()
        .filter(|m| !Pattern::FalseAlarm.exists(&m.text))
        .collect();
    if kept.len() < before {
        tracing::info!(dropped = before - kept.len(), "dropped false alarms");
    }
    kept
}

/// Reads a word list file, one entry per line.
pub fn read_word_list(path: &str) -> anyhow::Result<floodlens_jenks::WordList> {
    let content = std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    Ok(floodlens_jenks::WordList::parse(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use floodlens_jenks::Matcher;
    use std::io::Write;

    #[test]
    fn test_reads_json_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"id":"1","text":"Water rising","date":"2024-01-01T10:00:00Z","username":"a","keywords":["flood"],"language":"English"}}"#
        )
        .unwrap();
        writeln!(file).unwrap();
        writeln!(
            file,
            r#"{{"id":"2","text":"0 Flood Warnings in force","date":"2024-01-01T11:00:00Z","username":"b"}}"#
        )
        .unwrap();

        let messages = read_messages(file.path().to_str().unwrap()).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].keywords, vec!["flood"]);
        assert_eq!(messages[1].language, "mixed");

        let kept = drop_false_alarms(messages);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "1");
    }

    #[test]
    fn test_reports_bad_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not json").unwrap();
        let err = read_messages(file.path().to_str().unwrap()).unwrap_err();
        assert!(format!("{err:#}").contains(":1: invalid message"));
    }

    #[test]
    fn test_word_list_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# news accounts\nnos\nomroep").unwrap();
        let list = read_word_list(file.path().to_str().unwrap()).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.matches("omroepwest"));
    }
}
