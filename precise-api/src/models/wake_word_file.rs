use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct FileLocation {
    pub server: String,
    pub directory: String,
}

/// A wake word sample that still needs at least one tag.
///
/// `designations` holds the tag ids already applied to the file. A `None`
/// entry means the file has never been tagged.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct TaggableFile {
    pub id: String,
    pub name: String,
    #[sqlx(flatten)]
    pub location: FileLocation,
    pub designations: Vec<Option<String>>,
}

impl TaggableFile {
    pub fn needs_wake_word_tag(&self) -> bool {
        self.designations.is_empty() || self.designations.iter().any(Option::is_none)
    }

    pub fn designated_tag_ids(&self) -> HashSet<&str> {
        self.designations.iter().flatten().map(String::as_str).collect()
    }

    pub fn remote_path(&self) -> PathBuf {
        PathBuf::from(&self.location.directory).join(&self.name)
    }
}

/// Whether a file may be offered for tagging at `now`.
///
/// The selection query applies the same rule in SQL.
pub fn is_taggable(
    designations: &[Option<String>],
    last_tagged_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    cooldown: Duration,
    tag_count: usize,
) -> bool {
    if let Some(tagged_at) = last_tagged_at {
        if now - tagged_at < cooldown {
            return false;
        }
    }

    let applied: HashSet<&str> = designations.iter().flatten().map(String::as_str).collect();
    applied.len() < tag_count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn designations(ids: &[&str]) -> Vec<Option<String>> {
        ids.iter().map(|id| Some(id.to_string())).collect()
    }

    #[test]
    fn test_untagged_file_needs_wake_word_tag() {
        let file = TaggableFile {
            id: "f1".to_string(),
            name: "sample.wav".to_string(),
            location: FileLocation {
                server: "10.0.0.1".to_string(),
                directory: "/opt/selene/data".to_string(),
            },
            designations: vec![None],
        };

        assert!(file.needs_wake_word_tag());
        assert!(file.designated_tag_ids().is_empty());
        assert_eq!(
            file.remote_path(),
            PathBuf::from("/opt/selene/data/sample.wav")
        );
    }

    #[test]
    fn test_cooldown_window_excludes_recent_files() {
        let now = Utc::now();
        let cooldown = Duration::hours(1);

        for minutes_ago in [0, 1, 30, 59] {
            let tagged_at = Some(now - Duration::minutes(minutes_ago));
            assert!(
                !is_taggable(&designations(&["a"]), tagged_at, now, cooldown, 3),
                "file tagged {} minutes ago was offered",
                minutes_ago
            );
        }

        for minutes_ago in [60, 61, 240] {
            let tagged_at = Some(now - Duration::minutes(minutes_ago));
            assert!(is_taggable(&designations(&["a"]), tagged_at, now, cooldown, 3));
        }
    }

    #[test]
    fn test_fully_tagged_file_is_never_taggable() {
        let now = Utc::now();
        let long_ago = Some(now - Duration::days(30));

        assert!(!is_taggable(
            &designations(&["a", "b", "c"]),
            long_ago,
            now,
            Duration::hours(1),
            3
        ));
        // duplicate designations do not count twice
        assert!(is_taggable(
            &designations(&["a", "a", "b"]),
            long_ago,
            now,
            Duration::hours(1),
            3
        ));
    }

    #[test]
    fn test_never_tagged_file_is_taggable() {
        assert!(is_taggable(&[None], None, Utc::now(), Duration::hours(1), 3));
    }
}
