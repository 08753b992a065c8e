use crate::error::{Result, WordhuntError};
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// The word being searched for, lowercased once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchWord(String);

impl SearchWord {
    pub fn new(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(WordhuntError::config("search word must not be empty"));
        }
        Ok(SearchWord(fold_case(raw)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercases `s` one character at a time.
///
/// Unlike `str::to_lowercase` this ignores context (a final capital sigma
/// folds to `σ` like any other), so a word and a line containing it always
/// fold the same way.
pub fn fold_case(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

/// Counts case-insensitive, non-overlapping occurrences of `word` in `line`.
///
/// The scan runs left to right and resumes right after each match, so
/// `count_occurrences("aaaa", "aa")` is 2.
pub fn count_occurrences(line: &str, word: &str) -> usize {
    count_normalized(&fold_case(line), &fold_case(word))
}

/// Same as [`count_occurrences`] for input already passed through [`fold_case`].
pub fn count_normalized(line: &str, word: &str) -> usize {
    if word.is_empty() {
        return 0;
    }
    line.matches(word).count()
}

/// Scans `path` line by line and returns the number of occurrences of `word`.
///
/// Lines are decoded lossily so files with stray non-UTF-8 bytes are still
/// searched. Any I/O error, at open time or part-way through, fails the whole
/// file.
pub fn scan_file(path: &Path, word: &SearchWord) -> Result<u64> {
    let wrap = |source: io::Error| WordhuntError::FileProcessing {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(wrap)?;
    let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);
    let mut buf = Vec::new();
    let mut total = 0u64;

    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf).map_err(wrap)?;
        if n == 0 {
            break;
        }
        let line = fold_case(&String::from_utf8_lossy(&buf));
        total += count_normalized(&line, word.as_str()) as u64;
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_non_overlapping_matches() {
        assert_eq!(count_occurrences("aaaa", "aa"), 2);
        assert_eq!(count_occurrences("aaa", "aa"), 1);
        assert_eq!(count_occurrences("abab", "ab"), 2);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(count_occurrences("Foo foo FOO", "foo"), 3);
        assert_eq!(count_occurrences("foo", "FOO"), 1);
        assert_eq!(count_occurrences("bar", "foo"), 0);
    }

    #[test]
    fn test_substring_matches_count() {
        // Plain substring semantics, not whole-word.
        assert_eq!(count_occurrences("football foo", "foo"), 2);
    }

    #[test]
    fn test_final_sigma_folds_like_any_sigma() {
        assert_eq!(count_occurrences("ΟΔΟΣ", "Σ"), 1);
        assert_eq!(count_occurrences("ΟΔΟΣΟΔΟΣ", "ΟΔΟΣ"), 2);
        assert_eq!(SearchWord::new("ΟΔΟΣ").unwrap().as_str(), "οδοσ");
    }

    #[test]
    fn test_scan_file_folds_greek_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("greek.txt");
        fs::write(&path, "ΟΔΟΣΟΔΟΣ
οδοσ ΟΔΟΣ
").unwrap();

        let word = SearchWord::new("ΟΔΟΣ").unwrap();
        assert_eq!(scan_file(&path, &word).unwrap(), 4);
    }

    #[test]
    fn test_empty_word_counts_nothing() {
        assert_eq!(count_normalized("anything", ""), 0);
    }

    #[test]
    fn test_search_word_normalized_once() {
        let word = SearchWord::new("HeLLo").unwrap();
        assert_eq!(word.as_str(), "hello");
        assert!(SearchWord::new("").is_err());
    }

    #[test]
    fn test_scan_file_counts_across_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "Foo foo\nno match here\nFOO\n").unwrap();

        let word = SearchWord::new("foo").unwrap();
        assert_eq!(scan_file(&path, &word).unwrap(), 3);
    }

    #[test]
    fn test_scan_file_without_trailing_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "foo\nfoo").unwrap();

        let word = SearchWord::new("foo").unwrap();
        assert_eq!(scan_file(&path, &word).unwrap(), 2);
    }

    #[test]
    fn test_scan_file_tolerates_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        fs::write(&path, b"caf\xe9 foo\n\xff\xfefoo\n").unwrap();

        let word = SearchWord::new("foo").unwrap();
        assert_eq!(scan_file(&path, &word).unwrap(), 2);
    }

    #[test]
    fn test_scan_missing_file_is_error() {
        let dir = tempdir().unwrap();
        let word = SearchWord::new("foo").unwrap();
        let err = scan_file(&dir.path().join("gone.txt"), &word).unwrap_err();
        assert!(matches!(err, WordhuntError::FileProcessing { .. }));
    }
}
