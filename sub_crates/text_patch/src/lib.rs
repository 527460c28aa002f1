//! Bounded in-place substitution for plain-text files.
//!
//! A [`Substitution`] replaces up to `max_substitutions` occurrences of a
//! pattern within the first `line_ceiling` lines of a file.  Lines outside
//! the matched region are preserved byte for byte, including their line
//! terminators, and the rewrite is applied by renaming a finished temporary
//! file over the original, so the target is never observable in a
//! half-written state.  Permission bits carry over to the replacement.

use std::{
    fs::File,
    io::{BufRead, BufReader, Write},
    path::Path,
};

use regex::Regex;

#[derive(Debug)]
#[non_exhaustive]
pub enum PatchError {
    Io(std::io::Error),
}

impl std::error::Error for PatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PatchError::Io(ref e) => Some(e),
        }
    }
}

impl std::fmt::Display for PatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatchError::Io(e) => e.fmt(f),
        }
    }
}

impl From<std::io::Error> for PatchError {
    fn from(other: std::io::Error) -> Self {
        Self::Io(other)
    }
}

/// What to search for.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// An exact substring.
    Literal(String),
    /// A regular expression.  The replacement is still taken literally.
    Regex(Regex),
}

impl Pattern {
    pub fn literal(text: &str) -> Pattern {
        Pattern::Literal(text.into())
    }

    pub fn regex(pattern: &str) -> Result<Pattern, regex::Error> {
        Ok(Pattern::Regex(Regex::new(pattern)?))
    }

    /// Replaces up to `limit` occurrences in `text`, left to right.
    ///
    /// Returns the rewritten text and the number of occurrences replaced.
    /// Substitutions that leave the text unchanged count as zero: budget is
    /// only spent on lines that actually change.
    fn replace_up_to(&self, text: &str, replacement: &str, limit: usize) -> (String, usize) {
        let (new_text, count) = match self {
            Pattern::Literal(needle) => {
                if needle.is_empty() {
                    return (text.into(), 0);
                }
                let count = text.matches(needle.as_str()).take(limit).count();
                (text.replacen(needle.as_str(), replacement, limit), count)
            }
            Pattern::Regex(re) => {
                let count = re.find_iter(text).take(limit).count();
                (
                    re.replacen(text, limit, regex::NoExpand(replacement))
                        .into_owned(),
                    count,
                )
            }
        };

        if new_text == text {
            (new_text, 0)
        } else {
            (new_text, count)
        }
    }
}

/// One patch directive, consumed by [`patch_file`].
#[derive(Debug, Clone)]
pub struct Substitution {
    pub pattern: Pattern,
    pub replacement: String,

    /// 0-based line index at and past which no substitution is attempted.
    pub line_ceiling: usize,

    /// Maximum number of occurrences to replace.
    pub max_substitutions: usize,
}

/// Applies `sub` to the file at `path` and returns the number of
/// occurrences replaced.
///
/// An unmatched pattern is not an error: the file is rewritten unchanged
/// and 0 is returned.  A nonexistent or unreadable path surfaces as
/// [`PatchError::Io`] before anything is written.
pub fn patch_file<P: AsRef<Path>>(path: P, sub: &Substitution) -> Result<usize, PatchError> {
    let path = path.as_ref();

    let src = File::open(path)?;
    let permissions = src.metadata()?.permissions();

    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = tempfile::NamedTempFile::new_in(dir.unwrap_or_else(|| Path::new(".")))?;

    let mut reader = BufReader::new(src);
    let mut remaining = sub.max_substitutions;
    let mut total = 0;
    let mut index = 0;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        if index < sub.line_ceiling && remaining > 0 {
            // Split the terminator off so substitutions can't touch it.
            let term_len = if buf.ends_with(b"\r\n") {
                2
            } else if buf.ends_with(b"\n") {
                1
            } else {
                0
            };
            let (content, term) = buf.split_at(buf.len() - term_len);

            // Lines that aren't UTF-8 can't match and are copied verbatim.
            if let Ok(text) = std::str::from_utf8(content) {
                let (new_text, count) =
                    sub.pattern
                        .replace_up_to(text, &sub.replacement, remaining);
                if count > 0 {
                    remaining -= count;
                    total += count;
                    tmp.write_all(new_text.as_bytes())?;
                    tmp.write_all(term)?;
                    index += 1;
                    continue;
                }
            }
        }

        tmp.write_all(&buf)?;
        index += 1;
    }

    tmp.flush()?;
    tmp.as_file().set_permissions(permissions)?;

    // Rename over the original.  Unlike a delete-then-rename sequence this
    // leaves no window in which the file is missing.
    tmp.persist(path).map_err(|e| PatchError::Io(e.error))?;

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{fs, path::PathBuf};

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn sub(pattern: Pattern, replacement: &str, ceiling: usize, budget: usize) -> Substitution {
        Substitution {
            pattern,
            replacement: replacement.into(),
            line_ceiling: ceiling,
            max_substitutions: budget,
        }
    }

    #[test]
    fn replaces_first_match_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.txt", "one\ntool_path = \"\"\ntool_path = \"\"\n");

        let n = patch_file(
            &path,
            &sub(
                Pattern::literal("tool_path = \"\""),
                "tool_path = \"C:/tool/app.exe\"",
                usize::MAX,
                1,
            ),
        )
        .unwrap();

        assert_eq!(n, 1);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "one\ntool_path = \"C:/tool/app.exe\"\ntool_path = \"\"\n"
        );
    }

    #[test]
    fn regex_pattern_with_literal_replacement() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.cfg", "port = 80\nname = x\n");

        let n = patch_file(
            &path,
            &sub(
                Pattern::regex("port = .*").unwrap(),
                "port = $PORT",
                usize::MAX,
                1,
            ),
        )
        .unwrap();

        assert_eq!(n, 1);
        // `$PORT` must not be treated as a capture-group reference.
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "port = $PORT\nname = x\n"
        );
    }

    #[test]
    fn idempotent_when_target_already_matches() {
        let dir = tempfile::tempdir().unwrap();
        let original = "a\ntool = \"x\"\nb\n";
        let path = write_file(&dir, "a.txt", original);

        let n = patch_file(
            &path,
            &sub(
                Pattern::regex("tool = \".*\"").unwrap(),
                "tool = \"x\"",
                usize::MAX,
                1,
            ),
        )
        .unwrap();

        assert_eq!(n, 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn lines_at_or_past_the_ceiling_are_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.txt", "x\nx\nx\nx\n");

        let n = patch_file(&path, &sub(Pattern::literal("x"), "y", 2, 10)).unwrap();

        assert_eq!(n, 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "y\ny\nx\nx\n");
    }

    #[test]
    fn budget_bounds_the_occurrence_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.txt", "x x x\nx\n");

        // Pattern occurs 4 times, budget 3: earliest 3 replaced.
        let n = patch_file(&path, &sub(Pattern::literal("x"), "y", usize::MAX, 3)).unwrap();

        assert_eq!(n, 3);
        assert_eq!(fs::read_to_string(&path).unwrap(), "y y y\nx\n");
    }

    #[test]
    fn budget_larger_than_match_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.txt", "x\nno match\n");

        let n = patch_file(&path, &sub(Pattern::literal("x"), "y", usize::MAX, 5)).unwrap();

        assert_eq!(n, 1);
    }

    #[test]
    fn unmatched_pattern_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let original = "alpha\nbeta\n";
        let path = write_file(&dir, "a.txt", original);

        let n = patch_file(
            &path,
            &sub(Pattern::literal("gamma"), "delta", usize::MAX, 1),
        )
        .unwrap();

        assert_eq!(n, 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.txt");

        match patch_file(&path, &sub(Pattern::literal("x"), "y", usize::MAX, 1)) {
            Err(PatchError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn line_terminators_and_missing_final_newline_survive() {
        let dir = tempfile::tempdir().unwrap();
        let original = "a\r\nb\nx";
        let path = write_file(&dir, "a.txt", original);

        let n = patch_file(&path, &sub(Pattern::literal("x"), "y", usize::MAX, 1)).unwrap();

        assert_eq!(n, 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\r\nb\ny");
    }

    #[cfg(unix)]
    #[test]
    fn permission_bits_are_preserved() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.sh", "run x\n");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o754)).unwrap();

        patch_file(&path, &sub(Pattern::literal("x"), "y", usize::MAX, 1)).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o754);
    }
}
