//! Delimited Table Writer
//!
//! Every table logagg produces is a list of rows of fields. The writer joins
//! the fields with one delimiter and terminates every line, so the same rows
//! always yield the same bytes.

use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

/// One output line, already formatted field by field
pub type Row = Vec<String>;

/// Field separator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    /// `\t`
    #[default]
    Tab,
    /// A single space
    Space,
}

impl Delimiter {
    /// The separator text
    pub fn as_str(&self) -> &'static str {
        match self {
            Delimiter::Tab => "\t",
            Delimiter::Space => " ",
        }
    }
}

impl std::str::FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tab" | "\\t" => Ok(Delimiter::Tab),
            "space" | " " => Ok(Delimiter::Space),
            other => Err(format!("Unknown delimiter: {}", other)),
        }
    }
}

/// Whether an existing file is replaced or extended
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the file contents
    #[default]
    Truncate,
    /// Add after the existing contents
    Append,
}

/// Render `rows` into text, one newline-terminated line per row
pub fn render_rows(rows: &[Row], delimiter: Delimiter) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str(&row.join(delimiter.as_str()));
        out.push('\n');
    }
    out
}

/// Write `rows` to `out`
pub fn write_rows_to<W: Write>(out: &mut W, rows: &[Row], delimiter: Delimiter) -> io::Result<()> {
    out.write_all(render_rows(rows, delimiter).as_bytes())?;
    out.flush()
}

/// Write `rows` to the file at `path`, creating missing parent directories.
pub fn write_rows(
    path: impl AsRef<Path>,
    rows: &[Row],
    delimiter: Delimiter,
    mode: WriteMode,
) -> io::Result<()> {
    write_text(path, &render_rows(rows, delimiter), mode)
}

/// Write `text` to the file at `path`, creating missing parent directories.
pub fn write_text(path: impl AsRef<Path>, text: &str, mode: WriteMode) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut options = OpenOptions::new();
    match mode {
        WriteMode::Truncate => options.write(true).create(true).truncate(true),
        WriteMode::Append => options.append(true).create(true),
    };
    let mut file = options.open(path)?;
    file.write_all(text.as_bytes())?;
    file.flush()
}

/// `dir/name` when `name` is a single plain file name.
///
/// Names taken from log content may hold separators, `..` or a root; those
/// would land outside `dir` and give `None`.
pub fn file_in_dir(dir: &Path, name: &str) -> Option<PathBuf> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(file)), None) if !name.contains(['/', '\\']) => {
            Some(dir.join(file))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Row> {
        vec![
            vec!["a".to_string(), "2".to_string(), "15".to_string()],
            vec!["b".to_string(), "1".to_string(), "5".to_string()],
        ]
    }

    #[test]
    fn test_render_tab_and_space() {
        assert_eq!(render_rows(&rows(), Delimiter::Tab), "a\t2\t15\nb\t1\t5\n");
        assert_eq!(render_rows(&rows(), Delimiter::Space), "a 2 15\nb 1 5\n");
        assert_eq!(render_rows(&[], Delimiter::Tab), "");
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/deeper/stats.txt");

        write_rows(&path, &rows(), Delimiter::Tab, WriteMode::Truncate).unwrap();
        assert!(fs::read_to_string(&path).unwrap().ends_with('\n'));
    }

    #[test]
    fn test_truncate_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("stats.txt");

        write_rows(&path, &rows(), Delimiter::Space, WriteMode::Truncate).unwrap();
        let first = fs::read(&path).unwrap();
        write_rows(&path, &rows(), Delimiter::Space, WriteMode::Truncate).unwrap();
        assert_eq!(fs::read(&path).unwrap(), first);
    }

    #[test]
    fn test_append_extends() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("stats.txt");

        write_rows(&path, &rows()[..1], Delimiter::Tab, WriteMode::Truncate).unwrap();
        write_rows(&path, &rows()[1..], Delimiter::Tab, WriteMode::Append).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\t2\t15\nb\t1\t5\n");
    }

    #[test]
    fn test_delimiter_from_str() {
        assert_eq!("TAB".parse::<Delimiter>(), Ok(Delimiter::Tab));
        assert_eq!("space".parse::<Delimiter>(), Ok(Delimiter::Space));
        assert!("comma".parse::<Delimiter>().is_err());
    }

    #[test]
    fn test_write_text_modes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out/report.json");

        write_text(&path, "{}\n", WriteMode::Truncate).unwrap();
        write_text(&path, "{}\n", WriteMode::Truncate).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n");
        write_text(&path, "[]\n", WriteMode::Append).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n[]\n");
    }

    #[test]
    fn test_file_in_dir_accepts_plain_names() {
        let dir = Path::new("cdfs");
        assert_eq!(file_in_dir(dir, "h1.txt"), Some(dir.join("h1.txt")));
        assert_eq!(file_in_dir(dir, "1.5.txt"), Some(dir.join("1.5.txt")));
    }

    #[test]
    fn test_file_in_dir_rejects_escaping_names() {
        let dir = Path::new("cdfs");
        assert_eq!(file_in_dir(dir, "/abs/path.txt"), None);
        assert_eq!(file_in_dir(dir, "../x.txt"), None);
        assert_eq!(file_in_dir(dir, "a/b.txt"), None);
        assert_eq!(file_in_dir(dir, "x.txt/."), None);
        assert_eq!(file_in_dir(dir, "a\\b.txt"), None);
        assert_eq!(file_in_dir(dir, ".."), None);
        assert_eq!(file_in_dir(dir, "."), None);
        assert_eq!(file_in_dir(dir, ""), None);
    }
}
