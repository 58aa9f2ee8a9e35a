//! Reading the input URL list.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// One URL per line, in file order. Lines are trimmed; blank lines and lines
/// starting with `#` are skipped. Duplicates are kept (each is its own task).
pub fn load_url_list(path: &Path) -> Result<Vec<String>> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read URL list {}", path.display()))?;
    Ok(parse_url_list(&data))
}

fn parse_url_list(data: &str) -> Vec<String> {
    data.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blanks_and_comments() {
        let urls = parse_url_list(
            "# images\nhttp://x/a.png\n\n   \n  http://x/b.jpg  \n#http://x/c.gif\nhttp://x/a.png\n",
        );
        assert_eq!(urls, vec!["http://x/a.png", "http://x/b.jpg", "http://x/a.png"]);
    }

    #[test]
    fn handles_crlf_line_endings() {
        let urls = parse_url_list("http://x/a.png\r\nhttp://x/b.png\r\n");
        assert_eq!(urls, vec!["http://x/a.png", "http://x/b.png"]);
    }

    #[test]
    fn reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        std::fs::write(&path, "http://x/a.png\n").unwrap();
        assert_eq!(load_url_list(&path).unwrap(), vec!["http://x/a.png"]);
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.txt");
        let err = load_url_list(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("nope.txt"));
    }
}
