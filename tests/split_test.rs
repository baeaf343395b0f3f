#[cfg(test)]
mod tests {
    use console::strip_ansi_codes;
    use libsplitdiff::{
        FILE_HEADER_LINES,
        diff::DiffType,
        patch::parse_patch,
        render::{LARGE_HUNK_MESSAGE, Options, SplitError, render_patch, split_patch, split_strings},
        split_files,
        string_utils::visible_width,
    };
    use pretty_assertions::assert_eq;
    use std::{fs, path::Path};
    use tempfile::TempDir;
    use test_case::test_case;

    fn plain_rows(output: &str) -> Vec<String> {
        output
            .split('\n')
            .map(|row| strip_ansi_codes(row).into_owned())
            .collect()
    }

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn lines(count: usize, changed: Option<usize>) -> String {
        (0..count)
            .map(|n| {
                if Some(n) == changed {
                    format!("changed {n}\n")
                } else {
                    format!("line {n}\n")
                }
            })
            .collect()
    }

    #[test_case(DiffType::Lines, 80)]
    #[test_case(DiffType::Lines, 31)]
    #[test_case(DiffType::Chars, 80)]
    #[test_case(DiffType::Chars, 17)]
    fn every_row_spans_the_full_width(diff_type: DiffType, columns: usize) {
        let old = "fn main() {\n\tprintln!(\"hello, world\");\n}\n";
        let new = "fn main() {\n\tlet name = \"world\";\n\tprintln!(\"hello, {name}\");\n}\n";
        let options = Options {
            diff_type,
            columns,
            ..Default::default()
        };
        let width = 2 * options.column_width();
        for row in split_strings(old, new, &options).split('\n') {
            assert_eq!(visible_width(row), width, "row: {row:?}");
        }
    }

    #[test]
    fn compare_files_with_headers() {
        let dir = TempDir::new().unwrap();
        let old = write_file(&dir, "old.txt", &lines(30, None));
        let new = write_file(&dir, "new.txt", &lines(30, Some(20)));
        let options = Options {
            truncate: true,
            columns: 120,
            ..Default::default()
        };

        let rows = plain_rows(&split_files(&old, &new, &options).unwrap());
        let (left, right) = rows[0].split_at(60);
        assert!(left.trim_start().starts_with(&old.display().to_string()));
        assert!(right.trim_start().starts_with(&new.display().to_string()));
        assert_eq!(rows[1].trim(), "");

        // The header is followed by an ellipsis, then the window around line 20
        assert!(rows[FILE_HEADER_LINES].contains("..."));
        assert!(rows[FILE_HEADER_LINES + 1].starts_with("17 line 16"));
        assert!(rows.iter().any(|row| row.contains("21 line 20") && row.contains("21 changed 20")));
        assert!(rows.last().unwrap().contains("..."));
    }

    #[test]
    fn compare_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let old = write_file(&dir, "old.txt", "a\n");
        let result = split_files(&old, Path::new("/definitely/not/here.txt"), &Options::default());
        assert!(result.is_err());
    }

    #[test]
    fn identical_files_render_plainly() {
        let dir = TempDir::new().unwrap();
        let text = lines(5, None);
        let old = write_file(&dir, "a.txt", &text);
        let new = write_file(&dir, "b.txt", &text);
        console::set_colors_enabled(true);
        let output = split_files(&old, &new, &Options::default()).unwrap();
        let rows: Vec<&str> = output.split('\n').collect();
        // Two header lines plus the five content lines
        assert_eq!(rows.len(), FILE_HEADER_LINES + 5);
        for row in &rows[FILE_HEADER_LINES..] {
            // Only the gutter is styled on unchanged rows
            assert!(!row.contains("\u{1b}[4"), "unexpected background in {row:?}");
        }
    }

    #[test]
    fn identical_files_are_not_truncated() {
        let dir = TempDir::new().unwrap();
        let text = lines(20, None);
        let old = write_file(&dir, "a.txt", &text);
        let new = write_file(&dir, "b.txt", &text);
        let options = Options {
            truncate: true,
            ..Default::default()
        };
        let rows = plain_rows(&split_files(&old, &new, &options).unwrap());
        assert_eq!(rows.len(), FILE_HEADER_LINES + 20);
        assert!(rows.iter().all(|row| !row.contains("...")));
    }

    const GIT_PATCH: &str = "\
diff --git a/greeting.rs b/greeting.rs
index 1111111..2222222 100644
--- a/greeting.rs
+++ b/greeting.rs
@@ -1,4 +1,4 @@
 fn greet() {
-    println!(\"hello\");
+    println!(\"goodbye\");
 }

diff --git a/other.txt b/other.txt
--- a/other.txt
+++ b/other.txt
@@ -7,2 +7,3 @@ section
 kept
+added one
+added two
 also kept
";

    #[test]
    fn render_git_patch() {
        let options = Options {
            columns: 60,
            ..Default::default()
        };
        let rows = plain_rows(&split_patch(GIT_PATCH, &options).unwrap());
        assert_eq!(
            rows,
            vec![
                "a/greeting.rs                 b/greeting.rs                 ",
                "                                                            ",
                "1 fn greet() {                1 fn greet() {                ",
                "2     println!(\"hello\");      2     println!(\"goodbye\");    ",
                "3 }                           3 }                           ",
                "4                             4                             ",
                "a/other.txt                   b/other.txt                   ",
                "                                                            ",
                " 7 kept                        7 kept                       ",
                "                               8 added one                  ",
                "                               9 added two                  ",
                " 8 also kept                  10 also kept                  ",
            ]
        );
    }

    #[test]
    fn patch_rejects_char_diffs() {
        let options = Options {
            diff_type: DiffType::Chars,
            ..Default::default()
        };
        let err = split_patch(GIT_PATCH, &options).unwrap_err();
        assert!(matches!(err, SplitError::PatchRequiresLines(DiffType::Chars)));
    }

    #[test]
    fn sections_missing_a_name_are_skipped() {
        let patch = "@@ -1 +1 @@\n-a\n+b\n--- a/x\n+++ b/x\n@@ -1 +1 @@\n-c\n+d\n";
        let files = parse_patch(patch).unwrap();
        assert_eq!(files.len(), 2);
        let rows = render_patch(&files, &Options::default());
        // Only the second section renders: header, padding and one row
        assert_eq!(rows.len(), 3);
        assert!(strip_ansi_codes(&rows[0]).starts_with("a/x"));
    }

    #[test]
    fn large_hunks_are_guarded() {
        let body: String = (0..3000).map(|n| format!("+{n:0>99}\n")).collect();
        let patch = format!("--- a/big\n+++ b/big\n@@ -0,0 +1,3000 @@\n{body}");
        let options = Options {
            columns: 200,
            ..Default::default()
        };

        let rows = plain_rows(&split_patch(&patch, &options).unwrap());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].trim(), LARGE_HUNK_MESSAGE);

        let options = Options {
            show_large_hunks: true,
            columns: 240,
            ..options
        };
        let rows = plain_rows(&split_patch(&patch, &options).unwrap());
        assert_eq!(rows.len(), 2 + 3000);
    }
}
