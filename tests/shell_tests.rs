use codebundle::aggregate::{AggregateResult, FileBlock};
use codebundle::export::{export_text, ClipboardSink, ExportNotice};
use codebundle::errors::BundleError;
use codebundle::model::TreeModel;
use codebundle::reporting::render_stats;
use codebundle::shell::{render_tree_view, ShellCommand};
use codebundle::tree::DirectoryEntry;

#[test]
fn test_parse_commands() {
    assert_eq!(ShellCommand::parse("   ").unwrap(), None);
    assert_eq!(
        ShellCommand::parse("cd  ../my project ").unwrap(),
        Some(ShellCommand::Cd("../my project".to_string()))
    );
    assert_eq!(
        ShellCommand::parse("toggle src/main.rs").unwrap(),
        Some(ShellCommand::Toggle("src/main.rs".to_string()))
    );
    assert_eq!(
        ShellCommand::parse("filter ts .tsx").unwrap(),
        Some(ShellCommand::Filter(vec!["ts".to_string(), ".tsx".to_string()]))
    );
    assert_eq!(
        ShellCommand::parse("filter").unwrap(),
        Some(ShellCommand::Filter(vec![]))
    );
    assert_eq!(
        ShellCommand::parse("text Please review this code.").unwrap(),
        Some(ShellCommand::Text("Please review this code.".to_string()))
    );
    assert_eq!(ShellCommand::parse("all").unwrap(), Some(ShellCommand::SelectAll(true)));
    assert_eq!(ShellCommand::parse("none").unwrap(), Some(ShellCommand::SelectAll(false)));
    assert_eq!(
        ShellCommand::parse("history clear").unwrap(),
        Some(ShellCommand::ClearHistory)
    );
    assert_eq!(ShellCommand::parse("exit").unwrap(), Some(ShellCommand::Quit));
}

#[test]
fn test_parse_rejects_incomplete_or_unknown_commands() {
    assert!(ShellCommand::parse("cd").is_err());
    assert!(ShellCommand::parse("toggle").is_err());
    assert!(ShellCommand::parse("rm -rf /").is_err());
}

#[test]
fn test_tree_view_marks_selection_and_honours_filter() {
    let mut model = TreeModel::new();
    model.ingest(vec![
        DirectoryEntry::file("README.md"),
        DirectoryEntry::directory("src", vec![DirectoryEntry::file("main.rs")]),
    ]);
    model.toggle("README.md");

    assert_eq!(
        render_tree_view(&model),
        vec!["[ ] README.md", "    src/", "  [x] main.rs"]
    );

    model.set_extension_filter(["rs"]);
    assert_eq!(render_tree_view(&model), vec!["    src/", "  [x] main.rs"]);
}

#[test]
fn test_stats_tree_has_directory_subtotals() {
    let result = AggregateResult {
        text: String::new(),
        token_count: 42,
        files: vec![
            FileBlock {
                path: "a.ts".to_string(),
                content: "x".to_string(),
                failed: false,
                token_count: 5,
            },
            FileBlock {
                path: "b/c.rs".to_string(),
                content: "z".to_string(),
                failed: false,
                token_count: 7,
            },
            FileBlock {
                path: "b/d.md".to_string(),
                content: "y".to_string(),
                failed: false,
                token_count: 3,
            },
        ],
    };

    assert_eq!(
        render_stats(&result),
        vec![
            "Overall (42 tokens)",
            "┣━━ 🔷 a.ts (5 tokens)",
            "┗━━📂 b (10 tokens)",
            "     ┣━━ 🦀 c.rs (7 tokens)",
            "     ┗━━ 📝 d.md (3 tokens)",
        ]
    );
}

struct RecordingSink {
    written: Vec<String>,
    fail: bool,
}

impl ClipboardSink for RecordingSink {
    fn write_text(&mut self, text: &str) -> Result<(), BundleError> {
        if self.fail {
            return Err(BundleError::ClipboardWriteError("no display".to_string()));
        }
        self.written.push(text.to_string());
        Ok(())
    }
}

#[test]
fn test_export_reports_outcome() {
    let mut sink = RecordingSink {
        written: vec![],
        fail: false,
    };
    let notice = export_text(&mut sink, "bundle");
    assert_eq!(notice, ExportNotice::Copied);
    assert_eq!(notice.to_string(), "Copied to clipboard!");
    assert_eq!(sink.written, vec!["bundle"]);

    let mut broken = RecordingSink {
        written: vec![],
        fail: true,
    };
    let notice = export_text(&mut broken, "bundle");
    assert!(matches!(notice, ExportNotice::Failed(_)));
    assert_eq!(notice.to_string(), "Failed to copy");
}
