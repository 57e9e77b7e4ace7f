//! Log lines emitted by a migration run

use apishift_config::MigrationConfig;
use apishift_services::{MemoryTree, MigrationReport, MigrationRunner};
use std::io;
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a migration at INFO level and return the report with every log line.
fn run_logged(tree: &mut MemoryTree) -> (MigrationReport, Vec<String>) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_max_level(Level::INFO)
        .with_ansi(false)
        .without_time()
        .finish();

    let report = tracing::subscriber::with_default(subscriber, || {
        MigrationRunner::new(MigrationConfig::default()).run(tree)
    });
    (report, buffer.lines())
}

fn count(lines: &[String], level: &str) -> usize {
    lines.iter().filter(|line| line.contains(level)).count()
}

const RULES: &str = r#"{
    "components": [{
        "filePatterns": ["**/*.component.ts"],
        "replacements": [{ "from": "oldInput", "to": "newInput" }]
    }]
}"#;

#[test]
fn test_missing_rule_set_logs_single_info_line() {
    let mut tree = MemoryTree::new().with_file("src/app/a.component.ts", "let oldInput = 1;\n");

    let (_, lines) = run_logged(&mut tree);

    assert_eq!(lines.len(), 1, "{:?}", lines);
    assert!(lines[0].contains("INFO"));
    assert!(lines[0].contains("No api-changes.json found"));
    assert_eq!(count(&lines, "ERROR"), 0);
}

#[test]
fn test_invalid_rule_set_logs_single_error_line() {
    let mut tree = MemoryTree::new()
        .with_file("api-changes.json", "{ \"components\": ")
        .with_file("src/app/a.component.ts", "let oldInput = 1;\n");

    let (report, lines) = run_logged(&mut tree);

    assert!(report.is_invalid());
    assert_eq!(lines.len(), 1, "{:?}", lines);
    assert!(lines[0].contains("ERROR"));
    assert!(lines[0].contains("Invalid api-changes.json"));
}

#[test]
fn test_each_modified_file_logs_one_applied_line() {
    let mut tree = MemoryTree::new()
        .with_file("api-changes.json", RULES)
        .with_file("src/app/a.component.ts", "let oldInput = 1;\n")
        .with_file("src/app/b.component.ts", "let other = 1;\n");

    let (report, lines) = run_logged(&mut tree);

    assert_eq!(report.modified_files(), vec!["src/app/a.component.ts"]);
    let applied: Vec<&String> = lines
        .iter()
        .filter(|line| line.contains("Applied"))
        .collect();
    assert_eq!(applied.len(), 1, "{:?}", lines);
    assert!(applied[0].contains("Applied TS API changes"));
    assert!(applied[0].contains("src/app/a.component.ts"));
    assert_eq!(count(&lines, "ERROR"), 0);
}
