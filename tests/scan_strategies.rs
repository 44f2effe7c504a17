//! Every search strategy reports the same files for the same tree.

use git2::{IndexAddOption, Repository, Signature};
use org_url_sweep::scan::{SNIFF_LEN, ScanReport, Scanner, SearchStrategy};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const OLD: &str = "https://github.com/TensoRaws";

/// A committed working tree mixing admitted and excluded files.
fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    let late = format!("{}\0{}\n", "a".repeat(SNIFF_LEN + 904), OLD);
    let files: Vec<(&str, Vec<u8>)> = vec![
        ("README.md", format!("See {}/AnimeSR\n", OLD).into_bytes()),
        ("docs/build", format!("{}\n", OLD).into_bytes()),
        ("Build/README.md", format!("{}\n", OLD).into_bytes()),
        ("node_modules/pkg/index.js", format!("// {}\n", OLD).into_bytes()),
        ("vendor/lib.go", format!("// {}\n", OLD).into_bytes()),
        ("assets/Logo.PNG", format!("PNG {}", OLD).into_bytes()),
        ("early.txt", format!("\0{}\n", OLD).into_bytes()),
        ("late.txt", late.into_bytes()),
        ("clean.txt", b"nothing to see\n".to_vec()),
    ];
    for (rel, content) in &files {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    let repo = Repository::init(root).unwrap();
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = Signature::now("Test", "test@example.com").unwrap();
    repo.commit(Some("HEAD"), &sig, &sig, "seed", &tree, &[])
        .unwrap();

    dir
}

/// Scans with every strategy installed on this machine.
fn scan_all(root: &Path) -> Vec<(&'static str, ScanReport)> {
    [
        SearchStrategy::Ripgrep,
        SearchStrategy::GitGrep,
        SearchStrategy::Walk,
    ]
    .into_iter()
    .filter_map(|strategy| Scanner::detect(strategy).ok())
    .map(|scanner| (scanner.strategy_name(), scanner.scan(root, OLD).unwrap()))
    .collect()
}

#[test]
fn test_strategies_agree_on_admitted_files() {
    let dir = fixture();
    let expected = vec![
        PathBuf::from("Build/README.md"),
        PathBuf::from("README.md"),
        PathBuf::from("docs/build"),
        PathBuf::from("late.txt"),
    ];

    let reports = scan_all(dir.path());
    assert!(reports.iter().any(|(name, _)| *name == "walk"));

    for (name, report) in &reports {
        assert_eq!(report.paths(), expected, "strategy {}", name);
        assert_eq!(report.total_occurrences(), 4, "strategy {}", name);
    }
}

#[test]
fn test_strategies_agree_on_no_matches() {
    let dir = fixture();

    for strategy in [
        SearchStrategy::Ripgrep,
        SearchStrategy::GitGrep,
        SearchStrategy::Walk,
    ] {
        let Ok(scanner) = Scanner::detect(strategy) else {
            continue;
        };
        let report = scanner
            .scan(dir.path(), "https://example.invalid/none")
            .unwrap();
        assert!(report.is_empty(), "strategy {}", scanner.strategy_name());
    }
}
