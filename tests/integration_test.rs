use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{Days, Utc};
use git2::{Oid, Repository, Signature, Time};
use gitsheet::cli::generate::GenerateCommand;
use gitsheet::export::{export, repo_name_from_file_name, Destination, ExportReference};
use gitsheet::git::{Cutoff, GitRepository};
use gitsheet::timesheet::{build_timesheet, OutputMode, RowTail};
use gitsheet::SheetError;
use tempfile::TempDir;

/// Temporary repository whose commits carry explicit author times and are
/// attached to branches without touching HEAD.
struct TestRepo {
    _temp_dir: TempDir,
    repo_path: PathBuf,
    repo: Repository,
}

impl TestRepo {
    fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let repo_path = temp_dir.path().join("my_repo");
        fs::create_dir(&repo_path)?;
        let repo = Repository::init(&repo_path)?;

        Ok(TestRepo {
            _temp_dir: temp_dir,
            repo_path,
            repo,
        })
    }

    fn commit(&self, message: &str, author: &str, secs: i64, parents: &[Oid]) -> Result<Oid> {
        let signature = Signature::new(author, "dev@example.com", &Time::new(secs, 0))?;
        let tree_id = self.repo.treebuilder(None)?.write()?;
        let tree = self.repo.find_tree(tree_id)?;
        let parents = parents
            .iter()
            .map(|oid| self.repo.find_commit(*oid))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();

        Ok(self
            .repo
            .commit(None, &signature, &signature, message, &tree, &parent_refs)?)
    }

    fn branch(&self, name: &str, tip: Oid) -> Result<()> {
        let commit = self.repo.find_commit(tip)?;
        self.repo.branch(name, &commit, true)?;
        Ok(())
    }

    fn open(&self) -> Result<GitRepository> {
        Ok(GitRepository::open(&self.repo_path)?)
    }

    /// `base` shared by `main` (`on_main`) and `feature` (`on_feature`).
    fn forked(&self) -> Result<(Oid, Oid, Oid)> {
        let base = self.commit("chore: initial commit", "Alice", 1_700_000_000, &[])?;
        let on_main = self.commit("feat(api): add endpoint", "Alice", 1_700_003_600, &[base])?;
        let on_feature = self.commit("fix: handle empty input", "Bob", 1_700_001_800, &[base])?;
        self.branch("main", on_main)?;
        self.branch("feature", on_feature)?;
        Ok((base, on_main, on_feature))
    }
}

fn generate_command(dir: &Path, out_dir: &Path) -> GenerateCommand {
    GenerateCommand {
        branch: None,
        days: 0,
        dir: dir.to_path_buf(),
        mode: OutputMode::ElapsedTime,
        out_dir: out_dir.to_path_buf(),
        backend_url: None,
    }
}

#[test]
fn shared_ancestor_is_collected_once() -> Result<()> {
    let test_repo = TestRepo::new()?;
    test_repo.forked()?;
    let repo = test_repo.open()?;

    let table = build_timesheet(&repo, None, None, OutputMode::HashAndBranch)?;

    assert_eq!(table.len(), 3);
    let hashes: HashSet<String> = table
        .rows()
        .iter()
        .filter_map(|row| match &row.tail {
            RowTail::Hash { hash, .. } => Some(hash.clone()),
            RowTail::Elapsed(_) => None,
        })
        .collect();
    assert_eq!(hashes.len(), 3);
    Ok(())
}

#[test]
fn hash_mode_tags_first_claiming_branch() -> Result<()> {
    let test_repo = TestRepo::new()?;
    let (base, on_main, on_feature) = test_repo.forked()?;
    let repo = test_repo.open()?;

    let table = build_timesheet(&repo, None, None, OutputMode::HashAndBranch)?;

    let branch_of = |oid: Oid| {
        table.rows().iter().find_map(|row| match &row.tail {
            RowTail::Hash { branch, hash } if *hash == oid.to_string() => Some(branch.clone()),
            _ => None,
        })
    };
    // Branches are walked in name order, so "feature" claims the shared base.
    assert_eq!(branch_of(base).as_deref(), Some("feature"));
    assert_eq!(branch_of(on_feature).as_deref(), Some("feature"));
    assert_eq!(branch_of(on_main).as_deref(), Some("main"));
    Ok(())
}

#[test]
fn elapsed_mode_orders_chronologically() -> Result<()> {
    let test_repo = TestRepo::new()?;
    test_repo.forked()?;
    let repo = test_repo.open()?;

    let table = build_timesheet(&repo, None, None, OutputMode::ElapsedTime)?;
    let descriptions: Vec<&str> = table
        .rows()
        .iter()
        .map(|row| row.classified.description.as_str())
        .collect();

    assert_eq!(
        descriptions,
        ["initial commit", "handle empty input", "add endpoint"]
    );
    assert_eq!(table.rows()[0].tail, RowTail::Elapsed("30m".to_string()));
    assert_eq!(table.rows()[2].tail, RowTail::Elapsed(String::new()));
    Ok(())
}

#[test]
fn branch_filter_limits_history() -> Result<()> {
    let test_repo = TestRepo::new()?;
    test_repo.forked()?;
    let repo = test_repo.open()?;

    let table = build_timesheet(&repo, Some("main"), None, OutputMode::ElapsedTime)?;

    assert_eq!(table.len(), 2);
    assert!(table
        .rows()
        .iter()
        .all(|row| row.classified.description != "handle empty input"));
    Ok(())
}

#[test]
fn cutoff_drops_old_commits() -> Result<()> {
    let test_repo = TestRepo::new()?;
    let now = Utc::now();
    let old = now.checked_sub_days(Days::new(30)).unwrap().timestamp();
    let recent = now.checked_sub_days(Days::new(1)).unwrap().timestamp();
    let first = test_repo.commit("docs: old notes", "Alice", old, &[])?;
    let second = test_repo.commit("feat: recent work", "Alice", recent, &[first])?;
    test_repo.branch("main", second)?;
    let repo = test_repo.open()?;

    let table = build_timesheet(
        &repo,
        None,
        Cutoff::days_before(now, 7),
        OutputMode::ElapsedTime,
    )?;

    assert_eq!(table.len(), 1);
    assert_eq!(table.rows()[0].classified.description, "recent work");
    Ok(())
}

#[test]
fn missing_branch_is_fatal() -> Result<()> {
    let test_repo = TestRepo::new()?;
    test_repo.forked()?;
    let repo = test_repo.open()?;

    let err = build_timesheet(&repo, Some("nope"), None, OutputMode::ElapsedTime).unwrap_err();
    assert!(matches!(err, SheetError::BranchNotFound { ref branch } if branch == "nope"));
    Ok(())
}

#[tokio::test]
async fn missing_branch_writes_no_file() -> Result<()> {
    let test_repo = TestRepo::new()?;
    test_repo.forked()?;
    let out = tempfile::tempdir()?;
    let out_dir = out.path().join("sheets");

    let mut cmd = generate_command(&test_repo.repo_path, &out_dir);
    cmd.branch = Some("nope".to_string());

    assert!(cmd.execute().await.is_err());
    assert!(!out_dir.exists());
    Ok(())
}

#[tokio::test]
async fn generate_writes_named_csv() -> Result<()> {
    let test_repo = TestRepo::new()?;
    test_repo.forked()?;
    let out = tempfile::tempdir()?;
    let out_dir = out.path().join("sheets");

    generate_command(&test_repo.repo_path, &out_dir)
        .execute()
        .await?;

    let files: Vec<String> = fs::read_dir(&out_dir)?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<std::io::Result<_>>()?;
    assert_eq!(files.len(), 1);
    assert_eq!(repo_name_from_file_name(&files[0]).as_deref(), Some("my_repo"));

    let content = fs::read_to_string(out_dir.join(&files[0]))?;
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("Date,Author Name,Commit Type,Scope,Description,TimeStamp")
    );
    assert_eq!(lines.count(), 3);
    Ok(())
}

#[tokio::test]
async fn remote_export_uploads_csv() -> Result<()> {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let test_repo = TestRepo::new()?;
    test_repo.forked()?;
    let repo = test_repo.open()?;
    let table = build_timesheet(&repo, None, None, OutputMode::ElapsedTime)?;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/csv"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "payload": { "filename": "1700000000_my_repo_1234_final", "message": "ok" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let destination = Destination::Remote {
        base_url: server.uri().parse()?,
    };
    let reference = export(&table, &destination, repo.name().as_deref()).await?;

    match reference {
        ExportReference::Remote { file_name, url } => {
            assert_eq!(file_name, "1700000000_my_repo_1234_final");
            assert_eq!(url, format!("{}/csv/1700000000_my_repo_1234_final", server.uri()));
        }
        other => panic!("expected remote reference, got {other:?}"),
    }
    Ok(())
}
