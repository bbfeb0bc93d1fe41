use nexus::cache::CachedIndexer;
use nexus::compiler::{DECISIONS_HEADER, NODES_HEADER, RULES_HEADER};
use nexus::context::ContextService;
use nexus::indexer::{CodeIndex, SourceIndexer, scan};
use nexus::rules::InMemoryRuleProvider;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn setup_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "Services/OrderService.cs",
        r#"namespace Shop.Services;

public class OrderService
{
    public void PlaceOrder() {}

    public void CancelOrder() {}
}
"#,
    );
    write(
        dir.path(),
        "Data/UserRepository.cs",
        "public class UserRepository { public void FindUser() {} }\n",
    );
    write(
        dir.path(),
        "Web/Broken.cs",
        "public class BrokenController { public void Get() {} public void Post( {\n",
    );
    write(dir.path(), "README.md", "# shop\n");
    dir
}

fn service(cache: Arc<CachedIndexer<SourceIndexer>>) -> ContextService {
    ContextService::new(cache, Arc::new(InMemoryRuleProvider::new()))
}

#[test]
fn indexes_every_source_file_in_stable_order() {
    let repo = setup_repo();
    let indexer = SourceIndexer::default();
    let (nodes, stats) = indexer.index_with_stats(repo.path());
    assert_eq!(stats.scanned, 3);

    let paths: Vec<_> = nodes.iter().map(|n| n.path.as_str()).collect();
    assert_eq!(paths[0], "Data/UserRepository.cs");
    assert!(paths.contains(&"Services/OrderService.cs"));

    // The broken file still contributes what the parser recovered, and never
    // hides the other files.
    let summaries: Vec<_> = nodes.iter().map(|n| n.summary.as_str()).collect();
    assert!(summaries.contains(&"FindUser"));
    assert!(summaries.contains(&"PlaceOrder"));
    assert!(summaries.contains(&"CancelOrder"));

    let again = indexer.index(repo.path());
    assert_eq!(nodes, *again);
}

#[test]
fn single_file_paths_are_relative_to_their_directory() {
    let repo = setup_repo();
    let nodes = SourceIndexer::default().index(&repo.path().join("Services/OrderService.cs"));
    assert_eq!(nodes.len(), 2);
    assert!(nodes.iter().all(|n| n.path == "OrderService.cs"));
    assert_eq!((nodes[0].line_start, nodes[0].line_end), (5, 5));
}

#[test]
fn unindexable_paths_yield_nothing() {
    let repo = setup_repo();
    let indexer = SourceIndexer::default();
    assert!(indexer.index(&repo.path().join("missing")).is_empty());
    assert!(indexer.index(&repo.path().join("README.md")).is_empty());

    let empty = tempfile::tempdir().unwrap();
    write(empty.path(), "notes.txt", "nothing here");
    assert!(indexer.index(empty.path()).is_empty());
}

#[test]
fn cached_index_is_reused_within_ttl() {
    let repo = setup_repo();
    let cache = CachedIndexer::new(SourceIndexer::default(), Duration::from_secs(60));
    let first = cache.index(repo.path());

    // A new file is not visible until the entry expires or is cleared.
    write(
        repo.path(),
        "Jobs/CleanupService.cs",
        "public class CleanupService { public void Run() {} }\n",
    );
    let second = cache.index(repo.path());
    assert!(Arc::ptr_eq(&first, &second));

    cache.clear();
    let third = cache.index(repo.path());
    assert_eq!(third.len(), first.len() + 1);
}

#[test]
fn respect_ignore_skips_gitignored_sources() {
    let repo = setup_repo();
    write(repo.path(), ".gitignore", "Data/\n");
    let all = SourceIndexer::new(scan::ScanOptions::new(false)).index(repo.path());
    let ignored = SourceIndexer::new(scan::ScanOptions::new(true)).index(repo.path());
    assert!(all.iter().any(|n| n.path.starts_with("Data/")));
    assert!(!ignored.iter().any(|n| n.path.starts_with("Data/")));
}

#[test]
fn compile_selects_targets_and_renders_sections() {
    let repo = setup_repo();
    let cache = Arc::new(CachedIndexer::new(
        SourceIndexer::default(),
        Duration::from_secs(60),
    ));
    let nodes = cache.index(repo.path());
    let find_user = nodes.iter().find(|n| n.summary == "FindUser").unwrap();

    let targets = vec![find_user.node_id.to_lowercase(), "cancelorder".to_string()];
    let result = service(cache.clone()).compile(repo.path(), &targets);

    let bytecode = &result.bytecode;
    let rules_at = bytecode.find(RULES_HEADER).unwrap();
    let nodes_at = bytecode.find(NODES_HEADER).unwrap();
    let decisions_at = bytecode.find(DECISIONS_HEADER).unwrap();
    assert!(rules_at < nodes_at && nodes_at < decisions_at);
    assert_eq!(bytecode.matches(RULES_HEADER).count(), 1);
    assert!(bytecode.find("@RULE R01").unwrap() < bytecode.find("@RULE R02").unwrap());
    assert!(bytecode.contains(&format!(
        "@NODE {} T:Repository P:Data/UserRepository.cs L:1-1",
        find_user.node_id
    )));
    assert!(bytecode.contains("SUM: \"CancelOrder\""));
    assert!(!bytecode.contains("SUM: \"PlaceOrder\""));
    assert!(!bytecode.contains("@DECISION"));

    assert!(result.targets.contains(&find_user.node_id));
    assert_eq!(
        result.summary,
        format!("Compiled context for {} nodes.", result.targets.len())
    );
}

#[test]
fn compile_without_targets_returns_default_subset() {
    let repo = setup_repo();
    let cache = Arc::new(CachedIndexer::new(
        SourceIndexer::default(),
        Duration::from_secs(60),
    ));
    let all = cache.index(repo.path());
    let result = service(cache.clone()).compile(repo.path(), &[]);
    let expected: Vec<_> = all.iter().map(|n| n.node_id.clone()).collect();
    assert_eq!(result.targets, expected);

    let none = service(cache).compile(repo.path(), &["UnknownThing".to_string()]);
    assert!(none.targets.is_empty());
}
