//! Property tests: walks terminate and find exactly the reachable files.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use proptest::prelude::*;
use satchel_config::BundleOptions;
use satchel_graph::{DependencyGraphWalker, MemoryRuntime};

fn module_path(index: usize) -> PathBuf {
    PathBuf::from(format!("/app/m{index}.js"))
}

fn reachable(edges: &[Vec<usize>]) -> HashSet<PathBuf> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([0usize]);
    while let Some(node) = queue.pop_front() {
        if seen.insert(node) {
            queue.extend(edges[node].iter().copied());
        }
    }
    seen.into_iter().map(module_path).collect()
}

fn graph_strategy() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..12).prop_flat_map(|n| prop::collection::vec(prop::collection::vec(0..n, 0..4), n))
}

proptest! {
    #[test]
    fn walk_finds_exactly_the_reachable_files(edges in graph_strategy()) {
        let runtime = MemoryRuntime::new("/app");
        for (index, targets) in edges.iter().enumerate() {
            let source: String = targets
                .iter()
                .map(|target| format!("require('./m{target}');\n"))
                .collect();
            runtime.insert(module_path(index), source);
        }

        let walker = DependencyGraphWalker::new(Arc::new(runtime.clone()));
        let options = BundleOptions::default().with_max_depth(usize::MAX);
        let deps = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(walker.walk(Path::new("/app/m0.js"), &options))
            .unwrap();

        let found: HashSet<PathBuf> = deps.iter().map(Path::to_path_buf).collect();
        prop_assert_eq!(found.len(), deps.len());
        prop_assert_eq!(found, reachable(&edges));
        prop_assert_eq!(runtime.read_count(), deps.len());
    }
}
