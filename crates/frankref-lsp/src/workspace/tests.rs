//! Tests for workspace indexing and loading

// ==================== INDEX CONSTRUCTION TESTS ====================

mod index_tests {
    use crate::workspace::index::WorkspaceIndex;
    use frankref_core::{DeclarationKind, Document};

    fn doc(id: &str, text: &str) -> Document {
        Document::new(id, text)
    }

    /// Test 1: Indexing a multi-file workspace
    #[test]
    fn test_workspace_index_construction() {
        let docs = vec![
            doc("file:///a.xml", r#"<Adapter name="Orders"/>"#),
            doc("file:///b.xml", r#"<Adapter name="Invoices"><JavaListener name="InvoiceListener"/></Adapter>"#),
        ];
        let registry = WorkspaceIndex::build(&docs).registry();

        assert!(registry.lookup(DeclarationKind::Adapter, "Orders"));
        assert!(registry.lookup(DeclarationKind::Adapter, "Invoices"));
        assert!(registry.lookup(DeclarationKind::JavaListener, "InvoiceListener"));
        assert!(!registry.lookup(DeclarationKind::JavaListener, "Orders"));
    }

    /// Test 2: Duplicate declarations across files collapse
    #[test]
    fn test_duplicates_collapse() {
        let docs = vec![
            doc("file:///a.xml", r#"<Adapter name="Same"/>"#),
            doc("file:///b.xml", r#"<Adapter name="Same"/>"#),
        ];
        let registry = WorkspaceIndex::build(&docs).registry();

        assert_eq!(registry.names(DeclarationKind::Adapter), vec!["Same"]);
    }

    /// Test 3: Generic name attributes stay out of the registry
    #[test]
    fn test_generic_names_not_pooled() {
        let docs = vec![doc("file:///a.xml", r#"<Exit name="READY"/>"#)];
        let registry = WorkspaceIndex::build(&docs).registry();

        assert!(registry.is_empty());
    }

    /// Test 4: Incremental update equals a full rebuild
    #[test]
    fn test_update_matches_full_rebuild() {
        let a = doc("file:///a.xml", r#"<Adapter name="A1"/>"#);
        let b = doc("file:///b.xml", r#"<Adapter name="B1"/>"#);
        let b_edited = doc("file:///b.xml", r#"<Adapter name="B2"/><JavaListener name="L"/>"#);

        let mut incremental = WorkspaceIndex::build(&[a.clone(), b]);
        incremental.update(&b_edited);

        let rebuilt = WorkspaceIndex::build(&[a, b_edited]);
        assert_eq!(incremental.registry(), rebuilt.registry());
    }

    /// Test 5: Removing a document removes only its names
    #[test]
    fn test_document_removal() {
        let a = doc("file:///a.xml", r#"<Adapter name="Kept"/>"#);
        let b = doc("file:///b.xml", r#"<Adapter name="Gone"/>"#);
        let mut index = WorkspaceIndex::build(&[a, b.clone()]);

        assert!(index.remove(&b.id));
        let registry = index.registry();
        assert!(registry.lookup(DeclarationKind::Adapter, "Kept"));
        assert!(!registry.lookup(DeclarationKind::Adapter, "Gone"));

        // Removing twice is a no-op
        assert!(!index.remove(&b.id));
    }

    /// Test 6: Name kept alive by a second declaring document
    #[test]
    fn test_removal_keeps_names_declared_elsewhere() {
        let a = doc("file:///a.xml", r#"<Adapter name="Shared"/>"#);
        let b = doc("file:///b.xml", r#"<Adapter name="Shared"/>"#);
        let mut index = WorkspaceIndex::build(&[a, b.clone()]);

        index.remove(&b.id);
        assert!(index.registry().lookup(DeclarationKind::Adapter, "Shared"));
    }

    /// Test 7: Build order does not matter
    #[test]
    fn test_build_is_order_independent() {
        let docs = vec![
            doc("file:///a.xml", r#"<Adapter name="A"/><JavaListener name="L1"/>"#),
            doc("file:///b.xml", r#"<Adapter name="B"/><Adapter name="A"/>"#),
            doc("file:///c.xml", r#"<JavaListener name="L2"/>"#),
        ];
        let mut reversed = docs.clone();
        reversed.reverse();

        assert_eq!(
            WorkspaceIndex::build(&docs).registry(),
            WorkspaceIndex::build(&reversed).registry()
        );
    }
}

// ==================== MERGE TESTS ====================

mod merge_tests {
    use crate::workspace::registry::NameRegistry;
    use frankref_core::DeclarationKind;

    fn registry(names: &[(DeclarationKind, &str)]) -> NameRegistry {
        let mut registry = NameRegistry::new();
        for (kind, name) in names {
            registry.insert(*kind, *name);
        }
        registry
    }

    /// Test 8: Merge is commutative and associative
    #[test]
    fn test_merge_is_set_union() {
        let a = registry(&[(DeclarationKind::Adapter, "A")]);
        let b = registry(&[
            (DeclarationKind::Adapter, "B"),
            (DeclarationKind::JavaListener, "L"),
        ]);
        let c = registry(&[(DeclarationKind::Adapter, "A")]);

        let mut left = a.clone();
        left.merge(&b);
        left.merge(&c);

        let mut right = c.clone();
        right.merge(&b);
        right.merge(&a);

        assert_eq!(left, right);
        assert_eq!(left.len(), 3);
    }
}

// ==================== LOADER TESTS ====================

mod loader_tests {
    use crate::config::WorkspaceSettings;
    use crate::workspace::loader::{
        document_id, load_documents, DiskFiles, MemoryFiles, WorkspaceError, WorkspaceFiles,
    };
    use crate::workspace::WorkspaceIndex;
    use frankref_core::{DeclarationKind, Document};
    use std::fs;

    /// Test 9: Unreadable files contribute nothing but do not abort the load
    #[test]
    fn test_unreadable_file_is_skipped() {
        let files = MemoryFiles::new()
            .add("a.xml", r#"<Adapter name="A"/>"#)
            .add_unreadable("broken.xml")
            .add("c.xml", r#"<JavaListener name="L"/>"#);

        let loaded = load_documents(&files).unwrap();
        assert_eq!(loaded.len(), 2);

        let documents: Vec<Document> = loaded.into_iter().map(|f| f.document).collect();
        let registry = WorkspaceIndex::build(&documents).registry();
        assert!(registry.lookup(DeclarationKind::Adapter, "A"));
        assert!(registry.lookup(DeclarationKind::JavaListener, "L"));
    }

    /// Test 10: Disk walk finds XML files and skips dependency directories
    #[test]
    fn test_disk_walk_excludes_dependencies() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("configurations/Orders")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("configurations/Orders/Configuration.xml"), "<Adapter name=\"O\"/>").unwrap();
        fs::write(root.join("node_modules/pkg/Configuration.xml"), "<Adapter name=\"X\"/>").unwrap();
        fs::write(root.join("README.md"), "# readme").unwrap();

        let files = DiskFiles::new(root).list_files().unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("configurations/Orders/Configuration.xml"));
    }

    /// Test 11: Include patterns from settings are honoured
    #[test]
    fn test_disk_walk_uses_settings() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("other")).unwrap();
        fs::write(root.join("src/Configuration.xml"), "<Configuration/>").unwrap();
        fs::write(root.join("other/pom.xml"), "<project/>").unwrap();

        let settings = WorkspaceSettings {
            include: vec!["src/**/*.xml".to_string()],
            ..WorkspaceSettings::default()
        };
        let files = DiskFiles::from_settings(root, &settings).list_files().unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("src/Configuration.xml"));
    }

    /// Test 12: Missing root is reported
    #[test]
    fn test_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let result = DiskFiles::new(dir.path().join("absent")).list_files();
        assert!(matches!(result, Err(WorkspaceError::NotADirectory(_))));
    }

    /// Test 13: Invalid pattern is reported
    #[test]
    fn test_invalid_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let settings = WorkspaceSettings {
            include: vec!["**/[.xml".to_string()],
            ..WorkspaceSettings::default()
        };
        let result = DiskFiles::from_settings(dir.path(), &settings).list_files();
        assert!(matches!(result, Err(WorkspaceError::InvalidPattern { .. })));
    }

    /// Test 14: Disk files get file URIs as identifiers
    #[test]
    fn test_document_id_is_file_uri() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Configuration.xml");
        let id = document_id(&path);

        assert!(id.as_str().starts_with("file:///"));
        assert!(id.as_str().ends_with("Configuration.xml"));
    }

    /// Test 15: Watched-file filter applies the same patterns as the walk
    #[test]
    fn test_includes_matches_patterns() {
        let root = std::path::Path::new("/workspace");
        let files = DiskFiles::new(root);

        assert!(files.includes(&root.join("src/Configuration.xml")).unwrap());
        assert!(!files.includes(&root.join("node_modules/pkg/Adapter.xml")).unwrap());
        assert!(!files.includes(&root.join("README.md")).unwrap());
        assert!(!files.includes(std::path::Path::new("/elsewhere/Configuration.xml")).unwrap());
    }
}
