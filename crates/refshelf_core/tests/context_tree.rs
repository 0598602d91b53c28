use refshelf_core::{
    Context, EntityKind, InMemoryLibrary, LibraryError, Reference, ReferenceType, StoreError,
};
use std::cell::Cell;
use std::rc::Rc;

fn library() -> InMemoryLibrary {
    InMemoryLibrary::in_memory()
}

#[test]
fn path_of_nested_context_joins_names_root_first() {
    let mut lib = library();
    let ai = lib.add_context(Context::new("AI", None)).unwrap();
    let nlp = lib.add_context(Context::new("NLP", Some(ai))).unwrap();

    assert_eq!(ai, 1);
    assert_eq!(nlp, 2);
    assert_eq!(lib.get_context_path(nlp).unwrap(), "AI / NLP");
    assert_eq!(lib.get_context_path(ai).unwrap(), "AI");
}

#[test]
fn path_depth_matches_separator_count() {
    let mut lib = library();
    let mut parent = None;
    let mut ids = Vec::new();
    for depth in 0..6 {
        let id = lib
            .add_context(Context::new(format!("level{depth}"), parent))
            .unwrap();
        ids.push(id);
        parent = Some(id);
    }

    for (index, id) in ids.iter().enumerate() {
        let path = lib.get_context_path(*id).unwrap();
        assert_eq!(path.matches(" / ").count(), index);
        assert!(path.starts_with("level0"));
        assert!(path.ends_with(&format!("level{index}")));
    }
}

#[test]
fn children_are_direct_only_and_in_insertion_order() {
    let mut lib = library();
    let root_a = lib.add_context(Context::new("A", None)).unwrap();
    let root_b = lib.add_context(Context::new("B", None)).unwrap();
    let child_a1 = lib.add_context(Context::new("A1", Some(root_a))).unwrap();
    lib.add_context(Context::new("A1x", Some(child_a1))).unwrap();
    let child_a2 = lib.add_context(Context::new("A2", Some(root_a))).unwrap();

    let top: Vec<_> = lib.get_child_contexts(None).iter().map(|c| c.id).collect();
    assert_eq!(top, vec![root_a, root_b]);

    let under_a: Vec<_> = lib
        .get_child_contexts(Some(root_a))
        .iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(under_a, vec![child_a1, child_a2]);
    assert!(lib.get_child_contexts(Some(root_b)).is_empty());
}

#[test]
fn delete_context_strips_membership_and_orphans_children() {
    let mut lib = library();
    let parent = lib.add_context(Context::new("Parent", None)).unwrap();
    let child = lib.add_context(Context::new("Child", Some(parent))).unwrap();

    let mut reference = Reference::new(ReferenceType::Book, "Tagged", "Ann Lee");
    reference.context_ids.extend([parent, child]);
    let ref_id = lib.add_reference(reference).unwrap();

    let before = lib.get_all_contexts().len();
    lib.delete_context(parent).unwrap();

    assert_eq!(lib.get_all_contexts().len(), before - 1);
    assert!(lib
        .get_all_references()
        .iter()
        .all(|r| !r.context_ids.contains(&parent)));
    assert!(lib.get_reference(ref_id).unwrap().context_ids.contains(&child));

    let orphan = lib.get_context(child).unwrap();
    assert_eq!(orphan.parent_id, Some(parent));
    assert_eq!(lib.get_context_path(child).unwrap(), "Child");

    let report = lib.audit();
    assert_eq!(report.orphaned_contexts, vec![(child, parent)]);
    assert!(report.unknown_context_links.is_empty());
}

#[test]
fn update_replaces_whole_context_and_rejects_unknown_ids() {
    let mut lib = library();
    let id = lib.add_context(Context::new("Draft", None)).unwrap();

    lib.update_context(Context::with_id(id, "Final", None)).unwrap();
    assert_eq!(lib.get_context(id).unwrap().name, "Final");

    let err = lib
        .update_context(Context::with_id(99, "Ghost", None))
        .unwrap_err();
    assert!(err.is_not_found(EntityKind::Context));
}

#[test]
fn unknown_context_lookups_report_not_found() {
    let mut lib = library();
    assert!(lib.get_context(5).unwrap_err().is_not_found(EntityKind::Context));
    assert!(lib.delete_context(5).unwrap_err().is_not_found(EntityKind::Context));
    assert!(lib
        .get_context_path(5)
        .unwrap_err()
        .is_not_found(EntityKind::Context));
}

#[test]
fn cyclic_parent_chain_fails_instead_of_looping() {
    let mut lib = library();
    let a = lib.add_context(Context::new("A", None)).unwrap();
    let b = lib.add_context(Context::new("B", Some(a))).unwrap();
    let c = lib.add_context(Context::new("C", Some(b))).unwrap();
    lib.update_context(Context::with_id(a, "A", Some(c))).unwrap();

    let err = lib.get_context_path(c).unwrap_err();
    assert!(matches!(
        err,
        LibraryError::Store(StoreError::CycleDetected { id }) if id == c
    ));
}

#[test]
fn context_ids_are_never_reused_after_delete() {
    let mut lib = library();
    let first = lib.add_context(Context::new("One", None)).unwrap();
    lib.delete_context(first).unwrap();
    let second = lib.add_context(Context::new("Two", None)).unwrap();

    assert_eq!(second, first + 1);
    assert_eq!(lib.next_context_id(), second + 1);
}

#[test]
fn explicit_max_id_fails_without_events_or_storage() {
    let mut lib = library();
    let fired = Rc::new(Cell::new(0));
    let counter = Rc::clone(&fired);
    lib.subscribe(move |_| counter.set(counter.get() + 1));

    let err = lib
        .add_context(Context::with_id(i64::MAX, "Edge", None))
        .unwrap_err();

    assert!(matches!(
        err,
        LibraryError::Store(StoreError::IdSpaceExhausted {
            kind: EntityKind::Context
        })
    ));
    assert!(lib.get_all_contexts().is_empty());
    assert_eq!(lib.next_context_id(), 1);
    assert_eq!(fired.get(), 0);
}
