use refshelf_core::{ChangeEvent, Context, InMemoryLibrary, Reference, ReferenceType};
use std::cell::RefCell;
use std::rc::Rc;

fn recording_library() -> (InMemoryLibrary, Rc<RefCell<Vec<ChangeEvent>>>) {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut lib = InMemoryLibrary::in_memory();
    let sink = Rc::clone(&events);
    lib.subscribe(move |event| sink.borrow_mut().push(*event));
    (lib, events)
}

#[test]
fn each_mutation_emits_entity_event_then_data_changed() {
    let (mut lib, events) = recording_library();

    let ctx = lib.add_context(Context::new("AI", None)).unwrap();
    let mut reference = Reference::new(ReferenceType::Audio, "Podcast", "Host");
    let id = lib.add_reference(reference.clone()).unwrap();
    reference.id = id;
    lib.update_reference(reference).unwrap();
    lib.update_context(Context::with_id(ctx, "ML", None)).unwrap();
    lib.delete_reference(id).unwrap();
    lib.delete_context(ctx).unwrap();

    assert_eq!(
        *events.borrow(),
        vec![
            ChangeEvent::ContextAdded(ctx),
            ChangeEvent::DataChanged,
            ChangeEvent::ReferenceAdded(id),
            ChangeEvent::DataChanged,
            ChangeEvent::ReferenceUpdated(id),
            ChangeEvent::DataChanged,
            ChangeEvent::ContextUpdated(ctx),
            ChangeEvent::DataChanged,
            ChangeEvent::ReferenceDeleted(id),
            ChangeEvent::DataChanged,
            ChangeEvent::ContextDeleted(ctx),
            ChangeEvent::DataChanged,
        ]
    );
}

#[test]
fn failed_mutations_emit_nothing() {
    let (mut lib, events) = recording_library();

    assert!(lib.delete_reference(7).is_err());
    assert!(lib.update_context(Context::with_id(3, "Ghost", None)).is_err());

    assert!(events.borrow().is_empty());
}

#[test]
fn listeners_run_in_registration_order() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let mut lib = InMemoryLibrary::in_memory();
    for name in ["ui", "status_bar"] {
        let order = Rc::clone(&order);
        lib.subscribe(move |event| order.borrow_mut().push((name, *event)));
    }

    let id = lib.add_context(Context::new("Root", None)).unwrap();

    assert_eq!(
        *order.borrow(),
        vec![
            ("ui", ChangeEvent::ContextAdded(id)),
            ("status_bar", ChangeEvent::ContextAdded(id)),
            ("ui", ChangeEvent::DataChanged),
            ("status_bar", ChangeEvent::DataChanged),
        ]
    );
}

#[test]
fn unsubscribe_stops_delivery() {
    let (mut lib, events) = recording_library();
    let extra = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&extra);
    let listener = lib.subscribe(move |_| *counter.borrow_mut() += 1);

    lib.add_context(Context::new("One", None)).unwrap();
    assert!(lib.unsubscribe(listener));
    lib.add_context(Context::new("Two", None)).unwrap();

    assert_eq!(*extra.borrow(), 2);
    assert_eq!(events.borrow().len(), 4);
}
