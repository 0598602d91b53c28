use refshelf_core::{render, render_all, CitationFormat, Reference, ReferenceType};

fn book() -> Reference {
    Reference::new(ReferenceType::Book, "X", "Jane Doe, John Smith").with_year(2023)
}

#[test]
fn bibtex_uses_lowercase_type_and_first_author_key() {
    let text = render(&book(), CitationFormat::BibTex);
    assert_eq!(
        text,
        "@book{doe2023,\n  title = {X},\n  author = {Jane Doe, John Smith},\n  year = {2023}\n}\n"
    );
}

#[test]
fn bibtex_appends_publisher_and_url_when_present() {
    let reference = Reference::new(ReferenceType::WebResource, "Docs", "Ferris Crab")
        .with_year(2015)
        .with_publisher("Rust Foundation")
        .with_url("https://rust-lang.org");
    let text = render(&reference, CitationFormat::BibTex);
    assert!(text.starts_with("@webresource{crab2015,\n"));
    assert!(text.contains("  year = {2015},\n  publisher = {Rust Foundation},\n  url = {https://rust-lang.org}\n}\n"));
}

#[test]
fn harvard_clauses_follow_publisher_then_url() {
    assert_eq!(
        render(&book(), CitationFormat::Harvard),
        "Jane Doe, John Smith (2023) X."
    );

    let full = book()
        .with_publisher("Acme Press")
        .with_url("https://example.org/x");
    assert_eq!(
        render(&full, CitationFormat::Harvard),
        "Jane Doe, John Smith (2023) X. Acme Press. Available at: https://example.org/x."
    );

    let url_only = book().with_url("https://example.org/x");
    assert_eq!(
        render(&url_only, CitationFormat::Harvard),
        "Jane Doe, John Smith (2023) X. Available at: https://example.org/x."
    );
}

#[test]
fn dstu_places_publisher_before_year_and_never_numbers() {
    assert_eq!(
        render(&book(), CitationFormat::Dstu),
        "Jane Doe, John Smith X, 2023."
    );

    let full = book()
        .with_publisher("Acme Press")
        .with_url("https://example.org/x");
    assert_eq!(
        render(&full, CitationFormat::Dstu),
        "Jane Doe, John Smith X / Acme Press, 2023. URL: https://example.org/x."
    );
}

#[test]
fn render_all_covers_every_dialect_in_order() {
    let previews = render_all(&book());
    let formats: Vec<_> = previews.iter().map(|(format, _)| *format).collect();
    assert_eq!(formats, CitationFormat::ALL.to_vec());
    assert!(previews[0].1.starts_with("@book{doe2023"));
}
