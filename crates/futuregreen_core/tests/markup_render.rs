use futuregreen_core::{strip_tags, Contact, Described, MarkupMode, MarkupRenderer};

#[test]
fn plain_mode_strips_markup() {
    let renderer = MarkupRenderer::default();
    assert_eq!(renderer.render("**x**", MarkupMode::Plain), "x");
    assert_eq!(
        renderer.render("<p>Green <em>roofs</em></p>", MarkupMode::Plain),
        "Green roofs"
    );
}

#[test]
fn plain_mode_keeps_arithmetic_and_stray_delimiters() {
    let renderer = MarkupRenderer::default();
    assert_eq!(
        renderer.render("Plot is 20 * 30 ft, cost 5*2", MarkupMode::Plain),
        "Plot is 20 * 30 ft, cost 5*2"
    );
    assert_eq!(
        renderer.render("Use `mulch` on 3*4 beds", MarkupMode::Plain),
        "Use mulch on 3*4 beds"
    );
}

#[test]
fn plain_mode_is_idempotent() {
    let raw = "[x]<b>(y)</b> <*i>z and **bold** <!-- note -->";
    let once = strip_tags(raw);
    assert_eq!(strip_tags(&once), once);
}

#[test]
fn html_and_wysiwyg_pass_through() {
    let renderer = MarkupRenderer::default();
    let raw = "<p>Rain <strong>garden</strong></p>";
    assert_eq!(renderer.render(raw, MarkupMode::Html), raw);
    assert_eq!(renderer.render(raw, MarkupMode::Wysiwyg), raw);
}

#[test]
fn markdown_and_textile_produce_html() {
    let renderer = MarkupRenderer::default();
    assert_eq!(
        renderer.render("**bold** move", MarkupMode::Markdown),
        "<p><strong>bold</strong> move</p>\n"
    );
    let textile = renderer.render("h2. Site plan", MarkupMode::Textile);
    assert!(textile.contains("<h2>Site plan</h2>"), "got {textile}");
}

#[test]
fn unknown_mode_falls_back_to_plain() {
    assert_eq!(MarkupMode::parse("rst"), MarkupMode::Plain);
    assert_eq!(MarkupMode::parse(" Markdown "), MarkupMode::Markdown);
}

#[test]
fn refresh_reports_changes_across_modes() {
    let renderer = MarkupRenderer::default();
    let mut contact = Contact::person("Jane Doe");
    contact.description = "**x**".to_string();

    assert!(renderer.refresh(&mut contact, MarkupMode::Markdown));
    assert_eq!(contact.description_html(), "<p><strong>x</strong></p>\n");

    assert!(!renderer.refresh(&mut contact, MarkupMode::Markdown));

    assert!(renderer.refresh(&mut contact, MarkupMode::Plain));
    assert_eq!(contact.description_html(), "x");
}
