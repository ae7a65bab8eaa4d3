//! Example: serialize a page with shadow roots and parse it back

use umbra_html::{find_shadow_roots, parse_html_unsafe, Serializable, SerializeOptions};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let markup = r#"<title>Cards</title>
<card-list id="cards">
  <template shadowrootmode="open"><slot></slot><footer-note><template shadowrootmode="closed">&copy; umbra</template></footer-note></template>
  <p title="a &quot;quoted&quot; title">light content</p>
</card-list>"#;

    let document = parse_html_unsafe(markup)?;
    let body = document.body();

    let shadow_roots: Vec<_> = find_shadow_roots(document.tree(), body).collect();
    println!("umbra v{}: {} shadow roots attached", umbra_html::VERSION, shadow_roots.len());

    let cards = document
        .get_element_by_id("cards")
        .ok_or_else(|| anyhow::anyhow!("no #cards element"))?;
    println!("
{} / #cards light content:
{}", document.title(), document.get_html(cards, &SerializeOptions::default()));

    println!("\nwithout shadow roots:\n{}", document.get_html(body, &SerializeOptions::default()));

    let options = SerializeOptions::with_shadow_roots(shadow_roots);
    let html = document.get_html(body, &options);
    println!("\nwith shadow roots:\n{html}");

    let reparsed = parse_html_unsafe(&html)?;
    let count = find_shadow_roots(reparsed.tree(), reparsed.body()).count();
    println!("\nreparsed: {count} shadow roots");

    Ok(())
}
