//! Comprehensive tests for umbra-html
//!
//! Serialization and parsing of trees with shadow roots, end to end.

use umbra_dom::encode::encode_attribute_value;
use umbra_dom::{attach_declarative_shadow_roots, DomTree, NodeId, ShadowRootInit, ShadowRootMode};
use umbra_html::{
    find_shadow_roots, get_html, inner_html, parse_html_unsafe, HtmlParser, Serializable, SerializeOptions,
};

const GREETING: &str = "Hello, Declarative Shadow DOM!";

fn tree_with_host(name: &str, mode: ShadowRootMode) -> (DomTree, NodeId, NodeId) {
    let mut tree = DomTree::new();
    let host = tree.create_element(name);
    tree.append_child(tree.root(), host).unwrap();
    let shadow = tree.attach_shadow(host, ShadowRootInit::new(mode)).unwrap();
    (tree, host, shadow)
}

// ============================================================================
// ROUND TRIPS
// ============================================================================

#[test]
fn test_plain_round_trip() {
    let mut tree = DomTree::new();
    let container = tree.create_element("div");
    tree.append_child(tree.root(), container).unwrap();

    let section = tree.create_element("section");
    tree.set_attribute(section, "class", "intro").unwrap();
    tree.set_attribute(section, "data-note", "it's \"quoted\"").unwrap();
    let heading = tree.create_element("h1");
    let title = tree.create_text("Title");
    let comment = tree.create_comment(" marker ");
    let list = tree.create_element("ul");
    tree.append_child(container, section).unwrap();
    tree.append_child(section, heading).unwrap();
    tree.append_child(heading, title).unwrap();
    tree.append_child(section, comment).unwrap();
    tree.append_child(section, list).unwrap();
    for label in ["one", "two"] {
        let item = tree.create_element("li");
        let text = tree.create_text(label);
        tree.append_child(list, item).unwrap();
        tree.append_child(item, text).unwrap();
    }
    let trailing = tree.create_text(" tail");
    tree.append_child(container, trailing).unwrap();

    // A detached host keeps the cursor path active without adding shadow markup
    let detached = tree.create_element("my-tag");
    let unrelated = tree.attach_shadow(detached, ShadowRootInit::open()).unwrap();
    let options = SerializeOptions::with_shadow_roots([unrelated]);
    let html = get_html(&tree, container, &options);
    assert!(!html.contains("<template"));

    let doc = parse_html_unsafe(&html).unwrap();
    assert_eq!(inner_html(doc.tree(), doc.body()), inner_html(&tree, container));
}

#[test]
fn test_shadow_round_trip() {
    let (mut tree, _, shadow) = tree_with_host("my-tag", ShadowRootMode::Open);
    let text = tree.create_text(GREETING);
    tree.append_child(shadow, text).unwrap();

    let options = SerializeOptions::with_shadow_roots([shadow]);
    let html = tree.get_html(tree.root(), &options);
    assert_eq!(
        html,
        "<my-tag><template shadowrootmode=\"open\">Hello, Declarative Shadow DOM!</template></my-tag>"
    );

    let doc = parse_html_unsafe(&html).unwrap();
    let host = doc.tree().first_element_child(doc.body()).unwrap();
    assert_eq!(doc.tree().tag_name(host), Some("my-tag"));
    assert_eq!(doc.tree().first_child(host), None);

    let reparsed = doc.tree().shadow_root(host).unwrap();
    assert_eq!(doc.tree().text_content(reparsed), GREETING);
    assert!(doc.tree().registry().lookup(host).unwrap().declarative);
}

#[test]
fn test_nested_round_trip_is_stable() {
    let markup = "<outer-tag id=\"a\"><template shadowrootmode=\"open\"><p>shadow</p>\
                  <inner-tag><template shadowrootmode=\"closed\"><b>deep</b></template>slotted</inner-tag>\
                  </template><span>light</span></outer-tag><p>after</p>";
    let doc = parse_html_unsafe(markup).unwrap();
    let body = doc.body();
    let roots: Vec<_> = find_shadow_roots(doc.tree(), body).collect();
    assert_eq!(roots.len(), 2);

    let options = SerializeOptions::with_shadow_roots(roots);
    let html = doc.get_html(body, &options);
    assert_eq!(html, markup);

    let again = parse_html_unsafe(&html).unwrap();
    let again_roots: Vec<_> = find_shadow_roots(again.tree(), again.body()).collect();
    let again_options = SerializeOptions::with_shadow_roots(again_roots);
    assert_eq!(again.get_html(again.body(), &again_options), markup);
}

// ============================================================================
// ALLOW-LIST
// ============================================================================

#[test]
fn test_empty_allow_list_renders_plain() {
    let (mut tree, _, shadow) = tree_with_host("my-tag", ShadowRootMode::Open);
    let text = tree.create_text(GREETING);
    tree.append_child(shadow, text).unwrap();

    let options = SerializeOptions::new().serializable_shadow_roots(true);
    assert_eq!(get_html(&tree, tree.root(), &options), "<my-tag></my-tag>");
}

#[test]
fn test_unrelated_allow_list_renders_plain() {
    let (mut tree, _, shadow) = tree_with_host("my-tag", ShadowRootMode::Open);
    let text = tree.create_text(GREETING);
    tree.append_child(shadow, text).unwrap();
    let elsewhere = tree.create_element("elsewhere-tag");
    let unrelated = tree.attach_shadow(elsewhere, ShadowRootInit::open()).unwrap();

    for roots in [vec![unrelated], vec![NodeId::NONE, unrelated]] {
        let options = SerializeOptions::with_shadow_roots(roots);
        assert_eq!(get_html(&tree, tree.root(), &options), "<my-tag></my-tag>");
    }
}

#[test]
fn test_master_switch_off_ignores_allow_list() {
    let (tree, host, shadow) = tree_with_host("my-tag", ShadowRootMode::Open);
    let options = SerializeOptions::new().shadow_roots([shadow]);

    assert_eq!(get_html(&tree, tree.root(), &options), inner_html(&tree, tree.root()));
    assert_eq!(get_html(&tree, host, &options), "");
}

#[test]
fn test_allow_list_selects_nested_roots() {
    let doc = parse_html_unsafe(
        "<a-host><template shadowrootmode=\"open\">A<b-host><template shadowrootmode=\"open\">B</template></b-host></template></a-host>",
    )
    .unwrap();
    let roots: Vec<_> = find_shadow_roots(doc.tree(), doc.body()).collect();
    let (sa, sb) = (roots[0], roots[1]);

    let only_outer = SerializeOptions::with_shadow_roots([sa]);
    assert_eq!(
        doc.get_html(doc.body(), &only_outer),
        "<a-host><template shadowrootmode=\"open\">A<b-host></b-host></template></a-host>"
    );

    let only_inner = SerializeOptions::with_shadow_roots([sb]);
    assert_eq!(doc.get_html(doc.body(), &only_inner), "<a-host></a-host>");
}

// ============================================================================
// ESCAPING
// ============================================================================

#[test]
fn test_attribute_escaping_vector() {
    let raw = "This is a \"test\" & it's <important>!";
    assert_eq!(
        encode_attribute_value(raw),
        "This is a &#34;test&#34; &#38; it&#39;s &#60;important&#62;!"
    );

    let (mut tree, host, shadow) = tree_with_host("my-tag", ShadowRootMode::Open);
    tree.set_attribute(host, "title", raw).unwrap();
    let html = get_html(&tree, tree.root(), &SerializeOptions::with_shadow_roots([shadow]));
    assert_eq!(
        html,
        "<my-tag title=\"This is a &#34;test&#34; &#38; it&#39;s &#60;important&#62;!\">\
         <template shadowrootmode=\"open\"></template></my-tag>"
    );

    let doc = parse_html_unsafe(&html).unwrap();
    let host = doc.tree().first_element_child(doc.body()).unwrap();
    assert_eq!(doc.tree().get_attribute(host, "title"), Some(raw));
}

// ============================================================================
// ENUMERATION AND ATTACHMENT
// ============================================================================

#[test]
fn test_enumeration_order() {
    let doc = parse_html_unsafe(
        "<a-host><template shadowrootmode=\"open\"><b-host><template shadowrootmode=\"closed\"></template></b-host>\
         </template></a-host><c-host></c-host>",
    )
    .unwrap();
    let tree = doc.tree();
    let a = tree.elements_by_tag_name(doc.body(), "a-host")[0];
    let sa = tree.shadow_root(a).unwrap();
    let b = tree.first_element_child(sa).unwrap();
    let sb = tree.registry().lookup(b).unwrap().root;

    assert_eq!(find_shadow_roots(tree, doc.body()).collect::<Vec<_>>(), [sa, sb]);
    assert_eq!(tree.shadow_root(b), None);
    assert_eq!(tree.registry().len(), 2);
}

#[test]
fn test_attachment_is_idempotent() {
    let mut doc = parse_html_unsafe("<my-tag><template shadowrootmode=\"open\"><p>x</p></template></my-tag>").unwrap();
    let count = doc.tree().len();
    let body = doc.body();

    assert_eq!(doc.initialize().unwrap(), 0);
    assert_eq!(attach_declarative_shadow_roots(doc.tree_mut(), body), Ok(0));
    assert_eq!(doc.tree().len(), count);
    assert_eq!(doc.tree().registry().len(), 1);
}

#[test]
fn test_parse_without_initialize_keeps_templates() {
    let mut doc = HtmlParser::new()
        .parse("<my-tag><template shadowrootmode=\"open\">x</template></my-tag>")
        .unwrap();
    assert!(doc.tree().registry().is_empty());

    assert_eq!(doc.initialize().unwrap(), 1);
    assert!(doc.tree().elements_by_tag_name(doc.body(), "template").is_empty());
}

// ============================================================================
// DEFAULTS AND ENTRY POINTS
// ============================================================================

#[test]
fn test_default_options_equal_inner_html() {
    let doc = parse_html_unsafe(
        "<my-tag class=\"x\"><template shadowrootmode=\"open\">hidden</template>a &amp; b<br></my-tag>",
    )
    .unwrap();
    let body = doc.body();

    let html = doc.get_html(body, &SerializeOptions::default());
    assert_eq!(html, inner_html(doc.tree(), body));
    assert_eq!(html, "<my-tag class=\"x\">a &amp; b<br></my-tag>");
    assert!(!html.contains("template"));
}

#[test]
fn test_set_html_unsafe_replaces_children() {
    let mut doc = parse_html_unsafe("<div id=\"target\"><span>old</span></div>").unwrap();
    let target = doc.get_element_by_id("target").unwrap();
    let old = doc.tree().first_child(target).unwrap();

    doc.set_html_unsafe(target, "<my-tag><template shadowrootmode=\"closed\">new</template></my-tag>text")
        .unwrap();

    let tree = doc.tree();
    assert!(!tree.contains(old));
    let host = tree.first_child(target).unwrap();
    assert_eq!(tree.tag_name(host), Some("my-tag"));
    assert_eq!(tree.shadow_root(host), None);
    let shadow = tree.registry().lookup(host).unwrap();
    assert_eq!(shadow.mode, ShadowRootMode::Closed);
    assert_eq!(tree.text_content(shadow.root), "new");
    assert_eq!(tree.text_content(target), "text");
}

#[test]
fn test_set_html_unsafe_on_shadow_root() {
    let (mut tree, _, shadow) = tree_with_host("my-tag", ShadowRootMode::Open);
    tree.set_html_unsafe(shadow, "<p>one</p><inner-tag><template shadowrootmode=\"open\">two</template></inner-tag>")
        .unwrap();

    let roots: Vec<_> = find_shadow_roots(&tree, tree.root()).collect();
    assert_eq!(roots.len(), 2);
    assert_eq!(roots[0], shadow);
    assert_eq!(
        tree.get_html(tree.root(), &SerializeOptions::with_shadow_roots(roots)),
        "<my-tag><template shadowrootmode=\"open\"><p>one</p><inner-tag>\
         <template shadowrootmode=\"open\">two</template></inner-tag></template></my-tag>"
    );
}
