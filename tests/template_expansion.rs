//! Template expansion through the public API

use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use ui_markup::template::{ComponentRegistry, Expander, Model, NoComponents, Value};
use ui_markup::{build_with_config, parse, BuildConfig, Element};

fn expand(source: &str, model: &Model, registry: &ComponentRegistry) -> Element {
    let mut root = parse(source).root.expect("Should have a root");
    Expander::new(registry).expand(&mut root, model);
    root
}

fn has_directive(root: &Element) -> bool {
    root.descendants().any(|e| e.tag.starts_with('@'))
}

#[test]
fn test_status_chain_keeps_only_matching_branch() {
    let source = r#"
        <div>
            @if Status == "Active"
                <label>Active body</label>
            @else-if Status == "Pending"
                <label>Pending body</label>
            @else
                <label>Else body</label>
            @end
        </div>
    "#;
    let model = Model::new().with("Status", "Pending");
    let root = expand(source, &model, &ComponentRegistry::new());

    let text = root.text_content();
    assert_eq!(text, "Pending body");
    assert!(!text.contains("Active body"));
    assert!(!text.contains("Else body"));
    assert!(!has_directive(&root));
}

#[test]
fn test_chain_resolves_to_at_most_one_branch() {
    let source = "<div>@if A\n<p>a</p>\n@else-if B\n<p>b</p>\n@else-if C\n<p>c</p>\n@end</div>";
    for (model, expected) in [
        (Model::new().with("A", true).with("B", true), "a"),
        (Model::new().with("B", "yes").with("C", true), "b"),
        (Model::new().with("C", 1), "c"),
        (Model::new().with("A", "false"), ""),
    ] {
        let root = expand(source, &model, &ComponentRegistry::new());
        assert_eq!(root.text_content(), expected);
        assert!(root.children.len() <= 1);
        assert!(!has_directive(&root));
    }
}

#[test]
fn test_null_comparison() {
    let source = "<div>@if user == null\n<p>guest</p>\n@else\n<p>member</p>\n@end</div>";
    let guest = expand(source, &Model::new(), &ComponentRegistry::new());
    assert_eq!(guest.text_content(), "guest");

    let explicit = expand(
        source,
        &Model::new().with("user", Value::Null),
        &ComponentRegistry::new(),
    );
    assert_eq!(explicit.text_content(), "guest");

    let member = expand(source, &Model::new().with("user", "ada"), &ComponentRegistry::new());
    assert_eq!(member.text_content(), "member");
}

#[test]
fn test_widget_component_replaces_instance() {
    let mut registry = ComponentRegistry::new();
    registry
        .register(
            "Widget",
            "<model>{ attr: \"\" }</model>\n<hstack><label>Value: {attr}</label></hstack>",
        )
        .unwrap();

    let root = expand("<div><Widget attr=\"X\"/></div>", &Model::new(), &registry);
    assert!(root.descendants().all(|e| e.tag != "Widget"));
    assert_eq!(root.children[0].tag, "hstack");
    assert_eq!(root.text_content(), "Value: X");
}

#[test]
fn test_foreach_over_model_list() {
    let model = Model::from_toml_str("Fruits = [\"apple\", \"pear\", \"plum\"]\n").unwrap();
    let root = expand(
        "<vstack>@foreach fruit in Fruits\n<button text={fruit}>{fruit}</button>\n@end</vstack>",
        &model,
        &ComponentRegistry::new(),
    );
    assert_eq!(root.children.len(), 3);
    assert_eq!(root.text_content(), "apple pear plum");
    assert_eq!(root.children[2].attribute("text"), Some("plum"));
}

#[test]
fn test_components_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("Card.suim"),
        "<model>{ title: Untitled, footer: false }</model>\n\
         <vstack padding=8>\n\
           <h3>{title}</h3>\n\
           @if footer\n<p>Footer</p>\n@end\n\
         </vstack>",
    )
    .unwrap();
    fs::write(dir.path().join("Page.suim"), "<div><Card title={heading}/></div>").unwrap();

    let registry = ComponentRegistry::with_base_path(PathBuf::from(dir.path()));
    let root = expand(
        "<div><Page heading=Welcome/><Card footer=true/><Missing/></div>",
        &Model::new(),
        &registry,
    );

    assert_eq!(root.text_content(), "Welcome Untitled Footer");
    let tags: Vec<&str> = root.children.iter().map(|c| c.tag.as_str()).collect();
    assert_eq!(tags, vec!["div", "vstack", "Missing"]);
}

#[test]
fn test_model_file_drives_build() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.toml");
    fs::write(&path, "Admin = true\nName = \"Ada\"\n").unwrap();
    let model = Model::from_file(&path).unwrap();

    let config = BuildConfig::new().with_model(model);
    let built = build_with_config(
        "<vstack><label>Hi {Name}</label>@if Admin\n<button id=admin>Settings</button>\n@end</vstack>",
        &config,
    )
    .unwrap();

    assert_eq!(built.root.text_content(), "Hi Ada Settings");
    let admin = built.root.find_by_id("admin").unwrap();
    assert_eq!(admin.layout.map(|r| r.y), Some(24.0));
    assert!(built.expansion.warnings.is_empty());
}

#[test]
fn test_no_components_leaves_instances() {
    let mut root = parse("<div><Widget/></div>").root.unwrap();
    let report = Expander::new(&NoComponents).expand(&mut root, &Model::new());
    assert_eq!(root.children[0].tag, "Widget");
    assert_eq!(report.components_expanded, 0);
    assert!(report.warnings.is_empty());
}
