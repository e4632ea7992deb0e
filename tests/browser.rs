use support_matrix::matrix;
use support_matrix::tools::utils::html_data_url;
use support_matrix::{BrowserSession, DomTree, LaunchOptions};

const PAGE: &str = r#"<html><body>
  <h2>Elastic Agent</h2>
  <table>
    <tr><th>Version</th><th>Ubuntu</th><th>Windows</th></tr>
    <tr><td>Elastic Agent 8.1</td><td><svg data-test-subj="checkInCircleFilled"></svg></td><td></td></tr>
    <tr><td>Elastic Agent 7.16</td><td>✓</td><td>✓</td></tr>
  </table>
</body></html>"#;

#[test]
#[ignore] // Requires Chrome to be installed
fn test_live_dom_extraction() {
    let session = BrowserSession::launch(LaunchOptions::new().headless(true)).expect("Failed to launch browser");

    let dom = session.load(&html_data_url(PAGE)).expect("Failed to load page");

    assert_eq!(dom.root.tag_name, "body");
    assert_eq!(dom.tables().len(), 1);

    let json = dom.to_json().expect("Failed to convert to JSON");
    assert!(json.contains("checkInCircleFilled"));
}

#[test]
#[ignore]
fn test_live_page_interprets_like_static_html() {
    let session = BrowserSession::launch(LaunchOptions::new().headless(true)).expect("Failed to launch browser");

    let live = session.load(&html_data_url(PAGE)).expect("Failed to load page");
    let parsed = DomTree::from_html(PAGE);

    assert_eq!(matrix::product_names(&live), vec!["Elastic Agent"]);
    assert_eq!(
        matrix::scrape_product(&live, "Elastic Agent").expect("live page"),
        matrix::scrape_product(&parsed, "Elastic Agent").expect("static page")
    );
}
