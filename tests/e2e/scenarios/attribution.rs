use crate::harness::Scenario;

#[test]
fn test_opener_attributes_first_navigation_only() {
    Scenario::new("opener_once")
        .load(1, "https://x.com/")
        .open_tab(1, 2)
        .load(2, "https://y.com/")
        .load(2, "https://z.com/")
        .assert_visit_from("https://y.com/", Some("x.com"))
        .assert_visit_from("https://z.com/", Some("y.com"))
        .assert_transition("x.com", "y.com", 1)
        .assert_transition("y.com", "z.com", 1)
        .assert_no_transition("x.com", "z.com")
        // Cross-tab attributions have no same-tab source page.
        .assert_graph(3, 1, 2)
        .assert_edge("https://y.com/", "https://z.com/")
        .assert_partitioned()
        .run()
        .expect("scenario should pass");
}

#[test]
fn test_opener_uses_page_shown_when_link_opened() {
    Scenario::new("opener_page")
        .load(1, "https://x.com/")
        .open_tab(1, 2)
        .load(1, "https://w.com/")
        .load(2, "https://y.com/")
        .assert_visit_from("https://y.com/", Some("x.com"))
        .run()
        .unwrap();
}

#[test]
fn test_tabs_attribute_independently() {
    Scenario::new("independent_tabs")
        .load(1, "https://a.com/")
        .load(2, "https://c.com/")
        .load(1, "https://b.com/")
        .load(2, "https://d.com/")
        .assert_visit_from("https://b.com/", Some("a.com"))
        .assert_visit_from("https://d.com/", Some("c.com"))
        .assert_no_transition("c.com", "b.com")
        .assert_graph(4, 2, 2)
        .assert_partitioned()
        .run()
        .unwrap();
}

#[test]
fn test_closed_tab_starts_fresh() {
    Scenario::new("closed_tab")
        .browse(1, &["https://a.com/", "https://b.com/"])
        .close_tab(1)
        .assert_closed_tab(1, "https://b.com/")
        .load(1, "https://c.com/")
        .assert_visit_from("https://c.com/", None)
        .assert_no_transition("b.com", "c.com")
        .run()
        .unwrap();
}

#[test]
fn test_closing_unvisited_tab_is_not_journaled() {
    Scenario::new("closed_empty_tab")
        .load(1, "chrome://newtab/")
        .close_tab(1)
        .assert(crate::harness::Assertion::NoClosedTab(1))
        .run()
        .unwrap();
}
