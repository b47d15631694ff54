use crate::harness::{Assertion, Scenario};

#[test]
fn test_back_and_forth_between_domains() {
    Scenario::new("back_and_forth")
        .browse(1, &["https://a.com/", "https://b.com/", "https://a.com/"])
        .assert_visit_count(3)
        .assert_domain_visits("a.com", 2)
        .assert_domain_visits("b.com", 1)
        .assert_transition("a.com", "b.com", 1)
        .assert_transition("b.com", "a.com", 1)
        .assert_graph(2, 2, 1)
        .assert_edge("https://a.com/", "https://b.com/")
        .assert_edge("https://b.com/", "https://a.com/")
        .assert_consistent()
        .run()
        .expect("scenario should pass");
}

#[test]
fn test_reload_is_not_a_new_visit() {
    Scenario::new("reload")
        .load(1, "https://a.com/")
        .load(1, "https://a.com/")
        .assert_visit_count(1)
        .load(1, "https://a.com/other")
        .assert_visit_count(2)
        .run()
        .unwrap();
}

#[test]
fn test_only_completed_web_pages_are_recorded() {
    Scenario::new("non_web_pages")
        .load(1, "chrome://newtab/")
        .load(1, "file:///home/user/notes.txt")
        .loading(1, "https://a.com/")
        .activate_tab(1)
        .assert_visit_count(0)
        .load(1, "https://a.com/")
        .assert_visit_count(1)
        .assert_visit_from("https://a.com/", None)
        .run()
        .unwrap();
}

#[test]
fn test_titles_default_to_domain() {
    Scenario::new("titles")
        .load_titled(1, "https://a.com/docs", "A Docs")
        .load(1, "https://www.b.com/")
        .assert(Assertion::LatestVisitTitle {
            url: "https://a.com/docs".into(),
            title: "A Docs".into(),
        })
        .assert(Assertion::LatestVisitTitle {
            url: "https://www.b.com/".into(),
            title: "www.b.com".into(),
        })
        .run()
        .unwrap();
}

#[test]
fn test_same_domain_navigation_counts_without_transition() {
    Scenario::new("same_domain")
        .browse(1, &["https://a.com/1", "https://a.com/2", "https://a.com/3"])
        .assert_domain_visits("a.com", 3)
        .assert_no_transition("a.com", "a.com")
        .assert_visit_from("https://a.com/2", Some("a.com"))
        .assert_graph(3, 0, 3)
        .assert_partitioned()
        .run()
        .unwrap();
}
