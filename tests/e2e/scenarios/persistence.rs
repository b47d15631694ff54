use crate::harness::Scenario;

#[test]
fn test_history_survives_restart() {
    Scenario::new("restart")
        .browse(1, &["https://a.com/", "https://b.com/", "https://a.com/"])
        .close_tab(1)
        .restart()
        .assert_visit_count(3)
        .assert_transition("a.com", "b.com", 1)
        .assert_closed_tab(1, "https://a.com/")
        .assert_graph(2, 2, 1)
        .assert_consistent()
        .run()
        .expect("scenario should pass");
}

#[test]
fn test_attribution_state_is_not_persisted() {
    Scenario::new("restart_attribution")
        .load(1, "https://a.com/")
        .restart()
        .load(1, "https://b.com/")
        .assert_visit_from("https://b.com/", None)
        .assert_no_transition("a.com", "b.com")
        .run()
        .unwrap();
}

#[test]
fn test_repair_after_restart_is_a_no_op() {
    Scenario::new("repair")
        .browse(1, &["https://a.com/", "https://b.com/"])
        .restart()
        .repair()
        .assert_visit_count(2)
        .assert_transition("a.com", "b.com", 1)
        .assert_consistent()
        .run()
        .unwrap();
}
