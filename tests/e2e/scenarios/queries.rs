use crate::harness::Scenario;
use anyhow::ensure;
use journey_core::QueryFilter;

fn domain_heavy() -> Scenario {
    Scenario::new("queries").browse(
        1,
        &[
            "https://a.com/1",
            "https://b.com/",
            "https://a.com/2",
            "https://a.com/3",
        ],
    )
}

#[test]
fn test_same_domain_visit_starts_new_path() {
    domain_heavy()
        .assert_edge("https://a.com/1", "https://b.com/")
        .assert_edge("https://b.com/", "https://a.com/2")
        .assert_graph(4, 2, 2)
        .assert_partitioned()
        .run()
        .expect("scenario should pass");
}

#[test]
fn test_stats_summarize_store() {
    domain_heavy()
        .check(|tracker| {
            let stats = tracker.query().stats();
            ensure!(stats.total_visits == 4);
            ensure!(stats.total_domains == 2);
            ensure!(stats.total_transitions == 2);
            ensure!(stats.most_visited.as_deref() == Some("a.com"));
            ensure!(stats.most_visited_count == 3);
            ensure!(stats.first_visit < stats.last_visit);
            Ok(())
        })
        .run()
        .unwrap();
}

#[test]
fn test_domain_filters() {
    domain_heavy()
        .check(|tracker| {
            let frequent = tracker.query().domains(&QueryFilter {
                min_visits: Some(2),
                ..QueryFilter::default()
            });
            ensure!(frequent.keys().collect::<Vec<_>>() == vec!["a.com"]);

            let searched = tracker.query().domains(&QueryFilter {
                search: Some("B.C".into()),
                ..QueryFilter::default()
            });
            ensure!(searched.keys().collect::<Vec<_>>() == vec!["b.com"]);

            let touching_b = tracker.query().transitions(&QueryFilter {
                domain: Some("b.com".into()),
                ..QueryFilter::default()
            });
            ensure!(touching_b.len() == 2);
            Ok(())
        })
        .run()
        .unwrap();
}

#[test]
fn test_date_bounds_refold_aggregates() {
    domain_heavy()
        .check(|tracker| {
            // Events are one second apart; keep the last two visits.
            let recent = QueryFilter::between(Some(tracker.now() - 2_500), None);

            let visits = tracker.query().visits(&recent);
            ensure!(visits.len() == 2);

            let domains = tracker.query().domains(&recent);
            ensure!(domains.get("a.com").map(|d| d.visit_count) == Some(2));
            ensure!(!domains.contains_key("b.com"));

            let transitions = tracker.query().transitions(&recent);
            ensure!(transitions.len() == 1, "only b.com -> a.com/2 is in range");
            Ok(())
        })
        .run()
        .unwrap();
}

#[test]
fn test_domain_visits_newest_first() {
    domain_heavy()
        .check(|tracker| {
            let visits = tracker.query().visits_for_domain("a.com", Some(2));
            let urls: Vec<_> = visits.iter().map(|v| v.url.as_str()).collect();
            ensure!(urls == vec!["https://a.com/3", "https://a.com/2"], "got {:?}", urls);

            ensure!(tracker.query().visits_for_domain("a.co", None).is_empty());
            Ok(())
        })
        .run()
        .unwrap();
}

#[test]
fn test_export_bundle() {
    domain_heavy()
        .check(|tracker| {
            let bundle = tracker.query().export()?;
            ensure!(bundle.visits.len() == 4);
            ensure!(bundle.domains.len() == 2);
            ensure!(bundle.export_date.ends_with('Z'));
            ensure!(!bundle.version.is_empty());

            let json = bundle.to_json()?;
            ensure!(json.contains("\"exportDate\""));
            ensure!(json.contains("\"fromDomain\""));
            Ok(())
        })
        .run()
        .unwrap();
}
