use chrono::{TimeZone, Utc};
use schedule_delta::diff::*;
use schedule_delta::models::*;
use schedule_delta::normalize::{normalize_entity, normalize_schedule};
use schedule_delta::seed::demo_seed;
use serde_json::json;
use speculate2::speculate;

fn task(id: &str, title: &str, progress: Option<u8>) -> Task {
    Task {
        id: EntityId::from(id),
        parent_id: Some(ParentRef::Root),
        title: title.to_string(),
        start: Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2025, 10, 30, 0, 0, 0).unwrap(),
        progress,
    }
}

fn ids<T: Entity>(items: &[T]) -> Vec<String> {
    items.iter().map(|item| item.id().to_string()).collect()
}

speculate! {
    describe "diff_by_id" {
        it "is empty for identical collections" {
            let tasks = vec![task("1", "Project", Some(30)), task("2", "Analysis", None)];
            assert!(diff_by_id(&tasks, &tasks).is_empty());
        }

        it "is empty for two empty collections" {
            let empty: Vec<Task> = Vec::new();
            assert!(diff_by_id(&empty, &empty).is_empty());
        }

        it "reports added, removed and changed entities" {
            let before = vec![task("1", "Project", Some(30)), task("2", "Analysis", None)];
            let after = vec![task("1", "Project", Some(45)), task("3", "Review", None)];
            let delta = diff_by_id(&before, &after);

            assert_eq!(ids(&delta.added), ["3"]);
            assert_eq!(ids(&delta.removed), ["2"]);
            assert_eq!(delta.changed.len(), 1);
            assert_eq!(delta.changed[0].before.progress, Some(30));
            assert_eq!(delta.changed[0].after.progress, Some(45));
        }

        it "ignores reordering" {
            let before = vec![task("1", "A", None), task("2", "B", None)];
            let after = vec![task("2", "B", None), task("1", "A", None)];
            assert!(diff_by_id(&before, &after).is_empty());
        }

        it "treats a cleared optional field as a change" {
            let before = vec![task("1", "A", Some(10))];
            let after = vec![task("1", "A", None)];
            assert_eq!(diff_by_id(&before, &after).changed.len(), 1);
        }

        it "sees no change between numeric and text spellings once normalized" {
            let numeric: Dependency = normalize_entity(&json!({
                "id": 1, "predecessorId": 2, "successorId": 3, "type": 0
            })).unwrap();
            let text: Dependency = normalize_entity(&json!({
                "id": "1", "predecessorId": "2", "successorId": "3", "type": "0"
            })).unwrap();

            assert!(diff_by_id(&[numeric], &[text]).is_empty());
        }

        it "sees no change between equivalent date spellings once normalized" {
            let date_only: Task = normalize_entity(&json!({
                "id": 1, "title": "A", "start": "2025-10-01", "end": "2025-10-02"
            })).unwrap();
            let timestamp: Task = normalize_entity(&json!({
                "id": 1, "title": "A", "start": "2025-10-01T00:00:00Z", "end": 1_759_363_200_000_i64
            })).unwrap();

            assert!(diff_by_id(&[date_only], &[timestamp]).is_empty());
        }
    }

    describe "diff_schedule" {
        before {
            let baseline = normalize_schedule(&demo_seed()).expect("seed");
        }

        it "is empty against itself" {
            let delta = diff_schedule(&baseline, &baseline.clone());
            assert!(delta.is_empty());
            assert_eq!(delta.change_count(), 0);
        }

        it "diffs each collection independently" {
            let mut live = baseline.clone();
            live.dependencies.remove(0);
            live.resources.push(Resource { id: EntityId::from("r1"), text: "Ann".to_string() });

            let delta = diff_schedule(&baseline, &live);
            assert!(delta.tasks.is_empty());
            assert_eq!(ids(&delta.dependencies.removed), ["1"]);
            assert_eq!(ids(&delta.resources.added), ["r1"]);
            assert!(delta.resource_assignments.is_empty());
            assert_eq!(delta.change_count(), 2);
        }

        it "summarizes bucket sizes per kind" {
            let mut live = baseline.clone();
            live.tasks[0].progress = Some(99);
            live.tasks.pop();

            let summary = diff_schedule(&baseline, &live).summary();
            assert_eq!(summary.tasks, BucketCounts { added: 0, removed: 1, changed: 1 });
            assert_eq!(summary.dependencies, BucketCounts::default());
            assert_eq!(summary.total, 2);
        }
    }
}
