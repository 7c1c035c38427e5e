use chrono::{TimeZone, Utc};
use schedule_delta::models::*;
use schedule_delta::normalize::*;
use serde_json::{json, Value};
use speculate2::speculate;

fn task_record() -> Value {
    json!({
        "id": 1,
        "parentId": 0,
        "title": "Project",
        "start": "2025-10-01",
        "end": "2025-10-30",
        "progress": 30
    })
}

speculate! {
    describe "identifiers" {
        it "maps numeric and text ids to the same canonical id" {
            let numeric: Task = normalize_entity(&task_record()).expect("numeric id");
            let mut text_record = task_record();
            text_record["id"] = json!("1");
            let text: Task = normalize_entity(&text_record).expect("text id");

            assert_eq!(numeric.id, text.id);
            assert_eq!(numeric, text);
        }

        it "treats zero as a present identifier" {
            let mut record = task_record();
            record["id"] = json!(0);
            let zero: Task = normalize_entity(&record).expect("numeric zero");
            record["id"] = json!("0");
            let zero_text: Task = normalize_entity(&record).expect("text zero");

            assert_eq!(zero.id, EntityId::from("0"));
            assert_eq!(zero.id, zero_text.id);
        }

        it "reports a missing id" {
            let mut record = task_record();
            record.as_object_mut().unwrap().remove("id");
            let result: Result<Task, _> = normalize_entity(&record);

            assert_eq!(
                result.unwrap_err(),
                NormalizeError::MissingField { kind: EntityKind::Tasks, field: "id" }
            );
        }

        it "reports a null id as missing" {
            let mut record = task_record();
            record["id"] = Value::Null;
            let result: Result<Task, _> = normalize_entity(&record);

            assert!(matches!(
                result,
                Err(NormalizeError::MissingField { field: "id", .. })
            ));
        }

        it "rejects an id of the wrong type" {
            let mut record = task_record();
            record["id"] = json!(true);
            let result: Result<Task, _> = normalize_entity(&record);

            assert!(matches!(
                result,
                Err(NormalizeError::InvalidField { field: "id", .. })
            ));
        }

        it "coerces relational ids" {
            let dependency: Dependency = normalize_entity(&json!({
                "id": 5, "predecessorId": 2, "successorId": "3", "type": 0
            })).expect("dependency");

            assert_eq!(dependency.predecessor_id, EntityId::from("2"));
            assert_eq!(dependency.successor_id, EntityId::from("3"));
            assert_eq!(dependency.dependency_type, Some(DependencyType::FinishToStart));

            let assignment: ResourceAssignment = normalize_entity(&json!({
                "id": 0, "taskId": 4, "resourceId": 0
            })).expect("assignment");

            assert_eq!(assignment.id, EntityId::from("0"));
            assert_eq!(assignment.resource_id, EntityId::from("0"));
        }
    }

    describe "parent references" {
        it "keeps the root sentinel" {
            let task: Task = normalize_entity(&task_record()).expect("task");
            assert_eq!(task.parent_id, Some(ParentRef::Root));
        }

        it "coerces other parents to canonical ids" {
            let mut record = task_record();
            record["parentId"] = json!(3);
            let task: Task = normalize_entity(&record).expect("task");
            assert_eq!(task.parent_id, Some(ParentRef::Task(EntityId::from("3"))));
        }

        it "reads text zero as a reference to task zero" {
            let mut record = task_record();
            record["parentId"] = json!("0");
            let task: Task = normalize_entity(&record).expect("task");
            assert_eq!(task.parent_id, Some(ParentRef::Task(EntityId::from("0"))));
        }

        it "distinguishes no parent from the root" {
            let mut record = task_record();
            record.as_object_mut().unwrap().remove("parentId");
            let task: Task = normalize_entity(&record).expect("task");
            assert_eq!(task.parent_id, None);
        }

        it "serializes the root back as zero" {
            let task: Task = normalize_entity(&task_record()).expect("task");
            let json = serde_json::to_value(&task).expect("serialize");
            assert_eq!(json["parentId"], json!(0));
            assert_eq!(json["id"], json!("1"));
        }
    }

    describe "dates" {
        it "parses text dates into instants" {
            let task: Task = normalize_entity(&task_record()).expect("task");
            assert_eq!(task.start, Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap());
            assert_eq!(task.end, Utc.with_ymd_and_hms(2025, 10, 30, 0, 0, 0).unwrap());
        }

        it "accepts epoch milliseconds and full timestamps" {
            let mut record = task_record();
            record["start"] = json!(1_759_276_800_000_i64);
            record["end"] = json!("2025-10-30T12:30:00Z");
            let task: Task = normalize_entity(&record).expect("task");

            assert_eq!(task.start, Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap());
            assert_eq!(task.end, Utc.with_ymd_and_hms(2025, 10, 30, 12, 30, 0).unwrap());
        }

        it "rejects unreadable dates" {
            let mut record = task_record();
            record["start"] = json!("next tuesday");
            let result: Result<Task, _> = normalize_entity(&record);

            assert!(matches!(
                result,
                Err(NormalizeError::InvalidField { kind: EntityKind::Tasks, field: "start", .. })
            ));
        }

        it "does not reject inverted ranges" {
            let mut record = task_record();
            record["start"] = json!("2025-11-01");
            let task: Task = normalize_entity(&record).expect("inverted range is accepted");
            assert!(task.start > task.end);
        }
    }

    describe "partial records" {
        it "leaves unspecified fields unset" {
            let patch = TaskPatch::from_raw(&json!({"id": 1, "progress": 45})).expect("patch");

            assert_eq!(patch.id, EntityId::from("1"));
            assert_eq!(patch.progress, Some(Some(45)));
            assert_eq!(patch.title, None);
            assert_eq!(patch.start, None);
            assert_eq!(patch.parent_id, None);
        }

        it "distinguishes a cleared field from an absent one" {
            let patch = TaskPatch::from_raw(&json!({"id": 1, "progress": null, "parentId": null}))
                .expect("patch");

            assert_eq!(patch.progress, Some(None));
            assert_eq!(patch.parent_id, Some(None));
        }

        it "reports the first missing required field when completed" {
            let patch = TaskPatch::from_raw(&json!({"id": 7, "title": "New"})).expect("patch");

            assert_eq!(
                patch.into_entity().unwrap_err(),
                NormalizeError::MissingField { kind: EntityKind::Tasks, field: "start" }
            );
        }

        it "rejects a null required field" {
            let result = TaskPatch::from_raw(&json!({"id": 1, "title": null}));

            assert!(matches!(
                result,
                Err(NormalizeError::MissingField { field: "title", .. })
            ));
        }

        it "rejects a record that is not an object" {
            let result = ResourcePatch::from_raw(&json!([1, 2]));
            assert_eq!(
                result.unwrap_err(),
                NormalizeError::NotAnObject { kind: EntityKind::Resources }
            );
        }

        it "accepts the textual dependency types" {
            let patch = DependencyPatch::from_raw(&json!({"id": 1, "type": "SS"})).expect("patch");
            assert_eq!(patch.dependency_type, Some(Some(DependencyType::StartToStart)));

            let result = DependencyPatch::from_raw(&json!({"id": 1, "type": 9}));
            assert!(matches!(
                result,
                Err(NormalizeError::InvalidField { field: "type", .. })
            ));
        }
    }

    describe "idempotence" {
        it "yields equal records for the same input" {
            let first: Task = normalize_entity(&task_record()).expect("first");
            let second: Task = normalize_entity(&task_record()).expect("second");
            assert_eq!(first, second);
        }

        it "yields the same schedule when normalizing canonical output" {
            let seed = schedule_delta::seed::demo_seed();
            let once = normalize_schedule(&seed).expect("first pass");
            let twice = normalize_schedule(&serde_json::to_value(&once).expect("serialize"))
                .expect("second pass");
            assert_eq!(once, twice);
        }
    }

    describe "normalize_schedule" {
        it "reads links as dependencies and defaults missing collections" {
            let schedule = normalize_schedule(&json!({
                "tasks": [task_record()],
                "links": [{"id": 1, "predecessorId": 1, "successorId": 1}]
            })).expect("schedule");

            assert_eq!(schedule.tasks.len(), 1);
            assert_eq!(schedule.dependencies.len(), 1);
            assert!(schedule.resources.is_empty());
            assert!(schedule.resource_assignments.is_empty());
        }

        it "rejects duplicate ids after canonicalization" {
            let mut duplicate = task_record();
            duplicate["id"] = json!("1");
            let result = normalize_schedule(&json!({"tasks": [task_record(), duplicate]}));

            assert_eq!(
                result.unwrap_err(),
                NormalizeError::DuplicateId { kind: EntityKind::Tasks, id: EntityId::from("1") }
            );
        }

        it "rejects a collection that is not an array" {
            let result = normalize_schedule(&json!({"tasks": {"id": 1}}));
            assert!(matches!(result, Err(NormalizeError::InvalidDataset(_))));
        }

        it "rejects a dataset that is not an object" {
            let result = normalize_schedule(&json!([]));
            assert!(matches!(result, Err(NormalizeError::InvalidDataset(_))));
        }
    }
}
