use chrono::NaiveDate;
use protrack::codec::{self, GymSnapshot};
use protrack::dates::parse_date;
use protrack::*;
use speculate2::speculate;

fn date(s: &str) -> NaiveDate {
    parse_date(s).expect("Invalid test date")
}

/// One plan, two members; Alice follows the plan and has paid twice.
fn populated_manager() -> GymManager {
    let mut manager = GymManager::new();
    manager
        .add_workout_plan(
            WorkoutPlan::new(
                "P1",
                "Leg Day",
                "Legs",
                vec!["Squat".to_string(), "Lunge".to_string()],
            )
            .expect("Failed to build plan"),
        )
        .expect("Failed to add plan");
    manager
        .register_member(Member::new("M1", "Alice", 30, date("2024-01-01")).expect("Failed"))
        .expect("Failed to register");
    manager
        .register_member(Member::new("M2", "Bob", 41, date("2024-02-15")).expect("Failed"))
        .expect("Failed to register");
    manager.assign_workout_plan("P1", "M1").expect("Failed to assign");
    manager.log_payment("M1", date("2024-03-01"), 50.0).expect("Failed");
    manager.log_payment("M1", date("2024-02-01"), 12.75).expect("Failed");
    manager.log_attendance(date("2024-03-02"), "M1").expect("Failed");
    manager.log_attendance(date("2024-03-02"), "M1").expect("Failed");
    manager
}

const LEGACY_JSON: &str = r#"{
    "workout_plans": [
        {
            "plan_id": "P1",
            "name": "Leg Day",
            "focus_area": "Legs",
            "exercises": ["Squat", "Lunge"]
        }
    ],
    "members": [
        {
            "member_id": "M1",
            "name": "Alice",
            "age": 30,
            "join_date": "2024-01-01",
            "workout_plan_id": "P1",
            "payment_history": [["2024-03-01", 50], ["2024-04-01", 49.5]],
            "attendance_log": ["2024-03-02"]
        },
        {
            "member_id": "M2",
            "name": "Bob",
            "age": 41,
            "join_date": "2024-02-15",
            "workout_plan_id": "GONE",
            "payment_history": [],
            "attendance_log": []
        }
    ]
}"#;

speculate! {
    describe "encode" {
        it "lists plans and members in insertion order" {
            let snapshot = codec::encode(&populated_manager());

            assert_eq!(snapshot.workout_plans.len(), 1);
            let ids: Vec<&str> = snapshot.members.iter().map(|m| m.member_id.as_str()).collect();
            assert_eq!(ids, vec!["M1", "M2"]);
        }

        it "stores the plan id rather than the plan" {
            let json = codec::to_json(&populated_manager()).expect("Failed to encode");
            let value: serde_json::Value = serde_json::from_str(&json).expect("Invalid JSON");

            assert_eq!(value["members"][0]["workout_plan_id"], "P1");
            assert!(value["members"][1]["workout_plan_id"].is_null());
            assert_eq!(
                value["members"][0]["payment_history"],
                serde_json::json!([["2024-03-01", 50.0], ["2024-02-01", 12.75]])
            );
        }

        it "writes workout_plans before members" {
            let json = codec::to_json(&populated_manager()).expect("Failed to encode");

            let plans_at = json.find("\"workout_plans\"").expect("plans key missing");
            let members_at = json.find("\"members\"").expect("members key missing");
            assert!(plans_at < members_at);
        }
    }

    describe "decode" {
        it "round-trips a populated manager field for field" {
            let manager = populated_manager();

            let restored = codec::decode(codec::encode(&manager)).expect("Failed to decode");

            assert_eq!(restored, manager);
        }

        it "round-trips through JSON text" {
            let manager = populated_manager();
            let json = codec::to_json(&manager).expect("Failed to encode");

            let restored = codec::from_json(&json).expect("Failed to decode");

            assert_eq!(restored, manager);
            let alice = restored.member("M1").unwrap();
            assert_eq!(alice.payment_history[0].date, date("2024-03-01"));
            assert_eq!(alice.payment_history[1].amount, 12.75);
            assert_eq!(restored.plan_for("M1").unwrap().unwrap().plan_id, "P1");
        }

        it "keeps full-precision amounts bit for bit" {
            let amounts = [
                207.96181086732759,
                985.6906946328695,
                50.926322293870044,
                210.73947491912486,
                0.1 + 0.2,
            ];
            let mut manager = populated_manager();
            for amount in amounts {
                manager.log_payment("M2", date("2024-05-01"), amount).expect("Failed");
            }

            let json = codec::to_json(&manager).expect("Failed to encode");
            let restored = codec::from_json(&json).expect("Failed to decode");

            assert_eq!(restored, manager);
            let restored_amounts: Vec<u64> = restored
                .member("M2")
                .unwrap()
                .payment_history
                .iter()
                .map(|p| p.amount.to_bits())
                .collect();
            assert_eq!(restored_amounts, amounts.map(f64::to_bits).to_vec());
        }

        it "reads the legacy file layout" {
            let manager = codec::from_json(LEGACY_JSON).expect("Failed to decode");

            assert_eq!(manager.plan_count(), 1);
            assert_eq!(manager.member_count(), 2);
            let alice = manager.member("M1").unwrap();
            assert_eq!(alice.latest_payment().unwrap().amount, 49.5);
            assert_eq!(alice.attendance_log, vec![date("2024-03-02")]);
            assert!(alice.is_assigned_to("P1"));
        }

        it "leaves members with unknown plans unassigned" {
            let manager = codec::from_json(LEGACY_JSON).expect("Failed to decode");

            assert!(manager.member("M2").unwrap().workout_plan_id.is_none());
        }

        it "treats missing lists as empty" {
            let manager = codec::from_json("{}").expect("Failed to decode");
            assert!(manager.is_empty());
        }

        it "lets a repeated id replace the earlier entry" {
            let mut snapshot = codec::encode(&populated_manager());
            let mut renamed = snapshot.members[0].clone();
            renamed.name = "Alice Updated".to_string();
            snapshot.members.push(renamed);

            let manager = codec::decode(snapshot).expect("Failed to decode");

            assert_eq!(manager.member_count(), 2);
            assert_eq!(manager.members()[0].name, "Alice Updated");
        }

        it "rejects a blank id" {
            let snapshot = GymSnapshot {
                workout_plans: vec![WorkoutPlan {
                    plan_id: String::new(),
                    name: "Nameless".to_string(),
                    focus_area: "Core".to_string(),
                    exercises: vec!["Plank".to_string()],
                }],
                members: Vec::new(),
            };

            assert!(matches!(codec::decode(snapshot), Err(GymError::MalformedInput(_))));
        }

        it "reports malformed JSON as a corrupt snapshot" {
            let result = codec::from_json("{ \"members\": [ { \"member_id\": 7 } ] }");
            assert!(matches!(result, Err(GymError::CorruptSnapshot(_))));
        }

        it "reports a badly formatted date as a corrupt snapshot" {
            let json = LEGACY_JSON.replace("2024-03-02", "03/02/2024");
            assert!(matches!(codec::from_json(&json), Err(GymError::CorruptSnapshot(_))));
        }
    }
}
