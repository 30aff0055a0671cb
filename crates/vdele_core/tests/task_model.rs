use chrono::NaiveDate;
use uuid::Uuid;
use vdele_core::model::task::{assignee_badges, parse_assignees, TaskValidationError};
use vdele_core::{Task, TaskStatus};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
}

#[test]
fn toggle_closed_always_clears_risk() {
    let mut task = Task::new(Uuid::new_v4(), "Запустить кампанию", today());
    task.status = TaskStatus::Risk;

    task.toggle_closed();
    assert_eq!(task.status, TaskStatus::Closed);

    task.toggle_closed();
    assert_eq!(task.status, TaskStatus::Open);
}

#[test]
fn toggle_risk_flips_between_risk_and_open() {
    let mut task = Task::new(Uuid::new_v4(), "Настроить таргетинг", today());

    task.toggle_risk();
    assert_eq!(task.status, TaskStatus::Risk);

    task.toggle_risk();
    assert_eq!(task.status, TaskStatus::Open);

    // A closed task can be flagged directly, mirroring the dropdown item.
    task.status = TaskStatus::Closed;
    task.toggle_risk();
    assert_eq!(task.status, TaskStatus::Risk);
}

#[test]
fn link_validation_accepts_http_and_rejects_garbage() {
    let mut task = Task::new(Uuid::new_v4(), "Антиколиковая бутылочка", today());

    task.link = Some("https://example.com/bottle?size=240".to_string());
    assert!(task.validate().is_ok());

    task.link = Some("ftp://example.com".to_string());
    assert!(matches!(
        task.validate(),
        Err(TaskValidationError::InvalidLink(_))
    ));

    task.link = Some("просто текст".to_string());
    assert!(matches!(
        task.validate(),
        Err(TaskValidationError::InvalidLink(_))
    ));
}

#[test]
fn blank_title_fails_validation() {
    let task = Task::new(Uuid::new_v4(), "   ", today());
    assert!(matches!(
        task.validate(),
        Err(TaskValidationError::BlankTitle)
    ));
}

#[test]
fn assignees_parse_from_comma_separated_names() {
    let assignees = parse_assignees(" Анна Петрова , Иван Смирнов ,, ");
    let names: Vec<&str> = assignees
        .iter()
        .map(|person| person.name.as_str())
        .collect();
    assert_eq!(names, vec!["Анна Петрова", "Иван Смирнов"]);
    assert_eq!(assignees[0].initial(), Some('А'));
}

#[test]
fn avatar_row_caps_visible_entries_with_overflow() {
    let badges =
        assignee_badges("Анна Петрова, Иван Смирнов, Лена Карпова, Мария Орлова").unwrap();
    assert_eq!(badges.visible.len(), 2);
    assert_eq!(badges.overflow, 2);

    let no_overflow = assignee_badges("Влад Ким").unwrap();
    assert_eq!(no_overflow.visible.len(), 1);
    assert_eq!(no_overflow.overflow, 0);

    assert!(assignee_badges("   ").is_none());
}

#[test]
fn wire_shape_uses_board_field_names() {
    let list_id = Uuid::new_v4();
    let mut task = Task::new(list_id, "Встреча с клиентом", today());
    task.due_date = NaiveDate::from_ymd_opt(2026, 8, 10);

    let value = serde_json::to_value(&task).unwrap();
    assert_eq!(value["id"], task.uuid.to_string());
    assert_eq!(value["list_id"], list_id.to_string());
    assert_eq!(value["status"], "open");
    assert_eq!(value["due_date"], "2026-08-10");
    assert_eq!(value["created_at"], "2026-08-07");

    let parsed: Task = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, task);
}

#[test]
fn snapshot_items_tolerate_missing_optional_fields() {
    let raw = serde_json::json!({
        "id": Uuid::new_v4().to_string(),
        "title": "Памперсы размер 3",
        "created_at": "2026-08-01"
    });

    let task: Task = serde_json::from_value(raw).unwrap();
    assert_eq!(task.status, TaskStatus::Open);
    assert_eq!(task.due_date, None);
    assert_eq!(task.category, None);
    assert!(!task.is_deleted);
    assert_eq!(task.list_uuid, Uuid::nil());
}
